//! Pass 6: the ambiguity & validity gatekeeper (spec §4.6, §4.6.1).
//!
//! Grounded on `cfg_classify_useful::Usefulness`'s iterate-existing-rules-and-classify shape:
//! both admission variants below scan the existing rules/records sharing a candidate's LHS,
//! classify the pair, and either reject, replace, or append.

use log::{error, warn};

use crate::error::EditRuleError;
use crate::insertion::{InsertionRecord, InsertionStore};
use crate::rule::{Rule, RuleMap};
use crate::semantic_potential::SemanticPotential;
use crate::semantic::Semantic;
use crate::symbol::Symbol;
use crate::Options;

/// Two rules (or two insertion records) are ambiguous iff their `(semantic, inserted_semantic)`
/// tuples compare equal, or their display texts compare equal (spec §4.6.1). `ReducedSemantic`
/// lists are kept sorted at every merge site, so `PartialEq` on them is already the
/// order-insensitive comparison the spec calls for.
pub fn rules_ambiguous(a: &Rule, b: &Rule) -> bool {
    (a.semantic == b.semantic && a.inserted_semantic == b.inserted_semantic) || a.text == b.text
}

fn insertions_ambiguous(a: &InsertionRecord, b: &InsertionRecord) -> bool {
    a.semantic == b.semantic || a.text == b.text
}

fn is_insertion_rule(rule: &Rule) -> bool {
    rule.inserted_sym_idx.is_some()
}

fn semantically_viable(rule: &Rule) -> bool {
    match &rule.semantic {
        Some(Semantic::Unreduced(_)) => rule.rhs_can_produce_semantic.unwrap_or(false),
        _ => true,
    }
}

/// Rule admission (spec §4.6 "Rule admission"). Returns `Ok(true)` if the candidate was added
/// or replaced an existing ambiguous-but-costlier rule, `Ok(false)` if silently dropped
/// (spec §7 kind 4), `Err` on fatal ambiguity (kind 3).
pub fn try_admit_rule(
    rule_map: &mut RuleMap,
    candidate: Rule,
    options: &Options,
    _potential: &SemanticPotential,
) -> Result<bool, EditRuleError> {
    let lhs = candidate.lhs;
    let mut replace_idx: Option<usize> = None;

    for (idx, other) in rule_map.rules_for(lhs).iter().enumerate() {
        if other.rhs != candidate.rhs || !rules_ambiguous(other, &candidate) {
            continue;
        }
        let insertion_mismatch = is_insertion_rule(other) != is_insertion_rule(&candidate);
        if options.stop_ambiguity || insertion_mismatch {
            error!(
                "fatal ambiguity on `{}`: rules with equal RHS and equal text/semantics",
                rule_map.symbols.name_of(lhs)
            );
            return Err(EditRuleError::FatalAmbiguity {
                lhs_name: rule_map.symbols.name_of(lhs),
                rhs_a: format!("{:?}", other.text),
                rhs_b: format!("{:?}", candidate.text),
                reason: if insertion_mismatch {
                    "insertion rule ambiguous with non-insertion rule".into()
                } else {
                    "equal RHS with equal text or equal semantics".into()
                },
            });
        }
        if candidate.cost < other.cost {
            replace_idx = Some(idx);
        } else {
            warn!(
                "silent drop on `{}`: ambiguous candidate not cheaper than existing rule",
                rule_map.symbols.name_of(lhs)
            );
            return Ok(false);
        }
    }

    if candidate.cost.0 >= options.max_cost {
        warn!(
            "silent drop on `{}`: cost {} >= ceiling {}",
            rule_map.symbols.name_of(lhs),
            candidate.cost.0,
            options.max_cost
        );
        return Ok(false);
    }
    if !semantically_viable(&candidate) {
        warn!(
            "silent drop on `{}`: candidate cannot produce a demanded reduced semantic",
            rule_map.symbols.name_of(lhs)
        );
        return Ok(false);
    }

    match replace_idx {
        Some(idx) => rule_map.rules_for_mut(lhs)[idx] = candidate,
        None => rule_map.add_rule(candidate),
    }
    Ok(true)
}

/// Insertion admission (spec §4.6 "Insertion admission"): identical ambiguity check over
/// records sharing an LHS, preceded by the tree-distinctness pre-check the closure loop needs
/// since it revisits rules every iteration (spec §3 insertion store invariants).
pub fn try_admit_insertion(
    rule_map: &RuleMap,
    store: &mut InsertionStore,
    lhs: Symbol,
    candidate: InsertionRecord,
    options: &Options,
) -> Result<bool, EditRuleError> {
    if store.records_for(lhs).iter().any(|r| r.tree == candidate.tree) {
        return Ok(false);
    }

    let mut replace_idx: Option<usize> = None;
    for (idx, other) in store.records_for(lhs).iter().enumerate() {
        if !insertions_ambiguous(other, &candidate) {
            continue;
        }
        if options.stop_ambiguity {
            error!(
                "fatal ambiguity on insertion records for `{}`",
                rule_map.symbols.name_of(lhs)
            );
            return Err(EditRuleError::FatalAmbiguity {
                lhs_name: rule_map.symbols.name_of(lhs),
                rhs_a: format!("{:?}", other.text),
                rhs_b: format!("{:?}", candidate.text),
                reason: "equal text or equal semantics".into(),
            });
        }
        if candidate.cost < other.cost {
            replace_idx = Some(idx);
        } else {
            warn!(
                "silent drop on insertion for `{}`: ambiguous candidate not cheaper",
                rule_map.symbols.name_of(lhs)
            );
            return Ok(false);
        }
    }

    if candidate.cost.0 >= options.max_cost {
        warn!(
            "silent drop on insertion for `{}`: cost {} >= ceiling {}",
            rule_map.symbols.name_of(lhs),
            candidate.cost.0,
            options.max_cost
        );
        return Ok(false);
    }

    match replace_idx {
        Some(idx) => store.replace_at(lhs, idx, candidate),
        None => store.push(lhs, candidate),
    }
    Ok(true)
}
