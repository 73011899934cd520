//! Pass 3: the insertion-rule materializer (spec §4.3, §4.3.1, §4.3.2, §4.3.3).
//!
//! Grounded on `cfg-grammar/src/rule/builder.rs`'s builder-style rule construction and
//! `cfg-classify-cyclical/src/lib.rs`'s rewrite-then-retain pattern for the multi-token
//! flattening step.

use std::collections::BTreeMap;

use log::debug;

use crate::admission::try_admit_rule;
use crate::error::EditRuleError;
use crate::insertion::{is_vacuous, InsertionStore};
use crate::rule::{OrderedCost, Rhs, Rule, RuleMap};
use crate::semantic::{ReducedSemantic, Semantic};
use crate::semantic_potential::SemanticPotential;
use crate::symbol::{Symbol, BLANK_INSERTED};
use crate::text::{conjugate, GramProps, Text};
use crate::Options;

/// Semantic-append rule (spec §4.3.2).
fn semantic_append(
    lhs_name: &str,
    original: &Option<Semantic>,
    insertion_semantic: &Option<ReducedSemantic>,
    non_inserted_can_produce_semantic: bool,
) -> Result<(Option<Semantic>, Option<ReducedSemantic>), EditRuleError> {
    let Some(ins) = insertion_semantic else {
        return Ok((original.clone(), None));
    };
    let illegal = || EditRuleError::FatalSemantic {
        lhs_name: lhs_name.to_string(),
        detail: "illegal semantic merge during insertion materialization".into(),
    };
    match original {
        Some(Semantic::Reduced(r)) => {
            let merged = r.merge(ins).map_err(|()| illegal())?;
            Ok((Some(Semantic::Reduced(merged)), None))
        }
        Some(Semantic::Unreduced(_)) if !non_inserted_can_produce_semantic => {
            let reduced = original.as_ref().unwrap().reduce(ins).map_err(|()| illegal())?;
            Ok((Some(Semantic::Reduced(reduced)), None))
        }
        Some(Semantic::Unreduced(_)) => Ok((original.clone(), Some(ins.clone()))),
        None => Ok((Some(Semantic::Reduced(ins.clone())), None)),
    }
}

/// Multi-token terminal flattening (spec §4.3.3), acknowledged technical debt (spec §9):
/// clones `derived` once per rule the non-inserted symbol itself produces, folding in that
/// child's cost and RHS, promoting to terminal if the child was terminal. Forbidden when
/// `derived` ends in `<blank-inserted>` or still has a two-symbol RHS.
fn flatten_multi_token(rule_map: &RuleMap, derived: &Rule, non_inserted_sym: Symbol) -> Vec<Rule> {
    if derived.rhs.len() != 1 || derived.ends_with_blank_inserted(&rule_map.symbols) {
        return vec![derived.clone()];
    }
    let children = rule_map.rules_for(non_inserted_sym);
    if children.is_empty() {
        return vec![derived.clone()];
    }
    children
        .iter()
        .map(|child| {
            let mut flattened = derived.clone();
            flattened.rhs = child.rhs;
            flattened.cost = OrderedCost(derived.cost.0 + child.cost.0);
            flattened.is_terminal = child.is_terminal;
            flattened
        })
        .collect()
}

/// Runs the insertion-rule materializer (spec §4.3) over every original binary nonterminal
/// rule. Snapshots those rules first: materialization must not re-consult rules this same pass
/// appends to the map.
pub fn materialize_insertions(
    rule_map: &mut RuleMap,
    store: &InsertionStore,
    potential: &SemanticPotential,
    options: &Options,
) -> Result<(), EditRuleError> {
    let mut originals: Vec<Rule> = Vec::new();
    for lhs in rule_map.lhs_symbols() {
        for rule in rule_map.rules_for(lhs) {
            if !rule.is_terminal && matches!(rule.rhs, Rhs::Binary(..)) {
                originals.push(rule.clone());
            }
        }
    }

    let mut admitted = 0usize;
    let blank_inserted = rule_map.symbols.get(BLANK_INSERTED);

    for orig in &originals {
        let Rhs::Binary(x, y) = orig.rhs else {
            unreachable!("filtered to binary rules above")
        };
        let lhs_name = rule_map.symbols.name_of(orig.lhs);

        for (i, inserted_sym, non_inserted_sym) in [(0usize, x, y), (1usize, y, x)] {
            if orig.vetoes_insertion_at(i) {
                continue;
            }
            // Would introduce left/right recursion through an insertion (spec §4.3, §9).
            if non_inserted_sym == orig.lhs {
                continue;
            }

            for ins in store.records_for(inserted_sym) {
                if is_vacuous(&orig.semantic, ins.semantic.is_some()) {
                    continue;
                }

                let restrict_insertion = i == 1 && (orig.restrict_insertion || ins.restrict_insertion);
                let rhs = match (restrict_insertion, blank_inserted) {
                    (true, Some(blank)) => Rhs::Binary(non_inserted_sym, blank),
                    _ => Rhs::Unary(non_inserted_sym),
                };

                let cost = orig.cost.0 + ins.cost.0;
                let person_number = if i == 1 {
                    orig.person_number
                } else {
                    orig.person_number.or(ins.person_number)
                };

                // Only the surviving (non-inserted) slot's entry is relevant to the derived rule
                // going forward (spec §4.3); the inserted slot's entry is kept separately below,
                // for conjugating the inserted text itself.
                let mut gram_props = BTreeMap::new();
                if let Some(props) = orig.gram_props.get(&((1 - i) as u8)) {
                    gram_props.insert(0u8, props.clone());
                }
                let inserted_props = orig.gram_props.get(&(i as u8)).cloned();

                let rhs_can_produce_semantic = potential.can_produce_semantic(non_inserted_sym);
                let (semantic, inserted_semantic) =
                    semantic_append(&lhs_name, &orig.semantic, &ins.semantic, rhs_can_produce_semantic)?;

                let mut derived = Rule {
                    lhs: orig.lhs,
                    rhs,
                    is_terminal: false,
                    cost: OrderedCost(cost),
                    insertion_cost: None,
                    transposition_cost: None,
                    no_insert: orig.no_insert,
                    no_insertion_indexes: [false, false],
                    restrict_insertion,
                    text: Text::empty(),
                    gram_props,
                    person_number,
                    semantic,
                    inserted_semantic,
                    inserted_sym_idx: Some(i as u8),
                    rhs_can_produce_semantic: Some(rhs_can_produce_semantic),
                    second_rhs_can_produce_semantic: None,
                    rhs_does_not_produce_text: orig.rhs_does_not_produce_text,
                    is_term_sequence: orig.is_term_sequence,
                    tense: orig.tense.clone(),
                    is_transposition: false,
                    is_substitution: orig.is_substitution,
                    is_stop_word: orig.is_stop_word,
                    is_placeholder: orig.is_placeholder,
                    tree: orig.tree.clone(),
                };

                if orig.rhs_does_not_produce_text {
                    derived.text = orig.text.clone();
                    derived.tense = orig.tense.clone();
                    if derived.rhs.len() == 1 {
                        for flattened in flatten_multi_token(rule_map, &derived, non_inserted_sym) {
                            if try_admit_rule(rule_map, flattened, options, potential)? {
                                admitted += 1;
                            }
                        }
                        continue;
                    }
                } else if orig.is_term_sequence {
                    derived.text = orig.text.clone();
                } else {
                    let empty_props = GramProps::default();
                    let props = inserted_props.as_ref().unwrap_or(&empty_props);
                    derived.text = conjugate(&ins.text, props, person_number);
                }

                if try_admit_rule(rule_map, derived, options, potential)? {
                    admitted += 1;
                }
            }
        }
    }

    debug!("materialize_insert: admitted {} derived rules", admitted);
    Ok(())
}
