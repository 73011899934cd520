//! Insertion records, the insertion store, and pass 2 (spec §3 "Insertion record"/"Insertion
//! store", §4.2 "Insertion-closure engine").
//!
//! Grounded on `cfg-predict-sets/src/first.rs`'s dirty-flag fixed-point loop
//! (`FirstSets::collect_from`) and the legacy `rhs_closure.rs`'s monotonic-admission
//! termination argument: the outer loop rescans every insertable rule until a full pass admits
//! nothing new.

use log::debug;

use crate::admission::try_admit_insertion;
use crate::error::EditRuleError;
use crate::rule::{OrderedCost, Rhs, Rule, RuleMap, Tree};
use crate::semantic::{ReducedSemantic, Semantic};
use crate::symbol::Symbol;
use crate::text::{conjugate, GramProps, PersonNumber, Text};
use crate::Options;

/// A unit of derivable material a symbol's subtree can contribute "out of thin air" to a
/// parent rule (spec §3 "Insertion record").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertionRecord {
    pub cost: OrderedCost,
    pub text: Text,
    pub person_number: Option<PersonNumber>,
    /// Always reduced (spec §4.3.2 "the insertion's (always reduced) semantic").
    pub semantic: Option<ReducedSemantic>,
    pub restrict_insertion: bool,
    pub tree: Tree,
}

/// Mapping from LHS symbol to its ordered list of insertion records (spec §3 "Insertion
/// store").
#[derive(Default)]
pub struct InsertionStore {
    records: Vec<Vec<InsertionRecord>>,
}

impl InsertionStore {
    pub fn new(num_syms: usize) -> Self {
        InsertionStore {
            records: vec![Vec::new(); num_syms],
        }
    }

    fn ensure_capacity(&mut self, sym: Symbol) {
        if self.records.len() <= sym.usize() {
            self.records.resize_with(sym.usize() + 1, Vec::new);
        }
    }

    pub fn records_for(&self, lhs: Symbol) -> &[InsertionRecord] {
        self.records.get(lhs.usize()).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn push(&mut self, lhs: Symbol, record: InsertionRecord) {
        self.ensure_capacity(lhs);
        self.records[lhs.usize()].push(record);
    }

    pub fn replace_at(&mut self, lhs: Symbol, idx: usize, record: InsertionRecord) {
        self.ensure_capacity(lhs);
        self.records[lhs.usize()][idx] = record;
    }

    pub fn num_syms(&self) -> usize {
        self.records.len()
    }
}

/// A single child's (or the Cartesian-merged pair's) contribution, immediately before it's
/// folded into the owning rule's own cost/props (spec §4.2's "per-rule step").
struct MergedChild {
    cost: f64,
    text: Text,
    person_number: Option<PersonNumber>,
    semantic: Option<ReducedSemantic>,
    restrict_insertion: bool,
    children: Vec<Tree>,
}

fn is_insertable(rule: &Rule) -> bool {
    !rule.is_terminal
        && !rule.no_insert
        && rule.transposition_cost.is_none()
        && rule.no_insertion_indexes.iter().all(|&vetoed| !vetoed)
}

/// Semantic-less-clause predicate (spec §4.3.1): an insertion is vacuous when the rule's own
/// semantic is an argumentless unreduced function (spec §9's `intersect()`) and the merge
/// contributes no further semantic of its own.
pub(crate) fn is_vacuous(rule_semantic: &Option<Semantic>, merged_has_semantic: bool) -> bool {
    if merged_has_semantic {
        return false;
    }
    matches!(rule_semantic, Some(Semantic::Unreduced(term)) if term.is_argumentless_unreduced_function())
}

/// Spec §4.2 binary case, steps 1-4: merges two child insertion records.
fn merge_children(a: &InsertionRecord, b: &InsertionRecord) -> Option<MergedChild> {
    let semantic = match (&a.semantic, &b.semantic) {
        (Some(sa), Some(sb)) => match sa.merge(sb) {
            Ok(merged) => Some(merged),
            Err(()) => return None,
        },
        (Some(sa), None) => Some(sa.clone()),
        (None, Some(sb)) => Some(sb.clone()),
        (None, None) => None,
    };
    Some(MergedChild {
        cost: a.cost.0 + b.cost.0,
        text: a.text.concat(&b.text),
        person_number: a.person_number,
        semantic,
        restrict_insertion: a.restrict_insertion || b.restrict_insertion,
        children: vec![a.tree.clone(), b.tree.clone()],
    })
}

/// Spec §4.2's per-rule step, shared by the unary and binary cases (in the unary case the
/// "merged" record is simply the single child, treated the same way).
fn combine_for_rule(rule: &Rule, merged: &MergedChild) -> Result<Option<InsertionRecord>, EditRuleError> {
    if is_vacuous(&rule.semantic, merged.semantic.is_some()) {
        return Ok(None);
    }

    let cost = rule.cost.0 + merged.cost;
    let person_number = rule.person_number.or(merged.person_number);
    let restrict_insertion = rule.restrict_insertion || merged.restrict_insertion;

    let raw_text = if !rule.text.is_empty() {
        rule.text.clone()
    } else {
        merged.text.clone()
    };
    let empty_props = GramProps::default();
    let gram_props = rule.gram_props.get(&0).unwrap_or(&empty_props);
    let text = conjugate(&raw_text, gram_props, person_number);

    let semantic = match (&rule.semantic, &merged.semantic) {
        (Some(Semantic::Unreduced(_)), Some(args)) => {
            let reduced = rule
                .semantic
                .as_ref()
                .unwrap()
                .reduce(args)
                .map_err(|()| EditRuleError::FatalSemantic {
                    lhs_name: format!("g{}", rule.lhs.usize()),
                    detail: "illegal reduction of unreduced function by merged insertion arguments".into(),
                })?;
            Some(reduced)
        }
        (Some(Semantic::Unreduced(_)), None) => {
            // Not argumentless (the vacuous guard above would have caught that) but still has
            // nothing to reduce it this round; the candidate carries no satisfiable semantic.
            return Ok(None);
        }
        (Some(Semantic::Reduced(r)), Some(args)) => match r.merge(args) {
            Ok(merged) => Some(merged),
            Err(()) => return Ok(None),
        },
        (Some(Semantic::Reduced(r)), None) => Some(r.clone()),
        (None, Some(args)) => Some(args.clone()),
        (None, None) => None,
    };

    Ok(Some(InsertionRecord {
        cost: OrderedCost(cost),
        text,
        person_number,
        semantic,
        restrict_insertion,
        tree: Tree::node(rule.lhs, merged.children.clone()),
    }))
}

/// Runs the insertion-closure engine (spec §4.2) to a fixed point.
pub fn run_closure(rule_map: &RuleMap, store: &mut InsertionStore, options: &Options) -> Result<(), EditRuleError> {
    loop {
        let mut admitted_this_pass = 0usize;

        for lhs in rule_map.lhs_symbols() {
            for rule in rule_map.rules_for(lhs) {
                if !is_insertable(rule) {
                    continue;
                }
                match rule.rhs {
                    Rhs::Unary(a) => {
                        for child in store.records_for(a).to_vec() {
                            let merged = MergedChild {
                                cost: child.cost.0,
                                text: child.text.clone(),
                                person_number: child.person_number,
                                semantic: child.semantic.clone(),
                                restrict_insertion: child.restrict_insertion,
                                children: vec![child.tree.clone()],
                            };
                            if let Some(candidate) = combine_for_rule(rule, &merged)? {
                                if try_admit_insertion(rule_map, store, rule.lhs, candidate, options)? {
                                    admitted_this_pass += 1;
                                }
                            }
                        }
                    }
                    Rhs::Binary(a, b) => {
                        let left = store.records_for(a).to_vec();
                        let right = store.records_for(b).to_vec();
                        for la in &left {
                            for rb in &right {
                                let Some(merged) = merge_children(la, rb) else {
                                    continue;
                                };
                                if let Some(candidate) = combine_for_rule(rule, &merged)? {
                                    if try_admit_insertion(rule_map, store, rule.lhs, candidate, options)? {
                                        admitted_this_pass += 1;
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }

        debug!("insertion closure: iteration admitted {} records", admitted_this_pass);
        if admitted_this_pass == 0 {
            break;
        }
    }
    Ok(())
}
