//! Pass 1: the blank-symbol collector (spec §4.1).
//!
//! No direct teacher analogue — the teacher's CFG model has no notion of insertion cost —
//! so this is grounded structurally on `cfg-grammar/src/symbol_bit_set.rs`'s `nulling()`:
//! a single scan over every terminal rule, classifying each by a couple of cheap predicates.

use log::debug;

use crate::insertion::{InsertionRecord, InsertionStore};
use crate::rule::{OrderedCost, Rhs, RuleMap, Tree};
use crate::semantic::Semantic;
use crate::symbol::EMPTY;
use crate::text::Text;

/// Scans every terminal rule, producing initial insertion records and removing the
/// empty-producing terminal rules (spec §4.1: "later stages treat `<empty>` as a no-op
/// placeholder").
pub fn collect_blanks(rule_map: &mut RuleMap, store: &mut InsertionStore) {
    let empty_sym = rule_map.symbols.get(EMPTY);
    let mut emitted = 0usize;

    for lhs in rule_map.lhs_symbols() {
        for rule in rule_map.rules_for(lhs) {
            if !rule.is_terminal {
                continue;
            }
            let is_empty_rhs = matches!(rule.rhs, Rhs::Unary(s) if Some(s) == empty_sym);
            if is_empty_rhs {
                let semantic = match &rule.semantic {
                    Some(Semantic::Reduced(r)) => Some(r.clone()),
                    _ => None,
                };
                store.push(
                    lhs,
                    InsertionRecord {
                        cost: rule.cost,
                        text: Text::empty(),
                        person_number: None,
                        semantic,
                        restrict_insertion: rule.restrict_insertion,
                        tree: Tree::leaf(rule.lhs),
                    },
                );
                emitted += 1;
            } else if let Some(insertion_cost) = rule.insertion_cost {
                let semantic = match &rule.semantic {
                    Some(Semantic::Reduced(r)) => Some(r.clone()),
                    _ => None,
                };
                store.push(
                    lhs,
                    InsertionRecord {
                        cost: OrderedCost(rule.cost.0 + insertion_cost.0),
                        text: rule.text.clone(),
                        person_number: rule.person_number,
                        semantic,
                        restrict_insertion: rule.restrict_insertion,
                        tree: Tree::leaf(rule.lhs),
                    },
                );
                emitted += 1;
            }
        }
    }

    if let Some(empty_sym) = empty_sym {
        rule_map.retain_rules(|rule| !(rule.is_terminal && matches!(rule.rhs, Rhs::Unary(s) if s == empty_sym)));
    }

    debug!(
        "blank: emitted {} initial insertion records across {} symbols",
        emitted,
        store.num_syms()
    );
}
