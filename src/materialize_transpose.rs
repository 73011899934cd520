//! Pass 4: the transposition-rule materializer (spec §4.4).
//!
//! Grounded on `cfg-grammar/src/cfg.rs`'s `reverse()` (the RHS-reversal precedent) plus the
//! insertion materializer's admission call, reused verbatim here.

use log::debug;

use crate::admission::try_admit_rule;
use crate::error::EditRuleError;
use crate::rule::{OrderedCost, Rhs, Rule, RuleMap};
use crate::semantic_potential::SemanticPotential;
use crate::Options;

/// For every binary rule with a defined `transposition_cost`, emits a derived rule with the
/// reversed RHS (spec §4.4). Snapshots the originals first, same rationale as pass 3.
pub fn materialize_transpositions(
    rule_map: &mut RuleMap,
    potential: &SemanticPotential,
    options: &Options,
) -> Result<(), EditRuleError> {
    let mut originals: Vec<Rule> = Vec::new();
    for lhs in rule_map.lhs_symbols() {
        for rule in rule_map.rules_for(lhs) {
            if matches!(rule.rhs, Rhs::Binary(..)) && rule.transposition_cost.is_some() {
                originals.push(rule.clone());
            }
        }
    }

    let mut admitted = 0usize;
    for orig in &originals {
        let t = orig.transposition_cost.expect("filtered above");
        let derived = Rule {
            lhs: orig.lhs,
            rhs: orig.rhs.reversed(),
            is_terminal: false,
            cost: OrderedCost(orig.cost.0 + t.0),
            insertion_cost: None,
            transposition_cost: None,
            no_insert: true,
            no_insertion_indexes: [true, true],
            restrict_insertion: false,
            text: orig.text.clone(),
            gram_props: orig.gram_props.clone(),
            person_number: orig.person_number,
            semantic: orig.semantic.clone(),
            inserted_semantic: orig.inserted_semantic.clone(),
            inserted_sym_idx: None,
            rhs_can_produce_semantic: orig.rhs_can_produce_semantic,
            second_rhs_can_produce_semantic: orig.second_rhs_can_produce_semantic,
            rhs_does_not_produce_text: orig.rhs_does_not_produce_text,
            is_term_sequence: orig.is_term_sequence,
            tense: orig.tense.clone(),
            is_transposition: true,
            is_substitution: orig.is_substitution,
            is_stop_word: orig.is_stop_word,
            is_placeholder: orig.is_placeholder,
            tree: orig.tree.clone(),
        };

        if try_admit_rule(rule_map, derived, options, potential)? {
            admitted += 1;
        }
    }

    debug!("materialize_transpose: admitted {} derived rules", admitted);
    Ok(())
}
