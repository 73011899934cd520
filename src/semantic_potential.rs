//! Pass 5: the semantic-potential analyzer (spec §4.5).
//!
//! Grounded on `cfg-predict-sets/src/first.rs`'s per-symbol memoized sets, iterated to a fixed
//! point the way `crate::rhs_closure::RhsClosure::closure_any` does: a rule contributes its LHS
//! to the property once any single RHS child already has it, not the AND-closure `closure` uses
//! for productivity. Iterating a work stack rather than recursing means the result doesn't depend
//! on symbol interning order and cyclic rule graphs settle at their true least fixed point
//! instead of latching a `false` on whichever symbol happens to close the cycle first.
//! Must run before pass 2 (spec §2 dependency order, §5 "Pass 5 must precede pass 2").

use bit_vec::BitVec;
use log::debug;

use crate::error::EditRuleError;
use crate::rhs_closure::RhsClosure;
use crate::rule::{Rhs, RuleMap};
use crate::semantic::Semantic;
use crate::symbol::Symbol;

/// Per-symbol memoized semantic reachability (spec §4.5).
pub struct SemanticPotential {
    can_produce_semantic: Vec<bool>,
    can_produce_reduced_semantic: Vec<bool>,
}

impl SemanticPotential {
    /// Computes both memo tables to a least fixed point with an OR-shaped reverse-BFS closure
    /// (spec §9 "Cyclic rule graphs" settle correctly since the whole rule set is reconsidered
    /// to convergence rather than abandoned on a single recursive back-edge).
    pub fn analyze(rule_map: &RuleMap) -> Self {
        let n = rule_map.num_syms();
        let mut closure = RhsClosure::new(rule_map);

        let mut can = BitVec::from_elem(n, false);
        seed_self_satisfying(rule_map, &mut can, false);
        closure.closure_any(&mut can);

        let mut reduced = BitVec::from_elem(n, false);
        seed_self_satisfying(rule_map, &mut reduced, true);
        closure.closure_any(&mut reduced);

        debug!("semantic_potential: analyzed {} symbols", n);

        SemanticPotential {
            can_produce_semantic: can.iter().collect(),
            can_produce_reduced_semantic: reduced.iter().collect(),
        }
    }

    pub fn can_produce_semantic(&self, sym: Symbol) -> bool {
        self.can_produce_semantic.get(sym.usize()).copied().unwrap_or(false)
    }

    pub fn can_produce_reduced_semantic(&self, sym: Symbol) -> bool {
        self.can_produce_reduced_semantic
            .get(sym.usize())
            .copied()
            .unwrap_or(false)
    }

    /// Caches `rhs_can_produce_semantic` (either side) and `second_rhs_can_produce_semantic`
    /// onto every binary nonterminal rule, for the semantic-append rule (§4.3.2) and downstream
    /// materializers to consult (spec §4.5 second paragraph).
    pub fn annotate(&self, rule_map: &mut RuleMap) {
        for lhs in rule_map.lhs_symbols() {
            for rule in rule_map.rules_for_mut(lhs) {
                if let Rhs::Binary(a, b) = rule.rhs {
                    rule.rhs_can_produce_semantic =
                        Some(self.can_produce_semantic(a) || self.can_produce_semantic(b));
                    rule.second_rhs_can_produce_semantic = Some(self.can_produce_semantic(b));
                }
            }
        }
    }

    /// Validates, before edit synthesis runs, that every non-edit rule whose own semantic is
    /// still unreduced has some RHS child able to supply the reduced semantic it's waiting on
    /// (spec §4.5 last paragraph, §7 kind 2).
    pub fn validate(&self, rule_map: &RuleMap) -> Result<(), EditRuleError> {
        for lhs in rule_map.lhs_symbols() {
            for rule in rule_map.rules_for(lhs) {
                let needs_child_semantic = matches!(&rule.semantic, Some(Semantic::Unreduced(_)));
                if !needs_child_semantic {
                    continue;
                }
                let any_child_viable = rule
                    .rhs
                    .iter()
                    .any(|child| self.can_produce_reduced_semantic(child));
                if !any_child_viable {
                    let path: Vec<String> = std::iter::once(rule_map.symbols.name_of(rule.lhs))
                        .chain(rule.rhs.iter().map(|s| rule_map.symbols.name_of(s)))
                        .collect();
                    return Err(EditRuleError::FatalMissingSemantic {
                        lhs_name: rule_map.symbols.name_of(rule.lhs),
                        path,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Seeds `property` with every symbol that has some rule satisfying the property directly
/// (without needing any RHS child's help), the base case `closure_any` then floods outward from.
fn seed_self_satisfying(rule_map: &RuleMap, property: &mut BitVec, reduced: bool) {
    for rule in rule_map.all_rules() {
        let satisfies_self = if reduced {
            rule.semantic_is_reduced() || rule.inserted_semantic.is_some() || rule.is_placeholder
        } else {
            rule.semantic.is_some() || rule.inserted_semantic.is_some() || rule.is_placeholder
        };
        if satisfies_self {
            property.set(rule.lhs.usize(), true);
        }
    }
}
