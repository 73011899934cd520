//! Generic reverse-BFS fixed-point engine over a per-symbol property bitset.
//!
//! Directly grounded on the teacher's `RhsClosure` (`_teacher_src_legacy/rhs_closure.rs`):
//! index every rule by the symbols appearing on its RHS, seed a work stack from the symbols
//! that already have the property, and propagate to a parent LHS. Two propagation shapes share
//! the same reverse index: [`RhsClosure::closure`] is an AND-closure (every RHS symbol of a rule
//! must have the property before its LHS gets it), used by [`crate::usefulness`] for
//! productivity; [`RhsClosure::closure_any`] is an OR-closure (any one RHS symbol suffices), used
//! by [`crate::semantic_potential`] since a rule there produces a semantic if any single child
//! does, not all of them. Both iterate a work stack to a fixed point instead of recursing, so
//! neither is sensitive to symbol interning order or cyclic rule graphs.

use std::collections::HashMap;

use bit_vec::BitVec;

use crate::rule::RuleMap;
use crate::symbol::Symbol;

pub struct RhsClosure {
    derived_by: HashMap<Symbol, Vec<(Symbol, Vec<Symbol>)>>,
    work_stack: Vec<Symbol>,
}

impl RhsClosure {
    /// Indexes every rule in `rule_map` by the symbols that occur on its RHS.
    pub fn new(rule_map: &RuleMap) -> Self {
        let mut derived_by: HashMap<Symbol, Vec<(Symbol, Vec<Symbol>)>> = HashMap::new();
        for rule in rule_map.all_rules() {
            let rhs: Vec<Symbol> = rule.rhs.iter().collect();
            for &sym in &rhs {
                derived_by.entry(sym).or_default().push((rule.lhs, rhs.clone()));
            }
        }
        RhsClosure {
            derived_by,
            work_stack: vec![],
        }
    }

    /// Propagates `property` to its transitive closure under "all RHS symbols have the
    /// property implies the LHS does too".
    pub fn closure(&mut self, property: &mut BitVec) {
        for (sym_id, has_property) in property.iter().enumerate() {
            if has_property {
                self.work_stack.push(Symbol::from_usize(sym_id));
            }
        }
        while let Some(work_sym) = self.work_stack.pop() {
            let Some(rules) = self.derived_by.get(&work_sym) else {
                continue;
            };
            for (lhs, rhs) in rules {
                let lhs_idx = lhs.usize();
                if lhs_idx < property.len()
                    && !property[lhs_idx]
                    && rhs.iter().all(|sym| property[sym.usize()])
                {
                    property.set(lhs_idx, true);
                    self.work_stack.push(*lhs);
                }
            }
        }
    }

    /// Propagates `property` to its transitive closure under "any RHS symbol has the property
    /// implies the LHS does too".
    pub fn closure_any(&mut self, property: &mut BitVec) {
        for (sym_id, has_property) in property.iter().enumerate() {
            if has_property {
                self.work_stack.push(Symbol::from_usize(sym_id));
            }
        }
        while let Some(work_sym) = self.work_stack.pop() {
            let Some(rules) = self.derived_by.get(&work_sym) else {
                continue;
            };
            for (lhs, _rhs) in rules {
                let lhs_idx = lhs.usize();
                if lhs_idx < property.len() && !property[lhs_idx] {
                    property.set(lhs_idx, true);
                    self.work_stack.push(*lhs);
                }
            }
        }
    }
}
