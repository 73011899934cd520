//! Pre-pass-5 unused-nonterminal pruning (`SPEC_FULL.md` §E.2).
//!
//! Grounded on `cfg_classify_useful::Usefulness::remove_useless_rules` and the legacy
//! `usefulness.rs`: a symbol is useful iff it is both reachable from the declared roots
//! (walking RHS occurrences forward) and productive (it can derive some terminal string,
//! computed as the bottom-up [`RhsClosure`] fixed point seeded by every terminal rule's LHS).
//! This must run before the semantic-potential analyzer (pass 5) so an unreachable or
//! unproductive nonterminal is never consulted for `can_produce_semantic`.

use bit_vec::BitVec;
use log::debug;

use crate::rhs_closure::RhsClosure;
use crate::rule::RuleMap;
use crate::symbol::Symbol;

/// Computes, for every symbol, whether it can derive some terminal string: seed every LHS with
/// at least one terminal rule, then propagate via [`RhsClosure`] (a nonterminal rule admits its
/// LHS once every RHS symbol is itself productive).
fn compute_productive(rule_map: &RuleMap) -> BitVec {
    let n = rule_map.num_syms();
    let mut productive = BitVec::from_elem(n, false);
    for rule in rule_map.all_rules() {
        if rule.is_terminal {
            productive.set(rule.lhs.usize(), true);
        }
    }
    RhsClosure::new(rule_map).closure(&mut productive);
    productive
}

fn compute_reachable(rule_map: &RuleMap, roots: &[Symbol]) -> BitVec {
    let n = rule_map.num_syms();
    let mut reachable = BitVec::from_elem(n, false);
    let mut stack: Vec<Symbol> = Vec::new();

    for &root in roots {
        if !reachable[root.usize()] {
            reachable.set(root.usize(), true);
            stack.push(root);
        }
    }
    while let Some(sym) = stack.pop() {
        for rule in rule_map.rules_for(sym) {
            for child in rule.rhs.iter() {
                if !reachable[child.usize()] {
                    reachable.set(child.usize(), true);
                    stack.push(child);
                }
            }
        }
    }
    reachable
}

/// Removes every rule whose LHS is not both reachable from `roots` and productive. Returns the
/// number of rules dropped, for the caller's pass-boundary log line.
pub fn remove_unreachable(rule_map: &mut RuleMap, roots: &[Symbol]) -> usize {
    let reachable = compute_reachable(rule_map, roots);
    let productive = compute_productive(rule_map);

    let before: usize = rule_map.all_rules().count();
    rule_map.retain_rules(|rule| {
        let idx = rule.lhs.usize();
        reachable[idx] && productive[idx]
    });
    let after: usize = rule_map.all_rules().count();
    let dropped = before - after;

    debug!(
        "usefulness: {} roots, {} rules before, {} after ({} useless rules dropped)",
        roots.len(),
        before,
        after,
        dropped
    );
    dropped
}
