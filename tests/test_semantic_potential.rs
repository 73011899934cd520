mod support;

use edit_rules::error::EditRuleError;
use edit_rules::rule::{Rhs, RuleBuilder};
use edit_rules::semantic::{Semantic, SemanticTerm};
use edit_rules::semantic_potential::SemanticPotential;
use edit_rules::{build_edit_rules, Options};

/// A non-edit rule whose semantic is still unreduced must have some RHS descendant able to
/// supply the reduced semantic it's waiting on, or synthesis fails fatally.
#[test]
fn missing_semantic_descendant_is_fatal() {
    let mut map = support::new_map();
    let a = map.symbols.intern("A");
    let b = map.symbols.intern("B");
    let b_lit = map.symbols.intern("b_lit");

    map.add_rule(
        RuleBuilder::new(b, Rhs::Unary(b_lit))
            .terminal()
            .cost(0.0)
            .build(),
    );
    // A's semantic is an unreduced function expecting one argument, but B never supplies one.
    map.add_rule(
        RuleBuilder::new(a, Rhs::Unary(b))
            .cost(0.0)
            .semantic(Semantic::Unreduced(SemanticTerm::function("verb", 0.0, 1)))
            .build(),
    );

    let result = build_edit_rules(&mut map, Options::default());
    assert!(matches!(result, Err(EditRuleError::FatalMissingSemantic { .. })));
}

/// Cyclic symbol graphs (e.g. relative-clause recursion) must resolve without hanging: a cycle
/// with no semantic-bearing rule anywhere on it resolves to `false` on the back-edge.
#[test]
fn cyclic_grammar_with_no_semantic_resolves_false() {
    let mut map = support::new_map();
    let a = map.symbols.intern("A");
    let c = map.symbols.intern("C");

    map.add_rule(RuleBuilder::new(a, Rhs::Unary(c)).cost(0.0).build());
    map.add_rule(RuleBuilder::new(c, Rhs::Unary(a)).cost(0.0).build());

    let potential = SemanticPotential::analyze(&map);
    assert!(!potential.can_produce_semantic(a));
    assert!(!potential.can_produce_semantic(c));
}

/// A cycle that does carry a semantic somewhere along it still resolves to `true` for every
/// symbol on the cycle, since each can reach that rule without needing to close the loop twice.
#[test]
fn cyclic_grammar_with_a_semantic_resolves_true() {
    let mut map = support::new_map();
    let a = map.symbols.intern("A");
    let c = map.symbols.intern("C");

    map.add_rule(RuleBuilder::new(a, Rhs::Unary(c)).cost(0.0).build());
    map.add_rule(
        RuleBuilder::new(c, Rhs::Unary(a))
            .cost(0.0)
            .semantic(Semantic::Reduced(edit_rules::semantic::ReducedSemantic::single(
                SemanticTerm::argument("x"),
            )))
            .build(),
    );

    let potential = SemanticPotential::analyze(&map);
    assert!(potential.can_produce_semantic(a));
    assert!(potential.can_produce_semantic(c));
}
