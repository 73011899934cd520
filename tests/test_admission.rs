mod support;

use test_case::test_case;

use edit_rules::admission::{rules_ambiguous, try_admit_rule};
use edit_rules::error::EditRuleError;
use edit_rules::rule::{Rhs, RuleBuilder};
use edit_rules::semantic::{ReducedSemantic, Semantic, SemanticTerm};
use edit_rules::semantic_potential::SemanticPotential;
use edit_rules::text::Text;
use edit_rules::Options;

fn arg(id: &str) -> Semantic {
    Semantic::Reduced(ReducedSemantic::single(SemanticTerm::argument(id)))
}

#[test_case(Text::literal("foo"), arg("a"), Text::literal("foo"), arg("a"), true; "equal text and equal semantics")]
#[test_case(Text::literal("foo"), arg("a"), Text::literal("foo"), arg("b"), true; "equal text alone is enough")]
#[test_case(Text::literal("foo"), arg("a"), Text::literal("bar"), arg("a"), true; "equal semantics alone is enough")]
#[test_case(Text::literal("foo"), arg("a"), Text::literal("bar"), arg("b"), false; "neither text nor semantics match")]
fn ambiguity_relation_table(text_a: Text, sem_a: Semantic, text_b: Text, sem_b: Semantic, expect_ambiguous: bool) {
    let mut map = support::new_map();
    let lhs = map.symbols.intern("A");
    let b = map.symbols.intern("B");

    let a = RuleBuilder::new(lhs, Rhs::Unary(b))
        .text(text_a)
        .semantic(sem_a)
        .build();
    let other = RuleBuilder::new(lhs, Rhs::Unary(b))
        .text(text_b)
        .semantic(sem_b)
        .build();

    assert_eq!(rules_ambiguous(&a, &other), expect_ambiguous);
}

/// S6 — strict-mode ambiguity: two authored rules `A -> B` both with text "foo" and equal
/// semantics must be rejected with a fatal ambiguity error, regardless of which one is the
/// pre-existing rule and which is being offered.
#[test]
fn strict_mode_rejects_ambiguous_authored_rules() {
    let mut map = support::new_map();
    let lhs = map.symbols.intern("A");
    let b = map.symbols.intern("B");

    let first = RuleBuilder::new(lhs, Rhs::Unary(b))
        .text(Text::literal("foo"))
        .semantic(arg("a"))
        .build();
    map.add_rule(first);

    let second = RuleBuilder::new(lhs, Rhs::Unary(b))
        .text(Text::literal("foo"))
        .semantic(arg("a"))
        .build();

    let potential = SemanticPotential::analyze(&map);
    let options = Options {
        stop_ambiguity: true,
        ..Options::default()
    };
    let result = try_admit_rule(&mut map, second, &options, &potential);
    assert!(matches!(result, Err(EditRuleError::FatalAmbiguity { .. })));
}

/// In lenient mode the same pair resolves by cost: the cheaper candidate replaces the costlier
/// existing rule rather than erroring.
#[test]
fn lenient_mode_resolves_ambiguity_by_cost() {
    let mut map = support::new_map();
    let lhs = map.symbols.intern("A");
    let b = map.symbols.intern("B");

    let expensive = RuleBuilder::new(lhs, Rhs::Unary(b))
        .text(Text::literal("foo"))
        .semantic(arg("a"))
        .cost(3.0)
        .build();
    map.add_rule(expensive);

    let cheaper = RuleBuilder::new(lhs, Rhs::Unary(b))
        .text(Text::literal("foo"))
        .semantic(arg("a"))
        .cost(1.0)
        .build();

    let potential = SemanticPotential::analyze(&map);
    let options = Options::default();
    let admitted = try_admit_rule(&mut map, cheaper, &options, &potential).unwrap();
    assert!(admitted);
    assert_eq!(map.rules_for(lhs).len(), 1);
    assert!(support::approx_eq(map.rules_for(lhs)[0].cost.0, 1.0));
}

/// Mixing an insertion rule with a non-insertion rule is always fatal, even in lenient mode.
#[test]
fn insertion_vs_non_insertion_ambiguity_is_always_fatal() {
    let mut map = support::new_map();
    let lhs = map.symbols.intern("A");
    let b = map.symbols.intern("B");

    let non_insertion = RuleBuilder::new(lhs, Rhs::Unary(b))
        .text(Text::literal("foo"))
        .semantic(arg("a"))
        .build();
    map.add_rule(non_insertion);

    let mut insertion_like = RuleBuilder::new(lhs, Rhs::Unary(b))
        .text(Text::literal("foo"))
        .semantic(arg("a"))
        .build();
    insertion_like.inserted_sym_idx = Some(0);

    let potential = SemanticPotential::analyze(&map);
    let options = Options::default(); // lenient
    let result = try_admit_rule(&mut map, insertion_like, &options, &potential);
    assert!(matches!(result, Err(EditRuleError::FatalAmbiguity { .. })));
}
