mod support;

use edit_rules::blank::collect_blanks;
use edit_rules::insertion::{run_closure, InsertionStore};
use edit_rules::rule::{Rhs, RuleBuilder};
use edit_rules::text::Text;
use edit_rules::{build_edit_rules, Options};

/// S4 — transposition: `A -> X Y` with `transposition_cost = 1.0`, cost 2.0 should yield
/// `A -> Y X` with cost 3.0 and `is_transposition = true`.
#[test]
fn transposition_reverses_rhs_and_sums_cost() {
    let mut map = support::new_map();
    let a = map.symbols.intern("A");
    let x = map.symbols.intern("X");
    let y = map.symbols.intern("Y");
    let x_lit = map.symbols.intern("x_lit");
    let y_lit = map.symbols.intern("y_lit");

    map.add_rule(
        RuleBuilder::new(x, Rhs::Unary(x_lit))
            .terminal()
            .cost(0.0)
            .text(Text::literal("x"))
            .build(),
    );
    map.add_rule(
        RuleBuilder::new(y, Rhs::Unary(y_lit))
            .terminal()
            .cost(0.0)
            .text(Text::literal("y"))
            .build(),
    );
    map.add_rule(
        RuleBuilder::new(a, Rhs::Binary(x, y))
            .cost(2.0)
            .transposition_cost(1.0)
            .build(),
    );

    build_edit_rules(&mut map, Options::default()).expect("well-formed grammar should synthesize cleanly");

    let derived = support::find_rule(&map, a, Rhs::Binary(y, x)).expect("A -> Y X should be synthesized");
    assert!(support::approx_eq(derived.cost.0, 3.0));
    assert!(derived.is_transposition);
}

/// A transposable rule does not itself participate in insertion-closure synthesis: since it
/// carries a `transposition_cost`, `is_insertable` rejects it, so it never contributes a
/// compound insertion record to some ancestor rule, even when both its RHS symbols already
/// have records of their own.
#[test]
fn transposable_rule_contributes_no_compound_insertion_record() {
    let mut map = support::new_map();
    let a = map.symbols.intern("A");
    let x = map.symbols.intern("X");
    let y = map.symbols.intern("Y");
    let empty = map.symbols.get("<empty>").unwrap();

    map.add_rule(RuleBuilder::new(x, Rhs::Unary(empty)).terminal().cost(0.5).build());
    map.add_rule(RuleBuilder::new(y, Rhs::Unary(empty)).terminal().cost(0.5).build());
    map.add_rule(
        RuleBuilder::new(a, Rhs::Binary(x, y))
            .cost(2.0)
            .transposition_cost(1.0)
            .build(),
    );

    let mut store = InsertionStore::new(map.num_syms());
    collect_blanks(&mut map, &mut store);
    run_closure(&map, &mut store, &Options::default()).unwrap();

    assert!(store.records_for(a).is_empty());
}
