use edit_rules::rule::{Rhs, Rule, RuleMap};
use edit_rules::symbol::{Symbol, SymbolTable};

/// Builds a fresh `RuleMap` with the two reserved sentinels already interned, matching
/// `build_edit_rules`'s entry precondition. Callers should intern every other symbol they need
/// (via `rule_map.symbols.intern(...)`) before adding any rules, so the rule map's per-symbol
/// buckets are sized to cover the whole grammar from the first `add_rule` call on.
pub fn new_map() -> RuleMap {
    let mut symbols = SymbolTable::new();
    symbols.empty_symbol();
    symbols.blank_inserted_symbol();
    RuleMap::new(symbols)
}

pub fn find_rule<'a>(rule_map: &'a RuleMap, lhs: Symbol, rhs: Rhs) -> Option<&'a Rule> {
    rule_map.rules_for(lhs).iter().find(|r| r.rhs == rhs)
}

pub fn find_any<'a>(
    rule_map: &'a RuleMap,
    lhs: Symbol,
    pred: impl Fn(&Rule) -> bool,
) -> Option<&'a Rule> {
    rule_map.rules_for(lhs).iter().find(|r| pred(r))
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
