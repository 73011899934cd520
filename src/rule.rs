//! The rule model and the shared rule map (spec §3, §6).
//!
//! Rules come in many variants (plain, terminal, transposed, substitution, stop-word,
//! term-sequence, placeholder). Per spec §9 these are represented as a single tagged record
//! rather than an inheritance hierarchy; call sites branch on the relevant flag.

use std::collections::BTreeMap;

use crate::semantic::{ReducedSemantic, Semantic};
use crate::symbol::{Symbol, SymbolTable, BLANK_INSERTED};
use crate::text::{GramProps, PersonNumber, Text};

/// A derivation witness: a forest of `{symbol, children?}` nodes (spec §3 `tree`). Stripped
/// from the output map at the end of synthesis unless `Options::include_trees` is set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tree {
    pub symbol: Symbol,
    pub children: Vec<Tree>,
}

impl Tree {
    pub fn leaf(symbol: Symbol) -> Self {
        Tree {
            symbol,
            children: vec![],
        }
    }

    pub fn node(symbol: Symbol, children: Vec<Tree>) -> Self {
        Tree { symbol, children }
    }
}

/// A rule's right-hand side: unary (including terminal) or binary (spec §3 `rhs`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rhs {
    Unary(Symbol),
    Binary(Symbol, Symbol),
}

impl Rhs {
    pub fn len(&self) -> usize {
        match self {
            Rhs::Unary(_) => 1,
            Rhs::Binary(..) => 2,
        }
    }

    pub fn get(&self, idx: usize) -> Option<Symbol> {
        match (self, idx) {
            (Rhs::Unary(a), 0) => Some(*a),
            (Rhs::Binary(a, _), 0) => Some(*a),
            (Rhs::Binary(_, b), 1) => Some(*b),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> {
        let (a, b) = match *self {
            Rhs::Unary(a) => (Some(a), None),
            Rhs::Binary(a, b) => (Some(a), Some(b)),
        };
        a.into_iter().chain(b)
    }

    /// Reverses a binary RHS (spec §4.4). Unary RHS reverses to itself.
    pub fn reversed(&self) -> Rhs {
        match *self {
            Rhs::Unary(a) => Rhs::Unary(a),
            Rhs::Binary(a, b) => Rhs::Binary(b, a),
        }
    }
}

/// A single production rule (spec §3 `Rule`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub lhs: Symbol,
    pub rhs: Rhs,
    pub is_terminal: bool,
    /// Fixed-point bits compare on an ordered `f64`; rules never carry `NaN` costs.
    pub cost: OrderedCost,
    pub insertion_cost: Option<OrderedCost>,
    pub transposition_cost: Option<OrderedCost>,
    pub no_insert: bool,
    pub no_insertion_indexes: [bool; 2],
    pub restrict_insertion: bool,
    pub text: Text,
    /// Per-RHS-slot conjugation policy, keyed by slot index (spec §3 `gram_props`).
    pub gram_props: BTreeMap<u8, GramProps>,
    pub person_number: Option<PersonNumber>,
    pub semantic: Option<Semantic>,
    pub inserted_semantic: Option<ReducedSemantic>,
    pub inserted_sym_idx: Option<u8>,
    pub rhs_can_produce_semantic: Option<bool>,
    pub second_rhs_can_produce_semantic: Option<bool>,
    pub rhs_does_not_produce_text: bool,
    pub is_term_sequence: bool,
    pub tense: Option<String>,
    pub is_transposition: bool,
    pub is_substitution: bool,
    pub is_stop_word: bool,
    pub is_placeholder: bool,
    pub tree: Option<Tree>,
}

/// A thin `f64` wrapper giving `Rule` structural `Eq`/`Ord` without pretending costs are
/// anything but ordinary floats; rule costs are always finite and non-negative (spec §3).
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderedCost(pub f64);

impl PartialEq for OrderedCost {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}
impl Eq for OrderedCost {}

impl PartialOrd for OrderedCost {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}
impl Ord for OrderedCost {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(std::cmp::Ordering::Equal)
    }
}

impl From<f64> for OrderedCost {
    fn from(v: f64) -> Self {
        OrderedCost(v)
    }
}

impl Rule {
    /// Returns true iff this rule's semantic, if present, is already reduced (spec §3
    /// `semantic_is_reduced`, tracked here as a derived property of `semantic`'s variant
    /// rather than a separate bit that could drift out of sync with it).
    pub fn semantic_is_reduced(&self) -> bool {
        matches!(self.semantic, Some(Semantic::Reduced(_)))
    }

    /// True iff `rhs[idx]` is vetoed from participating in insertion synthesis.
    pub fn vetoes_insertion_at(&self, idx: usize) -> bool {
        self.no_insertion_indexes.get(idx).copied().unwrap_or(false)
    }

    /// Whether the RHS ends in the reserved end-anchor symbol (spec glossary "End-anchor").
    pub fn ends_with_blank_inserted(&self, symbols: &SymbolTable) -> bool {
        match self.rhs {
            Rhs::Binary(_, b) => symbols.get(BLANK_INSERTED) == Some(b),
            Rhs::Unary(_) => false,
        }
    }
}

/// Builder for hand-authored or derived rules, mirroring the teacher's `RuleBuilder` pattern
/// of chained setters culminating in a single terminal constructor call.
pub struct RuleBuilder {
    rule: Rule,
}

impl RuleBuilder {
    pub fn new(lhs: Symbol, rhs: Rhs) -> Self {
        RuleBuilder {
            rule: Rule {
                lhs,
                rhs,
                is_terminal: false,
                cost: OrderedCost(0.0),
                insertion_cost: None,
                transposition_cost: None,
                no_insert: false,
                no_insertion_indexes: [false, false],
                restrict_insertion: false,
                text: Text::empty(),
                gram_props: BTreeMap::new(),
                person_number: None,
                semantic: None,
                inserted_semantic: None,
                inserted_sym_idx: None,
                rhs_can_produce_semantic: None,
                second_rhs_can_produce_semantic: None,
                rhs_does_not_produce_text: false,
                is_term_sequence: false,
                tense: None,
                is_transposition: false,
                is_substitution: false,
                is_stop_word: false,
                is_placeholder: false,
                tree: None,
            },
        }
    }

    pub fn terminal(mut self) -> Self {
        self.rule.is_terminal = true;
        self
    }

    pub fn cost(mut self, cost: f64) -> Self {
        self.rule.cost = OrderedCost(cost);
        self
    }

    pub fn insertion_cost(mut self, cost: f64) -> Self {
        self.rule.insertion_cost = Some(OrderedCost(cost));
        self
    }

    pub fn transposition_cost(mut self, cost: f64) -> Self {
        self.rule.transposition_cost = Some(OrderedCost(cost));
        self
    }

    pub fn no_insert(mut self) -> Self {
        self.rule.no_insert = true;
        self
    }

    pub fn no_insertion_index(mut self, idx: usize) -> Self {
        self.rule.no_insertion_indexes[idx] = true;
        self
    }

    pub fn restrict_insertion(mut self) -> Self {
        self.rule.restrict_insertion = true;
        self
    }

    pub fn text(mut self, text: Text) -> Self {
        self.rule.text = text;
        self
    }

    pub fn gram_props(mut self, slot: u8, props: GramProps) -> Self {
        if !props.is_empty() {
            self.rule.gram_props.insert(slot, props);
        }
        self
    }

    pub fn person_number(mut self, pn: PersonNumber) -> Self {
        self.rule.person_number = Some(pn);
        self
    }

    pub fn semantic(mut self, semantic: Semantic) -> Self {
        self.rule.semantic = Some(semantic);
        self
    }

    pub fn tree(mut self, tree: Tree) -> Self {
        self.rule.tree = Some(tree);
        self
    }

    pub fn is_substitution(mut self) -> Self {
        self.rule.is_substitution = true;
        self
    }

    pub fn is_stop_word(mut self) -> Self {
        self.rule.is_stop_word = true;
        self
    }

    pub fn is_placeholder(mut self) -> Self {
        self.rule.is_placeholder = true;
        self
    }

    pub fn is_term_sequence(mut self) -> Self {
        self.rule.is_term_sequence = true;
        self
    }

    pub fn rhs_does_not_produce_text(mut self) -> Self {
        self.rule.rhs_does_not_produce_text = true;
        self
    }

    pub fn build(self) -> Rule {
        self.rule
    }
}

/// The shared rule map: every LHS symbol's ordered rule list, plus the symbol table that
/// assigned them (spec §3 "Mapping from LHS nonterminal name -> ordered sequence of rules").
pub struct RuleMap {
    pub symbols: SymbolTable,
    rules: Vec<Vec<Rule>>,
}

impl RuleMap {
    pub fn new(symbols: SymbolTable) -> Self {
        let n = symbols.num_syms();
        RuleMap {
            symbols,
            rules: vec![Vec::new(); n],
        }
    }

    fn ensure_capacity(&mut self) {
        let n = self.symbols.num_syms();
        if self.rules.len() < n {
            self.rules.resize_with(n, Vec::new);
        }
    }

    /// Appends a rule to its LHS's rule list, preserving insertion order (spec §5: "iteration
    /// over symbols and their rule lists proceeds in insertion order").
    pub fn add_rule(&mut self, rule: Rule) {
        self.ensure_capacity();
        self.rules[rule.lhs.usize()].push(rule);
    }

    pub fn rules_for(&self, lhs: Symbol) -> &[Rule] {
        self.rules.get(lhs.usize()).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn rules_for_mut(&mut self, lhs: Symbol) -> &mut Vec<Rule> {
        self.ensure_capacity();
        &mut self.rules[lhs.usize()]
    }

    /// All LHS symbols that currently own at least one rule, in ascending symbol order
    /// (deterministic iteration, spec §5).
    pub fn lhs_symbols(&self) -> Vec<Symbol> {
        (0..self.rules.len())
            .filter(|&i| !self.rules[i].is_empty())
            .map(Symbol::from_usize)
            .collect()
    }

    pub fn all_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().flatten()
    }

    pub fn num_syms(&self) -> usize {
        self.rules.len()
    }

    /// Removes every rule for which `f` returns false, across the whole map.
    pub fn retain_rules(&mut self, mut f: impl FnMut(&Rule) -> bool) {
        for bucket in &mut self.rules {
            bucket.retain(|r| f(r));
        }
    }
}
