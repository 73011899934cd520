//! Closure-based synthesis of insertion and transposition edit rules for a tolerant grammar.
//!
//! The crate exposes a single operation, [`build_edit_rules`], which mutates a [`RuleMap`] in
//! place: given a finite set of hand-authored production rules annotated with insertion and
//! transposition costs, it derives the additional rules that let a downstream chart parser
//! tolerate missing or reordered tokens while preserving the original semantics.
//!
//! The six passes run in a fixed dependency order: unused-nonterminal pruning, the
//! semantic-potential analyzer, the blank-symbol collector, the insertion-closure engine, the
//! insertion-rule materializer, and the transposition-rule materializer. The ambiguity and
//! validity gatekeeper is not a separate top-level pass; it's consulted by every pass that adds
//! a rule or insertion record.

pub mod admission;
pub mod blank;
pub mod error;
pub mod insertion;
pub mod materialize_insert;
pub mod materialize_transpose;
pub mod rhs_closure;
pub mod rule;
pub mod semantic;
pub mod semantic_potential;
pub mod symbol;
pub mod text;
pub mod usefulness;

use log::debug;

pub use error::EditRuleError;
pub use rule::{Rhs, Rule, RuleBuilder, RuleMap};
pub use symbol::{Symbol, SymbolTable};

use insertion::InsertionStore;
use semantic_potential::SemanticPotential;

/// Options controlling edit-rule synthesis (spec §6, `SPEC_FULL.md` §C).
#[derive(Clone, Copy, Debug)]
pub struct Options {
    /// Retain derivation witnesses (`Rule::tree`) in the output map instead of stripping them.
    pub include_trees: bool,
    /// Strict (abort on ambiguity) vs. lenient (keep the cheaper rule) ambiguity handling.
    pub stop_ambiguity: bool,
    /// The global cost ceiling; candidates at or above this cost are silently dropped.
    pub max_cost: f64,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            include_trees: false,
            stop_ambiguity: false,
            max_cost: 6.0,
        }
    }
}

/// A symbol never named on any rule's RHS is treated as a grammar root for the pre-pass-5
/// reachability sweep (spec §2). If every symbol is referenced somewhere (a fully cyclic
/// grammar with no distinguished start symbol), every LHS is kept as a fallback root so the
/// sweep never empties the map outright.
fn infer_roots(rule_map: &RuleMap) -> Vec<Symbol> {
    let n = rule_map.num_syms();
    let mut referenced = vec![false; n];
    for rule in rule_map.all_rules() {
        for child in rule.rhs.iter() {
            referenced[child.usize()] = true;
        }
    }
    let roots: Vec<Symbol> = rule_map
        .lhs_symbols()
        .into_iter()
        .filter(|s| !referenced[s.usize()])
        .collect();
    if roots.is_empty() {
        rule_map.lhs_symbols()
    } else {
        roots
    }
}

fn strip_temporaries(rule_map: &mut RuleMap, include_trees: bool) {
    for lhs in rule_map.lhs_symbols() {
        for rule in rule_map.rules_for_mut(lhs) {
            if !include_trees {
                rule.tree = None;
            }
            rule.gram_props.retain(|_, props| !props.is_empty());
        }
    }
}

/// Runs the full edit-rule synthesis pipeline over `rule_map` in place (spec §6).
///
/// `rule_map` must already have `<empty>` and `<blank-inserted>` registered (spec §6: "The
/// `<blank-inserted>` symbol is present in the rule map on entry... the core uses its name
/// only"). Returns `Err` on any of the three fatal error kinds of spec §7; kind 4 ("silent
/// drop") is logged at `warn!` and never surfaces as an error.
pub fn build_edit_rules(rule_map: &mut RuleMap, options: Options) -> Result<(), EditRuleError> {
    debug!(
        "build_edit_rules: starting, {} symbols with rules",
        rule_map.lhs_symbols().len()
    );

    let roots = infer_roots(rule_map);
    let dropped = usefulness::remove_unreachable(rule_map, &roots);
    debug!("build_edit_rules: usefulness dropped {} rules", dropped);

    let potential = SemanticPotential::analyze(rule_map);
    potential.annotate(rule_map);
    potential.validate(rule_map)?;

    let mut store = InsertionStore::new(rule_map.num_syms());
    blank::collect_blanks(rule_map, &mut store);

    insertion::run_closure(rule_map, &mut store, &options)?;

    materialize_insert::materialize_insertions(rule_map, &store, &potential, &options)?;
    materialize_transpose::materialize_transpositions(rule_map, &potential, &options)?;

    strip_temporaries(rule_map, options.include_trees);

    debug!(
        "build_edit_rules: done, {} symbols with rules",
        rule_map.lhs_symbols().len()
    );
    Ok(())
}

/// Installs `env_logger` as the global logger, for binaries/tests that want formatted output
/// (`SPEC_FULL.md` §A). The library itself never calls this — a library must not force a
/// logging implementation on its consumer.
#[cfg(feature = "diagnostics")]
pub fn init_diagnostics() {
    let _ = env_logger::try_init();
}
