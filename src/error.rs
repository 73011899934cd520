//! The edit-rule error type (`SPEC_FULL.md` §B).
//!
//! No crate in the retrieval pack depends on `thiserror` or `anyhow`, so this follows the
//! teacher's own manual-impl style (`cfg-grammar/src/cfg.rs`'s hand-written `Debug`/`PartialEq`
//! for `NamedCfgRule`) rather than reaching for a derive macro. Messages are built with symbol
//! names already resolved by the caller, since a `Symbol` alone can't be printed without the
//! table that named it.

use std::error::Error;
use std::fmt;

/// The three fatal error kinds of spec §7 (kind 4, "silent drop", is a logged skip and has no
/// variant here).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRuleError {
    /// Illegal semantic reduction or merge, or an insertion whose parent rule is an
    /// argumentless unreduced function (spec §7 kind 1).
    FatalSemantic { lhs_name: String, detail: String },
    /// A non-edit rule demands a reduced semantic no descendant can produce (spec §7 kind 2).
    FatalMissingSemantic { lhs_name: String, path: Vec<String> },
    /// Two ambiguous rules or insertions in strict mode (spec §7 kind 3).
    FatalAmbiguity {
        lhs_name: String,
        rhs_a: String,
        rhs_b: String,
        reason: String,
    },
}

impl fmt::Display for EditRuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditRuleError::FatalSemantic { lhs_name, detail } => {
                write!(f, "fatal semantic error on rule for `{}`: {}", lhs_name, detail)
            }
            EditRuleError::FatalMissingSemantic { lhs_name, path } => {
                write!(
                    f,
                    "`{}` demands a reduced semantic no descendant can produce (path: {})",
                    lhs_name,
                    path.join(" -> ")
                )
            }
            EditRuleError::FatalAmbiguity {
                lhs_name,
                rhs_a,
                rhs_b,
                reason,
            } => write!(
                f,
                "ambiguous rules for `{}`: `{}` and `{}` ({})",
                lhs_name, rhs_a, rhs_b, reason
            ),
        }
    }
}

impl Error for EditRuleError {}
