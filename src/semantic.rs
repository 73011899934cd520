//! Semantic terms, reduced-RHS semantics, and the stable semantic comparator (spec §3, §9).
//!
//! A semantic term is either a **function** (name, cost, arity bounds, child terms — unreduced
//! while a child slot is still empty) or an **argument** (an opaque id). A reduced-RHS
//! semantic is a list of terms sorted by the stable comparator so later equality tests are
//! position-independent (spec §4.2 binary case, step 1).

use std::cmp::Ordering;

/// A single semantic term (spec §3 "Semantic term").
///
/// `Eq` is implemented by hand, not derived: `cost` is an `f64`, which has no blanket `Eq`
/// impl because of `NaN`. Rule costs are always finite (spec §3), so asserting the marker is
/// sound here the same way `rule::OrderedCost` asserts it for rule costs.
#[derive(Clone, Debug, PartialEq)]
pub enum SemanticTerm {
    /// A semantic function. `args.len() < arity` means the term is unreduced.
    Function {
        name: String,
        cost: f64,
        arity: usize,
        args: Vec<SemanticTerm>,
    },
    /// An opaque semantic argument, e.g. an entity or placeholder id.
    Argument { id: String },
}

impl SemanticTerm {
    pub fn function(name: impl Into<String>, cost: f64, arity: usize) -> Self {
        SemanticTerm::Function {
            name: name.into(),
            cost,
            arity,
            args: vec![],
        }
    }

    pub fn argument(id: impl Into<String>) -> Self {
        SemanticTerm::Argument { id: id.into() }
    }

    /// True when this term is a function with unfilled argument slots.
    pub fn is_unreduced_function(&self) -> bool {
        matches!(self, SemanticTerm::Function { arity, args, .. } if args.len() < *arity)
    }

    /// True when this term is a function taking zero arguments (spec §9's `intersect()`
    /// example: "currently can only be `intersect()`" — an argumentless unreduced function).
    pub fn is_argumentless_unreduced_function(&self) -> bool {
        matches!(self, SemanticTerm::Function { arity, args, .. } if *arity == 0 && args.is_empty())
    }

    fn sort_key_tag(&self) -> (u8, &str) {
        match self {
            SemanticTerm::Function { name, .. } => (0, name.as_str()),
            SemanticTerm::Argument { id } => (1, id.as_str()),
        }
    }
}

impl Eq for SemanticTerm {}

/// The stable total order fixed by the expanded spec: function name (lexicographic) before
/// argument id (lexicographic), then arity, then children pairwise in the same order.
impl Ord for SemanticTerm {
    fn cmp(&self, other: &Self) -> Ordering {
        let (tag_a, name_a) = self.sort_key_tag();
        let (tag_b, name_b) = other.sort_key_tag();
        tag_a
            .cmp(&tag_b)
            .then_with(|| name_a.cmp(name_b))
            .then_with(|| match (self, other) {
                (
                    SemanticTerm::Function { arity: ar_a, args: args_a, .. },
                    SemanticTerm::Function { arity: ar_b, args: args_b, .. },
                ) => ar_a.cmp(ar_b).then_with(|| args_a.cmp(args_b)),
                _ => Ordering::Equal,
            })
    }
}

impl PartialOrd for SemanticTerm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A sorted list of semantic terms representing the fully-saturated arguments of some prior
/// semantic function (glossary: "Reduced semantic").
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ReducedSemantic(pub Vec<SemanticTerm>);

impl ReducedSemantic {
    pub fn single(term: SemanticTerm) -> Self {
        ReducedSemantic(vec![term])
    }

    pub fn sorted(mut terms: Vec<SemanticTerm>) -> Self {
        terms.sort();
        ReducedSemantic(terms)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merges two reduced lists, sorting the result by the stable comparator (spec §4.2 binary
    /// case, step 1). Returns `Err(())` — the semantic algebra's "-1 sentinel" — when the merge
    /// is illegal: the two lists would contribute terms whose sort keys collide without being
    /// structurally identical, which can only mean the same semantic slot was filled twice with
    /// incompatible content.
    pub fn merge(&self, other: &ReducedSemantic) -> Result<ReducedSemantic, ()> {
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().cloned());
        merged.sort();
        for pair in merged.windows(2) {
            if pair[0].sort_key_tag() == pair[1].sort_key_tag() && pair[0] != pair[1] {
                return Err(());
            }
        }
        Ok(ReducedSemantic(merged))
    }
}

/// The `semantic` field's representation: a function still awaiting arguments, or an
/// already-reduced list (spec §3 `semantic` + `semantic_is_reduced`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Semantic {
    Unreduced(SemanticTerm),
    Reduced(ReducedSemantic),
}

impl Semantic {
    pub fn is_reduced(&self) -> bool {
        matches!(self, Semantic::Reduced(_))
    }

    /// Applies `args` into an unreduced function's slots (spec §4.3.2, §4.2 binary case step 5
    /// "reduce the rule's necessarily-unreduced function by the merged necessarily-reduced
    /// arguments"). Fails — fatal per spec §7 kind 1 — when the function is already saturated,
    /// or when arity is exceeded.
    pub fn reduce(&self, args: &ReducedSemantic) -> Result<ReducedSemantic, ()> {
        match self {
            Semantic::Unreduced(SemanticTerm::Function { name, cost, arity, args: have }) => {
                if have.len() + args.0.len() > *arity {
                    return Err(());
                }
                let mut filled = have.clone();
                filled.extend(args.0.iter().cloned());
                let term = SemanticTerm::Function {
                    name: name.clone(),
                    cost: *cost,
                    arity: *arity,
                    args: filled,
                };
                if term.is_unreduced_function() {
                    // Still short of arity: the caller asked us to reduce but the supplied
                    // arguments didn't fill every slot. Not itself illegal, but it cannot
                    // become a ReducedSemantic.
                    return Err(());
                }
                Ok(ReducedSemantic::single(term))
            }
            _ => Err(()),
        }
    }
}
