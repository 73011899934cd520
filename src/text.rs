//! Conjugative text objects (spec §3, §4.2.1).
//!
//! Text is modeled as an ordered list whose elements are sum-typed: a literal string or a
//! small key→inflection map. No inheritance, no dynamic dispatch — a match suffices.

use std::collections::BTreeMap;
use std::fmt;

/// A single conjugation key, e.g. `one-sg`, `three-sg`, `pl`, `past`, `nom`, `obj`.
pub type ConjugationKey = String;

/// A mapping from conjugation key to literal string, reduced to one literal at rule-build
/// time when the governing grammatical property is known (spec §3 "Conjugative text object").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConjugativeObject {
    forms: BTreeMap<ConjugationKey, String>,
}

impl ConjugativeObject {
    pub fn new() -> Self {
        ConjugativeObject {
            forms: BTreeMap::new(),
        }
    }

    pub fn with_form(mut self, key: impl Into<ConjugationKey>, text: impl Into<String>) -> Self {
        self.forms.insert(key.into(), text.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.forms.get(key).map(|s| s.as_str())
    }
}

/// One element of a text list: either a resolved literal or a conjugative object still
/// awaiting a governing key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextElem {
    Literal(String),
    Conjugative(ConjugativeObject),
}

impl fmt::Display for TextElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextElem::Literal(s) => write!(f, "{}", s),
            TextElem::Conjugative(_) => write!(f, "<conjugative>"),
        }
    }
}

/// An ordered list of text elements. `empty()` carries a zero-length list.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Text(pub Vec<TextElem>);

impl Text {
    pub fn empty() -> Self {
        Text(vec![])
    }

    pub fn literal(s: impl Into<String>) -> Self {
        Text(vec![TextElem::Literal(s.into())])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Concatenates two text lists (spec §4.2 binary case, step 2).
    pub fn concat(&self, other: &Text) -> Text {
        let mut out = self.0.clone();
        out.extend(other.0.iter().cloned());
        Text(out)
    }
}

/// Grammatical-property bag governing conjugation of one RHS slot (spec §3 `gram_props`).
/// At most one `form` key and at most one `accepted_tense` key; empty bags are represented
/// as `None` at the call site so downstream code checks a single pointer (spec §3 last bullet).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct GramProps {
    pub form: Option<String>,
    pub accepted_tense: Option<String>,
}

impl GramProps {
    pub fn is_empty(&self) -> bool {
        self.form.is_none() && self.accepted_tense.is_none()
    }
}

/// Person-number agreement tag (spec §3 `person_number`, glossary).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PersonNumber {
    OneSg,
    ThreeSg,
    Pl,
}

impl PersonNumber {
    fn key(self) -> &'static str {
        match self {
            PersonNumber::OneSg => "one-sg",
            PersonNumber::ThreeSg => "three-sg",
            PersonNumber::Pl => "pl",
        }
    }
}

/// Runs the conjugation pass over a text list (spec §4.2.1).
///
/// For each element in order: literal elements adjacent to a prior literal are joined with
/// a single space; a conjugative object is resolved first by `gram_props.form` (form-driven
/// inflection must win over person-number, spec §4.2.1's "have + like" example), then by
/// person-number, otherwise it is left in place for the parser to resolve later.
pub fn conjugate(text: &Text, gram_props: &GramProps, person_number: Option<PersonNumber>) -> Text {
    let mut out: Vec<TextElem> = Vec::with_capacity(text.0.len());
    for elem in &text.0 {
        match elem {
            TextElem::Literal(s) => {
                if let Some(TextElem::Literal(prev)) = out.last_mut() {
                    prev.push(' ');
                    prev.push_str(s);
                } else {
                    out.push(TextElem::Literal(s.clone()));
                }
            }
            TextElem::Conjugative(obj) => {
                let resolved = gram_props
                    .form
                    .as_deref()
                    .and_then(|form| obj.get(form))
                    .or_else(|| person_number.and_then(|pn| obj.get(pn.key())));
                match resolved {
                    Some(s) => {
                        let s = s.to_string();
                        if let Some(TextElem::Literal(prev)) = out.last_mut() {
                            prev.push(' ');
                            prev.push_str(&s);
                        } else {
                            out.push(TextElem::Literal(s));
                        }
                    }
                    None => out.push(TextElem::Conjugative(obj.clone())),
                }
            }
        }
    }
    Text(out)
}
