//! Grammar symbols. A symbol is distinguished only by its numeric ID; names are kept
//! separately so the hot paths (admission, closure) stay cache-friendly (spec §9).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;
use std::rc::Rc;

/// A grammar symbol. Symbols are only meaningful relative to the `SymbolTable` that
/// generated them.
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
pub struct Symbol(NonZeroU32);

impl Symbol {
    /// Returns the symbol's dense numeric value, usable as a `Vec`/bitset index.
    #[inline]
    pub fn usize(self) -> usize {
        self.0.get() as usize - 1
    }

    /// Constructs a `Symbol` from its dense numeric value.
    #[inline]
    pub fn from_usize(n: usize) -> Self {
        Symbol(NonZeroU32::new(n as u32 + 1).expect("symbol index overflow"))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "g{}", self.usize())
    }
}

/// Cheaply-cloneable interned symbol name.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SymbolName(Rc<str>);

impl std::ops::Deref for SymbolName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SymbolName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for SymbolName {
    fn from(s: &'a str) -> Self {
        SymbolName(Rc::from(s))
    }
}

impl From<String> for SymbolName {
    fn from(s: String) -> Self {
        SymbolName(Rc::from(s.as_str()))
    }
}

/// The reserved symbol name that matches the empty span (spec §3). Used only by pass 1.
pub const EMPTY: &str = "<empty>";
/// The reserved RHS tail for end-of-input-restricted insertions (spec §3, §6).
pub const BLANK_INSERTED: &str = "<blank-inserted>";

/// A source of symbols, tracking generated IDs and their (optional) names.
///
/// Mirrors `cfg_symbol::SymbolSource`: symbols are assigned densely starting at zero, and a
/// parallel `Vec` carries their names for diagnostics.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    names: Vec<Option<SymbolName>>,
    by_name: HashMap<SymbolName, Symbol>,
}

impl SymbolTable {
    /// Creates an empty symbol table.
    pub fn new() -> Self {
        SymbolTable {
            names: vec![],
            by_name: HashMap::new(),
        }
    }

    /// Returns the symbol with the given name, interning a fresh one if it doesn't exist.
    pub fn intern(&mut self, name: impl Into<SymbolName>) -> Symbol {
        let name = name.into();
        if let Some(&sym) = self.by_name.get(&*name) {
            return sym;
        }
        let sym = Symbol::from_usize(self.names.len());
        self.names.push(Some(name.clone()));
        self.by_name.insert(name, sym);
        sym
    }

    /// Generates a fresh anonymous symbol (no name).
    pub fn fresh(&mut self) -> Symbol {
        let sym = Symbol::from_usize(self.names.len());
        self.names.push(None);
        sym
    }

    /// Looks up a symbol by name without interning.
    pub fn get(&self, name: &str) -> Option<Symbol> {
        self.by_name.get(name).copied()
    }

    /// Returns the symbol's recorded name, or a generated `gN` placeholder.
    pub fn name_of(&self, sym: Symbol) -> String {
        match self.names.get(sym.usize()) {
            Some(Some(name)) => name.to_string(),
            _ => format!("g{}", sym.usize()),
        }
    }

    /// Number of symbols registered so far.
    pub fn num_syms(&self) -> usize {
        self.names.len()
    }

    /// Returns the sentinel `<empty>` symbol, interning it if needed.
    pub fn empty_symbol(&mut self) -> Symbol {
        self.intern(EMPTY)
    }

    /// Returns the sentinel `<blank-inserted>` symbol, interning it if needed.
    pub fn blank_inserted_symbol(&mut self) -> Symbol {
        self.intern(BLANK_INSERTED)
    }
}
