use std::{borrow::Borrow, fmt, rc::Rc};

use indexmap::IndexSet;

/// Immutable interned identifier used as a registry key.
///
/// Clones share the same allocation, so two symbols interned from equal text
/// through the same [`SymbolTable`] are pointer-identical.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Symbol(Rc<str>);

impl Symbol {
    fn new(name: &str) -> Self {
        Self(Rc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when both symbols share the same interned storage.
    pub fn identical(&self, other: &Symbol) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Intern table mapping identifier text to its canonical [`Symbol`].
#[derive(Default)]
pub struct SymbolTable {
    interned: IndexSet<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the canonical symbol for `name`, creating it on first use.
    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(existing) = self.interned.get(name) {
            return existing.clone();
        }
        let symbol = Symbol::new(name);
        self.interned.insert(symbol.clone());
        symbol
    }

    /// Looks up an already-interned symbol without creating one.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.interned.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.interned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interned.is_empty()
    }
}
