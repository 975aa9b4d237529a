use std::{cell::RefCell, rc::Rc};

use indexmap::IndexMap;

use crate::{
    symbol::{Symbol, SymbolTable},
    value::Value,
};

pub type RegistryRef = Rc<RefCell<SymbolRegistry>>;

/// Process-wide rendezvous point mapping symbolic names to value handles.
///
/// Producers publish under a name with [`export`](Self::export) and consumers
/// retrieve with [`import`](Self::import) without holding a reference to one
/// another. The registry stores handles, never copies: importing returns the
/// exact value that was exported. There is no ambient global instance; the
/// embedding context constructs one registry and passes the handle around.
#[derive(Default)]
pub struct SymbolRegistry {
    symbols: SymbolTable,
    entries: IndexMap<Symbol, Value>,
}

impl SymbolRegistry {
    pub fn new() -> RegistryRef {
        Rc::new(RefCell::new(Self::default()))
    }

    /// Binds `name` to `value`, overwriting any previous binding for the same
    /// name. Last write wins. Returns the interned symbol for the name.
    pub fn export(&mut self, name: &str, value: Value) -> Symbol {
        let symbol = self.symbols.intern(name);
        self.entries.insert(symbol.clone(), value);
        symbol
    }

    /// Returns the most recently exported value for `name`, or `None` if the
    /// name was never exported. A miss is a normal outcome, not an error, and
    /// does not intern the name.
    pub fn import(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Symbols currently bound, in export order.
    pub fn names(&self) -> Vec<Symbol> {
        self.entries.keys().cloned().collect()
    }

    /// Handle-sharing snapshot of the current bindings.
    pub fn snapshot(&self) -> IndexMap<String, Value> {
        self.entries
            .iter()
            .map(|(symbol, value)| (symbol.as_str().to_string(), value.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of identifiers the registry has interned so far.
    pub fn interned_count(&self) -> usize {
        self.symbols.len()
    }
}
