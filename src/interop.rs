use std::rc::Rc;

use crate::{
    command::{self, Command},
    diagnostics::{AmaryllisError, Diagnostic, DiagnosticKind, Result},
    registry::{RegistryRef, SymbolRegistry},
    value::Value,
};

/// Host-side entry point for the interop registry.
///
/// Owns the registry handle and the polyglot-access gate. The gate is fixed at
/// construction: when closed, both entry points fail with a
/// [`DiagnosticKind::Interop`] diagnostic instead of touching the registry.
pub struct InteropContext {
    registry: RegistryRef,
    polyglot_access: bool,
}

impl InteropContext {
    pub fn new() -> Self {
        Self::with_polyglot_access(true)
    }

    pub fn with_polyglot_access(enabled: bool) -> Self {
        Self {
            registry: SymbolRegistry::new(),
            polyglot_access: enabled,
        }
    }

    /// Wraps an existing registry, for embedders that share one registry
    /// across several contexts.
    pub fn shared(registry: RegistryRef, polyglot_access: bool) -> Self {
        Self {
            registry,
            polyglot_access,
        }
    }

    pub fn registry(&self) -> RegistryRef {
        Rc::clone(&self.registry)
    }

    pub fn polyglot_access(&self) -> bool {
        self.polyglot_access
    }

    /// Publishes `value` under `name`, overwriting any previous binding.
    pub fn export(&self, name: &str, value: Value) -> Result<()> {
        self.ensure_polyglot_access("export")?;
        self.registry.borrow_mut().export(name, value);
        Ok(())
    }

    /// Retrieves the value most recently exported under `name`. A miss is
    /// `Ok(None)`, never an error.
    pub fn import(&self, name: &str) -> Result<Option<Value>> {
        self.ensure_polyglot_access("import")?;
        Ok(self.registry.borrow().import(name))
    }

    /// Parses and executes a single command line.
    pub fn eval_line(&self, line: &str) -> Result<Value> {
        let command = command::parse_line(line)?;
        self.execute(&command)
    }

    /// Executes a parsed command. `import` of an unbound name yields the
    /// unit value, the guest-level absent marker.
    pub fn execute(&self, command: &Command) -> Result<Value> {
        match command {
            Command::Export { name, value } => {
                self.export(name, value.clone())?;
                Ok(value.clone())
            }
            Command::Import { name } => Ok(self.import(name)?.unwrap_or_else(Value::unit)),
            Command::Exports => {
                self.ensure_polyglot_access("exports")?;
                Ok(Value::map(self.registry.borrow().snapshot()))
            }
        }
    }

    fn ensure_polyglot_access(&self, operation: &str) -> Result<()> {
        if self.polyglot_access {
            return Ok(());
        }
        Err(AmaryllisError::from(
            Diagnostic::new(
                DiagnosticKind::Interop,
                format!(
                    "`{operation}` requires polyglot access, which is disabled for this context"
                ),
            )
            .with_note("polyglot access is granted when the context is constructed"),
        ))
    }
}

impl Default for InteropContext {
    fn default() -> Self {
        Self::new()
    }
}
