use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    diagnostics::{AmaryllisError, Diagnostic, DiagnosticKind, Result},
    interop::InteropContext,
    value::{NativeFunction, Value, ValueKind},
};

/// Builds the guest-facing `interop` module for a context.
///
/// The natives close over the context's registry handle, so a host runtime
/// can bind the module into guest scope and let guest code rendezvous through
/// the registry. The access gate is checked on every call, matching the
/// context's own entry points.
pub fn interop_module(ctx: &InteropContext) -> Value {
    let mut exports = IndexMap::new();

    let registry = ctx.registry();
    let gate = ctx.polyglot_access();
    exports.insert(
        "export".into(),
        native(
            "export",
            2,
            Rc::new(move |args: &[Value]| {
                ensure_access(gate, "interop.export")?;
                let name = expect_string(&args[0], "interop.export")?;
                registry.borrow_mut().export(&name, args[1].clone());
                Ok(args[1].clone())
            }),
        ),
    );

    let registry = ctx.registry();
    exports.insert(
        "import".into(),
        native(
            "import",
            1,
            Rc::new(move |args: &[Value]| {
                ensure_access(gate, "interop.import")?;
                let name = expect_string(&args[0], "interop.import")?;
                Ok(registry.borrow().import(&name).unwrap_or_else(Value::unit))
            }),
        ),
    );

    let registry = ctx.registry();
    exports.insert(
        "exported".into(),
        native(
            "exported",
            1,
            Rc::new(move |args: &[Value]| {
                ensure_access(gate, "interop.exported")?;
                let name = expect_string(&args[0], "interop.exported")?;
                Ok(Value::bool(registry.borrow().contains(&name)))
            }),
        ),
    );

    Value::module(vec!["interop".into()], exports)
}

fn native(
    name: &'static str,
    arity: usize,
    callback: Rc<dyn Fn(&[Value]) -> Result<Value>>,
) -> Value {
    Value::new(ValueKind::NativeFunction(NativeFunction {
        name,
        arity,
        callback,
    }))
}

fn ensure_access(enabled: bool, name: &str) -> Result<()> {
    if enabled {
        return Ok(());
    }
    Err(AmaryllisError::from(
        Diagnostic::new(
            DiagnosticKind::Interop,
            format!("`{name}` requires polyglot access, which is disabled for this context"),
        )
        .with_note("polyglot access is granted when the context is constructed"),
    ))
}

fn expect_string(value: &Value, name: &str) -> Result<String> {
    match &*value.0 {
        ValueKind::String(s) => Ok(s.clone()),
        _ => Err(AmaryllisError::from(Diagnostic::new(
            DiagnosticKind::Runtime,
            format!("`{name}` expected String but found {}", value.type_name()),
        ))),
    }
}
