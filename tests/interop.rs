use amaryllis::{
    bindings,
    command::{self, Command},
    diagnostics::{AmaryllisError, DiagnosticKind},
    interop::InteropContext,
    registry::SymbolRegistry,
    shell::Shell,
    symbol::SymbolTable,
    value::{NativeFunction, Value, ValueKind},
};

fn expect_int(value: &Value) -> i64 {
    match value.0.as_ref() {
        ValueKind::Int(n) => *n,
        _ => panic!("expected Int, found {}", value.type_name()),
    }
}

fn expect_bool(value: &Value) -> bool {
    match value.0.as_ref() {
        ValueKind::Bool(b) => *b,
        _ => panic!("expected Bool, found {}", value.type_name()),
    }
}

fn expect_diagnostic(err: AmaryllisError) -> amaryllis::Diagnostic {
    match err {
        AmaryllisError::Diagnostic(diag) => diag,
        other => panic!("expected diagnostic, found {other}"),
    }
}

fn module_native(module: &Value, name: &str) -> NativeFunction {
    let exports = match module.0.as_ref() {
        ValueKind::Module(module) => &module.exports,
        _ => panic!("expected Module, found {}", module.type_name()),
    };
    let entry = exports.get(name).expect("module should export the native");
    match entry.0.as_ref() {
        ValueKind::NativeFunction(fun) => fun.clone(),
        _ => panic!("expected Function, found {}", entry.type_name()),
    }
}

#[test]
fn imports_an_exported_object() {
    let context = InteropContext::new();
    let object = Value::opaque();
    context
        .export("imports_an_object", object.clone())
        .expect("export should succeed");
    let imported = context
        .import("imports_an_object")
        .expect("import should succeed")
        .expect("exported symbol should be bound");
    assert!(imported.same_as(&object), "import must return the exact handle");
}

#[test]
fn import_of_unregistered_symbol_is_absent() {
    let context = InteropContext::new();
    let result = context
        .import("not_registered_export_test")
        .expect("a lookup miss is not an error");
    assert!(result.is_none());
}

#[test]
fn reexport_overwrites_previous_binding() {
    let context = InteropContext::new();
    let first = Value::int(1);
    let second = Value::int(2);
    context.export("x", first.clone()).expect("export should succeed");
    context.export("x", second.clone()).expect("export should succeed");
    let imported = context
        .import("x")
        .expect("import should succeed")
        .expect("symbol should be bound");
    assert!(imported.same_as(&second));
    assert!(!imported.same_as(&first));
}

#[test]
fn import_is_idempotent_between_exports() {
    let context = InteropContext::new();
    context
        .export("stable", Value::string("payload"))
        .expect("export should succeed");
    let first = context.import("stable").unwrap().expect("bound");
    let second = context.import("stable").unwrap().expect("bound");
    assert!(first.same_as(&second));
}

#[test]
fn lookup_miss_does_not_intern_the_name() {
    let registry = SymbolRegistry::new();
    registry.borrow_mut().export("known", Value::int(1));
    assert_eq!(registry.borrow().interned_count(), 1);
    assert!(registry.borrow().import("unknown").is_none());
    assert_eq!(registry.borrow().interned_count(), 1);
}

#[test]
fn interned_symbols_share_storage() {
    let mut table = SymbolTable::new();
    let first = table.intern("greeting");
    let second = table.intern("greeting");
    assert!(first.identical(&second));
    let other = table.intern("farewell");
    assert!(!first.identical(&other));
    assert_eq!(table.len(), 2);
}

#[test]
fn lookup_finds_interned_symbols_without_creating_them() {
    let mut table = SymbolTable::new();
    let interned = table.intern("greeting");
    let found = table.lookup("greeting").expect("symbol was interned");
    assert!(found.identical(&interned));
    assert!(table.lookup("missing").is_none());
    assert_eq!(table.len(), 1);
}

#[test]
fn reexport_keeps_registry_size_stable() {
    let registry = SymbolRegistry::new();
    registry.borrow_mut().export("x", Value::int(1));
    registry.borrow_mut().export("x", Value::int(2));
    assert_eq!(registry.borrow().len(), 1);
    let names = registry.borrow().names();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].as_str(), "x");
}

#[test]
fn export_requires_polyglot_access() {
    let context = InteropContext::with_polyglot_access(false);
    let err = context
        .export("x", Value::int(1))
        .expect_err("gate is closed");
    let diag = expect_diagnostic(err);
    assert_eq!(diag.kind, DiagnosticKind::Interop);
    assert!(
        !diag.notes.is_empty(),
        "gate errors should say how to obtain access"
    );
}

#[test]
fn import_requires_polyglot_access() {
    let context = InteropContext::with_polyglot_access(false);
    let err = context.import("x").expect_err("gate is closed");
    let diag = expect_diagnostic(err);
    assert_eq!(diag.kind, DiagnosticKind::Interop);
}

#[test]
fn interop_module_round_trips_a_value() {
    let context = InteropContext::new();
    let module = bindings::interop_module(&context);
    let export = module_native(&module, "export");
    let import = module_native(&module, "import");

    let payload = Value::opaque();
    let echoed = export
        .call(&[Value::string("answer"), payload.clone()])
        .expect("export native should succeed");
    assert!(echoed.same_as(&payload));

    let imported = import
        .call(&[Value::string("answer")])
        .expect("import native should succeed");
    assert!(imported.same_as(&payload));
}

#[test]
fn interop_module_import_miss_yields_unit() {
    let context = InteropContext::new();
    let module = bindings::interop_module(&context);
    let import = module_native(&module, "import");
    let result = import
        .call(&[Value::string("not_registered_export_test")])
        .expect("a lookup miss is not an error");
    assert!(result.is_unit());
}

#[test]
fn interop_module_reports_bindings() {
    let context = InteropContext::new();
    let module = bindings::interop_module(&context);
    let export = module_native(&module, "export");
    let exported = module_native(&module, "exported");

    assert!(!expect_bool(
        &exported.call(&[Value::string("flag")]).expect("call succeeds")
    ));
    export
        .call(&[Value::string("flag"), Value::bool(true)])
        .expect("export native should succeed");
    assert!(expect_bool(
        &exported.call(&[Value::string("flag")]).expect("call succeeds")
    ));
}

#[test]
fn interop_module_respects_the_access_gate() {
    let context = InteropContext::with_polyglot_access(false);
    let module = bindings::interop_module(&context);
    let export = module_native(&module, "export");
    let err = export
        .call(&[Value::string("x"), Value::int(1)])
        .expect_err("gate is closed");
    assert_eq!(expect_diagnostic(err).kind, DiagnosticKind::Interop);
}

#[test]
fn native_arity_mismatch_is_a_runtime_error() {
    let context = InteropContext::new();
    let module = bindings::interop_module(&context);
    let import = module_native(&module, "import");
    let err = import.call(&[]).expect_err("import takes one argument");
    assert_eq!(expect_diagnostic(err).kind, DiagnosticKind::Runtime);
}

#[test]
fn native_rejects_non_string_name() {
    let context = InteropContext::new();
    let module = bindings::interop_module(&context);
    let import = module_native(&module, "import");
    let err = import
        .call(&[Value::int(7)])
        .expect_err("name must be a string");
    assert_eq!(expect_diagnostic(err).kind, DiagnosticKind::Runtime);
}

#[test]
fn parses_export_with_string_literal() {
    let command = command::parse_line(r#"export greeting "hello""#).expect("line should parse");
    match command {
        Command::Export { name, value } => {
            assert_eq!(name, "greeting");
            assert_eq!(value.to_string(), "hello");
        }
        other => panic!("expected export command, found {other:?}"),
    }
}

#[test]
fn parses_array_literal_with_mixed_elements() {
    let command =
        command::parse_line(r#"export xs [1, -2.5, true, none, "s"]"#).expect("line should parse");
    match command {
        Command::Export { value, .. } => {
            assert_eq!(value.type_name(), "Array");
            assert_eq!(value.to_string(), "[1, -2.5, true, unit, s]");
        }
        other => panic!("expected export command, found {other:?}"),
    }
}

#[test]
fn parses_object_literal_as_foreign_value() {
    let command = command::parse_line("export thing object").expect("line should parse");
    match command {
        Command::Export { value, .. } => assert_eq!(value.type_name(), "Foreign"),
        other => panic!("expected export command, found {other:?}"),
    }
}

#[test]
fn rejects_unknown_command_with_span() {
    let err = command::parse_line("delete x").expect_err("unknown command");
    let diag = expect_diagnostic(err);
    assert_eq!(diag.kind, DiagnosticKind::Command);
    let span = diag.span.expect("parse errors carry a span");
    assert_eq!(span.start, 0);
    assert_eq!(span.end, "delete".len());
}

#[test]
fn rejects_unterminated_string_literal() {
    let err = command::parse_line(r#"export s "oops"#).expect_err("unterminated string");
    let diag = expect_diagnostic(err);
    assert_eq!(diag.kind, DiagnosticKind::Command);
    assert!(diag.message.contains("unterminated"));
}

#[test]
fn rejects_non_ascii_symbol_name() {
    let err = command::parse_line("export héllo 1").expect_err("names are ascii");
    let diag = expect_diagnostic(err);
    assert_eq!(diag.kind, DiagnosticKind::Command);
}

#[test]
fn rejects_trailing_input() {
    let err = command::parse_line("import x y").expect_err("trailing input");
    let diag = expect_diagnostic(err);
    assert_eq!(diag.kind, DiagnosticKind::Command);
}

#[test]
fn eval_line_round_trips_through_the_registry() {
    let context = InteropContext::new();
    let exported = context.eval_line("export answer 42").expect("export line");
    assert_eq!(expect_int(&exported), 42);
    let imported = context.eval_line("import answer").expect("import line");
    assert!(imported.same_as(&exported));
    let missing = context.eval_line("import missing").expect("miss is not an error");
    assert!(missing.is_unit());
}

#[test]
fn exports_command_snapshots_bindings_in_order() {
    let context = InteropContext::new();
    context.eval_line("export a 1").expect("export line");
    context.eval_line(r#"export b "two""#).expect("export line");
    let snapshot = context.eval_line("exports").expect("exports line");
    assert_eq!(snapshot.to_string(), "{a: 1, b: two}");
}

#[test]
fn shell_reports_misses_distinctly_from_unit() {
    let shell = Shell::with_context(InteropContext::new());
    let miss = shell.respond("import ghost").expect("miss is not an error");
    assert_eq!(miss, "unit (`ghost` is not exported)");
    shell.respond("export ghost none").expect("export line");
    let bound = shell.respond("import ghost").expect("import line");
    assert_eq!(bound, "unit");
}

#[test]
fn shell_echoes_exported_values() {
    let shell = Shell::with_context(InteropContext::new());
    assert_eq!(shell.respond("export answer 42").expect("export line"), "42");
    assert_eq!(shell.respond("import answer").expect("import line"), "42");
}

#[test]
fn shared_contexts_rendezvous_through_one_registry() {
    let producer = InteropContext::new();
    let consumer = InteropContext::shared(producer.registry(), true);
    let object = Value::opaque();
    producer
        .export("handoff", object.clone())
        .expect("export should succeed");
    let imported = consumer
        .import("handoff")
        .expect("import should succeed")
        .expect("symbol should be bound");
    assert!(imported.same_as(&object));
}
