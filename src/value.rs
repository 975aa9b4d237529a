use std::{any::Any, fmt, rc::Rc};

use indexmap::IndexMap;

use crate::diagnostics::{AmaryllisError, Diagnostic, DiagnosticKind, Result};

/// Cheap, clonable handle to a value exchanged through the registry.
///
/// Clones share the underlying allocation: the registry stores handles, never
/// copies, so an imported value is the exact value that was exported.
#[derive(Clone)]
pub struct Value(pub Rc<ValueKind>);

impl Value {
    pub fn new(kind: ValueKind) -> Self {
        Self(Rc::new(kind))
    }

    pub fn unit() -> Self {
        Self::new(ValueKind::Unit)
    }

    pub fn bool(value: bool) -> Self {
        Self::new(ValueKind::Bool(value))
    }

    pub fn int(value: i64) -> Self {
        Self::new(ValueKind::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::new(ValueKind::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(ValueKind::String(value.into()))
    }

    pub fn array(values: Vec<Value>) -> Self {
        Self::new(ValueKind::Array(values))
    }

    pub fn map(entries: IndexMap<String, Value>) -> Self {
        Self::new(ValueKind::Map(entries))
    }

    pub fn module(name: Vec<String>, exports: IndexMap<String, Value>) -> Self {
        Self::new(ValueKind::Module(ModuleValue { name, exports }))
    }

    /// Wraps an opaque host object so it can cross the interop boundary.
    pub fn foreign(class_name: impl Into<String>, handle: Rc<dyn Any>) -> Self {
        Self::new(ValueKind::Foreign(ForeignValue {
            class_name: class_name.into(),
            handle,
        }))
    }

    /// Fresh anonymous host object with no payload, distinguishable from any
    /// other value only by identity.
    pub fn opaque() -> Self {
        Self::foreign("Object", Rc::new(()))
    }

    /// Reference identity: true when both handles point at the same
    /// allocation. This is the equality the registry guarantees on import.
    pub fn same_as(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn is_unit(&self) -> bool {
        matches!(&*self.0, ValueKind::Unit)
    }

    pub fn type_name(&self) -> &'static str {
        match &*self.0 {
            ValueKind::Unit => "Unit",
            ValueKind::Bool(_) => "Bool",
            ValueKind::Int(_) => "Int",
            ValueKind::Float(_) => "Float",
            ValueKind::String(_) => "String",
            ValueKind::Array(_) => "Array",
            ValueKind::Map(_) => "Map",
            ValueKind::Foreign(_) => "Foreign",
            ValueKind::Module(_) => "Module",
            ValueKind::NativeFunction(_) => "Function",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::Unit => write!(f, "Unit"),
            ValueKind::Bool(b) => write!(f, "{b}"),
            ValueKind::Int(n) => write!(f, "{n}"),
            ValueKind::Float(n) => write!(f, "{n}"),
            ValueKind::String(s) => write!(f, "\"{s}\""),
            ValueKind::Array(values) => f.debug_list().entries(values.iter()).finish(),
            ValueKind::Map(map) => f.debug_map().entries(map.iter()).finish(),
            ValueKind::Foreign(foreign) => write!(f, "<foreign {}>", foreign.class_name),
            ValueKind::Module(module) => f
                .debug_struct("Module")
                .field("name", &module.name.join("."))
                .field("exports", &module.exports)
                .finish(),
            ValueKind::NativeFunction(fun) => write!(f, "<native fn {}>", fun.name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ValueKind::Unit => write!(f, "unit"),
            ValueKind::Bool(b) => write!(f, "{b}"),
            ValueKind::Int(n) => write!(f, "{n}"),
            ValueKind::Float(n) => write!(f, "{n}"),
            ValueKind::String(s) => write!(f, "{s}"),
            ValueKind::Array(values) => {
                write!(f, "[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            ValueKind::Map(map) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
            ValueKind::Foreign(foreign) => write!(f, "<foreign {}>", foreign.class_name),
            ValueKind::Module(module) => write!(f, "<module {}>", module.name.join(".")),
            ValueKind::NativeFunction(fun) => write!(f, "<native fn {}>", fun.name),
        }
    }
}

#[derive(Clone)]
pub enum ValueKind {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Map(IndexMap<String, Value>),
    Foreign(ForeignValue),
    Module(ModuleValue),
    NativeFunction(NativeFunction),
}

/// Type-erased host object. The handle carries whatever payload the host
/// attached; the registry never inspects it.
#[derive(Clone)]
pub struct ForeignValue {
    pub class_name: String,
    pub handle: Rc<dyn Any>,
}

#[derive(Clone)]
pub struct ModuleValue {
    pub name: Vec<String>,
    pub exports: IndexMap<String, Value>,
}

#[derive(Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub callback: Rc<dyn Fn(&[Value]) -> Result<Value>>,
}

impl NativeFunction {
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        if self.arity != usize::MAX && args.len() != self.arity {
            return Err(AmaryllisError::from(Diagnostic::new(
                DiagnosticKind::Runtime,
                format!(
                    "function `{}` expected {} arguments but received {}",
                    self.name,
                    self.arity,
                    args.len()
                ),
            )));
        }
        (self.callback)(args)
    }
}
