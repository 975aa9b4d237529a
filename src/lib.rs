//! Core library for the Amaryllis polyglot symbol registry: a process-wide
//! rendezvous point where producers export values under symbolic names and
//! consumers import them by name, with no direct reference to one another.
//! Ships the registry itself, the host-side interop context with its
//! polyglot-access gate, guest-facing native bindings, and a small command
//! shell for driving the registry interactively.

pub mod bindings;
pub mod command;
pub mod diagnostics;
pub mod interop;
pub mod registry;
pub mod shell;
pub mod symbol;
pub mod value;

pub use diagnostics::{AmaryllisError, Diagnostic, DiagnosticKind, SourceSpan};
pub use interop::InteropContext;
pub use registry::{RegistryRef, SymbolRegistry};
pub use shell::Shell;
pub use symbol::{Symbol, SymbolTable};
pub use value::Value;
