//! sandlisp: the evaluation core of a small, sandboxed Lisp.
//!
//! Forms are [`ast::Value`]s. [`runtime::evaluate`] walks them against a
//! [`runtime::Scope`], [`environment::sandbox`] builds a scope with every
//! built-in bound, and [`Engine`] adds the reader on top.

pub mod ast;
pub mod atoms;
pub mod engine;
pub mod environment;
pub mod errors;
pub mod foreign;
pub mod runtime;
pub mod syntax;

pub use engine::Engine;
pub use errors::{EvalError, EvalResult};

pub mod prelude {
    pub use crate::ast::{Array, ArrayKey, List, Symbol, Value};
    pub use crate::engine::Engine;
    pub use crate::environment::{sandbox, sandbox_with};
    pub use crate::errors::{ErrorKind, EvalError, EvalResult};
    pub use crate::foreign::{HostObject, HostRegistry, HostType};
    pub use crate::runtime::{call, evaluate, Callable, EvalConfig, Scope};
}
