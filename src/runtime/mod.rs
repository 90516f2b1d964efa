//! # Runtime
//!
//! Scopes, callables and the evaluator that ties them together.
//!
//! - **`scope`**: shared binding frames and the nearest-holder write rule
//! - **`eval`**: the tree walk and generic call dispatch
//! - **`callable`**: the closed set of things that can be applied
//! - **`function`**: interpreted closures and macros
//! - **`config`**: host-imposed depth and step budgets

pub mod callable;
pub mod config;
pub mod eval;
pub mod function;
pub mod scope;

pub use callable::Callable;
pub use config::{EvalConfig, DEFAULT_MAX_DEPTH};
pub use eval::{call, eval_args, eval_body, evaluate, is_callable};
pub use function::{Function, Macro};
pub use scope::Scope;
