use tracing::debug;

use crate::ast::Value;
use crate::environment;
use crate::errors::{EvalError, EvalResult};
use crate::foreign::HostRegistry;
use crate::runtime::{evaluate, EvalConfig, Scope};
use crate::syntax;

/// A sandbox plus the reader: the usual entry point for hosts.
///
/// Each engine owns its own root scope, so definitions persist across
/// [`Engine::eval_source`] calls on the same engine and never leak into
/// another. Dropping the engine clears the root bindings, which frees
/// top-level closures along with the frames they captured.
///
/// # Examples
///
/// ```rust
/// use sandlisp::{ast::Value, Engine};
///
/// let engine = Engine::new();
/// engine.eval_source("(define square (lambda (x) (* x x)))").unwrap();
/// assert_eq!(engine.eval_source("(square 7)").unwrap(), Value::Int(49));
/// ```
#[derive(Debug)]
pub struct Engine {
    scope: Scope,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_host(HostRegistry::standard(), EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self::with_host(HostRegistry::standard(), config)
    }

    pub fn with_host(host: HostRegistry, config: EvalConfig) -> Self {
        Self {
            scope: environment::sandbox_with(host, config),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Reads and evaluates every form in `source`, returning the last value.
    pub fn eval_source(&self, source: &str) -> EvalResult {
        self.eval_named("<input>", source)
    }

    /// Like [`Engine::eval_source`]; `name` labels syntax error reports.
    pub fn eval_named(&self, name: &str, source: &str) -> EvalResult {
        let forms = syntax::parse_named(name, source).map_err(EvalError::from)?;
        debug!(source = name, forms = forms.len(), "evaluating source");
        let result = self.eval_forms(&forms);
        debug!(steps = self.scope.budget().steps(), "evaluation finished");
        result
    }

    pub fn eval_forms(&self, forms: &[Value]) -> EvalResult {
        let mut result = Value::Nil;
        for form in forms {
            result = evaluate(form, &self.scope)?;
        }
        Ok(result)
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.scope.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
