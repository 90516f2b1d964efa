use std::fmt;

use tracing::trace;

use crate::ast::{List, Symbol, Value, ARGUMENTS, CALLER_SCOPE};
use crate::errors::{EvalError, EvalResult};
use crate::runtime::eval::{eval_args, eval_body};
use crate::runtime::Scope;

/// A closure created by `lambda`.
pub struct Function {
    scope: Scope,
    parameters: List,
    params: Vec<Symbol>,
    body: List,
}

impl Function {
    /// Builds a closure over `scope`. Every parameter must be a symbol.
    pub fn new(scope: Scope, parameters: List, body: List) -> Result<Self, EvalError> {
        let params = parameters
            .iter()
            .map(|param| {
                param
                    .as_symbol()
                    .ok_or_else(|| EvalError::type_mismatch("lambda", "a parameter symbol", param))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            scope,
            parameters,
            params,
            body,
        })
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn parameters(&self) -> &List {
        &self.parameters
    }

    pub fn body(&self) -> &List {
        &self.body
    }

    /// Evaluates the raw arguments in the caller's scope, then invokes.
    pub fn apply(&self, caller: &Scope, args: &List) -> EvalResult {
        let values = eval_args(args, caller)?;
        self.invoke(values)
    }

    /// Binds evaluated arguments in a fresh child of the captured scope and
    /// runs the body there.
    ///
    /// Surplus arguments are allowed; they are only visible through
    /// `#arguments`, which always holds every argument in order.
    pub fn invoke(&self, args: Vec<Value>) -> EvalResult {
        if args.len() < self.params.len() {
            return Err(EvalError::arity(
                "lambda",
                format!("at least {}", self.params.len()),
                args.len(),
            ));
        }
        let local = self.scope.child();
        for (param, value) in self.params.iter().zip(&args) {
            local.let_local(*param, value.clone());
        }
        local.let_local(*ARGUMENTS, Value::List(args.into()));
        eval_body(&self.body, &local)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish()
    }
}

/// An unhygienic macro created by `macro`.
///
/// Its body runs with `#scope` bound to the caller's scope and `#arguments`
/// bound to the call site's unevaluated operands.
pub struct Macro {
    scope: Scope,
    body: List,
}

impl Macro {
    pub fn new(scope: Scope, body: List) -> Self {
        Self { scope, body }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn body(&self) -> &List {
        &self.body
    }

    pub fn apply(&self, caller: &Scope, args: &List) -> EvalResult {
        trace!(operands = args.len(), "applying macro");
        let local = self.scope.child();
        local.let_local(*CALLER_SCOPE, Value::Scope(caller.clone()));
        local.let_local(*ARGUMENTS, Value::List(args.clone()));
        eval_body(&self.body, &local)
    }
}

impl fmt::Debug for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Macro").field("body", &self.body).finish()
    }
}
