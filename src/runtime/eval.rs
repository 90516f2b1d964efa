//! # Evaluator
//!
//! The recursive tree walk. Symbols resolve through the scope chain, lists
//! with a head are applications, and every other value evaluates to itself.
//! Argument evaluation is left to the callable being applied, which is what
//! lets special forms, macros and ordinary functions share one dispatch path.

use crate::ast::{List, Value};
use crate::errors::{EvalError, EvalResult};
use crate::foreign::ForeignFunction;
use crate::runtime::Scope;

/// Evaluates one form against `scope`.
///
/// Unbound symbols read as nil. Applying a non-callable head is a
/// [`EvalError::TypeMismatch`] naming the head form.
pub fn evaluate(form: &Value, scope: &Scope) -> EvalResult {
    match form {
        Value::Symbol(sym) => Ok(scope.lookup(*sym).unwrap_or_default()),
        Value::List(list) => match list.car() {
            Some(head) => apply_form(head, list, scope),
            None => Ok(form.clone()),
        },
        other => Ok(other.clone()),
    }
}

fn apply_form(head: &Value, list: &List, scope: &Scope) -> EvalResult {
    let _guard = scope.budget().enter()?;
    match evaluate(head, scope)? {
        Value::Callable(callable) => callable.apply(scope, &list.rest()),
        other => Err(EvalError::TypeMismatch {
            callee: head.to_string(),
            expected: "a callable".into(),
            actual: other.type_name().into(),
        }),
    }
}

/// Evaluates every form left to right.
pub fn eval_args(args: &List, scope: &Scope) -> Result<Vec<Value>, EvalError> {
    args.iter().map(|arg| evaluate(arg, scope)).collect()
}

/// Evaluates a body in sequence and returns the last value, or nil for an
/// empty body.
pub fn eval_body(body: &List, scope: &Scope) -> EvalResult {
    let mut result = Value::Nil;
    for form in body {
        result = evaluate(form, scope)?;
    }
    Ok(result)
}

/// Invokes any callable value with already-evaluated arguments.
///
/// Besides interpreter callables, a string naming a registered host function
/// is accepted. Everything else is a type mismatch.
pub fn call(scope: &Scope, callee: &Value, args: Vec<Value>) -> EvalResult {
    match callee {
        Value::Callable(callable) => callable.invoke(scope, args),
        Value::Str(name) => ForeignFunction::new(scope.host(), name)?.call(&args),
        other => Err(EvalError::type_mismatch("call", "a callable", other)),
    }
}

/// Whether [`call`] would accept `value` as a callee.
pub fn is_callable(scope: &Scope, value: &Value) -> bool {
    match value {
        Value::Callable(_) => true,
        Value::Str(name) => scope.host().function(name).is_some(),
        _ => false,
    }
}
