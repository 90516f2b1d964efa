//! Shared helpers for integration tests.

#![allow(dead_code)]

use sandlisp::prelude::*;
use sandlisp::syntax;

/// Reads and evaluates `source` in `scope`, returning the last value.
pub fn eval_in(scope: &Scope, source: &str) -> EvalResult {
    let mut result = Value::Nil;
    for form in syntax::parse(source)? {
        result = evaluate(&form, scope)?;
    }
    Ok(result)
}

/// Evaluates `source` in a fresh sandbox, panicking on failure.
pub fn eval(source: &str) -> Value {
    let scope = sandbox();
    eval_in(&scope, source).unwrap_or_else(|e| panic!("`{source}` failed: {e}"))
}

/// Evaluates `source` in a fresh sandbox and returns the error kind.
pub fn eval_err(source: &str) -> ErrorKind {
    match eval_in(&sandbox(), source) {
        Ok(value) => panic!("`{source}` should fail, got {value}"),
        Err(e) => e.kind(),
    }
}

pub fn form(source: &str) -> Value {
    syntax::parse_form(source).unwrap()
}

pub fn list(source: &str) -> List {
    match form(source) {
        Value::List(list) => list,
        other => panic!("expected a list form, got {other}"),
    }
}

pub fn int_list(items: &[i64]) -> Value {
    Value::list(items.iter().map(|n| Value::Int(*n)))
}
