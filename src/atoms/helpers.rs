//! # Atom Helper Infrastructure
//!
//! Arity validation and typed extraction shared by every atom module, so
//! that error messages name the atom and the offending value consistently.

use crate::ast::{Symbol, Value};
use crate::errors::EvalError;
use crate::runtime::{is_callable, Scope};

// ============================================================================
// ARITY VALIDATION
// ============================================================================

pub fn expect_arity(name: &str, actual: usize, expected: usize) -> Result<(), EvalError> {
    if actual != expected {
        return Err(EvalError::arity(name, expected, actual));
    }
    Ok(())
}

pub fn expect_min_arity(name: &str, actual: usize, min: usize) -> Result<(), EvalError> {
    if actual < min {
        return Err(EvalError::arity(name, format!("at least {}", min), actual));
    }
    Ok(())
}

pub fn expect_arity_range(
    name: &str,
    actual: usize,
    min: usize,
    max: usize,
) -> Result<(), EvalError> {
    if actual < min || actual > max {
        return Err(EvalError::arity(
            name,
            format!("{} to {}", min, max),
            actual,
        ));
    }
    Ok(())
}

// ============================================================================
// TYPE EXTRACTION
// ============================================================================

pub fn extract_symbol(name: &str, value: &Value) -> Result<Symbol, EvalError> {
    value
        .as_symbol()
        .ok_or_else(|| EvalError::type_mismatch(name, "a symbol", value))
}

pub fn extract_str<'a>(name: &str, value: &'a Value) -> Result<&'a str, EvalError> {
    value
        .as_str()
        .ok_or_else(|| EvalError::type_mismatch(name, "a string", value))
}

pub fn extract_int(name: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(n) => Ok(*n),
        Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Ok(*f as i64),
        _ => Err(EvalError::type_mismatch(name, "an integer", value)),
    }
}

/// Elements of a list, or the values of an array in order.
pub fn extract_sequence(name: &str, value: &Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::List(list) => Ok(list.to_vec()),
        Value::Array(array) => Ok(array.values().cloned().collect()),
        other => Err(EvalError::type_mismatch(name, "a list or array", other)),
    }
}

/// Checks that `value` can be passed to [`crate::runtime::call`].
pub fn expect_callable(name: &str, scope: &Scope, value: &Value) -> Result<(), EvalError> {
    if !is_callable(scope, value) {
        return Err(EvalError::type_mismatch(name, "a callable", value));
    }
    Ok(())
}
