//! # Mathematical Operations
//!
//! Variadic arithmetic over integers and floats. All atoms here are pure.
//!
//! ## Atoms Provided
//!
//! - **Arithmetic**: `+`, `-`, `*`, `/`, `%` (alias `mod`)
//!
//! Integer operands stay integers until an operation overflows or does not
//! divide exactly, at which point the result becomes a float. Any float
//! operand makes the result a float.

use crate::ast::Value;
use crate::atoms::helpers::expect_min_arity;
use crate::atoms::{Atom, AtomRegistry, PureAtomFn};
use crate::errors::EvalError;

// ============================================================================
// NUMERIC OPERANDS
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn from_value(name: &str, value: &Value) -> Result<Number, EvalError> {
        match value {
            Value::Int(n) => Ok(Number::Int(*n)),
            Value::Float(f) => Ok(Number::Float(*f)),
            other => Err(EvalError::type_mismatch(name, "a number", other)),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Int(n) => n as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(n) => n == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Number::Int(n) => Value::Int(n),
            Number::Float(f) => Value::Float(f),
        }
    }
}

/// Applies an integer operation when both operands are integers and it does
/// not overflow, otherwise the float operation.
fn combine(
    a: Number,
    b: Number,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => int_op(x, y)
            .map(Number::Int)
            .unwrap_or_else(|| Number::Float(float_op(x as f64, y as f64))),
        _ => Number::Float(float_op(a.as_f64(), b.as_f64())),
    }
}

fn divide(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) if x.checked_rem(y) == Some(0) => x
            .checked_div(y)
            .map(Number::Int)
            .unwrap_or_else(|| Number::Float(x as f64 / y as f64)),
        _ => Number::Float(a.as_f64() / b.as_f64()),
    }
}

fn remainder(a: Number, b: Number) -> Number {
    match (a, b) {
        (Number::Int(x), Number::Int(y)) => Number::Int(x.checked_rem(y).unwrap_or(0)),
        _ => Number::Float(a.as_f64() % b.as_f64()),
    }
}

/// Left fold over all operands, starting from the first.
fn fold_numbers(
    name: &str,
    args: &[Value],
    step: impl Fn(Number, Number) -> Result<Number, EvalError>,
) -> Result<Value, EvalError> {
    let mut operands = args.iter().map(|arg| Number::from_value(name, arg));
    let Some(first) = operands.next() else {
        return Err(EvalError::arity(name, "at least 1", 0));
    };
    let mut acc = first?;
    for operand in operands {
        acc = step(acc, operand?)?;
    }
    Ok(acc.into_value())
}

fn checked_divisor(name: &str, divisor: Number) -> Result<Number, EvalError> {
    if divisor.is_zero() {
        return Err(EvalError::DivisionByZero {
            callee: name.to_string(),
        });
    }
    Ok(divisor)
}

// ============================================================================
// ARITHMETIC OPERATIONS
// ============================================================================

/// Adds numbers.
///
/// Usage: (+ <a> <b> ...)
///   - <a>, <b>, ...: Numbers
///
///   Returns: Number (sum), 0 with no operands
///
/// Example:
///   (+ 1 2 3) ; => 6
pub const ATOM_ADD: PureAtomFn = |args| {
    if args.is_empty() {
        return Ok(Value::Int(0));
    }
    fold_numbers("+", args, |a, b| {
        Ok(combine(a, b, i64::checked_add, |x, y| x + y))
    })
};

/// Subtracts numbers, or negates a single operand.
///
/// Usage: (- <a> <b> ...)
///
/// Example:
///   (- 5 2) ; => 3
///   (- 5)   ; => -5
pub const ATOM_SUB: PureAtomFn = |args| {
    if args.len() == 1 {
        let negated = combine(
            Number::Int(0),
            Number::from_value("-", &args[0])?,
            i64::checked_sub,
            |x, y| x - y,
        );
        return Ok(negated.into_value());
    }
    fold_numbers("-", args, |a, b| {
        Ok(combine(a, b, i64::checked_sub, |x, y| x - y))
    })
};

/// Multiplies numbers.
///
/// Usage: (* <a> <b> ...)
///
///   Returns: Number (product), 1 with no operands
///
/// Example:
///   (* 2 3 4) ; => 24
pub const ATOM_MUL: PureAtomFn = |args| {
    if args.is_empty() {
        return Ok(Value::Int(1));
    }
    fold_numbers("*", args, |a, b| {
        Ok(combine(a, b, i64::checked_mul, |x, y| x * y))
    })
};

/// Divides left to right.
///
/// Usage: (/ <a> <b> ...)
///
/// Example:
///   (/ 6 2) ; => 3
///   (/ 7 2) ; => 3.5
/// Note: Errors on division by zero.
pub const ATOM_DIV: PureAtomFn = |args| {
    expect_min_arity("/", args.len(), 2)?;
    fold_numbers("/", args, |a, b| Ok(divide(a, checked_divisor("/", b)?)))
};

/// Remainder, left to right. Float operands use the IEEE remainder.
///
/// Usage: (% <a> <b> ...)
///
/// Example:
///   (% 7 3) ; => 1
pub const ATOM_MOD: PureAtomFn = |args| {
    expect_min_arity("%", args.len(), 2)?;
    fold_numbers("%", args, |a, b| Ok(remainder(a, checked_divisor("%", b)?)))
};

// ============================================================================
// REGISTRATION FUNCTION
// ============================================================================

pub fn register_math_atoms(registry: &mut AtomRegistry) {
    registry.register("+", Atom::Pure(ATOM_ADD));
    registry.register("-", Atom::Pure(ATOM_SUB));
    registry.register("*", Atom::Pure(ATOM_MUL));
    registry.register("/", Atom::Pure(ATOM_DIV));
    registry.register("%", Atom::Pure(ATOM_MOD));
    registry.alias("mod", "%");
}
