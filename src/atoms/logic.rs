//! # Logic and Comparison Operations
//!
//! ## Atoms Provided
//!
//! - **Truthiness**: `not`, `and`, `or`
//! - **Equality**: `eq` (`===`), `equal` (`==`, `=`), `not-eq` (`!==`),
//!   `not-equal` (`!=`, `/=`)
//! - **Ordering**: `<`, `>`, `<=`, `>=`
//! - **Type predicates**: `nil?`, `symbol?`, `list?`, `array?`, `string?`,
//!   `number?`, `integer?`, `float?`, `bool?`, `callable?`, `scope?`
//!
//! `and` and `or` are ordinary functions: every operand is evaluated before
//! the atom runs, and they return an operand rather than a boolean.

use std::cmp::Ordering;

use crate::ast::Value;
use crate::atoms::helpers::{expect_arity, expect_min_arity};
use crate::atoms::{Atom, AtomRegistry, PureAtomFn, StatefulAtomFn};
use crate::errors::EvalError;
use crate::runtime::is_callable;

// ============================================================================
// TRUTHINESS
// ============================================================================

/// Negated truthiness of one operand.
///
/// Usage: (not <value>)
pub const ATOM_NOT: PureAtomFn = |args| {
    expect_arity("not", args.len(), 1)?;
    Ok(Value::Bool(!args[0].is_truthy()))
};

/// First falsy operand, else the last operand. `(and)` is true.
///
/// Example:
///   (and "a" "b" "") ; => ""
pub const ATOM_AND: PureAtomFn = |args| {
    let Some(last) = args.last() else {
        return Ok(Value::Bool(true));
    };
    Ok(args
        .iter()
        .find(|arg| !arg.is_truthy())
        .unwrap_or(last)
        .clone())
};

/// First truthy operand, else the last operand. `(or)` is false.
///
/// Example:
///   (or false null "c") ; => "c"
pub const ATOM_OR: PureAtomFn = |args| {
    let Some(last) = args.last() else {
        return Ok(Value::Bool(false));
    };
    Ok(args
        .iter()
        .find(|arg| arg.is_truthy())
        .unwrap_or(last)
        .clone())
};

// ============================================================================
// EQUALITY
// ============================================================================

fn all_match(name: &str, args: &[Value], eq: fn(&Value, &Value) -> bool) -> Result<bool, EvalError> {
    expect_min_arity(name, args.len(), 2)?;
    let first = &args[0];
    Ok(args[1..].iter().all(|arg| eq(first, arg)))
}

/// True when every operand is strictly equal to the first.
///
/// Usage: (eq <a> <b> ...)
///
/// Example:
///   (eq 3 3.0) ; => false
pub const ATOM_EQ: PureAtomFn = |args| Ok(Value::Bool(all_match("eq", args, Value::strict_eq)?));

/// True when every operand is loosely equal to the first.
///
/// Example:
///   (equal 3 3.0) ; => true
pub const ATOM_EQUAL: PureAtomFn =
    |args| Ok(Value::Bool(all_match("equal", args, Value::loose_eq)?));

/// Negation of `eq` over the same operands.
pub const ATOM_NOT_EQ: PureAtomFn =
    |args| Ok(Value::Bool(!all_match("not-eq", args, Value::strict_eq)?));

/// Negation of `equal` over the same operands.
pub const ATOM_NOT_EQUAL: PureAtomFn =
    |args| Ok(Value::Bool(!all_match("not-equal", args, Value::loose_eq)?));

// ============================================================================
// ORDERING
// ============================================================================

fn compare(name: &str, a: &Value, b: &Value) -> Result<Option<Ordering>, EvalError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Some(x.cmp(y))),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            let as_f64 = |v: &Value| match v {
                Value::Int(n) => *n as f64,
                Value::Float(f) => *f,
                _ => f64::NAN,
            };
            Ok(as_f64(a).partial_cmp(&as_f64(b)))
        }
        (Value::Str(x), Value::Str(y)) => Ok(Some(x.cmp(y))),
        (Value::Int(_) | Value::Float(_) | Value::Str(_), other) => {
            Err(EvalError::type_mismatch(name, a.type_name(), other))
        }
        (other, _) => Err(EvalError::type_mismatch(name, "a number or string", other)),
    }
}

/// Checks every adjacent pair; NaN compares false.
fn chain(name: &str, args: &[Value], accept: fn(Ordering) -> bool) -> Result<Value, EvalError> {
    expect_min_arity(name, args.len(), 2)?;
    for pair in args.windows(2) {
        match compare(name, &pair[0], &pair[1])? {
            Some(ordering) if accept(ordering) => {}
            _ => return Ok(Value::Bool(false)),
        }
    }
    Ok(Value::Bool(true))
}

/// Usage: (< <a> <b> ...)
pub const ATOM_LT: PureAtomFn = |args| chain("<", args, Ordering::is_lt);
pub const ATOM_GT: PureAtomFn = |args| chain(">", args, Ordering::is_gt);
pub const ATOM_LTE: PureAtomFn = |args| chain("<=", args, Ordering::is_le);
pub const ATOM_GTE: PureAtomFn = |args| chain(">=", args, Ordering::is_ge);

// ============================================================================
// TYPE PREDICATES
// ============================================================================

macro_rules! type_predicate {
    ($name:ident, $atom:literal, $pattern:pat) => {
        pub const $name: PureAtomFn = |args| {
            expect_arity($atom, args.len(), 1)?;
            Ok(Value::Bool(matches!(&args[0], $pattern)))
        };
    };
}

type_predicate!(ATOM_IS_NIL, "nil?", Value::Nil);
type_predicate!(ATOM_IS_SYMBOL, "symbol?", Value::Symbol(_));
type_predicate!(ATOM_IS_LIST, "list?", Value::List(_));
type_predicate!(ATOM_IS_ARRAY, "array?", Value::Array(_));
type_predicate!(ATOM_IS_STRING, "string?", Value::Str(_));
type_predicate!(ATOM_IS_NUMBER, "number?", Value::Int(_) | Value::Float(_));
type_predicate!(ATOM_IS_INTEGER, "integer?", Value::Int(_));
type_predicate!(ATOM_IS_FLOAT, "float?", Value::Float(_));
type_predicate!(ATOM_IS_BOOL, "bool?", Value::Bool(_));
type_predicate!(ATOM_IS_SCOPE, "scope?", Value::Scope(_));

/// True for anything `apply` and `map` accept, host function names included.
pub const ATOM_IS_CALLABLE: StatefulAtomFn = |args, scope| {
    expect_arity("callable?", args.len(), 1)?;
    Ok(Value::Bool(is_callable(scope, &args[0])))
};

// ============================================================================
// REGISTRATION FUNCTION
// ============================================================================

pub fn register_logic_atoms(registry: &mut AtomRegistry) {
    registry.register("not", Atom::Pure(ATOM_NOT));
    registry.register("and", Atom::Pure(ATOM_AND));
    registry.register("or", Atom::Pure(ATOM_OR));

    registry.register("eq", Atom::Pure(ATOM_EQ));
    registry.register("equal", Atom::Pure(ATOM_EQUAL));
    registry.register("not-eq", Atom::Pure(ATOM_NOT_EQ));
    registry.register("not-equal", Atom::Pure(ATOM_NOT_EQUAL));
    registry.alias("===", "eq");
    registry.alias("==", "equal");
    registry.alias("=", "equal");
    registry.alias("!==", "not-eq");
    registry.alias("!=", "not-equal");
    registry.alias("/=", "not-equal");

    registry.register("<", Atom::Pure(ATOM_LT));
    registry.register(">", Atom::Pure(ATOM_GT));
    registry.register("<=", Atom::Pure(ATOM_LTE));
    registry.register(">=", Atom::Pure(ATOM_GTE));

    registry.register("nil?", Atom::Pure(ATOM_IS_NIL));
    registry.register("symbol?", Atom::Pure(ATOM_IS_SYMBOL));
    registry.register("list?", Atom::Pure(ATOM_IS_LIST));
    registry.register("array?", Atom::Pure(ATOM_IS_ARRAY));
    registry.register("string?", Atom::Pure(ATOM_IS_STRING));
    registry.register("number?", Atom::Pure(ATOM_IS_NUMBER));
    registry.register("integer?", Atom::Pure(ATOM_IS_INTEGER));
    registry.register("float?", Atom::Pure(ATOM_IS_FLOAT));
    registry.register("bool?", Atom::Pure(ATOM_IS_BOOL));
    registry.register("scope?", Atom::Pure(ATOM_IS_SCOPE));
    registry.register("callable?", Atom::Stateful(ATOM_IS_CALLABLE));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_or_return_operands() {
        let args = [Value::str("a"), Value::str("b"), Value::str("")];
        assert_eq!(ATOM_AND(&args).unwrap(), Value::str(""));
        let args = [Value::Bool(false), Value::Nil, Value::str("c")];
        assert_eq!(ATOM_OR(&args).unwrap(), Value::str("c"));
        assert_eq!(ATOM_AND(&[]).unwrap(), Value::Bool(true));
        assert_eq!(ATOM_OR(&[]).unwrap(), Value::Bool(false));
    }

    #[test]
    fn ordering_chains_and_rejects_mixed_types() {
        let ascending = [Value::Int(1), Value::Float(2.5), Value::Int(3)];
        assert_eq!(ATOM_LT(&ascending).unwrap(), Value::Bool(true));
        assert_eq!(ATOM_GTE(&ascending).unwrap(), Value::Bool(false));
        assert!(matches!(
            ATOM_LT(&[Value::Int(1), Value::str("2")]),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn equality_requires_two_operands() {
        assert!(matches!(ATOM_EQ(&[Value::Int(1)]), Err(EvalError::Arity { .. })));
    }
}
