//! # Collection Operations
//!
//! ## Atoms Provided
//!
//! - **Lists**: `list`, `car`, `cdr`
//! - **Indexing**: `at`, `count`, `exists-at?`
//! - **Arrays**: `array`, `dict` (special form)
//!
//! `at`, `count` and `exists-at?` accept lists (by position), arrays (by
//! key) and strings (by character).

use tracing::trace;

use crate::ast::{Array, ArrayKey, List, Value};
use crate::atoms::helpers::{expect_arity, extract_int};
use crate::atoms::{Atom, AtomRegistry, PureAtomFn, SpecialFormFn};
use crate::errors::EvalError;
use crate::runtime::evaluate;

// ============================================================================
// LIST OPERATIONS
// ============================================================================

/// Builds a list from its operands.
///
/// Usage: (list <a> <b> ...)
pub const ATOM_LIST: PureAtomFn = |args| Ok(Value::list(args.iter().cloned()));

/// First element of a list.
///
/// Usage: (car <list>)
/// Note: Errors on the empty list.
pub const ATOM_CAR: PureAtomFn = |args| {
    expect_arity("car", args.len(), 1)?;
    let list = extract_list("car", &args[0])?;
    list.car().cloned().ok_or_else(|| EvalError::EmptyStructure {
        callee: "car".to_string(),
    })
};

/// Everything after the first element.
///
/// Example:
///   (cdr '(1 2 3)) ; => (2 3)
///   (cdr '(1))     ; => ()
///   (cdr '())      ; => nil
pub const ATOM_CDR: PureAtomFn = |args| {
    expect_arity("cdr", args.len(), 1)?;
    let list = extract_list("cdr", &args[0])?;
    Ok(list.cdr().map(Value::List).unwrap_or_default())
};

fn extract_list<'a>(name: &str, value: &'a Value) -> Result<&'a List, EvalError> {
    value
        .as_list()
        .ok_or_else(|| EvalError::type_mismatch(name, "a list", value))
}

// ============================================================================
// INDEXED ACCESS
// ============================================================================

fn list_position(list: &List, index: &Value) -> Result<Option<usize>, EvalError> {
    let n = extract_int("at", index)?;
    Ok(usize::try_from(n).ok().filter(|&i| i < list.len()))
}

fn char_at(text: &str, index: &Value) -> Result<Option<char>, EvalError> {
    let n = extract_int("at", index)?;
    Ok(usize::try_from(n).ok().and_then(|i| text.chars().nth(i)))
}

fn array_key(name: &str, key: &Value) -> Result<ArrayKey, EvalError> {
    ArrayKey::from_value(key).ok_or_else(|| EvalError::type_mismatch(name, "an array key", key))
}

/// Element at a position or key.
///
/// Usage: (at <collection> <index>)
///
/// Example:
///   (at '(a b c) 1) ; => b
/// Note: Errors when the index is out of range or the key is absent.
pub const ATOM_AT: PureAtomFn = |args| {
    expect_arity("at", args.len(), 2)?;
    let (collection, index) = (&args[0], &args[1]);
    match collection {
        Value::List(list) => list_position(list, index)?
            .and_then(|i| list.get(i).cloned())
            .ok_or_else(|| EvalError::index_out_of_range("at", index, list.len())),
        Value::Array(array) => array
            .get(&array_key("at", index)?)
            .cloned()
            .ok_or_else(|| EvalError::index_out_of_range("at", index, array.len())),
        Value::Str(text) => char_at(text, index)?
            .map(|c| Value::Str(c.to_string()))
            .ok_or_else(|| EvalError::index_out_of_range("at", index, text.chars().count())),
        other => Err(EvalError::type_mismatch(
            "at",
            "a list, array or string",
            other,
        )),
    }
};

/// Usage: (exists-at? <collection> <index>)
pub const ATOM_EXISTS_AT: PureAtomFn = |args| {
    expect_arity("exists-at?", args.len(), 2)?;
    let (collection, index) = (&args[0], &args[1]);
    let exists = match collection {
        Value::List(list) => list_position(list, index)?.is_some(),
        Value::Array(array) => array.contains_key(&array_key("exists-at?", index)?),
        Value::Str(text) => char_at(text, index)?.is_some(),
        other => {
            return Err(EvalError::type_mismatch(
                "exists-at?",
                "a list, array or string",
                other,
            ))
        }
    };
    Ok(Value::Bool(exists))
};

/// Number of elements, entries or characters.
///
/// Usage: (count <collection>)
pub const ATOM_COUNT: PureAtomFn = |args| {
    expect_arity("count", args.len(), 1)?;
    let length = match &args[0] {
        Value::List(list) => list.len(),
        Value::Array(array) => array.len(),
        Value::Str(text) => text.chars().count(),
        other => {
            return Err(EvalError::type_mismatch(
                "count",
                "a list, array or string",
                other,
            ))
        }
    };
    Ok(Value::Int(length as i64))
};

// ============================================================================
// ARRAYS
// ============================================================================

/// Builds a positional array from its operands.
///
/// Usage: (array <a> <b> ...)
pub const ATOM_ARRAY: PureAtomFn = |args| Ok(Value::Array(Array::from_values(args.iter().cloned())));

/// Builds an array from raw entry forms.
///
/// Usage: (dict <entry> ...)
///   - (<key> <value>): keyed entry, both forms evaluated
///   - (<value>) or a bare form: positional entry
///
/// Positional entries continue the integer key sequence regardless of any
/// named keys.
///
/// Example:
///   (dict ("a" 1) (2) 3) ; => {"a": 1, 0: 2, 1: 3}
pub const ATOM_DICT: SpecialFormFn = |args, scope| {
    let mut array = Array::new();
    for entry in args {
        match entry {
            Value::List(pair) if pair.len() == 2 => {
                let key = evaluate(&pair[0], scope)?;
                let value = evaluate(&pair[1], scope)?;
                array.insert(array_key("dict", &key)?, value);
            }
            Value::List(single) if single.len() == 1 => {
                array.push(evaluate(&single[0], scope)?);
            }
            form => array.push(evaluate(form, scope)?),
        }
    }
    trace!(entries = array.len(), "dict built");
    Ok(Value::Array(array))
};

// ============================================================================
// REGISTRATION FUNCTION
// ============================================================================

pub fn register_collection_atoms(registry: &mut AtomRegistry) {
    registry.register("list", Atom::Pure(ATOM_LIST));
    registry.register("car", Atom::Pure(ATOM_CAR));
    registry.register("cdr", Atom::Pure(ATOM_CDR));
    registry.register("at", Atom::Pure(ATOM_AT));
    registry.register("exists-at?", Atom::Pure(ATOM_EXISTS_AT));
    registry.register("count", Atom::Pure(ATOM_COUNT));
    registry.register("array", Atom::Pure(ATOM_ARRAY));
    registry.register("dict", Atom::SpecialForm(ATOM_DICT));
}
