//! The standard host library installed by [`HostRegistry::standard`].
//!
//! ## Functions
//!
//! - **Strings**: `trim`, `substr`, `to_uppercase`, `to_lowercase`, `str_contains`
//! - **Arrays**: `array_merge`, `array_slice`, `array_keys`, `array_values`
//! - **Math**: `abs`, `floor`, `ceil`, `sqrt`, `pow`, `min`, `max`
//! - **JSON**: `json_encode`, `json_decode`
//!
//! ## Types
//!
//! - `Vector`: a mutable host-side sequence
//! - `Symbol`, `List`, `Scope`: constructors for the language's own values

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{Map, Number};

use crate::ast::{Array, ArrayKey, List, Symbol, Value};
use crate::atoms::helpers::{
    expect_arity, expect_arity_range, expect_min_arity, extract_int, extract_sequence, extract_str,
};
use crate::errors::{EvalError, EvalResult};
use crate::foreign::{HostObject, HostRegistry, HostType};
use crate::runtime::Scope;

pub fn register_standard_library(registry: &mut HostRegistry) {
    registry
        .register_fn("trim", host_trim)
        .register_fn("substr", host_substr)
        .register_fn("to_uppercase", |args| map_str("to_uppercase", args, str::to_uppercase))
        .register_fn("to_lowercase", |args| map_str("to_lowercase", args, str::to_lowercase))
        .register_fn("str_contains", host_str_contains)
        .register_fn("array_merge", host_array_merge)
        .register_fn("array_slice", host_array_slice)
        .register_fn("array_keys", host_array_keys)
        .register_fn("array_values", host_array_values)
        .register_fn("abs", host_abs)
        .register_fn("floor", |args| map_float("floor", args, f64::floor))
        .register_fn("ceil", |args| map_float("ceil", args, f64::ceil))
        .register_fn("sqrt", |args| map_float("sqrt", args, f64::sqrt))
        .register_fn("pow", host_pow)
        .register_fn("min", |args| extremum("min", args, |a, b| b < a))
        .register_fn("max", |args| extremum("max", args, |a, b| b > a))
        .register_fn("json_encode", host_json_encode)
        .register_fn("json_decode", host_json_decode);

    registry
        .register_type(
            HostType::new("Vector", construct_vector)
                .with_static("of", construct_vector)
                .with_static("len", vector_len)
                .with_static("push", vector_push)
                .with_static("to_list", vector_to_list),
        )
        .register_type(HostType::new("Symbol", construct_symbol).with_static("get", construct_symbol))
        .register_type(HostType::new("List", construct_list).with_static("from", list_from))
        .register_type(HostType::with_scope("Scope", construct_scope));
}

// ============================================================================
// STRINGS
// ============================================================================

fn host_trim(args: &[Value]) -> EvalResult {
    expect_arity("trim", args.len(), 1)?;
    Ok(Value::str(extract_str("trim", &args[0])?.trim()))
}

fn map_str(name: &str, args: &[Value], f: fn(&str) -> String) -> EvalResult {
    expect_arity(name, args.len(), 1)?;
    Ok(Value::Str(f(extract_str(name, &args[0])?)))
}

/// `substr(text, start[, length])` over characters. A negative start counts
/// from the end; a negative length leaves that many characters off the end.
fn host_substr(args: &[Value]) -> EvalResult {
    expect_arity_range("substr", args.len(), 2, 3)?;
    let chars: Vec<char> = extract_str("substr", &args[0])?.chars().collect();
    let len = chars.len() as i64;
    let start = extract_int("substr", &args[1])?;
    let begin = if start < 0 { (len + start).max(0) } else { start.min(len) };
    let end = match args.get(2) {
        None | Some(Value::Nil) => len,
        Some(length) => {
            let length = extract_int("substr", length)?;
            if length < 0 {
                (len + length).max(begin)
            } else {
                begin.saturating_add(length).min(len)
            }
        }
    };
    Ok(Value::Str(chars[begin as usize..end as usize].iter().collect()))
}

fn host_str_contains(args: &[Value]) -> EvalResult {
    expect_arity("str_contains", args.len(), 2)?;
    let haystack = extract_str("str_contains", &args[0])?;
    let needle = extract_str("str_contains", &args[1])?;
    Ok(Value::Bool(haystack.contains(needle)))
}

// ============================================================================
// ARRAYS
// ============================================================================

fn to_array(name: &str, value: &Value) -> Result<Array, EvalError> {
    match value {
        Value::Array(array) => Ok(array.clone()),
        Value::List(list) => Ok(Array::from_values(list.iter().cloned())),
        other => Err(EvalError::type_mismatch(name, "an array or list", other)),
    }
}

/// Named keys from later arrays overwrite earlier ones; integer keys are
/// renumbered in order.
fn host_array_merge(args: &[Value]) -> EvalResult {
    let mut merged = Array::new();
    for arg in args {
        for (key, value) in to_array("array_merge", arg)?.iter() {
            match key {
                ArrayKey::Index(_) => merged.push(value.clone()),
                ArrayKey::Name(_) => merged.insert(key.clone(), value.clone()),
            }
        }
    }
    Ok(Value::Array(merged))
}

fn host_array_slice(args: &[Value]) -> EvalResult {
    expect_arity_range("array_slice", args.len(), 2, 3)?;
    let source = to_array("array_slice", &args[0])?;
    let len = source.len() as i64;
    let offset = extract_int("array_slice", &args[1])?;
    let begin = if offset < 0 { (len + offset).max(0) } else { offset.min(len) };
    let end = match args.get(2) {
        None | Some(Value::Nil) => len,
        Some(length) => {
            let length = extract_int("array_slice", length)?;
            if length < 0 {
                (len + length).max(begin)
            } else {
                begin.saturating_add(length).min(len)
            }
        }
    };
    let mut slice = Array::new();
    for (key, value) in source
        .iter()
        .skip(begin as usize)
        .take((end - begin) as usize)
    {
        match key {
            ArrayKey::Index(_) => slice.push(value.clone()),
            ArrayKey::Name(_) => slice.insert(key.clone(), value.clone()),
        }
    }
    Ok(Value::Array(slice))
}

fn host_array_keys(args: &[Value]) -> EvalResult {
    expect_arity("array_keys", args.len(), 1)?;
    let source = to_array("array_keys", &args[0])?;
    Ok(Value::Array(Array::from_values(
        source.keys().map(ArrayKey::to_value),
    )))
}

fn host_array_values(args: &[Value]) -> EvalResult {
    expect_arity("array_values", args.len(), 1)?;
    let source = to_array("array_values", &args[0])?;
    Ok(Value::Array(Array::from_values(source.values().cloned())))
}

// ============================================================================
// MATH
// ============================================================================

fn to_f64(name: &str, value: &Value) -> Result<f64, EvalError> {
    match value {
        Value::Int(n) => Ok(*n as f64),
        Value::Float(f) => Ok(*f),
        other => Err(EvalError::type_mismatch(name, "a number", other)),
    }
}

fn host_abs(args: &[Value]) -> EvalResult {
    expect_arity("abs", args.len(), 1)?;
    match &args[0] {
        Value::Int(n) => Ok(n
            .checked_abs()
            .map(Value::Int)
            .unwrap_or(Value::Float((*n as f64).abs()))),
        other => Ok(Value::Float(to_f64("abs", other)?.abs())),
    }
}

fn map_float(name: &str, args: &[Value], f: fn(f64) -> f64) -> EvalResult {
    expect_arity(name, args.len(), 1)?;
    Ok(Value::Float(f(to_f64(name, &args[0])?)))
}

fn host_pow(args: &[Value]) -> EvalResult {
    expect_arity("pow", args.len(), 2)?;
    if let (Value::Int(base), Value::Int(exponent)) = (&args[0], &args[1]) {
        if let Some(n) = u32::try_from(*exponent)
            .ok()
            .and_then(|e| base.checked_pow(e))
        {
            return Ok(Value::Int(n));
        }
    }
    let base = to_f64("pow", &args[0])?;
    let exponent = to_f64("pow", &args[1])?;
    Ok(Value::Float(base.powf(exponent)))
}

/// Accepts either numbers as separate arguments or a single list or array.
fn extremum(name: &str, args: &[Value], replaces: fn(f64, f64) -> bool) -> EvalResult {
    expect_min_arity(name, args.len(), 1)?;
    let candidates = match args {
        [single @ (Value::List(_) | Value::Array(_))] => extract_sequence(name, single)?,
        _ => args.to_vec(),
    };
    let mut best: Option<(f64, Value)> = None;
    for candidate in candidates {
        let n = to_f64(name, &candidate)?;
        let better = best
            .as_ref()
            .map_or(true, |(current, _)| replaces(*current, n));
        if better {
            best = Some((n, candidate));
        }
    }
    best.map(|(_, value)| value)
        .ok_or_else(|| EvalError::host(name, "no values to compare"))
}

// ============================================================================
// JSON
// ============================================================================

fn to_json(value: &Value) -> Result<serde_json::Value, EvalError> {
    Ok(match value {
        Value::Nil => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Int(n) => serde_json::Value::Number(Number::from(*n)),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or_else(|| EvalError::host("json_encode", format!("{} is not representable", f)))?,
        Value::Str(s) => serde_json::Value::String(s.clone()),
        Value::Symbol(sym) => serde_json::Value::String(sym.name().to_string()),
        Value::List(list) => {
            serde_json::Value::Array(list.iter().map(to_json).collect::<Result<_, _>>()?)
        }
        Value::Array(array) if array.is_sequential() => {
            serde_json::Value::Array(array.values().map(to_json).collect::<Result<_, _>>()?)
        }
        Value::Array(array) => {
            let mut object = Map::new();
            for (key, item) in array.iter() {
                let key = match key {
                    ArrayKey::Index(n) => n.to_string(),
                    ArrayKey::Name(name) => name.clone(),
                };
                object.insert(key, to_json(item)?);
            }
            serde_json::Value::Object(object)
        }
        Value::Object(object) => to_json(&object.snapshot())?,
        other => {
            return Err(EvalError::host(
                "json_encode",
                format!("cannot encode a {}", other.type_name()),
            ))
        }
    })
}

fn from_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Nil,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Str(s),
        serde_json::Value::Array(items) => Value::list(items.into_iter().map(from_json)),
        serde_json::Value::Object(object) => {
            let mut array = Array::new();
            for (key, item) in object {
                let key = ArrayKey::from_value(&Value::Str(key.clone())).unwrap_or(ArrayKey::Name(key));
                array.insert(key, from_json(item));
            }
            Value::Array(array)
        }
    }
}

fn host_json_encode(args: &[Value]) -> EvalResult {
    expect_arity("json_encode", args.len(), 1)?;
    let json = to_json(&args[0])?;
    serde_json::to_string(&json)
        .map(Value::Str)
        .map_err(|e| EvalError::host("json_encode", e.to_string()))
}

fn host_json_decode(args: &[Value]) -> EvalResult {
    expect_arity("json_decode", args.len(), 1)?;
    let text = extract_str("json_decode", &args[0])?;
    serde_json::from_str(text)
        .map(from_json)
        .map_err(|e| EvalError::host("json_decode", e.to_string()))
}

// ============================================================================
// TYPES
// ============================================================================

/// A growable host-side sequence, shared by every value that refers to it.
#[derive(Debug, Default)]
pub struct Vector {
    items: RefCell<Vec<Value>>,
}

impl Vector {
    pub fn new(items: Vec<Value>) -> Self {
        Self {
            items: RefCell::new(items),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

impl HostObject for Vector {
    fn type_name(&self) -> &str {
        "Vector"
    }

    fn snapshot(&self) -> Value {
        Value::list(self.to_vec())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn vector_arg<'a>(name: &str, value: &'a Value) -> Result<&'a Vector, EvalError> {
    let vector = match value {
        Value::Object(object) => object.as_any().downcast_ref::<Vector>(),
        _ => None,
    };
    vector.ok_or_else(|| EvalError::type_mismatch(name, "a Vector", value))
}

fn construct_vector(args: &[Value]) -> EvalResult {
    Ok(Value::Object(Rc::new(Vector::new(args.to_vec()))))
}

fn vector_len(args: &[Value]) -> EvalResult {
    expect_arity("Vector::len", args.len(), 1)?;
    Ok(Value::Int(vector_arg("Vector::len", &args[0])?.len() as i64))
}

/// Appends the remaining arguments and returns the new length.
fn vector_push(args: &[Value]) -> EvalResult {
    expect_min_arity("Vector::push", args.len(), 1)?;
    let vector = vector_arg("Vector::push", &args[0])?;
    for value in &args[1..] {
        vector.push(value.clone());
    }
    Ok(Value::Int(vector.len() as i64))
}

fn vector_to_list(args: &[Value]) -> EvalResult {
    expect_arity("Vector::to_list", args.len(), 1)?;
    Ok(Value::list(vector_arg("Vector::to_list", &args[0])?.to_vec()))
}

fn construct_symbol(args: &[Value]) -> EvalResult {
    expect_arity("Symbol", args.len(), 1)?;
    Ok(Value::Symbol(Symbol::new(extract_str("Symbol", &args[0])?)))
}

fn construct_list(args: &[Value]) -> EvalResult {
    Ok(Value::List(args.iter().cloned().collect::<List>()))
}

fn list_from(args: &[Value]) -> EvalResult {
    expect_arity("List::from", args.len(), 1)?;
    Ok(Value::list(extract_sequence("List::from", &args[0])?))
}

/// `(Scope)` is an empty detached scope; `(Scope parent)` a child of `parent`.
///
/// A detached scope keeps the caller's host and budget, so work done in it
/// counts against the same limits.
fn construct_scope(args: &[Value], caller: &Scope) -> EvalResult {
    expect_arity_range("Scope", args.len(), 0, 1)?;
    match args.first() {
        None => Ok(Value::Scope(caller.detached())),
        Some(Value::Scope(parent)) => Ok(Value::Scope(parent.child())),
        Some(other) => Err(EvalError::type_mismatch("Scope", "a scope", other)),
    }
}
