use std::fmt;
use std::rc::Rc;

use crate::ast::{Array, List, Symbol};
use crate::foreign::HostObject;
use crate::runtime::{Callable, Scope};

/// Represents a value in the sandlisp engine.
///
/// Literals, symbols and lists double as program forms; the remaining
/// variants only ever appear at runtime.
///
/// # Examples
///
/// ```rust
/// use sandlisp::ast::Value;
/// let n = Value::Int(3);
/// assert_eq!(n.type_name(), "int");
/// assert!(Value::default().is_nil());
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absence sentinel: unbound reads, `(cdr '())`, missing else branches.
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Symbol(Symbol),
    List(List),
    Array(Array),
    Scope(Scope),
    Callable(Callable),
    Object(Rc<dyn HostObject>),
}

impl Value {
    pub fn str(text: impl Into<String>) -> Value {
        Value::Str(text.into())
    }

    pub fn sym(name: &str) -> Value {
        Value::Symbol(Symbol::new(name))
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Value {
        Value::List(items.into_iter().collect())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Symbol(_) => "symbol",
            Value::List(_) => "list",
            Value::Array(_) => "array",
            Value::Scope(_) => "scope",
            Value::Callable(_) => "callable",
            Value::Object(_) => "object",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Truthiness used by `if`, `not`, `and` and `or`.
    ///
    /// `false`, numeric zero, the empty string and nil are falsy; every other
    /// value is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_symbol(&self) -> Option<Symbol> {
        match self {
            Value::Symbol(sym) => Some(*sym),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Value::Scope(scope) => Some(scope),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(callable) => Some(callable),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    // ------------------------------------------------------------------------
    // Equality policies
    // ------------------------------------------------------------------------

    /// Identity-aware strict equality: same type and same value, and for
    /// lists, scopes, callables and host objects the same instance.
    pub fn strict_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Array(a), Value::Array(b)) => a.strict_eq(b),
            (Value::Scope(a), Value::Scope(b)) => a.ptr_eq(b),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => same_object(a, b),
            _ => false,
        }
    }

    /// Coercive equality: integers equal floats of the same magnitude,
    /// numeric strings compare as numbers, booleans and nil compare by
    /// truthiness, and composite values compare structurally.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), b) | (b, Value::Bool(a)) => *a == b.is_truthy(),
            (Value::Nil, b) | (b, Value::Nil) => !b.is_truthy(),
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => match (parse_number(a), parse_number(b)) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
            (Value::Str(s), n) | (n, Value::Str(s)) if n.as_f64().is_some() => {
                match (parse_number(s), n.as_f64()) {
                    (Some(x), Some(y)) => x == y,
                    _ => n.to_string() == *s,
                }
            }
            (a, b) if a.as_f64().is_some() && b.as_f64().is_some() => a.as_f64() == b.as_f64(),
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::List(a), Value::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.loose_eq(y))
            }
            (Value::Array(a), Value::Array(b)) => a.loose_eq(b),
            (Value::Object(a), Value::Object(b)) => {
                same_object(a, b)
                    || (a.type_name() == b.type_name() && a.snapshot().loose_eq(&b.snapshot()))
            }
            (Value::Scope(a), Value::Scope(b)) => a.ptr_eq(b),
            (Value::Callable(a), Value::Callable(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

fn same_object(a: &Rc<dyn HostObject>, b: &Rc<dyn HostObject>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Structural equality, used by Rust-side comparisons and tests.
///
/// Unlike [`Value::loose_eq`] this never coerces across types; unlike
/// [`Value::strict_eq`] lists compare by content.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => self.strict_eq(other),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::Symbol(sym) => write!(f, "{}", sym),
            Value::List(list) => write!(f, "{}", list),
            Value::Array(array) => write!(f, "{}", array),
            Value::Scope(_) => write!(f, "#<scope>"),
            Value::Callable(callable) => write!(f, "#<{}>", callable.describe()),
            Value::Object(object) => write!(f, "#<{}>", object.type_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_table() {
        for falsy in [
            Value::Nil,
            Value::Bool(false),
            Value::Int(0),
            Value::Float(0.0),
            Value::str(""),
        ] {
            assert!(!falsy.is_truthy(), "{falsy:?} should be falsy");
        }
        for truthy in [Value::Int(2), Value::str("abc"), Value::list([]), Value::str("0")] {
            assert!(truthy.is_truthy(), "{truthy:?} should be truthy");
        }
    }

    #[test]
    fn strict_eq_separates_int_and_float() {
        assert!(Value::Int(3).strict_eq(&Value::Int(3)));
        assert!(!Value::Int(3).strict_eq(&Value::Float(3.0)));
        assert!(Value::Float(3.0).strict_eq(&Value::Float(3.0)));
    }

    #[test]
    fn loose_eq_coerces() {
        assert!(Value::Int(3).loose_eq(&Value::Float(3.0)));
        assert!(Value::Int(3).loose_eq(&Value::str("3")));
        assert!(Value::Nil.loose_eq(&Value::Bool(false)));
        assert!(!Value::str("foo").loose_eq(&Value::str("bar")));
        assert!(Value::list([Value::Int(1)]).loose_eq(&Value::list([Value::Float(1.0)])));
    }

    #[test]
    fn lists_compare_by_identity_under_strict_eq() {
        let list = Value::list([Value::Int(1)]);
        assert!(list.strict_eq(&list.clone()));
        assert!(!list.strict_eq(&Value::list([Value::Int(1)])));
        assert_eq!(list, Value::list([Value::Int(1)]));
    }

    #[test]
    fn floats_display_with_a_fraction() {
        assert_eq!(Value::Float(3.0).to_string(), "3.0");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
    }
}
