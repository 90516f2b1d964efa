use std::fmt;

use im::{HashMap, Vector};

use crate::ast::Value;

/// Key of an [`Array`] entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrayKey {
    Index(i64),
    Name(String),
}

impl ArrayKey {
    /// Converts a runtime value to a key, the way host-native arrays coerce keys.
    ///
    /// Strings holding a canonical decimal integer become index keys, floats
    /// truncate, booleans become 0/1 and nil becomes the empty name. Other
    /// values cannot be keys.
    pub fn from_value(value: &Value) -> Option<ArrayKey> {
        match value {
            Value::Int(n) => Some(ArrayKey::Index(*n)),
            Value::Float(f) if f.is_finite() => Some(ArrayKey::Index(f.trunc() as i64)),
            Value::Bool(b) => Some(ArrayKey::Index(i64::from(*b))),
            Value::Nil => Some(ArrayKey::Name(String::new())),
            Value::Str(s) => Some(match canonical_index(s) {
                Some(n) => ArrayKey::Index(n),
                None => ArrayKey::Name(s.clone()),
            }),
            Value::Symbol(sym) => Some(ArrayKey::Name(sym.name().to_owned())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ArrayKey::Index(n) => Value::Int(*n),
            ArrayKey::Name(s) => Value::Str(s.clone()),
        }
    }
}

fn canonical_index(text: &str) -> Option<i64> {
    let n = text.parse::<i64>().ok()?;
    (n.to_string() == text).then_some(n)
}

impl fmt::Display for ArrayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayKey::Index(n) => write!(f, "{}", n),
            ArrayKey::Name(s) => write!(f, "{:?}", s),
        }
    }
}

/// A host-native ordered array mixing positional and keyed entries.
///
/// Positional entries receive auto-incrementing integer keys that continue
/// after the largest integer key inserted so far, independent of any named
/// keys. Insertion order is preserved; re-inserting an existing key replaces
/// the value in place.
///
/// # Examples
///
/// ```rust
/// use sandlisp::ast::{Array, ArrayKey, Value};
/// let mut array = Array::new();
/// array.insert(ArrayKey::Name("key".into()), Value::Int(1));
/// array.push(Value::Int(3));
/// assert_eq!(array.get(&ArrayKey::Index(0)), Some(&Value::Int(3)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Array {
    entries: Vector<(ArrayKey, Value)>,
    positions: HashMap<ArrayKey, usize>,
    next_index: i64,
}

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        let mut array = Self::new();
        for value in values {
            array.push(value);
        }
        array
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends a value under the next positional key.
    pub fn push(&mut self, value: Value) {
        self.insert(ArrayKey::Index(self.next_index), value);
    }

    pub fn insert(&mut self, key: ArrayKey, value: Value) {
        if let ArrayKey::Index(n) = key {
            if n >= self.next_index {
                self.next_index = n.saturating_add(1);
            }
        }
        match self.positions.get(&key) {
            Some(&position) => {
                self.entries.set(position, (key, value));
            }
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push_back((key, value));
            }
        }
    }

    pub fn get(&self, key: &ArrayKey) -> Option<&Value> {
        let position = *self.positions.get(key)?;
        self.entries.get(position).map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &ArrayKey) -> bool {
        self.positions.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArrayKey, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ArrayKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    /// True when the keys are exactly `0..len` in order.
    pub fn is_sequential(&self) -> bool {
        self.keys()
            .enumerate()
            .all(|(i, key)| *key == ArrayKey::Index(i as i64))
    }

    /// Same entries in the same order, compared strictly.
    pub fn strict_eq(&self, other: &Array) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va.strict_eq(vb))
    }

    /// Same key set with loosely equal values, in any order.
    pub fn loose_eq(&self, other: &Array) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|v| value.loose_eq(v)))
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va == vb)
    }
}

impl fmt::Display for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_keys_follow_largest_index() {
        let mut array = Array::new();
        array.insert(ArrayKey::Index(5), Value::Int(1));
        array.insert(ArrayKey::Name("x".into()), Value::Int(2));
        array.push(Value::Int(3));
        assert_eq!(array.get(&ArrayKey::Index(6)), Some(&Value::Int(3)));
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut array = Array::from_values([Value::Int(1), Value::Int(2)]);
        array.insert(ArrayKey::Index(0), Value::Int(9));
        let values: Vec<_> = array.values().cloned().collect();
        assert_eq!(values, vec![Value::Int(9), Value::Int(2)]);
        assert!(array.is_sequential());
    }

    #[test]
    fn numeric_string_keys_become_indices() {
        assert_eq!(
            ArrayKey::from_value(&Value::Str("12".into())),
            Some(ArrayKey::Index(12))
        );
        assert_eq!(
            ArrayKey::from_value(&Value::Str("012".into())),
            Some(ArrayKey::Name("012".into()))
        );
    }
}
