use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use im::Vector;

use crate::ast::Value;

/// An ordered, possibly empty sequence of values.
///
/// The same container is program syntax (a call form) and runtime data (the
/// result of `list`). Contents are immutable and persistent, so `cdr` and
/// friends share structure with the original. The outer `Rc` gives every list
/// an identity, which strict equality observes.
#[derive(Clone, Default)]
pub struct List(Rc<Vector<Value>>);

impl List {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn iter(&self) -> im::vector::Iter<'_, Value> {
        self.0.iter()
    }

    /// First element, or `None` for the empty list.
    pub fn car(&self) -> Option<&Value> {
        self.0.front()
    }

    /// Everything after the first element.
    ///
    /// The empty list has no tail at all (`None`), while a one-element list
    /// has an empty tail.
    pub fn cdr(&self) -> Option<List> {
        if self.is_empty() {
            return None;
        }
        Some(self.rest())
    }

    /// Like [`List::cdr`] but total: the tail of an empty list is empty.
    pub fn rest(&self) -> List {
        let mut items = (*self.0).clone();
        items.pop_front();
        List(Rc::new(items))
    }

    /// True when both handles point at the same list instance.
    pub fn ptr_eq(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.0.iter().cloned().collect()
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0 == other.0
    }
}

impl Index<usize> for List {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.0[index]
    }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        List(Rc::new(iter.into_iter().collect()))
    }
}

impl From<Vec<Value>> for List {
    fn from(items: Vec<Value>) -> Self {
        items.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = im::vector::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl fmt::Display for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, item) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, ")")
    }
}
