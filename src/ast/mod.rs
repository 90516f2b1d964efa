//! AST module for the sandlisp language.
//!
//! Program syntax and runtime data share one representation: a form is a
//! [`Symbol`], a literal scalar, or a [`List`], and all of them are [`Value`]s.
//! Evaluation adds runtime-only shapes (scopes, callables, arrays, host objects)
//! to the same enum.

use std::fmt;

use internment::Intern;
use once_cell::sync::Lazy;

// ============================================================================
// SYMBOLS
// ============================================================================

/// An interned name.
///
/// Interning is process-wide and entries are never evicted, so two symbols
/// built from the same text are the same identity and compare in O(1).
///
/// # Examples
///
/// ```rust
/// use sandlisp::ast::Symbol;
/// assert_eq!(Symbol::new("car"), Symbol::new("car"));
/// assert_ne!(Symbol::new("car"), Symbol::new("cdr"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol(Intern<String>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Symbol(Intern::new(name.to_owned()))
    }

    pub fn name(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.name())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol::new(name)
    }
}

// ----------------------------------------------------------------------------
// Reserved implicit bindings
// ----------------------------------------------------------------------------

// The `#` prefix keeps these out of the way of ordinary identifiers.

/// Every argument a function received, or the raw argument forms of a macro call.
pub static ARGUMENTS: Lazy<Symbol> = Lazy::new(|| Symbol::new("#arguments"));

/// The caller's scope inside a macro body.
pub static CALLER_SCOPE: Lazy<Symbol> = Lazy::new(|| Symbol::new("#scope"));

/// Head symbol produced by the reader for `'form`.
pub static QUOTE: Lazy<Symbol> = Lazy::new(|| Symbol::new("quote"));

// ============================================================================
// MODULE EXPORTS
// ============================================================================

pub mod array;
pub mod list;
pub mod value;

pub use array::{Array, ArrayKey};
pub use list::List;
pub use value::Value;
