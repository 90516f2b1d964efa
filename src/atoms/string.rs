//! String and symbol construction.

use crate::ast::{Symbol, Value};
use crate::atoms::helpers::{expect_arity, extract_str};
use crate::atoms::{Atom, AtomRegistry, PureAtomFn};

/// Interns a string as a symbol.
///
/// Usage: (symbol <string>)
///
/// Example:
///   (eq (symbol "abc") 'abc) ; => true
pub const ATOM_SYMBOL: PureAtomFn = |args| {
    expect_arity("symbol", args.len(), 1)?;
    Ok(Value::Symbol(Symbol::new(extract_str("symbol", &args[0])?)))
};

/// Concatenates the display forms of its operands.
///
/// Usage: (string <a> <b> ...)
///
/// Example:
///   (string "a" 1 'b) ; => "a1b"
pub const ATOM_STRING: PureAtomFn = |args| {
    let text: String = args.iter().map(ToString::to_string).collect();
    Ok(Value::Str(text))
};

pub fn register_string_atoms(registry: &mut AtomRegistry) {
    registry.register("symbol", Atom::Pure(ATOM_SYMBOL));
    registry.register("string", Atom::Pure(ATOM_STRING));
    registry.alias(".", "string");
}
