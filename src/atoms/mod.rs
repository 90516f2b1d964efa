//! # sandlisp Atom System
//!
//! Atoms are the built-in operations bound in every sandbox.
//!
//! ## Module Structure
//!
//! - **`helpers`**: Shared arity checks and value extraction
//! - **`math`**: Arithmetic (`+`, `-`, `*`, `/`, `%`)
//! - **`logic`**: Truthiness, equality, ordering and type predicates
//! - **`collections`**: Lists, arrays and `dict`
//! - **`execution`**: `eval`, `do`, `apply`, `map`, `filter`, `fold`
//! - **`special_forms`**: `define`, `let`, `lambda`, `macro`, `quote`, `if`
//! - **`external`**: Sandboxed host imports (`use`)
//! - **`string`**: Symbol and string construction
//!
//! ## Calling Conventions
//!
//! - **Pure** atoms see evaluated arguments only.
//! - **Stateful** atoms see evaluated arguments and the caller's scope.
//! - **Special forms** see raw argument forms and decide what to evaluate.

use std::fmt;
use std::rc::Rc;

use im::HashMap;

use crate::ast::{List, Symbol, Value};
use crate::errors::EvalResult;
use crate::runtime::callable::quote_all;
use crate::runtime::{eval_args, Callable, Scope};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Pure atoms: operate only on evaluated values
pub type PureAtomFn = fn(args: &[Value]) -> EvalResult;

/// Stateful atoms: evaluated values plus the caller's scope
pub type StatefulAtomFn = fn(args: &[Value], scope: &Scope) -> EvalResult;

/// Special forms: raw operands plus the caller's scope
pub type SpecialFormFn = fn(args: &List, scope: &Scope) -> EvalResult;

/// The unified atom representation supporting three calling conventions
#[derive(Clone, Copy)]
pub enum Atom {
    Pure(PureAtomFn),
    Stateful(StatefulAtomFn),
    SpecialForm(SpecialFormFn),
}

/// A named atom, as bound in a scope.
pub struct Primitive {
    pub name: &'static str,
    pub atom: Atom,
}

impl Primitive {
    pub fn new(name: &'static str, atom: Atom) -> Self {
        Self { name, atom }
    }

    pub fn is_special_form(&self) -> bool {
        matches!(self.atom, Atom::SpecialForm(_))
    }

    /// Applies the atom to raw operands.
    pub fn apply(&self, scope: &Scope, args: &List) -> EvalResult {
        match self.atom {
            Atom::Pure(f) => f(&eval_args(args, scope)?),
            Atom::Stateful(f) => f(&eval_args(args, scope)?, scope),
            Atom::SpecialForm(f) => f(args, scope),
        }
    }

    /// Applies the atom to evaluated values. Special forms receive them quoted.
    pub fn call(&self, scope: &Scope, args: &[Value]) -> EvalResult {
        match self.atom {
            Atom::Pure(f) => f(args),
            Atom::Stateful(f) => f(args, scope),
            Atom::SpecialForm(f) => f(&quote_all(args.iter().cloned()), scope),
        }
    }
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.atom {
            Atom::Pure(_) => "pure",
            Atom::Stateful(_) => "stateful",
            Atom::SpecialForm(_) => "special form",
        };
        write!(f, "Primitive({} {})", kind, self.name)
    }
}

// Registry for all atoms, inspectable at runtime.
#[derive(Default, Clone)]
pub struct AtomRegistry {
    pub atoms: HashMap<String, Rc<Primitive>>,
}

impl AtomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Rc<Primitive>> {
        self.atoms.get(name)
    }

    pub fn list(&self) -> Vec<String> {
        self.atoms.keys().cloned().collect()
    }

    pub fn register(&mut self, name: &'static str, atom: Atom) {
        self.atoms
            .insert(name.to_string(), Rc::new(Primitive::new(name, atom)));
    }

    /// Binds `alias` to the very same primitive as `target`.
    pub fn alias(&mut self, alias: &str, target: &str) {
        if let Some(primitive) = self.atoms.get(target).cloned() {
            self.atoms.insert(alias.to_string(), primitive);
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.atoms.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Binds every registered atom into `scope`'s local frame.
    pub fn install(&self, scope: &Scope) {
        for (name, primitive) in &self.atoms {
            let callable = Callable::Primitive(Rc::clone(primitive));
            scope.let_local(Symbol::new(name), Value::Callable(callable));
        }
    }
}

// ============================================================================
// MODULAR ATOM IMPLEMENTATIONS
// ============================================================================

// Core infrastructure shared by all atoms
pub mod helpers;

// Domain-specific atom modules
pub mod collections;
pub mod execution;
pub mod external;
pub mod logic;
pub mod math;
pub mod special_forms;
pub mod string;

// ============================================================================
// UNIFIED REGISTRATION FUNCTION
// ============================================================================

/// Registers all standard atoms from all modules with the given registry.
/// This is the main entry point for setting up the complete atom system.
pub fn register_all_atoms(registry: &mut AtomRegistry) {
    special_forms::register_special_forms(registry);
    math::register_math_atoms(registry);
    logic::register_logic_atoms(registry);
    collections::register_collection_atoms(registry);
    execution::register_execution_atoms(registry);
    external::register_external_atoms(registry);
    string::register_string_atoms(registry);
}
