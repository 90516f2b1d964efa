//! The environment seed: every built-in bound into a fresh root scope.
//!
//! The atom table is built once per thread and shared; each call to
//! [`sandbox`] copies it into a brand-new frame, so mutations made by one
//! evaluation can never be observed by another.

use crate::ast::{Symbol, Value};
use crate::atoms::{register_all_atoms, AtomRegistry};
use crate::foreign::HostRegistry;
use crate::runtime::{EvalConfig, Scope};

thread_local! {
    static SEED: AtomRegistry = {
        let mut registry = AtomRegistry::new();
        register_all_atoms(&mut registry);
        registry
    };
}

/// The built-in atoms, as registered for this thread.
pub fn seed() -> AtomRegistry {
    SEED.with(AtomRegistry::clone)
}

/// A fresh root scope with every built-in and the standard host library.
pub fn sandbox() -> Scope {
    sandbox_with(HostRegistry::standard(), EvalConfig::default())
}

/// A fresh root scope with every built-in, importing from `host`.
pub fn sandbox_with(host: HostRegistry, config: EvalConfig) -> Scope {
    let scope = Scope::new(host, config);
    SEED.with(|seed| seed.install(&scope));
    for (name, value) in [
        ("nil", Value::Nil),
        ("null", Value::Nil),
        ("true", Value::Bool(true)),
        ("false", Value::Bool(false)),
    ] {
        scope.let_local(Symbol::new(name), value);
    }
    scope
}
