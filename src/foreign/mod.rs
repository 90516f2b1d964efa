//! # Foreign Bindings
//!
//! The host side of the language. A [`HostRegistry`] names the Rust
//! functions and types a sandbox may import; [`ForeignFunction`] and
//! [`ForeignConstructor`] wrap registry entries so they satisfy the callable
//! contract.
//!
//! The registry is the sandbox boundary. `use` binds entries into a scope
//! under a name, and the generic call path (`apply`, `map`, `call`, ...)
//! also resolves a string callee against the registry's functions, so every
//! registered function is reachable by name without an import. Host types
//! are reachable only through `use`. Names absent from the registry fail
//! with `UnknownIdentifier`.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use im::HashMap;

use crate::ast::Value;
use crate::errors::EvalResult;
use crate::runtime::Scope;

pub mod bridge;
pub mod std_lib;

pub use bridge::{ForeignConstructor, ForeignFunction};

/// A host function: evaluated arguments in, value or error out.
pub type HostFn = Rc<dyn Fn(&[Value]) -> EvalResult>;

/// A host constructor that also sees the scope it was applied in.
pub type ScopedHostFn = Rc<dyn Fn(&[Value], &Scope) -> EvalResult>;

/// An opaque host value produced by a foreign constructor.
///
/// Host objects compare by identity under `eq`, and under `equal` by type
/// name plus [`HostObject::snapshot`].
pub trait HostObject: fmt::Debug {
    fn type_name(&self) -> &str;

    /// A plain-value view of the object's current state.
    fn snapshot(&self) -> Value;

    fn as_any(&self) -> &dyn Any;
}

/// A host type: a constructor plus named static methods.
#[derive(Clone)]
pub struct HostType {
    name: String,
    constructor: ScopedHostFn,
    static_methods: BTreeMap<String, HostFn>,
}

impl HostType {
    pub fn new(name: &str, constructor: impl Fn(&[Value]) -> EvalResult + 'static) -> Self {
        Self::with_scope(name, move |args, _scope| constructor(args))
    }

    /// A type whose constructor receives the caller's scope, for values that
    /// must stay tied to the caller's host and limits.
    pub fn with_scope(
        name: &str,
        constructor: impl Fn(&[Value], &Scope) -> EvalResult + 'static,
    ) -> Self {
        Self {
            name: name.to_string(),
            constructor: Rc::new(constructor),
            static_methods: BTreeMap::new(),
        }
    }

    pub fn with_static(
        mut self,
        method: &str,
        function: impl Fn(&[Value]) -> EvalResult + 'static,
    ) -> Self {
        self.static_methods
            .insert(method.to_string(), Rc::new(function));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn construct(&self, scope: &Scope, args: &[Value]) -> EvalResult {
        (self.constructor)(args, scope)
    }

    pub fn static_methods(&self) -> &BTreeMap<String, HostFn> {
        &self.static_methods
    }
}

impl fmt::Debug for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostType")
            .field("name", &self.name)
            .field("static_methods", &self.static_methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Name resolution for host functions and host types.
///
/// Cloning is cheap; every scope tree holds one registry at its root.
///
/// # Examples
///
/// ```rust
/// use sandlisp::ast::Value;
/// use sandlisp::foreign::HostRegistry;
///
/// let mut host = HostRegistry::new();
/// host.register_fn("answer", |_args| Ok(Value::Int(42)));
/// assert!(host.function("answer").is_some());
/// assert!(host.function("question").is_none());
/// ```
#[derive(Clone, Default)]
pub struct HostRegistry {
    functions: HashMap<String, HostFn>,
    types: HashMap<String, Rc<HostType>>,
}

impl HostRegistry {
    /// An empty registry: nothing can be imported.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard host library (see [`std_lib`]).
    pub fn standard() -> Self {
        let mut registry = Self::new();
        std_lib::register_standard_library(&mut registry);
        registry
    }

    pub fn register_fn(
        &mut self,
        name: &str,
        function: impl Fn(&[Value]) -> EvalResult + 'static,
    ) -> &mut Self {
        self.functions.insert(name.to_string(), Rc::new(function));
        self
    }

    pub fn register_type(&mut self, host_type: HostType) -> &mut Self {
        self.types
            .insert(host_type.name().to_string(), Rc::new(host_type));
        self
    }

    pub fn function(&self, name: &str) -> Option<HostFn> {
        self.functions.get(name).cloned()
    }

    pub fn host_type(&self, name: &str) -> Option<Rc<HostType>> {
        self.types.get(name).cloned()
    }

    pub fn function_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.functions.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn type_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.types.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for HostRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostRegistry")
            .field("functions", &self.function_names())
            .field("types", &self.type_names())
            .finish()
    }
}
