use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::Value;
use crate::errors::{EvalError, EvalResult};
use crate::foreign::{HostFn, HostRegistry, HostType};
use crate::runtime::Scope;

/// A host function bound by name.
///
/// Construction fails with [`EvalError::UnknownIdentifier`] when the name is
/// not registered, so a bound `ForeignFunction` is always invocable.
#[derive(Clone)]
pub struct ForeignFunction {
    name: String,
    function: HostFn,
}

impl ForeignFunction {
    pub fn new(host: &HostRegistry, name: &str) -> Result<Self, EvalError> {
        let function = host
            .function(name)
            .ok_or_else(|| EvalError::UnknownIdentifier {
                kind: "function",
                name: name.to_string(),
            })?;
        Ok(Self {
            name: name.to_string(),
            function,
        })
    }

    /// Wraps a function that did not come from a registry lookup, such as a
    /// static method. `name` is used for diagnostics only.
    pub fn from_host_fn(name: impl Into<String>, function: HostFn) -> Self {
        Self {
            name: name.into(),
            function,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Forwards evaluated arguments and returns the host result unchanged.
    pub fn call(&self, args: &[Value]) -> EvalResult {
        (self.function)(args)
    }
}

impl fmt::Debug for ForeignFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForeignFunction({})", self.name)
    }
}

/// A host type bound by name; applying it constructs an instance.
#[derive(Clone)]
pub struct ForeignConstructor {
    host_type: Rc<HostType>,
}

impl ForeignConstructor {
    pub fn new(host: &HostRegistry, name: &str) -> Result<Self, EvalError> {
        let host_type = host
            .host_type(name)
            .ok_or_else(|| EvalError::UnknownIdentifier {
                kind: "type",
                name: name.to_string(),
            })?;
        Ok(Self { host_type })
    }

    pub fn name(&self) -> &str {
        self.host_type.name()
    }

    /// Builds an instance; `scope` is the scope the constructor was applied in.
    pub fn construct(&self, scope: &Scope, args: &[Value]) -> EvalResult {
        self.host_type.construct(scope, args)
    }

    /// The type's static methods, keyed by method name.
    pub fn static_methods(&self) -> BTreeMap<String, ForeignFunction> {
        self.host_type
            .static_methods()
            .iter()
            .map(|(method, function)| {
                let qualified = format!("{}::{}", self.name(), method);
                (
                    method.clone(),
                    ForeignFunction::from_host_fn(qualified, Rc::clone(function)),
                )
            })
            .collect()
    }
}

impl fmt::Debug for ForeignConstructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ForeignConstructor({})", self.name())
    }
}
