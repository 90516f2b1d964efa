//! # Sandboxed Host Imports
//!
//! `use` binds host functions and types into the current frame under a name.
//! Imports land in that frame alone, so the names never leak into enclosing
//! scopes or into other sandboxes. Host types are reachable only this way;
//! registered host functions can also be called by string name through the
//! generic call path without an import.

use tracing::debug;

use crate::ast::{Symbol, Value};
use crate::atoms::helpers::extract_symbol;
use crate::atoms::{Atom, AtomRegistry, SpecialFormFn};
use crate::errors::EvalError;
use crate::foreign::{ForeignConstructor, ForeignFunction};
use crate::runtime::Scope;

/// Imports host functions and types into the current scope.
///
/// Usage: (use <import> ...)
///   - name: a host function, bound under the same name
///   - <Type>: a host type constructor, bound as `<Type>`, plus each static
///     method bound as `<Type>::method`
///   - (source alias): either of the above, bound as `alias` (statics as
///     `alias::method`)
///
/// Dashes and slashes in host names are read as underscores, so
/// `array-slice` imports `array_slice` and `<Lisp/List>` imports `Lisp_List`.
///
///   Returns: List of the imported callables
///
/// Example:
///   (use <Vector>)
///   (define v (<Vector> 1))
///   (<Vector>::push v 2) ; => 2
pub const ATOM_USE: SpecialFormFn = |args, scope| {
    let mut imported = Vec::with_capacity(args.len());
    for form in args {
        let (source, alias) = import_names(form)?;
        let import = resolve_import(scope, source).map_err(|cause| EvalError::UnresolvedImport {
            name: source.name().to_string(),
            source: Box::new(cause),
        })?;
        debug!(import = source.name(), binding = alias.name(), "use");
        let callable = match import {
            Import::Function(function) => Value::from(function),
            Import::Type(constructor) => {
                for (method, function) in constructor.static_methods() {
                    let binding = format!("{}::{}", alias.name(), method);
                    debug!(binding = binding.as_str(), "use static");
                    scope.let_local(Symbol::new(&binding), function.into());
                }
                Value::from(constructor)
            }
        };
        scope.let_local(alias, callable.clone());
        imported.push(callable);
    }
    Ok(Value::list(imported))
};

enum Import {
    Function(ForeignFunction),
    Type(ForeignConstructor),
}

fn import_names(form: &Value) -> Result<(Symbol, Symbol), EvalError> {
    match form {
        Value::Symbol(name) => Ok((*name, *name)),
        Value::List(pair) if pair.len() == 2 => Ok((
            extract_symbol("use", &pair[0])?,
            extract_symbol("use", &pair[1])?,
        )),
        other => Err(EvalError::type_mismatch(
            "use",
            "a name or (source alias) pair",
            other,
        )),
    }
}

fn resolve_import(scope: &Scope, source: Symbol) -> Result<Import, EvalError> {
    let written = source.name();
    match written.strip_prefix('<').and_then(|rest| rest.strip_suffix('>')) {
        Some(type_name) => Ok(Import::Type(ForeignConstructor::new(
            scope.host(),
            &host_name(type_name),
        )?)),
        None => Ok(Import::Function(ForeignFunction::new(
            scope.host(),
            &host_name(written),
        )?)),
    }
}

fn host_name(written: &str) -> String {
    written.replace(['-', '/'], "_")
}

pub fn register_external_atoms(registry: &mut AtomRegistry) {
    registry.register("use", Atom::SpecialForm(ATOM_USE));
}
