//! Special forms that bind names, build closures and control evaluation.
//!
//! Each receives its operands unevaluated.

use tracing::debug;

use crate::ast::Value;
use crate::atoms::helpers::{expect_arity, expect_arity_range, expect_min_arity, extract_symbol};
use crate::atoms::{Atom, AtomRegistry, SpecialFormFn};
use crate::errors::EvalError;
use crate::runtime::{eval_body, evaluate, Function, Macro};

/// Usage: (define <symbol> <form>)
///
/// Assigns into the nearest scope that already binds the name, otherwise the
/// current one. Returns the value.
pub const ATOM_DEFINE: SpecialFormFn = |args, scope| {
    expect_arity("define", args.len(), 2)?;
    let name = extract_symbol("define", &args[0])?;
    let value = evaluate(&args[1], scope)?;
    debug!(name = %name, "define");
    scope.define(name, value.clone());
    Ok(value)
};

/// Usage: (let ((<symbol> <form>) ...) <body> ...)
///
/// Bindings are evaluated in order inside a new child scope, so later ones
/// may refer to earlier ones.
pub const ATOM_LET: SpecialFormFn = |args, scope| {
    expect_min_arity("let", args.len(), 1)?;
    let bindings = args[0]
        .as_list()
        .ok_or_else(|| EvalError::type_mismatch("let", "a binding list", &args[0]))?;
    let local = scope.child();
    for binding in bindings {
        let pair = match binding {
            Value::List(pair) if pair.len() == 2 => pair,
            other => {
                return Err(EvalError::type_mismatch(
                    "let",
                    "a (symbol form) binding",
                    other,
                ))
            }
        };
        let name = extract_symbol("let", &pair[0])?;
        let value = evaluate(&pair[1], &local)?;
        local.let_local(name, value);
    }
    eval_body(&args.rest(), &local)
};

/// Usage: (lambda (<param> ...) <body> ...)
pub const ATOM_LAMBDA: SpecialFormFn = |args, scope| {
    expect_min_arity("lambda", args.len(), 1)?;
    let parameters = args[0]
        .as_list()
        .ok_or_else(|| EvalError::type_mismatch("lambda", "a parameter list", &args[0]))?;
    let function = Function::new(scope.clone(), parameters.clone(), args.rest())?;
    Ok(function.into())
};

/// Usage: (macro <body> ...)
///
/// The whole operand list becomes the body.
pub const ATOM_MACRO: SpecialFormFn =
    |args, scope| Ok(Macro::new(scope.clone(), args.clone()).into());

/// Usage: (quote <form>)
pub const ATOM_QUOTE: SpecialFormFn = |args, _scope| {
    expect_arity("quote", args.len(), 1)?;
    Ok(args[0].clone())
};

/// Usage: (if <condition> <then> [<else>])
///
/// Only the selected branch is evaluated; a missing else yields nil.
pub const ATOM_IF: SpecialFormFn = |args, scope| {
    expect_arity_range("if", args.len(), 2, 3)?;
    if evaluate(&args[0], scope)?.is_truthy() {
        evaluate(&args[1], scope)
    } else {
        args.get(2)
            .map_or(Ok(Value::Nil), |otherwise| evaluate(otherwise, scope))
    }
};

pub fn register_special_forms(registry: &mut AtomRegistry) {
    registry.register("define", Atom::SpecialForm(ATOM_DEFINE));
    registry.register("let", Atom::SpecialForm(ATOM_LET));
    registry.register("lambda", Atom::SpecialForm(ATOM_LAMBDA));
    registry.register("macro", Atom::SpecialForm(ATOM_MACRO));
    registry.register("quote", Atom::SpecialForm(ATOM_QUOTE));
    registry.register("if", Atom::SpecialForm(ATOM_IF));
}

