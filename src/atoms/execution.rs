//! # Execution Control
//!
//! ## Atoms Provided
//!
//! - **Evaluation**: `eval`, `do` (special forms)
//! - **Higher-order**: `apply`, `map`, `filter`, `fold`
//!
//! The higher-order atoms go through [`call`], so they accept interpreted
//! callables and host function names alike.

use crate::ast::Value;
use crate::atoms::helpers::{
    expect_arity, expect_arity_range, expect_callable, expect_min_arity, extract_sequence,
};
use crate::atoms::{Atom, AtomRegistry, SpecialFormFn, StatefulAtomFn};
use crate::errors::EvalError;
use crate::runtime::{call, eval_body, evaluate};

/// Evaluates a form, then evaluates the result.
///
/// Usage: (eval <form> [<scope>])
///   - <form>: evaluated in the caller to produce the form to run
///   - <scope>: evaluated in the caller; the produced form runs there
///     instead of in the caller
///
/// Example:
///   (eval (quote (+ 1 2)))           ; => 3
///   (eval (car #arguments) #scope)   ; inside a macro body
pub const ATOM_EVAL: SpecialFormFn = |args, scope| {
    expect_arity_range("eval", args.len(), 1, 2)?;
    let form = evaluate(&args[0], scope)?;
    match args.get(1) {
        Some(scope_form) => match evaluate(scope_form, scope)? {
            Value::Scope(target) => evaluate(&form, &target),
            other => Err(EvalError::type_mismatch("eval", "a scope", &other)),
        },
        None => evaluate(&form, scope),
    }
};

/// Evaluates forms in sequence and returns the last.
///
/// Usage: (do <form> ...)
pub const ATOM_DO: SpecialFormFn = |args, scope| eval_body(args, scope);

/// Calls a callable with the elements of a list or array.
///
/// Usage: (apply <callable> <list>)
///
/// Example:
///   (apply + '(1 2 3)) ; => 6
pub const ATOM_APPLY: StatefulAtomFn = |args, scope| {
    expect_arity("apply", args.len(), 2)?;
    expect_callable("apply", scope, &args[0])?;
    let operands = extract_sequence("apply", &args[1])?;
    call(scope, &args[0], operands)
};

/// Calls a callable across lists in lock step.
///
/// Usage: (map <callable> <list> ...)
///
/// Stops at the end of the shortest list.
///
/// Example:
///   (map + '(1 2 3) '(10 20)) ; => (11 22)
pub const ATOM_MAP: StatefulAtomFn = |args, scope| {
    expect_min_arity("map", args.len(), 2)?;
    expect_callable("map", scope, &args[0])?;
    let columns = args[1..]
        .iter()
        .map(|arg| extract_sequence("map", arg))
        .collect::<Result<Vec<_>, _>>()?;
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
    let mut results = Vec::with_capacity(rows);
    for i in 0..rows {
        let operands = columns.iter().map(|column| column[i].clone()).collect();
        results.push(call(scope, &args[0], operands)?);
    }
    Ok(Value::list(results))
};

/// Elements for which the callable returns a truthy value.
///
/// Usage: (filter <callable> <list>)
pub const ATOM_FILTER: StatefulAtomFn = |args, scope| {
    expect_arity("filter", args.len(), 2)?;
    expect_callable("filter", scope, &args[0])?;
    let mut kept = Vec::new();
    for item in extract_sequence("filter", &args[1])? {
        if call(scope, &args[0], vec![item.clone()])?.is_truthy() {
            kept.push(item);
        }
    }
    Ok(Value::list(kept))
};

/// Left fold.
///
/// Usage: (fold <callable> <initial> <list>)
///
/// Example:
///   (fold + 0 '(1 2 3)) ; => 6
pub const ATOM_FOLD: StatefulAtomFn = |args, scope| {
    expect_arity("fold", args.len(), 3)?;
    expect_callable("fold", scope, &args[0])?;
    extract_sequence("fold", &args[2])?
        .into_iter()
        .try_fold(args[1].clone(), |acc, item| {
            call(scope, &args[0], vec![acc, item])
        })
};

// ============================================================================
// REGISTRATION FUNCTION
// ============================================================================

pub fn register_execution_atoms(registry: &mut AtomRegistry) {
    registry.register("eval", Atom::SpecialForm(ATOM_EVAL));
    registry.register("do", Atom::SpecialForm(ATOM_DO));
    registry.register("apply", Atom::Stateful(ATOM_APPLY));
    registry.register("map", Atom::Stateful(ATOM_MAP));
    registry.register("filter", Atom::Stateful(ATOM_FILTER));
    registry.register("fold", Atom::Stateful(ATOM_FOLD));
}
