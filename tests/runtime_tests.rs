mod common;

use std::any::Any;
use std::cell::Cell;
use std::rc::Rc;

use common::{eval, eval_err, eval_in, form, int_list, list};
use sandlisp::prelude::*;
use sandlisp::runtime::{Function, Macro, DEFAULT_MAX_DEPTH};

// ---
// Evaluator and eval
// ---

#[test]
fn test_eval_round_trips_quoted_forms() {
    assert_eq!(eval("(eval '(+ 1 2 [- 4 3]))"), Value::Int(4));
    assert_eq!(eval("(eval (quote (+ 1 2)))"), Value::Int(3));
    assert_eq!(eval("(eval (quote \"abc\"))"), Value::str("abc"));
    assert_eq!(eval("(eval (quote 5))"), Value::Int(5));
}

#[test]
fn test_eval_runs_the_form_in_the_supplied_scope() {
    let target = sandbox();
    target.define(Symbol::new("x"), Value::Int(10));
    let caller = sandbox();
    caller.let_local(Symbol::new("env"), Value::Scope(target.clone()));

    assert_eq!(eval_in(&caller, "(eval 'x env)").unwrap(), Value::Int(10));
    assert_eq!(eval_in(&caller, "(eval 'x)").unwrap(), Value::Nil);

    eval_in(&caller, "(eval '(define y 1) env)").unwrap();
    assert_eq!(target.get("y"), Value::Int(1));
    assert!(!caller.contains(Symbol::new("y")));
}

#[test]
fn test_eval_rejects_a_non_scope_target() {
    assert_eq!(eval_err("(eval 'x 5)"), ErrorKind::TypeMismatch);
}

#[test]
fn test_empty_list_and_literals_evaluate_to_themselves() {
    assert_eq!(eval("()"), Value::list([]));
    assert_eq!(eval("2.5"), Value::Float(2.5));
    assert_eq!(eval("undefined-name"), Value::Nil);
}

#[test]
fn test_applying_an_unbound_name_is_a_type_mismatch() {
    let err = eval_in(&sandbox(), "(undefined-fn 1)").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert!(err.to_string().contains("undefined-fn"));
}

// ---
// define / let / quote / if / do
// ---

#[test]
fn test_define_binds_and_returns_the_value() {
    let scope = sandbox();
    let pi = eval_in(&scope, "(define *pi* 3.14159)").unwrap();
    assert_eq!(pi, Value::Float(3.14159));
    assert_eq!(scope.get("*pi*"), Value::Float(3.14159));
    assert_eq!(eval_in(&scope, "(define pi2 *pi*)").unwrap(), pi);
    assert_eq!(scope.get("pi2"), pi);
}

#[test]
fn test_define_validates_its_operands() {
    assert_eq!(eval_err("(define 1 2)"), ErrorKind::TypeMismatch);
    assert_eq!(eval_err("(define a)"), ErrorKind::Arity);
}

#[test]
fn test_let_scopes_header_bindings_and_defines_upward() {
    let scope = sandbox();
    eval_in(&scope, "(define a 1) (define c 1)").unwrap();
    let result = eval_in(&scope, "(let [(a 2) (b 1)] (define c 2) (+ a b))").unwrap();
    assert_eq!(result, Value::Int(3));
    assert_eq!(scope.get("a"), Value::Int(1));
    assert_eq!(scope.get("c"), Value::Int(2));
    assert_eq!(scope.lookup(Symbol::new("b")), None);
}

#[test]
fn test_let_bindings_see_earlier_bindings() {
    assert_eq!(eval("(let ((x 2) (y (* x 3))) y)"), Value::Int(6));
    assert_eq!(eval("(let ((x 1)))"), Value::Nil);
    assert_eq!(eval_err("(let (x) x)"), ErrorKind::TypeMismatch);
}

#[test]
fn test_quote_returns_the_form_verbatim() {
    assert_eq!(eval("(quote (a b))"), Value::list([Value::sym("a"), Value::sym("b")]));
    assert_eq!(eval("'x"), Value::sym("x"));
    assert_eq!(eval_err("(quote)"), ErrorKind::Arity);
}

#[test]
fn test_if_evaluates_exactly_one_branch() {
    let scope = sandbox();
    eval_in(&scope, "(define a 0) (define b 0) (define condition true)").unwrap();
    let taken = eval_in(&scope, "(if condition (define a 1) (define b 2))").unwrap();
    assert_eq!(taken, Value::Int(1));
    assert_eq!((scope.get("a"), scope.get("b")), (Value::Int(1), Value::Int(0)));

    eval_in(&scope, "(define a 0) (define condition false)").unwrap();
    let taken = eval_in(&scope, "(if condition (define a 1) (define b 2))").unwrap();
    assert_eq!(taken, Value::Int(2));
    assert_eq!((scope.get("a"), scope.get("b")), (Value::Int(0), Value::Int(2)));
}

#[test]
fn test_if_without_else_yields_nil() {
    assert_eq!(eval("(if \"\" 1)"), Value::Nil);
    assert_eq!(eval("(if 0 1 2)"), Value::Int(2));
    assert_eq!(eval("(if true 1 (car '()))"), Value::Int(1));
}

#[test]
fn test_do_returns_the_last_form() {
    assert_eq!(eval("(do (define x 1) (+ x 1))"), Value::Int(2));
    assert_eq!(eval("(do)"), Value::Nil);
}

// ---
// Functions
// ---

#[test]
fn test_lambda_captures_scope_parameters_and_body() {
    let scope = sandbox();
    let args = list("([a b] (define x 2) (+ a b))");
    let lambda = scope.get("lambda");
    let Value::Callable(Callable::Function(function)) =
        lambda.as_callable().unwrap().apply(&scope, &args).unwrap()
    else {
        panic!("lambda should produce a function");
    };
    assert!(function.scope().ptr_eq(&scope));
    assert_eq!(Value::List(function.parameters().clone()), args[0]);
    assert_eq!(Some(function.body().clone()), args.cdr());
}

#[test]
fn test_function_binds_parameters_and_defines_into_captured_scope() {
    let global = sandbox().child();
    global.let_local(Symbol::new("x"), Value::Int(1));
    let function = Function::new(global.clone(), list("[a b]"), list("((define x 2) (+ a b))")).unwrap();

    assert_eq!(function.invoke(vec![Value::Int(1), Value::Int(2)]).unwrap(), Value::Int(3));
    assert_eq!(global.get("x"), Value::Int(2));
    assert!(matches!(
        function.invoke(vec![Value::Int(1)]),
        Err(EvalError::Arity { actual: 1, .. })
    ));
}

#[test]
fn test_arguments_binding_holds_every_argument() {
    assert_eq!(eval("((lambda () #arguments))"), Value::list([]));
    assert_eq!(eval("((lambda () #arguments) 1 2 3)"), int_list(&[1, 2, 3]));
    assert_eq!(
        eval("((lambda (a) (list a #arguments)) 1 2)"),
        Value::list([Value::Int(1), int_list(&[1, 2])])
    );
}

#[test]
fn test_too_few_arguments_is_an_arity_error() {
    assert_eq!(eval_err("((lambda (x y) x) 1)"), ErrorKind::Arity);
    assert_eq!(eval_err("(lambda (1) 1)"), ErrorKind::TypeMismatch);
}

#[test]
fn test_closures_share_their_captured_scope() {
    let source = r#"
        (define make-counter
          (lambda () (let ((n 0)) (lambda () (define n (+ n 1))))))
        (define tick (make-counter))
        (tick)
        (tick)
    "#;
    assert_eq!(eval(source), Value::Int(2));

    let source = r#"
        (define make-adder (lambda (n) (lambda (x) (+ x n))))
        (define add5 (make-adder 5))
        (add5 10)
    "#;
    assert_eq!(eval(source), Value::Int(15));
}

#[test]
fn test_recursive_functions() {
    let source = r#"
        (define fact (lambda (n) (if (<= n 1) 1 (* n (fact (- n 1))))))
        (fact 10)
    "#;
    assert_eq!(eval(source), Value::Int(3628800));
}

// ---
// Macros
// ---

#[test]
fn test_macro_sees_caller_scope_and_raw_arguments() {
    let scope = sandbox();
    let mac = eval_in(&scope, "(macro (list #scope #arguments))").unwrap();
    let Value::Callable(Callable::Macro(ref inner)) = mac else {
        panic!("macro should produce a macro");
    };
    assert!(inner.scope().ptr_eq(&scope));

    let context = Scope::default();
    let args = list("(a (+ a b))");
    let result = mac.as_callable().unwrap().apply(&context, &args).unwrap();
    let result = result.as_list().unwrap();
    assert!(matches!(&result[0], Value::Scope(s) if s.ptr_eq(&context)));
    assert_eq!(result[1], Value::List(args));
}

#[test]
fn test_macro_keeps_whole_operand_list_as_body() {
    let scope = sandbox();
    let args = list("((+ 1 2))");
    let value = scope.get("macro").as_callable().unwrap().apply(&scope, &args).unwrap();
    let Value::Callable(Callable::Macro(mac)) = value else {
        panic!("macro should produce a macro");
    };
    assert_eq!(mac.body(), &args);
    assert_eq!(Macro::new(scope.clone(), args).apply(&scope, &List::new()).unwrap(), Value::Int(3));
}

#[test]
fn test_macros_control_evaluation_of_their_operands() {
    let source = r#"
        (define unless
          (macro (if (eval (car #arguments) #scope)
                     nil
                     (eval (at #arguments 1) #scope))))
        (define x 5)
        (list (unless false (+ x 1)) (unless true (undefined-fn)))
    "#;
    assert_eq!(eval(source), Value::list([Value::Int(6), Value::Nil]));
}

#[test]
fn test_macros_are_unhygienic() {
    let source = r#"
        (define set-to-one (macro (eval (list 'define (car #arguments) 1) #scope)))
        (set-to-one y)
        y
    "#;
    assert_eq!(eval(source), Value::Int(1));
}

// ---
// Generic call
// ---

#[test]
fn test_generic_call_dispatch() {
    let scope = sandbox();
    assert_eq!(
        call(&scope, &scope.get("+"), vec![Value::Int(1), Value::Int(2)]).unwrap(),
        Value::Int(3)
    );
    assert_eq!(
        call(&scope, &Value::str("trim"), vec![Value::str("  hello  ")]).unwrap(),
        Value::str("hello")
    );
    assert!(matches!(
        call(&scope, &Value::Int(1), vec![]),
        Err(EvalError::TypeMismatch { .. })
    ));
    assert!(matches!(
        call(&scope, &Value::str("no_such_function"), vec![]),
        Err(EvalError::UnknownIdentifier { .. })
    ));
}

#[test]
fn test_generic_call_quotes_arguments_for_special_forms() {
    let scope = sandbox();
    let chosen = call(&scope, &scope.get("if"), vec![Value::Nil, Value::sym("a"), Value::sym("b")]);
    assert_eq!(chosen.unwrap(), Value::sym("b"));
    let body = form("(+ 1 2)");
    let taken = call(&scope, &scope.get("if"), vec![Value::Bool(true), body.clone()]).unwrap();
    assert_eq!(taken, body);
}

// ---
// Budgets
// ---

#[test]
fn test_runaway_recursion_hits_the_depth_limit() {
    let engine = Engine::with_config(EvalConfig::default().with_max_depth(20));
    engine
        .eval_source("(define forever (lambda (n) (forever (+ n 1))))")
        .unwrap();
    let err = engine.eval_source("(forever 0)").unwrap_err();
    assert!(matches!(err, EvalError::RecursionLimit { limit: 20 }));
    assert_eq!(engine.eval_source("(+ 1 2)").unwrap(), Value::Int(3));
}

#[test]
fn test_step_limit_aborts_and_keeps_earlier_mutations() {
    let engine = Engine::with_config(EvalConfig::default().with_step_limit(3));
    engine.eval_source("(define x 1)").unwrap();
    engine.eval_source("(define x (+ x 1))").unwrap();
    let err = engine.eval_source("(define y (+ 1 1))").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BudgetExceeded);
    assert_eq!(engine.scope().get("x"), Value::Int(2));
    assert_eq!(engine.scope().get("y"), Value::Nil);
}

#[test]
fn test_default_depth_limit_stops_deep_recursion() {
    let engine = Engine::new();
    engine
        .eval_source("(define f (lambda (n) (if (<= n 0) 0 (+ 1 (f (- n 1))))))")
        .unwrap();
    let err = engine.eval_source("(f 100000)").unwrap_err();
    assert!(matches!(err, EvalError::RecursionLimit { limit } if limit == DEFAULT_MAX_DEPTH));
    assert_eq!(engine.eval_source("(f 10)").unwrap(), Value::Int(10));
}

#[test]
fn test_detached_scopes_share_the_step_limit() {
    let engine = Engine::with_config(EvalConfig::default().with_step_limit(60));
    let source = r#"
        (use <Scope>)
        (define s (<Scope>))
        (eval (list define 'g
                (list lambda '(n)
                  (list if (list <= 'n 0) 0 (list + 1 (list 'g (list - 'n 1))))))
              s)
        (eval (list 'g 50) s)
    "#;
    let err = engine.eval_source(source).unwrap_err();
    assert!(matches!(err, EvalError::BudgetExceeded { limit: 60 }));
    assert_eq!(engine.scope().get("g"), Value::Nil);
}

#[test]
fn test_config_loads_from_json() {
    let config = EvalConfig::from_json(r#"{ "max_depth": 8 }"#).unwrap();
    assert_eq!(config.max_depth, 8);
    assert_eq!(config.step_limit, None);
}

// ---
// Isolation
// ---

#[test]
fn test_engines_do_not_share_definitions() {
    let first = Engine::new();
    let second = Engine::new();
    first.eval_source("(define shared 1)").unwrap();
    assert_eq!(second.eval_source("shared").unwrap(), Value::Nil);
}

#[test]
fn test_syntax_errors_surface_as_eval_errors() {
    let err = Engine::new().eval_source("(+ 1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_named_sources_render_syntax_diagnostics() {
    let err = Engine::new().eval_named("script.lisp", "(define x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);
    let rendered = sandlisp::errors::render(err);
    assert!(rendered.contains("sandlisp::read::syntax"));
}

#[derive(Debug)]
struct Tracker {
    drops: Rc<Cell<usize>>,
}

impl HostObject for Tracker {
    fn type_name(&self) -> &str {
        "Tracker"
    }

    fn snapshot(&self) -> Value {
        Value::Nil
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

#[test]
fn test_dropping_an_engine_frees_top_level_closures() {
    let drops = Rc::new(Cell::new(0));
    let engine = Engine::new();
    let tracker = Tracker {
        drops: Rc::clone(&drops),
    };
    engine
        .scope()
        .let_local(Symbol::new("t"), Value::Object(Rc::new(tracker)));
    engine.eval_source("(define f (lambda () t))").unwrap();
    engine
        .eval_source("(define g (lambda (n) (if (<= n 0) t (g (- n 1)))))")
        .unwrap();
    assert!(matches!(engine.eval_source("(g 3)").unwrap(), Value::Object(_)));
    assert_eq!(drops.get(), 0);

    drop(engine);
    assert_eq!(drops.get(), 1);
}
