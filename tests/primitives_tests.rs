mod common;

use common::{eval, eval_err, eval_in, int_list};
use sandlisp::prelude::*;

fn bools(items: &[bool]) -> Value {
    Value::list(items.iter().map(|b| Value::Bool(*b)))
}

// ---
// Arithmetic
// ---

#[test]
fn test_arithmetic() {
    let cases = [
        ("(+ 1 2)", Value::Int(3)),
        ("(+ 1 2 3)", Value::Int(6)),
        ("(+)", Value::Int(0)),
        ("(+ 1 0.5)", Value::Float(1.5)),
        ("(- 5)", Value::Int(-5)),
        ("(- 5 3 1)", Value::Int(1)),
        ("(*)", Value::Int(1)),
        ("(* 5 5 2)", Value::Int(50)),
        ("(/ 50 2 5)", Value::Int(5)),
        ("(/ 7 2)", Value::Float(3.5)),
        ("(% 25 4)", Value::Int(1)),
        ("(mod 7 3)", Value::Int(1)),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), expected, "{source}");
    }
}

#[test]
fn test_arithmetic_errors() {
    assert_eq!(eval_err("(-)"), ErrorKind::Arity);
    assert_eq!(eval_err("(/ 1 0)"), ErrorKind::DivisionByZero);
    assert_eq!(eval_err("(% 1 0)"), ErrorKind::DivisionByZero);
    assert_eq!(eval_err("(+ 1 \"2\")"), ErrorKind::TypeMismatch);
}

// ---
// Truthiness
// ---

#[test]
fn test_not() {
    let cases = [
        ("(not true)", false),
        ("(not 1)", false),
        ("(not \"a\")", false),
        ("(not '())", false),
        ("(not false)", true),
        ("(not nil)", true),
        ("(not 0)", true),
        ("(not 0.0)", true),
        ("(not \"\")", true),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::Bool(expected), "{source}");
    }
}

#[test]
fn test_and_returns_first_falsy_or_last() {
    assert_eq!(eval("(and \"a\" \"b\")"), Value::str("b"));
    assert_eq!(eval("(and \"a\" nil)"), Value::Nil);
    assert_eq!(eval("(and 0 \"b\")"), Value::Int(0));
    assert_eq!(eval("(and)"), Value::Bool(true));
}

#[test]
fn test_or_returns_first_truthy_or_last() {
    assert_eq!(eval("(or \"a\" nil)"), Value::str("a"));
    assert_eq!(eval("(or nil \"\")"), Value::str(""));
    assert_eq!(eval("(or false null \"c\")"), Value::str("c"));
    assert_eq!(eval("(or)"), Value::Bool(false));
}

// ---
// Equality
// ---

#[test]
fn test_strict_and_loose_equality() {
    let cases = [
        ("(eq 3 3)", true),
        ("(eq 3 3.0)", false),
        ("(equal 3 3.0)", true),
        ("(eq \"a\" \"a\")", true),
        ("(eq 'a 'a)", true),
        ("(eq '(1) '(1))", false),
        ("(equal '(1) '(1))", true),
        ("(equal 3 \"3\")", true),
        ("(eq 3 \"3\")", false),
        ("(equal nil false)", true),
        ("(equal 1 1 1.0)", true),
        ("(eq 1 1 2)", false),
        ("(not-eq 3 3.0)", true),
        ("(not-equal 3 3.0)", false),
        ("(=== 1 1)", true),
        ("(== 1 1.0)", true),
        ("(= \"x\" \"x\")", true),
        ("(!== 1 1)", false),
        ("(!= 1 2)", true),
        ("(/= 1 1)", false),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::Bool(expected), "{source}");
    }
}

#[test]
fn test_equality_needs_two_operands() {
    for name in ["eq", "equal", "not-eq", "not-equal"] {
        assert_eq!(eval_err(&format!("({name})")), ErrorKind::Arity, "{name}");
        assert_eq!(eval_err(&format!("({name} 1)")), ErrorKind::Arity, "{name}");
    }
}

#[test]
fn test_host_objects_compare_by_identity_and_snapshot() {
    let source = r#"
        (use <Vector>)
        (define a (<Vector> 1 2))
        (define b (<Vector> 1 2))
        (list (eq a b) (equal a b) (eq a a) (not-eq a b) (not-equal a b))
    "#;
    assert_eq!(eval(source), bools(&[false, true, true, true, false]));
}

#[test]
fn test_identity_of_the_same_list_binding() {
    assert_eq!(eval("(define xs '(1 2)) (eq xs xs)"), Value::Bool(true));
    assert_eq!(eval("(eq + +)"), Value::Bool(true));
    assert_eq!(eval("(eq (lambda () 1) (lambda () 1))"), Value::Bool(false));
}

// ---
// Ordering
// ---

#[test]
fn test_ordering_chains() {
    let cases = [
        ("(< 1 2 3)", true),
        ("(< 1 3 2)", false),
        ("(> 3 2.5 1)", true),
        ("(<= 1 1 2)", true),
        ("(>= 3 3 1)", true),
        ("(< \"a\" \"b\")", true),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::Bool(expected), "{source}");
    }
    assert_eq!(eval_err("(< 1 \"2\")"), ErrorKind::TypeMismatch);
    assert_eq!(eval_err("(< 1)"), ErrorKind::Arity);
}

// ---
// Lists and arrays
// ---

#[test]
fn test_list_car_cdr() {
    assert_eq!(eval("(list 1 2 3)"), int_list(&[1, 2, 3]));
    assert_eq!(eval("(list)"), int_list(&[]));
    assert_eq!(eval("(car '(1 2))"), Value::Int(1));
    assert_eq!(eval_err("(car '())"), ErrorKind::EmptyStructure);
    assert_eq!(eval_err("(car 1)"), ErrorKind::TypeMismatch);
    assert_eq!(eval("(cdr '())"), Value::Nil);
    assert_eq!(eval("(cdr '(1))"), int_list(&[]));
    assert_eq!(eval("(cdr '(1 2 3))"), int_list(&[2, 3]));
}

#[test]
fn test_at_and_exists_at() {
    assert_eq!(eval("(at '(a b c) 1)"), Value::sym("b"));
    assert_eq!(eval("(at \"abc\" 2)"), Value::str("c"));
    assert_eq!(eval("(at (dict (\"k\" 1)) \"k\")"), Value::Int(1));
    assert_eq!(eval_err("(at '(1 2 3) 3)"), ErrorKind::IndexOutOfRange);
    assert_eq!(eval_err("(at '(1 2 3) -1)"), ErrorKind::IndexOutOfRange);
    assert_eq!(eval_err("(at (dict (\"k\" 1)) \"x\")"), ErrorKind::IndexOutOfRange);

    assert_eq!(eval("(exists-at? '(1) 0)"), Value::Bool(true));
    assert_eq!(eval("(exists-at? '(1) 1)"), Value::Bool(false));
    assert_eq!(eval("(exists-at? (dict (\"k\" 1)) \"k\")"), Value::Bool(true));
}

#[test]
fn test_count() {
    assert_eq!(eval("(count (array 1 2 3))"), Value::Int(3));
    assert_eq!(eval("(count '(1 2))"), Value::Int(2));
    assert_eq!(eval("(count \"abcd\")"), Value::Int(4));
    assert_eq!(eval_err("(count 5)"), ErrorKind::TypeMismatch);
}

#[test]
fn test_array_is_positional() {
    let expected = Array::from_values([Value::Int(1), Value::str("b")]);
    assert_eq!(eval("(array 1 \"b\")"), Value::Array(expected));
    assert_eq!(eval("(array)"), Value::Array(Array::new()));
}

#[test]
fn test_dict_mixes_keyed_and_positional_entries() {
    let scope = sandbox();
    eval_in(&scope, "(define a \"key\")").unwrap();
    let result = eval_in(&scope, "(dict (a 1) (\"key2\" 2) (3) 4)").unwrap();
    let mut expected = Array::new();
    expected.insert(ArrayKey::Name("key".into()), Value::Int(1));
    expected.insert(ArrayKey::Name("key2".into()), Value::Int(2));
    expected.push(Value::Int(3));
    expected.push(Value::Int(4));
    assert_eq!(result, Value::Array(expected));
}

#[test]
fn test_dict_coerces_numeric_string_keys() {
    let Value::Array(array) = eval("(dict (\"5\" 1) (\"x\" 2) 3)") else {
        panic!("dict should build an array");
    };
    assert_eq!(array.get(&ArrayKey::Index(5)), Some(&Value::Int(1)));
    assert_eq!(array.get(&ArrayKey::Index(6)), Some(&Value::Int(3)));
}

// ---
// Higher-order atoms
// ---

#[test]
fn test_map() {
    assert_eq!(eval("(map (lambda (x) (+ x 1)) '())"), int_list(&[]));
    assert_eq!(eval("(map (lambda (x) (+ x 1)) '(1 2))"), int_list(&[2, 3]));
    assert_eq!(
        eval("(map (lambda () #arguments) '(1 2 3) '(4 5 6))"),
        Value::list([int_list(&[1, 4]), int_list(&[2, 5]), int_list(&[3, 6])])
    );
    assert_eq!(eval("(map + '(1 2 3) '(10 20))"), int_list(&[11, 22]));
    assert_eq!(eval("(map \"trim\" '(\" a \"))"), Value::list([Value::str("a")]));
}

#[test]
fn test_map_errors() {
    assert_eq!(eval_err("(map)"), ErrorKind::Arity);
    assert_eq!(eval_err("(map car)"), ErrorKind::Arity);
    assert_eq!(eval_err("(map 1 '(1))"), ErrorKind::TypeMismatch);
    assert_eq!(eval_err("(map car 5)"), ErrorKind::TypeMismatch);
}

#[test]
fn test_filter_fold_apply() {
    assert_eq!(eval("(filter (lambda (x) (> x 1)) '(1 2 3))"), int_list(&[2, 3]));
    assert_eq!(eval("(fold + 0 '(1 2 3))"), Value::Int(6));
    assert_eq!(eval("(fold (lambda (acc x) (* acc x)) 1 '())"), Value::Int(1));
    assert_eq!(eval("(apply + '(2 3 4))"), Value::Int(9));
    assert_eq!(eval("(apply + (array 1 2))"), Value::Int(3));
    assert_eq!(eval("(apply \"trim\" '(\"  x \"))"), Value::str("x"));
    assert_eq!(eval_err("(apply 1 '())"), ErrorKind::TypeMismatch);
}

#[test]
fn test_higher_order_atoms_accept_special_forms() {
    assert_eq!(eval("(apply if '(1 a b))"), Value::sym("a"));
    assert_eq!(
        eval("(map list '(a b))"),
        Value::list([Value::list([Value::sym("a")]), Value::list([Value::sym("b")])])
    );
}

// ---
// Predicates
// ---

#[test]
fn test_type_predicates() {
    let cases = [
        ("(nil? nil)", true),
        ("(nil? false)", false),
        ("(symbol? 'a)", true),
        ("(list? '())", true),
        ("(array? (array))", true),
        ("(string? \"s\")", true),
        ("(number? 1.5)", true),
        ("(integer? 1.0)", false),
        ("(float? 1.0)", true),
        ("(bool? false)", true),
        ("(callable? +)", true),
        ("(callable? if)", true),
        ("(callable? \"trim\")", true),
        ("(callable? \"no_such_function\")", false),
        ("(callable? 'car)", false),
    ];
    for (source, expected) in cases {
        assert_eq!(eval(source), Value::Bool(expected), "{source}");
    }
}

#[test]
fn test_scope_predicate_inside_macros() {
    assert_eq!(eval("((macro (scope? #scope)))"), Value::Bool(true));
}

// ---
// Strings and symbols
// ---

#[test]
fn test_symbol_and_string() {
    assert_eq!(eval("(symbol \"abc\")"), Value::sym("abc"));
    assert_eq!(eval("(eq (symbol \"abc\") 'abc)"), Value::Bool(true));
    assert_eq!(eval("(string \"a\" 1 'b)"), Value::str("a1b"));
    assert_eq!(eval("(. \"x\" 2.0)"), Value::str("x2.0"));
    assert_eq!(eval("(string)"), Value::str(""));
    assert_eq!(eval_err("(symbol 1)"), ErrorKind::TypeMismatch);
}
