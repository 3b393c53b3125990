// Core evaluation tests: the end-to-end pipeline parse -> eval against a
// fresh root environment, asserting final values and error messages.

use rill::engine::run_source_with_output;
use rill::runtime::builtins::{NullSink, SharedOutput};
use rill::runtime::value::{Value, FALSE, NULL, TRUE};
use rill::RillError;

/// Helper: evaluate a source string with output discarded.
fn eval_source(source: &str) -> Result<Value, RillError> {
    run_source_with_output(source, SharedOutput::new(NullSink))
}

fn eval_ok(source: &str) -> Value {
    eval_source(source).expect("evaluation should succeed")
}

/// Helper: evaluate and return the runtime error message.
fn eval_err(source: &str) -> String {
    match eval_source(source) {
        Err(RillError::Eval(error)) => error.to_string(),
        Err(other) => panic!("expected a runtime error, got {:?}", other),
        Ok(value) => panic!("expected an error, got {}", value),
    }
}

fn integer(value: i64) -> Value {
    Value::Integer(value)
}

#[test]
fn integer_literals_and_arithmetic() {
    assert_eq!(eval_ok("5"), integer(5));
    assert_eq!(eval_ok("-10"), integer(-10));
    assert_eq!(eval_ok("5 + 5 + 5 + 5 - 10"), integer(10));
    assert_eq!(eval_ok("2 * 2 * 2 * 2 * 2"), integer(32));
    assert_eq!(eval_ok("50 / 2 * 2 + 10"), integer(60));
    assert_eq!(eval_ok("3 * (3 * 3) + 10"), integer(37));
    assert_eq!(eval_ok("(5 + 10 * 2 + 15 / 3) * 2 + -10"), integer(50));
}

#[test]
fn integer_division_truncates_toward_zero() {
    assert_eq!(eval_ok("7 / 2"), integer(3));
    assert_eq!(eval_ok("-7 / 2"), integer(-3));
    assert_eq!(eval_ok("7 / -2"), integer(-3));
}

#[test]
fn division_by_zero_is_an_error() {
    assert_eq!(eval_err("5 / 0"), "division by zero");
    assert_eq!(eval_err("let x = 0; 1 / x"), "division by zero");
}

#[test]
fn boolean_expressions() {
    assert_eq!(eval_ok("true"), TRUE);
    assert_eq!(eval_ok("1 < 2"), TRUE);
    assert_eq!(eval_ok("1 > 2"), FALSE);
    assert_eq!(eval_ok("1 == 1"), TRUE);
    assert_eq!(eval_ok("1 != 1"), FALSE);
    assert_eq!(eval_ok("true == true"), TRUE);
    assert_eq!(eval_ok("false == true"), FALSE);
    assert_eq!(eval_ok("true != false"), TRUE);
    assert_eq!(eval_ok("(1 < 2) == true"), TRUE);
    assert_eq!(eval_ok("(1 > 2) == true"), FALSE);
}

#[test]
fn bang_operator_follows_truthiness() {
    assert_eq!(eval_ok("!true"), FALSE);
    assert_eq!(eval_ok("!false"), TRUE);
    assert_eq!(eval_ok("!5"), FALSE);
    assert_eq!(eval_ok("!!5"), TRUE);
    assert_eq!(eval_ok("!0"), FALSE);
    assert_eq!(eval_ok("!\"\""), FALSE);
    assert_eq!(eval_ok("!if (false) { 1 }"), TRUE);
}

#[test]
fn cross_variant_equality_is_false_not_an_error() {
    assert_eq!(eval_ok("5 == true"), FALSE);
    assert_eq!(eval_ok("5 != true"), TRUE);
    assert_eq!(eval_ok("\"1\" == 1"), FALSE);
    assert_eq!(eval_ok("if (false) { 1 } == 0"), FALSE);
    assert_eq!(eval_ok("[1] == [1]"), TRUE);
    assert_eq!(eval_ok("[1] == [2]"), FALSE);
}

#[test]
fn string_literals_and_concat() {
    assert_eq!(eval_ok("\"hello\""), Value::String("hello".into()));
    assert_eq!(
        eval_ok("\"hello\" + \" \" + \"world\""),
        Value::String("hello world".into())
    );
}

#[test]
fn strings_only_support_plus() {
    // Two strings dispatch to the string operator table before the generic
    // equality arm, so even == and != are unknown operators.
    assert_eq!(eval_err("\"a\" == \"a\""), "unknown operator: STRING == STRING");
    assert_eq!(eval_err("\"a\" != \"b\""), "unknown operator: STRING != STRING");
}

#[test]
fn if_else_expressions() {
    assert_eq!(eval_ok("if (true) { 10 }"), integer(10));
    assert_eq!(eval_ok("if (false) { 10 }"), NULL);
    assert_eq!(eval_ok("if (1) { 10 }"), integer(10));
    assert_eq!(eval_ok("if (1 < 2) { 10 } else { 20 }"), integer(10));
    assert_eq!(eval_ok("if (1 > 2) { 10 } else { 20 }"), integer(20));
}

#[test]
fn let_bindings_and_shadowing() {
    assert_eq!(eval_ok("let a = 5; a"), integer(5));
    assert_eq!(eval_ok("let a = 5 * 5; a"), integer(25));
    assert_eq!(eval_ok("let a = 5; let b = a; b"), integer(5));
    assert_eq!(eval_ok("let a = 5; let a = a + 1; a"), integer(6));
}

#[test]
fn scenario_let_with_condition() {
    assert_eq!(
        eval_ok("let a = 5; let b = a > 3; let c = a * 99; if (b) { 10 } else { 1 };"),
        integer(10)
    );
}

#[test]
fn return_statements_unwind_once() {
    assert_eq!(eval_ok("return 10;"), integer(10));
    assert_eq!(eval_ok("return 10; 9"), integer(10));
    assert_eq!(eval_ok("return 2 * 5; 9"), integer(10));
    assert_eq!(eval_ok("9; return 10; 9"), integer(10));
}

#[test]
fn scenario_nested_block_return() {
    assert_eq!(
        eval_ok("if (10 > 1) { if (10 > 1) { return 10; } return 1; }"),
        integer(10)
    );
}

#[test]
fn return_stops_at_the_function_boundary() {
    let source = "
        let f = fn() {
            if (true) { return 1; }
            return 2;
        };
        f() + 10
    ";
    assert_eq!(eval_ok(source), integer(11));
}

#[test]
fn functions_and_application() {
    assert_eq!(eval_ok("let identity = fn(x) { x; }; identity(5);"), integer(5));
    assert_eq!(
        eval_ok("let identity = fn(x) { return x; }; identity(5);"),
        integer(5)
    );
    assert_eq!(eval_ok("let double = fn(x) { x * 2; }; double(5);"), integer(10));
    assert_eq!(eval_ok("let add = fn(x, y) { x + y; }; add(5, 5);"), integer(10));
    assert_eq!(
        eval_ok("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));"),
        integer(20)
    );
    assert_eq!(eval_ok("fn(x) { x; }(5)"), integer(5));
}

#[test]
fn scenario_higher_order_functions() {
    let source = "
        let add = fn(a, b) { a + b };
        let sub = fn(a, b) { a - b };
        let applyFunc = fn(a, b, func) { func(a, b) };
        applyFunc(2, 2, add);
    ";
    assert_eq!(eval_ok(source), integer(4));
}

#[test]
fn scenario_closures() {
    let source = "
        let newAdder = fn(x) { fn(y) { x + y } };
        let addTwo = newAdder(2);
        addTwo(3);
    ";
    assert_eq!(eval_ok(source), integer(5));
}

#[test]
fn closures_read_the_defining_environment_not_the_callers() {
    let source = "
        let x = 10;
        let f = fn() { x };
        let g = fn(x) { f() };
        g(99)
    ";
    assert_eq!(eval_ok(source), integer(10));
}

#[test]
fn recursive_functions_terminate() {
    let source = "
        let countdown = fn(n) {
            if (n < 1) { 0 } else { countdown(n - 1) }
        };
        countdown(20)
    ";
    assert_eq!(eval_ok(source), integer(0));
}

#[test]
fn runaway_recursion_is_an_error_not_a_crash() {
    let source = "let loop = fn() { loop() }; loop()";
    let message = eval_err(source);
    assert!(
        message.contains("recursion limit exceeded"),
        "unexpected message: {}",
        message
    );
}

#[test]
fn function_arity_mismatch_is_an_error() {
    assert_eq!(
        eval_err("let add = fn(a, b) { a + b }; add(1)"),
        "wrong number of arguments: want=2, got=1"
    );
    assert_eq!(
        eval_err("fn() { 1 }(2)"),
        "wrong number of arguments: want=0, got=1"
    );
}

#[test]
fn while_loops() {
    let source = "
        let i = 0;
        let total = 0;
        while (i < 5) {
            let total = total + i;
            let i = i + 1;
        };
        total
    ";
    assert_eq!(eval_ok(source), integer(10));
    assert_eq!(eval_ok("while (false) { 1 }"), NULL);
}

#[test]
fn while_loop_value_is_null() {
    assert_eq!(eval_ok("let i = 0; while (i < 3) { let i = i + 1; }"), NULL);
}

#[test]
fn return_propagates_out_of_while() {
    let source = "
        let f = fn() {
            while (true) { return 42; }
            0
        };
        f()
    ";
    assert_eq!(eval_ok(source), integer(42));
}

#[test]
fn while_condition_errors_propagate() {
    assert_eq!(
        eval_err("while (1 + true) { 1 }"),
        "type mismatch: INTEGER + BOOLEAN"
    );
}

#[test]
fn array_literals_and_indexing() {
    assert_eq!(
        eval_ok("[1, 2 * 2, 3 + 3]"),
        Value::Array(im::Vector::from(vec![integer(1), integer(4), integer(6)]))
    );
    assert_eq!(eval_ok("[1, 2, 3][0]"), integer(1));
    assert_eq!(eval_ok("[1, 2, 3][2]"), integer(3));
    assert_eq!(eval_ok("let i = 0; [1][i]"), integer(1));
    assert_eq!(eval_ok("let a = [1, 2, 3]; a[1] + a[2]"), integer(5));
}

#[test]
fn array_index_out_of_bounds_is_null() {
    assert_eq!(eval_ok("[1, 2, 3][3]"), NULL);
    assert_eq!(eval_ok("[1, 2, 3][-1]"), NULL);
    assert_eq!(eval_ok("[][0]"), NULL);
}

#[test]
fn scenario_hash_literals_and_lookup() {
    assert_eq!(
        eval_ok("let h = {\"one\": 1, \"two\": 2}; h[\"one\"] + h[\"two\"];"),
        integer(3)
    );
    assert_eq!(eval_ok("let h = {\"one\": 1}; h[\"missing\"]"), NULL);
}

#[test]
fn hash_keys_can_be_any_hashable_variant() {
    let source = "
        let h = {1: \"int\", true: \"bool\", \"s\": \"string\"};
        h[1] + h[true] + h[\"s\"]
    ";
    assert_eq!(eval_ok(source), Value::String("intboolstring".into()));
}

#[test]
fn hash_key_expressions_are_evaluated() {
    assert_eq!(eval_ok("{\"a\" + \"b\": 5}[\"ab\"]"), integer(5));
    assert_eq!(eval_ok("let two = 2; {1 + 1: 7}[two]"), integer(7));
}

#[test]
fn hash_with_unusable_key_is_an_error() {
    assert_eq!(
        eval_err("{\"name\": \"rill\"}[fn(x){x}];"),
        "unusable as hash key: FUNCTION"
    );
    assert_eq!(eval_err("{[1]: 2}"), "unusable as hash key: ARRAY");
    assert_eq!(
        eval_err("{if (false) { 1 }: 1}"),
        "unusable as hash key: NULL"
    );
}

#[test]
fn index_on_unsupported_type_is_an_error() {
    assert_eq!(eval_err("5[0]"), "index operator not supported INTEGER");
    assert_eq!(
        eval_err("\"s\"[0]"),
        "index operator not supported STRING"
    );
    assert_eq!(eval_err("[1][\"x\"]"), "index operator not supported ARRAY");
}

#[test]
fn scenario_error_messages() {
    assert_eq!(eval_err("5 + true;"), "type mismatch: INTEGER + BOOLEAN");
    assert_eq!(eval_err("5 + true; 5;"), "type mismatch: INTEGER + BOOLEAN");
    assert_eq!(eval_err("-true"), "unknown operator: -BOOLEAN");
    assert_eq!(eval_err("true + false;"), "unknown operator: BOOLEAN + BOOLEAN");
    assert_eq!(
        eval_err("5; true + false; 5"),
        "unknown operator: BOOLEAN + BOOLEAN"
    );
    assert_eq!(
        eval_err("if (10 > 1) { true + false; }"),
        "unknown operator: BOOLEAN + BOOLEAN"
    );
    assert_eq!(
        eval_err("\"Hello\" - \"World\""),
        "unknown operator: STRING - STRING"
    );
    assert_eq!(eval_err("foobar;"), "identifier not found: foobar");
    assert_eq!(eval_err("5(1)"), "not a function: 5");
}

#[test]
fn errors_propagate_through_every_node_kind() {
    // Array literal element
    assert_eq!(eval_err("[1, 2 + true]"), "type mismatch: INTEGER + BOOLEAN");
    // Hash key and value
    assert_eq!(eval_err("{1 + true: 2}"), "type mismatch: INTEGER + BOOLEAN");
    assert_eq!(eval_err("{1: 2 + true}"), "type mismatch: INTEGER + BOOLEAN");
    // Call callee and arguments
    assert_eq!(eval_err("(1 + true)(2)"), "type mismatch: INTEGER + BOOLEAN");
    assert_eq!(
        eval_err("let f = fn(x) { x }; f(1 + true)"),
        "type mismatch: INTEGER + BOOLEAN"
    );
    // Index left and index
    assert_eq!(eval_err("[1][1 + true]"), "type mismatch: INTEGER + BOOLEAN");
    // Prefix operand
    assert_eq!(eval_err("-(1 + true)"), "type mismatch: INTEGER + BOOLEAN");
    // Let value and return value
    assert_eq!(eval_err("let a = 1 + true; a"), "type mismatch: INTEGER + BOOLEAN");
    assert_eq!(eval_err("return 1 + true;"), "type mismatch: INTEGER + BOOLEAN");
    // If condition
    assert_eq!(
        eval_err("if (1 + true) { 1 }"),
        "type mismatch: INTEGER + BOOLEAN"
    );
}

#[test]
fn hash_literal_checks_the_key_before_the_value() {
    // The value expression would also fail; the key fault must win.
    assert_eq!(
        eval_err("{fn(x){x}: missing}"),
        "unusable as hash key: FUNCTION"
    );
}

#[test]
fn empty_program_is_null() {
    assert_eq!(eval_ok(""), NULL);
    assert_eq!(eval_ok("   "), NULL);
}

#[test]
fn let_produces_no_value() {
    assert_eq!(eval_ok("let a = 5;"), NULL);
}

#[test]
fn determinism_same_source_same_value() {
    let source = "
        let fib = fn(n) { if (n < 2) { n } else { fib(n - 1) + fib(n - 2) } };
        [fib(10), {\"k\": fib(5)}[\"k\"], \"s\" + \"fx\"]
    ";
    let first = eval_ok(source);
    for _ in 0..3 {
        assert_eq!(eval_ok(source), first);
    }
}
