// -*- coding: utf-8 -*-
// ------------------------------------------------------------------------------------------------
// Copyright © 2022, graphscript authors.
// Licensed under either of Apache License, Version 2.0, or MIT license, at your option.
// Please see the LICENSE-APACHE or LICENSE-MIT files in this distribution for license details.
// ------------------------------------------------------------------------------------------------

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use graphscript::functions::NativeFunction;
use graphscript::graph::Graph;
use graphscript::CancellationError;
use graphscript::CancellationFlag;
use graphscript::Error;
use graphscript::ExecutionConfig;
use graphscript::ExecutionError;
use graphscript::Scope;
use graphscript::Value;
use graphscript::VariableError;
use indoc::indoc;

use crate::init_log;

fn evaluate(scope: &Scope, source: &str) -> Result<Value, Error> {
    init_log();
    graphscript::evaluate_with(scope, source)
}

fn check_evaluation(source: &str, expected: Value) {
    match evaluate(&Scope::new(), source) {
        Ok(actual) => assert_eq!(actual, expected, "evaluating {}", source),
        Err(e) => panic!("Could not evaluate {}: {}", source, e),
    }
}

fn fail_evaluation(source: &str) -> ExecutionError {
    match evaluate(&Scope::new(), source) {
        Ok(value) => panic!("Evaluation of {} succeeded unexpectedly with {}", source, value),
        Err(Error::Execution(e)) => e,
        Err(e) => panic!("Could not parse {}: {}", source, e),
    }
}

/// Returns a native function that counts how often it is called, and always returns `true`.
fn counter(calls: &Rc<Cell<usize>>) -> NativeFunction {
    let calls = calls.clone();
    NativeFunction::from_fn("bump", 0, Some(0), move |_, _| {
        calls.set(calls.get() + 1);
        Ok(Value::Bool(true))
    })
}

#[test]
fn can_evaluate_literals() {
    check_evaluation("null", Value::Null);
    check_evaluation("true", Value::Bool(true));
    check_evaluation("false", Value::Bool(false));
    check_evaluation("42", Value::from(42));
    check_evaluation(r#""abc""#, Value::from("abc"));
    check_evaluation(r#"'A\n'"#, Value::from("A\n"));
}

#[test]
fn numbers_keep_their_text() {
    let value = graphscript::evaluate("-12.50").unwrap();
    assert_eq!(value.to_string(), "-12.50");
    assert_eq!(value.as_string().unwrap(), "-12.50");
    check_evaluation("1 == 1", Value::Bool(true));
    check_evaluation("1.0 == 1", Value::Bool(false));
    check_evaluation(r#"1 == "1""#, Value::Bool(true));
}

#[test]
fn can_compare_strings() {
    check_evaluation(r#""abc" == "abc""#, Value::Bool(true));
    check_evaluation(r#""abc" != "abd""#, Value::Bool(true));
    check_evaluation(r#""abc" == 'abc'"#, Value::Bool(true));
    check_evaluation(r#""null" == null"#, Value::Bool(true));
}

#[test]
fn can_negate() {
    check_evaluation("!true", Value::Bool(false));
    check_evaluation("!!true", Value::Bool(true));
    check_evaluation("!!false", Value::Bool(false));
    check_evaluation("!!0", Value::Bool(false));
    check_evaluation("!!0.0", Value::Bool(false));
    check_evaluation("!!-1", Value::Bool(true));
    check_evaluation(r#"!!"""#, Value::Bool(false));
    check_evaluation(r#"!!"0""#, Value::Bool(true));
    check_evaluation("!null", Value::Bool(true));
}

#[test]
fn logical_operators_return_booleans() {
    check_evaluation(r#""a" && "b""#, Value::Bool(true));
    check_evaluation(r#""a" && """#, Value::Bool(false));
    check_evaluation("null || 0", Value::Bool(false));
    check_evaluation(r#"null || "x""#, Value::Bool(true));
}

#[test]
fn logical_operators_short_circuit() {
    check_evaluation("false && undefined", Value::Bool(false));
    check_evaluation("true || undefined", Value::Bool(true));
    assert!(matches!(
        fail_evaluation("true && undefined"),
        ExecutionError::UnknownIdentifier(name) if name == "undefined"
    ));

    let calls = Rc::new(Cell::new(0));
    let scope = Scope::new();
    scope.set("bump", counter(&calls));
    evaluate(&scope, "false && bump(); true || bump()").unwrap();
    assert_eq!(calls.get(), 0);
    evaluate(&scope, "true && bump(); false || bump()").unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn statement_list_evaluates_to_last_statement() {
    check_evaluation("1; 2; 3", Value::from(3));
    check_evaluation("1; 2; 3;", Value::from(3));
    check_evaluation("", Value::Null);
    check_evaluation(";;", Value::Null);
}

#[test]
fn assignment_evaluates_to_assigned_value() {
    check_evaluation("x = 5", Value::from(5));
    check_evaluation("x := 5; x", Value::from(5));
    check_evaluation("x = y = 2; x", Value::from(2));
}

#[test]
fn blocks_open_a_new_scope() {
    check_evaluation("x = 1; { x = 2; } x", Value::from(1));
    check_evaluation("x = 1; { y = x; } x", Value::from(1));
    assert!(matches!(
        fail_evaluation("{ y = 1; } y"),
        ExecutionError::UnknownIdentifier(name) if name == "y"
    ));
}

#[test]
fn parentheses_share_the_current_scope() {
    check_evaluation("x = 1; (x = 2); x", Value::from(2));
}

#[test]
fn can_call_closures() {
    check_evaluation("f = n -> n; f(3)", Value::from(3));
    check_evaluation("f = n -> n; f()", Value::Null);
    check_evaluation("f = { 42 }; f()", Value::from(42));
    check_evaluation(
        indoc! {r#"
            isAbc = s -> {
              t = s;
              t == "abc"
            };
            isAbc("abc") && !isAbc("abd")
        "#},
        Value::Bool(true),
    );
}

#[test]
fn closures_are_lexically_scoped() {
    check_evaluation(
        indoc! {"
            x = 1;
            f = n -> x;
            g = x -> f(0);
            g(2)
        "},
        Value::from(1),
    );
    check_evaluation(
        indoc! {"
            make = x -> (n -> x);
            one = make(1);
            two = make(2);
            one(0) == 1 && two(0) == 2
        "},
        Value::Bool(true),
    );
}

#[test]
fn closure_assignments_do_not_leak() {
    check_evaluation("x = 1; f = n -> (x = n); f(9); x", Value::from(1));
    assert!(matches!(
        fail_evaluation("f = n -> { y = n; y }; f(5); y"),
        ExecutionError::UnknownIdentifier(name) if name == "y"
    ));
}

#[test]
fn closures_remember_their_parameter() {
    match graphscript::evaluate("n -> n.id").unwrap() {
        Value::Closure(closure) => assert_eq!(closure.parameter(), Some("n")),
        other => panic!("Expected a closure, got {}", other),
    }
    match graphscript::evaluate("f = { 1 }").unwrap() {
        Value::Closure(closure) => assert_eq!(closure.parameter(), None),
        other => panic!("Expected a closure, got {}", other),
    }
}

#[test]
fn closures_take_at_most_one_argument() {
    assert!(matches!(
        fail_evaluation("f = n -> n; f(1, 2)"),
        ExecutionError::InvalidFunctionCall(_)
    ));
}

#[test]
fn closures_are_not_truthy() {
    check_evaluation("f = n -> n; !f", Value::Bool(true));
}

#[test]
fn cannot_call_non_callables() {
    assert!(matches!(
        fail_evaluation("x = 1; x()"),
        ExecutionError::NotCallable("number")
    ));
    assert!(matches!(
        fail_evaluation(r#""abc"()"#),
        ExecutionError::NotCallable("string")
    ));
}

#[test]
fn cannot_use_unknown_selectors() {
    match fail_evaluation(r#""abc".foo"#) {
        ExecutionError::UnknownSelector { selector, value } => {
            assert_eq!(selector, "foo");
            assert_eq!(value, "string");
        }
        e => panic!("Unexpected error {}", e),
    }
    assert!(matches!(
        fail_evaluation("null.length"),
        ExecutionError::UnknownSelector { .. }
    ));
}

#[test]
fn cannot_index_strings() {
    assert!(matches!(
        fail_evaluation(r#""abc"[0]"#),
        ExecutionError::NotIndexable("string")
    ));
}

#[test]
fn can_index_lists() {
    let scope = Scope::new();
    scope.set("xs", vec![Value::from("a"), Value::from(2)]);
    assert_eq!(evaluate(&scope, "xs[0]").unwrap(), Value::from("a"));
    assert_eq!(evaluate(&scope, "xs[1]").unwrap(), Value::from(2));
    assert_eq!(evaluate(&scope, "xs[2]").unwrap(), Value::Null);
    assert_eq!(evaluate(&scope, "xs[-1]").unwrap(), Value::Null);
    assert_eq!(evaluate(&scope, "xs.length").unwrap(), Value::from(2));
}

#[test]
fn cannot_compare_closures() {
    assert!(matches!(
        fail_evaluation("f = n -> n; f == f"),
        ExecutionError::Incomparable("closure", "closure")
    ));
}

#[test]
fn top_level_assignments_stay_in_scope() {
    let scope = Scope::new();
    evaluate(&scope, "x = 1; y = x == 1").unwrap();
    assert_eq!(scope.get("x"), Some(Value::from(1)));
    assert_eq!(scope.get("y"), Some(Value::Bool(true)));
    assert_eq!(evaluate(&scope, "x").unwrap(), Value::from(1));
}

#[test]
fn host_variables_are_shadowed_by_assignment() {
    let outer = Scope::new();
    outer.set("x", "outer");
    let inner = outer.nested();
    evaluate(&inner, r#"x = "inner""#).unwrap();
    assert_eq!(outer.get("x"), Some(Value::from("outer")));
    assert_eq!(inner.get("x"), Some(Value::from("inner")));
}

#[test]
fn can_overwrite_existing_variables() {
    let outer = Scope::new();
    outer.set("x", 1);
    let inner = outer.nested();
    inner.set_existing("x", Value::from(2)).unwrap();
    assert!(!inner.contains_local("x"));
    assert_eq!(outer.get("x"), Some(Value::from(2)));
    assert!(matches!(
        inner.set_existing("y", Value::Null),
        Err(VariableError::UndefinedVariable(name)) if name == "y"
    ));
}

#[test]
fn can_call_host_functions() {
    let scope = Scope::new();
    scope.set(
        "double",
        NativeFunction::from_fn("double", 1, Some(1), |_, args| {
            Ok(Value::from(args[0].as_int()? * 2))
        }),
    );
    assert_eq!(evaluate(&scope, "double(21)").unwrap(), Value::from(42));
    match evaluate(&scope, "double()") {
        Err(Error::Execution(ExecutionError::InvalidFunctionCall(message))) => {
            assert_eq!(message, "'double' needs at least 1 args but got 0")
        }
        other => panic!("Unexpected result {:?}", other),
    }
    match evaluate(&scope, "double(1, 2)") {
        Err(Error::Execution(ExecutionError::InvalidFunctionCall(message))) => {
            assert_eq!(message, "'double' needs at most 1 args but got 2")
        }
        other => panic!("Unexpected result {:?}", other),
    }
}

#[test]
fn host_functions_see_the_calling_context() {
    let scope = Scope::new();
    scope.set(
        "lookup",
        NativeFunction::from_fn("lookup", 1, Some(1), |exec, args| {
            exec.cancellation_flag().check("lookup")?;
            Ok(exec.scope().get(&args[0].as_string()?).into())
        }),
    );
    assert_eq!(
        evaluate(&scope, r#"x = 1; { y = 2; lookup("y") }"#).unwrap(),
        Value::from(2)
    );
    assert_eq!(evaluate(&scope, r#"lookup("x")"#).unwrap(), Value::from(1));
    assert_eq!(evaluate(&scope, r#"lookup("y")"#).unwrap(), Value::Null);

    let script = graphscript::parse(r#"lookup("x")"#).unwrap();
    let result = script.execute(&scope, &ExecutionConfig::default(), &CancelAt("lookup"));
    assert!(matches!(
        result,
        Err(ExecutionError::Cancelled(CancellationError("lookup")))
    ));
}

#[test]
fn dropping_scope_releases_captured_frames() {
    let mut graph = Graph::new();
    let n1 = graph.add_node("n1");
    let graph = Arc::new(graph);
    let scripts = [
        "node.length",
        "f = x -> x; node.length",
        "{ n = node; f = x -> n; } node.length",
        "g = x -> (y -> x); h = g(node); h(0).length",
    ];
    for source in &scripts {
        let scope = Scope::new();
        scope.set("node", Graph::node(&graph, n1));
        assert_eq!(evaluate(&scope, source).unwrap(), Value::from(1));
        drop(scope);
        assert_eq!(Arc::strong_count(&graph), 1, "evaluating {}", source);
    }
}

#[test]
fn nested_host_scopes_keep_their_root_alive() {
    let outer = Scope::new();
    outer.set("x", 1);
    let inner = outer.nested();
    drop(outer);
    assert_eq!(evaluate(&inner, "f = n -> x; f(0)").unwrap(), Value::from(1));
}

#[test]
fn errors_display_verbatim() {
    assert_eq!(
        fail_evaluation("missing").to_string(),
        "Unknown identifier 'missing'"
    );
    let error = graphscript::evaluate("x = ").unwrap_err();
    assert!(matches!(error, Error::Parse(_)));
}

struct CancelAt(&'static str);

impl CancellationFlag for CancelAt {
    fn check(&self, at: &'static str) -> Result<(), CancellationError> {
        if at == self.0 {
            return Err(CancellationError(at));
        }
        Ok(())
    }
}

#[test]
fn can_cancel_between_statements() {
    init_log();
    let script = graphscript::parse("x = 1; x").unwrap();
    let scope = Scope::new();
    let result = script.execute(&scope, &ExecutionConfig::default(), &CancelAt("statement"));
    assert!(matches!(
        result,
        Err(ExecutionError::Cancelled(CancellationError("statement")))
    ));
    assert_eq!(scope.get("x"), None);
}
