//! End-to-end runs: source text through the parser into the interpreter.

use carbon_eval::{buffer_handler, EvalErrorKind, Interpreter, Value};
use carbonc::{RunError, Session};
use pretty_assertions::assert_eq;

fn session() -> Session {
    Session::new(Interpreter::builder().print_handler(buffer_handler()).build())
}

fn run(source: &str) -> Value {
    session().run_unit(source).unwrap()
}

fn printed(session: &Session) -> String {
    session.interpreter().print_handler().output()
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(run("2+9*2-5/5;"), Value::Integer(19));
    assert_eq!(run("(2 + 3) * 4"), Value::Integer(20));
}

#[test]
fn bare_return_yields_none() {
    assert_eq!(run("y=function(x){return;};y();"), Value::None);
}

#[test]
fn locals_stay_in_their_call() {
    let mut session = session();
    let value = session
        .run_unit("t=function(){local x=object();return x;};t();")
        .unwrap();
    assert!(matches!(value, Value::Object(_)));
    assert_eq!(session.interpreter().global("x"), None);
}

#[test]
fn loops_and_conditionals() {
    let source = "
        s = 0;
        for (i = 0; i < 5; i = i + 1) { s = s + i; }
        n = 0;
        while (true) {
            n = n + 1;
            if (n == 3) { break; }
        }
        s * 100 + n;
    ";
    assert_eq!(run(source), Value::Integer(1003));
}

#[test]
fn bitwise_from_source() {
    let source = "and(binseq(0x0101, 16), binseq(0x0011, 16)) == binseq(0x0001, 16);";
    assert_eq!(run(source), Value::Bit(true));
    assert_eq!(run("popcount(b\"1011\");"), Value::Integer(3));
    assert_eq!(run("xorc(b\"1100\", b\"10\");"), run("b\"01\";"));
}

#[test]
fn concatenation() {
    assert_eq!(run("\"ab\" + 'cd';"), Value::string("abcd"));
    assert_eq!(run("b\"01\" + b\"1\" == b\"011\";"), Value::Bit(true));
    assert_eq!(run("length([1, 2] + [3]);"), Value::Integer(3));
}

#[test]
fn print_joins_with_spaces() {
    let mut session = session();
    session
        .run_unit("print(\"x\", 1, 2.5, [1, \"a\"]); print();")
        .unwrap();
    assert_eq!(printed(&session), "x 1 2.5 [1, a]\n\n");
}

#[test]
fn parallel_map_keeps_order() {
    let source = "parallel(function(x) { return x * 2; }, [1, 2, 3, 4], 2);";
    assert_eq!(run(source).to_string(), "[2, 4, 6, 8]");
    assert_eq!(run("parallel(x => x + 1, 41);"), Value::Integer(42));
}

#[test]
fn runtime_error_stops_the_unit() {
    let mut session = session();
    let err = session.run_unit("x = 1; y = 1 / 0; x = 2;").unwrap_err();
    let RunError::Runtime(err) = err else {
        panic!("expected a runtime error, got {err:?}");
    };
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(session.interpreter().global("x"), Some(Value::Integer(1)));
    assert_eq!(session.interpreter().global("y"), None);
}

#[test]
fn parse_error_runs_nothing() {
    let mut session = session();
    let err = session.run_unit("x = 5; x = );").unwrap_err();
    assert!(matches!(err, RunError::Parse(_)));
    assert_eq!(session.interpreter().global("x"), None);
}

#[test]
fn globals_survive_between_units() {
    let mut session = session();
    session.run_unit("counter = 10;").unwrap();
    assert_eq!(session.run_unit("counter + 1;").unwrap(), Value::Integer(11));
}

#[test]
fn prompt_reports_each_statement() {
    let mut session = session();
    let results = session.run_prompt("1 + 1; 1 / 0; 3;").unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0], Ok(Value::Integer(2)));
    assert!(matches!(&results[1], Err(err) if err.kind == EvalErrorKind::DivisionByZero));
    assert_eq!(results[2], Ok(Value::Integer(3)));
}

#[test]
fn host_bindings() {
    let mut session = session();
    session.inject_host(
        &["one".to_string(), "two".to_string()],
        &[("HOME".to_string(), "/home/carbon".to_string())],
    );
    assert_eq!(run_in(&mut session, "arguments;"), "[one, two]");
    assert_eq!(run_in(&mut session, "environment.HOME;"), "/home/carbon");
}

fn run_in(session: &mut Session, source: &str) -> String {
    session.run_unit(source).unwrap().to_string()
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    let path = path.to_str().unwrap();
    let mut session = session();
    let written = session
        .run_unit(&format!("write(x\"a5\", 4, '{path}');"))
        .unwrap();
    assert_eq!(written, Value::Integer(8));
    let read = session.run_unit(&format!("read(8, 4, '{path}');")).unwrap();
    assert_eq!(read, session.run_unit("x\"a5\";").unwrap());
}

#[test]
fn cyclic_containers_compare() {
    let source = "a = [0]; set(a, 0, a); b = [0]; set(b, 0, b); a == b;";
    assert_eq!(run(source), Value::Bit(true));
}

#[test]
fn huge_repetition_is_a_runtime_error() {
    for source in [
        "[1, 2] * 0x7fffffffffffffff;",
        "repeat([1, 2], 0x7fffffffffffffff);",
        "\"ab\" * 0x7fffffffffffffff;",
        "binseq(1, 0x7fffffffffffffff);",
    ] {
        let err = session().run_unit(source).unwrap_err();
        let RunError::Runtime(err) = err else {
            panic!("expected a runtime error for {source}, got {err:?}");
        };
        assert!(
            matches!(err.kind, EvalErrorKind::IntegerOverflow { .. }),
            "{source}: {err}"
        );
    }
}
