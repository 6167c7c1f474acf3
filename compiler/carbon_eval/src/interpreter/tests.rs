//! Interpreter tests driven by raw instruction streams.
//!
//! Streams are written one instruction per word: `MNEMONIC` for bare
//! instructions and `MNEMONIC:text` for atoms.

use super::*;
use crate::print_handler::buffer_handler;
use carbon_patterns::EvalErrorKind;

fn write_stream(interp: &mut Interpreter, stream: &str) {
    for word in stream.split_whitespace() {
        let (mnemonic, text) = word.split_once(':').unwrap_or((word, ""));
        let kind: InstructionKind = mnemonic.parse().unwrap();
        interp.write(kind, text);
    }
}

fn prompt() -> Interpreter {
    Interpreter::builder().print_handler(buffer_handler()).build()
}

/// Run a stream in prompt mode and return every statement's result.
fn run(stream: &str) -> Vec<Result<Value, EvalError>> {
    let mut interp = prompt();
    write_stream(&mut interp, stream);
    interp.take_results()
}

fn run_last(stream: &str) -> Value {
    run(stream).pop().unwrap().unwrap()
}

fn run_err(stream: &str) -> EvalErrorKind {
    run(stream).pop().unwrap().unwrap_err().kind
}

mod statements {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arithmetic_precedence() {
        // 2+9*2-5/5
        let value = run_last("NUM:2 NUM:9 NUM:2 MUL ADD NUM:5 NUM:5 DIV SUB END_STATEMENT");
        assert_eq!(value, Value::Integer(19));
    }

    #[test]
    fn assignment_then_lookup() {
        let results = run("ID:x NUM:4 ASSIGN END_STATEMENT ID:x ID:x MUL END_STATEMENT");
        assert_eq!(results, vec![Ok(Value::None), Ok(Value::Integer(16))]);
    }

    #[test]
    fn undefined_identifier() {
        assert_eq!(
            run_err("ID:nope END_STATEMENT"),
            EvalErrorKind::Undefined {
                name: "nope".into()
            }
        );
    }

    #[test]
    fn error_abandons_only_its_statement() {
        let results = run("NUM:1 NUM:0 DIV END_STATEMENT NUM:7 END_STATEMENT");
        assert_eq!(results.len(), 2);
        assert!(results[0].is_err());
        assert_eq!(results[1], Ok(Value::Integer(7)));
    }

    #[test]
    fn bad_literal_reported_at_execution() {
        assert!(matches!(
            run_err("NUM:99999999999999999999999 END_STATEMENT"),
            EvalErrorKind::InvalidLiteral { .. }
        ));
    }

    #[test]
    fn top_level_break_is_an_error() {
        assert_eq!(
            run_err("BREAK END_STATEMENT"),
            EvalErrorKind::ControlOutsideLoop {
                keyword: "break".into()
            }
        );
    }

    #[test]
    fn top_level_return_yields_value() {
        assert_eq!(run_last("NUM:3 RETURN1 END_STATEMENT"), Value::Integer(3));
    }
}

mod scoping {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn block_assignment_reaches_global() {
        let mut interp = prompt();
        write_stream(
            &mut interp,
            "BLOCKBEGIN ID:x NUM:1 ASSIGN END_STATEMENT BLOCKEND END_STATEMENT",
        );
        assert_eq!(interp.global("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn block_local_is_dropped() {
        let mut interp = prompt();
        write_stream(
            &mut interp,
            "BLOCKBEGIN ID:x LOCAL NUM:1 ASSIGN END_STATEMENT BLOCKEND END_STATEMENT",
        );
        assert_eq!(interp.global("x"), None);
        assert_eq!(interp.symbols().depth(), 1);
    }

    #[test]
    fn local_right_side_sees_outer_names() {
        // g = 5; { local g = g + 1; h = g; }
        let mut interp = prompt();
        write_stream(
            &mut interp,
            "ID:g NUM:5 ASSIGN END_STATEMENT \
             BLOCKBEGIN ID:g LOCAL ID:g NUM:1 ADD ASSIGN END_STATEMENT \
             ID:h ID:g ASSIGN END_STATEMENT BLOCKEND END_STATEMENT",
        );
        assert_eq!(interp.global("g"), Some(Value::Integer(5)));
        assert_eq!(interp.global("h"), Some(Value::Integer(6)));
    }

    #[test]
    fn local_declaration_without_value() {
        let mut interp = prompt();
        write_stream(&mut interp, "ID:q LOCAL END_STATEMENT");
        assert_eq!(interp.global("q"), Some(Value::None));
    }

    #[test]
    fn scope_restored_after_error() {
        let mut interp = prompt();
        write_stream(
            &mut interp,
            "BLOCKBEGIN ID:missing END_STATEMENT BLOCKEND END_STATEMENT",
        );
        assert!(interp.take_results()[0].is_err());
        assert_eq!(interp.symbols().depth(), 1);
    }
}

mod functions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_return_yields_none() {
        // y=function(x){return;};y();
        let value = run_last(
            "ID:y FUNCTIONBEGIN ID:x BLOCKBEGIN RETURN0 END_STATEMENT BLOCKEND FUNCTIONEND \
             ASSIGN END_STATEMENT ID:y CALLBEGIN CALLEND END_STATEMENT",
        );
        assert_eq!(value, Value::None);
    }

    #[test]
    fn local_object_is_returned() {
        // t=function(){local x=object();return x;};t();
        let mut interp = prompt();
        write_stream(
            &mut interp,
            "ID:t FUNCTIONBEGIN BLOCKBEGIN \
             ID:x LOCAL ID:object CALLBEGIN CALLEND ASSIGN END_STATEMENT \
             ID:x RETURN1 END_STATEMENT BLOCKEND FUNCTIONEND ASSIGN END_STATEMENT \
             ID:t CALLBEGIN CALLEND END_STATEMENT",
        );
        let value = interp.take_results().pop().unwrap().unwrap();
        assert_eq!(value.type_name(), "object");
        assert_eq!(interp.global("x"), None);
    }

    #[test]
    fn parameters_bind_positionally() {
        // f = function(a, b) { return a - b; }; f(10, 3, 99);
        let value = run_last(
            "ID:f FUNCTIONBEGIN ID:a ID:b BLOCKBEGIN ID:a ID:b SUB RETURN1 END_STATEMENT \
             BLOCKEND FUNCTIONEND ASSIGN END_STATEMENT \
             ID:f CALLBEGIN NUM:10 NUM:3 NUM:99 CALLEND END_STATEMENT",
        );
        assert_eq!(value, Value::Integer(7));
    }

    #[test]
    fn missing_arguments_are_none() {
        // f = function(a) { return a == none; }; f();
        let value = run_last(
            "ID:f FUNCTIONBEGIN ID:a BLOCKBEGIN ID:a NONE EQ RETURN1 END_STATEMENT \
             BLOCKEND FUNCTIONEND ASSIGN END_STATEMENT ID:f CALLBEGIN CALLEND END_STATEMENT",
        );
        assert_eq!(value, Value::Bit(true));
    }

    #[test]
    fn expression_body_yields_its_value() {
        // sq = x => x * x; sq(7);
        let value = run_last(
            "ID:sq FUNCTIONBEGIN ID:x ID:x ID:x MUL FUNCTIONEND ASSIGN END_STATEMENT \
             ID:sq CALLBEGIN NUM:7 CALLEND END_STATEMENT",
        );
        assert_eq!(value, Value::Integer(49));
    }

    #[test]
    fn callee_cannot_see_caller_locals() {
        // f = function() { return secret; }; { local secret = 1; f(); }
        let results = run(
            "ID:f FUNCTIONBEGIN BLOCKBEGIN ID:secret RETURN1 END_STATEMENT BLOCKEND FUNCTIONEND \
             ASSIGN END_STATEMENT \
             BLOCKBEGIN ID:secret LOCAL NUM:1 ASSIGN END_STATEMENT \
             ID:f CALLBEGIN CALLEND END_STATEMENT BLOCKEND END_STATEMENT",
        );
        assert!(matches!(
            results[1].as_ref().unwrap_err().kind,
            EvalErrorKind::Undefined { .. }
        ));
    }

    #[test]
    fn recursion() {
        // fact = function(n) { if (n < 2) return 1; return n * fact(n - 1); }; fact(10);
        let value = run_last(
            "ID:fact FUNCTIONBEGIN ID:n BLOCKBEGIN \
             ID:n NUM:2 LT NUM:1 RETURN1 IF END_STATEMENT \
             ID:n ID:fact CALLBEGIN ID:n NUM:1 SUB CALLEND MUL RETURN1 END_STATEMENT \
             BLOCKEND FUNCTIONEND ASSIGN END_STATEMENT \
             ID:fact CALLBEGIN NUM:10 CALLEND END_STATEMENT",
        );
        assert_eq!(value, Value::Integer(3_628_800));
    }

    #[test]
    fn call_depth_is_limited() {
        let mut interp = Interpreter::builder()
            .print_handler(buffer_handler())
            .max_call_depth(50)
            .build();
        write_stream(
            &mut interp,
            "ID:f FUNCTIONBEGIN BLOCKBEGIN ID:f CALLBEGIN CALLEND RETURN1 END_STATEMENT \
             BLOCKEND FUNCTIONEND ASSIGN END_STATEMENT ID:f CALLBEGIN CALLEND END_STATEMENT",
        );
        let err = interp.take_results().pop().unwrap().unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::StackOverflow { depth: 50 });
    }

    #[test]
    fn calling_a_non_function() {
        assert!(matches!(
            run_err("NUM:3 CALLBEGIN CALLEND END_STATEMENT"),
            EvalErrorKind::NotCallable { .. }
        ));
    }

    #[test]
    fn break_cannot_escape_a_call() {
        // f = function() { break; }; while (true) f();
        let results = run(
            "ID:f FUNCTIONBEGIN BLOCKBEGIN BREAK END_STATEMENT BLOCKEND FUNCTIONEND \
             ASSIGN END_STATEMENT TRUE ID:f CALLBEGIN CALLEND LOOP1 END_STATEMENT",
        );
        assert!(matches!(
            results[1].as_ref().unwrap_err().kind,
            EvalErrorKind::ControlOutsideLoop { .. }
        ));
    }
}

mod control_flow {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn if_else_selects_branch() {
        assert_eq!(run_last("TRUE NUM:1 NUM:2 IFELSE END_STATEMENT"), Value::Integer(1));
        assert_eq!(run_last("FALSE NUM:1 NUM:2 IFELSE END_STATEMENT"), Value::Integer(2));
        assert_eq!(run_last("FALSE NUM:1 IF END_STATEMENT"), Value::None);
    }

    #[test]
    fn condition_must_be_a_bit() {
        assert_eq!(
            run_err("NUM:1 NUM:1 IF END_STATEMENT"),
            EvalErrorKind::TypeMismatch {
                expected: "bit".into(),
                got: "integer".into()
            }
        );
    }

    #[test]
    fn counting_for_loop() {
        // for (i = 0; i < 5; i = i + 1) s = s + i;
        let mut interp = prompt();
        write_stream(
            &mut interp,
            "ID:s NUM:0 ASSIGN END_STATEMENT \
             ID:i NUM:0 ASSIGN ID:i NUM:5 LT ID:i ID:i NUM:1 ADD ASSIGN \
             ID:s ID:s ID:i ADD ASSIGN LOOP3 END_STATEMENT",
        );
        assert_eq!(interp.global("s"), Some(Value::Integer(10)));
    }

    #[test]
    fn break_and_continue() {
        // i = 0; s = 0; while (true) { i = i + 1; if (i > 5) break; if (i == 2) continue; s = s + i; }
        let mut interp = prompt();
        write_stream(
            &mut interp,
            "ID:i NUM:0 ASSIGN END_STATEMENT ID:s NUM:0 ASSIGN END_STATEMENT \
             TRUE BLOCKBEGIN \
             ID:i ID:i NUM:1 ADD ASSIGN END_STATEMENT \
             ID:i NUM:5 GT BREAK IF END_STATEMENT \
             ID:i NUM:2 EQ CONTINUE IF END_STATEMENT \
             ID:s ID:s ID:i ADD ASSIGN END_STATEMENT \
             BLOCKEND LOOP1 END_STATEMENT",
        );
        assert_eq!(interp.global("s"), Some(Value::Integer(13)));
    }

    #[test]
    fn short_circuit() {
        // false && undefined_name
        assert_eq!(run_last("FALSE ID:nope LAND END_STATEMENT"), Value::Bit(false));
        assert_eq!(run_last("TRUE ID:nope LOR END_STATEMENT"), Value::Bit(true));
    }
}

mod containers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn object_literal_and_member() {
        let value = run_last(
            "ID:o OBJECTBEGIN ID:a NUM:1 OBJECTEND ASSIGN END_STATEMENT ID:o ID:a MEMBER END_STATEMENT",
        );
        assert_eq!(value, Value::Integer(1));
    }

    #[test]
    fn missing_member_is_none() {
        let value = run_last(
            "ID:o OBJECTBEGIN OBJECTEND ASSIGN END_STATEMENT ID:o ID:zz MEMBER END_STATEMENT",
        );
        assert_eq!(value, Value::None);
    }

    #[test]
    fn member_assignment_is_seen_through_aliases() {
        let mut interp = prompt();
        write_stream(
            &mut interp,
            "ID:o OBJECTBEGIN OBJECTEND ASSIGN END_STATEMENT ID:p ID:o ASSIGN END_STATEMENT \
             ID:p ID:f MEMBER NUM:9 ASSIGN END_STATEMENT ID:o ID:f MEMBER END_STATEMENT",
        );
        let value = interp.take_results().pop().unwrap().unwrap();
        assert_eq!(value, Value::Integer(9));
    }

    #[test]
    fn invalid_assignment_target() {
        assert_eq!(
            run_err("NUM:1 NUM:2 ASSIGN END_STATEMENT"),
            EvalErrorKind::InvalidAssignmentTarget
        );
    }

    #[test]
    fn array_literal() {
        let value = run_last("ARRAYBEGIN NUM:1 STR:two ARRAYEND END_STATEMENT");
        assert_eq!(value, Value::array(vec![Value::Integer(1), Value::string("two")]));
    }
}

mod modes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn batch_waits_for_run_pending() {
        let mut interp = Interpreter::builder()
            .mode(ExecMode::Batch)
            .print_handler(buffer_handler())
            .build();
        write_stream(&mut interp, "ID:x NUM:1 ASSIGN END_STATEMENT ID:x END_STATEMENT");
        assert_eq!(interp.global("x"), None);
        assert_eq!(interp.run_pending(), Ok(Value::Integer(1)));
        assert!(!interp.failed());
    }

    #[test]
    fn batch_stops_at_first_error() {
        let mut interp = Interpreter::builder()
            .mode(ExecMode::Batch)
            .print_handler(buffer_handler())
            .build();
        write_stream(
            &mut interp,
            "ID:nope END_STATEMENT ID:x NUM:1 ASSIGN END_STATEMENT",
        );
        assert!(interp.run_pending().is_err());
        assert!(interp.failed());
        assert_eq!(interp.global("x"), None);
        // the skipped statement is gone
        assert_eq!(interp.run_pending(), Ok(Value::None));
        assert!(!interp.failed());
    }

    #[test]
    fn switching_to_prompt_keeps_globals() {
        let mut interp = Interpreter::builder()
            .mode(ExecMode::Batch)
            .print_handler(buffer_handler())
            .build();
        write_stream(&mut interp, "ID:x NUM:5 ASSIGN END_STATEMENT");
        interp.run_pending().unwrap();

        interp.set_mode(ExecMode::Prompt);
        write_stream(&mut interp, "ID:x END_STATEMENT");
        assert_eq!(interp.take_results(), vec![Ok(Value::Integer(5))]);
    }

    #[test]
    fn partial_statement_tracking() {
        let mut interp = prompt();
        write_stream(&mut interp, "BLOCKBEGIN ID:x");
        assert!(interp.is_mid_statement());
        interp.discard_partial();
        assert!(!interp.is_mid_statement());
    }

    #[test]
    fn fork_snapshots_globals() {
        let mut interp = prompt();
        interp.define_global("g", Value::Integer(1));
        let mut child = interp.fork();
        interp.define_global("g", Value::Integer(2));
        let native = interp.global("type").unwrap();
        assert_eq!(child.call(&native, &[Value::Integer(0)]), Ok(Value::string("integer")));
        assert!(child.delete_symbol("g"));
        assert_eq!(interp.global("g"), Some(Value::Integer(2)));
    }
}
