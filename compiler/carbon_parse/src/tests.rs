//! Source text to instruction stream.

use super::*;

/// Instructions as space-separated `MNEMONIC` / `MNEMONIC:text` words.
fn dump(source: &str) -> String {
    parse(source)
        .unwrap()
        .instructions()
        .iter()
        .map(|instruction| match &instruction.text {
            Some(text) => format!("{}:{text}", instruction.kind),
            None => instruction.kind.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn error(source: &str) -> ParseError {
    parse(source).unwrap_err()
}

mod expressions {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn precedence() {
        assert_eq!(
            dump("2+9*2-5/5;"),
            "NUM:2 NUM:9 NUM:2 MUL ADD NUM:5 NUM:5 DIV SUB END_STATEMENT"
        );
    }

    #[test]
    fn logic_and_comparison() {
        assert_eq!(
            dump("a < 1 || b == c && !d;"),
            "ID:a NUM:1 LT ID:b ID:c EQ ID:d NOT LAND LOR END_STATEMENT"
        );
    }

    #[test]
    fn parentheses_and_unary() {
        assert_eq!(dump("-(1 + x);"), "NUM:1 ID:x ADD NEG END_STATEMENT");
    }

    #[test]
    fn number_classes() {
        assert_eq!(
            dump("[12, 017, 0x1F, 0b101, 1.5];"),
            "ARRAYBEGIN NUM:12 ONUM:017 XNUM:0x1F BNUM:0b101 FLOAT:1.5 ARRAYEND END_STATEMENT"
        );
    }

    #[test]
    fn string_and_bit_literals() {
        assert_eq!(
            dump(r#"["a\tb", 'raw', b"0101", x"ff"];"#),
            r"ARRAYBEGIN USTR:a\tb STR:raw BSTR:0101 XSTR:ff ARRAYEND END_STATEMENT"
        );
    }

    #[test]
    fn calls_and_members() {
        assert_eq!(
            dump("o.f(1, g())(x);"),
            "ID:o ID:f MEMBER CALLBEGIN NUM:1 ID:g CALLBEGIN CALLEND CALLEND \
             CALLBEGIN ID:x CALLEND END_STATEMENT"
        );
    }

    #[test]
    fn object_literal() {
        assert_eq!(
            dump(r#"x = {a: 1, "b c": true,};"#),
            "ID:x OBJECTBEGIN ID:a NUM:1 USTR:b c TRUE OBJECTEND ASSIGN END_STATEMENT"
        );
    }

    #[test]
    fn lambda_sugar() {
        assert_eq!(
            dump("f = x => x * 2;"),
            "ID:f FUNCTIONBEGIN ID:x ID:x NUM:2 MUL FUNCTIONEND ASSIGN END_STATEMENT"
        );
    }

    #[test]
    fn function_literal() {
        assert_eq!(
            dump("f = function(a, b) { return a; };"),
            "ID:f FUNCTIONBEGIN ID:a ID:b BLOCKBEGIN ID:a RETURN1 END_STATEMENT BLOCKEND \
             FUNCTIONEND ASSIGN END_STATEMENT"
        );
    }
}

mod statements {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn member_assignment() {
        assert_eq!(dump("o.f = 1;"), "ID:o ID:f MEMBER NUM:1 ASSIGN END_STATEMENT");
    }

    #[test]
    fn local_declarations() {
        assert_eq!(
            dump("local x; local y = 2;"),
            "ID:x LOCAL END_STATEMENT ID:y LOCAL NUM:2 ASSIGN END_STATEMENT"
        );
    }

    #[test]
    fn block_statements_are_listed() {
        assert_eq!(
            dump("{ x = 1; ; x; }"),
            "BLOCKBEGIN ID:x NUM:1 ASSIGN END_STATEMENT ID:x END_STATEMENT BLOCKEND END_STATEMENT"
        );
    }

    #[test]
    fn if_else_branches_are_single_nodes() {
        assert_eq!(
            dump("if (c) x = 1; else { break; }"),
            "ID:c ID:x NUM:1 ASSIGN BLOCKBEGIN BREAK END_STATEMENT BLOCKEND IFELSE END_STATEMENT"
        );
    }

    #[test]
    fn while_forms() {
        assert_eq!(dump("while (f());"), "ID:f CALLBEGIN CALLEND LOOP0 END_STATEMENT");
        assert_eq!(dump("while (c) continue;"), "ID:c CONTINUE LOOP1 END_STATEMENT");
    }

    #[test]
    fn for_forms() {
        assert_eq!(
            dump("for (i = 0; i < 3; i = i + 1) s;"),
            "ID:i NUM:0 ASSIGN ID:i NUM:3 LT ID:i ID:i NUM:1 ADD ASSIGN ID:s LOOP3 END_STATEMENT"
        );
        assert_eq!(
            dump("for (; c; s) b;"),
            "ID:c ID:s ID:b LOOP2 END_STATEMENT"
        );
        assert_eq!(dump("for (;;) b;"), "TRUE ID:b LOOP1 END_STATEMENT");
        assert_eq!(
            dump("for (i = 0; c;) b;"),
            "ID:i NUM:0 ASSIGN ID:c BLOCKBEGIN BLOCKEND ID:b LOOP3 END_STATEMENT"
        );
    }

    #[test]
    fn returns() {
        assert_eq!(dump("return; return 1;"), "RETURN0 END_STATEMENT NUM:1 RETURN1 END_STATEMENT");
    }

    #[test]
    fn function_statement() {
        assert_eq!(
            dump("function id(x) { return x; }"),
            "ID:id FUNCTIONBEGIN ID:x BLOCKBEGIN ID:x RETURN1 END_STATEMENT BLOCKEND \
             FUNCTIONEND ASSIGN END_STATEMENT"
        );
    }

    #[test]
    fn final_semicolon_optional_at_top_level() {
        assert_eq!(dump("1; x = 2"), "NUM:1 END_STATEMENT ID:x NUM:2 ASSIGN END_STATEMENT");
    }

    #[test]
    fn comments() {
        assert_eq!(dump("# header\nx; // trailing"), "ID:x END_STATEMENT");
    }
}

mod errors {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn invalid_assignment_target() {
        let err = error("f() = 1;");
        assert_eq!(err.message, "invalid assignment target");
        assert_eq!(err.span, 0..4);
        assert!(!err.incomplete);
    }

    #[test]
    fn unexpected_token() {
        let err = error("x = );");
        assert_eq!(err.message, "expected an expression, found `)`");
        assert_eq!(err.span, 4..5);
    }

    #[test]
    fn missing_semicolon_inside_block() {
        let err = error("{ x }");
        assert_eq!(err.message, "expected `;`, found `}`");
    }

    #[test]
    fn open_constructs_are_incomplete() {
        for source in ["{ x = 1;", "if (c)", "f(1,", "x = [1, 2", "function f(a) {"] {
            assert!(error(source).incomplete, "{source}");
        }
    }

    #[test]
    fn empty_source_is_empty_stream() {
        assert!(parse("  // nothing\n").unwrap().is_empty());
    }
}
