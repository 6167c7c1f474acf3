use super::*;
use carbon_patterns::EvalErrorKind;

fn eval(left: Value, op: BinaryOp, right: Value) -> Value {
    evaluate_binary(&left, &right, op).unwrap()
}

fn eval_err(left: Value, op: BinaryOp, right: Value) -> EvalErrorKind {
    evaluate_binary(&left, &right, op).unwrap_err().into_error().kind
}

fn bits(text: &str) -> Value {
    Value::bits(BitSequence::from_bit_chars(text))
}

mod integers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arithmetic() {
        assert_eq!(eval(Value::Integer(7), BinaryOp::Add, Value::Integer(5)), Value::Integer(12));
        assert_eq!(eval(Value::Integer(7), BinaryOp::Sub, Value::Integer(9)), Value::Integer(-2));
        assert_eq!(eval(Value::Integer(7), BinaryOp::Div, Value::Integer(2)), Value::Integer(3));
        assert_eq!(eval(Value::Integer(-7), BinaryOp::Mod, Value::Integer(2)), Value::Integer(-1));
    }

    #[test]
    fn errors() {
        assert_eq!(
            eval_err(Value::Integer(1), BinaryOp::Div, Value::Integer(0)),
            EvalErrorKind::DivisionByZero
        );
        assert_eq!(
            eval_err(Value::Integer(1), BinaryOp::Mod, Value::Integer(0)),
            EvalErrorKind::DivisionByZero
        );
        assert!(matches!(
            eval_err(Value::Integer(i64::MAX), BinaryOp::Add, Value::Integer(1)),
            EvalErrorKind::IntegerOverflow { .. }
        ));
    }

    #[test]
    fn comparisons() {
        assert_eq!(eval(Value::Integer(1), BinaryOp::Lt, Value::Integer(2)), Value::Bit(true));
        assert_eq!(eval(Value::Integer(2), BinaryOp::Le, Value::Integer(2)), Value::Bit(true));
        assert_eq!(eval(Value::Integer(2), BinaryOp::Gt, Value::Integer(2)), Value::Bit(false));
        assert_eq!(eval(Value::Integer(2), BinaryOp::Ne, Value::Integer(3)), Value::Bit(true));
    }

    #[test]
    fn mixed_with_float_is_a_mismatch() {
        assert_eq!(
            eval_err(Value::Integer(1), BinaryOp::Add, Value::Float(1.0)),
            EvalErrorKind::TypeMismatch {
                expected: "integer".into(),
                got: "float".into()
            }
        );
    }
}

mod floats {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arithmetic_and_compare() {
        assert_eq!(eval(Value::Float(1.5), BinaryOp::Mul, Value::Float(2.0)), Value::Float(3.0));
        assert_eq!(eval(Value::Float(1.5), BinaryOp::Ge, Value::Float(1.5)), Value::Bit(true));
        assert_eq!(
            eval_err(Value::Float(1.0), BinaryOp::Div, Value::Float(0.0)),
            EvalErrorKind::DivisionByZero
        );
    }

    #[test]
    fn nan_is_unordered() {
        assert_eq!(eval(Value::Float(f64::NAN), BinaryOp::Eq, Value::Float(f64::NAN)), Value::Bit(false));
        assert_eq!(eval(Value::Float(f64::NAN), BinaryOp::Ne, Value::Float(1.0)), Value::Bit(true));
    }
}

mod strings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn concat_and_repeat() {
        assert_eq!(eval(Value::string("ab"), BinaryOp::Add, Value::string("cd")), Value::string("abcd"));
        assert_eq!(eval(Value::string("ab"), BinaryOp::Mul, Value::Integer(3)), Value::string("ababab"));
    }

    #[test]
    fn integer_first_multiply_commutes() {
        assert_eq!(eval(Value::Integer(2), BinaryOp::Mul, Value::string("xy")), Value::string("xyxy"));
    }

    #[test]
    fn integer_first_add_does_not_commute() {
        assert!(matches!(
            eval_err(Value::Integer(2), BinaryOp::Add, Value::string("xy")),
            EvalErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert_eq!(eval(Value::string("abc"), BinaryOp::Lt, Value::string("abd")), Value::Bit(true));
    }

    #[test]
    fn negative_repeat_count() {
        assert_eq!(
            eval_err(Value::string("a"), BinaryOp::Mul, Value::Integer(-1)),
            EvalErrorKind::Custom {
                message: "negative repeat count: -1".into()
            }
        );
    }
}

mod bit_sequences {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn concat_and_repeat() {
        assert_eq!(eval(bits("01"), BinaryOp::Add, bits("1")), bits("011"));
        assert_eq!(eval(bits("01"), BinaryOp::Mul, Value::Integer(3)), bits("010101"));
        assert_eq!(eval(Value::Integer(2), BinaryOp::Mul, bits("1")), bits("11"));
    }

    #[test]
    fn equality_any_length() {
        assert_eq!(eval(bits("01"), BinaryOp::Eq, bits("011")), Value::Bit(false));
        assert_eq!(eval(bits("01"), BinaryOp::Ne, bits("011")), Value::Bit(true));
    }

    #[test]
    fn ordering_needs_equal_length() {
        // index 0 is the least significant bit
        assert_eq!(eval(bits("10"), BinaryOp::Lt, bits("01")), Value::Bit(true));
        assert!(matches!(
            eval_err(bits("01"), BinaryOp::Lt, bits("011")),
            EvalErrorKind::LengthMismatch { .. }
        ));
    }
}

mod containers_and_none {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn arrays() {
        let a = Value::array(vec![Value::Integer(1)]);
        assert_eq!(
            eval(a.clone(), BinaryOp::Add, a.clone()),
            Value::array(vec![Value::Integer(1), Value::Integer(1)])
        );
        assert_eq!(
            eval(Value::Integer(2), BinaryOp::Mul, a.clone()),
            Value::array(vec![Value::Integer(1), Value::Integer(1)])
        );
        assert_eq!(
            eval(a, BinaryOp::Eq, Value::array(vec![Value::Integer(1)])),
            Value::Bit(true)
        );
    }

    #[test]
    fn huge_repetition_is_an_overflow() {
        let huge = Value::Integer(i64::MAX);
        let pair = Value::array(vec![Value::Integer(1), Value::Integer(2)]);
        for value in [pair.clone(), Value::string("ab"), bits("01")] {
            assert!(matches!(
                eval_err(value.clone(), BinaryOp::Mul, huge.clone()),
                EvalErrorKind::IntegerOverflow { .. }
            ));
            assert!(matches!(
                eval_err(huge.clone(), BinaryOp::Mul, value),
                EvalErrorKind::IntegerOverflow { .. }
            ));
        }
        assert_eq!(
            eval(Value::array(vec![]), BinaryOp::Mul, huge),
            Value::array(vec![])
        );
    }

    #[test]
    fn cyclic_arrays_compare_without_recursing_forever() {
        let cyclic = || {
            let array = Value::array(vec![Value::Integer(0)]);
            if let Value::Array(items) = &array {
                items.write()[0] = array.clone();
            }
            array
        };
        assert_eq!(eval(cyclic(), BinaryOp::Eq, cyclic()), Value::Bit(true));
        assert_eq!(eval(cyclic(), BinaryOp::Ne, cyclic()), Value::Bit(false));
    }

    #[test]
    fn none_only_compares_for_equality() {
        assert_eq!(eval(Value::None, BinaryOp::Eq, Value::None), Value::Bit(true));
        assert_eq!(eval(Value::Integer(1), BinaryOp::Eq, Value::None), Value::Bit(false));
        assert_eq!(eval(Value::None, BinaryOp::Ne, Value::string("x")), Value::Bit(true));
        assert_eq!(
            eval_err(Value::None, BinaryOp::Add, Value::None),
            EvalErrorKind::UnsupportedOperator {
                op: "+".into(),
                type_name: "none".into()
            }
        );
    }

    #[test]
    fn bits_and_objects_support_only_equality() {
        assert_eq!(eval(Value::Bit(true), BinaryOp::Eq, Value::Bit(true)), Value::Bit(true));
        assert!(matches!(
            eval_err(Value::Bit(true), BinaryOp::Add, Value::Bit(true)),
            EvalErrorKind::UnsupportedOperator { .. }
        ));
        let object = Value::empty_object();
        assert_eq!(eval(object.clone(), BinaryOp::Eq, object.clone()), Value::Bit(true));
        assert!(matches!(
            eval_err(object, BinaryOp::Lt, Value::empty_object()),
            EvalErrorKind::UnsupportedOperator { .. }
        ));
    }
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn integer_addition_is_checked(a in any::<i64>(), b in any::<i64>()) {
            let result = evaluate_binary(&Value::Integer(a), &Value::Integer(b), BinaryOp::Add);
            match a.checked_add(b) {
                Some(sum) => prop_assert_eq!(result.unwrap(), Value::Integer(sum)),
                None => prop_assert!(matches!(
                    result.unwrap_err().into_error().kind,
                    EvalErrorKind::IntegerOverflow { .. }
                ), "expected IntegerOverflow"),
            }
        }

        #[test]
        fn repetition_commutes(text in "[a-z]{0,6}", n in 0i64..8) {
            let forward = eval(Value::string(text.as_str()), BinaryOp::Mul, Value::Integer(n));
            let backward = eval(Value::Integer(n), BinaryOp::Mul, Value::string(text.as_str()));
            prop_assert_eq!(forward.as_str().map(str::len), Some(text.len() * n as usize));
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn comparisons_agree_with_integers(a in any::<i64>(), b in any::<i64>()) {
            prop_assert_eq!(eval(Value::Integer(a), BinaryOp::Lt, Value::Integer(b)), Value::Bit(a < b));
            prop_assert_eq!(eval(Value::Integer(a), BinaryOp::Ge, Value::Integer(b)), Value::Bit(a >= b));
        }
    }
}
