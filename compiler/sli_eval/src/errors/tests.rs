use pretty_assertions::assert_eq;

use super::*;

#[test]
fn kind_names_match_script_names() {
    assert_eq!(ErrorKind::StackUnderflow.name(), "StackUnderflow");
    assert_eq!(ErrorKind::BadErrorHandler.name(), "BadErrorHandler");
    assert_eq!(ErrorKind::EStackUnderflow.to_string(), "EStackUnderflow");
}

#[test]
fn display_includes_message() {
    let err = stack_underflow(2, 1);
    assert_eq!(err.kind, ErrorKind::StackUnderflow);
    assert_eq!(
        err.to_string(),
        "StackUnderflow: 2 operand(s) required, 1 available"
    );
    assert_eq!(division_by_zero().to_string(), "DivisionByZero");
}

#[test]
fn argument_type_names_position_and_types() {
    let err = argument_type(2, "an integer", TypeTag::Double);
    assert_eq!(err.kind, ErrorKind::ArgumentType);
    assert_eq!(
        err.message.as_deref(),
        Some("argument 2 must be an integer, found doubletype")
    );
}

#[test]
fn overflow_is_a_range_check() {
    assert_eq!(integer_overflow("add").kind, ErrorKind::RangeCheck);
    assert_eq!(positive_integer_expected(-3).kind, ErrorKind::PositiveIntegerExpected);
}

#[test]
fn trie_errors_share_one_kind() {
    for err in [
        duplicate_signature("add"),
        empty_signature("add"),
        unknown_type_name("floattype"),
    ] {
        assert_eq!(err.kind, ErrorKind::InvalidTrie);
    }
}
