//! The stop/stopped protocol and error reporting.

use pretty_assertions::assert_eq;
use sli_eval::{buffer_handler, Value};

use crate::common::{builder, rendered, run, stack_of};

#[test]
fn stopped_is_false_when_the_body_completes() {
    let (interp, _) = run("{ 1 2 add } stopped");
    assert_eq!(rendered(&interp), "3 false");
    assert!(!interp.has_active_error());
}

#[test]
fn stopped_is_true_after_an_error_and_fills_the_record() {
    let (interp, out) = run("{ 1 (a) add } stopped");
    assert_eq!(rendered(&interp), "1 (a) /add true");
    let record = interp.error_record();
    assert!(record.newerror);
    assert_eq!(record.errorname.as_deref(), Some("ArgumentType"));
    assert_eq!(record.commandname.as_deref(), Some("add"));
    assert!(record.message.is_some());
    assert_eq!(out.get_output(), "");
}

#[test]
fn unmatched_stop_abandons_the_evaluation() {
    let (interp, out) = run("1 { 2 stop 3 } exec 4");
    assert_eq!(rendered(&interp), "1 2");
    assert_eq!(interp.exec_depth(), 0);
    assert_eq!(interp.unguarded_errors(), 1);
    assert_eq!(out.get_output(), "");
}

#[test]
fn unguarded_errors_are_reported_with_the_message() {
    let (interp, out) = run("1 0 div");
    assert_eq!(out.get_output(), "Error: /DivisionByZero in div\n");
    assert_eq!(rendered(&interp), "1 0 /div");
    assert_eq!(interp.exec_depth(), 0);
}

#[test]
fn an_unhandled_error_followed_by_another_is_a_bad_handler() {
    let (interp, out) = run("{ pop } stopped pop pop pop");
    let record = interp.error_record();
    assert_eq!(record.errorname.as_deref(), Some("BadErrorHandler"));
    assert_eq!(record.commandname.as_deref(), Some("raiseerror"));
    assert_eq!(
        out.get_output(),
        "Error: /BadErrorHandler in raiseerror\n    \
         /StackUnderflow in pop raised while /StackUnderflow from pop was not handled\n"
    );
}

#[test]
fn handled_errors_do_not_escalate() {
    let (interp, _) = run("{ 1 0 div } stopped { clear_error } if { 1 0 div } stopped");
    let record = interp.error_record();
    assert_eq!(record.errorname.as_deref(), Some("DivisionByZero"));
    assert_eq!(rendered(&interp), "1 0 /div 1 0 /div true");
}

#[test]
fn errors_leave_the_operands_untouched() {
    assert_eq!(stack_of("mark 1 2 3 counttomark"), "<mark> 1 2 3 3");
    assert_eq!(stack_of("(x) { } repeat"), "(x) {} /repeat");
}

#[test]
fn recorded_stacks_appear_in_the_report() {
    let out = buffer_handler();
    let mut interp = builder(&out).record_stacks(true).build();
    interp.execute_str("1 (x) 3 npop");
    let record = interp.error_record();
    assert_eq!(
        record.ostack,
        Some(vec![Value::Integer(1), Value::string("x"), Value::Integer(3)])
    );
    assert!(record.estack.is_some());
    assert_eq!(record.dstack.map(|d| d.len()), Some(2));
    assert_eq!(
        out.get_output(),
        "Error: /StackUnderflow in npop\n    \
         4 operand(s) required, 3 available\n    \
         operand stack:\n      3\n      (x)\n      1\n"
    );
}

#[test]
fn statements_before_a_syntax_error_run() {
    let (interp, out) = run("(before) = 1 2 add }");
    assert_eq!(
        out.get_output(),
        "before\nError: /SyntaxError in scanner\n    unmatched `}` at line 1, column 20\n"
    );
    assert_eq!(rendered(&interp), "3 /scanner");
    assert_eq!(interp.exec_depth(), 0);
}

#[test]
fn syntax_errors_are_script_errors() {
    let (interp, _) = run("{ 1 } stopped pop 1 }");
    assert_eq!(
        interp.error_record().errorname.as_deref(),
        Some("SyntaxError")
    );
    assert_eq!(interp.exec_depth(), 0);
}
