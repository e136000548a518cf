use std::sync::atomic::Ordering;

use pretty_assertions::assert_eq;

use super::*;
use crate::message::{M_ALL, M_INFO};
use crate::print_handler::buffer_handler;

fn interp_with_output() -> (Interpreter, SharedPrintHandler) {
    let out = buffer_handler();
    let interp = Interpreter::builder()
        .print_handler(out.clone())
        .environment(Vec::new())
        .build();
    (interp, out)
}

fn ints(interp: &Interpreter) -> Vec<i64> {
    interp
        .operand_stack()
        .iter()
        .filter_map(Value::as_int)
        .collect()
}

#[test]
fn executes_source_text() {
    let (mut interp, _) = interp_with_output();
    assert_eq!(interp.execute_str("1 2 add 10 mul"), ExecOutcome::Completed);
    assert_eq!(ints(&interp), vec![30]);
    assert_eq!(interp.exec_depth(), 0);
}

#[test]
fn host_bindings_are_visible_to_scripts() {
    let (mut interp, _) = interp_with_output();
    interp.define("x", Value::Integer(5)).expect("define");
    interp.execute_str("x x add /y exch def");
    assert_eq!(interp.lookup("y"), Some(Value::Integer(10)));
}

fn answer(interp: &mut Interpreter) -> SliResult {
    interp.operand_stack_mut().push(Value::Integer(42));
    Ok(())
}

#[test]
fn host_primitives_can_be_registered() {
    let (mut interp, _) = interp_with_output();
    interp.register("answer", answer).expect("register");
    interp.execute_str("answer answer add");
    assert_eq!(ints(&interp), vec![84]);
}

#[test]
fn host_variants_join_a_trie() {
    let (mut interp, _) = interp_with_output();
    interp
        .register_variant("describe", &[TypeTag::Bool], "describe_b", answer)
        .expect("register");
    interp.execute_str("true describe");
    assert_eq!(ints(&interp), vec![42]);
    assert_eq!(interp.operand_stack().len(), 2);
}

fn seven(interp: &mut Interpreter) -> SliResult {
    interp.operand_stack_mut().push(Value::Integer(7));
    Ok(())
}

#[test]
fn later_variants_extend_the_created_trie() {
    let (mut interp, _) = interp_with_output();
    interp
        .register_variant("pick_one", &[TypeTag::Bool], "pick_one_b", answer)
        .expect("register");
    let first = interp.lookup("pick_one");
    assert!(matches!(first, Some(Value::Trie(_))));
    interp
        .register_variant("pick_one", &[TypeTag::Integer], "pick_one_i", seven)
        .expect("register");
    assert_eq!(interp.lookup("pick_one"), first);
    interp.execute_str("true pick_one 1 pick_one");
    assert_eq!(ints(&interp), vec![42, 1, 7]);
}

#[test]
fn execute_value_runs_a_procedure() {
    let (mut interp, _) = interp_with_output();
    let add = Value::Name(interp.name("add"));
    let proc = Value::procedure(vec![Value::Integer(2), Value::Integer(3), add]);
    assert_eq!(interp.execute_value(proc), ExecOutcome::Completed);
    assert_eq!(ints(&interp), vec![5]);
}

#[test]
fn interpreters_are_independent() {
    let (mut a, _) = interp_with_output();
    let (b, _) = interp_with_output();
    a.execute_str("/only_in_a 1 def");
    assert!(a.lookup("only_in_a").is_some());
    assert!(b.lookup("only_in_a").is_none());
}

// Termination

#[test]
fn quit_with_code_requests_exit() {
    let (mut interp, _) = interp_with_output();
    assert_eq!(interp.execute_str("3 quit_i 99"), ExecOutcome::ExitRequested(3));
    assert_eq!(interp.exit_request(), Some(3));
    assert_eq!(interp.exit_code(), 3);
    assert!(ints(&interp).is_empty());
    assert_eq!(interp.exec_depth(), 0);
}

#[test]
fn exit_request_is_sticky() {
    let (mut interp, _) = interp_with_output();
    interp.terminate(4);
    assert_eq!(interp.execute_str("1"), ExecOutcome::ExitRequested(4));
    assert!(ints(&interp).is_empty());
}

#[test]
fn terminate_minus_one_means_fatal() {
    let (mut interp, _) = interp_with_output();
    interp.terminate(-1);
    assert_eq!(interp.exit_request(), Some(127));
    assert_eq!(interp.exit_code(), 127);
}

// Supervision

#[test]
fn signal_flag_interrupts_at_cycle_boundary() {
    let (mut interp, _) = interp_with_output();
    interp.signal_flag().store(2, Ordering::Relaxed);
    interp.execute_str("1 2 3");
    let record = interp.error_record();
    assert_eq!(record.errorname.as_deref(), Some("SystemSignal"));
    assert_eq!(interp.exec_depth(), 0);
    assert_eq!(interp.unguarded_errors(), 1);
    assert_eq!(interp.signal_flag().load(Ordering::Relaxed), 0);
}

#[test]
fn unguarded_errors_are_reported() {
    let (mut interp, out) = interp_with_output();
    interp.execute_str("pop");
    assert_eq!(
        out.get_output(),
        "Error: /StackUnderflow in pop\n    1 operand(s) required, 0 available\n"
    );
    assert!(!interp.has_active_error());
    assert_eq!(interp.exec_depth(), 0);
}

#[test]
fn quiet_verbosity_suppresses_reports() {
    let (mut interp, out) = interp_with_output();
    interp.set_verbosity(crate::message::M_QUIET);
    interp.execute_str("pop");
    assert_eq!(out.get_output(), "");
    assert_eq!(interp.unguarded_errors(), 1);
}

#[test]
fn messages_respect_verbosity() {
    let (mut interp, out) = interp_with_output();
    assert_eq!(interp.verbosity(), M_INFO);
    interp.execute_str("M_WARNING (me) (shown) message M_DEBUG (me) (hidden) message");
    assert_eq!(out.get_output(), "WARNING [me]: shown\n");
}

#[test]
fn deprecated_alias_warns_once() {
    let out = buffer_handler();
    let mut interp = Interpreter::builder()
        .print_handler(out.clone())
        .verbosity(M_ALL)
        .build();
    interp.execute_str("1 pstack pstack");
    assert_eq!(
        out.get_output(),
        "DEPRECATED [pstack]: pstack is deprecated; use stack\n1\n1\n"
    );
}

#[test]
fn callback_runs_on_request() {
    let (mut interp, _) = interp_with_output();
    assert_eq!(interp.run_callback(), ExecOutcome::Completed);
    interp.execute_str("{ 7 } setcallback");
    interp.run_callback();
    interp.run_callback();
    assert_eq!(ints(&interp), vec![7, 7]);
    interp.execute_str("clearcallback clear");
    interp.run_callback();
    assert!(ints(&interp).is_empty());
}

#[test]
fn debug_mode_shows_everything() {
    let (mut interp, _) = interp_with_output();
    interp.set_debug_mode(true);
    assert!(interp.debug_mode());
    assert_eq!(interp.verbosity(), M_ALL);
}
