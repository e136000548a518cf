//! Iteration and tail calls must not grow the execution stack with the
//! number of iterations.

use pretty_assertions::assert_eq;
use sli_eval::{buffer_handler, ExecOutcome};

use crate::common::{builder, rendered};

/// Execution-stack high-water mark of running `template` with `{n}` replaced.
fn peak_for(template: &str, n: u64) -> (usize, String) {
    let out = buffer_handler();
    let mut interp = builder(&out).build();
    let source = template.replace("{n}", &n.to_string());
    assert_eq!(interp.execute_str(&source), ExecOutcome::Completed);
    assert!(!interp.has_active_error(), "{source} raised an error");
    (interp.exec_stack().peak(), rendered(&interp))
}

fn assert_constant_depth(template: &str) {
    let (small, _) = peak_for(template, 10);
    let (large, _) = peak_for(template, 100_000);
    assert_eq!(small, large, "{template}");
}

#[test]
fn repeat_runs_in_constant_depth() {
    assert_constant_depth("0 {n} { 1 add } repeat");
    assert_eq!(peak_for("0 {n} { 1 add } repeat", 100_000).1, "100000");
}

#[test]
fn for_runs_in_constant_depth() {
    assert_constant_depth("0 1 1 {n} { add } for");
    assert_eq!(peak_for("0 1 1 {n} { add } for", 100).1, "5050");
}

#[test]
fn loop_runs_in_constant_depth() {
    assert_constant_depth("0 { 1 add dup {n} eq { exit } if } loop");
}

#[test]
fn forall_runs_in_constant_depth() {
    assert_constant_depth("0 {n} array { add } forall");
    assert_constant_depth("0 [{n}] Range { add } forall");
    assert_eq!(peak_for("0 [{n}] Range { add } forall", 100).1, "5050");
}

#[test]
fn tail_recursion_runs_in_constant_depth() {
    let countdown = "/f { dup 0 gt { 1 sub f } if } def {n} f";
    assert_constant_depth(countdown);
    assert_eq!(peak_for(countdown, 1000).1, "0");
}

#[test]
fn debug_mode_keeps_every_frame() {
    let countdown = "/f { dup 0 gt { 1 sub f } if } def 20 f";
    let out = buffer_handler();
    let mut interp = builder(&out).debug(true).build();
    interp.execute_str(countdown);
    let (elided, _) = peak_for(countdown, 20);
    assert!(interp.exec_stack().peak() > elided + 20);
}
