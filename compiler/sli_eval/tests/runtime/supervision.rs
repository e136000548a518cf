//! Cycle guard, termination, the status dictionary and the debugger.

use std::sync::atomic::Ordering;

use pretty_assertions::assert_eq;
use sli_eval::{buffer_handler, ExecOutcome, ScriptedDebugInput};

use crate::common::{builder, rendered, run};

// Cycle guard

#[test]
fn guard_trips_on_the_cycle_after_its_budget() {
    for budget in [1_u64, 10, 500] {
        let out = buffer_handler();
        let mut interp = builder(&out).cycle_guard(budget).build();
        interp.execute_str("{ } loop");
        assert_eq!(interp.cycle_guard().tripped_at(), Some(budget + 1));
        assert!(!interp.cycle_guard().is_armed());
        assert_eq!(
            interp.error_record().errorname.as_deref(),
            Some("CycleGuard")
        );
        assert_eq!(interp.exec_depth(), 0);
    }
}

#[test]
fn errors_raised_at_the_guard_limit_keep_their_name() {
    for budget in [2_u64, 3] {
        let out = buffer_handler();
        let mut interp = builder(&out).cycle_guard(budget).build();
        interp.execute_str("pop");
        let report = out.get_output();
        assert!(
            report.starts_with("Error: /StackUnderflow in pop"),
            "budget {budget}: {report}"
        );
        assert!(!report.contains("BadErrorHandler"), "budget {budget}: {report}");
        assert_eq!(interp.exec_depth(), 0);
    }
}

#[test]
fn setguard_counts_from_the_moment_it_is_armed() {
    let (interp, out) = run("100 setguard { } loop");
    assert_eq!(interp.cycle_guard().tripped_at(), Some(101));
    assert!(out.get_output().starts_with("Error: /CycleGuard in "));
}

#[test]
fn guard_errors_can_be_caught() {
    let (interp, _) = run("50 setguard { { } loop } stopped removeguard");
    assert_eq!(rendered(&interp).split(' ').last(), Some("true"));
    assert_eq!(interp.unguarded_errors(), 0);
}

#[test]
fn removeguard_disarms() {
    let (interp, _) = run("5 setguard removeguard 0 1 1 100 { add } for");
    assert_eq!(rendered(&interp), "5050");
    assert_eq!(interp.cycle_guard().tripped_at(), None);
}

// Signals

#[test]
fn pending_signal_stops_the_next_cycle() {
    let out = buffer_handler();
    let mut interp = builder(&out).build();
    let flag = interp.signal_flag();
    flag.store(15, Ordering::Relaxed);
    interp.execute_str("{ 1 } stopped");
    assert_eq!(
        interp.error_record().message.as_deref(),
        Some("caught signal 15")
    );
    assert_eq!(flag.load(Ordering::Relaxed), 0);
    // Later evaluations are unaffected.
    interp.execute_str("clear 2 3 add");
    assert_eq!(rendered(&interp), "5");
}

// Termination

#[test]
fn terminate_fatal_maps_to_exit_code() {
    let out = buffer_handler();
    let mut interp = builder(&out).build();
    interp.terminate(-1);
    assert_eq!(interp.exit_request(), Some(127));
    let (status, _) = run("-1 quit_i");
    assert_eq!(status.exit_request(), Some(127));
}

#[test]
fn quit_uses_the_status_exit_code() {
    let out = buffer_handler();
    let mut interp = builder(&out).build();
    let outcome = interp.execute_str("statusdict /exitcode 7 put quit 1 2 3");
    assert_eq!(outcome, ExecOutcome::ExitRequested(7));
    assert_eq!(rendered(&interp), "");
}

#[test]
fn exit_requests_leave_nested_evaluations() {
    let (interp, _) = run("{ { 4 quit_i } loop } stopped 99");
    assert_eq!(interp.exit_request(), Some(4));
    assert_eq!(rendered(&interp), "");
    assert_eq!(interp.exec_depth(), 0);
}

// Status dictionary

#[test]
fn statusdict_describes_the_process() {
    let out = buffer_handler();
    let mut interp = builder(&out)
        .argv(vec!["prog.sli".to_string(), "-x".to_string()])
        .environment(vec![("HOME".to_string(), "/home/sli".to_string())])
        .build();
    interp.execute_str(
        "statusdict /argv get \
         statusdict /prgname get \
         statusdict /exitcodes get /scripterror get \
         statusdict /exitcodes get /success get \
         statusdict /environment get /HOME get \
         statusdict /exitcode get",
    );
    assert_eq!(
        rendered(&interp),
        "[(prog.sli) (-x)] (sli) 126 0 (/home/sli) 0"
    );
}

#[test]
fn exit_codes_match_the_published_table() {
    let out = buffer_handler();
    let interp = builder(&out).build();
    for (key, code) in sli_eval::EXIT_CODES {
        assert_eq!(interp.exit_code_for(key), Some(code), "{key}");
    }
}

#[test]
fn mirrors_are_read_only() {
    let (interp, _) = run("statusdict /environment get /HOME (x) put");
    assert_eq!(
        interp.error_record().errorname.as_deref(),
        Some("WriteProtected")
    );
}

// Debugger

#[test]
fn scripted_debugger_session() {
    let out = buffer_handler();
    let mut interp = builder(&out)
        .debug_input(Box::new(ScriptedDebugInput::new(["where", "c"])))
        .build();
    interp.execute_str("debugon stepmode 1 2 add");
    assert_eq!(rendered(&interp), "3");
    assert_eq!(
        out.get_output(),
        "next (0): <xistreamtype>\n  0: <xistreamtype>\n"
    );
    assert!(interp.debug_mode());
}

#[test]
fn stepmode_without_debug_mode_warns() {
    let (interp, out) = run("stepmode");
    assert_eq!(
        out.get_output(),
        "WARNING [stepmode]: debug mode is off; use debugon first\n"
    );
    assert!(!interp.debug_mode());
}

#[test]
fn debugoff_stops_stepping() {
    let out = buffer_handler();
    let mut interp = builder(&out)
        .debug_input(Box::new(ScriptedDebugInput::new(["c"])))
        .build();
    interp.execute_str("debugon stepmode debugoff 1");
    assert!(!interp.debug_mode());
    assert!(!interp.debugger_mut().is_stepping());
}
