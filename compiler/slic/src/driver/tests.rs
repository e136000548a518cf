use std::io::Cursor;
use std::path::PathBuf;

use pretty_assertions::assert_eq;
use sli_eval::message::M_ALL;
use sli_eval::{buffer_handler, SharedPrintHandler};

use super::*;
use crate::cli::{parse_args, Command};

fn session(config: &Config) -> (Interpreter, SharedPrintHandler) {
    let out = buffer_handler();
    let interp = interpreter_builder(config)
        .print_handler(out.clone())
        .environment(Vec::new())
        .build();
    (interp, out)
}

fn code(snippets: &[&str]) -> Config {
    Config {
        inputs: snippets
            .iter()
            .map(|s| Input::Code((*s).to_string()))
            .collect(),
        ..Config::default()
    }
}

fn run_code(snippets: &[&str]) -> (i32, Interpreter, String) {
    let config = code(snippets);
    let (mut interp, out) = session(&config);
    let status = execute(&config, &mut interp).expect("execute");
    (status, interp, out.get_output())
}

/// Feed `input` to the interactive loop; returns outcome, prompts and output.
fn interactive(input: &str) -> (ExecOutcome, Interpreter, String, String) {
    let (mut interp, out) = session(&Config::default());
    let mut prompts = Vec::new();
    let outcome = repl(&mut interp, Cursor::new(input.to_string()), &mut prompts).expect("repl");
    let prompts = String::from_utf8(prompts).expect("utf8");
    (outcome, interp, prompts, out.get_output())
}

// Batch inputs

#[test]
fn inputs_share_one_interpreter() {
    let (status, _, output) = run_code(&["1 2 add", "10 mul ="]);
    assert_eq!(status, 0);
    assert_eq!(output, "30\n");
}

#[test]
fn quit_ends_the_run() {
    let (status, interp, output) = run_code(&["5 quit_i", "(late) ="]);
    assert_eq!(status, 5);
    assert_eq!(output, "");
    assert_eq!(interp.exit_request(), Some(5));
}

#[test]
fn unguarded_errors_fail_the_run() {
    let (status, interp, output) = run_code(&["pop", "(next) ="]);
    assert_eq!(status, 126);
    assert_eq!(
        output,
        "Error: /StackUnderflow in pop\n    1 operand(s) required, 0 available\nnext\n"
    );
    assert_eq!(interp.unguarded_errors(), 1);
}

#[test]
fn caught_errors_do_not_fail_the_run() {
    let (status, _, _) = run_code(&["{ pop } stopped pop"]);
    assert_eq!(status, 0);
}

#[test]
fn scripts_may_set_the_exit_code() {
    let (status, _, _) = run_code(&["statusdict /exitcode 3 put"]);
    assert_eq!(status, 3);
}

#[test]
fn script_files_are_read_line_by_line() {
    let path = std::env::temp_dir().join(format!("slic-script-{}.sli", std::process::id()));
    std::fs::write(&path, "/a 41 def\n{ a\n1 add } exec =\n").expect("write script");
    let config = Config {
        inputs: vec![Input::File(path.clone())],
        ..Config::default()
    };
    let (mut interp, out) = session(&config);
    let status = execute(&config, &mut interp).expect("execute");
    std::fs::remove_file(&path).expect("remove script");
    assert_eq!(status, 0);
    assert_eq!(out.get_output(), "42\n");
}

#[test]
fn missing_scripts_are_driver_errors() {
    let path = PathBuf::from("/nonexistent/sli/missing.sli");
    let config = Config {
        inputs: vec![Input::File(path.clone())],
        ..Config::default()
    };
    let (mut interp, _) = session(&config);
    let err = execute(&config, &mut interp).map(|_| ());
    assert!(matches!(&err, Err(DriverError::Open { path: p, .. }) if *p == path));
    let message = err.map_err(|e| e.to_string()).expect_err("open error");
    assert!(message.starts_with("cannot open `/nonexistent/sli/missing.sli`: "));
    assert_eq!(run(&config), 127);
}

// Configuration

#[test]
fn guard_limits_the_whole_run() {
    let config = Config {
        cycle_guard: Some(10),
        verbosity: sli_eval::message::M_QUIET,
        ..code(&["{ 1 pop } loop"])
    };
    let (mut interp, out) = session(&config);
    assert_eq!(execute(&config, &mut interp).expect("execute"), 126);
    assert_eq!(
        interp.error_record().errorname.as_deref(),
        Some("CycleGuard")
    );
    assert_eq!(out.get_output(), "");
}

#[test]
fn debug_flag_reaches_the_interpreter() {
    let config = Config {
        debug: true,
        ..Config::default()
    };
    let (interp, _) = session(&config);
    assert!(interp.debug_mode());
    assert_eq!(interp.verbosity(), M_ALL);
}

#[test]
fn arguments_are_published() {
    let args: Vec<String> = ["-c", "statusdict /argv get ==", "--", "extra"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let Ok(Command::Run(config)) = parse_args(&args, None) else {
        panic!("expected a run configuration");
    };
    let (mut interp, out) = session(&config);
    assert_eq!(execute(&config, &mut interp).expect("execute"), 0);
    assert_eq!(
        out.get_output(),
        "[(-c) (statusdict /argv get ==) (--) (extra)]\n"
    );
}

// Interactive loop

#[test]
fn unfinished_lines_are_continued() {
    let (outcome, _, prompts, output) = interactive("1 2 add\n{ 10\nmul } exec =\n");
    assert_eq!(outcome, ExecOutcome::Completed);
    assert_eq!(prompts, "SLI ] SLI ] SLI + SLI ] ");
    assert_eq!(output, "30\n");
}

#[test]
fn callback_runs_before_each_prompt() {
    let (_, _, prompts, output) = interactive("{ (tick) = } setcallback\n1\n");
    assert_eq!(prompts, "SLI ] SLI ] SLI ] ");
    assert_eq!(output, "tick\ntick\n");
}

#[test]
fn quit_leaves_the_loop() {
    let (outcome, _, prompts, output) = interactive("3 quit_i\n(never) =\n");
    assert_eq!(outcome, ExecOutcome::ExitRequested(3));
    assert_eq!(prompts, "SLI ] ");
    assert_eq!(output, "");
}

#[test]
fn errors_are_reported_and_the_loop_continues() {
    let (outcome, interp, _, output) = interactive("pop\n(ok) =\n");
    assert_eq!(outcome, ExecOutcome::Completed);
    assert_eq!(
        output,
        "Error: /StackUnderflow in pop\n    1 operand(s) required, 0 available\nok\n"
    );
    assert_eq!(interp.unguarded_errors(), 1);
}

#[test]
fn unfinished_input_at_end_is_a_syntax_error() {
    let (outcome, interp, prompts, _) = interactive("{ 1\n");
    assert_eq!(outcome, ExecOutcome::Completed);
    assert_eq!(prompts, "SLI ] SLI + ");
    assert_eq!(
        interp.error_record().errorname.as_deref(),
        Some("SyntaxError")
    );
}
