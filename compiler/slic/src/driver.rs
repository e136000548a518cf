//! Top-level evaluation of scripts, command strings and the interactive loop.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::path::PathBuf;

use sli_eval::message::M_FATAL;
use sli_eval::{needs_more_input, ExecOutcome, Interpreter, InterpreterBuilder, ReaderSource};
use tracing::debug;

use crate::cli::{Config, Input};

/// Shown when the interpreter is ready for a new command.
pub const PROMPT: &str = "SLI ] ";
/// Shown while an unfinished procedure, string or comment is pending.
pub const CONTINUATION: &str = "SLI + ";

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("cannot open `{}`: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("cannot read input: {0}")]
    Io(#[from] io::Error),
}

/// Interpreter settings derived from the command line.
pub fn interpreter_builder(config: &Config) -> InterpreterBuilder {
    let builder = Interpreter::builder()
        .verbosity(config.verbosity)
        .debug(config.debug)
        .catch_errors(config.catch_errors)
        .record_stacks(config.record_stacks)
        .argv(config.argv.clone());
    match config.cycle_guard {
        Some(cycles) => builder.cycle_guard(cycles),
        None => builder,
    }
}

/// Run everything `config` asks for and return the process exit code.
pub fn run(config: &Config) -> i32 {
    let mut interp = interpreter_builder(config).build();
    match execute(config, &mut interp) {
        Ok(code) => code,
        Err(err) => {
            interp.message(M_FATAL, "sli", &err.to_string());
            interp.exit_code_for("fatal").unwrap_or(127)
        }
    }
}

/// Evaluate the configured inputs on `interp`.
///
/// Inputs run in order; a `quit` ends the run at once. An error that no
/// `stopped` caught abandons the current input, and the run then exits with
/// `exitcodes/scripterror`. Otherwise the exit code is
/// `statusdict/exitcode`.
pub fn execute(config: &Config, interp: &mut Interpreter) -> Result<i32, DriverError> {
    debug!(inputs = config.inputs.len(), debug_mode = config.debug, "starting");
    let errors_before = interp.unguarded_errors();

    if config.inputs.is_empty() {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            let outcome = repl(interp, stdin.lock(), &mut io::stdout())?;
            return Ok(match outcome {
                ExecOutcome::ExitRequested(code) => code,
                ExecOutcome::Completed => interp.exit_code(),
            });
        }
        let outcome = interp.execute_source(Box::new(ReaderSource::new(stdin.lock(), "stdin")));
        return Ok(exit_status(interp, outcome, errors_before));
    }

    for input in &config.inputs {
        let outcome = match input {
            Input::Code(code) => interp.execute_str(code),
            Input::Stdin => {
                interp.execute_source(Box::new(ReaderSource::new(io::stdin().lock(), "stdin")))
            }
            Input::File(path) => {
                let file = File::open(path).map_err(|source| DriverError::Open {
                    path: path.clone(),
                    source,
                })?;
                let label = path.display().to_string();
                interp.execute_source(Box::new(ReaderSource::new(BufReader::new(file), label)))
            }
        };
        if let ExecOutcome::ExitRequested(code) = outcome {
            return Ok(code);
        }
    }
    Ok(exit_status(interp, ExecOutcome::Completed, errors_before))
}

fn exit_status(interp: &Interpreter, outcome: ExecOutcome, errors_before: usize) -> i32 {
    match outcome {
        ExecOutcome::ExitRequested(code) => code,
        ExecOutcome::Completed if interp.unguarded_errors() > errors_before => {
            interp.exit_code_for("scripterror").unwrap_or(126)
        }
        ExecOutcome::Completed => interp.exit_code(),
    }
}

/// Interactive read-eval loop.
///
/// Lines accumulate until they form complete input, then run as one piece.
/// The installed callback runs before every fresh prompt. Errors are
/// reported and the loop carries on; it ends at end of input or on `quit`.
pub fn repl<R: BufRead, W: Write>(
    interp: &mut Interpreter,
    mut input: R,
    prompt: &mut W,
) -> io::Result<ExecOutcome> {
    let mut pending = String::new();
    loop {
        if pending.is_empty() {
            if let exit @ ExecOutcome::ExitRequested(_) = interp.run_callback() {
                return Ok(exit);
            }
            write!(prompt, "{PROMPT}")?;
        } else {
            write!(prompt, "{CONTINUATION}")?;
        }
        prompt.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            // Let the front end report whatever is left unfinished.
            if !pending.is_empty() {
                return Ok(interp.execute_str(&pending));
            }
            return Ok(ExecOutcome::Completed);
        }
        pending.push_str(&line);
        if needs_more_input(&pending) {
            continue;
        }

        let text = std::mem::take(&mut pending);
        if let exit @ ExecOutcome::ExitRequested(_) = interp.execute_str(&text) {
            return Ok(exit);
        }
    }
}

#[cfg(test)]
mod tests;
