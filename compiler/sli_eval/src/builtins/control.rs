//! Control primitives, the error protocol, guard and debugger switches.
//!
//! Iterating primitives only validate their operands and push a frame;
//! the loop in `interpreter::control` does the iterating.

use super::register_table;
use crate::errors::{self, SliResult};
use crate::exec_stack::{ForCounter, ForallSource, Frame};
use crate::interpreter::Interpreter;
use crate::value::{Heap, TypeTag, Value};

pub(super) fn register(interp: &mut Interpreter) -> SliResult {
    register_table(
        interp,
        &[
            ("exec", exec),
            ("if", if_),
            ("ifelse", ifelse),
            ("loop", loop_),
            ("repeat", repeat),
            ("for", for_),
            ("forall", forall),
            ("forallindexed", forallindexed),
            ("exit", exit),
            ("stop", stop),
            ("stopped", stopped),
            ("raiseerror", raiseerror),
            ("handleerror", handleerror),
            ("clear_error", clear_error),
            ("quit", quit),
            ("quit_i", quit_i),
            ("cycles", cycles),
            ("setguard", setguard),
            ("removeguard", removeguard),
            ("debugon", debugon),
            ("debugoff", debugoff),
            ("setmaxdepth", setmaxdepth),
            ("stepmode", stepmode),
            ("setcallback", setcallback),
            ("clearcallback", clearcallback),
        ],
    )
}

/// A procedure operand at `pos`, as its shared body.
fn procedure_at(interp: &Interpreter, pos: usize) -> SliResult<Heap<Vec<Value>>> {
    match interp.ostack.expect_at(pos, TypeTag::Procedure)? {
        Value::Procedure(body) => Ok(body),
        other => Err(errors::argument_type(pos + 1, "a procedure", other.type_tag())),
    }
}

/// `any exec -`: evaluate the operand.
fn exec(interp: &mut Interpreter) -> SliResult {
    let value = interp.ostack.pop()?;
    interp.estack.push_value(value);
    Ok(())
}

/// `bool proc if -`
fn if_(interp: &mut Interpreter) -> SliResult {
    interp.ostack.require(2)?;
    let condition = interp.ostack.bool_at(1)?;
    let proc = interp.ostack.pop()?;
    interp.ostack.pop()?;
    if condition {
        interp.estack.push_value(proc);
    }
    Ok(())
}

/// `bool then else ifelse -`
fn ifelse(interp: &mut Interpreter) -> SliResult {
    interp.ostack.require(3)?;
    let condition = interp.ostack.bool_at(2)?;
    let mut operands = interp.ostack.pop_n(3)?;
    let branch = if condition {
        operands.swap_remove(1)
    } else {
        operands.swap_remove(2)
    };
    interp.estack.push_value(branch);
    Ok(())
}

/// `proc loop -`: repeat until `exit` or `stop`.
fn loop_(interp: &mut Interpreter) -> SliResult {
    let proc = procedure_at(interp, 0)?;
    interp.ostack.pop()?;
    interp.estack.push_frame(Frame::Loop { proc, pos: 0 });
    Ok(())
}

/// `n proc repeat -`
fn repeat(interp: &mut Interpreter) -> SliResult {
    let proc = procedure_at(interp, 0)?;
    let n = interp.ostack.int_at(1)?;
    let remaining = u64::try_from(n).map_err(|_| errors::positive_integer_expected(n))?;
    interp.ostack.drop_n(2)?;
    if remaining > 0 {
        interp.estack.push_frame(Frame::Repeat {
            proc,
            pos: 0,
            remaining,
        });
    }
    Ok(())
}

/// `start step limit proc for -`: push each counter value, then run `proc`.
///
/// Integer operands count with integers; any double makes the counter a double.
fn for_(interp: &mut Interpreter) -> SliResult {
    let body = Value::Procedure(procedure_at(interp, 0)?);
    let bounds = [
        interp.ostack.pick(3)?.clone(),
        interp.ostack.pick(2)?.clone(),
        interp.ostack.pick(1)?.clone(),
    ];
    let counter = match &bounds {
        [Value::Integer(start), Value::Integer(step), Value::Integer(limit)] => {
            ForCounter::integer(*start, *step, *limit)
        }
        _ => {
            let start = interp.ostack.number_at(3)?;
            let step = interp.ostack.number_at(2)?;
            let limit = interp.ostack.number_at(1)?;
            ForCounter::double(start, step, limit)
        }
    };
    interp.ostack.drop_n(4)?;
    interp.estack.push_frame(Frame::For { body, counter });
    Ok(())
}

fn forall_frame(interp: &mut Interpreter, indexed: bool) -> SliResult {
    let body = Value::Procedure(procedure_at(interp, 0)?);
    let source = match interp.ostack.pick(1)? {
        Value::Array(items) | Value::Procedure(items) => ForallSource::Elements(items.clone()),
        Value::String(text) => ForallSource::Bytes(text.clone()),
        Value::Dict(dict) => ForallSource::Entries(dict.borrow().sorted_entries(&*interp.interner)),
        Value::Iterator(range) => ForallSource::Range(*range),
        other => {
            return Err(errors::argument_type(
                2,
                "an array, string, dictionary or iterator",
                other.type_tag(),
            ))
        }
    };
    interp.ostack.drop_n(2)?;
    interp.estack.push_frame(Frame::Forall {
        source,
        index: 0,
        body,
        indexed,
    });
    Ok(())
}

/// `container proc forall -`
fn forall(interp: &mut Interpreter) -> SliResult {
    forall_frame(interp, false)
}

/// `container proc forallindexed -`: pushes element and index.
fn forallindexed(interp: &mut Interpreter) -> SliResult {
    forall_frame(interp, true)
}

fn exit(interp: &mut Interpreter) -> SliResult {
    interp.exit_loop()
}

/// Unwind to the nearest `stopped`.
pub(crate) fn stop(interp: &mut Interpreter) -> SliResult {
    interp.unwind_to_stopped();
    Ok(())
}

/// `proc stopped bool`: true if `proc` was left through `stop`.
fn stopped(interp: &mut Interpreter) -> SliResult {
    let proc = interp.ostack.pop()?;
    interp.estack.push_frame(Frame::Stopped);
    interp.estack.push_value(proc);
    Ok(())
}

/// `/command /errorname raiseerror`
fn raiseerror(interp: &mut Interpreter) -> SliResult {
    let errorname = interp.ostack.name_at(0)?;
    let command = interp.ostack.name_at(1)?;
    interp.ostack.drop_n(2)?;
    interp.raise_named(command, errorname, None);
    Ok(())
}

/// Report the active error and mark it handled.
fn handleerror(interp: &mut Interpreter) -> SliResult {
    interp.report_error();
    Ok(())
}

/// Mark the active error handled without reporting it.
fn clear_error(interp: &mut Interpreter) -> SliResult {
    interp.set_newerror(false);
    Ok(())
}

/// Terminate with `statusdict/exitcode`.
fn quit(interp: &mut Interpreter) -> SliResult {
    let code = interp.exit_code();
    interp.terminate(code);
    Ok(())
}

/// `code quit_i -`
fn quit_i(interp: &mut Interpreter) -> SliResult {
    let code = interp.ostack.int_at(0)?;
    let code = i32::try_from(code).map_err(|_| errors::range_check("exit code out of range"))?;
    interp.ostack.pop()?;
    interp.terminate(code);
    Ok(())
}

/// Total cycles run by this interpreter.
fn cycles(interp: &mut Interpreter) -> SliResult {
    let n = i64::try_from(interp.guard.cycles())
        .map_err(|_| errors::range_check("cycle count too large"))?;
    interp.ostack.push(Value::Integer(n));
    Ok(())
}

/// `n setguard -`: allow `n` more cycles.
fn setguard(interp: &mut Interpreter) -> SliResult {
    let n = interp.ostack.int_at(0)?;
    let limit = u64::try_from(n).map_err(|_| errors::positive_integer_expected(n))?;
    interp.ostack.pop()?;
    interp.set_cycle_guard(limit);
    Ok(())
}

fn removeguard(interp: &mut Interpreter) -> SliResult {
    interp.remove_cycle_guard();
    Ok(())
}

fn debugon(interp: &mut Interpreter) -> SliResult {
    interp.set_debug_mode(true);
    Ok(())
}

fn debugoff(interp: &mut Interpreter) -> SliResult {
    interp.set_debug_mode(false);
    interp.debugger.stop_stepping();
    Ok(())
}

/// `n setmaxdepth -`: deepest call depth at which stepping prompts.
fn setmaxdepth(interp: &mut Interpreter) -> SliResult {
    let n = interp.ostack.count_at(0)?;
    interp.ostack.pop()?;
    interp.debugger.set_max_depth(n);
    Ok(())
}

/// Start prompting before each cycle; needs debug mode.
fn stepmode(interp: &mut Interpreter) -> SliResult {
    if !interp.debug_mode() {
        interp.message(
            crate::message::M_WARNING,
            "stepmode",
            "debug mode is off; use debugon first",
        );
    }
    interp.debugger.start_stepping();
    Ok(())
}

/// `proc setcallback -`: run `proc` before each top-level prompt.
fn setcallback(interp: &mut Interpreter) -> SliResult {
    let proc = Value::Procedure(procedure_at(interp, 0)?);
    interp.ostack.pop()?;
    interp.callback = Some(Value::callback(proc));
    Ok(())
}

fn clearcallback(interp: &mut Interpreter) -> SliResult {
    interp.callback = None;
    Ok(())
}
