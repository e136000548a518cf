//! Output, messages and verbosity.

use super::register_table;
use crate::errors::{self, SliResult};
use crate::interpreter::Interpreter;
use crate::message::LEVELS;
use crate::value::{Render, TypeTag, Value};

pub(super) fn register(interp: &mut Interpreter) -> SliResult {
    register_table(
        interp,
        &[
            ("=", print_plain),
            ("==", print_syntax),
            ("stack", stack),
            ("message", message),
            ("verbosity", verbosity),
            ("setverbosity", setverbosity),
        ],
    )?;
    interp.register_deprecated("pstack", stack, "pstack is deprecated; use stack")?;

    for (label, level) in LEVELS {
        interp.define_in_base(&format!("M_{label}"), Value::Integer(i64::from(level)))?;
    }
    interp.define_in_base("true", Value::Bool(true))?;
    interp.define_in_base("false", Value::Bool(false))
}

fn print_value(interp: &mut Interpreter, mode: Render) -> SliResult {
    let text = interp
        .ostack
        .pick(0)?
        .display(&*interp.interner, mode)
        .to_string();
    interp.ostack.pop()?;
    interp.print_handler.println(&text);
    Ok(())
}

/// `any = -`
fn print_plain(interp: &mut Interpreter) -> SliResult {
    print_value(interp, Render::Plain)
}

/// `any == -`
fn print_syntax(interp: &mut Interpreter) -> SliResult {
    print_value(interp, Render::Syntax)
}

/// Print the operand stack top first, without consuming it.
fn stack(interp: &mut Interpreter) -> SliResult {
    for value in interp.ostack.iter().rev() {
        let text = value.display(&*interp.interner, Render::Syntax).to_string();
        interp.print_handler.println(&text);
    }
    Ok(())
}

/// `level (from) (text) message -`
fn message(interp: &mut Interpreter) -> SliResult {
    let text = interp.ostack.expect_at(0, TypeTag::String)?;
    let from = interp.ostack.expect_at(1, TypeTag::String)?;
    let level = interp.ostack.int_at(2)?;
    let level = i32::try_from(level)
        .map_err(|_| errors::range_check(format!("{level} is not a message level")))?;
    interp.ostack.drop_n(3)?;
    interp.message(
        level,
        from.as_str().unwrap_or_default(),
        text.as_str().unwrap_or_default(),
    );
    Ok(())
}

/// `- verbosity level`
fn verbosity(interp: &mut Interpreter) -> SliResult {
    let level = interp.verbosity();
    interp.ostack.push(Value::Integer(i64::from(level)));
    Ok(())
}

/// `level setverbosity -`
fn setverbosity(interp: &mut Interpreter) -> SliResult {
    let level = interp.ostack.int_at(0)?;
    let level = i32::try_from(level)
        .map_err(|_| errors::range_check(format!("{level} is not a message level")))?;
    interp.ostack.pop()?;
    interp.set_verbosity(level);
    Ok(())
}
