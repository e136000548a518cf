//! Operand stack manipulation.

use super::{count_value, register_table};
use crate::errors::{self, SliResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

pub(super) fn register(interp: &mut Interpreter) -> SliResult {
    register_table(
        interp,
        &[
            ("pop", pop),
            ("dup", dup),
            ("exch", exch),
            ("over", over),
            ("rot", rot),
            ("index", index),
            ("roll", roll),
            ("copy", copy),
            ("clear", clear),
            ("count", count),
            ("mark", mark),
            ("counttomark", counttomark),
            ("cleartomark", cleartomark),
            ("npop", npop),
        ],
    )
}

/// `any pop -`
fn pop(interp: &mut Interpreter) -> SliResult {
    interp.ostack.pop().map(drop)
}

/// `any dup any any`
fn dup(interp: &mut Interpreter) -> SliResult {
    interp.ostack.index(0)
}

/// `a b exch b a`
fn exch(interp: &mut Interpreter) -> SliResult {
    interp.ostack.roll(2, 1)
}

/// `a b over a b a`
fn over(interp: &mut Interpreter) -> SliResult {
    interp.ostack.index(1)
}

/// `a b c rot c a b`
fn rot(interp: &mut Interpreter) -> SliResult {
    interp.ostack.roll(3, 1)
}

/// `... n index ... any`: copy the operand `n` below the count.
fn index(interp: &mut Interpreter) -> SliResult {
    let n = interp.ostack.count_at(0)?;
    interp.ostack.require(n + 2)?;
    interp.ostack.pop()?;
    interp.ostack.index(n)
}

/// `a1 ... an n k roll`: rotate the top `n` operands `k` steps upwards.
fn roll(interp: &mut Interpreter) -> SliResult {
    let k = interp.ostack.int_at(0)?;
    let n = interp.ostack.count_at(1)?;
    interp.ostack.require(n + 2)?;
    interp.ostack.drop_n(2)?;
    interp.ostack.roll(n, k)
}

/// `a1 ... an n copy a1 ... an a1 ... an`
fn copy(interp: &mut Interpreter) -> SliResult {
    let n = interp.ostack.count_at(0)?;
    interp.ostack.require(n + 1)?;
    interp.ostack.pop()?;
    interp.ostack.copy_top(n)
}

fn clear(interp: &mut Interpreter) -> SliResult {
    interp.ostack.clear();
    Ok(())
}

fn count(interp: &mut Interpreter) -> SliResult {
    let n = count_value(interp.ostack.len())?;
    interp.ostack.push(n);
    Ok(())
}

fn mark(interp: &mut Interpreter) -> SliResult {
    interp.ostack.push(Value::Mark);
    Ok(())
}

/// Number of operands above the nearest mark; the stack is not changed.
fn counttomark(interp: &mut Interpreter) -> SliResult {
    let n = interp
        .ostack
        .count_to_mark()
        .ok_or_else(errors::unmatched_marker)?;
    interp.ostack.push(count_value(n)?);
    Ok(())
}

fn cleartomark(interp: &mut Interpreter) -> SliResult {
    interp.ostack.take_to_mark().map(drop)
}

/// `a1 ... an n npop -`
fn npop(interp: &mut Interpreter) -> SliResult {
    let n = interp.ostack.count_at(0)?;
    interp.ostack.require(n + 1)?;
    interp.ostack.drop_n(n + 1)
}
