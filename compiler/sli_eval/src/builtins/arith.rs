//! Arithmetic, comparison and logic.
//!
//! Each operator is a dispatch trie. Mixed integer/double operands are
//! accepted only where a variant is registered for that exact combination;
//! there is no implicit promotion.

use crate::errors::{self, SliResult};
use crate::interpreter::Interpreter;
use crate::value::{NativeFn, TypeTag, Value};

use TypeTag::{Any, Bool, Double, Integer, String as Str};

pub(super) fn register(interp: &mut Interpreter) -> SliResult {
    let binary: [(&str, NativeFn, NativeFn); 4] = [
        ("add", add_ii, add_d),
        ("sub", sub_ii, sub_d),
        ("mul", mul_ii, mul_d),
        ("div", div_ii, div_d),
    ];
    for (name, ii, mixed) in binary {
        interp.register_variant(name, &[Integer, Integer], &format!("{name}_ii"), ii)?;
        interp.register_variant(name, &[Double, Double], &format!("{name}_dd"), mixed)?;
        interp.register_variant(name, &[Integer, Double], &format!("{name}_id"), mixed)?;
        interp.register_variant(name, &[Double, Integer], &format!("{name}_di"), mixed)?;
    }
    interp.register_variant("mod", &[Integer, Integer], "mod_ii", mod_ii)?;

    interp.register_variant("neg", &[Integer], "neg_i", neg_i)?;
    interp.register_variant("neg", &[Double], "neg_d", neg_d)?;
    interp.register_variant("abs", &[Integer], "abs_i", abs_i)?;
    interp.register_variant("abs", &[Double], "abs_d", abs_d)?;
    interp.register_variant("inc", &[Integer], "inc_i", inc_i)?;
    interp.register_variant("inc", &[Double], "inc_d", inc_d)?;
    interp.register_variant("dec", &[Integer], "dec_i", dec_i)?;
    interp.register_variant("dec", &[Double], "dec_d", dec_d)?;

    interp.register_variant("eq", &[Any, Any], "eq_aa", eq)?;
    interp.register_variant("neq", &[Any, Any], "neq_aa", neq)?;

    let ordering: [(&str, NativeFn, NativeFn, NativeFn); 4] = [
        ("gt", gt_ii, gt_d, gt_ss),
        ("lt", lt_ii, lt_d, lt_ss),
        ("geq", geq_ii, geq_d, geq_ss),
        ("leq", leq_ii, leq_d, leq_ss),
    ];
    for (name, ii, mixed, ss) in ordering {
        interp.register_variant(name, &[Integer, Integer], &format!("{name}_ii"), ii)?;
        interp.register_variant(name, &[Double, Double], &format!("{name}_dd"), mixed)?;
        interp.register_variant(name, &[Integer, Double], &format!("{name}_id"), mixed)?;
        interp.register_variant(name, &[Double, Integer], &format!("{name}_di"), mixed)?;
        interp.register_variant(name, &[Str, Str], &format!("{name}_ss"), ss)?;
    }

    interp.register_variant("and", &[Bool, Bool], "and_bb", and_bb)?;
    interp.register_variant("and", &[Integer, Integer], "and_ii", and_ii)?;
    interp.register_variant("or", &[Bool, Bool], "or_bb", or_bb)?;
    interp.register_variant("or", &[Integer, Integer], "or_ii", or_ii)?;
    interp.register_variant("xor", &[Bool, Bool], "xor_bb", xor_bb)?;
    interp.register_variant("xor", &[Integer, Integer], "xor_ii", xor_ii)?;
    interp.register_variant("not", &[Bool], "not_b", not_b)?;
    interp.register_variant("not", &[Integer], "not_i", not_i)?;
    Ok(())
}

// Shared operand plumbing

/// Replace the top two integers with `op(a, b)`.
fn int_binary(
    interp: &mut Interpreter,
    name: &str,
    op: impl FnOnce(i64, i64) -> Option<i64>,
) -> SliResult {
    let b = interp.ostack.int_at(0)?;
    let a = interp.ostack.int_at(1)?;
    let result = op(a, b).ok_or_else(|| errors::integer_overflow(name))?;
    interp.ostack.drop_n(2)?;
    interp.ostack.push(Value::Integer(result));
    Ok(())
}

/// Replace the top two numbers with the double `op(a, b)`.
fn double_binary(interp: &mut Interpreter, op: impl FnOnce(f64, f64) -> f64) -> SliResult {
    let b = interp.ostack.number_at(0)?;
    let a = interp.ostack.number_at(1)?;
    interp.ostack.drop_n(2)?;
    interp.ostack.push(Value::Double(op(a, b)));
    Ok(())
}

fn int_unary(interp: &mut Interpreter, name: &str, op: impl FnOnce(i64) -> Option<i64>) -> SliResult {
    let a = interp.ostack.int_at(0)?;
    let result = op(a).ok_or_else(|| errors::integer_overflow(name))?;
    interp.ostack.set(0, Value::Integer(result))
}

fn double_unary(interp: &mut Interpreter, op: impl FnOnce(f64) -> f64) -> SliResult {
    let a = interp.ostack.number_at(0)?;
    interp.ostack.set(0, Value::Double(op(a)))
}

/// Replace the top two operands with a boolean.
fn push_comparison(interp: &mut Interpreter, result: bool) -> SliResult {
    interp.ostack.drop_n(2)?;
    interp.ostack.push(Value::Bool(result));
    Ok(())
}

fn string_pair(interp: &Interpreter) -> SliResult<(String, String)> {
    let b = interp.ostack.expect_at(0, Str)?;
    let a = interp.ostack.expect_at(1, Str)?;
    Ok((
        a.as_str().unwrap_or_default().to_string(),
        b.as_str().unwrap_or_default().to_string(),
    ))
}

// Arithmetic

fn add_ii(interp: &mut Interpreter) -> SliResult {
    int_binary(interp, "add", i64::checked_add)
}

fn add_d(interp: &mut Interpreter) -> SliResult {
    double_binary(interp, |a, b| a + b)
}

fn sub_ii(interp: &mut Interpreter) -> SliResult {
    int_binary(interp, "sub", i64::checked_sub)
}

fn sub_d(interp: &mut Interpreter) -> SliResult {
    double_binary(interp, |a, b| a - b)
}

fn mul_ii(interp: &mut Interpreter) -> SliResult {
    int_binary(interp, "mul", i64::checked_mul)
}

fn mul_d(interp: &mut Interpreter) -> SliResult {
    double_binary(interp, |a, b| a * b)
}

/// Integer division truncates towards zero.
fn div_ii(interp: &mut Interpreter) -> SliResult {
    if interp.ostack.int_at(0)? == 0 {
        return Err(errors::division_by_zero());
    }
    int_binary(interp, "div", i64::checked_div)
}

fn div_d(interp: &mut Interpreter) -> SliResult {
    if interp.ostack.number_at(0)? == 0.0 {
        return Err(errors::division_by_zero());
    }
    double_binary(interp, |a, b| a / b)
}

fn mod_ii(interp: &mut Interpreter) -> SliResult {
    if interp.ostack.int_at(0)? == 0 {
        return Err(errors::division_by_zero());
    }
    int_binary(interp, "mod", i64::checked_rem)
}

fn neg_i(interp: &mut Interpreter) -> SliResult {
    int_unary(interp, "neg", i64::checked_neg)
}

fn neg_d(interp: &mut Interpreter) -> SliResult {
    double_unary(interp, |a| -a)
}

fn abs_i(interp: &mut Interpreter) -> SliResult {
    int_unary(interp, "abs", i64::checked_abs)
}

fn abs_d(interp: &mut Interpreter) -> SliResult {
    double_unary(interp, f64::abs)
}

fn inc_i(interp: &mut Interpreter) -> SliResult {
    int_unary(interp, "inc", |a| a.checked_add(1))
}

fn inc_d(interp: &mut Interpreter) -> SliResult {
    double_unary(interp, |a| a + 1.0)
}

fn dec_i(interp: &mut Interpreter) -> SliResult {
    int_unary(interp, "dec", |a| a.checked_sub(1))
}

fn dec_d(interp: &mut Interpreter) -> SliResult {
    double_unary(interp, |a| a - 1.0)
}

// Comparison

fn eq(interp: &mut Interpreter) -> SliResult {
    let equal = interp.ostack.pick(0)?.equals(interp.ostack.pick(1)?);
    push_comparison(interp, equal)
}

fn neq(interp: &mut Interpreter) -> SliResult {
    let equal = interp.ostack.pick(0)?.equals(interp.ostack.pick(1)?);
    push_comparison(interp, !equal)
}

macro_rules! ordering_variants {
    ($ii:ident, $d:ident, $ss:ident, $op:tt) => {
        fn $ii(interp: &mut Interpreter) -> SliResult {
            let b = interp.ostack.int_at(0)?;
            let a = interp.ostack.int_at(1)?;
            push_comparison(interp, a $op b)
        }

        fn $d(interp: &mut Interpreter) -> SliResult {
            let b = interp.ostack.number_at(0)?;
            let a = interp.ostack.number_at(1)?;
            push_comparison(interp, a $op b)
        }

        fn $ss(interp: &mut Interpreter) -> SliResult {
            let (a, b) = string_pair(interp)?;
            push_comparison(interp, a $op b)
        }
    };
}

ordering_variants!(gt_ii, gt_d, gt_ss, >);
ordering_variants!(lt_ii, lt_d, lt_ss, <);
ordering_variants!(geq_ii, geq_d, geq_ss, >=);
ordering_variants!(leq_ii, leq_d, leq_ss, <=);

// Logic

fn bool_binary(interp: &mut Interpreter, op: impl FnOnce(bool, bool) -> bool) -> SliResult {
    let b = interp.ostack.bool_at(0)?;
    let a = interp.ostack.bool_at(1)?;
    push_comparison(interp, op(a, b))
}

fn and_bb(interp: &mut Interpreter) -> SliResult {
    bool_binary(interp, |a, b| a && b)
}

fn or_bb(interp: &mut Interpreter) -> SliResult {
    bool_binary(interp, |a, b| a || b)
}

fn xor_bb(interp: &mut Interpreter) -> SliResult {
    bool_binary(interp, |a, b| a ^ b)
}

fn and_ii(interp: &mut Interpreter) -> SliResult {
    int_binary(interp, "and", |a, b| Some(a & b))
}

fn or_ii(interp: &mut Interpreter) -> SliResult {
    int_binary(interp, "or", |a, b| Some(a | b))
}

fn xor_ii(interp: &mut Interpreter) -> SliResult {
    int_binary(interp, "xor", |a, b| Some(a ^ b))
}

fn not_b(interp: &mut Interpreter) -> SliResult {
    let a = interp.ostack.bool_at(0)?;
    interp.ostack.set(0, Value::Bool(!a))
}

fn not_i(interp: &mut Interpreter) -> SliResult {
    int_unary(interp, "not", |a| Some(!a))
}
