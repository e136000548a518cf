//! Arrays, strings, conversions and type queries.
//!
//! Strings, arrays and procedures have value semantics: `put` and `append`
//! return the modified container and never change a copy held elsewhere.
//! Dictionaries are aliased, so `put` on a dictionary returns nothing.

use super::{count_value, dict_at, register_table};
use crate::errors::{self, SliResult};
use crate::interpreter::Interpreter;
use crate::source::{StreamHandle, StringSource};
use crate::value::{RangeIter, Render, TypeTag, Value};

use TypeTag::{Any, Array, Dictionary, Integer, Iterator as Iter, Literal, Procedure, String as Str};

pub(super) fn register(interp: &mut Interpreter) -> SliResult {
    register_table(
        interp,
        &[
            ("[", open_array),
            ("]", close_array),
            ("array", array),
            ("cvs", cvs),
            ("cvi", cvi),
            ("cvd", cvd),
            ("cvn", cvn),
            ("cvlit", cvlit),
            ("cvx", cvx),
            ("xcheck", xcheck),
            ("type", type_),
            ("Range", range),
        ],
    )?;

    interp.register_variant("length", &[Array], "length_a", length)?;
    interp.register_variant("length", &[Procedure], "length_p", length)?;
    interp.register_variant("length", &[Str], "length_s", length)?;
    interp.register_variant("length", &[Dictionary], "length_d", length)?;
    interp.register_variant("length", &[Iter], "length_iter", length)?;

    interp.register_variant("get", &[Array, Integer], "get_a", get_a)?;
    interp.register_variant("get", &[Procedure, Integer], "get_p", get_a)?;
    interp.register_variant("get", &[Str, Integer], "get_s", get_s)?;
    interp.register_variant("get", &[Dictionary, Literal], "get_d", get_d)?;

    interp.register_variant("put", &[Array, Integer, Any], "put_a", put_a)?;
    interp.register_variant("put", &[Procedure, Integer, Any], "put_p", put_a)?;
    interp.register_variant("put", &[Str, Integer, Integer], "put_s", put_s)?;
    interp.register_variant("put", &[Dictionary, Literal, Any], "put_d", put_d)?;

    interp.register_variant("append", &[Array, Any], "append_a", append_a)?;
    interp.register_variant("append", &[Procedure, Any], "append_p", append_a)?;
    interp.register_variant("append", &[Str, Integer], "append_s", append_s)?;

    interp.register_variant("cva", &[Array], "cva_a", cva)?;
    interp.register_variant("cva", &[Procedure], "cva_p", cva)?;
    interp.register_variant("cva", &[Dictionary], "cva_d", cva)?;
    interp.register_variant("cva", &[Iter], "cva_iter", cva)?;
    Ok(())
}

#[cold]
fn index_error(index: usize, len: usize) -> errors::SliError {
    errors::range_check(format!("index {index} out of range for length {len}"))
}

/// Length of the array or procedure at `pos`.
fn sequence_len(interp: &Interpreter, pos: usize) -> SliResult<usize> {
    match interp.ostack.pick(pos)? {
        Value::Array(items) | Value::Procedure(items) => Ok(items.len()),
        other => Err(errors::argument_type(pos + 1, "an array", other.type_tag())),
    }
}

fn open_array(interp: &mut Interpreter) -> SliResult {
    interp.ostack.push(Value::Mark);
    Ok(())
}

/// `[ any ... ] array`
fn close_array(interp: &mut Interpreter) -> SliResult {
    let items = interp.ostack.take_to_mark()?;
    interp.ostack.push(Value::array(items));
    Ok(())
}

/// `n array array`: `n` zeros.
fn array(interp: &mut Interpreter) -> SliResult {
    let n = interp.ostack.count_at(0)?;
    let mut items = Vec::new();
    items
        .try_reserve_exact(n)
        .map_err(|_| errors::range_check(format!("cannot allocate an array of {n} elements")))?;
    items.resize(n, Value::Integer(0));
    interp.ostack.set(0, Value::array(items))
}

fn length(interp: &mut Interpreter) -> SliResult {
    let len = match interp.ostack.pick(0)? {
        Value::Array(items) | Value::Procedure(items) => items.len(),
        Value::String(text) => text.len(),
        Value::Dict(dict) => dict.borrow().len(),
        Value::Iterator(range) => range.len(),
        other => {
            return Err(errors::argument_type(1, "a container", other.type_tag()));
        }
    };
    interp.ostack.set(0, count_value(len)?)
}

/// `array index get any`
fn get_a(interp: &mut Interpreter) -> SliResult {
    let index = interp.ostack.count_at(0)?;
    let item = match interp.ostack.pick(1)? {
        Value::Array(items) | Value::Procedure(items) => items
            .get(index)
            .cloned()
            .ok_or_else(|| index_error(index, items.len()))?,
        other => return Err(errors::argument_type(2, "an array", other.type_tag())),
    };
    interp.ostack.drop_n(2)?;
    interp.ostack.push(item);
    Ok(())
}

/// `string index get byte`
fn get_s(interp: &mut Interpreter) -> SliResult {
    let index = interp.ostack.count_at(0)?;
    let text = interp.ostack.expect_at(1, Str)?;
    let bytes = text.as_str().unwrap_or_default().as_bytes();
    let byte = *bytes
        .get(index)
        .ok_or_else(|| index_error(index, bytes.len()))?;
    interp.ostack.drop_n(2)?;
    interp.ostack.push(Value::Integer(i64::from(byte)));
    Ok(())
}

/// `dict /key get any`
fn get_d(interp: &mut Interpreter) -> SliResult {
    let key = interp.ostack.name_at(0)?;
    let dict = dict_at(interp, 1)?;
    let value = dict
        .borrow()
        .get(key)
        .cloned()
        .ok_or_else(|| errors::undefined_name(interp.spell(key)))?;
    interp.ostack.drop_n(2)?;
    interp.ostack.push(value);
    Ok(())
}

/// `array index any put array`
fn put_a(interp: &mut Interpreter) -> SliResult {
    let index = interp.ostack.count_at(1)?;
    let len = sequence_len(interp, 2)?;
    if index >= len {
        return Err(index_error(index, len));
    }
    let value = interp.ostack.pop()?;
    interp.ostack.pop()?;
    let mut container = interp.ostack.pop()?;
    if let Value::Array(items) | Value::Procedure(items) = &mut container {
        items.make_mut()[index] = value;
    }
    interp.ostack.push(container);
    Ok(())
}

/// `string index byte put string`
fn put_s(interp: &mut Interpreter) -> SliResult {
    let byte = interp.ostack.int_at(0)?;
    let byte = u8::try_from(byte).map_err(|_| errors::range_check(format!("{byte} is not a byte")))?;
    let index = interp.ostack.count_at(1)?;
    let text = interp.ostack.expect_at(2, Str)?;
    let mut bytes = text.as_str().unwrap_or_default().as_bytes().to_vec();
    let len = bytes.len();
    let slot = bytes.get_mut(index).ok_or_else(|| index_error(index, len))?;
    *slot = byte;
    let updated = String::from_utf8(bytes)
        .map_err(|_| errors::range_check("put would leave an invalid UTF-8 string"))?;
    interp.ostack.drop_n(3)?;
    interp.ostack.push(Value::string(updated));
    Ok(())
}

/// `dict /key any put -`
fn put_d(interp: &mut Interpreter) -> SliResult {
    let key = interp.ostack.name_at(1)?;
    let dict = dict_at(interp, 2)?;
    let value = interp.ostack.pick(0)?.clone();
    dict.borrow_mut().insert(key, value, &*interp.interner)?;
    interp.ostack.drop_n(3)
}

/// `array any append array`
fn append_a(interp: &mut Interpreter) -> SliResult {
    sequence_len(interp, 1)?;
    let value = interp.ostack.pop()?;
    let mut container = interp.ostack.pop()?;
    if let Value::Array(items) | Value::Procedure(items) = &mut container {
        items.make_mut().push(value);
    }
    interp.ostack.push(container);
    Ok(())
}

/// `string code append string`: append one character.
fn append_s(interp: &mut Interpreter) -> SliResult {
    let code = interp.ostack.int_at(0)?;
    let c = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| errors::range_check(format!("{code} is not a character code")))?;
    let text = interp.ostack.expect_at(1, Str)?;
    let mut updated = text.as_str().unwrap_or_default().to_string();
    updated.push(c);
    interp.ostack.drop_n(2)?;
    interp.ostack.push(Value::string(updated));
    Ok(())
}

/// `container cva array`. Dictionaries become `[/key value ...]`.
fn cva(interp: &mut Interpreter) -> SliResult {
    let converted = match interp.ostack.pick(0)? {
        Value::Array(items) | Value::Procedure(items) => Value::Array(items.clone()),
        Value::Dict(dict) => Value::array(
            dict.borrow()
                .sorted_entries(&*interp.interner)
                .into_iter()
                .flat_map(|(key, value)| [Value::LiteralName(key), value])
                .collect(),
        ),
        Value::Iterator(range) => Value::array(range.iter().map(Value::Integer).collect()),
        other => {
            return Err(errors::argument_type(
                1,
                "an array, dictionary or iterator",
                other.type_tag(),
            ))
        }
    };
    interp.ostack.set(0, converted)
}

/// `any cvs string`: the `=` rendering.
fn cvs(interp: &mut Interpreter) -> SliResult {
    let text = interp
        .ostack
        .pick(0)?
        .display(&*interp.interner, Render::Plain)
        .to_string();
    interp.ostack.set(0, Value::string(text))
}

/// `any cvi integer`: doubles truncate towards zero, strings are parsed.
fn cvi(interp: &mut Interpreter) -> SliResult {
    let converted = match interp.ostack.pick(0)? {
        Value::Integer(n) => *n,
        Value::Double(d) => double_to_int(*d)?,
        Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| errors::range_check(format!("({}) is not an integer", text.as_str())))?,
        other => {
            return Err(errors::argument_type(1, "a number or string", other.type_tag()));
        }
    };
    interp.ostack.set(0, Value::Integer(converted))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is truncated and range-checked first"
)]
fn double_to_int(d: f64) -> SliResult<i64> {
    let truncated = d.trunc();
    let limit = 9.223_372_036_854_776e18;
    if !truncated.is_finite() || truncated < -limit || truncated >= limit {
        return Err(errors::range_check(format!("{d} does not fit in an integer")));
    }
    Ok(truncated as i64)
}

/// `any cvd double`
fn cvd(interp: &mut Interpreter) -> SliResult {
    let converted = match interp.ostack.pick(0)? {
        Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| errors::range_check(format!("({}) is not a number", text.as_str())))?,
        other => other
            .as_number()
            .ok_or_else(|| errors::argument_type(1, "a number or string", other.type_tag()))?,
    };
    interp.ostack.set(0, Value::Double(converted))
}

/// `string cvn literal`
fn cvn(interp: &mut Interpreter) -> SliResult {
    let name = match interp.ostack.pick(0)? {
        Value::String(text) => interp.interner.intern(text),
        Value::Name(name) | Value::LiteralName(name) => *name,
        other => return Err(errors::argument_type(1, "a string", other.type_tag())),
    };
    interp.ostack.set(0, Value::LiteralName(name))
}

fn cvlit(interp: &mut Interpreter) -> SliResult {
    let literal = interp.ostack.pick(0)?.to_literal();
    interp.ostack.set(0, literal)
}

/// `any cvx any`. A string becomes an executable stream over its text.
fn cvx(interp: &mut Interpreter) -> SliResult {
    let executable = match interp.ostack.pick(0)? {
        Value::String(text) => {
            let source = StringSource::new(text.as_str()).with_label("cvx");
            Value::Stream(StreamHandle::new(Box::new(source), true))
        }
        other => other.to_executable(),
    };
    interp.ostack.set(0, executable)
}

fn xcheck(interp: &mut Interpreter) -> SliResult {
    let executable = interp.ostack.pick(0)?.is_executable();
    interp.ostack.set(0, Value::Bool(executable))
}

/// `any type literal`: `/integertype`, `/arraytype`, ...
fn type_(interp: &mut Interpreter) -> SliResult {
    let tag = interp.ostack.pick(0)?.type_tag();
    let name = interp.interner.intern(tag.name());
    interp.ostack.set(0, Value::LiteralName(name))
}

/// `[n] Range`, `[start stop] Range` or `[start stop step] Range`.
///
/// Bounds are inclusive; `[n]` counts from 1.
fn range(interp: &mut Interpreter) -> SliResult {
    let bounds = match interp.ostack.pick(0)? {
        Value::Array(items) => items
            .iter()
            .map(|v| {
                v.as_int()
                    .ok_or_else(|| errors::argument_type(1, "an array of integers", v.type_tag()))
            })
            .collect::<SliResult<Vec<i64>>>()?,
        other => return Err(errors::argument_type(1, "an array", other.type_tag())),
    };
    let range = match bounds[..] {
        [n] => RangeIter::new(1, n, 1),
        [start, stop] => RangeIter::new(start, stop, 1),
        [start, stop, step] => RangeIter::new(start, stop, step),
        _ => {
            return Err(errors::range_check(
                "Range expects [n], [start stop] or [start stop step]",
            ))
        }
    }
    .ok_or_else(|| errors::range_check("Range step must not be zero"))?;
    interp.ostack.set(0, Value::Iterator(range))
}
