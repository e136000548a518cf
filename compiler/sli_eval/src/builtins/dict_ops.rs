//! Dictionaries and the dictionary stack.

use super::{count_value, dict_at, register_table};
use crate::dict::Dictionary;
use crate::errors::{self, SliResult};
use crate::interpreter::Interpreter;
use crate::value::{Name, Value};

pub(super) fn register(interp: &mut Interpreter) -> SliResult {
    register_table(
        interp,
        &[
            ("dict", dict),
            ("<<", mark),
            (">>", close_dict),
            ("begin", begin),
            ("end", end),
            ("def", def),
            ("Set", set),
            ("undef", undef),
            ("forget", forget),
            ("load", load),
            ("lookup", lookup),
            ("known", known),
            ("currentdict", currentdict),
            ("countdictstack", countdictstack),
            ("cleardictstack", cleardictstack),
            ("keys", keys),
            ("values", values),
            ("clonedict", clonedict),
            ("protect", protect),
            ("systemdict", systemdict),
            ("userdict", userdict),
            ("statusdict", statusdict),
            ("errordict", errordict),
        ],
    )
}

/// A literal name operand; executable names are accepted as keys too.
fn key_at(interp: &Interpreter, pos: usize) -> SliResult<Name> {
    interp.ostack.name_at(pos)
}

/// `- dict dict`
fn dict(interp: &mut Interpreter) -> SliResult {
    interp.ostack.push(Value::dict(Dictionary::new()));
    Ok(())
}

fn mark(interp: &mut Interpreter) -> SliResult {
    interp.ostack.push(Value::Mark);
    Ok(())
}

/// `<< /k1 v1 ... /kn vn >> dict`
fn close_dict(interp: &mut Interpreter) -> SliResult {
    let n = interp
        .ostack
        .count_to_mark()
        .ok_or_else(errors::unmatched_marker)?;
    if n % 2 != 0 {
        return Err(errors::range_check("<< >> needs key/value pairs"));
    }
    for pos in (1..n).step_by(2) {
        key_at(interp, pos)?;
    }
    let items = interp.ostack.take_to_mark()?;
    let mut dict = Dictionary::with_capacity(n / 2);
    for pair in items.chunks_exact(2) {
        if let (Some(key), Some(value)) = (pair[0].as_name(), pair.get(1)) {
            dict.insert(key, value.clone(), &*interp.interner)?;
        }
    }
    interp.ostack.push(Value::dict(dict));
    Ok(())
}

/// `dict begin -`: open a scope.
fn begin(interp: &mut Interpreter) -> SliResult {
    let dict = dict_at(interp, 0)?;
    interp.ostack.pop()?;
    interp.dstack.push_scope(dict);
    Ok(())
}

/// Close the innermost scope opened by `begin`.
fn end(interp: &mut Interpreter) -> SliResult {
    interp.dstack.pop_scope().map(drop)
}

/// `/name value def -`: bind in the current scope.
fn def(interp: &mut Interpreter) -> SliResult {
    let name = key_at(interp, 1)?;
    let value = interp.ostack.pick(0)?.clone();
    interp.dstack.define(name, value, &*interp.interner)?;
    interp.ostack.drop_n(2)
}

/// `value /name Set -`
fn set(interp: &mut Interpreter) -> SliResult {
    let name = key_at(interp, 0)?;
    let value = interp.ostack.pick(1)?.clone();
    interp.dstack.define(name, value, &*interp.interner)?;
    interp.ostack.drop_n(2)
}

/// `dict /key undef -`
fn undef(interp: &mut Interpreter) -> SliResult {
    let key = key_at(interp, 0)?;
    let dict = dict_at(interp, 1)?;
    dict.borrow_mut().remove(key, &*interp.interner)?;
    interp.ostack.drop_n(2)
}

/// `/name forget -`: remove from the current scope only.
fn forget(interp: &mut Interpreter) -> SliResult {
    let name = key_at(interp, 0)?;
    interp.dstack.undefine(name, &*interp.interner)?;
    interp.ostack.pop().map(drop)
}

/// `/name load value`
fn load(interp: &mut Interpreter) -> SliResult {
    let name = key_at(interp, 0)?;
    let value = interp
        .dstack
        .lookup(name)
        .ok_or_else(|| errors::undefined_name(interp.spell(name)))?;
    interp.ostack.set(0, value)
}

/// `/name lookup value true | false`
fn lookup(interp: &mut Interpreter) -> SliResult {
    let name = key_at(interp, 0)?;
    interp.ostack.pop()?;
    match interp.dstack.lookup(name) {
        Some(value) => {
            interp.ostack.push(value);
            interp.ostack.push(Value::Bool(true));
        }
        None => interp.ostack.push(Value::Bool(false)),
    }
    Ok(())
}

/// `dict /key known bool`
fn known(interp: &mut Interpreter) -> SliResult {
    let key = key_at(interp, 0)?;
    let dict = dict_at(interp, 1)?;
    let present = dict.borrow().contains(key);
    interp.ostack.drop_n(2)?;
    interp.ostack.push(Value::Bool(present));
    Ok(())
}

fn currentdict(interp: &mut Interpreter) -> SliResult {
    let dict = interp.dstack.current().clone();
    interp.ostack.push(Value::Dict(dict));
    Ok(())
}

fn countdictstack(interp: &mut Interpreter) -> SliResult {
    let depth = count_value(interp.dstack.depth())?;
    interp.ostack.push(depth);
    Ok(())
}

/// Pop every scope opened by `begin`.
fn cleardictstack(interp: &mut Interpreter) -> SliResult {
    interp.dstack.reset();
    Ok(())
}

/// `dict keys array`: literal names in spelling order.
fn keys(interp: &mut Interpreter) -> SliResult {
    let dict = dict_at(interp, 0)?;
    let keys = dict
        .borrow()
        .sorted_entries(&*interp.interner)
        .into_iter()
        .map(|(key, _)| Value::LiteralName(key))
        .collect();
    interp.ostack.set(0, Value::array(keys))
}

/// `dict values array`: values in key spelling order.
fn values(interp: &mut Interpreter) -> SliResult {
    let dict = dict_at(interp, 0)?;
    let values = dict
        .borrow()
        .sorted_entries(&*interp.interner)
        .into_iter()
        .map(|(_, value)| value)
        .collect();
    interp.ostack.set(0, Value::array(values))
}

/// `dict clonedict copy`: an unprotected private copy.
fn clonedict(interp: &mut Interpreter) -> SliResult {
    let dict = dict_at(interp, 0)?;
    let copy = dict.borrow().private_copy();
    interp.ostack.set(0, Value::dict(copy))
}

/// `dict protect -`: refuse further writes.
fn protect(interp: &mut Interpreter) -> SliResult {
    let dict = dict_at(interp, 0)?;
    dict.borrow_mut().protect();
    interp.ostack.pop().map(drop)
}

fn systemdict(interp: &mut Interpreter) -> SliResult {
    let dict = interp.systemdict.clone();
    interp.ostack.push(Value::Dict(dict));
    Ok(())
}

fn userdict(interp: &mut Interpreter) -> SliResult {
    let dict = interp.userdict.clone();
    interp.ostack.push(Value::Dict(dict));
    Ok(())
}

fn statusdict(interp: &mut Interpreter) -> SliResult {
    let dict = interp.statusdict.clone();
    interp.ostack.push(Value::Dict(dict));
    Ok(())
}

fn errordict(interp: &mut Interpreter) -> SliResult {
    let dict = interp.errordict.clone();
    interp.ostack.push(Value::Dict(dict));
    Ok(())
}
