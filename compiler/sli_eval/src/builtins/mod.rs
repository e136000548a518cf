//! The primitive library bound in `systemdict`.
//!
//! Every handler has the shape `fn(&mut Interpreter) -> SliResult`. Handlers
//! read and type-check their operands in place and only consume them once
//! nothing can fail, so an error leaves the operand stack as the caller left
//! it. Overloaded operators are dispatch tries with one variant per accepted
//! type combination.

mod arith;
mod container;
pub(crate) mod control;
mod dict_ops;
mod io;
mod stack_ops;
mod trie_ops;

use crate::dict::SharedDict;
use crate::errors::{self, SliResult};
use crate::interpreter::Interpreter;
use crate::trie::SharedTrie;
use crate::value::{NativeFn, TypeTag, Value};

/// Bind the whole library.
pub(crate) fn register_all(interp: &mut Interpreter) -> SliResult {
    stack_ops::register(interp)?;
    arith::register(interp)?;
    control::register(interp)?;
    dict_ops::register(interp)?;
    container::register(interp)?;
    trie_ops::register(interp)?;
    io::register(interp)?;
    tracing::debug!(
        bindings = interp.systemdict().borrow().len(),
        "primitive library bound"
    );
    Ok(())
}

fn register_table(interp: &mut Interpreter, table: &[(&str, NativeFn)]) -> SliResult {
    for (name, handler) in table {
        interp.register(name, *handler)?;
    }
    Ok(())
}

fn dict_at(interp: &Interpreter, pos: usize) -> SliResult<SharedDict> {
    match interp.ostack.pick(pos)? {
        Value::Dict(dict) => Ok(dict.clone()),
        other => Err(errors::argument_type(pos + 1, TypeTag::Dictionary.name(), other.type_tag())),
    }
}

fn trie_at(interp: &Interpreter, pos: usize) -> SliResult<SharedTrie> {
    match interp.ostack.pick(pos)? {
        Value::Trie(trie) => Ok(trie.clone()),
        other => Err(errors::argument_type(pos + 1, TypeTag::Trie.name(), other.type_tag())),
    }
}

/// A length or count as an integer value.
fn count_value(n: usize) -> SliResult<Value> {
    i64::try_from(n)
        .map(Value::Integer)
        .map_err(|_| errors::range_check("count does not fit in an integer"))
}
