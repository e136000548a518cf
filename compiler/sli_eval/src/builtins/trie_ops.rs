//! Script access to dispatch tries.

use super::{register_table, trie_at};
use crate::errors::{self, SliResult};
use crate::interpreter::Interpreter;
use crate::trie::{Signature, TypeTrie};
use crate::value::{TypeTag, Value};

pub(super) fn register(interp: &mut Interpreter) -> SliResult {
    register_table(interp, &[("trie", trie), ("addtotrie", addtotrie)])?;
    interp.register_variant("cva", &[TypeTag::Trie], "cva_t", cva_t)
}

/// `/name trie trie`: an empty trie for `name`.
fn trie(interp: &mut Interpreter) -> SliResult {
    let name = interp.ostack.name_at(0)?;
    interp.ostack.set(0, Value::trie(TypeTrie::new(name)))
}

/// `trie [/type ...] handler addtotrie trie`
///
/// The type list is written deepest operand first.
fn addtotrie(interp: &mut Interpreter) -> SliResult {
    let handler = interp.ostack.pick(0)?.clone();
    let signature = match interp.ostack.pick(1)? {
        Value::Array(types) => types
            .iter()
            .map(|t| signature_tag(interp, t))
            .collect::<SliResult<Signature>>()?,
        other => return Err(errors::argument_type(2, "an array of type names", other.type_tag())),
    };
    let trie = trie_at(interp, 2)?;
    trie.borrow_mut()
        .insert(&signature, handler, &*interp.interner)?;
    interp.ostack.drop_n(2)
}

fn signature_tag(interp: &Interpreter, value: &Value) -> SliResult<TypeTag> {
    let name = value
        .as_name()
        .ok_or_else(|| errors::argument_type(2, "an array of type names", value.type_tag()))?;
    let spelling = interp.spell(name);
    TypeTag::from_name(spelling).ok_or_else(|| errors::unknown_type_name(spelling))
}

/// `trie cva array`: `[[/type ...] handler ...]`, one pair per variant.
fn cva_t(interp: &mut Interpreter) -> SliResult {
    let trie = trie_at(interp, 0)?;
    let variants = trie.borrow().variants();
    let mut pairs = Vec::with_capacity(variants.len() * 2);
    for (signature, handler) in variants {
        let types = signature
            .iter()
            .map(|tag| Value::LiteralName(interp.interner.intern(tag.name())))
            .collect();
        pairs.push(Value::array(types));
        pairs.push(handler);
    }
    interp.ostack.set(0, Value::array(pairs))
}
