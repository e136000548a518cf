//! Type-tag dispatch tries.
//!
//! A trie maps ordered operand-type signatures to handlers for one
//! overloaded name (`add`, `get`, ...). Signatures are written deepest
//! operand first, the way scripts list them:
//!
//! ```text
//! /add [/integertype /doubletype] /add_id load addtotrie
//! ```
//!
//! means "second operand integer, top operand double". Internally the trie
//! is keyed from the top of the operand stack downwards, so dispatch inspects
//! only as many operands as the matching path needs.
//!
//! Resolution is exact: the only implicit match is an explicitly registered
//! `anytype` wildcard, which loses to an exact tag at the same position.
//! There is no numeric promotion.

use smallvec::SmallVec;

use sli_ir::{Name, StringLookup};

use crate::errors::{self, SliResult};
use crate::shared::LocalScope;
use crate::stack::OperandStack;
use crate::value::{TypeTag, Value};

/// Aliased trie handle, as stored in `Value::Trie`.
pub type SharedTrie = LocalScope<TypeTrie>;

/// Signature written deepest operand first.
pub type Signature = SmallVec<[TypeTag; 4]>;

#[derive(Clone, Debug)]
struct TrieNode {
    tag: TypeTag,
    /// Handler for the signature that ends at this node.
    handler: Option<Value>,
    /// Continuations one operand deeper.
    children: Vec<TrieNode>,
}

impl TrieNode {
    fn new(tag: TypeTag) -> Self {
        TrieNode {
            tag,
            handler: None,
            children: Vec::new(),
        }
    }
}

/// Why a walk failed.
enum Miss {
    /// Too few operands for every signature reachable here.
    Underflow { needed: usize },
    /// No signature accepts the operand at `pos` (0 = top).
    Type {
        pos: usize,
        found: TypeTag,
        accepted: SmallVec<[TypeTag; 4]>,
    },
}

/// Dispatch table for one overloaded name.
#[derive(Clone, Debug)]
pub struct TypeTrie {
    name: Name,
    roots: Vec<TrieNode>,
}

impl TypeTrie {
    pub fn new(name: Name) -> Self {
        TypeTrie {
            name,
            roots: Vec::new(),
        }
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    fn child(level: &mut Vec<TrieNode>, tag: TypeTag) -> &mut TrieNode {
        let idx = match level.iter().position(|n| n.tag == tag) {
            Some(idx) => idx,
            None => {
                level.push(TrieNode::new(tag));
                level.len() - 1
            }
        };
        &mut level[idx]
    }

    /// Register `handler` for `signature` (deepest operand first).
    ///
    /// Registering a signature that is already present is an error; every
    /// other signature adds a branch beside the existing ones.
    pub fn insert<I: StringLookup>(
        &mut self,
        signature: &[TypeTag],
        handler: Value,
        names: &I,
    ) -> SliResult {
        let Some((deepest, rest)) = signature.split_first() else {
            return Err(errors::empty_signature(names.lookup(self.name)));
        };
        let mut level = &mut self.roots;
        for tag in rest.iter().rev() {
            level = &mut Self::child(level, *tag).children;
        }
        let node = Self::child(level, *deepest);
        if node.handler.is_some() {
            return Err(errors::duplicate_signature(names.lookup(self.name)));
        }
        node.handler = Some(handler);
        tracing::trace!(
            name = names.lookup(self.name),
            arity = signature.len(),
            "registered trie variant"
        );
        Ok(())
    }

    /// Walk one level. An exact tag is tried before the `anytype` branch;
    /// the wildcard is only taken when the exact branch cannot complete.
    fn resolve<'t>(level: &'t [TrieNode], ostack: &OperandStack, pos: usize) -> Result<&'t Value, Miss> {
        let Some(found) = ostack.tag_at(pos) else {
            return Err(Miss::Underflow { needed: pos + 1 });
        };
        let exact = level.iter().find(|n| n.tag == found);
        let any = level.iter().find(|n| n.tag == TypeTag::Any);

        let mut first_miss = None;
        for node in exact.into_iter().chain(any) {
            match Self::resolve_node(node, ostack, pos) {
                Ok(handler) => return Ok(handler),
                Err(miss) => {
                    first_miss.get_or_insert(miss);
                }
            }
        }
        Err(first_miss.unwrap_or_else(|| Miss::Type {
            pos,
            found,
            accepted: level.iter().map(|n| n.tag).collect(),
        }))
    }

    /// Prefer the longest signature through `node`, falling back to the one
    /// that ends here.
    fn resolve_node<'t>(node: &'t TrieNode, ostack: &OperandStack, pos: usize) -> Result<&'t Value, Miss> {
        if !node.children.is_empty() {
            match Self::resolve(&node.children, ostack, pos + 1) {
                Ok(handler) => return Ok(handler),
                Err(miss) if node.handler.is_none() => return Err(miss),
                Err(_) => {}
            }
        }
        node.handler
            .as_ref()
            .ok_or(Miss::Underflow { needed: pos + 2 })
    }

    /// Select the handler for the operands currently on the stack.
    ///
    /// Operands are inspected, never consumed.
    pub fn lookup(&self, ostack: &OperandStack) -> SliResult<Value> {
        match Self::resolve(&self.roots, ostack, 0) {
            Ok(handler) => Ok(handler.clone()),
            Err(Miss::Underflow { needed }) => Err(errors::stack_underflow(needed, ostack.len())),
            Err(Miss::Type {
                pos,
                found,
                accepted,
            }) => {
                let expected = accepted
                    .iter()
                    .map(|t| t.name())
                    .collect::<Vec<_>>()
                    .join(" or ");
                Err(errors::argument_type(pos + 1, &expected, found))
            }
        }
    }

    /// Every registered signature (deepest operand first) with its handler.
    pub fn variants(&self) -> Vec<(Signature, Value)> {
        fn walk(level: &[TrieNode], path: &mut Signature, out: &mut Vec<(Signature, Value)>) {
            for node in level {
                path.push(node.tag);
                if let Some(handler) = &node.handler {
                    let mut signature = path.clone();
                    signature.reverse();
                    out.push((signature, handler.clone()));
                }
                walk(&node.children, path, out);
                path.pop();
            }
        }
        let mut out = Vec::new();
        walk(&self.roots, &mut Signature::new(), &mut out);
        out
    }
}
