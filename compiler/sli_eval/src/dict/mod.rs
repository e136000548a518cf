//! Dictionaries and the dictionary stack.
//!
//! Scope management uses a stack of aliased dictionaries rather than cloned
//! environments: `begin` pushes a handle, `end` pops it, and every holder of
//! the handle sees the same bindings.

use rustc_hash::FxHashMap;

use sli_ir::{Name, StringLookup};

use crate::errors::{self, SliResult};
use crate::shared::LocalScope;
use crate::value::Value;

/// Aliased dictionary handle, as stored in `Value::Dict`.
pub type SharedDict = LocalScope<Dictionary>;

/// A mutable mapping from names to values.
#[derive(Clone, Debug, Default)]
pub struct Dictionary {
    /// Bindings (`FxHashMap` for faster hashing with `Name` keys).
    bindings: FxHashMap<Name, Value>,
    /// Writes are refused while set.
    protected: bool,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Dictionary {
            bindings: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            protected: false,
        }
    }

    #[inline]
    pub fn get(&self, name: Name) -> Option<&Value> {
        self.bindings.get(&name)
    }

    #[inline]
    pub fn contains(&self, name: Name) -> bool {
        self.bindings.contains_key(&name)
    }

    /// Bind or rebind `name`.
    pub fn insert<I: StringLookup>(&mut self, name: Name, value: Value, names: &I) -> SliResult {
        if self.protected {
            return Err(errors::write_protected(names.lookup(name)));
        }
        self.bindings.insert(name, value);
        Ok(())
    }

    /// Remove `name`; absence is an `UndefinedName` error.
    pub fn remove<I: StringLookup>(&mut self, name: Name, names: &I) -> SliResult<Value> {
        if self.protected {
            return Err(errors::write_protected(names.lookup(name)));
        }
        self.bindings
            .remove(&name)
            .ok_or_else(|| errors::undefined_name(names.lookup(name)))
    }

    /// Bind ignoring protection; used for interpreter-owned records.
    pub(crate) fn force_insert(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    pub(crate) fn force_remove(&mut self, name: Name) -> Option<Value> {
        self.bindings.remove(&name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn is_protected(&self) -> bool {
        self.protected
    }

    /// Refuse all further writes.
    pub fn protect(&mut self) {
        self.protected = true;
    }

    /// Bindings ordered by spelling, for deterministic iteration.
    pub fn sorted_entries<I: StringLookup>(&self, names: &I) -> Vec<(Name, Value)> {
        let mut entries: Vec<(Name, Value)> = self
            .bindings
            .iter()
            .map(|(name, value)| (*name, value.clone()))
            .collect();
        entries.sort_by(|(a, _), (b, _)| names.lookup(*a).cmp(names.lookup(*b)));
        entries
    }

    /// An unprotected copy with its own bindings table.
    #[must_use]
    pub fn private_copy(&self) -> Dictionary {
        Dictionary {
            bindings: self.bindings.clone(),
            protected: false,
        }
    }
}

/// The dictionary stack: nested scopes searched top-down.
///
/// The bottom entry is the base dictionary (`systemdict`). The first
/// `floor` entries are permanent and cannot be popped.
pub struct DictStack {
    /// Stack of scopes, innermost last.
    scopes: Vec<SharedDict>,
    /// Base scope (always at the bottom).
    base: SharedDict,
    /// Number of permanent scopes.
    floor: usize,
}

impl DictStack {
    /// Create a stack holding only `base`.
    pub fn new(base: SharedDict) -> Self {
        DictStack {
            scopes: vec![base.clone()],
            base,
            floor: 1,
        }
    }

    /// Make everything currently on the stack permanent.
    pub fn seal(&mut self) {
        self.floor = self.scopes.len();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn base(&self) -> &SharedDict {
        &self.base
    }

    /// The innermost scope.
    #[inline]
    pub fn current(&self) -> &SharedDict {
        self.scopes.last().unwrap_or(&self.base)
    }

    pub fn push_scope(&mut self, dict: SharedDict) {
        tracing::trace!(depth = self.scopes.len() + 1, "push dictionary scope");
        self.scopes.push(dict);
    }

    /// Pop the innermost scope; permanent scopes cannot be popped.
    pub fn pop_scope(&mut self) -> SliResult<SharedDict> {
        if self.scopes.len() <= self.floor {
            return Err(errors::dict_stack_underflow());
        }
        tracing::trace!(depth = self.scopes.len() - 1, "pop dictionary scope");
        self.scopes.pop().ok_or_else(errors::dict_stack_underflow)
    }

    /// Pop every non-permanent scope.
    pub fn reset(&mut self) {
        self.scopes.truncate(self.floor);
    }

    /// Bind in the innermost scope.
    pub fn define<I: StringLookup>(&self, name: Name, value: Value, names: &I) -> SliResult {
        self.current().borrow_mut().insert(name, value, names)
    }

    /// Bind in the base scope, bypassing the scopes above it.
    pub fn define_in_base<I: StringLookup>(&self, name: Name, value: Value, names: &I) -> SliResult {
        self.base.borrow_mut().insert(name, value, names)
    }

    /// Resolve `name` top-down.
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.borrow().get(name).cloned())
    }

    /// Resolve `name` in the base scope only.
    pub fn lookup_from_base(&self, name: Name) -> Option<Value> {
        self.base.borrow().get(name).cloned()
    }

    /// Remove `name` from the innermost scope only.
    pub fn undefine<I: StringLookup>(&self, name: Name, names: &I) -> SliResult {
        self.current().borrow_mut().remove(name, names).map(drop)
    }

    /// Scopes from bottom to top, as dictionary values.
    pub fn to_values(&self) -> Vec<Value> {
        self.scopes.iter().cloned().map(Value::Dict).collect()
    }
}
