//! Runtime values of the SLI language.
//!
//! Every value is cheap to copy: scalars are inline, strings, arrays and
//! procedures share a reference-counted [`Heap`] payload, and dictionaries,
//! tries and streams are aliased [`LocalScope`] handles.
//!
//! # Executable flag
//!
//! The executable flag is encoded in the variant rather than stored next to
//! it: `Name` vs `LiteralName`, `Procedure` vs `Array`, and the `executable`
//! field of a stream handle. `to_executable` / `to_literal` switch between the
//! pairs (`cvx` / `cvlit`).
//!
//! # Construction
//!
//! Heap-backed variants are built through factory methods
//! (`Value::string`, `Value::array`, `Value::procedure`, ...), since
//! `Heap::new` is private to this module.

mod heap;
mod native;
mod range;
mod render;

use std::fmt;

pub use sli_ir::{Name, StringLookup};

pub use heap::Heap;
pub use native::{NativeFn, NativeFunction};
pub use range::RangeIter;
pub use render::{Render, ValueDisplay};

use crate::dict::{Dictionary, SharedDict};
use crate::shared::LocalScope;
use crate::source::StreamHandle;
use crate::trie::{SharedTrie, TypeTrie};

/// A runtime value.
#[derive(Clone)]
pub enum Value {
    // Scalars
    Integer(i64),
    Double(f64),
    Bool(bool),
    /// Executable name: evaluating it resolves the binding.
    Name(Name),
    /// Literal name: evaluating it pushes the name itself.
    LiteralName(Name),
    /// Lazy integer progression created by `Range`.
    Iterator(RangeIter),
    /// Marker pushed by `mark`, `[` and `<<`.
    Mark,

    // Copy-on-write payloads
    String(Heap<String>),
    Array(Heap<Vec<Value>>),
    /// Executable array.
    Procedure(Heap<Vec<Value>>),
    Function(Heap<NativeFunction>),
    /// Procedure installed with `setcallback`.
    Callback(Heap<Value>),

    // Aliased handles
    Dict(SharedDict),
    Trie(SharedTrie),
    Stream(StreamHandle),
}

/// Script-visible type of a value, as used by `type` and by dispatch tries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Integer,
    Double,
    String,
    Bool,
    Name,
    Literal,
    Array,
    Procedure,
    Dictionary,
    Function,
    Trie,
    IStream,
    XIStream,
    Iterator,
    Callback,
    Mark,
    /// Wildcard accepted in dispatch signatures; no value has this type.
    Any,
}

impl TypeTag {
    /// Every tag, in declaration order.
    pub const ALL: [TypeTag; 17] = [
        TypeTag::Integer,
        TypeTag::Double,
        TypeTag::String,
        TypeTag::Bool,
        TypeTag::Name,
        TypeTag::Literal,
        TypeTag::Array,
        TypeTag::Procedure,
        TypeTag::Dictionary,
        TypeTag::Function,
        TypeTag::Trie,
        TypeTag::IStream,
        TypeTag::XIStream,
        TypeTag::Iterator,
        TypeTag::Callback,
        TypeTag::Mark,
        TypeTag::Any,
    ];

    /// The type name scripts see (`integertype`, `proceduretype`, ...).
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Integer => "integertype",
            TypeTag::Double => "doubletype",
            TypeTag::String => "stringtype",
            TypeTag::Bool => "booleantype",
            TypeTag::Name => "nametype",
            TypeTag::Literal => "literaltype",
            TypeTag::Array => "arraytype",
            TypeTag::Procedure => "proceduretype",
            TypeTag::Dictionary => "dictionarytype",
            TypeTag::Function => "functiontype",
            TypeTag::Trie => "trietype",
            TypeTag::IStream => "istreamtype",
            TypeTag::XIStream => "xistreamtype",
            TypeTag::Iterator => "iteratortype",
            TypeTag::Callback => "callbacktype",
            TypeTag::Mark => "marktype",
            TypeTag::Any => "anytype",
        }
    }

    /// Parse a script-visible type name.
    pub fn from_name(name: &str) -> Option<TypeTag> {
        TypeTag::ALL.into_iter().find(|tag| tag.name() == name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Factory Methods

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Heap::new(s.into()))
    }

    /// Create a (literal) array value.
    #[inline]
    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Heap::new(items))
    }

    /// Create an executable procedure value.
    #[inline]
    pub fn procedure(items: Vec<Value>) -> Self {
        Value::Procedure(Heap::new(items))
    }

    /// Create a value wrapping a fresh dictionary.
    #[inline]
    pub fn dict(dict: Dictionary) -> Self {
        Value::Dict(LocalScope::new(dict))
    }

    /// Create a value wrapping a fresh dispatch trie.
    #[inline]
    pub fn trie(trie: TypeTrie) -> Self {
        Value::Trie(LocalScope::new(trie))
    }

    /// Create a native function value.
    #[inline]
    pub fn function(function: NativeFunction) -> Self {
        Value::Function(Heap::new(function))
    }

    /// Wrap a procedure as a host callback.
    #[inline]
    pub fn callback(proc: Value) -> Self {
        Value::Callback(Heap::new(proc))
    }
}

// Queries

impl Value {
    /// The script-visible type of this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Integer(_) => TypeTag::Integer,
            Value::Double(_) => TypeTag::Double,
            Value::Bool(_) => TypeTag::Bool,
            Value::Name(_) => TypeTag::Name,
            Value::LiteralName(_) => TypeTag::Literal,
            Value::Iterator(_) => TypeTag::Iterator,
            Value::Mark => TypeTag::Mark,
            Value::String(_) => TypeTag::String,
            Value::Array(_) => TypeTag::Array,
            Value::Procedure(_) => TypeTag::Procedure,
            Value::Function(_) => TypeTag::Function,
            Value::Callback(_) => TypeTag::Callback,
            Value::Dict(_) => TypeTag::Dictionary,
            Value::Trie(_) => TypeTag::Trie,
            Value::Stream(s) if s.is_executable() => TypeTag::XIStream,
            Value::Stream(_) => TypeTag::IStream,
        }
    }

    /// Whether evaluating this value does more than push it.
    pub fn is_executable(&self) -> bool {
        match self {
            Value::Name(_) | Value::Procedure(_) | Value::Function(_) | Value::Trie(_) => true,
            Value::Stream(s) => s.is_executable(),
            _ => false,
        }
    }

    /// Executable counterpart (`cvx`). Values without one are returned as is.
    #[must_use]
    pub fn to_executable(&self) -> Value {
        match self {
            Value::LiteralName(n) => Value::Name(*n),
            Value::Array(items) => Value::Procedure(items.clone()),
            Value::Stream(s) => Value::Stream(s.with_executable(true)),
            other => other.clone(),
        }
    }

    /// Literal counterpart (`cvlit`). Values without one are returned as is.
    #[must_use]
    pub fn to_literal(&self) -> Value {
        match self {
            Value::Name(n) => Value::LiteralName(*n),
            Value::Procedure(items) => Value::Array(items.clone()),
            Value::Stream(s) => Value::Stream(s.with_executable(false)),
            other => other.clone(),
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value of an integer or double.
    #[inline]
    #[expect(clippy::cast_precision_loss, reason = "SLI converts integers to doubles freely")]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Double(d) => Some(*d),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// The name of an executable or literal name.
    #[inline]
    pub fn as_name(&self) -> Option<Name> {
        match self {
            Value::Name(n) | Value::LiteralName(n) => Some(*n),
            _ => None,
        }
    }

    /// Elements of an array or procedure.
    #[inline]
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::Procedure(items) => Some(items),
            _ => None,
        }
    }

    /// Render for output with the given name table.
    pub fn display<'a, I: StringLookup>(
        &'a self,
        interner: &'a I,
        mode: Render,
    ) -> ValueDisplay<'a, I> {
        ValueDisplay::new(self, interner, mode)
    }

    /// Structural equality as seen by `eq`.
    ///
    /// Numbers compare only within their own type, strings and arrays by
    /// content, dictionaries, tries, functions and streams by identity.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            #[allow(clippy::float_cmp, reason = "eq compares doubles exactly")]
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Name(a), Value::Name(b)) | (Value::LiteralName(a), Value::LiteralName(b)) => {
                a == b
            }
            (Value::Iterator(a), Value::Iterator(b)) => a == b,
            (Value::Mark, Value::Mark) => true,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::Procedure(a), Value::Procedure(b)) => {
                Heap::ptr_eq(a, b)
                    || (a.len() == b.len()
                        && sli_stack::ensure_sufficient_stack(|| {
                            a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
                        }))
            }
            (Value::Function(a), Value::Function(b)) => Heap::ptr_eq(a, b),
            (Value::Callback(a), Value::Callback(b)) => a.equals(b),
            (Value::Dict(a), Value::Dict(b)) => LocalScope::ptr_eq(a, b),
            (Value::Trie(a), Value::Trie(b)) => LocalScope::ptr_eq(a, b),
            (Value::Stream(a), Value::Stream(b)) => a.same_source(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "Integer({n})"),
            Value::Double(d) => write!(f, "Double({d:?})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Name(n) => write!(f, "Name({n:?})"),
            Value::LiteralName(n) => write!(f, "LiteralName({n:?})"),
            Value::Iterator(r) => write!(f, "Iterator({r:?})"),
            Value::Mark => write!(f, "Mark"),
            Value::String(s) => write!(f, "String({:?})", &***s),
            Value::Array(items) => f.debug_tuple("Array").field(&&**items).finish(),
            Value::Procedure(items) => f.debug_tuple("Procedure").field(&&**items).finish(),
            Value::Function(func) => write!(f, "Function({:?})", func.name),
            Value::Callback(proc) => f.debug_tuple("Callback").field(&**proc).finish(),
            Value::Dict(d) => write!(f, "Dict({} entries)", d.borrow().len()),
            Value::Trie(t) => write!(f, "Trie({:?})", t.borrow().name()),
            Value::Stream(s) => write!(f, "{s:?}"),
        }
    }
}

/// Equality follows [`Value::equals`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

#[cfg(test)]
mod tests;
