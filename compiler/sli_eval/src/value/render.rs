//! Text rendering of values for `=`, `==`, `cvs` and diagnostics.

use std::fmt;

use sli_ir::StringLookup;

use super::Value;

/// Which of the two output forms to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Render {
    /// `=` form: strings and names without decoration.
    Plain,
    /// `==` form: the syntax that reads back as the same value where possible.
    Syntax,
}

/// Display adapter pairing a value with the name table it needs.
pub struct ValueDisplay<'a, I: StringLookup> {
    value: &'a Value,
    interner: &'a I,
    mode: Render,
}

impl<'a, I: StringLookup> ValueDisplay<'a, I> {
    pub(super) fn new(value: &'a Value, interner: &'a I, mode: Render) -> Self {
        ValueDisplay {
            value,
            interner,
            mode,
        }
    }

    fn nested(&self, value: &'a Value) -> Self {
        ValueDisplay {
            value,
            interner: self.interner,
            mode: Render::Syntax,
        }
    }

    fn write_seq(&self, f: &mut fmt::Formatter<'_>, items: &'a [Value]) -> fmt::Result {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(&self.nested(item), f)?;
        }
        Ok(())
    }
}

fn write_double(f: &mut fmt::Formatter<'_>, d: f64) -> fmt::Result {
    if d.is_finite() && d.fract() == 0.0 && d.abs() < 1e15 {
        write!(f, "{d:.1}")
    } else {
        write!(f, "{d}")
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("(")?;
    for c in s.chars() {
        match c {
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\\' => f.write_str("\\\\")?,
            '(' => f.write_str("\\(")?,
            ')' => f.write_str("\\)")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str(")")
}

impl<I: StringLookup> fmt::Display for ValueDisplay<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = self.mode == Render::Plain;
        match self.value {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Double(d) => write_double(f, *d),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Name(n) => f.write_str(self.interner.lookup(*n)),
            Value::LiteralName(n) if plain => f.write_str(self.interner.lookup(*n)),
            Value::LiteralName(n) => write!(f, "/{}", self.interner.lookup(*n)),
            Value::String(s) if plain => f.write_str(s),
            Value::String(s) => write_escaped(f, s),
            Value::Iterator(r) => write!(f, "<iteratortype {}..{}:{}>", r.start(), r.stop(), r.step()),
            Value::Mark => f.write_str("<mark>"),
            Value::Array(items) => sli_stack::ensure_sufficient_stack(|| {
                f.write_str("[")?;
                self.write_seq(f, items)?;
                f.write_str("]")
            }),
            Value::Procedure(items) => sli_stack::ensure_sufficient_stack(|| {
                f.write_str("{")?;
                self.write_seq(f, items)?;
                f.write_str("}")
            }),
            Value::Function(func) => write!(f, "--{}--", self.interner.lookup(func.name)),
            Value::Callback(proc) => {
                f.write_str("<callbacktype ")?;
                fmt::Display::fmt(&self.nested(proc), f)?;
                f.write_str(">")
            }
            Value::Dict(_) => f.write_str("<dictionarytype>"),
            Value::Trie(t) => write!(f, "+{}+", self.interner.lookup(t.borrow().name())),
            Value::Stream(_) => write!(f, "<{}>", self.value.type_tag().name()),
        }
    }
}
