//! Native function payload.

use std::cell::Cell;
use std::fmt;

use sli_ir::Name;

use crate::errors::SliResult;
use crate::interpreter::Interpreter;

/// Signature of a primitive handler.
///
/// A handler validates its operands before consuming them, so a failed call
/// leaves the operand stack as it found it.
pub type NativeFn = fn(&mut Interpreter) -> SliResult;

/// A host-provided primitive.
pub struct NativeFunction {
    pub name: Name,
    pub handler: NativeFn,
    deprecation: Option<&'static str>,
    warned: Cell<bool>,
}

impl NativeFunction {
    pub fn new(name: Name, handler: NativeFn) -> Self {
        NativeFunction {
            name,
            handler,
            deprecation: None,
            warned: Cell::new(false),
        }
    }

    /// A primitive that emits `text` at `M_DEPRECATED` the first time it runs.
    pub fn deprecated(name: Name, handler: NativeFn, text: &'static str) -> Self {
        NativeFunction {
            deprecation: Some(text),
            ..NativeFunction::new(name, handler)
        }
    }

    pub fn deprecation(&self) -> Option<&'static str> {
        self.deprecation
    }

    /// Deprecation text, returned only on the first call.
    pub fn take_deprecation_warning(&self) -> Option<&'static str> {
        let text = self.deprecation?;
        if self.warned.replace(true) {
            None
        } else {
            Some(text)
        }
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("deprecation", &self.deprecation)
            .finish_non_exhaustive()
    }
}
