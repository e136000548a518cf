//! Pre-interned names used on hot or frequent paths.
//!
//! Interned once at construction so error raising and record keeping compare
//! and insert `Name`s (`u32 == u32`) instead of re-hashing strings.

use sli_ir::{Name, StringInterner};

#[derive(Clone, Copy)]
pub(crate) struct WellKnownNames {
    // Error record keys
    pub(crate) newerror: Name,
    pub(crate) errorname: Name,
    pub(crate) commandname: Name,
    pub(crate) message: Name,
    pub(crate) recordstacks: Name,
    pub(crate) ostack: Name,
    pub(crate) estack: Name,
    pub(crate) dstack: Name,

    // Status dictionary keys
    pub(crate) exitcode: Name,
    pub(crate) exitcodes: Name,

    // Commands named by the loop itself
    pub(crate) stop: Name,
    pub(crate) raiseerror: Name,
    pub(crate) scanner: Name,
    pub(crate) execute: Name,
    pub(crate) bad_error_handler: Name,
}

impl WellKnownNames {
    pub(crate) fn new(interner: &StringInterner) -> Self {
        Self {
            newerror: interner.intern("newerror"),
            errorname: interner.intern("errorname"),
            commandname: interner.intern("commandname"),
            message: interner.intern("message"),
            recordstacks: interner.intern("recordstacks"),
            ostack: interner.intern("ostack"),
            estack: interner.intern("estack"),
            dstack: interner.intern("dstack"),
            exitcode: interner.intern("exitcode"),
            exitcodes: interner.intern("exitcodes"),
            stop: interner.intern("stop"),
            raiseerror: interner.intern("raiseerror"),
            scanner: interner.intern("scanner"),
            execute: interner.intern("execute"),
            bad_error_handler: interner.intern("BadErrorHandler"),
        }
    }
}
