//! SLI Eval - Execution engine of the SLI stack language.
//!
//! This crate provides the embeddable interpreter: the value model, the
//! operand, execution and dictionary stacks, the continuation-based
//! execution loop and the primitive library.
//!
//! # Architecture
//!
//! - `Interpreter`: one self-contained instance; nothing is process-global
//! - `ExecStack`: pending values plus [`Frame`] continuations, so loops and
//!   procedure bodies never recurse on the host stack
//! - `DictStack`: name resolution through aliased scopes
//! - `TypeTrie`: operand-type dispatch for overloaded primitives
//! - `Debugger`: optional stepping debugger driven by [`DebugInput`]
//!
//! Primitive failures are plain `SliError` values. The loop turns each one
//! into a script-level error (`raiseerror`), which unwinds to the nearest
//! `stopped` or is reported at the top level.
//!
//! # Example
//!
//! ```
//! use sli_eval::{buffer_handler, Interpreter};
//!
//! let out = buffer_handler();
//! let mut interp = Interpreter::builder().print_handler(out.clone()).build();
//! interp.execute_str("1 2 add =");
//! assert_eq!(out.get_output(), "3\n");
//! ```

mod builtins;
pub mod debugger;
pub mod dict;
pub mod errors;
pub mod exec_stack;
pub mod interpreter;
pub mod message;
mod print_handler;
mod shared;
pub mod source;
mod stack;
pub mod trie;
pub mod value;

pub use debugger::{DebugFlags, DebugInput, Debugger, ScriptedDebugInput, StdinDebugInput};
pub use dict::{DictStack, Dictionary, SharedDict};
pub use errors::{ErrorKind, SliError, SliResult};
pub use exec_stack::{ExecEntry, ExecStack, ForCounter, ForallSource, Frame};
pub use interpreter::{
    CycleGuard, ErrorRecord, ExecOutcome, GuardTripped, Interpreter, InterpreterBuilder,
    InterpreterConfig, EXIT_CODES,
};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, Channel,
    PrintHandlerImpl, SharedPrintHandler, StdoutPrintHandler,
};
pub use shared::LocalScope;
pub use source::{
    needs_more_input, parse, ArgsSource, ReaderSource, SourceError, StreamHandle, StringSource,
    TokenSource,
};
pub use stack::OperandStack;
pub use trie::{SharedTrie, Signature, TypeTrie};
pub use value::{
    Heap, Name, NativeFn, NativeFunction, RangeIter, Render, StringLookup, TypeTag, Value,
    ValueDisplay,
};
