//! The interpreter context and its host API.
//!
//! One `Interpreter` owns the three stacks, the permanent dictionaries and
//! all supervision state (cycle guard, signal flag, debugger). Nothing is
//! global: two interpreters in one process are fully independent.
//!
//! The execution loop lives in `run.rs`, continuation frames and the error
//! protocol in `control.rs`, and the status/error dictionaries in `status.rs`.

mod builder;
mod control;
mod guard;
mod names;
mod run;
mod status;

use std::sync::atomic::AtomicI32;
use std::sync::Arc;

use sli_ir::{Name, SharedInterner};

pub use builder::{InterpreterBuilder, InterpreterConfig};
pub use guard::{CycleGuard, GuardTripped};
pub use status::{ErrorRecord, EXIT_CODES};

pub(crate) use names::WellKnownNames;

use crate::debugger::Debugger;
use crate::dict::{DictStack, SharedDict};
use crate::errors::SliResult;
use crate::exec_stack::ExecStack;
use crate::message::{format_message, M_ERROR};
use crate::print_handler::SharedPrintHandler;
use crate::shared::LocalScope;
use crate::source::{StreamHandle, StringSource, TokenSource};
use crate::stack::OperandStack;
use crate::trie::TypeTrie;
use crate::value::{NativeFn, NativeFunction, TypeTag, Value};

/// How a call to one of the `execute` methods ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The execution stack drained to the requested level.
    Completed,
    /// A script asked to terminate with this exit code.
    ExitRequested(i32),
}

/// An SLI interpreter instance.
pub struct Interpreter {
    pub(crate) interner: SharedInterner,
    pub(crate) names: WellKnownNames,

    pub(crate) ostack: OperandStack,
    pub(crate) estack: ExecStack,
    pub(crate) dstack: DictStack,

    pub(crate) systemdict: SharedDict,
    pub(crate) userdict: SharedDict,
    pub(crate) statusdict: SharedDict,
    pub(crate) errordict: SharedDict,

    pub(crate) print_handler: SharedPrintHandler,
    pub(crate) config: InterpreterConfig,
    pub(crate) guard: CycleGuard,
    /// Set by the host (for example from a signal handler), polled between cycles.
    pub(crate) signal: Arc<AtomicI32>,
    /// Command currently executing, named in raised errors.
    pub(crate) current: Name,
    pub(crate) debugger: Debugger,
    /// Procedure run by the host before each top-level prompt.
    pub(crate) callback: Option<Value>,
    /// The `stop` primitive, pushed by `raiseerror`.
    pub(crate) stop_fn: Value,
    pub(crate) exit_request: Option<i32>,
    pub(crate) unguarded_errors: usize,
}

impl Interpreter {
    /// An interpreter with the default configuration, printing to stdout.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    // Running code

    /// Evaluate source text to completion.
    pub fn execute_str(&mut self, text: &str) -> ExecOutcome {
        self.execute_source(Box::new(StringSource::new(text)))
    }

    /// Evaluate every value a source yields.
    pub fn execute_source(&mut self, source: Box<dyn TokenSource>) -> ExecOutcome {
        let level = self.estack.len();
        self.estack
            .push_value(Value::Stream(StreamHandle::new(source, true)));
        self.execute(level)
    }

    /// Evaluate a single value (procedure, name, ...) to completion.
    pub fn execute_value(&mut self, value: Value) -> ExecOutcome {
        let level = self.estack.len();
        self.estack.push_value(value);
        self.execute(level)
    }

    /// Run the host callback, if one is installed.
    pub fn run_callback(&mut self) -> ExecOutcome {
        match &self.callback {
            Some(Value::Callback(proc)) => {
                let proc = (**proc).clone();
                self.execute_value(proc)
            }
            _ => ExecOutcome::Completed,
        }
    }

    /// Request termination with `code`; `-1` means `exitcodes/fatal`.
    ///
    /// The execution stack is cleared and every running `execute` call returns
    /// `ExitRequested`. The process is never exited from here.
    pub fn terminate(&mut self, code: i32) {
        let code = if code == -1 {
            self.exit_code_for("fatal").unwrap_or(127)
        } else {
            code
        };
        tracing::debug!(code, "termination requested");
        self.statusdict
            .borrow_mut()
            .force_insert(self.names.exitcode, Value::Integer(i64::from(code)));
        self.exit_request = Some(code);
        self.estack.clear();
    }

    /// Exit code of a pending termination request.
    pub fn exit_request(&self) -> Option<i32> {
        self.exit_request
    }

    /// Number of errors that reached the top level without a `stopped`.
    pub fn unguarded_errors(&self) -> usize {
        self.unguarded_errors
    }

    // Stacks

    pub fn operand_stack(&self) -> &OperandStack {
        &self.ostack
    }

    pub fn operand_stack_mut(&mut self) -> &mut OperandStack {
        &mut self.ostack
    }

    pub fn exec_stack(&self) -> &ExecStack {
        &self.estack
    }

    /// Current execution stack depth.
    pub fn exec_depth(&self) -> usize {
        self.estack.len()
    }

    pub fn dict_stack(&self) -> &DictStack {
        &self.dstack
    }

    pub fn dict_stack_mut(&mut self) -> &mut DictStack {
        &mut self.dstack
    }

    // Names and bindings

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Intern a spelling.
    pub fn name(&self, spelling: &str) -> Name {
        self.interner.intern(spelling)
    }

    /// Resolve a name through the dictionary stack.
    pub fn lookup(&self, spelling: &str) -> Option<Value> {
        let name = self.interner.get(spelling)?;
        self.dstack.lookup(name)
    }

    /// Bind in the current scope.
    pub fn define(&mut self, spelling: &str, value: Value) -> SliResult {
        let name = self.name(spelling);
        self.dstack.define(name, value, &*self.interner)
    }

    /// Bind in the base dictionary.
    pub fn define_in_base(&mut self, spelling: &str, value: Value) -> SliResult {
        let name = self.name(spelling);
        self.dstack.define_in_base(name, value, &*self.interner)
    }

    pub fn systemdict(&self) -> &SharedDict {
        &self.systemdict
    }

    pub fn userdict(&self) -> &SharedDict {
        &self.userdict
    }

    pub fn statusdict(&self) -> &SharedDict {
        &self.statusdict
    }

    pub fn errordict(&self) -> &SharedDict {
        &self.errordict
    }

    /// Bind a native primitive in the base dictionary.
    pub fn register(&mut self, spelling: &str, handler: NativeFn) -> SliResult<Value> {
        let name = self.name(spelling);
        let value = Value::function(NativeFunction::new(name, handler));
        self.dstack
            .define_in_base(name, value.clone(), &*self.interner)?;
        Ok(value)
    }

    /// Bind a primitive that warns once at `M_DEPRECATED` when first used.
    pub fn register_deprecated(
        &mut self,
        spelling: &str,
        handler: NativeFn,
        text: &'static str,
    ) -> SliResult<Value> {
        let name = self.name(spelling);
        let value = Value::function(NativeFunction::deprecated(name, handler, text));
        self.dstack
            .define_in_base(name, value.clone(), &*self.interner)?;
        Ok(value)
    }

    /// Add a variant to the dispatch trie bound to `spelling` in the base
    /// dictionary, creating the trie on first use.
    ///
    /// `signature` lists operand types deepest first. The variant itself is
    /// bound under `variant` so scripts can call it directly.
    pub fn register_variant(
        &mut self,
        spelling: &str,
        signature: &[TypeTag],
        variant: &str,
        handler: NativeFn,
    ) -> SliResult {
        let function = self.register(variant, handler)?;
        self.add_to_trie(spelling, signature, function)
    }

    /// Add `handler` (any executable value) to the trie bound to `spelling`.
    pub fn add_to_trie(&mut self, spelling: &str, signature: &[TypeTag], handler: Value) -> SliResult {
        let name = self.name(spelling);
        let trie = match self.dstack.lookup_from_base(name) {
            Some(Value::Trie(trie)) => trie,
            _ => {
                let trie = LocalScope::new(TypeTrie::new(name));
                self.dstack
                    .define_in_base(name, Value::Trie(trie.clone()), &*self.interner)?;
                trie
            }
        };
        let result = trie
            .borrow_mut()
            .insert(signature, handler, &*self.interner);
        result
    }

    // Supervision

    /// Flag the host may set (to a signal number) to interrupt execution
    /// at the next cycle boundary.
    pub fn signal_flag(&self) -> Arc<AtomicI32> {
        Arc::clone(&self.signal)
    }

    /// Allow `cycles` more cycles before raising `CycleGuard`.
    pub fn set_cycle_guard(&mut self, cycles: u64) {
        self.guard.arm(cycles);
    }

    pub fn remove_cycle_guard(&mut self) {
        self.guard.disarm();
    }

    pub fn cycle_guard(&self) -> &CycleGuard {
        &self.guard
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn verbosity(&self) -> i32 {
        self.config.verbosity
    }

    pub fn set_verbosity(&mut self, level: i32) {
        self.config.verbosity = level;
    }

    pub fn debug_mode(&self) -> bool {
        self.config.debug
    }

    /// Switch debug mode; turning it on also shows every message.
    pub fn set_debug_mode(&mut self, on: bool) {
        self.config.debug = on;
        if on {
            self.config.verbosity = crate::message::M_ALL;
        }
    }

    pub fn debugger_mut(&mut self) -> &mut Debugger {
        &mut self.debugger
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    // Messages

    /// Emit `text` if `level` passes the current verbosity.
    pub fn message(&self, level: i32, from: &str, text: &str) {
        if level < self.config.verbosity {
            return;
        }
        let formatted = format_message(level, from, text);
        if level >= M_ERROR {
            self.print_handler.eprintln(&formatted);
        } else {
            self.print_handler.println(&formatted);
        }
    }

    /// Spelling of an interned name.
    pub(crate) fn spell(&self, name: Name) -> &str {
        self.interner.lookup(name)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
