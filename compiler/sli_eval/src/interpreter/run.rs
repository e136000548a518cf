//! The execution loop.
//!
//! One cycle: count it against the guard, poll the signal flag, give the
//! debugger a look, then apply the default action of the top execution-stack
//! entry. The `stop` that unwinds a raised error is neither counted nor
//! interrupted. Any `SliError` a cycle produces is caught here, once, and turned
//! into a script-level error.

use std::sync::atomic::Ordering;

use super::{ExecOutcome, Interpreter};
use crate::errors::{self, SliResult};
use crate::exec_stack::{ExecEntry, Frame};
use crate::message::M_DEPRECATED;
use crate::value::{Heap, Name, NativeFunction, Value};

impl Interpreter {
    /// Run cycles until the execution stack shrinks to `exitlevel` entries.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, exitlevel: usize) -> ExecOutcome {
        while self.estack.len() > exitlevel {
            if let Some(code) = self.exit_request {
                self.estack.truncate(exitlevel);
                return ExecOutcome::ExitRequested(code);
            }
            self.cycle();
        }
        match self.exit_request {
            Some(code) => ExecOutcome::ExitRequested(code),
            None => ExecOutcome::Completed,
        }
    }

    fn cycle(&mut self) {
        if !self.unwinding() && self.interrupted() {
            return;
        }

        if self.config.debug {
            self.debug_hook();
        }

        self.current = self.names.execute;
        if let Err(err) = self.step() {
            let command = self.current;
            self.raise_error(command, err);
        }
    }

    /// Count the cycle against the guard and poll the signal flag, raising
    /// the matching error when either fires.
    fn interrupted(&mut self) -> bool {
        if let Err(tripped) = self.guard.tick() {
            let command = self.pending_command();
            tracing::debug!(limit = tripped.limit, "cycle guard tripped");
            self.raise_error(command, errors::cycle_guard(tripped.limit));
            return true;
        }

        let signal = self.signal.swap(0, Ordering::Relaxed);
        if signal != 0 {
            let command = self.pending_command();
            self.raise_error(command, errors::system_signal(signal));
            return true;
        }
        false
    }

    /// Whether the next entry is the `stop` scheduled by a raised error.
    fn unwinding(&self) -> bool {
        matches!(self.estack.top(), Some(ExecEntry::Value(value)) if value.equals(&self.stop_fn))
    }

    /// Name of the command about to run, for errors raised between cycles.
    pub(crate) fn pending_command(&self) -> Name {
        match self.estack.top() {
            Some(ExecEntry::Value(Value::Name(name))) => *name,
            Some(ExecEntry::Value(Value::Function(function))) => function.name,
            Some(ExecEntry::Value(Value::Trie(trie))) => trie.borrow().name(),
            _ => self.names.execute,
        }
    }

    fn step(&mut self) -> SliResult {
        let value = match self.estack.top() {
            None => return Ok(()),
            Some(ExecEntry::Frame(_)) => return self.step_frame(),
            Some(ExecEntry::Value(value)) => value.clone(),
        };

        match value {
            Value::Name(name) => {
                self.current = name;
                let resolved = self
                    .dstack
                    .lookup(name)
                    .ok_or_else(|| errors::undefined_name(self.spell(name)))?;
                self.estack.replace_top(resolved.clone());
                // An alias is resolved on the next cycle, so a name bound to
                // itself cannot hang a single cycle.
                if matches!(resolved, Value::Name(_)) {
                    return Ok(());
                }
                self.evaluate_resolved(resolved)
            }
            value => self.evaluate_resolved(value),
        }
    }

    /// Default action of the value on top of the execution stack.
    fn evaluate_resolved(&mut self, value: Value) -> SliResult {
        match value {
            Value::Procedure(proc) => {
                self.estack.pop();
                if !proc.is_empty() {
                    self.estack.push_frame(Frame::Iterate { proc, pos: 0 });
                }
                Ok(())
            }
            Value::Function(function) => {
                self.current = function.name;
                self.estack.pop();
                self.call_native(&function)
            }
            Value::Trie(trie) => {
                let handler = {
                    let trie = trie.borrow();
                    self.current = trie.name();
                    trie.lookup(&self.ostack)?
                };
                match handler {
                    // Errors name the overloaded operator, not the variant.
                    Value::Function(function) => {
                        self.estack.pop();
                        self.call_native(&function)
                    }
                    Value::Procedure(_) => {
                        self.estack.replace_top(handler.clone());
                        self.evaluate_resolved(handler)
                    }
                    other => {
                        self.estack.replace_top(other);
                        Ok(())
                    }
                }
            }
            Value::Stream(stream) if stream.is_executable() => {
                self.current = self.names.scanner;
                match stream.next_value(&self.interner) {
                    Ok(Some(item @ Value::Procedure(_))) => self.ostack.push(item),
                    Ok(Some(item)) => self.estack.push_value(item),
                    Ok(None) => {
                        self.estack.pop();
                    }
                    Err(err) => {
                        tracing::debug!(source = %stream.label(), %err, "read failed");
                        return Err((&err).into());
                    }
                }
                Ok(())
            }
            data => {
                self.estack.pop();
                self.ostack.push(data);
                Ok(())
            }
        }
    }

    fn call_native(&mut self, function: &Heap<NativeFunction>) -> SliResult {
        if let Some(text) = function.take_deprecation_warning() {
            self.message(M_DEPRECATED, self.spell(function.name), text);
        }
        tracing::trace!(name = self.spell(function.name), "call");
        (function.handler)(self)
    }
}
