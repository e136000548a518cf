//! Continuation frames and the stop/stopped error protocol.
//!
//! Every control construct is a [`Frame`] on the execution stack. Stepping a
//! frame schedules at most one element and leaves the frame in place, so a
//! loop body runs over many cycles without host recursion.
//!
//! Errors follow one path: `raise_named` fills `errordict`, pushes the failing
//! command and schedules `stop`; `stop` unwinds to the nearest `Stopped`
//! sentinel or, when there is none, reports and clears the execution stack.

use super::Interpreter;
use crate::errors::{self, SliResult};
use crate::exec_stack::{ExecEntry, Frame};
use crate::value::{Name, Value};

impl Interpreter {
    /// Whether an `Iterate` frame may be dropped before its last element runs.
    fn elides_tail_calls(&self) -> bool {
        self.config.tail_call_elision && !self.config.debug
    }

    /// Queue an element taken from a procedure body.
    ///
    /// Nested procedures are data until something runs them; other
    /// executables go to the execution stack; plain data is pushed directly.
    fn schedule(&mut self, item: Value) {
        match item {
            Value::Procedure(_) => self.ostack.push(item),
            item if item.is_executable() => self.estack.push_value(item),
            item => self.ostack.push(item),
        }
    }

    /// Advance the continuation frame on top of the execution stack.
    pub(crate) fn step_frame(&mut self) -> SliResult {
        let elide = self.elides_tail_calls();
        let Some(ExecEntry::Frame(frame)) = self.estack.top_mut() else {
            return Err(errors::kernel_error("continuation frame expected"));
        };

        match frame {
            Frame::Iterate { proc, pos } => {
                let Some(item) = proc.get(*pos).cloned() else {
                    self.estack.pop();
                    return Ok(());
                };
                *pos += 1;
                if elide && *pos == proc.len() {
                    self.estack.pop();
                }
                self.schedule(item);
            }
            Frame::Loop { proc, pos } => {
                let Some(item) = proc.get(*pos).cloned() else {
                    *pos = 0;
                    return Ok(());
                };
                *pos += 1;
                self.schedule(item);
            }
            Frame::Repeat {
                proc,
                pos,
                remaining,
            } => {
                let Some(item) = proc.get(*pos).cloned() else {
                    *remaining = remaining.saturating_sub(1);
                    *pos = 0;
                    if *remaining == 0 {
                        self.estack.pop();
                    }
                    return Ok(());
                };
                *pos += 1;
                self.schedule(item);
            }
            Frame::For { body, counter } => match counter.advance() {
                Some(value) => {
                    let body = body.clone();
                    self.ostack.push(value);
                    self.estack.push_value(body);
                }
                None => {
                    self.estack.pop();
                }
            },
            Frame::Forall {
                source,
                index,
                body,
                indexed,
            } => {
                if !source.push_item(*index, &mut self.ostack) {
                    self.estack.pop();
                    return Ok(());
                }
                if *indexed {
                    let position = i64::try_from(*index)
                        .map_err(|_| errors::range_check("forallindexed index too large"))?;
                    self.ostack.push(Value::Integer(position));
                }
                *index += 1;
                let body = body.clone();
                self.estack.push_value(body);
            }
            Frame::Stopped => {
                self.estack.pop();
                self.ostack.push(Value::Bool(false));
            }
        }
        Ok(())
    }

    /// Fill the error record and schedule `stop`.
    ///
    /// A second error while one is still active becomes `BadErrorHandler`,
    /// naming both, so the first is never silently overwritten.
    pub(crate) fn raise_named(&mut self, command: Name, errorname: Name, message: Option<String>) {
        let names = self.names;
        if self.has_active_error() {
            let previous = self.error_record();
            self.set_newerror(false);
            let detail = format!(
                "/{} in {} raised while /{} from {} was not handled",
                self.spell(errorname),
                self.spell(command),
                previous.errorname.as_deref().unwrap_or("UnknownError"),
                previous.commandname.as_deref().unwrap_or("unknown"),
            );
            self.raise_named(names.raiseerror, names.bad_error_handler, Some(detail));
            return;
        }

        tracing::debug!(
            error = self.spell(errorname),
            command = self.spell(command),
            "raising error"
        );
        self.record_error(command, errorname, message);
        self.ostack.push(Value::LiteralName(command));
        self.estack.push_value(self.stop_fn.clone());
    }

    /// `stop`: unwind to the nearest `stopped`, or abandon the evaluation.
    pub(crate) fn unwind_to_stopped(&mut self) {
        match self.estack.rfind_frame(|frame| matches!(frame, Frame::Stopped)) {
            Some(index) => {
                self.estack.truncate(index);
                self.ostack.push(Value::Bool(true));
            }
            None => self.unguarded_stop(),
        }
    }

    fn unguarded_stop(&mut self) {
        if self.config.debug && self.debugger.catches_errors() {
            self.debug_on_error();
        }
        if self.has_active_error() {
            let record = self.error_record();
            tracing::warn!(
                error = record.errorname.as_deref().unwrap_or(""),
                command = record.commandname.as_deref().unwrap_or(""),
                "unguarded error"
            );
            self.report_error();
        }
        self.estack.clear();
        self.unguarded_errors += 1;
    }

    /// `exit`: leave the innermost loop-like construct.
    pub(crate) fn exit_loop(&mut self) -> SliResult {
        let index = self
            .estack
            .rfind_frame(|frame| frame.is_loop() || matches!(frame, Frame::Stopped))
            .ok_or_else(errors::estack_underflow)?;
        if matches!(
            self.estack.entries().get(index),
            Some(ExecEntry::Frame(Frame::Stopped))
        ) {
            return Err(errors::estack_underflow());
        }
        self.estack.truncate(index);
        Ok(())
    }
}
