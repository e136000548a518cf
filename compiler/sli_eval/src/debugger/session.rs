//! The debugger's command loop, run on the interpreter's own stacks.

use super::DebugFlags;
use crate::exec_stack::{ExecEntry, Frame};
use crate::interpreter::{ExecOutcome, Interpreter};
use crate::source::{StreamHandle, StringSource};
use crate::value::{Render, Value};

const HELP: &str = "\
next, n         run the next entry, stepping over procedure calls
step, s         run the next entry, stepping into procedure calls
continue, c     stop stepping
list, l         show the procedure being executed
where, w        show the execution stack as a backtrace
stack           show the operand stack
estack          show the raw execution stack
depth [n]       show or set the deepest call depth at which to stop
toggle, t       show the operand stack with every step
catch           enter inspect mode when an error is not caught
tail            toggle tail-call elision
stop            raise stop
inspect, i      evaluate commands on the current stacks (leave with exit)
help, ?         show this text
quit, q         leave debug mode";

/// What the command loop does after a command.
enum Resume {
    Prompt,
    Run,
}

impl Interpreter {
    fn debug_print(&self, text: &str) {
        self.print_handler.println(text);
    }

    fn render(&self, value: &Value) -> String {
        value.display(&*self.interner, Render::Syntax).to_string()
    }

    /// One-line description of an execution stack entry.
    fn describe_entry(&self, entry: &ExecEntry) -> String {
        match entry {
            ExecEntry::Value(value) => self.render(value),
            ExecEntry::Frame(frame) => self.describe_frame(frame),
        }
    }

    fn describe_frame(&self, frame: &Frame) -> String {
        let label = frame.label();
        match frame {
            Frame::Iterate { proc, pos } | Frame::Loop { proc, pos } | Frame::Repeat { proc, pos, .. } => {
                format!(
                    "{label} {} at {pos}",
                    self.render(&Value::Procedure(proc.clone()))
                )
            }
            Frame::For { body, .. } | Frame::Forall { body, .. } => {
                format!("{label} {}", self.render(body))
            }
            Frame::Stopped => label.to_string(),
        }
    }

    fn print_operand_stack(&self) {
        if self.ostack.is_empty() {
            self.debug_print("(operand stack is empty)");
            return;
        }
        for value in self.ostack.iter().rev() {
            self.debug_print(&self.render(value));
        }
    }

    fn print_backtrace(&self, raw: bool) {
        for (depth, entry) in self.estack.entries().iter().rev().enumerate() {
            if !raw && matches!(entry, ExecEntry::Value(_)) && depth > 0 {
                continue;
            }
            self.debug_print(&format!("{depth:>3}: {}", self.describe_entry(entry)));
        }
    }

    /// Print the innermost body with a marker before the next element.
    fn print_listing(&self) {
        let body = self.estack.entries().iter().rev().find_map(|entry| match entry {
            ExecEntry::Frame(
                Frame::Iterate { proc, pos } | Frame::Loop { proc, pos } | Frame::Repeat { proc, pos, .. },
            ) => Some((proc.clone(), *pos)),
            _ => None,
        });
        let Some((proc, pos)) = body else {
            self.debug_print("(not inside a procedure)");
            return;
        };
        self.debug_print("{");
        for (i, item) in proc.iter().enumerate() {
            let marker = if i == pos { "-->" } else { "   " };
            self.debug_print(&format!("{marker} {}", self.render(item)));
        }
        self.debug_print("}");
    }

    /// Called before every cycle while debug mode is on.
    pub(crate) fn debug_hook(&mut self) {
        let depth = self.estack.call_depth();
        if !self.debugger.prompts_at(depth) {
            return;
        }
        let Some(next) = self.estack.top() else {
            return;
        };
        if self.debugger.flags.contains(DebugFlags::SHOW_STACK) {
            self.print_operand_stack();
        }
        self.debug_print(&format!("next ({depth}): {}", self.describe_entry(next)));

        loop {
            let Some(line) = self.debugger.read("sli_debug > ") else {
                self.debugger.stop_stepping();
                return;
            };
            if let Resume::Run = self.debug_command(line.trim(), depth) {
                return;
            }
        }
    }

    fn debug_command(&mut self, line: &str, depth: usize) -> Resume {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or("next");
        match command {
            "n" | "next" => {
                self.debugger.step_limit = depth;
                Resume::Run
            }
            "s" | "step" => {
                self.debugger.step_limit = depth.saturating_add(1);
                Resume::Run
            }
            "c" | "continue" => {
                self.debugger.stop_stepping();
                Resume::Run
            }
            "l" | "list" => {
                self.print_listing();
                Resume::Prompt
            }
            "w" | "where" => {
                self.print_backtrace(false);
                Resume::Prompt
            }
            "stack" => {
                self.print_operand_stack();
                Resume::Prompt
            }
            "estack" => {
                self.print_backtrace(true);
                Resume::Prompt
            }
            "depth" => {
                match words.next().map(str::parse::<usize>) {
                    Some(Ok(n)) => self.debugger.set_max_depth(n),
                    Some(Err(_)) => self.debug_print("depth expects a non-negative integer"),
                    None => {}
                }
                self.debug_print(&format!(
                    "call depth {depth}, stepping down to {}",
                    self.debugger.max_depth
                ));
                Resume::Prompt
            }
            "t" | "toggle" => {
                self.debugger.flags.toggle(DebugFlags::SHOW_STACK);
                let on = self.debugger.flags.contains(DebugFlags::SHOW_STACK);
                self.debug_print(&format!("show stack: {}", on_off(on)));
                Resume::Prompt
            }
            "catch" => {
                self.debugger.flags.toggle(DebugFlags::CATCH_ERRORS);
                let on = self.debugger.catches_errors();
                self.debug_print(&format!("catch errors: {}", on_off(on)));
                Resume::Prompt
            }
            "tail" => {
                self.config.tail_call_elision = !self.config.tail_call_elision;
                let on = self.config.tail_call_elision;
                self.debug_print(&format!(
                    "tail-call elision: {} (inactive while debugging)",
                    on_off(on)
                ));
                Resume::Prompt
            }
            "stop" => {
                self.estack.push_value(self.stop_fn.clone());
                Resume::Run
            }
            "i" | "inspect" => {
                self.inspect();
                Resume::Prompt
            }
            "h" | "help" | "?" => {
                self.debug_print(HELP);
                Resume::Prompt
            }
            "q" | "quit" => {
                self.debugger.stop_stepping();
                self.config.debug = false;
                Resume::Run
            }
            other => {
                self.debug_print(&format!("unknown command `{other}`; try help"));
                Resume::Prompt
            }
        }
    }

    /// Read and evaluate lines on the current stacks until `exit`, `quit`
    /// or end of input. Each line runs inside its own `stopped`.
    pub(crate) fn inspect(&mut self) {
        let debug = self.config.debug;
        self.config.debug = false;
        loop {
            let Some(line) = self.debugger.read("sli_inspect > ") else {
                break;
            };
            let line = line.trim();
            if line == "exit" || line == "quit" {
                break;
            }
            if line.is_empty() {
                continue;
            }
            let level = self.estack.len();
            self.estack.push_frame(Frame::Stopped);
            let source = StringSource::new(line).with_label("inspect");
            self.estack
                .push_value(Value::Stream(StreamHandle::new(Box::new(source), true)));
            if let ExecOutcome::ExitRequested(_) = self.execute(level) {
                break;
            }
            if let Ok(Value::Bool(true)) = self.ostack.pop() {
                self.report_error();
            }
        }
        self.config.debug = debug;
    }

    /// Entered on an unguarded error when error catching is on.
    pub(crate) fn debug_on_error(&mut self) {
        self.report_error();
        self.debug_print("entering inspect mode; leave with exit");
        self.inspect();
    }
}

fn on_off(on: bool) -> &'static str {
    if on {
        "on"
    } else {
        "off"
    }
}
