//! Interactive stepping debugger.
//!
//! The debugger adds no execution model of its own. When debug mode is on,
//! the loop calls [`Interpreter::debug_hook`] before every cycle; while
//! stepping, and while the call depth is within bounds, the hook shows the
//! next pending entry and reads commands until one of them resumes execution.
//!
//! Commands come from a [`DebugInput`] so tests can script a session.

mod session;

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use bitflags::bitflags;

bitflags! {
    /// Debugger switches.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DebugFlags: u8 {
        /// Prompt before each cycle.
        const STEP = 1 << 0;
        /// Show the operand stack with every prompt.
        const SHOW_STACK = 1 << 1;
        /// Enter `inspect` when an error reaches the top level.
        const CATCH_ERRORS = 1 << 2;
    }
}

/// Source of debugger commands.
pub trait DebugInput {
    /// Show `prompt` and return the next line, or `None` at end of input.
    fn read_command(&mut self, prompt: &str) -> Option<String>;
}

/// Reads commands from the terminal.
#[derive(Default)]
pub struct StdinDebugInput;

impl DebugInput for StdinDebugInput {
    fn read_command(&mut self, prompt: &str) -> Option<String> {
        {
            let mut out = std::io::stdout().lock();
            let _ = out.write_all(prompt.as_bytes());
            let _ = out.flush();
        }
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
        }
    }
}

/// Replays a fixed list of commands.
#[derive(Default)]
pub struct ScriptedDebugInput {
    lines: VecDeque<String>,
}

impl ScriptedDebugInput {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedDebugInput {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl DebugInput for ScriptedDebugInput {
    fn read_command(&mut self, _prompt: &str) -> Option<String> {
        self.lines.pop_front()
    }
}

/// Debugger state owned by an interpreter.
pub struct Debugger {
    input: Box<dyn DebugInput>,
    flags: DebugFlags,
    /// Deepest call depth at which stepping prompts (`depth`, `setmaxdepth`).
    max_depth: usize,
    /// Depth limit set by `next` / `step` for the current stepping run.
    step_limit: usize,
}

impl Debugger {
    pub fn new(input: Box<dyn DebugInput>) -> Self {
        Debugger {
            input,
            flags: DebugFlags::empty(),
            max_depth: usize::MAX,
            step_limit: usize::MAX,
        }
    }

    pub fn flags(&self) -> DebugFlags {
        self.flags
    }

    pub fn is_stepping(&self) -> bool {
        self.flags.contains(DebugFlags::STEP)
    }

    /// Start prompting before each cycle.
    pub fn start_stepping(&mut self) {
        self.flags.insert(DebugFlags::STEP);
        self.step_limit = usize::MAX;
    }

    pub fn stop_stepping(&mut self) {
        self.flags.remove(DebugFlags::STEP);
    }

    pub fn catches_errors(&self) -> bool {
        self.flags.contains(DebugFlags::CATCH_ERRORS)
    }

    pub fn set_catch_errors(&mut self, on: bool) {
        self.flags.set(DebugFlags::CATCH_ERRORS, on);
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn set_max_depth(&mut self, depth: usize) {
        self.max_depth = depth;
    }

    /// Whether a prompt is due at `call_depth`.
    fn prompts_at(&self, call_depth: usize) -> bool {
        self.is_stepping() && call_depth <= self.max_depth && call_depth <= self.step_limit
    }

    fn read(&mut self, prompt: &str) -> Option<String> {
        self.input.read_command(prompt)
    }
}
