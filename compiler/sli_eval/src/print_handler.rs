//! Where user-visible text goes.
//!
//! `=`, `==`, `message`, error reports and the debugger all write through one
//! [`PrintHandlerImpl`], shared as an `Arc`:
//! - `Stdout`: output on standard output, diagnostics on standard error
//! - `Buffer`: captured in memory, for tests and embedding hosts
//! - `Silent`: discarded
//!
//! Every call hands over its complete text in one locked write, so a
//! multi-line message emitted from another thread is never split by someone
//! else's line.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Stream a piece of text belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    /// Results the script asked for: `=`, `==`, `stack`, info messages.
    Output,
    /// Error reports and messages at `M_ERROR` and above.
    Diagnostic,
}

/// Writes to the process streams.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    fn write(&self, channel: Channel, text: &str) {
        // A closed pipe is not the script's problem; drop the text.
        let _ = match channel {
            Channel::Output => {
                let mut out = std::io::stdout().lock();
                out.write_all(text.as_bytes()).and_then(|()| out.flush())
            }
            Channel::Diagnostic => std::io::stderr().lock().write_all(text.as_bytes()),
        };
    }
}

#[derive(Default)]
struct Captured {
    /// Both channels, in write order.
    all: String,
    diagnostics: String,
}

/// Keeps everything written in memory.
#[derive(Default)]
pub struct BufferPrintHandler {
    captured: Mutex<Captured>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self, channel: Channel, text: &str) {
        let mut captured = self.captured.lock();
        captured.all.push_str(text);
        if channel == Channel::Diagnostic {
            captured.diagnostics.push_str(text);
        }
    }

    /// Everything written so far, output and diagnostics interleaved.
    pub fn get_output(&self) -> String {
        self.captured.lock().all.clone()
    }

    /// Only the diagnostic channel.
    pub fn get_diagnostics(&self) -> String {
        self.captured.lock().diagnostics.clone()
    }

    pub fn clear(&self) {
        let mut captured = self.captured.lock();
        captured.all.clear();
        captured.diagnostics.clear();
    }
}

pub enum PrintHandlerImpl {
    Stdout(StdoutPrintHandler),
    Buffer(BufferPrintHandler),
    Silent,
}

impl PrintHandlerImpl {
    /// Write `text` as is.
    pub fn write(&self, channel: Channel, text: &str) {
        match self {
            Self::Stdout(h) => h.write(channel, text),
            Self::Buffer(h) => h.write(channel, text),
            Self::Silent => {}
        }
    }

    fn write_line(&self, channel: Channel, text: &str) {
        let mut line = String::with_capacity(text.len() + 1);
        line.push_str(text);
        line.push('\n');
        self.write(channel, &line);
    }

    pub fn print(&self, text: &str) {
        self.write(Channel::Output, text);
    }

    pub fn println(&self, text: &str) {
        self.write_line(Channel::Output, text);
    }

    pub fn eprintln(&self, text: &str) {
        self.write_line(Channel::Diagnostic, text);
    }

    /// Captured text; empty unless this is a buffer.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_output(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    /// Captured diagnostics; empty unless this is a buffer.
    pub fn get_diagnostics(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_diagnostics(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout(StdoutPrintHandler))
}

pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn buffer_keeps_write_order_across_channels() {
        let handler = buffer_handler();
        handler.print("1 ");
        handler.println("2");
        handler.eprintln("Error: /StackUnderflow in pop");
        handler.println("3");
        assert_eq!(
            handler.get_output(),
            "1 2\nError: /StackUnderflow in pop\n3\n"
        );
        assert_eq!(handler.get_diagnostics(), "Error: /StackUnderflow in pop\n");
    }

    #[test]
    fn clear_empties_both_channels() {
        let handler = buffer_handler();
        handler.println("out");
        handler.eprintln("err");
        handler.clear();
        assert_eq!(handler.get_output(), "");
        assert_eq!(handler.get_diagnostics(), "");
    }

    #[test]
    fn non_buffers_capture_nothing() {
        for handler in [stdout_handler(), silent_handler()] {
            assert_eq!(handler.get_output(), "");
            assert_eq!(handler.get_diagnostics(), "");
        }
        let silent = silent_handler();
        silent.println("dropped");
        silent.write(Channel::Diagnostic, "dropped");
        assert_eq!(silent.get_output(), "");
    }

    #[test]
    fn concurrent_messages_do_not_interleave() {
        let handler = buffer_handler();
        let other = handler.clone();

        let worker = std::thread::spawn(move || {
            for _ in 0..100 {
                other.println("WARNING [worker]: first line\n    second line");
            }
        });
        for _ in 0..100 {
            handler.eprintln("ERROR [main]: single line");
        }
        worker.join().unwrap();

        let output = handler.get_output();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 300);
        for (i, line) in lines.iter().enumerate() {
            if line.starts_with("    second") {
                assert!(lines[i - 1].starts_with("WARNING"));
            }
        }
    }
}
