//! The execution stack and its continuation frames.
//!
//! Control primitives never recurse on the host stack. Each active construct
//! is one fixed-shape [`Frame`] on the execution stack that the loop rewrites
//! in place, so iteration count does not affect stack depth; only nesting does.

use crate::value::{Heap, Name, RangeIter, Value};
use crate::OperandStack;

/// Pending work: a value to evaluate or a continuation frame.
#[derive(Clone, Debug)]
pub enum ExecEntry {
    Value(Value),
    Frame(Frame),
}

/// Continuation record of an active control construct.
#[derive(Clone, Debug)]
pub enum Frame {
    /// A procedure body being executed element by element.
    Iterate { proc: Heap<Vec<Value>>, pos: usize },
    /// `loop`: the body is iterated in place forever.
    Loop { proc: Heap<Vec<Value>>, pos: usize },
    /// `repeat`: the body is iterated in place `remaining` more times.
    Repeat {
        proc: Heap<Vec<Value>>,
        pos: usize,
        remaining: u64,
    },
    /// `for`: pushes the counter, then runs `body`.
    For { body: Value, counter: ForCounter },
    /// `forall` / `forallindexed`.
    Forall {
        source: ForallSource,
        index: usize,
        body: Value,
        indexed: bool,
    },
    /// Marker left by `stopped`; `stop` unwinds to it.
    Stopped,
}

impl Frame {
    /// Name used when the frame is shown in backtraces and stack snapshots.
    pub fn label(&self) -> &'static str {
        match self {
            Frame::Iterate { .. } => "%iterate",
            Frame::Loop { .. } => "%loop",
            Frame::Repeat { .. } => "%repeat",
            Frame::For { .. } => "%for",
            Frame::Forall { indexed: false, .. } => "%forall",
            Frame::Forall { indexed: true, .. } => "%forallindexed",
            Frame::Stopped => "%stopped",
        }
    }

    /// Whether `exit` terminates this frame.
    pub fn is_loop(&self) -> bool {
        matches!(
            self,
            Frame::Loop { .. } | Frame::Repeat { .. } | Frame::For { .. } | Frame::Forall { .. }
        )
    }

    /// Whether this frame counts towards the call depth.
    pub fn is_call(&self) -> bool {
        matches!(self, Frame::Iterate { .. })
    }
}

/// Counter state of a `for` frame.
#[derive(Clone, Copy, Debug)]
pub enum ForCounter {
    Integer {
        next: i64,
        step: i64,
        limit: i64,
        done: bool,
    },
    Double {
        next: f64,
        step: f64,
        limit: f64,
    },
}

impl ForCounter {
    pub fn integer(start: i64, step: i64, limit: i64) -> Self {
        ForCounter::Integer {
            next: start,
            step,
            limit,
            done: false,
        }
    }

    pub fn double(start: f64, step: f64, limit: f64) -> Self {
        ForCounter::Double {
            next: start,
            step,
            limit,
        }
    }

    /// The next counter value, or `None` once the limit is passed.
    ///
    /// A zero step yields nothing.
    pub fn advance(&mut self) -> Option<Value> {
        match self {
            ForCounter::Integer {
                next,
                step,
                limit,
                done,
            } => {
                let in_range = (*step > 0 && *next <= *limit) || (*step < 0 && *next >= *limit);
                if *done || !in_range {
                    return None;
                }
                let current = *next;
                match next.checked_add(*step) {
                    Some(n) => *next = n,
                    None => *done = true,
                }
                Some(Value::Integer(current))
            }
            ForCounter::Double { next, step, limit } => {
                let in_range = (*step > 0.0 && *next <= *limit) || (*step < 0.0 && *next >= *limit);
                if !in_range {
                    return None;
                }
                let current = *next;
                *next += *step;
                Some(Value::Double(current))
            }
        }
    }
}

/// What a `forall` frame iterates over.
#[derive(Clone, Debug)]
pub enum ForallSource {
    /// Array or procedure elements.
    Elements(Heap<Vec<Value>>),
    /// String bytes, pushed as integers.
    Bytes(Heap<String>),
    /// Dictionary snapshot, pushed as key/value pairs.
    Entries(Vec<(Name, Value)>),
    Range(RangeIter),
}

impl ForallSource {
    /// Push the item at `index`; `false` once the source is exhausted.
    pub fn push_item(&self, index: usize, ostack: &mut OperandStack) -> bool {
        match self {
            ForallSource::Elements(items) => match items.get(index) {
                Some(v) => ostack.push(v.clone()),
                None => return false,
            },
            ForallSource::Bytes(s) => match s.as_bytes().get(index) {
                Some(b) => ostack.push(Value::Integer(i64::from(*b))),
                None => return false,
            },
            ForallSource::Entries(entries) => match entries.get(index) {
                Some((key, value)) => {
                    ostack.push(Value::LiteralName(*key));
                    ostack.push(value.clone());
                }
                None => return false,
            },
            ForallSource::Range(range) => match range.get(index) {
                Some(n) => ostack.push(Value::Integer(n)),
                None => return false,
            },
        }
        true
    }
}

/// Execution stack with call-depth and high-water tracking.
#[derive(Debug, Default)]
pub struct ExecStack {
    entries: Vec<ExecEntry>,
    /// Number of `Iterate` frames on the stack.
    call_depth: usize,
    /// Largest length seen so far.
    peak: usize,
}

impl ExecStack {
    pub fn new() -> Self {
        ExecStack::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub fn peak(&self) -> usize {
        self.peak
    }

    #[inline]
    pub fn push(&mut self, entry: ExecEntry) {
        if let ExecEntry::Frame(frame) = &entry {
            if frame.is_call() {
                self.call_depth += 1;
            }
        }
        self.entries.push(entry);
        self.peak = self.peak.max(self.entries.len());
    }

    #[inline]
    pub fn push_value(&mut self, value: Value) {
        self.push(ExecEntry::Value(value));
    }

    #[inline]
    pub fn push_frame(&mut self, frame: Frame) {
        self.push(ExecEntry::Frame(frame));
    }

    #[inline]
    pub fn pop(&mut self) -> Option<ExecEntry> {
        let entry = self.entries.pop()?;
        if let ExecEntry::Frame(frame) = &entry {
            if frame.is_call() {
                self.call_depth -= 1;
            }
        }
        Some(entry)
    }

    #[inline]
    pub fn top(&self) -> Option<&ExecEntry> {
        self.entries.last()
    }

    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut ExecEntry> {
        self.entries.last_mut()
    }

    /// Replace the top entry.
    pub fn replace_top(&mut self, value: Value) {
        self.pop();
        self.push_value(value);
    }

    /// Shrink to `len` entries.
    pub fn truncate(&mut self, len: usize) {
        while self.entries.len() > len {
            self.pop();
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.call_depth = 0;
    }

    /// Index (from the bottom) of the nearest entry matching `pred`.
    pub fn rfind_frame(&self, mut pred: impl FnMut(&Frame) -> bool) -> Option<usize> {
        self.entries.iter().rposition(|entry| match entry {
            ExecEntry::Frame(frame) => pred(frame),
            ExecEntry::Value(_) => false,
        })
    }

    /// Entries bottom to top.
    pub fn entries(&self) -> &[ExecEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests;
