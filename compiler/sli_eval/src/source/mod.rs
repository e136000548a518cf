//! Token sources: where the execution loop reads values from.
//!
//! The lexical grammar lives in `sli_lexer`. This module interns names,
//! assembles `{ ... }` into procedure values, and exposes the result through
//! the [`TokenSource`] trait so the loop can read one value at a time from a
//! string, a blocking reader, or a list of command-line snippets.

use std::collections::VecDeque;
use std::fmt;
use std::io::BufRead;

use sli_ir::{Location, Span, StringInterner};
use sli_lexer::{lexemes, tokenize, LexErrorKind, LexemeKind};

use crate::errors::{self, SliError};
use crate::shared::LocalScope;
use crate::value::Value;

/// Error produced while reading values from a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("{kind} at {at}")]
    Lex { kind: LexErrorKind, at: Location },
    #[error("unmatched `}}` at {at}")]
    UnmatchedClose { at: Location },
    #[error("procedure opened at {at} is never closed")]
    UnclosedProcedure { at: Location },
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<&SourceError> for SliError {
    fn from(err: &SourceError) -> Self {
        match err {
            SourceError::Io(_) => errors::bad_io(err.to_string()),
            _ => errors::syntax_error(err.to_string()),
        }
    }
}

/// A pull-based supplier of values.
///
/// `Ok(None)` marks the end of the source. Reading may block (a reader over a
/// terminal waits for the next complete line).
pub trait TokenSource {
    fn next_value(&mut self, names: &StringInterner) -> Result<Option<Value>, SourceError>;

    /// Short description used in diagnostics.
    fn label(&self) -> &str {
        "stream"
    }
}

/// What reading one top-level value from text produced.
enum Step {
    Value(Value),
    /// The text is used up.
    End,
    /// The text stops inside a procedure, string or comment. The offset is
    /// left at the start of the unfinished value, and the error describes it
    /// in case no more text arrives.
    Incomplete(SourceError),
}

/// Read the next top-level value of `text` starting at byte `*offset`.
///
/// Only the lexemes making up that value are examined, and `*offset` moves
/// past them. On a syntax error `*offset` moves to the end of the text.
fn read_value(text: &str, offset: &mut usize, names: &StringInterner) -> Result<Step, SourceError> {
    let base = *offset;
    let at = |pos: usize| Span::from_range_saturating(pos..pos).locate(text);
    let mut open: Vec<(Vec<Value>, usize)> = Vec::new();

    for lexeme in lexemes(&text[base..]) {
        let lexeme = match lexeme {
            Ok(lexeme) => lexeme,
            Err(e) => {
                let incomplete = e.kind.is_incomplete();
                let err = SourceError::Lex {
                    kind: e.kind,
                    at: at(base + e.span.start as usize),
                };
                if incomplete {
                    *offset = base;
                    return Ok(Step::Incomplete(err));
                }
                *offset = text.len();
                return Err(err);
            }
        };
        let start = base + lexeme.span.start as usize;
        *offset = base + lexeme.span.end as usize;
        let value = match lexeme.kind {
            LexemeKind::Integer(n) => Value::Integer(n),
            LexemeKind::Double(d) => Value::Double(d),
            LexemeKind::Str(s) => Value::string(s),
            LexemeKind::LiteralName(s) => Value::LiteralName(names.intern(s)),
            LexemeKind::Name(s) => Value::Name(names.intern(s)),
            LexemeKind::ArrayOpen => Value::Name(names.intern("[")),
            LexemeKind::ArrayClose => Value::Name(names.intern("]")),
            LexemeKind::DictOpen => Value::Name(names.intern("<<")),
            LexemeKind::DictClose => Value::Name(names.intern(">>")),
            LexemeKind::ProcOpen => {
                open.push((Vec::new(), start));
                continue;
            }
            LexemeKind::ProcClose => match open.pop() {
                Some((items, _)) => Value::procedure(items),
                None => {
                    *offset = text.len();
                    return Err(SourceError::UnmatchedClose { at: at(start) });
                }
            },
        };
        match open.last_mut() {
            Some((items, _)) => items.push(value),
            None => return Ok(Step::Value(value)),
        }
    }

    match open.first() {
        Some((_, start)) => {
            *offset = base;
            Ok(Step::Incomplete(SourceError::UnclosedProcedure { at: at(*start) }))
        }
        None => {
            *offset = text.len();
            Ok(Step::End)
        }
    }
}

/// Convert a complete piece of text into values.
pub fn parse(text: &str, names: &StringInterner) -> Result<Vec<Value>, SourceError> {
    let mut offset = 0;
    let mut out = Vec::new();
    loop {
        match read_value(text, &mut offset, names)? {
            Step::Value(value) => out.push(value),
            Step::End => return Ok(out),
            Step::Incomplete(err) => return Err(err),
        }
    }
}

/// Whether `text` stops in the middle of a string, comment or procedure,
/// so an interactive reader should ask for another line.
pub fn needs_more_input(text: &str) -> bool {
    match tokenize(text) {
        Err(e) => e.kind.is_incomplete(),
        Ok(lexemes) => {
            let mut depth: i64 = 0;
            for lexeme in &lexemes {
                match lexeme.kind {
                    LexemeKind::ProcOpen => depth += 1,
                    LexemeKind::ProcClose => depth -= 1,
                    _ => {}
                }
            }
            depth > 0
        }
    }
}

/// Values read from an in-memory string, one top-level value at a time.
///
/// Values ahead of a syntax error are produced before the error is; the
/// text after it is dropped.
pub struct StringSource {
    text: String,
    offset: usize,
    label: String,
}

impl StringSource {
    pub fn new(text: impl Into<String>) -> Self {
        StringSource {
            text: text.into(),
            offset: 0,
            label: "string".to_string(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl TokenSource for StringSource {
    fn next_value(&mut self, names: &StringInterner) -> Result<Option<Value>, SourceError> {
        match read_value(&self.text, &mut self.offset, names)? {
            Step::Value(value) => Ok(Some(value)),
            Step::End => Ok(None),
            Step::Incomplete(err) => {
                self.offset = self.text.len();
                Err(err)
            }
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Values read line by line from a blocking reader.
///
/// Values are produced as soon as their text is complete. Lines are only
/// accumulated while a procedure, string or comment is still open. A syntax
/// error discards the rest of the pending text so the next line starts fresh.
pub struct ReaderSource<R> {
    reader: R,
    buffer: String,
    offset: usize,
    eof: bool,
    label: String,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R, label: impl Into<String>) -> Self {
        ReaderSource {
            reader,
            buffer: String::new(),
            offset: 0,
            eof: false,
            label: label.into(),
        }
    }
}

impl<R: BufRead> TokenSource for ReaderSource<R> {
    fn next_value(&mut self, names: &StringInterner) -> Result<Option<Value>, SourceError> {
        loop {
            match read_value(&self.buffer, &mut self.offset, names)? {
                Step::Value(value) => return Ok(Some(value)),
                Step::End if self.eof => return Ok(None),
                Step::Incomplete(err) if self.eof => {
                    self.offset = self.buffer.len();
                    return Err(err);
                }
                Step::End => {
                    self.buffer.clear();
                    self.offset = 0;
                }
                Step::Incomplete(_) => {}
            }
            match self.reader.read_line(&mut self.buffer) {
                Ok(0) => self.eof = true,
                Ok(_) => {}
                Err(e) => {
                    self.eof = true;
                    self.buffer.clear();
                    self.offset = 0;
                    return Err(e.into());
                }
            }
        }
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Values read from a list of snippets, one after the other.
///
/// Each snippet is converted on its own, so a syntax error in one does not
/// affect the others.
pub struct ArgsSource {
    pending: VecDeque<String>,
    current: Option<StringSource>,
}

impl ArgsSource {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ArgsSource {
            pending: args.into_iter().map(Into::into).collect(),
            current: None,
        }
    }
}

impl TokenSource for ArgsSource {
    fn next_value(&mut self, names: &StringInterner) -> Result<Option<Value>, SourceError> {
        loop {
            if let Some(current) = &mut self.current {
                match current.next_value(names) {
                    Ok(Some(value)) => return Ok(Some(value)),
                    Ok(None) => self.current = None,
                    Err(e) => {
                        self.current = None;
                        return Err(e);
                    }
                }
            }
            match self.pending.pop_front() {
                Some(arg) => self.current = Some(StringSource::new(arg)),
                None => return Ok(None),
            }
        }
    }

    fn label(&self) -> &str {
        "arguments"
    }
}

/// Stream value payload: an aliased source plus the executable flag.
#[derive(Clone)]
pub struct StreamHandle {
    source: LocalScope<Box<dyn TokenSource>>,
    executable: bool,
}

impl StreamHandle {
    pub fn new(source: Box<dyn TokenSource>, executable: bool) -> Self {
        StreamHandle {
            source: LocalScope::new(source),
            executable,
        }
    }

    #[inline]
    pub fn is_executable(&self) -> bool {
        self.executable
    }

    /// The same source with a different executable flag.
    #[must_use]
    pub fn with_executable(&self, executable: bool) -> Self {
        StreamHandle {
            source: self.source.clone(),
            executable,
        }
    }

    pub fn same_source(&self, other: &StreamHandle) -> bool {
        LocalScope::ptr_eq(&self.source, &other.source)
    }

    pub fn next_value(&self, names: &StringInterner) -> Result<Option<Value>, SourceError> {
        self.source.borrow_mut().next_value(names)
    }

    pub fn label(&self) -> String {
        self.source.borrow().label().to_string()
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("label", &self.label())
            .field("executable", &self.executable)
            .finish()
    }
}
