//! Error types for primitive handlers and the execution loop.
//!
//! Handlers return `Result<(), SliError>`. The execution loop catches every
//! `SliError` exactly once and funnels it into the script-level error
//! protocol (`raiseerror`), so a handler never has to touch the error record
//! itself.
//!
//! `ErrorKind` carries the script-visible error name. Factory functions
//! (`stack_underflow()`, `argument_type()`, ...) are the public way to build
//! errors and keep the messages in one place.

use std::fmt;

use crate::value::TypeTag;

/// Result of a primitive handler.
pub type SliResult<T = ()> = Result<T, SliError>;

/// Script-visible error category.
///
/// `name()` is the literal name stored as `errorname` in the error record,
/// so scripts can match on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ArgumentType,
    StackUnderflow,
    UndefinedName,
    WriteProtected,
    DivisionByZero,
    RangeCheck,
    PositiveIntegerExpected,
    BadIO,
    CycleGuard,
    SystemSignal,
    BadErrorHandler,
    KernelError,
    UnmatchedMarker,
    SyntaxError,
    EStackUnderflow,
    DictStackUnderflow,
    InvalidTrie,
}

impl ErrorKind {
    /// The error name as scripts see it.
    pub fn name(self) -> &'static str {
        match self {
            Self::ArgumentType => "ArgumentType",
            Self::StackUnderflow => "StackUnderflow",
            Self::UndefinedName => "UndefinedName",
            Self::WriteProtected => "WriteProtected",
            Self::DivisionByZero => "DivisionByZero",
            Self::RangeCheck => "RangeCheck",
            Self::PositiveIntegerExpected => "PositiveIntegerExpected",
            Self::BadIO => "BadIO",
            Self::CycleGuard => "CycleGuard",
            Self::SystemSignal => "SystemSignal",
            Self::BadErrorHandler => "BadErrorHandler",
            Self::KernelError => "KernelError",
            Self::UnmatchedMarker => "UnmatchedMarker",
            Self::SyntaxError => "SyntaxError",
            Self::EStackUnderflow => "EStackUnderflow",
            Self::DictStackUnderflow => "DictStackUnderflow",
            Self::InvalidTrie => "InvalidTrie",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error raised by a primitive or by the execution loop.
///
/// The failing command is not stored here: the loop knows which command it
/// was running and supplies it when the error is raised.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SliError {
    pub kind: ErrorKind,
    /// Optional human-readable detail, copied into the error record.
    pub message: Option<String>,
}

impl SliError {
    /// Create an error without detail text.
    pub fn new(kind: ErrorKind) -> Self {
        SliError {
            kind,
            message: None,
        }
    }

    /// Create an error with detail text.
    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        SliError {
            kind,
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for SliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{}: {msg}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for SliError {}

// Stack errors

/// Fewer operands than the command needs.
#[cold]
pub fn stack_underflow(needed: usize, found: usize) -> SliError {
    SliError::with_message(
        ErrorKind::StackUnderflow,
        format!("{needed} operand(s) required, {found} available"),
    )
}

/// An operand has the wrong type. `position` counts from the top, 1 = top.
#[cold]
pub fn argument_type(position: usize, expected: &str, found: TypeTag) -> SliError {
    SliError::with_message(
        ErrorKind::ArgumentType,
        format!("argument {position} must be {expected}, found {}", found.name()),
    )
}

/// `counttomark` or a closing bracket found no mark.
#[cold]
pub fn unmatched_marker() -> SliError {
    SliError::with_message(ErrorKind::UnmatchedMarker, "no mark on the operand stack")
}

/// `exit` with no enclosing loop.
#[cold]
pub fn estack_underflow() -> SliError {
    SliError::with_message(
        ErrorKind::EStackUnderflow,
        "exit called outside of a loop",
    )
}

/// `end` would pop one of the permanent dictionaries.
#[cold]
pub fn dict_stack_underflow() -> SliError {
    SliError::with_message(
        ErrorKind::DictStackUnderflow,
        "cannot pop a permanent dictionary",
    )
}

// Name and dictionary errors

/// Name has no binding on the dictionary stack.
#[cold]
pub fn undefined_name(name: &str) -> SliError {
    SliError::with_message(ErrorKind::UndefinedName, format!("/{name} is not defined"))
}

/// Attempt to modify a protected dictionary.
#[cold]
pub fn write_protected(name: &str) -> SliError {
    SliError::with_message(
        ErrorKind::WriteProtected,
        format!("cannot bind /{name} in a protected dictionary"),
    )
}

// Arithmetic and range errors

#[cold]
pub fn division_by_zero() -> SliError {
    SliError::new(ErrorKind::DivisionByZero)
}

/// An integer operation overflowed.
#[cold]
pub fn integer_overflow(operation: &str) -> SliError {
    SliError::with_message(
        ErrorKind::RangeCheck,
        format!("integer overflow in {operation}"),
    )
}

/// Index or count outside the valid range.
#[cold]
pub fn range_check(detail: impl Into<String>) -> SliError {
    SliError::with_message(ErrorKind::RangeCheck, detail)
}

/// A count that must not be negative was negative.
#[cold]
pub fn positive_integer_expected(found: i64) -> SliError {
    SliError::with_message(
        ErrorKind::PositiveIntegerExpected,
        format!("expected a non-negative integer, found {found}"),
    )
}

// Dispatch errors

#[cold]
pub fn duplicate_signature(name: &str) -> SliError {
    SliError::with_message(
        ErrorKind::InvalidTrie,
        format!("{name} already has a variant with this signature"),
    )
}

#[cold]
pub fn empty_signature(name: &str) -> SliError {
    SliError::with_message(
        ErrorKind::InvalidTrie,
        format!("{name}: a variant needs at least one parameter type"),
    )
}

#[cold]
pub fn unknown_type_name(name: &str) -> SliError {
    SliError::with_message(ErrorKind::InvalidTrie, format!("/{name} is not a type name"))
}

// Input errors

#[cold]
pub fn syntax_error(detail: impl Into<String>) -> SliError {
    SliError::with_message(ErrorKind::SyntaxError, detail)
}

#[cold]
pub fn bad_io(detail: impl Into<String>) -> SliError {
    SliError::with_message(ErrorKind::BadIO, detail)
}

// Runtime supervision errors

#[cold]
pub fn cycle_guard(limit: u64) -> SliError {
    SliError::with_message(
        ErrorKind::CycleGuard,
        format!("cycle guard of {limit} cycles exceeded"),
    )
}

#[cold]
pub fn system_signal(signal: i32) -> SliError {
    SliError::with_message(ErrorKind::SystemSignal, format!("caught signal {signal}"))
}

#[cold]
pub fn kernel_error(detail: impl Into<String>) -> SliError {
    SliError::with_message(ErrorKind::KernelError, detail)
}

#[cfg(test)]
mod tests;
