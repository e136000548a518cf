//! Tokenizer for SLI source text, built on `logos`.
//!
//! This is the replaceable front end: it turns text into lexemes with byte
//! spans and nothing more. Interning names and assembling procedures into
//! values happens in `sli_eval::source`, so a different surface grammar can
//! be swapped in without touching the runtime.
//!
//! # Grammar
//!
//! - Integers `42`, `-7`; doubles `1.5`, `.5`, `2e3`, `-1.0e-2`
//! - Strings `(text)` with balanced nested parentheses and `\n \t \r \\ \( \)` escapes
//! - Literal names `/name`, executable names `name`
//! - Structural tokens `{ } [ ] << >>`
//! - Comments `% to end of line` and `/* block */`

use logos::{FilterResult, Lexer, Logos};
use sli_ir::Span;

/// Why a piece of source text could not be tokenized.
#[derive(Clone, Debug, Default, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[default]
    #[error("unexpected character")]
    UnexpectedCharacter,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("integer literal out of range")]
    IntegerOutOfRange,
    #[error("malformed number")]
    InvalidNumber,
}

impl LexErrorKind {
    /// Whether more input could complete the text (a streaming source should
    /// read another line instead of reporting the error).
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::UnterminatedString | Self::UnterminatedComment)
    }
}

/// A tokenizer error with the location it was detected at.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at byte {}", .span.start)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Raw token from logos.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"%[^\n]*")]
enum RawToken<'s> {
    #[token("/*", block_comment)]
    BlockComment,

    #[regex(r"-?[0-9]+", parse_int, priority = 6)]
    Integer(i64),

    #[regex(r"-?([0-9]+\.[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?", parse_double, priority = 6)]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+", parse_double, priority = 6)]
    Double(f64),

    #[token("(", lex_string)]
    Str(String),

    #[regex(r"/[^ \t\r\n\f(){}\[\]<>/%*][^ \t\r\n\f(){}\[\]<>/%]*", |lex| &lex.slice()[1..])]
    LiteralName(&'s str),

    #[regex(r"[^ \t\r\n\f(){}\[\]<>/%]+", |lex| lex.slice(), priority = 1)]
    Name(&'s str),

    #[token("{")]
    ProcOpen,
    #[token("}")]
    ProcClose,
    #[token("[")]
    ArrayOpen,
    #[token("]")]
    ArrayClose,
    #[token("<<")]
    DictOpen,
    #[token(">>")]
    DictClose,
}

fn parse_int<'s>(lex: &mut Lexer<'s, RawToken<'s>>) -> Result<i64, LexErrorKind> {
    lex.slice()
        .parse()
        .map_err(|_| LexErrorKind::IntegerOutOfRange)
}

fn parse_double<'s>(lex: &mut Lexer<'s, RawToken<'s>>) -> Result<f64, LexErrorKind> {
    lex.slice().parse().map_err(|_| LexErrorKind::InvalidNumber)
}

fn block_comment<'s>(lex: &mut Lexer<'s, RawToken<'s>>) -> FilterResult<(), LexErrorKind> {
    if let Some(end) = lex.remainder().find("*/") {
        lex.bump(end + 2);
        FilterResult::Skip
    } else {
        lex.bump(lex.remainder().len());
        FilterResult::Error(LexErrorKind::UnterminatedComment)
    }
}

/// Scan a parenthesized string body; the opening `(` is already consumed.
fn lex_string<'s>(lex: &mut Lexer<'s, RawToken<'s>>) -> Result<String, LexErrorKind> {
    let rest = lex.remainder();
    let mut out = String::new();
    let mut depth = 0usize;
    let mut chars = rest.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, '(')) => out.push('('),
                Some((_, ')')) => out.push(')'),
                // line continuation
                Some((_, '\n')) => {}
                Some((_, other)) => {
                    out.push('\\');
                    out.push(other);
                }
                None => break,
            },
            '(' => {
                depth += 1;
                out.push(c);
            }
            ')' if depth == 0 => {
                lex.bump(i + 1);
                return Ok(out);
            }
            ')' => {
                depth -= 1;
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    lex.bump(rest.len());
    Err(LexErrorKind::UnterminatedString)
}

/// The kind of a lexeme, borrowing name spellings from the source.
#[derive(Clone, Debug, PartialEq)]
pub enum LexemeKind<'s> {
    Integer(i64),
    Double(f64),
    Str(String),
    LiteralName(&'s str),
    Name(&'s str),
    ProcOpen,
    ProcClose,
    ArrayOpen,
    ArrayClose,
    DictOpen,
    DictClose,
}

/// A lexeme and its location.
#[derive(Clone, Debug, PartialEq)]
pub struct Lexeme<'s> {
    pub kind: LexemeKind<'s>,
    pub span: Span,
}

/// Lexemes of `source`, produced on demand.
///
/// Iteration stops after the first error, so text following a bad token is
/// never looked at.
pub struct Lexemes<'s> {
    lexer: Lexer<'s, RawToken<'s>>,
    failed: bool,
}

impl<'s> Iterator for Lexemes<'s> {
    type Item = Result<Lexeme<'s>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let result = self.lexer.next()?;
            let span = Span::from_range_saturating(self.lexer.span());
            let kind = match result {
                Ok(RawToken::BlockComment) => continue,
                Ok(RawToken::Integer(n)) => LexemeKind::Integer(n),
                Ok(RawToken::Double(d)) => LexemeKind::Double(d),
                Ok(RawToken::Str(s)) => LexemeKind::Str(s),
                Ok(RawToken::LiteralName(s)) => LexemeKind::LiteralName(s),
                Ok(RawToken::Name(s)) => LexemeKind::Name(s),
                Ok(RawToken::ProcOpen) => LexemeKind::ProcOpen,
                Ok(RawToken::ProcClose) => LexemeKind::ProcClose,
                Ok(RawToken::ArrayOpen) => LexemeKind::ArrayOpen,
                Ok(RawToken::ArrayClose) => LexemeKind::ArrayClose,
                Ok(RawToken::DictOpen) => LexemeKind::DictOpen,
                Ok(RawToken::DictClose) => LexemeKind::DictClose,
                Err(kind) => {
                    self.failed = true;
                    return Some(Err(LexError { kind, span }));
                }
            };
            return Some(Ok(Lexeme { kind, span }));
        }
    }
}

impl std::iter::FusedIterator for Lexemes<'_> {}

/// Start tokenizing `source`.
pub fn lexemes(source: &str) -> Lexemes<'_> {
    Lexemes {
        lexer: RawToken::lexer(source),
        failed: false,
    }
}

/// Tokenize a complete piece of source text.
pub fn tokenize(source: &str) -> Result<Vec<Lexeme<'_>>, LexError> {
    lexemes(source).collect()
}

#[cfg(test)]
mod tests;
