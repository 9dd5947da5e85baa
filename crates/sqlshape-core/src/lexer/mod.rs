//! SQL Lexer/Tokenizer
//!
//! Turns SQL text into tokens that carry normalized text, attached comments
//! and source positions. Recognition is split across ordered token readers
//! (see [`readers`]); the [`Tokenizer`] drives them one statement at a time.

pub mod chars;
mod error;
pub mod keywords;
pub mod readers;
mod span;
mod token;
mod tokenizer;
mod trivia;

pub use error::{LexError, LexErrorKind};
pub use span::{render_excerpt, LineIndex, Location, Span};
pub use token::{Token, TokenKind};
pub use tokenizer::{StatementReader, StatementSlice, Tokenizer};
pub use trivia::{skip_trivia, Trivia};

/// Tokenizes the first statement of `sql`.
///
/// # Errors
///
/// Returns a `LexError` for an unrecognized character or an unterminated
/// construct.
pub fn tokenize(sql: &str) -> Result<Vec<Token>, LexError> {
    Tokenizer::new(sql).tokenize()
}

/// Reads the statement starting at `start`, carrying `carry` comments in as
/// its leading comments. Returns `None` once `start` reaches the end of
/// input.
///
/// # Errors
///
/// Returns a `LexError` for malformed input within the statement.
pub fn read_next_statement(
    sql: &str,
    start: usize,
    carry: Vec<String>,
) -> Result<Option<StatementSlice>, LexError> {
    Tokenizer::new(sql).read_statement(start, carry)
}
