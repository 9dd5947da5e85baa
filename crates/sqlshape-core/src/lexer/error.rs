//! Lexical error types.

use super::span::{render_excerpt, LineIndex, Location};

/// What went wrong while reading characters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    /// No reader recognised the character.
    #[error("unexpected character '{0}': expected a SQL token")]
    UnexpectedCharacter(char),

    /// A quoted construct ran to the end of input.
    #[error("unterminated {construct}: expected closing {expected}, found end of input")]
    Unterminated {
        /// The construct being read (string literal, block comment, ...).
        construct: &'static str,
        /// The closing delimiter that was never found.
        expected: String,
    },
}

/// A fatal lexical error with position and rendered context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{kind} at position {position} (line {}, column {})\n{context}",
    .location.line,
    .location.column
)]
pub struct LexError {
    /// The error kind.
    pub kind: LexErrorKind,
    /// Byte offset where the offending construct starts.
    pub position: usize,
    /// Line/column of `position`.
    pub location: Location,
    /// The source line with a caret under `position`.
    pub context: String,
}

impl LexError {
    /// Creates an error for `kind` at `position` within `input`.
    #[must_use]
    pub fn new(kind: LexErrorKind, input: &str, position: usize) -> Self {
        let index = LineIndex::new(input);
        Self::with_index(kind, input, &index, position)
    }

    /// Like [`LexError::new`] but reuses an existing line index.
    #[must_use]
    pub fn with_index(kind: LexErrorKind, input: &str, index: &LineIndex, position: usize) -> Self {
        Self {
            kind,
            position,
            location: index.location(position),
            context: render_excerpt(input, index, position),
        }
    }

    /// Creates an "unterminated construct" error.
    #[must_use]
    pub fn unterminated(
        construct: &'static str,
        expected: impl Into<String>,
        input: &str,
        position: usize,
    ) -> Self {
        Self::new(
            LexErrorKind::Unterminated {
                construct,
                expected: expected.into(),
            },
            input,
            position,
        )
    }
}
