//! Token readers.
//!
//! Each reader recognises one lexical category. `try_read` returns
//! `Ok(None)` when the input at the position is not its kind of token, so the
//! manager can try the next reader; it returns an error only for malformed
//! input of its own kind (an unterminated string, an unterminated bracket
//! identifier, ...).

mod command;
mod escaped_identifier;
mod function;
mod identifier;
mod literal;
mod operator;
mod parameter;
mod special_symbol;
mod string_specifier;
mod type_name;

pub use command::CommandReader;
pub use escaped_identifier::EscapedIdentifierReader;
pub use function::FunctionReader;
pub use identifier::IdentifierReader;
pub use literal::LiteralReader;
pub use operator::OperatorReader;
pub use parameter::ParameterReader;
pub use special_symbol::SpecialSymbolReader;
pub use string_specifier::StringSpecifierReader;
pub use type_name::TypeReader;

use tracing::trace;

use super::error::LexError;
use super::token::{Token, TokenKind};

/// What a reader knows about its surroundings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadContext<'t> {
    /// The token read just before this position, if any.
    pub previous: Option<&'t Token>,
    /// Number of `[` not yet closed.
    pub bracket_depth: usize,
}

impl ReadContext<'_> {
    /// Returns true if the previous token ends an operand.
    #[must_use]
    pub fn after_value(&self) -> bool {
        self.previous.is_some_and(Token::ends_value)
    }

    /// Returns true if the previous token has any of the given flags.
    #[must_use]
    pub fn previous_is(&self, kind: TokenKind) -> bool {
        self.previous.is_some_and(|token| token.is(kind))
    }
}

/// A token as produced by a reader, before positions and comments are
/// attached by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    /// Token classification.
    pub kind: TokenKind,
    /// Normalized text.
    pub text: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset right after the last character.
    pub end: usize,
    /// Comments found inside a multi-word keyword.
    pub comments: Vec<String>,
}

impl Lexeme {
    /// Creates a lexeme without inner comments.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            start,
            end,
            comments: Vec::new(),
        }
    }
}

/// One lexical category.
pub trait TokenReader: Send + Sync {
    /// Reader name, used in trace output.
    fn name(&self) -> &'static str;

    /// Tries to read a token of this reader's kind at `position`.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` only for malformed input of this reader's kind.
    fn try_read(
        &self,
        input: &str,
        position: usize,
        context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError>;
}

/// Tries readers in a fixed priority order.
///
/// The order encodes disambiguation: literals come before special symbols
/// and operators so `.5` and `-1` stay numbers, types come before functions
/// so `numeric(10, 2)` is a type, and identifiers are the catch-all.
pub struct TokenReaderManager {
    readers: Vec<Box<dyn TokenReader>>,
}

impl TokenReaderManager {
    /// Creates a manager with the standard reader order.
    #[must_use]
    pub fn new() -> Self {
        Self {
            readers: vec![
                Box::new(EscapedIdentifierReader),
                Box::new(ParameterReader),
                Box::new(StringSpecifierReader),
                Box::new(LiteralReader),
                Box::new(SpecialSymbolReader),
                Box::new(CommandReader),
                Box::new(OperatorReader),
                Box::new(TypeReader),
                Box::new(FunctionReader),
                Box::new(IdentifierReader),
            ],
        }
    }

    /// Names of the registered readers in priority order.
    pub fn reader_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.readers.iter().map(|reader| reader.name())
    }

    /// Returns the first token any reader recognises at `position`.
    ///
    /// The returned lexeme's `end` is the position reached by the winning
    /// reader; the caller resumes from there.
    ///
    /// # Errors
    ///
    /// Propagates the first reader error.
    pub fn try_read(
        &self,
        input: &str,
        position: usize,
        context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        for reader in &self.readers {
            if let Some(lexeme) = reader.try_read(input, position, context)? {
                trace!(
                    reader = reader.name(),
                    text = %lexeme.text,
                    start = lexeme.start,
                    end = lexeme.end,
                    "read token"
                );
                return Ok(Some(lexeme));
            }
        }
        Ok(None)
    }
}

impl Default for TokenReaderManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::lexer::span::Span;

    /// Builds a previous-token context of the given kind and text.
    pub fn previous(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text, Span::new(0, text.len()))
    }

    pub fn read(reader: &dyn TokenReader, input: &str) -> Option<Lexeme> {
        reader
            .try_read(input, 0, &ReadContext::default())
            .expect("reader failed")
    }

    pub fn read_after(reader: &dyn TokenReader, input: &str, prev: &Token) -> Option<Lexeme> {
        let context = ReadContext {
            previous: Some(prev),
            bracket_depth: 0,
        };
        reader.try_read(input, 0, &context).expect("reader failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_order() {
        let manager = TokenReaderManager::new();
        let names: Vec<_> = manager.reader_names().collect();
        assert_eq!(
            names,
            vec![
                "escaped identifier",
                "parameter",
                "string specifier",
                "literal",
                "special symbol",
                "command",
                "operator",
                "type",
                "function",
                "identifier",
            ]
        );
    }

    #[test]
    fn test_literal_wins_over_symbol() {
        let manager = TokenReaderManager::new();
        let lexeme = manager
            .try_read(".5", 0, &ReadContext::default())
            .unwrap()
            .unwrap();
        assert_eq!(lexeme.kind, TokenKind::LITERAL);
        assert_eq!(lexeme.text, "0.5");
    }

    #[test]
    fn test_unknown_character_is_none() {
        let manager = TokenReaderManager::new();
        assert!(manager
            .try_read("{x}", 0, &ReadContext::default())
            .unwrap()
            .is_none());
    }
}
