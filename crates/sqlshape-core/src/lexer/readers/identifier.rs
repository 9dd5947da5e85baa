//! Plain identifiers: the catch-all reader.

use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::chars::{bareword_len, char_at, is_delimiter, is_digit};
use crate::lexer::error::LexError;
use crate::lexer::token::TokenKind;

/// Reads any bareword as an identifier, keeping its case.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierReader;

impl TokenReader for IdentifierReader {
    fn name(&self) -> &'static str {
        "identifier"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        _context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        match char_at(input, position) {
            Some(c) if !is_delimiter(c) && !is_digit(c) => {}
            _ => return Ok(None),
        }
        let end = position + bareword_len(input, position);
        Ok(Some(Lexeme::new(
            TokenKind::IDENTIFIER,
            &input[position..end],
            position,
            end,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::read;
    use super::*;

    #[test]
    fn test_keeps_case() {
        let lexeme = read(&IdentifierReader, "UserName = 1").unwrap();
        assert_eq!(lexeme.kind, TokenKind::IDENTIFIER);
        assert_eq!(lexeme.text, "UserName");
        assert_eq!(lexeme.end, 8);
    }

    #[test]
    fn test_stops_at_dot() {
        assert_eq!(read(&IdentifierReader, "t.id").unwrap().text, "t");
    }

    #[test]
    fn test_non_identifiers() {
        assert!(read(&IdentifierReader, "{").is_none());
        assert!(read(&IdentifierReader, ";").is_none());
    }
}
