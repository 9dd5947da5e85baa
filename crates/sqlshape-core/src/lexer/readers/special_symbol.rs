//! Punctuation: parentheses, brackets, comma and dot.

use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::chars::char_at;
use crate::lexer::error::LexError;
use crate::lexer::token::TokenKind;

/// Reads `(`, `)`, `[`, `]`, `,` and `.`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpecialSymbolReader;

impl TokenReader for SpecialSymbolReader {
    fn name(&self) -> &'static str {
        "special symbol"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        _context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        let kind = match char_at(input, position) {
            Some('(') => TokenKind::OPEN_PAREN,
            Some(')') => TokenKind::CLOSE_PAREN,
            Some('[') => TokenKind::OPEN_BRACKET,
            Some(']') => TokenKind::CLOSE_BRACKET,
            Some(',') => TokenKind::COMMA,
            Some('.') => TokenKind::DOT,
            _ => return Ok(None),
        };
        Ok(Some(Lexeme::new(
            kind,
            &input[position..=position],
            position,
            position + 1,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::read;
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(read(&SpecialSymbolReader, "(").unwrap().kind, TokenKind::OPEN_PAREN);
        assert_eq!(read(&SpecialSymbolReader, "]").unwrap().kind, TokenKind::CLOSE_BRACKET);
        assert_eq!(read(&SpecialSymbolReader, ", b").unwrap().text, ",");
        assert_eq!(read(&SpecialSymbolReader, ".*").unwrap().kind, TokenKind::DOT);
        assert!(read(&SpecialSymbolReader, ";").is_none());
    }
}
