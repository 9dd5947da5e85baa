//! Function names.

use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::chars::{bareword_len, char_at, is_identifier_start, is_whitespace};
use crate::lexer::error::LexError;
use crate::lexer::token::TokenKind;

/// Reads a bareword directly followed (whitespace allowed) by `(`.
///
/// The name keeps its source spelling. Table and CTE names followed by a
/// column list come through here too, so the parser decides whether case
/// matters.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionReader;

impl TokenReader for FunctionReader {
    fn name(&self) -> &'static str {
        "function"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        _context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        if !char_at(input, position).is_some_and(is_identifier_start) {
            return Ok(None);
        }
        let end = position + bareword_len(input, position);
        let followed_by_paren = input[end..].trim_start_matches(is_whitespace).starts_with('(');
        if !followed_by_paren {
            return Ok(None);
        }
        Ok(Some(Lexeme::new(
            TokenKind::FUNCTION,
            input[position..end].to_string(),
            position,
            end,
        )))
    }
}
