//! Type names after `::` and `as`, plus multi-word types anywhere.

use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::chars::{bareword_len, char_at, is_identifier_start};
use crate::lexer::error::LexError;
use crate::lexer::keywords::{KeywordParser, TYPE_TRIE};
use crate::lexer::token::TokenKind;

/// Reads type names.
///
/// After `::` the word is a `TYPE`. After `as` it could be a cast target or
/// an alias, so it is tagged `IDENTIFIER | TYPE` and the parser decides.
/// Elsewhere only multi-word types such as `double precision` are claimed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeReader;

impl TokenReader for TypeReader {
    fn name(&self) -> &'static str {
        "type"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        if !char_at(input, position).is_some_and(is_identifier_start) {
            return Ok(None);
        }

        let kind = match context.previous {
            Some(prev) if prev.is_operator("::") => Some(TokenKind::TYPE),
            Some(prev) if prev.is_command("as") => Some(TokenKind::IDENTIFIER | TokenKind::TYPE),
            _ => None,
        };

        let multi_word = KeywordParser::new(&TYPE_TRIE).parse(input, position);
        if let Some(found) = multi_word {
            return Ok(Some(Lexeme {
                kind: TokenKind::TYPE,
                text: found.keyword,
                start: position,
                end: found.end,
                comments: found.comments,
            }));
        }

        let Some(kind) = kind else {
            return Ok(None);
        };
        let end = position + bareword_len(input, position);
        Ok(Some(Lexeme::new(kind, &input[position..end], position, end)))
    }
}
