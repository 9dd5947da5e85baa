//! SQL keywords, join keywords and optimizer hints.

use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::error::LexError;
use crate::lexer::keywords::{KeywordMatch, KeywordParser, COMMAND_TRIE, JOIN_TRIE};
use crate::lexer::token::TokenKind;
use crate::lexer::trivia::{block_comment_len, is_hint_start};

/// Reads keywords by longest match. Hints keep their full `/*+ ... */` text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandReader;

impl TokenReader for CommandReader {
    fn name(&self) -> &'static str {
        "command"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        if is_hint_start(input, position) {
            let Some(len) = block_comment_len(&input[position..]) else {
                return Err(LexError::unterminated("optimizer hint", "*/", input, position));
            };
            let end = position + len;
            return Ok(Some(Lexeme::new(
                TokenKind::COMMAND,
                &input[position..end],
                position,
                end,
            )));
        }

        // `t.from` names a column.
        if context.previous_is(TokenKind::DOT) {
            return Ok(None);
        }

        let found = KeywordParser::new(&JOIN_TRIE)
            .parse(input, position)
            .or_else(|| KeywordParser::new(&COMMAND_TRIE).parse(input, position));
        Ok(found.map(|keyword| into_lexeme(keyword, position)))
    }
}

fn into_lexeme(found: KeywordMatch, position: usize) -> Lexeme {
    Lexeme {
        kind: TokenKind::COMMAND,
        text: found.keyword,
        start: position,
        end: found.end,
        comments: found.comments,
    }
}
