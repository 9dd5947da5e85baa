//! Quoted identifiers: `"name"`, `` `name` `` and `[name]`.

use std::sync::LazyLock;

use regex::Regex;

use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::chars::char_at;
use crate::lexer::error::LexError;
use crate::lexer::token::TokenKind;

/// A bracketed word only counts as an identifier if it looks like one;
/// anything else inside `[...]` is array syntax.
static BRACKET_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("Invalid bracket identifier regex")
});

/// Reads identifiers quoted with `"`, `` ` `` or `[ ]`.
///
/// The token text is the unquoted name; a doubled quote inside the name
/// stands for one quote character.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapedIdentifierReader;

impl TokenReader for EscapedIdentifierReader {
    fn name(&self) -> &'static str {
        "escaped identifier"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        match char_at(input, position) {
            Some(quote @ ('"' | '`')) => read_quoted(input, position, quote).map(Some),
            Some('[') => read_bracketed(input, position, context),
            _ => Ok(None),
        }
    }
}

fn read_quoted(input: &str, position: usize, quote: char) -> Result<Lexeme, LexError> {
    let body_start = position + quote.len_utf8();
    let mut name = String::new();
    let mut chars = input[body_start..].char_indices().peekable();

    while let Some((offset, c)) = chars.next() {
        if c != quote {
            name.push(c);
            continue;
        }
        if chars.peek().is_some_and(|(_, next)| *next == quote) {
            name.push(quote);
            chars.next();
            continue;
        }
        let end = body_start + offset + quote.len_utf8();
        return Ok(Lexeme::new(TokenKind::IDENTIFIER, name, position, end));
    }

    Err(LexError::unterminated(
        "quoted identifier",
        quote.to_string(),
        input,
        position,
    ))
}

fn read_bracketed(
    input: &str,
    position: usize,
    context: &ReadContext<'_>,
) -> Result<Option<Lexeme>, LexError> {
    // `arr[1]`, `f(x)[2]`: subscript, not an identifier.
    if context.after_value() {
        return Ok(None);
    }

    let body_start = position + 1;
    let rest = &input[body_start..];
    match rest.find(']') {
        Some(close) => {
            let body = &rest[..close];
            if BRACKET_IDENTIFIER.is_match(body) {
                let end = body_start + close + 1;
                Ok(Some(Lexeme::new(TokenKind::IDENTIFIER, body, position, end)))
            } else {
                Ok(None)
            }
        }
        None => {
            let body = rest.trim_end();
            if !body.is_empty() && BRACKET_IDENTIFIER.is_match(body) {
                Err(LexError::unterminated(
                    "bracket identifier",
                    "]",
                    input,
                    position,
                ))
            } else {
                Ok(None)
            }
        }
    }
}
