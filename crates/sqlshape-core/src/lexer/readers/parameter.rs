//! Parameter placeholders: `?`, `$1`, `:name`, `@name` and `${name}`.

use super::literal::{is_dollar_quote_start, is_money_literal};
use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::chars::{bareword_len, char_at, is_digit, is_identifier_start, is_operator_symbol};
use crate::lexer::error::LexError;
use crate::lexer::token::TokenKind;

/// Reads parameter placeholders.
///
/// The text keeps its prefix (`$1`, `:id`) so the placeholder style survives
/// rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterReader;

impl TokenReader for ParameterReader {
    fn name(&self) -> &'static str {
        "parameter"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        let Some(prefix) = char_at(input, position) else {
            return Ok(None);
        };
        let next = char_at(input, position + 1);

        match prefix {
            '?' => Ok(read_positional(position, next, context)),
            '$' => read_dollar(input, position, next),
            ':' => Ok(read_named(input, position, next, context)),
            '@' => Ok(read_at(input, position, next)),
            _ => Ok(None),
        }
    }
}

fn read_positional(
    position: usize,
    next: Option<char>,
    context: &ReadContext<'_>,
) -> Option<Lexeme> {
    // `?|` and `?&` are JSONB operators; `a ? 'k'` is key existence.
    if matches!(next, Some('|' | '&')) || context.after_value() {
        return None;
    }
    Some(Lexeme::new(TokenKind::PARAMETER, "?", position, position + 1))
}

fn read_dollar(
    input: &str,
    position: usize,
    next: Option<char>,
) -> Result<Option<Lexeme>, LexError> {
    match next {
        Some('{') => {
            let body_start = position + 2;
            match input[body_start..].find('}') {
                Some(close) => {
                    let end = body_start + close + 1;
                    Ok(Some(Lexeme::new(
                        TokenKind::PARAMETER,
                        &input[position..end],
                        position,
                        end,
                    )))
                }
                None => Err(LexError::unterminated(
                    "template parameter",
                    "}",
                    input,
                    position,
                )),
            }
        }
        Some(c) if is_digit(c) => {
            if is_money_literal(input, position) {
                return Ok(None);
            }
            let digits = input[position + 1..]
                .find(|c: char| !is_digit(c))
                .unwrap_or(input.len() - position - 1);
            let end = position + 1 + digits;
            Ok(Some(Lexeme::new(
                TokenKind::PARAMETER,
                &input[position..end],
                position,
                end,
            )))
        }
        Some(c) if is_identifier_start(c) => {
            if is_dollar_quote_start(input, position) {
                return Ok(None);
            }
            Ok(Some(read_prefixed_name(input, position)))
        }
        _ => Ok(None),
    }
}

fn read_named(
    input: &str,
    position: usize,
    next: Option<char>,
    context: &ReadContext<'_>,
) -> Option<Lexeme> {
    // `::` is a cast, `:=` an assignment, `a[1:2]` a slice.
    if context.bracket_depth > 0 {
        return None;
    }
    match next {
        Some(c) if is_identifier_start(c) || is_digit(c) => {
            Some(read_prefixed_name(input, position))
        }
        _ => None,
    }
}

fn read_at(input: &str, position: usize, next: Option<char>) -> Option<Lexeme> {
    match next {
        Some(c) if is_operator_symbol(c) => None,
        Some(c) if is_identifier_start(c) => Some(read_prefixed_name(input, position)),
        _ => None,
    }
}

fn read_prefixed_name(input: &str, position: usize) -> Lexeme {
    let end = position + 1 + bareword_len(input, position + 1);
    Lexeme::new(TokenKind::PARAMETER, &input[position..end], position, end)
}
