//! Symbolic and keyword operators.

use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::chars::{char_at, is_identifier_start, is_operator_symbol};
use crate::lexer::error::LexError;
use crate::lexer::keywords::{
    is_date_part_operator, is_typed_literal_prefix, KeywordParser, OPERATOR_TRIE,
};
use crate::lexer::token::TokenKind;

/// Symbol operators recognised as a unit, longest first within each prefix.
const SYMBOL_OPERATORS: &[&str] = &[
    "#>>", "->>", "!~~*", "~~*", "!~~", "!~*", "<->", "<#>", "<=>", "@@@", "|/", "||/",
    "::", "||", "<=", ">=", "<>", "!=", "->", "#>", "@>", "<@", "?|", "?&", "&&", "<<", ">>",
    "~~", "!~", "~*", "@@", "-|-", "&<", "&>", "^@", ":=",
    "+", "-", "*", "/", "%", "^", "<", ">", "=", "~", "!", "@", "#", "&", "|", "?", ":",
];

/// Reads symbol runs (`>=`, `::`, `->>`, ...) and keyword operators
/// (`and`, `is not distinct from`, `interval`, ...).
///
/// Keyword operators are lower-cased. Typed-literal prefixes such as
/// `interval` and `date` are tagged both operator and type.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperatorReader;

impl TokenReader for OperatorReader {
    fn name(&self) -> &'static str {
        "operator"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        match char_at(input, position) {
            Some(c) if is_operator_symbol(c) => Ok(read_symbol(input, position)),
            Some(c) if is_identifier_start(c) => Ok(read_keyword(input, position, context)),
            _ => Ok(None),
        }
    }
}

fn read_symbol(input: &str, position: usize) -> Option<Lexeme> {
    let rest = &input[position..];
    let mut run = 0;
    for (offset, c) in rest.char_indices() {
        let opens_comment =
            rest[offset..].starts_with("--") || rest[offset..].starts_with("/*");
        if !is_operator_symbol(c) || (offset > 0 && opens_comment) {
            break;
        }
        run = offset + c.len_utf8();
    }
    if run == 0 {
        return None;
    }
    let symbols = &rest[..run];

    let known = SYMBOL_OPERATORS
        .iter()
        .filter(|op| symbols.starts_with(**op))
        .max_by_key(|op| op.len())
        .copied();
    // An unknown run is a user-defined operator unless it hides a sign or a
    // parameter, as in `=-1` or `=:id`.
    let text = match known {
        Some(op) if op.len() == symbols.len() => op,
        _ if !symbols[1..].contains(['+', '-', ':', '@', '?']) => symbols,
        Some(op) => op,
        None => return None,
    };
    Some(Lexeme::new(
        TokenKind::OPERATOR,
        text,
        position,
        position + text.len(),
    ))
}

fn read_keyword(input: &str, position: usize, context: &ReadContext<'_>) -> Option<Lexeme> {
    if context.previous_is(TokenKind::DOT) {
        return None;
    }
    let found = KeywordParser::new(&OPERATOR_TRIE).parse(input, position)?;

    // `extract(year from d)` only; `select year from t` is a column.
    if is_date_part_operator(&found.keyword) && !context.previous_is(TokenKind::OPEN_PAREN) {
        return None;
    }

    let kind = if is_typed_literal_prefix(&found.keyword) {
        TokenKind::OPERATOR | TokenKind::TYPE
    } else {
        TokenKind::OPERATOR
    };
    Some(Lexeme {
        kind,
        text: found.keyword,
        start: position,
        end: found.end,
        comments: found.comments,
    })
}
