//! Numeric, string and keyword literals.

use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::chars::{
    char_at, is_digit, is_hex_char, is_identifier_start, is_word_char, word_len,
};
use crate::lexer::error::LexError;
use crate::lexer::token::TokenKind;

/// Keywords that stand for a value.
const KEYWORD_LITERALS: &[&str] = &[
    "null",
    "true",
    "false",
    "current_date",
    "current_time",
    "current_timestamp",
    "localtime",
    "localtimestamp",
    "normalized",
    "nfc",
    "nfd",
    "nfkc",
    "nfkd",
    "nfc normalized",
    "nfd normalized",
    "nfkc normalized",
    "nfkd normalized",
];

/// Reads numbers (decimal, hex, binary, octal, exponent, signed), quoted
/// strings, dollar-quoted strings and keyword literals.
///
/// Numbers starting with `.` are written with a leading zero; keyword
/// literals are lower-cased; strings keep their quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralReader;

impl TokenReader for LiteralReader {
    fn name(&self) -> &'static str {
        "literal"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        let Some(c) = char_at(input, position) else {
            return Ok(None);
        };

        match c {
            '\'' => read_single_quoted(input, position).map(Some),
            '$' if is_dollar_quote_start(input, position) => {
                read_dollar_quoted(input, position).map(Some)
            }
            '$' if is_money_literal(input, position) => Ok(Some(read_money(input, position))),
            '+' | '-' if !context.after_value() => Ok(read_number(input, position + 1)
                .map(|(text, end)| {
                    Lexeme::new(TokenKind::LITERAL, format!("{c}{text}"), position, end)
                })),
            _ if starts_number(input, position) => Ok(read_number(input, position)
                .map(|(text, end)| Lexeme::new(TokenKind::LITERAL, text, position, end))),
            _ if is_identifier_start(c) => Ok(read_keyword_literal(input, position)),
            _ => Ok(None),
        }
    }
}

fn starts_number(input: &str, position: usize) -> bool {
    match char_at(input, position) {
        Some(c) if is_digit(c) => true,
        Some('.') => char_at(input, position + 1).is_some_and(is_digit),
        _ => false,
    }
}

/// Reads an unsigned number at `position`. Returns the normalized text and
/// the end offset.
fn read_number(input: &str, position: usize) -> Option<(String, usize)> {
    if !starts_number(input, position) {
        return None;
    }
    let rest = &input[position..];

    let radixes: [(&str, fn(char) -> bool); 3] = [
        ("0x", is_hex_char),
        ("0b", |c| matches!(c, '0' | '1')),
        ("0o", |c| matches!(c, '0'..='7')),
    ];
    for (prefix, is_radix_digit) in radixes {
        let matches_prefix = rest
            .get(..2)
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix));
        if matches_prefix && rest[2..].starts_with(is_radix_digit) {
            let digits = rest[2..]
                .find(|c: char| !is_radix_digit(c))
                .unwrap_or(rest.len() - 2);
            let end = position + 2 + digits;
            return Some((input[position..end].to_string(), end));
        }
    }

    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'.' && !rest[i + 1..].starts_with('.') {
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
    }
    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }

    let raw = &rest[..i];
    let text = if raw.starts_with('.') {
        format!("0{raw}")
    } else {
        raw.to_string()
    };
    Some((text, position + i))
}

fn read_single_quoted(input: &str, position: usize) -> Result<Lexeme, LexError> {
    let bytes = input.as_bytes();
    let mut i = position + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\'' if bytes.get(i + 1) == Some(&b'\'') => i += 2,
            b'\'' => {
                let end = i + 1;
                return Ok(Lexeme::new(
                    TokenKind::LITERAL,
                    &input[position..end],
                    position,
                    end,
                ));
            }
            _ => i += 1,
        }
    }
    Err(LexError::unterminated("string literal", "'", input, position))
}

/// Returns the byte length of the `$tag$` opener at `position`, if any.
fn dollar_tag_len(input: &str, position: usize) -> Option<usize> {
    let rest = input.get(position + 1..)?;
    if rest.starts_with(is_digit) {
        return None;
    }
    let tag = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
    rest[tag..].starts_with('$').then_some(tag + 2)
}

/// Returns true if a dollar-quoted string (`$$..$$`, `$tag$..$tag$`)
/// starts at `position`.
pub(crate) fn is_dollar_quote_start(input: &str, position: usize) -> bool {
    input[position..].starts_with('$') && dollar_tag_len(input, position).is_some()
}

/// Returns true if `$` at `position` introduces a money amount such as
/// `$1,000` or `$5.25` rather than a numbered parameter.
pub(crate) fn is_money_literal(input: &str, position: usize) -> bool {
    let rest = &input[position + 1..];
    let digits = rest.find(|c: char| !is_digit(c)).unwrap_or(rest.len());
    if digits == 0 {
        return false;
    }
    let mut tail = rest[digits..].chars();
    matches!(tail.next(), Some('.' | ',')) && tail.next().is_some_and(is_digit)
}

/// Reads `$1,234.56`: digit groups separated by `,` or `.`.
fn read_money(input: &str, position: usize) -> Lexeme {
    let bytes = input.as_bytes();
    let mut end = position + 1;
    while end < bytes.len() {
        let separated_digit = matches!(bytes[end], b',' | b'.')
            && bytes.get(end + 1).is_some_and(u8::is_ascii_digit);
        if bytes[end].is_ascii_digit() || separated_digit {
            end += 1;
        } else {
            break;
        }
    }
    Lexeme::new(TokenKind::LITERAL, &input[position..end], position, end)
}

fn read_dollar_quoted(input: &str, position: usize) -> Result<Lexeme, LexError> {
    let Some(tag_len) = dollar_tag_len(input, position) else {
        return Err(LexError::unterminated("dollar-quoted string", "$", input, position));
    };
    let tag = &input[position..position + tag_len];
    let body_start = position + tag_len;
    match input[body_start..].find(tag) {
        Some(close) => {
            let end = body_start + close + tag_len;
            Ok(Lexeme::new(
                TokenKind::LITERAL,
                &input[position..end],
                position,
                end,
            ))
        }
        None => Err(LexError::unterminated(
            "dollar-quoted string",
            tag.to_string(),
            input,
            position,
        )),
    }
}

fn read_keyword_literal(input: &str, position: usize) -> Option<Lexeme> {
    let len = word_len(input, position);
    let word = input[position..position + len].to_lowercase();
    if !KEYWORD_LITERALS.contains(&word.as_str()) {
        return None;
    }
    // `null$x` is a bareword.
    if char_at(input, position + len).is_some_and(|c| c == '$') {
        return None;
    }

    let end = position + len;
    // `nfc normalized` reads as one literal.
    let after = input[end..].trim_start();
    let gap = input.len() - end - after.len();
    let next_len = word_len(after, 0);
    if gap > 0 && next_len > 0 {
        let phrase = format!("{word} {}", after[..next_len].to_lowercase());
        if KEYWORD_LITERALS.contains(&phrase.as_str()) {
            let phrase_end = end + gap + next_len;
            return Some(Lexeme::new(TokenKind::LITERAL, phrase, position, phrase_end));
        }
    }
    Some(Lexeme::new(TokenKind::LITERAL, word, position, end))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{previous, read, read_after};
    use super::*;

    fn text(input: &str) -> String {
        read(&LiteralReader, input).unwrap().text
    }

    #[test]
    fn test_decimal_numbers() {
        assert_eq!(text("42 "), "42");
        assert_eq!(text("1.5,"), "1.5");
        assert_eq!(text(".5"), "0.5");
        assert_eq!(text("1e10"), "1e10");
        assert_eq!(text("2.5E-3)"), "2.5E-3");
    }

    #[test]
    fn test_exponent_needs_digits() {
        let lexeme = read(&LiteralReader, "1e").unwrap();
        assert_eq!(lexeme.text, "1");
        assert_eq!(lexeme.end, 1);
    }

    #[test]
    fn test_radix_numbers() {
        assert_eq!(text("0x1F "), "0x1F");
        assert_eq!(text("0b1010"), "0b1010");
        assert_eq!(text("0o17"), "0o17");
    }

    #[test]
    fn test_signed_number_at_operand_position() {
        assert_eq!(text("-2"), "-2");
        let open = previous(TokenKind::OPEN_PAREN, "(");
        assert_eq!(read_after(&LiteralReader, "-1)", &open).unwrap().text, "-1");
    }

    #[test]
    fn test_sign_after_value_is_binary() {
        let one = previous(TokenKind::LITERAL, "1");
        assert!(read_after(&LiteralReader, "-1", &one).is_none());
    }

    #[test]
    fn test_single_quoted_strings() {
        assert_eq!(text("'abc' x"), "'abc'");
        assert_eq!(text("'it''s'"), "'it''s'");
        assert_eq!(text(r"'a\'b'"), r"'a\'b'");
    }

    #[test]
    fn test_unterminated_string() {
        let err = LiteralReader
            .try_read("'abc", 0, &ReadContext::default())
            .unwrap_err();
        assert!(err.to_string().contains("unterminated string literal"));
    }

    #[test]
    fn test_dollar_quoted() {
        assert_eq!(text("$$a 'b' c$$ x"), "$$a 'b' c$$");
        assert_eq!(text("$fn$ select 1 $fn$"), "$fn$ select 1 $fn$");
    }

    #[test]
    fn test_unterminated_dollar_quote() {
        let err = LiteralReader
            .try_read("$tag$ body", 0, &ReadContext::default())
            .unwrap_err();
        assert!(err.to_string().contains("expected closing $tag$"));
    }

    #[test]
    fn test_money() {
        assert_eq!(text("$1,000 "), "$1,000");
        assert_eq!(text("$1,234.56)"), "$1,234.56");
        assert!(is_money_literal("$5.25", 0));
        assert!(!is_money_literal("$1 ", 0));
    }

    #[test]
    fn test_keyword_literals() {
        assert_eq!(text("NULL"), "null");
        assert_eq!(text("True)"), "true");
        assert_eq!(text("CURRENT_TIMESTAMP"), "current_timestamp");
        assert_eq!(text("nfc normalized"), "nfc normalized");
        assert!(read(&LiteralReader, "nullable").is_none());
        assert!(read(&LiteralReader, "name").is_none());
    }
}
