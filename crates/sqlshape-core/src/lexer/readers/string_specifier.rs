//! Prefixes of typed strings: `e'..'`, `x'..'`, `b'..'`, `n'..'`, `u&'..'`.

use super::{Lexeme, ReadContext, TokenReader};
use crate::lexer::error::LexError;
use crate::lexer::token::TokenKind;

const SPECIFIERS: &[&str] = &["u&", "e", "x", "b", "n"];

/// Reads a string prefix directly followed by `'`. The prefix becomes its own
/// lower-cased token; the string itself is left to the literal reader.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSpecifierReader;

impl TokenReader for StringSpecifierReader {
    fn name(&self) -> &'static str {
        "string specifier"
    }

    fn try_read(
        &self,
        input: &str,
        position: usize,
        _context: &ReadContext<'_>,
    ) -> Result<Option<Lexeme>, LexError> {
        let rest = &input[position..];
        let found = SPECIFIERS.iter().find(|specifier| {
            rest.get(..specifier.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(specifier))
                && rest[specifier.len()..].starts_with('\'')
        });
        Ok(found.map(|specifier| {
            Lexeme::new(
                TokenKind::STRING_SPECIFIER,
                *specifier,
                position,
                position + specifier.len(),
            )
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::read;
    use super::*;

    #[test]
    fn test_specifiers() {
        let cases = [
            ("E'\\n'", "e"),
            ("x'1F'", "x"),
            ("B'01'", "b"),
            ("N'abc'", "n"),
            ("U&'d\\0061t'", "u&"),
        ];
        for (input, expected) in cases {
            let lexeme = read(&StringSpecifierReader, input).unwrap();
            assert_eq!(lexeme.kind, TokenKind::STRING_SPECIFIER);
            assert_eq!(lexeme.text, expected);
            assert_eq!(lexeme.end, expected.len());
        }
    }

    #[test]
    fn test_prefix_needs_adjacent_quote() {
        assert!(read(&StringSpecifierReader, "e 'x'").is_none());
        assert!(read(&StringSpecifierReader, "ex'1'").is_none());
        assert!(read(&StringSpecifierReader, "u'x'").is_none());
    }
}
