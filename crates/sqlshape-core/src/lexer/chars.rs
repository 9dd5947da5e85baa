//! Character classification shared by every token reader.
//!
//! Keeping these in one place means "where does a bareword end" is answered
//! the same way for identifiers, keywords, functions and parameter names.

/// Characters that may form (part of) an operator.
const OPERATOR_SYMBOLS: &str = "+-*/<>=~!@#%^&|?:";

/// Returns true for an ASCII decimal digit.
#[must_use]
pub const fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Returns true for a hexadecimal digit.
#[must_use]
pub const fn is_hex_char(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// Returns true for whitespace, including Unicode spaces.
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    c.is_whitespace()
}

/// Returns true for a character that can be part of an operator.
#[must_use]
pub fn is_operator_symbol(c: char) -> bool {
    OPERATOR_SYMBOLS.contains(c)
}

/// Returns true for a character that ends a bareword.
#[must_use]
pub fn is_delimiter(c: char) -> bool {
    is_whitespace(c)
        || is_operator_symbol(c)
        || matches!(c, '(' | ')' | '[' | ']' | '{' | '}' | ',' | '.' | ';' | '\'' | '"' | '`')
}

/// Returns true for a prefix that introduces a named or positional parameter.
#[must_use]
pub const fn is_named_parameter_prefix(c: char) -> bool {
    matches!(c, '@' | ':' | '$')
}

/// Returns true for a character that may start a plain identifier.
#[must_use]
pub fn is_identifier_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

/// Returns true for a character allowed inside a keyword word.
#[must_use]
pub fn is_word_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Returns the length in bytes of the bareword starting at `pos`.
#[must_use]
pub fn bareword_len(input: &str, pos: usize) -> usize {
    input[pos..]
        .char_indices()
        .find(|(_, c)| is_delimiter(*c))
        .map_or(input.len() - pos, |(i, _)| i)
}

/// Returns the length in bytes of the keyword word starting at `pos`.
#[must_use]
pub fn word_len(input: &str, pos: usize) -> usize {
    input[pos..]
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map_or(input.len() - pos, |(i, _)| i)
}

/// Returns the character at `pos`, if any.
#[must_use]
pub fn char_at(input: &str, pos: usize) -> Option<char> {
    input.get(pos..).and_then(|rest| rest.chars().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_delimiter() {
        for c in [' ', '\n', '(', ')', ',', '.', ';', '+', ':', '\'', '"', '[', ']'] {
            assert!(is_delimiter(c), "{c:?} should be a delimiter");
        }
        for c in ['a', 'Z', '_', '0', '$', 'é'] {
            assert!(!is_delimiter(c), "{c:?} should not be a delimiter");
        }
    }

    #[test]
    fn test_operator_symbols() {
        assert!(is_operator_symbol('@'));
        assert!(is_operator_symbol('?'));
        assert!(!is_operator_symbol('('));
        assert!(!is_operator_symbol('$'));
    }

    #[test]
    fn test_parameter_prefixes() {
        assert!(is_named_parameter_prefix('@'));
        assert!(is_named_parameter_prefix(':'));
        assert!(is_named_parameter_prefix('$'));
        assert!(!is_named_parameter_prefix('?'));
    }

    #[test]
    fn test_bareword_len() {
        assert_eq!(bareword_len("users.id", 0), 5);
        assert_eq!(bareword_len("a$b+1", 0), 3);
        assert_eq!(bareword_len("name", 0), 4);
    }

    #[test]
    fn test_word_len_stops_at_dollar() {
        assert_eq!(word_len("group by", 0), 5);
        assert_eq!(word_len("a$b", 0), 1);
    }

    #[test]
    fn test_hex_and_digit() {
        assert!(is_digit('7'));
        assert!(!is_digit('a'));
        assert!(is_hex_char('F'));
        assert!(!is_hex_char('g'));
    }
}
