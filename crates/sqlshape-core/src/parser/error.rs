//! Parser error types.

use crate::lexer::{render_excerpt, LineIndex, Location, Span, Token};

/// A syntax error: the token at `index` is not what the grammar expects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// The full error message.
    pub message: String,
    /// What the parser expected.
    pub expected: String,
    /// Text of the token found, `None` at end of input.
    pub found: Option<String>,
    /// Index of the offending token in the statement's token list.
    pub index: usize,
    /// Span of the offending token.
    pub span: Option<Span>,
    /// Line/column of the offending token.
    pub location: Option<Location>,
}

impl ParseError {
    /// Creates an "expected X" error for the token at `index`, or an end of
    /// input error when `index` is past the last token.
    #[must_use]
    pub fn expected(expected: impl Into<String>, tokens: &[Token], index: usize) -> Self {
        let expected = expected.into();
        match tokens.get(index) {
            Some(token) => Self {
                message: format!(
                    "Expected {expected} but found '{}' at token index {index} \
                     (position {}, line {}, column {})",
                    token.text, token.span.start, token.start.line, token.start.column
                ),
                expected,
                found: Some(token.text.clone()),
                index,
                span: Some(token.span),
                location: Some(token.start),
            },
            None => Self {
                message: format!(
                    "Expected {expected} but reached end of input at token index {index}"
                ),
                expected,
                found: None,
                index,
                span: None,
                location: None,
            },
        }
    }

    /// The message followed by the source line and a caret under the
    /// offending token, when its position is known.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        match self.span {
            Some(span) if span.start <= source.len() => {
                let index = LineIndex::new(source);
                format!("{}\n{}", self.message, render_excerpt(source, &index, span.start))
            }
            _ => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn token(text: &str, start: usize) -> Token {
        let span = Span::new(start, start + text.len());
        let mut token = Token::new(TokenKind::IDENTIFIER, text, span);
        token.start = Location::new(1, start + 1);
        token
    }

    #[test]
    fn test_found_token_message() {
        let tokens = vec![token("select", 0), token("x", 7)];
        let err = ParseError::expected("'from'", &tokens, 1);
        assert_eq!(
            err.to_string(),
            "Expected 'from' but found 'x' at token index 1 (position 7, line 1, column 8)"
        );
        assert_eq!(err.found.as_deref(), Some("x"));
    }

    #[test]
    fn test_end_of_input_message() {
        let tokens = vec![token("select", 0)];
        let err = ParseError::expected("expression", &tokens, 1);
        assert_eq!(
            err.to_string(),
            "Expected expression but reached end of input at token index 1"
        );
        assert!(err.span.is_none());
    }

    #[test]
    fn test_render_points_at_token() {
        let tokens = vec![token("select", 0), token("x", 7)];
        let err = ParseError::expected("'from'", &tokens, 1);
        let rendered = err.render("select x");
        assert!(rendered.starts_with("Expected 'from'"));
        assert!(rendered.contains("select x"));
        assert!(rendered.contains('^'));
    }
}
