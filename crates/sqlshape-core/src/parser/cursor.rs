//! Token cursor shared by every clause and value parser.

use super::error::ParseError;
use crate::ast::Identifier;
use crate::comments::Comments;
use crate::lexer::{Token, TokenKind};

/// A cursor over one statement's tokens.
///
/// Parse functions take `&mut Parser`, consume what they recognise and leave
/// the cursor on the first token they did not use.
#[derive(Debug, Clone)]
pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    /// Creates a parser positioned on the first token.
    #[must_use]
    pub const fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Creates a parser positioned on `index`.
    #[must_use]
    pub const fn at(tokens: &'t [Token], index: usize) -> Self {
        Self { tokens, pos: index }
    }

    /// Index of the current token.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The whole token list.
    #[must_use]
    pub const fn tokens(&self) -> &'t [Token] {
        self.tokens
    }

    /// Returns true once every token has been consumed.
    #[must_use]
    pub const fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// The current token.
    #[must_use]
    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    /// The token `n` places after the current one.
    #[must_use]
    pub fn peek_nth(&self, n: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + n)
    }

    /// Consumes and returns the current token.
    pub fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    /// Consumes the current token, failing with "expected `what`" at end of
    /// input.
    pub fn next_token(&mut self, what: &str) -> Result<&'t Token, ParseError> {
        self.advance().ok_or_else(|| self.error(what))
    }

    /// An "expected `what`" error at the current token.
    #[must_use]
    pub fn error(&self, what: &str) -> ParseError {
        ParseError::expected(what, self.tokens, self.pos)
    }

    /// Returns true if the current token has any of the given flags.
    #[must_use]
    pub fn check_kind(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|token| token.is(kind))
    }

    /// Returns true if the current token is the given keyword.
    #[must_use]
    pub fn check_command(&self, keyword: &str) -> bool {
        self.peek().is_some_and(|token| token.is_command(keyword))
    }

    /// Returns true if the current token is the given operator.
    #[must_use]
    pub fn check_operator(&self, operator: &str) -> bool {
        self.peek().is_some_and(|token| token.is_operator(operator))
    }

    /// Returns true if the current token is an unquoted identifier spelling
    /// `word`, ignoring case. Used for the non-reserved words of the
    /// grammar (`first`, `row`, `preceding`, ...).
    #[must_use]
    pub fn check_word(&self, word: &str) -> bool {
        self.peek().is_some_and(|token| is_word(token, word))
    }

    /// Consumes the current token if it has any of the given flags.
    pub fn eat_kind(&mut self, kind: TokenKind) -> Option<&'t Token> {
        if self.check_kind(kind) {
            self.advance()
        } else {
            None
        }
    }

    /// Consumes the given keyword if present.
    pub fn eat_command(&mut self, keyword: &str) -> Option<&'t Token> {
        if self.check_command(keyword) {
            self.advance()
        } else {
            None
        }
    }

    /// Consumes the given operator if present.
    pub fn eat_operator(&mut self, operator: &str) -> Option<&'t Token> {
        if self.check_operator(operator) {
            self.advance()
        } else {
            None
        }
    }

    /// Consumes the given non-reserved word if present.
    pub fn eat_word(&mut self, word: &str) -> Option<&'t Token> {
        if self.check_word(word) {
            self.advance()
        } else {
            None
        }
    }

    /// Consumes the given keyword or fails naming it.
    pub fn expect_command(&mut self, keyword: &str) -> Result<&'t Token, ParseError> {
        self.eat_command(keyword)
            .ok_or_else(|| self.error(&format!("'{keyword}'")))
    }

    /// Consumes the given operator or fails naming it.
    pub fn expect_operator(&mut self, operator: &str) -> Result<&'t Token, ParseError> {
        self.eat_operator(operator)
            .ok_or_else(|| self.error(&format!("'{operator}'")))
    }

    /// Consumes the given word or fails naming it.
    pub fn expect_word(&mut self, word: &str) -> Result<&'t Token, ParseError> {
        self.eat_word(word)
            .ok_or_else(|| self.error(&format!("'{word}'")))
    }

    /// Consumes a token with any of the given flags or fails with
    /// "expected `what`".
    pub fn expect_kind(&mut self, kind: TokenKind, what: &str) -> Result<&'t Token, ParseError> {
        self.eat_kind(kind).ok_or_else(|| self.error(what))
    }

    /// Consumes `(`.
    pub fn expect_open_paren(&mut self) -> Result<&'t Token, ParseError> {
        self.expect_kind(TokenKind::OPEN_PAREN, "'('")
    }

    /// Consumes `)`.
    pub fn expect_close_paren(&mut self) -> Result<&'t Token, ParseError> {
        self.expect_kind(TokenKind::CLOSE_PAREN, "')'")
    }

    /// Returns true if the current token is `(` followed by a keyword that
    /// starts a query.
    #[must_use]
    pub fn check_subquery(&self) -> bool {
        self.check_kind(TokenKind::OPEN_PAREN)
            && self.peek_nth(1).is_some_and(starts_query)
    }

    /// Consumes an identifier: a plain or quoted name, or a bareword the
    /// lexer also tagged as a type.
    pub fn parse_identifier(&mut self, what: &str) -> Result<(Identifier, &'t Token), ParseError> {
        let token = self.expect_kind(TokenKind::IDENTIFIER, what)?;
        Ok((identifier(token), token))
    }

    /// Parses `ident (, ident)*` and returns the names with the comments
    /// found on them.
    pub fn parse_identifier_list(&mut self) -> Result<(Vec<Identifier>, Comments), ParseError> {
        let mut names = Vec::new();
        let mut comments = Comments::new();
        loop {
            let (name, token) = self.parse_identifier("identifier")?;
            comments.merge(token.comments.clone());
            names.push(name);
            if self.eat_kind(TokenKind::COMMA).is_none() {
                return Ok((names, comments));
            }
        }
    }

    /// Fails unless every token has been consumed.
    pub fn expect_end(&self) -> Result<(), ParseError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(self.error("end of statement"))
        }
    }
}

/// Builds an identifier from a token. Quoted identifiers are recognised by
/// their span being longer than their unescaped name.
#[must_use]
pub fn identifier(token: &Token) -> Identifier {
    Identifier {
        name: token.text.clone(),
        quoted: token.span.len() != token.text.len(),
    }
}

/// Returns true if `token` is the unquoted word `word`.
#[must_use]
pub fn is_word(token: &Token, word: &str) -> bool {
    token.is(TokenKind::IDENTIFIER)
        && token.span.len() == token.text.len()
        && token.text.eq_ignore_ascii_case(word)
}

/// Returns true if `token` can start a query.
#[must_use]
pub fn starts_query(token: &Token) -> bool {
    ["select", "with", "with recursive", "values"]
        .iter()
        .any(|keyword| token.is_command(keyword))
}

/// Every comment of `token`, before-comments first.
#[must_use]
pub fn all_comments(token: &Token) -> Vec<String> {
    token
        .comments_before()
        .chain(token.comments_after())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn test_check_and_eat() {
        let tokens = tokenize("select a from t").unwrap();
        let mut parser = Parser::new(&tokens);
        assert!(parser.check_command("select"));
        assert!(parser.eat_command("from").is_none());
        assert!(parser.eat_command("select").is_some());
        assert_eq!(parser.position(), 1);
        let (name, _) = parser.parse_identifier("column").unwrap();
        assert_eq!(name, Identifier::new("a"));
        assert!(parser.expect_end().is_err());
    }

    #[test]
    fn test_expect_command_names_keyword() {
        let tokens = tokenize("select a").unwrap();
        let mut parser = Parser::new(&tokens);
        let err = parser.expect_command("from").unwrap_err();
        assert!(err.message.starts_with("Expected 'from' but found 'select'"));
    }

    #[test]
    fn test_quoted_identifier_detection() {
        let tokens = tokenize(r#"select "Name", name"#).unwrap();
        assert!(identifier(&tokens[1]).quoted);
        assert!(!identifier(&tokens[3]).quoted);
    }

    #[test]
    fn test_words_are_case_insensitive() {
        let tokens = tokenize("fetch FIRST").unwrap();
        let parser = Parser::at(&tokens, 1);
        assert!(parser.check_word("first"));
        assert!(!parser.check_word("next"));
    }
}
