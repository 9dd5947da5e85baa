//! Token types for the SQL lexer.

use serde::{Deserialize, Serialize};

use super::span::{Location, Span};
use crate::comments::{CommentPosition, Comments};

bitflags::bitflags! {
    /// Classification of a token.
    ///
    /// Several flags may be set at once: a bareword after `as` is both
    /// `IDENTIFIER` and `TYPE`, and `interval` is both `OPERATOR` and `TYPE`.
    /// The parser resolves the ambiguity from context.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TokenKind: u16 {
        /// Number, string, dollar-quoted string or keyword literal.
        const LITERAL = 1;
        /// Symbolic or keyword operator.
        const OPERATOR = 1 << 1;
        /// `(`
        const OPEN_PAREN = 1 << 2;
        /// `)`
        const CLOSE_PAREN = 1 << 3;
        /// `,`
        const COMMA = 1 << 4;
        /// `.`
        const DOT = 1 << 5;
        /// Plain or escaped identifier.
        const IDENTIFIER = 1 << 6;
        /// SQL keyword, join keyword or optimizer hint.
        const COMMAND = 1 << 7;
        /// Parameter placeholder.
        const PARAMETER = 1 << 8;
        /// `[`
        const OPEN_BRACKET = 1 << 9;
        /// `]`
        const CLOSE_BRACKET = 1 << 10;
        /// Bareword directly followed by `(`.
        const FUNCTION = 1 << 11;
        /// Prefix of a typed string such as `e'..'` or `x'..'`.
        const STRING_SPECIFIER = 1 << 12;
        /// Type name.
        const TYPE = 1 << 13;
    }
}

impl TokenKind {
    /// Kinds after which an operator, not an operand, is expected.
    pub const VALUE_END: Self = Self::LITERAL
        .union(Self::IDENTIFIER)
        .union(Self::PARAMETER)
        .union(Self::CLOSE_PAREN)
        .union(Self::CLOSE_BRACKET)
        .union(Self::TYPE);
}

/// A token with its normalized text, comments and source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// Normalized text. Keywords, operators and function names are
    /// lower-cased; identifiers and literals keep their case.
    pub text: String,
    /// Comments attached before/after this token.
    pub comments: Comments,
    /// Byte offsets in the statement source.
    pub span: Span,
    /// Line/column of `span.start`.
    pub start: Location,
    /// Line/column of `span.end`.
    pub end: Location,
}

impl Token {
    /// Creates a new token without comments or line information.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            comments: Comments::new(),
            span,
            start: Location::default(),
            end: Location::default(),
        }
    }

    /// Returns true if any of the given flags is set.
    #[must_use]
    pub const fn is(&self, kind: TokenKind) -> bool {
        self.kind.intersects(kind)
    }

    /// Returns true if this is a command token with the given text.
    #[must_use]
    pub fn is_command(&self, text: &str) -> bool {
        self.is(TokenKind::COMMAND) && self.text == text
    }

    /// Returns true if this is an operator token with the given text.
    #[must_use]
    pub fn is_operator(&self, text: &str) -> bool {
        self.is(TokenKind::OPERATOR) && self.text == text
    }

    /// Returns true if the token ends an operand, so a following `+`/`-`
    /// is binary rather than a sign.
    #[must_use]
    pub const fn ends_value(&self) -> bool {
        self.is(TokenKind::VALUE_END)
    }

    /// Comments placed before the token.
    pub fn comments_before(&self) -> impl Iterator<Item = &str> {
        self.comments.at(CommentPosition::Before)
    }

    /// Comments placed after the token.
    pub fn comments_after(&self) -> impl Iterator<Item = &str> {
        self.comments.at(CommentPosition::After)
    }
}
