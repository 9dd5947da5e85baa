//! # sqlshape-core
//!
//! A multi-dialect SQL tokenizer and parser that keeps comments and source
//! positions.
//!
//! This crate provides:
//! - A tokenizer built from ordered token readers, recognising PostgreSQL,
//!   MySQL, SQLite and SQL Server lexical forms at once
//! - Statement segmentation with comments carried between statements
//! - A hand-written recursive descent parser with Pratt expression parsing
//! - An AST that renders back to SQL and can be walked with a [`Visitor`]
//!
//! ## Parsing
//!
//! ```rust
//! use sqlshape_core::{parse, Statement};
//!
//! let statement = parse("SELECT id, name FROM users /* active only */ WHERE active").unwrap();
//! let Statement::Query(query) = &statement else { unreachable!() };
//! let select = query.as_select().unwrap();
//! assert_eq!(select.select.items.len(), 2);
//! assert_eq!(
//!     statement.to_string(),
//!     "select id, name from users /* active only */ where active"
//! );
//! ```
//!
//! ## Multiple statements
//!
//! ```rust
//! use sqlshape_core::parse_all;
//!
//! let statements = parse_all("select 1; -- next\nselect 2;").unwrap();
//! assert_eq!(statements.len(), 2);
//! assert_eq!(statements[1].leading_comments, vec!["next".to_string()]);
//! ```

pub mod ast;
pub mod comments;
pub mod lexer;
pub mod parser;

use tracing::debug;

pub use ast::{Expr, ParsedStatement, Query, Statement, Visitor};
pub use comments::{CommentPosition, Comments};
pub use lexer::{
    read_next_statement, tokenize, LexError, Location, Span, StatementReader, StatementSlice,
    Token, TokenKind, Tokenizer,
};
pub use parser::{parse_statement, Parse, ParseError, Parser};

/// Errors from tokenizing or parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),

    /// The tokens do not form a statement.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// The message followed by a source excerpt pointing at the error.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        match self {
            Self::Lex(err) => err.to_string(),
            Self::Parse(err) => err.render(source),
        }
    }
}

/// Tokenizes and parses the first statement of `sql`.
///
/// # Errors
///
/// Returns [`Error::Lex`] for malformed input and [`Error::Parse`] when the
/// tokens do not form a statement.
pub fn parse(sql: &str) -> Result<Statement, Error> {
    let tokens = tokenize(sql)?;
    Ok(parse_statement(&tokens)?)
}

/// Splits `sql` into statements and parses each one. Empty statements are
/// skipped; their comments carry over to the next statement. Comments after
/// the last statement land in its `trailing_comments`.
///
/// # Errors
///
/// Stops at the first statement that fails to tokenize or parse.
pub fn parse_all(sql: &str) -> Result<Vec<ParsedStatement>, Error> {
    let mut statements = Vec::new();
    let mut reader = Tokenizer::new(sql).statements();
    for slice in reader.by_ref() {
        let slice = slice?;
        let statement = parse_statement(&slice.tokens)?;
        statements.push(ParsedStatement {
            statement,
            leading_comments: slice.leading_comments,
            trailing_comments: Vec::new(),
            raw_text: slice.raw_text,
            span: Span::new(slice.start, slice.end),
        });
    }
    if let Some(last) = statements.last_mut() {
        last.trailing_comments = reader.pending_comments().to_vec();
    }
    debug!(count = statements.len(), "parsed statements");
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reports_lex_errors() {
        let err = parse("select 'unterminated").unwrap_err();
        assert!(matches!(err, Error::Lex(_)));
    }

    #[test]
    fn test_parse_reports_parse_errors() {
        let err = parse("select from").unwrap_err();
        let Error::Parse(inner) = &err else {
            panic!("expected parse error");
        };
        assert_eq!(inner.expected, "expression");
        assert!(err.render("select from").contains('^'));
    }

    #[test]
    fn test_parse_all_spans() {
        let sql = "select 1; select 2";
        let statements = parse_all(sql).unwrap();
        assert_eq!(statements.len(), 2);
        let second = &statements[1];
        assert_eq!(&sql[second.span.start..second.span.end], second.raw_text);
        assert_eq!(second.raw_text, "select 2");
    }

    #[test]
    fn test_parse_all_skips_empty_statements() {
        let statements = parse_all(";; select 1 ;").unwrap();
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_parse_all_keeps_comments_after_last_statement() {
        let statements = parse_all("select 1; -- tail note").unwrap();
        assert_eq!(statements[0].trailing_comments, vec!["tail note"]);

        let statements = parse_all("select 1; select 2; ; -- tail").unwrap();
        assert!(statements[0].trailing_comments.is_empty());
        assert_eq!(statements[1].trailing_comments, vec!["tail"]);
    }
}
