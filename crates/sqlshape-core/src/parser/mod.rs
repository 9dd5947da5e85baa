//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Every node type that can be read on its own implements [`Parse`], so a
//! caller holding a token list can parse a single clause or value at any
//! index.

mod case;
mod clauses;
mod cursor;
mod dml;
mod error;
mod expr;
mod from;
mod function;
mod pratt;
mod query;
mod select;

use tracing::debug;

use crate::ast::Statement;
use crate::lexer::Token;

pub use cursor::Parser;
pub use error::ParseError;
pub use pratt::{infix_binding_power, prefix_binding_power};

/// A node that can be parsed from a token cursor.
pub trait Parse: Sized {
    /// Parses the node at the cursor and leaves the cursor on the first
    /// token after it.
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError>;

    /// Parses the node starting at token `index` and returns it with the
    /// index of the first unconsumed token.
    fn parse_from(tokens: &[Token], index: usize) -> Result<(Self, usize), ParseError> {
        let mut parser = Parser::at(tokens, index);
        let node = Self::parse(&mut parser)?;
        Ok((node, parser.position()))
    }
}

/// Parses one statement and requires every token to be consumed.
///
/// # Errors
///
/// Returns a `ParseError` naming what was expected and the token found.
pub fn parse_statement(tokens: &[Token]) -> Result<Statement, ParseError> {
    let mut parser = Parser::new(tokens);
    let statement = Statement::parse(&mut parser)?;
    parser.expect_end()?;
    debug!(
        kind = statement.kind_name(),
        tokens = tokens.len(),
        "parsed statement"
    );
    Ok(statement)
}
