//! Queries: SELECT, VALUES, parenthesized queries and set operations.

use super::cursor::{all_comments, Parser};
use super::error::ParseError;
use super::Parse;
use crate::ast::{
    BinaryQuery, Query, SelectClause, SelectQuery, SetOperator, ValuesQuery, WithClause,
};
use crate::comments::{CommentPosition, Comments};
use crate::lexer::TokenKind;

/// Keywords that open a clause a set operation may carry after its last
/// operand.
const TRAILING_CLAUSES: &[&str] = &["order by", "limit", "offset", "fetch", "for"];

impl Parse for Query {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let with = if parser.check_command("with") || parser.check_command("with recursive") {
            Some(WithClause::parse(parser)?)
        } else {
            None
        };
        parser.parse_query_with(with)
    }
}

impl Parse for SelectQuery {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let mut query = Self::new(SelectClause::parse(parser)?);
        query.from = parser.parse_optional("from")?;
        query.where_clause = parser.parse_optional("where")?;
        query.group_by = parser.parse_optional("group by")?;
        query.having = parser.parse_optional("having")?;
        query.window = parser.parse_optional("window")?;
        parser.parse_trailing_clauses(&mut query)?;
        Ok(query)
    }
}

impl Parse for ValuesQuery {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("values")?;
        let mut rows = Vec::new();
        loop {
            let open = parser.expect_open_paren()?;
            let mut row = parser.parse_expression_list()?;
            let close = parser.expect_close_paren()?;
            if let Some(first) = row.first_mut() {
                first.comments.prepend(CommentPosition::Before, all_comments(open));
            }
            if let Some(last) = row.last_mut() {
                last.comments.extend(CommentPosition::After, all_comments(close));
            }
            rows.push(row);
            if parser.eat_kind(TokenKind::COMMA).is_none() {
                break;
            }
        }
        Ok(Self {
            rows,
            comments: keyword.comments.clone(),
        })
    }
}

impl Parser<'_> {
    /// Parses a query whose WITH clause, if any, was already read, and
    /// attaches the clause to the leftmost SELECT.
    pub(crate) fn parse_query_with(
        &mut self,
        with: Option<WithClause>,
    ) -> Result<Query, ParseError> {
        let start = self.position();
        let mut query = self.parse_query_term()?;

        loop {
            let Some(token) = self.peek() else {
                break;
            };
            if !token.is(TokenKind::COMMAND) {
                break;
            }
            let Some(operator) = SetOperator::from_keyword(&token.text) else {
                break;
            };
            self.advance();
            let right = self.parse_query_term()?;
            query = Query::Binary(BinaryQuery {
                left: Box::new(query),
                operator,
                right: Box::new(right),
                comments: token.comments.clone(),
            });
        }

        if TRAILING_CLAUSES.iter().any(|keyword| self.check_command(keyword)) {
            let position = self.position();
            let Some(last) = query.last_select_mut() else {
                return Err(ParseError::expected("end of query", self.tokens(), position));
            };
            self.parse_trailing_clauses(last)?;
        }

        if let Some(with) = with {
            let Some(first) = query.first_select_mut() else {
                return Err(ParseError::expected(
                    "'select' after with clause",
                    self.tokens(),
                    start,
                ));
            };
            first.with = Some(with);
        }

        Ok(query)
    }

    /// One operand of a set operation.
    fn parse_query_term(&mut self) -> Result<Query, ParseError> {
        if self.check_command("select") {
            return Ok(Query::Select(Box::new(SelectQuery::parse(self)?)));
        }
        if self.check_command("values") {
            return Ok(Query::Values(ValuesQuery::parse(self)?));
        }
        if let Some(open) = self.eat_kind(TokenKind::OPEN_PAREN) {
            let mut inner = Query::parse(self)?;
            inner
                .leading_comments_mut()
                .prepend(CommentPosition::Before, all_comments(open));
            let close = self.expect_close_paren()?;
            let mut comments = Comments::new();
            comments.extend(CommentPosition::After, all_comments(close));
            return Ok(Query::Paren {
                query: Box::new(inner),
                comments,
            });
        }
        Err(self.error("'select', 'values' or '('"))
    }

    /// ORDER BY, LIMIT, OFFSET, FETCH and FOR, each optional, in that order.
    fn parse_trailing_clauses(&mut self, query: &mut SelectQuery) -> Result<(), ParseError> {
        if query.order_by.is_none() {
            query.order_by = self.parse_optional("order by")?;
        }
        if query.limit.is_none() {
            query.limit = self.parse_optional("limit")?;
        }
        if query.offset.is_none() {
            query.offset = self.parse_optional("offset")?;
        }
        if query.fetch.is_none() {
            query.fetch = self.parse_optional("fetch")?;
        }
        if query.for_clause.is_none() {
            query.for_clause = self.parse_optional("for")?;
        }
        Ok(())
    }
}
