//! FROM sources and joins.

use super::cursor::{all_comments, identifier, Parser};
use super::error::ParseError;
use super::Parse;
use crate::ast::{
    ExprKind, FromClause, Identifier, JoinClause, JoinCondition, Query, Source, SourceAlias,
    SourceExpr, TableName,
};
use crate::comments::{CommentPosition, Comments};
use crate::lexer::keywords::JOIN_TRIE;
use crate::lexer::{Token, TokenKind};

impl Parse for FromClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let from = parser.expect_command("from")?;
        let source = SourceExpr::parse(parser)?;
        let mut joins = Vec::new();
        while let Some(join) = parser.parse_join()? {
            joins.push(join);
        }
        Ok(Self {
            source,
            joins,
            comments: from.comments.clone(),
        })
    }
}

fn is_join_keyword(token: &Token) -> bool {
    token.is(TokenKind::COMMAND) && JOIN_TRIE.contains(&token.text)
}

impl Parse for SourceExpr {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let mut comments = Comments::new();
        let lateral = match parser.eat_command("lateral") {
            Some(keyword) => {
                comments.extend(CommentPosition::Before, all_comments(keyword));
                true
            }
            None => false,
        };

        let source = if parser.check_subquery()
            || (parser.check_kind(TokenKind::OPEN_PAREN)
                && parser.peek_nth(1).is_some_and(|next| next.is(TokenKind::OPEN_PAREN)))
        {
            let open = parser.expect_open_paren()?;
            let mut query = Query::parse(parser)?;
            query
                .leading_comments_mut()
                .prepend(CommentPosition::Before, all_comments(open));
            let close = parser.expect_close_paren()?;
            comments.extend(CommentPosition::After, all_comments(close));
            Source::Subquery(Box::new(query))
        } else {
            parser.parse_named_source(&mut comments)?
        };

        let alias = parser.parse_source_alias(&mut comments)?;
        Ok(Self {
            lateral,
            source,
            alias,
            comments,
        })
    }
}

impl Parser<'_> {
    /// A table name or a table function, possibly schema-qualified.
    fn parse_named_source(&mut self, comments: &mut Comments) -> Result<Source, ParseError> {
        let mut namespaces: Vec<Identifier> = Vec::new();
        loop {
            let Some(token) = self.peek() else {
                return Err(self.error("table name"));
            };
            if token.is(TokenKind::FUNCTION) {
                self.advance();
                let call = self.parse_function_call(namespaces, token)?;
                comments.merge(call.comments);
                return match call.kind {
                    ExprKind::Function(call) => Ok(Source::Function(call)),
                    _ => Err(ParseError::expected(
                        "table function",
                        self.tokens(),
                        self.position(),
                    )),
                };
            }
            if !token.is(TokenKind::IDENTIFIER) {
                return Err(self.error("table name"));
            }
            self.advance();
            comments.merge(token.comments.clone());
            let name = identifier(token);
            let Some(dot) = self.eat_kind(TokenKind::DOT) else {
                return Ok(Source::Table(TableName { namespaces, name }));
            };
            comments.extend(CommentPosition::After, all_comments(dot));
            namespaces.push(name);
        }
    }

    /// `[as] alias [(col, ...)]`.
    fn parse_source_alias(
        &mut self,
        comments: &mut Comments,
    ) -> Result<Option<SourceAlias>, ParseError> {
        let alias_kinds = TokenKind::IDENTIFIER | TokenKind::FUNCTION;
        let name = if let Some(keyword) = self.eat_command("as") {
            comments.extend(CommentPosition::After, all_comments(keyword));
            self.expect_kind(alias_kinds | TokenKind::TYPE, "alias")?
        } else if let Some(token) = self.eat_kind(alias_kinds) {
            token
        } else {
            return Ok(None);
        };
        comments.extend(CommentPosition::After, all_comments(name));

        let columns = if let Some(open) = self.eat_kind(TokenKind::OPEN_PAREN) {
            comments.extend(CommentPosition::After, all_comments(open));
            let (columns, column_comments) = self.parse_identifier_list()?;
            comments.extend(CommentPosition::After, column_comments.to_vec());
            let close = self.expect_close_paren()?;
            comments.extend(CommentPosition::After, all_comments(close));
            columns
        } else {
            Vec::new()
        };

        Ok(Some(SourceAlias {
            name: identifier(name),
            columns,
        }))
    }

    /// A comma join or a keyword join, or `None` when the FROM clause ends.
    fn parse_join(&mut self) -> Result<Option<JoinClause>, ParseError> {
        if let Some(comma) = self.eat_kind(TokenKind::COMMA) {
            let source = SourceExpr::parse(self)?;
            return Ok(Some(JoinClause {
                keyword: ",".to_string(),
                source,
                condition: None,
                comments: comma.comments.clone(),
            }));
        }

        let Some(keyword) = self.peek().filter(|token| is_join_keyword(token)) else {
            return Ok(None);
        };
        self.advance();
        let source = SourceExpr::parse(self)?;

        let condition = if let Some(on) = self.eat_command("on") {
            let mut condition = self.parse_expression(0)?;
            condition.comments.prepend(CommentPosition::Before, all_comments(on));
            Some(JoinCondition::On(condition))
        } else if let Some(using) = self.eat_command("using") {
            let mut comments = Comments::new();
            comments.extend(CommentPosition::Before, all_comments(using));
            let open = self.expect_open_paren()?;
            comments.extend(CommentPosition::Before, all_comments(open));
            let (columns, column_comments) = self.parse_identifier_list()?;
            comments.extend(CommentPosition::After, column_comments.to_vec());
            let close = self.expect_close_paren()?;
            comments.extend(CommentPosition::After, all_comments(close));
            Some(JoinCondition::Using { columns, comments })
        } else {
            None
        };

        Ok(Some(JoinClause {
            keyword: keyword.text.clone(),
            source,
            condition,
            comments: keyword.comments.clone(),
        }))
    }

    /// A possibly qualified table name. The last part may arrive as a
    /// function token when a column list follows it (`insert into t (a)`).
    pub(crate) fn parse_table_name(&mut self) -> Result<(TableName, Comments), ParseError> {
        let mut namespaces = Vec::new();
        let mut comments = Comments::new();
        loop {
            let token =
                self.expect_kind(TokenKind::IDENTIFIER | TokenKind::FUNCTION, "table name")?;
            comments.merge(token.comments.clone());
            let name = identifier(token);
            if token.is(TokenKind::FUNCTION) {
                return Ok((TableName { namespaces, name }, comments));
            }
            let Some(dot) = self.eat_kind(TokenKind::DOT) else {
                return Ok((TableName { namespaces, name }, comments));
            };
            comments.extend(CommentPosition::After, all_comments(dot));
            namespaces.push(name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::JoinType;
    use crate::lexer::tokenize;

    fn parse(sql: &str) -> FromClause {
        let tokens = tokenize(sql).unwrap();
        let mut parser = Parser::new(&tokens);
        let clause = FromClause::parse(&mut parser).unwrap();
        parser.expect_end().unwrap();
        clause
    }

    #[test]
    fn test_single_table() {
        let clause = parse("from users");
        assert_eq!(clause.source.reference_name(), Some("users"));
        assert!(clause.joins.is_empty());
    }

    #[test]
    fn test_qualified_table_with_alias() {
        let clause = parse("from public.users as u");
        let Source::Table(table) = &clause.source.source else {
            panic!("expected table");
        };
        assert_eq!(table.namespaces, vec![Identifier::new("public")]);
        assert_eq!(clause.source.reference_name(), Some("u"));
        assert_eq!(parse("from users u").source.reference_name(), Some("u"));
    }

    #[test]
    fn test_comma_then_keyword_join() {
        let clause = parse("from a, b join c on c.id = a.id");
        assert_eq!(clause.joins.len(), 2);
        assert!(clause.joins[0].is_comma());
        assert_eq!(clause.joins[1].keyword, "join");
        assert!(matches!(clause.joins[1].condition, Some(JoinCondition::On(_))));
    }

    #[test]
    fn test_join_keywords() {
        let clause = parse("from a left outer join b using (id) natural join c cross join d");
        let types: Vec<_> = clause.joins.iter().map(JoinClause::join_type).collect();
        assert_eq!(types, vec![JoinType::Left, JoinType::Inner, JoinType::Cross]);
        assert_eq!(clause.joins[0].keyword, "left outer join");
        assert!(clause.joins[1].is_natural());
        assert!(matches!(
            clause.joins[0].condition,
            Some(JoinCondition::Using { ref columns, .. }) if columns.len() == 1
        ));
    }

    #[test]
    fn test_subquery_source() {
        let clause = parse("from (select 1 as x) as t");
        assert!(matches!(clause.source.source, Source::Subquery(_)));
        assert_eq!(clause.source.reference_name(), Some("t"));
    }

    #[test]
    fn test_function_source_with_column_aliases() {
        let clause = parse("from generate_series(1, 3) as g(n)");
        let Source::Function(call) = &clause.source.source else {
            panic!("expected function source");
        };
        assert_eq!(call.name, "generate_series");
        let alias = clause.source.alias.as_ref().unwrap();
        assert_eq!(alias.columns, vec![Identifier::new("n")]);
    }

    #[test]
    fn test_lateral() {
        let clause = parse("from a, lateral (select * from b where b.a_id = a.id) x");
        assert!(clause.joins[0].source.lateral);
    }

    #[test]
    fn test_missing_source() {
        let tokens = tokenize("from where").unwrap();
        let err = FromClause::parse(&mut Parser::new(&tokens)).unwrap_err();
        assert_eq!(err.expected, "table name");
    }
}
