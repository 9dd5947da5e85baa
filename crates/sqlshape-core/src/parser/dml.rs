//! INSERT, UPDATE and DELETE, and statement dispatch.

use super::cursor::{all_comments, identifier, starts_query, Parser};
use super::error::ParseError;
use super::Parse;
use crate::ast::{
    ColumnRef, DeleteQuery, InsertQuery, InsertSource, Query, SetItem, SourceExpr, Statement,
    UpdateQuery, WithClause,
};
use crate::comments::CommentPosition;
use crate::lexer::TokenKind;

impl Parse for Statement {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let with = if parser.check_command("with") || parser.check_command("with recursive") {
            Some(WithClause::parse(parser)?)
        } else {
            None
        };

        if parser.check_command("insert into") {
            return Ok(Self::Insert(parser.parse_insert(with)?));
        }
        if parser.check_command("update") {
            return Ok(Self::Update(parser.parse_update(with)?));
        }
        if parser.check_command("delete from") {
            return Ok(Self::Delete(parser.parse_delete(with)?));
        }
        if with.is_none()
            && !parser.peek().is_some_and(starts_query)
            && !parser.check_kind(TokenKind::OPEN_PAREN)
        {
            return Err(parser.error("statement"));
        }
        Ok(Self::Query(parser.parse_query_with(with)?))
    }
}

impl Parse for InsertQuery {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        parser.parse_insert(None)
    }
}

impl Parse for UpdateQuery {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        parser.parse_update(None)
    }
}

impl Parse for DeleteQuery {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        parser.parse_delete(None)
    }
}

impl Parser<'_> {
    fn parse_insert(&mut self, with: Option<WithClause>) -> Result<InsertQuery, ParseError> {
        let keyword = self.expect_command("insert into")?;
        let (table, mut target_comments) = self.parse_table_name()?;

        let alias = if let Some(as_keyword) = self.eat_command("as") {
            let token = self.expect_kind(TokenKind::IDENTIFIER | TokenKind::FUNCTION, "alias")?;
            target_comments.extend(CommentPosition::After, all_comments(as_keyword));
            target_comments.extend(CommentPosition::After, all_comments(token));
            Some(identifier(token))
        } else {
            None
        };

        let columns = if self.check_kind(TokenKind::OPEN_PAREN) && !self.check_subquery() {
            let open = self.next_token("'('")?;
            target_comments.extend(CommentPosition::After, all_comments(open));
            let (columns, column_comments) = self.parse_identifier_list()?;
            target_comments.extend(CommentPosition::After, column_comments.to_vec());
            let close = self.expect_close_paren()?;
            target_comments.extend(CommentPosition::After, all_comments(close));
            columns
        } else {
            Vec::new()
        };

        let source = if let Some(default_values) = self.eat_command("default values") {
            target_comments.extend(CommentPosition::After, all_comments(default_values));
            InsertSource::DefaultValues
        } else {
            InsertSource::Query(Box::new(Query::parse(self)?))
        };

        Ok(InsertQuery {
            with,
            table,
            alias,
            columns,
            target_comments,
            source,
            returning: self.parse_optional("returning")?,
            comments: keyword.comments.clone(),
        })
    }

    fn parse_update(&mut self, with: Option<WithClause>) -> Result<UpdateQuery, ParseError> {
        let keyword = self.expect_command("update")?;
        let table = SourceExpr::parse(self)?;
        let set_keyword = self.expect_command("set")?;

        let mut first = self.parse_set_item()?;
        first
            .comments
            .prepend(CommentPosition::Before, all_comments(set_keyword));
        let mut set = vec![first];
        while self.eat_kind(TokenKind::COMMA).is_some() {
            set.push(self.parse_set_item()?);
        }

        Ok(UpdateQuery {
            with,
            table,
            set,
            from: self.parse_optional("from")?,
            where_clause: self.parse_optional("where")?,
            returning: self.parse_optional("returning")?,
            comments: keyword.comments.clone(),
        })
    }

    /// `column = value`, the column optionally qualified.
    fn parse_set_item(&mut self) -> Result<SetItem, ParseError> {
        let (first, token) = self.parse_identifier("column")?;
        let mut comments = token.comments.clone();
        let mut namespaces = Vec::new();
        let mut name = first;
        while let Some(dot) = self.eat_kind(TokenKind::DOT) {
            let (next, token) = self.parse_identifier("column")?;
            comments.extend(CommentPosition::After, all_comments(dot));
            comments.extend(CommentPosition::After, all_comments(token));
            namespaces.push(std::mem::replace(&mut name, next));
        }

        let equals = self.expect_operator("=")?;
        let mut value = self.parse_expression(0)?;
        value.comments.prepend(CommentPosition::Before, all_comments(equals));
        Ok(SetItem {
            column: ColumnRef { namespaces, name },
            value,
            comments,
        })
    }

    fn parse_delete(&mut self, with: Option<WithClause>) -> Result<DeleteQuery, ParseError> {
        let keyword = self.expect_command("delete from")?;
        let table = SourceExpr::parse(self)?;

        let mut using = Vec::new();
        if let Some(using_keyword) = self.eat_command("using") {
            let mut first = SourceExpr::parse(self)?;
            first
                .comments
                .prepend(CommentPosition::Before, all_comments(using_keyword));
            using.push(first);
            while self.eat_kind(TokenKind::COMMA).is_some() {
                using.push(SourceExpr::parse(self)?);
            }
        }

        Ok(DeleteQuery {
            with,
            table,
            using,
            where_clause: self.parse_optional("where")?,
            returning: self.parse_optional("returning")?,
            comments: keyword.comments.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::lexer::tokenize;

    fn parse(sql: &str) -> Result<Statement, ParseError> {
        let tokens = tokenize(sql).unwrap();
        let mut parser = Parser::new(&tokens);
        let statement = Statement::parse(&mut parser)?;
        parser.expect_end()?;
        Ok(statement)
    }

    #[test]
    fn test_insert_values() {
        let Statement::Insert(insert) =
            parse("insert into users (id, name) values (1, 'a') returning id").unwrap()
        else {
            panic!("expected insert");
        };
        assert_eq!(insert.table.name.name, "users");
        assert_eq!(insert.columns.len(), 2);
        assert!(matches!(insert.source, InsertSource::Query(_)));
        assert!(insert.returning.is_some());
    }

    #[test]
    fn test_insert_select_and_default_values() {
        let Statement::Insert(insert) = parse("insert into archive select * from users").unwrap()
        else {
            panic!("expected insert");
        };
        assert!(insert.columns.is_empty());

        let Statement::Insert(insert) = parse("insert into counters default values").unwrap()
        else {
            panic!("expected insert");
        };
        assert_eq!(insert.source, InsertSource::DefaultValues);
    }

    #[test]
    fn test_update() {
        let Statement::Update(update) = parse(
            "update users u set name = 'x', u.score = default \
             from teams t where t.id = u.team_id",
        )
        .unwrap() else {
            panic!("expected update");
        };
        assert_eq!(update.table.reference_name(), Some("u"));
        assert_eq!(update.set.len(), 2);
        assert_eq!(update.set[1].column.namespaces.len(), 1);
        assert!(matches!(update.set[1].value.kind, ExprKind::Default));
        assert!(update.from.is_some());
        assert!(update.where_clause.is_some());
    }

    #[test]
    fn test_delete_using() {
        let Statement::Delete(delete) =
            parse("delete from orders o using customers c where c.id = o.customer_id").unwrap()
        else {
            panic!("expected delete");
        };
        assert_eq!(delete.using.len(), 1);
        assert!(delete.where_clause.is_some());
    }

    #[test]
    fn test_with_prefixes_dml() {
        let Statement::Delete(delete) = parse(
            "with old as (select id from t) delete from t where id in (select id from old)",
        )
        .unwrap() else {
            panic!("expected delete");
        };
        assert!(delete.with.is_some());
    }

    #[test]
    fn test_insert_keeps_table_case() {
        let Statement::Insert(insert) = parse("insert into Users (Name) values (1)").unwrap()
        else {
            panic!("expected insert");
        };
        assert_eq!(insert.table.name.name, "Users");
        assert_eq!(insert.columns[0].name, "Name");
    }

    #[test]
    fn test_set_item_keeps_column_comment() {
        let Statement::Update(update) = parse("update t set a /* note */ = 1").unwrap() else {
            panic!("expected update");
        };
        assert_eq!(update.set[0].comments.after().collect::<Vec<_>>(), vec!["note"]);
        assert_eq!(update.to_string(), "update t set a /* note */ = 1");
    }

    #[test]
    fn test_unknown_statement() {
        let err = parse("create table t (a int)").unwrap_err();
        assert_eq!(err.expected, "statement");
        assert_eq!(err.index, 0);
    }
}
