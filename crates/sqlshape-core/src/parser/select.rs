//! The SELECT list.

use super::cursor::{all_comments, identifier, Parser};
use super::error::ParseError;
use super::Parse;
use crate::ast::{Distinct, Identifier, SelectClause, SelectItem};
use crate::comments::CommentPosition;
use crate::lexer::TokenKind;

impl Parse for SelectClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let select = parser.expect_command("select")?;

        let mut item_comments = Vec::new();
        let mut hints = Vec::new();
        while let Some(token) = parser.peek() {
            if !(token.is(TokenKind::COMMAND) && token.text.starts_with("/*+")) {
                break;
            }
            parser.advance();
            item_comments.extend(all_comments(token));
            hints.push(token.text.clone());
        }

        let distinct = if let Some(keyword) = parser.eat_command("distinct on") {
            let open = parser.expect_open_paren()?;
            let mut values = parser.parse_expression_list()?;
            let close = parser.expect_close_paren()?;
            let mut leading = all_comments(keyword);
            leading.extend(all_comments(open));
            if let Some(first) = values.first_mut() {
                first.comments.prepend(CommentPosition::Before, leading);
            }
            if let Some(last) = values.last_mut() {
                last.comments.extend(CommentPosition::After, all_comments(close));
            }
            Some(Distinct::On(values))
        } else if let Some(keyword) = parser.eat_command("distinct") {
            item_comments.extend(all_comments(keyword));
            Some(Distinct::Distinct)
        } else if let Some(keyword) = parser.eat_command("all") {
            item_comments.extend(all_comments(keyword));
            Some(Distinct::All)
        } else {
            None
        };

        let mut items = parser.parse_select_items()?;
        if let Some(first) = items.first_mut() {
            first.value.comments.prepend(CommentPosition::Before, item_comments);
        }
        Ok(Self {
            hints,
            distinct,
            items,
            comments: select.comments.clone(),
        })
    }
}

impl Parse for SelectItem {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let mut value = parser.parse_expression(0)?;
        let alias = parser.parse_item_alias()?;
        if let Some((_, comments)) = &alias {
            value.comments.extend(CommentPosition::After, comments.iter().cloned());
        }
        Ok(Self {
            value,
            alias: alias.map(|(name, _)| name),
        })
    }
}

impl Parser<'_> {
    /// Parses `item (, item)*` for SELECT and RETURNING.
    pub(crate) fn parse_select_items(&mut self) -> Result<Vec<SelectItem>, ParseError> {
        let mut items = vec![SelectItem::parse(self)?];
        while self.eat_kind(TokenKind::COMMA).is_some() {
            items.push(SelectItem::parse(self)?);
        }
        Ok(items)
    }

    /// `as name` or a bare name after a select item, with the comments found
    /// on the alias tokens.
    fn parse_item_alias(&mut self) -> Result<Option<(Identifier, Vec<String>)>, ParseError> {
        if let Some(keyword) = self.eat_command("as") {
            let token = self.expect_kind(TokenKind::IDENTIFIER | TokenKind::TYPE, "alias")?;
            let mut comments = all_comments(keyword);
            comments.extend(all_comments(token));
            return Ok(Some((identifier(token), comments)));
        }
        Ok(self
            .eat_kind(TokenKind::IDENTIFIER)
            .map(|token| (identifier(token), all_comments(token))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ExprKind;
    use crate::lexer::tokenize;

    fn parse(sql: &str) -> SelectClause {
        let tokens = tokenize(sql).unwrap();
        let mut parser = Parser::new(&tokens);
        let clause = SelectClause::parse(&mut parser).unwrap();
        parser.expect_end().unwrap();
        clause
    }

    #[test]
    fn test_items_and_aliases() {
        let clause = parse("select a, b as total, count(*) n");
        assert_eq!(clause.items.len(), 3);
        assert_eq!(clause.items[0].name(), Some("a"));
        assert_eq!(clause.items[1].name(), Some("total"));
        assert_eq!(clause.items[2].alias, Some(Identifier::new("n")));
    }

    #[test]
    fn test_alias_named_like_a_type() {
        let clause = parse("select created_at as date");
        assert_eq!(clause.items[0].alias, Some(Identifier::new("date")));
    }

    #[test]
    fn test_distinct_forms() {
        assert_eq!(parse("select distinct a").distinct, Some(Distinct::Distinct));
        assert_eq!(parse("select all a").distinct, Some(Distinct::All));
        assert!(matches!(
            parse("select distinct on (a, b) a, c").distinct,
            Some(Distinct::On(ref values)) if values.len() == 2
        ));
    }

    #[test]
    fn test_quantifier_comments_move_to_values() {
        let clause = parse("select distinct /* once */ a");
        assert_eq!(clause.to_string(), "select distinct /* once */ a");

        let clause = parse("select distinct /* key */ on (a) /* done */ a");
        assert_eq!(clause.to_string(), "select distinct on (/* key */ a /* done */) a");
    }

    #[test]
    fn test_hints() {
        let clause = parse("select /*+ INDEX(t idx) */ a");
        assert_eq!(clause.hints, vec!["/*+ INDEX(t idx) */".to_string()]);
        assert_eq!(clause.to_string(), "select /*+ INDEX(t idx) */ a");
    }

    #[test]
    fn test_wildcards() {
        let clause = parse("select *, t.*");
        assert!(matches!(clause.items[0].value.kind, ExprKind::Wildcard { .. }));
        assert!(matches!(
            clause.items[1].value.kind,
            ExprKind::Wildcard { ref namespaces } if namespaces.len() == 1
        ));
    }

    #[test]
    fn test_empty_list_fails() {
        let tokens = tokenize("select from t").unwrap();
        let err = SelectClause::parse(&mut Parser::new(&tokens)).unwrap_err();
        assert_eq!(err.expected, "expression");
        assert_eq!(err.found.as_deref(), Some("from"));
    }
}
