//! Clauses that follow FROM, plus WITH and RETURNING.

use super::cursor::{all_comments, identifier, Parser};
use super::error::ParseError;
use super::Parse;
use crate::ast::{
    CommonTable, FetchClause, ForClause, FrameBound, FrameUnit, GroupByClause, HavingClause,
    LimitClause, LockStrength, LockWait, NamedWindow, NullsPosition, OffsetClause,
    OrderByClause, OrderByItem, Query, ReturningClause, SortDirection, WhereClause,
    WindowClause, WindowFrame, WindowSpec, WithClause,
};
use crate::comments::{CommentPosition, Comments};
use crate::lexer::TokenKind;

const LOCK_STRENGTHS: &[(&str, LockStrength)] = &[
    ("update", LockStrength::Update),
    ("no key update", LockStrength::NoKeyUpdate),
    ("share", LockStrength::Share),
    ("key share", LockStrength::KeyShare),
];

const LOCK_WAITS: &[(&str, LockWait)] = &[
    ("nowait", LockWait::NoWait),
    ("skip locked", LockWait::SkipLocked),
];

impl Parse for WhereClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("where")?;
        Ok(Self {
            condition: parser.parse_expression(0)?,
            comments: keyword.comments.clone(),
        })
    }
}

impl Parse for GroupByClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("group by")?;
        Ok(Self {
            items: parser.parse_expression_list()?,
            comments: keyword.comments.clone(),
        })
    }
}

impl Parse for HavingClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("having")?;
        Ok(Self {
            condition: parser.parse_expression(0)?,
            comments: keyword.comments.clone(),
        })
    }
}

impl Parse for OrderByClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("order by")?;
        Ok(Self {
            items: parser.parse_order_by_items()?,
            comments: keyword.comments.clone(),
        })
    }
}

impl Parse for OrderByItem {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let mut value = parser.parse_expression(0)?;

        let direction = if let Some(keyword) = parser.eat_command("asc") {
            value.comments.extend(CommentPosition::After, all_comments(keyword));
            Some(SortDirection::Ascending)
        } else if let Some(keyword) = parser.eat_command("desc") {
            value.comments.extend(CommentPosition::After, all_comments(keyword));
            Some(SortDirection::Descending)
        } else {
            None
        };

        let nulls = if let Some(keyword) = parser.eat_command("nulls first") {
            value.comments.extend(CommentPosition::After, all_comments(keyword));
            Some(NullsPosition::First)
        } else if let Some(keyword) = parser.eat_command("nulls last") {
            value.comments.extend(CommentPosition::After, all_comments(keyword));
            Some(NullsPosition::Last)
        } else {
            None
        };

        Ok(Self {
            value,
            direction,
            nulls,
        })
    }
}

impl Parse for LimitClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("limit")?;
        let mut comments = keyword.comments.clone();
        let value = if let Some(all) = parser.eat_command("all") {
            comments.extend(CommentPosition::After, all_comments(all));
            None
        } else {
            Some(parser.parse_expression(0)?)
        };
        Ok(Self { value, comments })
    }
}

impl Parse for OffsetClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("offset")?;
        let mut value = parser.parse_expression(0)?;
        let rows_keyword = parser
            .eat_command("rows")
            .or_else(|| parser.eat_word("row"))
            .map(|token| {
                value.comments.extend(CommentPosition::After, all_comments(token));
                token.text.to_lowercase()
            });
        Ok(Self {
            value,
            rows_keyword,
            comments: keyword.comments.clone(),
        })
    }
}

impl Parse for FetchClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("fetch")?;
        let position = parser
            .eat_word("first")
            .or_else(|| parser.eat_word("next"))
            .ok_or_else(|| parser.error("'first' or 'next'"))?;

        let mut trailing_comments = Vec::new();
        let count = if parser.check_command("rows") || parser.check_word("row") {
            trailing_comments.extend(all_comments(position));
            None
        } else {
            let mut count = parser.parse_expression(0)?;
            count.comments.prepend(CommentPosition::Before, all_comments(position));
            Some(count)
        };

        let rows = parser
            .eat_command("rows")
            .or_else(|| parser.eat_word("row"))
            .ok_or_else(|| parser.error("'row' or 'rows'"))?;
        trailing_comments.extend(all_comments(rows));

        let with_ties = if let Some(ties) = parser.eat_command("with ties") {
            trailing_comments.extend(all_comments(ties));
            true
        } else {
            let only = parser.expect_command("only")?;
            trailing_comments.extend(all_comments(only));
            false
        };

        Ok(Self {
            position_keyword: position.text.to_lowercase(),
            count,
            rows_keyword: rows.text.to_lowercase(),
            with_ties,
            comments: keyword.comments.clone(),
            trailing_comments,
        })
    }
}

impl Parse for ForClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("for")?;
        let Some((strength, strength_token)) = LOCK_STRENGTHS
            .iter()
            .find_map(|(word, strength)| parser.eat_command(word).map(|token| (*strength, token)))
        else {
            return Err(parser.error("lock strength"));
        };
        let mut trailing_comments = all_comments(strength_token);

        let mut of = Vec::new();
        if let Some(of_keyword) = parser.eat_word("of") {
            trailing_comments.extend(all_comments(of_keyword));
            loop {
                let (table, table_comments) = parser.parse_table_name()?;
                trailing_comments.extend(table_comments.to_vec());
                of.push(table);
                if parser.eat_kind(TokenKind::COMMA).is_none() {
                    break;
                }
            }
        }

        let wait = LOCK_WAITS.iter().find_map(|(word, wait)| {
            parser.eat_command(word).map(|token| {
                trailing_comments.extend(all_comments(token));
                *wait
            })
        });

        Ok(Self {
            strength,
            of,
            wait,
            comments: keyword.comments.clone(),
            trailing_comments,
        })
    }
}

impl Parse for WindowClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("window")?;
        let mut windows = Vec::new();
        loop {
            let (name, name_token) = parser.parse_identifier("window name")?;
            let mut comments = name_token.comments.clone();
            let as_keyword = parser.expect_command("as")?;
            let open = parser.expect_open_paren()?;
            let spec = WindowSpec::parse(parser)?;
            let close = parser.expect_close_paren()?;
            for token in [as_keyword, open, close] {
                comments.extend(CommentPosition::After, all_comments(token));
            }
            windows.push(NamedWindow {
                name,
                spec,
                comments,
            });
            if parser.eat_kind(TokenKind::COMMA).is_none() {
                break;
            }
        }
        Ok(Self {
            windows,
            comments: keyword.comments.clone(),
        })
    }
}

/// The inside of `over (...)`; the parentheses belong to the caller.
impl Parse for WindowSpec {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let mut spec = Self::default();

        if parser.check_kind(TokenKind::IDENTIFIER) && !parser.check_word("groups") {
            let (base, token) = parser.parse_identifier("window name")?;
            spec.comments.merge(token.comments.clone());
            spec.base = Some(base);
        }
        if let Some(keyword) = parser.eat_command("partition by") {
            spec.partition_by = parser.parse_expression_list()?;
            if let Some(first) = spec.partition_by.first_mut() {
                first.comments.prepend(CommentPosition::Before, all_comments(keyword));
            }
        }
        if let Some(keyword) = parser.eat_command("order by") {
            spec.order_by = parser.parse_order_by_items()?;
            if let Some(first) = spec.order_by.first_mut() {
                first.value.comments.prepend(CommentPosition::Before, all_comments(keyword));
            }
        }

        let unit = if let Some(token) = parser.eat_command("rows") {
            Some((FrameUnit::Rows, token))
        } else if let Some(token) = parser.eat_command("range") {
            Some((FrameUnit::Range, token))
        } else {
            parser.eat_word("groups").map(|token| (FrameUnit::Groups, token))
        };

        if let Some((unit, token)) = unit {
            let comments = &mut spec.comments;
            comments.extend(CommentPosition::After, all_comments(token));
            let frame = if let Some(between) = parser.eat_operator("between") {
                comments.extend(CommentPosition::After, all_comments(between));
                let start = parser.parse_frame_bound(comments)?;
                let and = parser.expect_operator("and")?;
                comments.extend(CommentPosition::After, all_comments(and));
                let end = parser.parse_frame_bound(comments)?;
                WindowFrame {
                    unit,
                    start,
                    end: Some(end),
                }
            } else {
                WindowFrame {
                    unit,
                    start: parser.parse_frame_bound(comments)?,
                    end: None,
                }
            };
            spec.frame = Some(frame);
        }

        Ok(spec)
    }
}

impl Parse for WithClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let (keyword, recursive) = if let Some(keyword) = parser.eat_command("with recursive") {
            (keyword, true)
        } else {
            (parser.expect_command("with")?, false)
        };

        let mut tables = Vec::new();
        loop {
            tables.push(CommonTable::parse(parser)?);
            if parser.eat_kind(TokenKind::COMMA).is_none() {
                break;
            }
        }

        Ok(Self {
            recursive,
            tables,
            comments: keyword.comments.clone(),
        })
    }
}

/// `name [(columns)] as [[not] materialized] (query)`. CTE names followed by
/// a column list arrive as function tokens.
impl Parse for CommonTable {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let name = parser.expect_kind(
            TokenKind::IDENTIFIER | TokenKind::FUNCTION,
            "common table name",
        )?;
        let mut comments = name.comments.clone();

        let columns = if let Some(open) = parser.eat_kind(TokenKind::OPEN_PAREN) {
            comments.extend(CommentPosition::After, all_comments(open));
            let (columns, column_comments) = parser.parse_identifier_list()?;
            comments.extend(CommentPosition::After, column_comments.to_vec());
            let close = parser.expect_close_paren()?;
            comments.extend(CommentPosition::After, all_comments(close));
            columns
        } else {
            Vec::new()
        };

        let as_keyword = parser.expect_command("as")?;
        let mut query_comments = Comments::new();
        query_comments.extend(CommentPosition::Before, all_comments(as_keyword));
        let materialized = if let Some(token) = parser.eat_command("materialized") {
            query_comments.extend(CommentPosition::Before, all_comments(token));
            Some(true)
        } else if let Some(token) = parser.eat_command("not materialized") {
            query_comments.extend(CommentPosition::Before, all_comments(token));
            Some(false)
        } else {
            None
        };

        let open = parser.expect_open_paren()?;
        query_comments.extend(CommentPosition::Before, all_comments(open));
        let query = Query::parse(parser)?;
        let close = parser.expect_close_paren()?;
        query_comments.extend(CommentPosition::After, all_comments(close));

        Ok(Self {
            name: identifier(name),
            columns,
            materialized,
            query: Box::new(query),
            comments,
            query_comments,
        })
    }
}

impl Parse for ReturningClause {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        let keyword = parser.expect_command("returning")?;
        Ok(Self {
            items: parser.parse_select_items()?,
            comments: keyword.comments.clone(),
        })
    }
}

impl Parser<'_> {
    /// Parses `item (, item)*` after `order by`.
    pub(crate) fn parse_order_by_items(&mut self) -> Result<Vec<OrderByItem>, ParseError> {
        let mut items = vec![OrderByItem::parse(self)?];
        while self.eat_kind(TokenKind::COMMA).is_some() {
            items.push(OrderByItem::parse(self)?);
        }
        Ok(items)
    }

    /// One frame bound; comments on its keywords go to `comments`.
    fn parse_frame_bound(&mut self, comments: &mut Comments) -> Result<FrameBound, ParseError> {
        let keyword_bounds = [
            ("unbounded preceding", FrameBound::UnboundedPreceding),
            ("unbounded following", FrameBound::UnboundedFollowing),
            ("current row", FrameBound::CurrentRow),
        ];
        for (keyword, bound) in keyword_bounds {
            if let Some(token) = self.eat_command(keyword) {
                comments.extend(CommentPosition::After, all_comments(token));
                return Ok(bound);
            }
        }
        let offset = Box::new(self.parse_expression(0)?);
        if let Some(token) = self.eat_word("preceding") {
            comments.extend(CommentPosition::After, all_comments(token));
            Ok(FrameBound::Preceding(offset))
        } else if let Some(token) = self.eat_word("following") {
            comments.extend(CommentPosition::After, all_comments(token));
            Ok(FrameBound::Following(offset))
        } else {
            Err(self.error("'preceding' or 'following'"))
        }
    }

    /// Parses `T` if the current token is `keyword`.
    pub(crate) fn parse_optional<T: Parse>(
        &mut self,
        keyword: &str,
    ) -> Result<Option<T>, ParseError> {
        if self.check_command(keyword) {
            T::parse(self).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse<T: Parse>(sql: &str) -> T {
        let tokens = tokenize(sql).unwrap();
        let mut parser = Parser::new(&tokens);
        let node = T::parse(&mut parser).unwrap();
        parser.expect_end().unwrap();
        node
    }

    #[test]
    fn test_order_by_directions() {
        let clause: OrderByClause = parse("order by a, b desc nulls last, c asc");
        assert_eq!(clause.items.len(), 3);
        assert_eq!(clause.items[0].direction, None);
        assert_eq!(clause.items[0].direction(), SortDirection::Ascending);
        assert_eq!(clause.items[1].direction, Some(SortDirection::Descending));
        assert_eq!(clause.items[1].nulls, Some(NullsPosition::Last));
        assert_eq!(clause.items[2].direction, Some(SortDirection::Ascending));
    }

    #[test]
    fn test_offset_and_fetch() {
        let offset: OffsetClause = parse("offset 10 rows");
        assert_eq!(offset.rows_keyword.as_deref(), Some("rows"));

        let fetch: FetchClause = parse("fetch first 5 rows only");
        assert_eq!(fetch.position_keyword, "first");
        assert!(fetch.count.is_some());
        assert!(!fetch.with_ties);

        let fetch: FetchClause = parse("fetch next row with ties");
        assert!(fetch.count.is_none());
        assert_eq!(fetch.rows_keyword, "row");
        assert!(fetch.with_ties);
    }

    #[test]
    fn test_fetch_requires_only() {
        let tokens = tokenize("fetch first 5 rows").unwrap();
        let err = FetchClause::parse(&mut Parser::new(&tokens)).unwrap_err();
        assert_eq!(err.expected, "'only'");
    }

    #[test]
    fn test_for_clause() {
        let clause: ForClause = parse("for no key update of orders, items skip locked");
        assert_eq!(clause.strength, LockStrength::NoKeyUpdate);
        assert_eq!(clause.of.len(), 2);
        assert_eq!(clause.wait, Some(LockWait::SkipLocked));
        assert_eq!(clause.to_string(), "for no key update of orders, items skip locked");
    }

    #[test]
    fn test_window_frames() {
        let clause: WindowClause = parse(
            "window w as (partition by a order by b \
             rows between unbounded preceding and current row)",
        );
        let frame = clause.windows[0].spec.frame.as_ref().unwrap();
        assert_eq!(frame.unit, FrameUnit::Rows);
        assert_eq!(frame.start, FrameBound::UnboundedPreceding);
        assert_eq!(frame.end, Some(FrameBound::CurrentRow));

        let spec: WindowSpec = parse("range 3 preceding");
        assert!(matches!(
            spec.frame,
            Some(WindowFrame {
                unit: FrameUnit::Range,
                start: FrameBound::Preceding(_),
                end: None
            })
        ));

        let spec: WindowSpec = parse("w groups between 1 preceding and 1 following");
        assert_eq!(spec.base.map(|base| base.name), Some("w".to_string()));
        assert_eq!(spec.frame.map(|frame| frame.unit), Some(FrameUnit::Groups));
    }

    #[test]
    fn test_with_clause() {
        let with: WithClause =
            parse("with recursive t(n) as (select 1), u as not materialized (select 2)");
        assert!(with.recursive);
        assert_eq!(with.tables.len(), 2);
        assert_eq!(with.tables[0].name.name, "t");
        assert_eq!(with.tables[0].columns.len(), 1);
        assert_eq!(with.tables[1].materialized, Some(false));
    }

    #[test]
    fn test_cte_name_keeps_case() {
        let with: WithClause = parse("with MyCte(a) as (select 1)");
        assert_eq!(with.tables[0].name.name, "MyCte");
        assert_eq!(with.to_string(), "with MyCte(a) as (select 1)");
    }

    #[test]
    fn test_fetch_and_for_keep_trailing_comments() {
        let fetch: FetchClause = parse("fetch first 5 rows only /* page */");
        assert_eq!(fetch.trailing_comments, vec!["page"]);
        assert_eq!(fetch.to_string(), "fetch first 5 rows only /* page */");

        let clause: ForClause = parse("for update /* lock */ of t /* rows */");
        assert_eq!(clause.to_string(), "for update of t /* lock */ /* rows */");
    }

    #[test]
    fn test_group_by_and_having() {
        let group: GroupByClause = parse("group by a, b");
        assert_eq!(group.items.len(), 2);
        let having: HavingClause = parse("having count(*) > 1");
        assert_eq!(having.condition.to_string(), "count(*) > 1");
    }
}
