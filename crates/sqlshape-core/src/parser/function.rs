//! Function calls and their modifiers.

use super::cursor::{all_comments, is_word, Parser};
use super::error::ParseError;
use super::Parse;
use crate::ast::{
    CastStyle, Expr, ExprKind, FunctionArg, FunctionCall, Identifier, Over, Query, WindowSpec,
};
use crate::comments::{CommentPosition, Comments};
use crate::lexer::keywords::is_date_part_operator;
use crate::lexer::{Token, TokenKind};

/// Words that open `trim(both|leading|trailing ...)`.
const TRIM_SIDES: &[&str] = &["both", "leading", "trailing"];

impl<'t> Parser<'t> {
    /// Parses the argument list and modifiers of a call whose name token
    /// (`name`) has already been consumed.
    pub(crate) fn parse_function_call(
        &mut self,
        namespaces: Vec<Identifier>,
        name: &'t Token,
    ) -> Result<Expr, ParseError> {
        let mut comments = name.comments.clone();
        let function_name = name.text.to_lowercase();

        if namespaces.is_empty() && function_name == "cast" {
            return self.parse_cast(name);
        }
        if namespaces.is_empty() && function_name == "array" && self.check_subquery() {
            let open = self.next_token("'('")?;
            let mut query = Query::parse(self)?;
            query
                .leading_comments_mut()
                .prepend(CommentPosition::Before, all_comments(open));
            let close = self.expect_close_paren()?;
            comments.merge(close.comments.clone());
            return Ok(Expr {
                kind: ExprKind::ArrayQuery(Box::new(query)),
                comments,
            });
        }

        let open = self.expect_open_paren()?;
        comments.merge(open.comments.clone());

        let mut call = FunctionCall::new(function_name, Vec::new());
        call.namespaces = namespaces;

        if !self.check_kind(TokenKind::CLOSE_PAREN) {
            let quantifier = if let Some(token) = self.eat_command("distinct") {
                call.distinct = true;
                all_comments(token)
            } else {
                self.eat_command("all").map(all_comments).unwrap_or_default()
            };
            self.parse_function_args(&mut call)?;
            if let Some(first) = call.args.first_mut() {
                first.value.comments.prepend(CommentPosition::Before, quantifier);
            }
        }
        let close = self.expect_close_paren()?;
        comments.merge(close.comments.clone());

        self.parse_function_modifiers(&mut call, &mut comments)?;

        Ok(Expr {
            kind: ExprKind::Function(call),
            comments,
        })
    }

    /// `cast(value as type)`.
    fn parse_cast(&mut self, name: &'t Token) -> Result<Expr, ParseError> {
        let mut comments = name.comments.clone();
        let open = self.expect_open_paren()?;
        let mut expr = self.parse_expression(0)?;
        expr.comments.prepend(CommentPosition::Before, all_comments(open));
        let keyword = self.expect_command("as")?;
        let mut type_name = self.parse_type_name()?;
        type_name
            .comments
            .prepend(CommentPosition::Before, all_comments(keyword));
        let close = self.expect_close_paren()?;
        comments.merge(close.comments.clone());
        Ok(Expr {
            kind: ExprKind::Cast {
                expr: Box::new(expr),
                type_name,
                style: CastStyle::Function,
            },
            comments,
        })
    }

    fn parse_function_args(&mut self, call: &mut FunctionCall) -> Result<(), ParseError> {
        let (mut keyword, mut keyword_comments) = self.parse_leading_arg_keyword();
        loop {
            let mut value = if self.check_operator("*")
                && self
                    .peek_nth(1)
                    .is_some_and(|next| next.is(TokenKind::CLOSE_PAREN | TokenKind::COMMA))
            {
                let star = self.next_token("'*'")?;
                Expr {
                    kind: ExprKind::Wildcard {
                        namespaces: Vec::new(),
                    },
                    comments: star.comments.clone(),
                }
            } else {
                self.parse_expression(0)?
            };
            value
                .comments
                .prepend(CommentPosition::Before, std::mem::take(&mut keyword_comments));
            call.args.push(FunctionArg { keyword, value });

            if self.eat_kind(TokenKind::COMMA).is_some() {
                keyword = None;
                continue;
            }
            if let Some(separator) = self.eat_arg_separator() {
                keyword = Some(separator.text.to_lowercase());
                keyword_comments = all_comments(separator);
                continue;
            }
            if let Some(order_by) = self.eat_command("order by") {
                call.order_by = self.parse_order_by_items()?;
                if let Some(first) = call.order_by.first_mut() {
                    first
                        .value
                        .comments
                        .prepend(CommentPosition::Before, all_comments(order_by));
                }
            }
            return Ok(());
        }
    }

    /// `extract(year from ...)`, `trim(both from ...)`,
    /// `trim(leading 'x' from ...)`. Returns the keyword and its comments.
    fn parse_leading_arg_keyword(&mut self) -> (Option<String>, Vec<String>) {
        let Some(token) = self.peek() else {
            return (None, Vec::new());
        };
        if token.is(TokenKind::OPERATOR) && is_date_part_operator(&token.text) {
            self.advance();
            return (Some(token.text.clone()), all_comments(token));
        }
        if TRIM_SIDES.iter().any(|side| is_word(token, side)) {
            self.advance();
            let mut keyword = token.text.to_lowercase();
            let mut comments = all_comments(token);
            if let Some(from) = self.eat_command("from") {
                keyword.push_str(" from");
                comments.extend(all_comments(from));
            }
            return (Some(keyword), comments);
        }
        (None, Vec::new())
    }

    /// Keywords that separate arguments: `substring(x from 1 for 2)`,
    /// `position(a in b)`, `overlay(x placing y from 1)`.
    fn eat_arg_separator(&mut self) -> Option<&'t Token> {
        if self.check_command("from") || self.check_command("for") || self.check_operator("in") {
            return self.advance();
        }
        self.eat_word("placing")
    }

    /// `within group (...)`, `filter (where ...)` and `over ...` after the
    /// closing parenthesis.
    ///
    /// Comments on the opening keywords move into the modifier body; those
    /// on closing parentheses and window names go to `comments`, which
    /// renders after the whole call.
    fn parse_function_modifiers(
        &mut self,
        call: &mut FunctionCall,
        comments: &mut Comments,
    ) -> Result<(), ParseError> {
        if let Some(keyword) = self.eat_command("within group") {
            let open = self.expect_open_paren()?;
            let order_by = self.expect_command("order by")?;
            call.within_group = self.parse_order_by_items()?;
            if let Some(first) = call.within_group.first_mut() {
                let mut leading = all_comments(keyword);
                leading.extend(all_comments(open));
                leading.extend(all_comments(order_by));
                first.value.comments.prepend(CommentPosition::Before, leading);
            }
            let close = self.expect_close_paren()?;
            comments.extend(CommentPosition::After, all_comments(close));
        }

        if let Some(keyword) = self.eat_command("filter") {
            let open = self.expect_open_paren()?;
            let where_keyword = self.expect_command("where")?;
            let mut condition = self.parse_expression(0)?;
            let mut leading = all_comments(keyword);
            leading.extend(all_comments(open));
            leading.extend(all_comments(where_keyword));
            condition.comments.prepend(CommentPosition::Before, leading);
            let close = self.expect_close_paren()?;
            comments.extend(CommentPosition::After, all_comments(close));
            call.filter = Some(Box::new(condition));
        }

        if let Some(keyword) = self.eat_command("over") {
            let over = if let Some(open) = self.eat_kind(TokenKind::OPEN_PAREN) {
                let mut spec = WindowSpec::parse(self)?;
                let mut leading = all_comments(keyword);
                leading.extend(all_comments(open));
                spec.comments.prepend(CommentPosition::Before, leading);
                let close = self.expect_close_paren()?;
                comments.extend(CommentPosition::After, all_comments(close));
                Over::Window(spec)
            } else {
                let (name, token) = self.parse_identifier("window name or '('")?;
                comments.extend(CommentPosition::After, all_comments(keyword));
                comments.extend(CommentPosition::After, all_comments(token));
                Over::Named(name)
            };
            call.over = Some(over);
        }

        Ok(())
    }
}
