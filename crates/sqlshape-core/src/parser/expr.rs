//! Value expressions.

use super::cursor::{all_comments, identifier, is_word, starts_query, Parser};
use super::error::ParseError;
use super::pratt::{
    infix_binding_power, prefix_binding_power, BETWEEN_BOUND_BINDING_POWER,
    POSTFIX_BINDING_POWER,
};
use super::Parse;
use crate::ast::{
    CastStyle, ColumnRef, Expr, ExprKind, Identifier, InList, Literal, Query, TypeName,
};
use crate::comments::{CommentPosition, Comments};
use crate::lexer::keywords::is_typed_literal_prefix;
use crate::lexer::{Token, TokenKind};

impl Parse for Expr {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        parser.parse_expression(0)
    }
}

impl Parse for TypeName {
    fn parse(parser: &mut Parser<'_>) -> Result<Self, ParseError> {
        parser.parse_type_name()
    }
}

fn is_string_literal(token: &Token) -> bool {
    token.is(TokenKind::LITERAL) && token.text.starts_with('\'')
}

fn with_token_comments(kind: ExprKind, token: &Token) -> Expr {
    Expr {
        kind,
        comments: token.comments.clone(),
    }
}

impl<'t> Parser<'t> {
    /// Parses an expression whose operators bind at least as tightly as
    /// `min_bp`.
    pub fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        while let Some(token) = self.peek() {
            if token.is_operator("::") {
                if POSTFIX_BINDING_POWER < min_bp {
                    break;
                }
                self.advance();
                let mut type_name = self.parse_type_name()?;
                type_name
                    .comments
                    .prepend(CommentPosition::Before, all_comments(token));
                lhs = Expr::new(ExprKind::Cast {
                    expr: Box::new(lhs),
                    type_name,
                    style: CastStyle::Operator,
                });
                continue;
            }

            if token.is(TokenKind::OPEN_BRACKET) {
                if POSTFIX_BINDING_POWER < min_bp {
                    break;
                }
                lhs = self.parse_subscript(lhs)?;
                continue;
            }

            if !token.is(TokenKind::OPERATOR) {
                break;
            }
            // `position(x in s)`: `in` without a list separates arguments.
            if matches!(token.text.as_str(), "in" | "not in")
                && !self
                    .peek_nth(1)
                    .is_some_and(|next| next.is(TokenKind::OPEN_PAREN))
            {
                break;
            }
            let Some((left_bp, right_bp)) = infix_binding_power(&token.text) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }
            self.advance();
            lhs = self.parse_infix(lhs, token, right_bp)?;
        }

        Ok(lhs)
    }

    /// Parses `expr (, expr)*`.
    pub fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut items = vec![self.parse_expression(0)?];
        while self.eat_kind(TokenKind::COMMA).is_some() {
            items.push(self.parse_expression(0)?);
        }
        Ok(items)
    }

    fn parse_infix(&mut self, lhs: Expr, op: &'t Token, right_bp: u8) -> Result<Expr, ParseError> {
        let negated = op.text.starts_with("not ");
        let kind = match op.text.as_str() {
            "between" | "not between" => {
                let mut low = self.parse_expression(BETWEEN_BOUND_BINDING_POWER)?;
                low.comments.prepend(CommentPosition::Before, all_comments(op));
                let and = self.expect_operator("and")?;
                let mut high = self.parse_expression(BETWEEN_BOUND_BINDING_POWER)?;
                high.comments.prepend(CommentPosition::Before, all_comments(and));
                ExprKind::Between {
                    expr: Box::new(lhs),
                    negated,
                    low: Box::new(low),
                    high: Box::new(high),
                }
            }
            "in" | "not in" => {
                let open = self.expect_open_paren()?;
                let mut leading = all_comments(op);
                leading.extend(all_comments(open));
                let list = if self.peek().is_some_and(starts_query) {
                    let mut query = Query::parse(self)?;
                    query
                        .leading_comments_mut()
                        .prepend(CommentPosition::Before, leading);
                    InList::Query(Box::new(query))
                } else {
                    let mut values = self.parse_expression_list()?;
                    if let Some(first) = values.first_mut() {
                        first.comments.prepend(CommentPosition::Before, leading);
                    }
                    InList::Values(values)
                };
                let close = self.expect_close_paren()?;
                let mut comments = Comments::new();
                comments.extend(CommentPosition::After, all_comments(close));
                return Ok(Expr {
                    kind: ExprKind::In {
                        expr: Box::new(lhs),
                        negated,
                        list,
                    },
                    comments,
                });
            }
            text => {
                let mut right = self.parse_expression(right_bp)?;
                right.comments.prepend(CommentPosition::Before, all_comments(op));
                ExprKind::Binary {
                    left: Box::new(lhs),
                    op: text.to_string(),
                    right: Box::new(right),
                }
            }
        };
        Ok(Expr::new(kind))
    }

    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.error("expression"));
        };

        if token.is(TokenKind::TYPE) {
            return self.parse_type_prefixed(token);
        }
        if token.is(TokenKind::OPERATOR) {
            return self.parse_prefix_operator(token);
        }
        if token.is(TokenKind::LITERAL) {
            self.advance();
            return Ok(with_token_comments(
                ExprKind::Literal(Literal::new(token.text.as_str())),
                token,
            ));
        }
        if token.is(TokenKind::PARAMETER) {
            self.advance();
            return Ok(with_token_comments(
                ExprKind::Parameter {
                    text: token.text.clone(),
                },
                token,
            ));
        }
        if token.is(TokenKind::STRING_SPECIFIER) {
            self.advance();
            let literal = self.expect_kind(TokenKind::LITERAL, "string literal")?;
            let mut expr = with_token_comments(
                ExprKind::PrefixedString {
                    specifier: token.text.clone(),
                    literal: Literal::new(literal.text.as_str()),
                },
                token,
            );
            expr.comments.merge(literal.comments.clone());
            return Ok(expr);
        }
        if token.is(TokenKind::OPEN_PAREN) {
            return self.parse_parenthesized();
        }
        if token.is(TokenKind::FUNCTION) {
            self.advance();
            return self.parse_function_call(Vec::new(), token);
        }
        if token.is(TokenKind::IDENTIFIER) {
            return self.parse_name();
        }
        if token.is_command("case") || token.is_command("case when") {
            return self.parse_case();
        }
        if token.is_command("default") {
            self.advance();
            return Ok(with_token_comments(ExprKind::Default, token));
        }
        Err(self.error("expression"))
    }

    /// `interval '1 day'`, `date(x)`, or a column named like a type.
    fn parse_type_prefixed(&mut self, token: &'t Token) -> Result<Expr, ParseError> {
        let next = self.peek_nth(1);
        if next.is_some_and(is_string_literal) {
            self.advance();
            let literal = self.next_token("string literal")?;
            let mut expr = with_token_comments(
                ExprKind::TypedLiteral {
                    type_name: token.text.clone(),
                    literal: Literal::new(literal.text.as_str()),
                },
                token,
            );
            expr.comments.merge(literal.comments.clone());
            return Ok(expr);
        }
        if !is_typed_literal_prefix(&token.text) && !token.is(TokenKind::IDENTIFIER) {
            return Err(self.error("expression"));
        }
        self.advance();
        if self.check_kind(TokenKind::OPEN_PAREN) {
            return self.parse_function_call(Vec::new(), token);
        }
        Ok(with_token_comments(
            ExprKind::Column(ColumnRef {
                namespaces: Vec::new(),
                name: identifier(token),
            }),
            token,
        ))
    }

    fn parse_prefix_operator(&mut self, token: &'t Token) -> Result<Expr, ParseError> {
        match token.text.as_str() {
            "*" => {
                self.advance();
                Ok(with_token_comments(
                    ExprKind::Wildcard {
                        namespaces: Vec::new(),
                    },
                    token,
                ))
            }
            "exists" | "not exists" => {
                self.advance();
                let open = self.expect_open_paren()?;
                let mut query = Query::parse(self)?;
                query
                    .leading_comments_mut()
                    .prepend(CommentPosition::Before, all_comments(open));
                let close = self.expect_close_paren()?;
                let mut expr = with_token_comments(
                    ExprKind::Exists {
                        negated: token.text.starts_with("not"),
                        query: Box::new(query),
                    },
                    token,
                );
                expr.comments.merge(close.comments.clone());
                Ok(expr)
            }
            op => {
                let Some(bp) = prefix_binding_power(op) else {
                    return Err(self.error("expression"));
                };
                self.advance();
                let operand = self.parse_expression(bp)?;
                Ok(with_token_comments(
                    ExprKind::Unary {
                        op: op.to_string(),
                        operand: Box::new(operand),
                    },
                    token,
                ))
            }
        }
    }

    /// Column references, `t.*`, qualified function calls and `array[...]`.
    fn parse_name(&mut self) -> Result<Expr, ParseError> {
        let first = self.next_token("identifier")?;

        if is_word(first, "array") && self.check_kind(TokenKind::OPEN_BRACKET) {
            return self.parse_array(first);
        }
        if self.check_kind(TokenKind::OPEN_PAREN) {
            return self.parse_function_call(Vec::new(), first);
        }

        let mut comments = first.comments.clone();
        let mut namespaces: Vec<Identifier> = Vec::new();
        let mut name = identifier(first);

        while let Some(dot) = self.peek().filter(|token| token.is(TokenKind::DOT)) {
            let Some(next) = self.peek_nth(1) else {
                break;
            };
            if next.is(TokenKind::FUNCTION) {
                self.advance();
                self.advance();
                namespaces.push(name);
                comments.extend(CommentPosition::After, all_comments(dot));
                let mut expr = self.parse_function_call(namespaces, next)?;
                expr.comments
                    .prepend(CommentPosition::Before, comments.take(CommentPosition::Before));
                expr.comments.merge(comments);
                return Ok(expr);
            }
            if next.is_operator("*") {
                self.advance();
                self.advance();
                namespaces.push(name);
                comments.extend(CommentPosition::After, all_comments(dot));
                comments.merge(next.comments.clone());
                return Ok(Expr {
                    kind: ExprKind::Wildcard { namespaces },
                    comments,
                });
            }
            if !next.is(TokenKind::IDENTIFIER) {
                break;
            }
            self.advance();
            self.advance();
            comments.extend(CommentPosition::After, all_comments(dot));
            namespaces.push(name);
            name = identifier(next);
            comments.merge(next.comments.clone());
        }

        Ok(Expr {
            kind: ExprKind::Column(ColumnRef { namespaces, name }),
            comments,
        })
    }

    fn parse_array(&mut self, keyword: &'t Token) -> Result<Expr, ParseError> {
        let open = self.expect_kind(TokenKind::OPEN_BRACKET, "'['")?;
        let mut comments = keyword.comments.clone();
        let items = if self.check_kind(TokenKind::CLOSE_BRACKET) {
            comments.extend(CommentPosition::After, all_comments(open));
            Vec::new()
        } else {
            let mut items = self.parse_expression_list()?;
            if let Some(first) = items.first_mut() {
                first.comments.prepend(CommentPosition::Before, all_comments(open));
            }
            items
        };
        let close = self.expect_kind(TokenKind::CLOSE_BRACKET, "']'")?;
        comments.extend(CommentPosition::After, all_comments(close));
        Ok(Expr {
            kind: ExprKind::Array(items),
            comments,
        })
    }

    /// `(expr)`, `(a, b)` or `(select ...)`.
    fn parse_parenthesized(&mut self) -> Result<Expr, ParseError> {
        let open = self.expect_open_paren()?;
        let kind = if self.peek().is_some_and(starts_query) {
            ExprKind::Subquery(Box::new(Query::parse(self)?))
        } else {
            let first = self.parse_expression(0)?;
            if self.check_kind(TokenKind::COMMA) {
                let mut items = vec![first];
                while self.eat_kind(TokenKind::COMMA).is_some() {
                    items.push(self.parse_expression(0)?);
                }
                ExprKind::Tuple(items)
            } else {
                ExprKind::Paren(Box::new(first))
            }
        };
        let close = self.expect_close_paren()?;
        let mut expr = with_token_comments(kind, open);
        expr.comments.merge(close.comments.clone());
        Ok(expr)
    }

    /// `value[index]` or `value[lower:upper]`, either bound optional.
    ///
    /// Comments inside the brackets go to the bound they precede; the rest
    /// are rendered after `]`.
    fn parse_subscript(&mut self, value: Expr) -> Result<Expr, ParseError> {
        let open = self.expect_kind(TokenKind::OPEN_BRACKET, "'['")?;
        let mut comments = Comments::new();
        let lower = if self.check_operator(":") {
            comments.extend(CommentPosition::After, all_comments(open));
            None
        } else {
            let mut lower = self.parse_expression(0)?;
            lower.comments.prepend(CommentPosition::Before, all_comments(open));
            Some(Box::new(lower))
        };

        let kind = if let Some(colon) = self.eat_operator(":") {
            let upper = if self.check_kind(TokenKind::CLOSE_BRACKET) {
                comments.extend(CommentPosition::After, all_comments(colon));
                None
            } else {
                let mut upper = self.parse_expression(0)?;
                upper.comments.prepend(CommentPosition::Before, all_comments(colon));
                Some(Box::new(upper))
            };
            ExprKind::Slice {
                expr: Box::new(value),
                lower,
                upper,
            }
        } else {
            match lower {
                Some(index) => ExprKind::Index {
                    expr: Box::new(value),
                    index,
                },
                None => return Err(self.error("':'")),
            }
        };

        let close = self.expect_kind(TokenKind::CLOSE_BRACKET, "']'")?;
        comments.extend(CommentPosition::After, all_comments(close));
        Ok(Expr { kind, comments })
    }

    /// A type name after `::` or `as`: `int`, `numeric(10, 2)`,
    /// `pg_catalog.int4`, `text[]`, `timestamp with time zone`.
    pub fn parse_type_name(&mut self) -> Result<TypeName, ParseError> {
        if !self.check_kind(TokenKind::TYPE | TokenKind::IDENTIFIER) {
            return Err(self.error("type name"));
        }
        let first = self.next_token("type name")?;

        let mut type_name = TypeName::new(first.text.as_str());
        type_name.comments = first.comments.clone();
        let mut inner = Vec::new();
        while self.check_kind(TokenKind::DOT)
            && self
                .peek_nth(1)
                .is_some_and(|next| next.is(TokenKind::TYPE | TokenKind::IDENTIFIER))
        {
            let dot = self.next_token("'.'")?;
            let part = self.next_token("type name")?;
            inner.extend(all_comments(dot));
            inner.extend(all_comments(part));
            let qualifier = std::mem::replace(&mut type_name.name, part.text.clone());
            type_name.namespaces.push(Identifier::new(qualifier));
        }

        if let Some(open) = self.eat_kind(TokenKind::OPEN_PAREN) {
            inner.extend(all_comments(open));
            type_name.args = self.parse_expression_list()?;
            let close = self.expect_close_paren()?;
            inner.extend(all_comments(close));
        }

        while self.check_kind(TokenKind::OPEN_BRACKET)
            && self
                .peek_nth(1)
                .is_some_and(|next| next.is(TokenKind::CLOSE_BRACKET))
        {
            let open = self.next_token("'['")?;
            let close = self.next_token("']'")?;
            inner.extend(all_comments(open));
            inner.extend(all_comments(close));
            type_name.array_dimensions += 1;
        }

        type_name.comments.extend(CommentPosition::After, inner);
        Ok(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::LiteralKind;
    use crate::lexer::tokenize;

    fn expr(sql: &str) -> Expr {
        let tokens = tokenize(sql).unwrap();
        let mut parser = Parser::new(&tokens);
        let expr = parser.parse_expression(0).unwrap();
        parser.expect_end().unwrap();
        expr
    }

    #[test]
    fn test_precedence() {
        let parsed = expr("1 + 2 * 3");
        let ExprKind::Binary { op, right, .. } = &parsed.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, "+");
        assert!(matches!(&right.kind, ExprKind::Binary { op, .. } if op == "*"));
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(expr("a - b - c").to_string(), "a - b - c");
        let parsed = expr("a - b - c");
        let ExprKind::Binary { left, .. } = &parsed.kind else {
            panic!("expected binary");
        };
        assert!(matches!(left.kind, ExprKind::Binary { .. }));
    }

    #[test]
    fn test_logical_precedence() {
        let parsed = expr("a = 1 or b = 2 and not c");
        let ExprKind::Binary { op, right, .. } = &parsed.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, "or");
        assert!(matches!(&right.kind, ExprKind::Binary { op, .. } if op == "and"));
    }

    #[test]
    fn test_cast_operator() {
        let parsed = expr("x::int");
        let ExprKind::Cast {
            type_name, style, ..
        } = &parsed.kind
        else {
            panic!("expected cast");
        };
        assert_eq!(type_name.name, "int");
        assert_eq!(*style, CastStyle::Operator);
    }

    #[test]
    fn test_cast_with_modifiers_and_array() {
        assert_eq!(expr("x::numeric(10, 2)").to_string(), "x::numeric(10, 2)");
        assert_eq!(expr("tags::text[]").to_string(), "tags::text[]");
    }

    #[test]
    fn test_slice_and_index() {
        assert!(matches!(expr("arr[1:2]").kind, ExprKind::Slice { .. }));
        assert!(matches!(expr("arr[1]").kind, ExprKind::Index { .. }));
        assert_eq!(expr("arr[:2]").to_string(), "arr[:2]");
        assert_eq!(expr("arr[2:]").to_string(), "arr[2:]");
    }

    #[test]
    fn test_between_binds_its_and() {
        let parsed = expr("a between 1 and 2 and b");
        let ExprKind::Binary { left, op, .. } = &parsed.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, "and");
        assert!(matches!(left.kind, ExprKind::Between { negated: false, .. }));
    }

    #[test]
    fn test_in_list_and_subquery() {
        assert!(matches!(
            expr("a not in (1, 2)").kind,
            ExprKind::In {
                negated: true,
                list: InList::Values(_),
                ..
            }
        ));
        assert!(matches!(
            expr("a in (select id from t)").kind,
            ExprKind::In {
                list: InList::Query(_),
                ..
            }
        ));
    }

    #[test]
    fn test_typed_literal() {
        let parsed = expr("interval '1 day'");
        assert!(matches!(
            &parsed.kind,
            ExprKind::TypedLiteral { type_name, .. } if type_name == "interval"
        ));
    }

    #[test]
    fn test_type_keyword_as_column() {
        assert!(parsed_is_column(&expr("date"), "date"));
    }

    fn parsed_is_column(parsed: &Expr, name: &str) -> bool {
        parsed.as_column().is_some_and(|column| column.name.name == name)
    }

    #[test]
    fn test_prefixed_string() {
        let parsed = expr("E'a\\nb'");
        assert!(matches!(
            &parsed.kind,
            ExprKind::PrefixedString { specifier, .. } if specifier == "e"
        ));
    }

    #[test]
    fn test_qualified_names() {
        let parsed = expr("public.users.id");
        let column = parsed.as_column().unwrap();
        assert_eq!(column.namespaces.len(), 2);
        assert_eq!(column.name.name, "id");
        assert!(matches!(
            expr("u.*").kind,
            ExprKind::Wildcard { ref namespaces } if namespaces.len() == 1
        ));
    }

    #[test]
    fn test_unary_and_literals() {
        assert_eq!(expr("-x").to_string(), "-x");
        assert_eq!(expr("-1").as_literal().unwrap().kind, LiteralKind::Number);
        assert_eq!(expr("not a").to_string(), "not a");
    }

    #[test]
    fn test_tuple_and_paren() {
        assert!(matches!(
            expr("(a, b)").kind,
            ExprKind::Tuple(ref items) if items.len() == 2
        ));
        assert!(matches!(expr("(a + b)").kind, ExprKind::Paren(_)));
    }

    #[test]
    fn test_custom_operators() {
        assert_eq!(expr("data ->> 'name'").to_string(), "data ->> 'name'");
        assert_eq!(expr("a || b || c").to_string(), "a || b || c");
        assert_eq!(expr("tags @> array['x']").to_string(), "tags @> array['x']");
    }

    #[test]
    fn test_missing_operand() {
        let tokens = tokenize("1 +").unwrap();
        let err = Parser::new(&tokens).parse_expression(0).unwrap_err();
        assert!(err.message.contains("reached end of input"));
    }
}
