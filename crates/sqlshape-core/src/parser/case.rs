//! CASE expressions.

use super::cursor::{all_comments, Parser};
use super::error::ParseError;
use crate::ast::{CaseExpr, CaseKeyValuePair, Expr, ExprKind, SwitchCaseArgument};
use crate::comments::{CommentPosition, Comments};

impl Parser<'_> {
    /// Parses `case [operand] when k then v ... [else e] end`.
    ///
    /// The lexer reads the searched form's opening as the single keyword
    /// `case when`, so both forms arrive here on their first token.
    pub(crate) fn parse_case(&mut self) -> Result<Expr, ParseError> {
        let case = self.next_token("'case'")?;
        let searched = case.is_command("case when");

        let mut comments = Comments::new();
        comments.extend(CommentPosition::Before, case.comments_before().map(String::from));
        let trailing: Vec<String> = case.comments_after().map(String::from).collect();

        let mut cases = Vec::new();
        let operand = if searched {
            cases.push(self.parse_case_pair(trailing)?);
            None
        } else {
            if self.check_command("end") {
                return Err(self.error("'when'"));
            }
            let mut operand = self.parse_expression(0)?;
            operand.comments.prepend(CommentPosition::Before, trailing);
            Some(Box::new(operand))
        };

        loop {
            let Some(when) = self.eat_command("when") else {
                break;
            };
            cases.push(self.parse_case_pair(all_comments(when))?);
        }
        if cases.is_empty() {
            return Err(self.error("'when'"));
        }

        let mut switch_comments = Comments::new();
        let else_value = match self.eat_command("else") {
            Some(keyword) => {
                switch_comments.extend(CommentPosition::Before, all_comments(keyword));
                Some(Box::new(self.parse_expression(0)?))
            }
            None => None,
        };

        let end = self.expect_command("end")?;
        switch_comments.extend(CommentPosition::After, all_comments(end));

        Ok(Expr {
            kind: ExprKind::Case(CaseExpr {
                operand,
                switch: SwitchCaseArgument {
                    cases,
                    else_value,
                    comments: switch_comments,
                },
            }),
            comments,
        })
    }

    /// Parses `<key> then <value>` after a `when` whose comments are given.
    fn parse_case_pair(
        &mut self,
        when_comments: Vec<String>,
    ) -> Result<CaseKeyValuePair, ParseError> {
        let key = self.parse_expression(0)?;
        let then = self.expect_command("then")?;
        let value = self.parse_expression(0)?;

        let mut comments = Comments::new();
        comments.extend(CommentPosition::Before, when_comments);
        comments.extend(CommentPosition::After, all_comments(then));
        Ok(CaseKeyValuePair {
            key,
            value,
            comments,
        })
    }
}
