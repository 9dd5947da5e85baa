//! SQL tokenizer: drives the token readers over an input, one statement at a
//! time.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::chars::char_at;
use super::error::{LexError, LexErrorKind};
use super::readers::{ReadContext, TokenReaderManager};
use super::span::{LineIndex, Span};
use super::token::{Token, TokenKind};
use super::trivia::skip_trivia;
use crate::comments::CommentPosition;

/// One statement of a possibly multi-statement input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSlice {
    /// Tokens of the statement, `;` excluded.
    pub tokens: Vec<Token>,
    /// Byte offset of the first token (or of the resume point when empty).
    pub start: usize,
    /// Byte offset right after the last token.
    pub end: usize,
    /// Where the next statement starts: after the `;` and the trivia
    /// following it.
    pub next_position: usize,
    /// Source text from the first to the last token.
    pub raw_text: String,
    /// Comments carried over from before this statement.
    pub leading_comments: Vec<String>,
    /// Comments after the terminating `;`, to carry into the next statement.
    pub trailing_comments: Vec<String>,
}

impl StatementSlice {
    /// Returns true if the slice holds no token (`;;` or comments only).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Tokenizer over one input string.
pub struct Tokenizer<'a> {
    input: &'a str,
    index: LineIndex,
    readers: TokenReaderManager,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            index: LineIndex::new(input),
            readers: TokenReaderManager::new(),
        }
    }

    /// The input being tokenized.
    #[must_use]
    pub const fn input(&self) -> &'a str {
        self.input
    }

    /// The line table of the input.
    #[must_use]
    pub const fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Tokenizes the first statement of the input.
    ///
    /// Comments before the first token are attached to it as `before`
    /// comments.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` for an unrecognized character or an unterminated
    /// string, comment, bracket identifier or dollar quote.
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        Ok(self
            .read_statement(0, Vec::new())?
            .map(|slice| slice.tokens)
            .unwrap_or_default())
    }

    /// Reads the statement starting at `start`.
    ///
    /// `carry` holds comments left over from the previous statement; they
    /// become the slice's `leading_comments`. Returns `None` once `start` is
    /// at or past the end of input, or when it falls inside a multi-byte
    /// character.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` as [`Tokenizer::tokenize`] does.
    pub fn read_statement(
        &self,
        start: usize,
        carry: Vec<String>,
    ) -> Result<Option<StatementSlice>, LexError> {
        let input = self.input;
        if start >= input.len() || !input.is_char_boundary(start) {
            return Ok(None);
        }

        let mut tokens: Vec<Token> = Vec::new();
        let mut bracket_depth = 0usize;

        let trivia = skip_trivia(input, start)?;
        let mut pending = trivia.comments;
        let mut position = trivia.end;

        while position < input.len() && !input[position..].starts_with(';') {
            let context = ReadContext {
                previous: tokens.last(),
                bracket_depth,
            };
            let Some(lexeme) = self.readers.try_read(input, position, &context)? else {
                let found = char_at(input, position).unwrap_or_default();
                return Err(LexError::with_index(
                    LexErrorKind::UnexpectedCharacter(found),
                    input,
                    &self.index,
                    position,
                ));
            };

            if lexeme.kind.contains(TokenKind::OPEN_BRACKET) {
                bracket_depth += 1;
            } else if lexeme.kind.contains(TokenKind::CLOSE_BRACKET) {
                bracket_depth = bracket_depth.saturating_sub(1);
            }

            let span = Span::new(lexeme.start, lexeme.end);
            let mut token = Token::new(lexeme.kind, lexeme.text, span);
            token.start = self.index.location(lexeme.start);
            token.end = self.index.location(lexeme.end);
            token
                .comments
                .extend(CommentPosition::Before, std::mem::take(&mut pending));
            token.comments.extend(CommentPosition::After, lexeme.comments);

            let trivia = skip_trivia(input, lexeme.end)?;
            position = trivia.end;
            if defers_comments(&token) {
                pending = trivia.comments;
            } else {
                token.comments.extend(CommentPosition::After, trivia.comments);
            }
            tokens.push(token);
        }

        let mut trailing_comments = Vec::new();
        match tokens.last_mut() {
            Some(last) => last.comments.extend(CommentPosition::After, pending),
            None => trailing_comments = pending,
        }

        let (statement_start, statement_end) = match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => (first.span.start, last.span.end),
            _ => (position, position),
        };

        let mut next_position = position;
        if input[position..].starts_with(';') {
            let trivia = skip_trivia(input, position + 1)?;
            trailing_comments.extend(trivia.comments);
            next_position = trivia.end;
        }

        let tokens = relocate_order_by_comments(relocate_set_operation_comments(
            relocate_from_comments(relocate_select_comments(tokens)),
        ));

        debug!(
            start = statement_start,
            end = statement_end,
            tokens = tokens.len(),
            "read statement"
        );

        Ok(Some(StatementSlice {
            tokens,
            start: statement_start,
            end: statement_end,
            next_position,
            raw_text: input[statement_start..statement_end].to_string(),
            leading_comments: carry,
            trailing_comments,
        }))
    }

    /// Iterates over the non-empty statements of the input.
    #[must_use]
    pub fn statements(self) -> StatementReader<'a> {
        StatementReader {
            tokenizer: self,
            position: 0,
            carry: Vec::new(),
            finished: false,
        }
    }
}

/// Iterator over statement slices that threads carried comments from one
/// statement to the next. Empty statements are skipped; their comments move
/// on to the following statement.
pub struct StatementReader<'a> {
    tokenizer: Tokenizer<'a>,
    position: usize,
    carry: Vec<String>,
    finished: bool,
}

impl StatementReader<'_> {
    /// Position the next statement will be read from.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Comments not yet handed to a statement. After the last statement has
    /// been returned these are the comments following its `;`, including
    /// those of any empty statements after it.
    #[must_use]
    pub fn pending_comments(&self) -> &[String] {
        &self.carry
    }

    /// The underlying tokenizer.
    #[must_use]
    pub const fn tokenizer(&self) -> &Tokenizer<'_> {
        &self.tokenizer
    }
}

impl Iterator for StatementReader<'_> {
    type Item = Result<StatementSlice, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let slice = match self.tokenizer.read_statement(self.position, Vec::new()) {
                Ok(Some(mut slice)) => {
                    slice.leading_comments = std::mem::take(&mut self.carry);
                    slice
                }
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(err) => {
                    self.finished = true;
                    return Some(Err(err));
                }
            };
            self.position = slice.next_position;
            if slice.is_empty() {
                self.carry = slice.leading_comments;
                self.carry.extend(slice.trailing_comments);
                continue;
            }
            self.carry.clone_from(&slice.trailing_comments);
            return Some(Ok(slice));
        }
        None
    }
}

/// Comments after a comma or an operator belong to what follows it.
fn defers_comments(token: &Token) -> bool {
    token.kind == TokenKind::COMMA || token.kind == TokenKind::OPERATOR
}

fn is_set_operation(token: &Token) -> bool {
    token.is(TokenKind::COMMAND)
        && matches!(
            token.text.as_str(),
            "union" | "union all" | "intersect" | "intersect all" | "except" | "except all"
        )
}

/// Moves the `after` comments of every token matching `source` to the
/// front of the `before` comments of the token chosen by `target`.
///
/// `target` is called with the tokens following the source and returns the
/// offset of the receiving token, or `None` to leave the comments in place.
fn relocate_after_comments(
    mut tokens: Vec<Token>,
    source: impl Fn(&Token) -> bool,
    target: impl Fn(&[Token]) -> Option<usize>,
) -> Vec<Token> {
    for i in 0..tokens.len() {
        if !source(&tokens[i]) || tokens[i].comments.after().next().is_none() {
            continue;
        }
        let Some(offset) = target(&tokens[i + 1..]) else {
            continue;
        };
        let moved = tokens[i].comments.take(CommentPosition::After);
        tokens[i + 1 + offset]
            .comments
            .prepend(CommentPosition::Before, moved);
    }
    tokens
}

/// `select /* c */ a`: the comment describes `a`.
fn relocate_select_comments(tokens: Vec<Token>) -> Vec<Token> {
    relocate_after_comments(
        tokens,
        |token| token.is_command("select"),
        |rest| {
            for (offset, token) in rest.iter().enumerate() {
                let item = TokenKind::IDENTIFIER
                    | TokenKind::LITERAL
                    | TokenKind::PARAMETER
                    | TokenKind::FUNCTION;
                if token.is(item) || token.is_operator("*") {
                    return Some(offset);
                }
                let skippable = token
                    .is(TokenKind::COMMA | TokenKind::OPERATOR | TokenKind::OPEN_PAREN)
                    || token.is_command("distinct")
                    || token.is_command("all")
                    || token.text.starts_with("/*+");
                if !skippable {
                    return None;
                }
            }
            None
        },
    )
}

/// `from /* c */ users`: the comment describes the first source.
fn relocate_from_comments(tokens: Vec<Token>) -> Vec<Token> {
    relocate_after_comments(
        tokens,
        |token| token.is_command("from"),
        |rest| rest.iter().position(|token| !token.is(TokenKind::COMMAND)),
    )
}

/// `union /* c */ select`: the comment describes the next query.
fn relocate_set_operation_comments(tokens: Vec<Token>) -> Vec<Token> {
    relocate_after_comments(tokens, is_set_operation, |rest| {
        rest.iter()
            .take_while(|token| !is_set_operation(token))
            .position(|token| token.is_command("select"))
    })
}

/// `order by /* c */ a`: the comment describes the first ordering item.
fn relocate_order_by_comments(tokens: Vec<Token>) -> Vec<Token> {
    relocate_after_comments(
        tokens,
        |token| token.is_command("order by"),
        |rest| (!rest.is_empty()).then_some(0),
    )
}
