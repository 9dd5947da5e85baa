//! Whitespace and comment skipping.
//!
//! Comment bodies are recorded (trimmed, without markers) so the tokenizer can
//! attach them to neighbouring tokens. Optimizer hints (`/*+ ... */`) are not
//! trivia: skipping stops in front of them so the command reader can claim
//! them.

use super::chars::is_whitespace;
use super::error::LexError;

/// Whitespace and comments skipped between two tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    /// Position of the first non-trivia character.
    pub end: usize,
    /// Comment bodies in source order.
    pub comments: Vec<String>,
}

/// Returns true if a hint comment starts at `pos`.
#[must_use]
pub fn is_hint_start(input: &str, pos: usize) -> bool {
    input[pos..].starts_with("/*+")
}

/// Skips whitespace and comments from `pos`.
///
/// # Errors
///
/// Returns a `LexError` for a block comment without a closing `*/`.
pub fn skip_trivia(input: &str, pos: usize) -> Result<Trivia, LexError> {
    scan(input, pos, true).map_err(|start| {
        LexError::unterminated("block comment", "*/", input, start)
    })
}

/// Like [`skip_trivia`] but never fails: an unterminated block comment stops
/// the scan in front of it. Used for keyword lookahead, where running into
/// broken input only means "no further keyword".
#[must_use]
pub fn skip_trivia_lenient(input: &str, pos: usize) -> Trivia {
    match scan(input, pos, false) {
        Ok(trivia) => trivia,
        Err(start) => Trivia {
            end: start,
            comments: Vec::new(),
        },
    }
}

fn scan(input: &str, mut pos: usize, strict: bool) -> Result<Trivia, usize> {
    let mut comments = Vec::new();
    loop {
        let rest = &input[pos..];
        let trimmed = rest.trim_start_matches(is_whitespace);
        pos += rest.len() - trimmed.len();

        if trimmed.starts_with("--") {
            let body_end = trimmed.find('\n').unwrap_or(trimmed.len());
            push_body(&mut comments, &trimmed[2..body_end]);
            pos += body_end;
            continue;
        }

        if trimmed.starts_with("/*") && !trimmed.starts_with("/*+") {
            match block_comment_len(trimmed) {
                Some(len) => {
                    push_body(&mut comments, &trimmed[2..len - 2]);
                    pos += len;
                    continue;
                }
                None if strict => return Err(pos),
                None => break,
            }
        }

        break;
    }
    Ok(Trivia { end: pos, comments })
}

/// Returns the byte length of the block comment at the start of `text`,
/// delimiters included. Nested `/* */` pairs are balanced.
#[must_use]
pub fn block_comment_len(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match (bytes[i], bytes[i + 1]) {
            (b'/', b'*') => {
                depth += 1;
                i += 2;
            }
            (b'*', b'/') => {
                depth -= 1;
                i += 2;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => i += 1,
        }
    }
    None
}

fn push_body(comments: &mut Vec<String>, body: &str) {
    let body = body.trim();
    if !body.is_empty() {
        comments.push(body.to_string());
    }
}
