//! Source location tracking for tokens.
//!
//! Offsets are UTF-8 byte offsets into the statement text. Columns are byte
//! columns as well, so a line containing multi-byte characters reports
//! columns that differ from a character count.

use serde::{Deserialize, Serialize};

/// Represents a span in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the span in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merges two spans into one that covers both.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }
}

/// A 1-based line and column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: usize,
    /// Byte column, starting at 1.
    pub column: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Byte offsets of every line start, built once per input.
///
/// Lookups are a binary search, so computing positions for every token of a
/// long input stays linear in the token count.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    /// Builds the index for `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            input
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            line_starts,
            len: input.len(),
        }
    }

    /// Returns the line/column of a byte offset. Offsets past the end clamp
    /// to the end of input.
    #[must_use]
    pub fn location(&self, offset: usize) -> Location {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Location::new(line + 1, offset - self.line_starts[line] + 1)
    }

    /// Returns the byte range of the given 1-based line, without its newline.
    #[must_use]
    pub fn line_range(&self, line: usize) -> (usize, usize) {
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .map_or(self.len, |next| next - 1);
        (start, end)
    }

    /// Number of lines in the input.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Renders the source line holding `offset` with a caret under it.
///
/// ```text
///   2 | select a, # from t
///     |           ^
/// ```
#[must_use]
pub fn render_excerpt(input: &str, index: &LineIndex, offset: usize) -> String {
    let location = index.location(offset);
    let (start, end) = index.line_range(location.line);
    let line = input[start..end].trim_end_matches('\r');
    let gutter = location.line.to_string();
    let pad = " ".repeat(gutter.len());
    // Caret column counts characters so it lines up under multi-byte text.
    let caret_offset = input[start..offset.clamp(start, end)].chars().count();
    format!(
        "{gutter} | {line}\n{pad} | {}^",
        " ".repeat(caret_offset)
    )
}
