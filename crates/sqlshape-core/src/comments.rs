//! Positioned comments shared by tokens and AST nodes.
//!
//! A comment is stored as its body only (no `--` or `/* */` markers) and is
//! tagged with whether it sat before or after the token or keyword it is
//! anchored to.

use serde::{Deserialize, Serialize};

/// Where a comment sits relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentPosition {
    /// The comment precedes the anchor.
    Before,
    /// The comment follows the anchor.
    After,
}

/// A run of comment bodies sharing one position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionedComment {
    /// Position relative to the anchor.
    pub position: CommentPosition,
    /// Comment bodies in source order.
    pub comments: Vec<String>,
}

/// Ordered comments attached to a token or node.
///
/// Source order is preserved within each position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Comments(Vec<PositionedComment>);

impl Comments {
    /// Creates an empty comment set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns true if no comment is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|entry| entry.comments.is_empty())
    }

    /// Appends one comment at the given position.
    pub fn push(&mut self, position: CommentPosition, comment: impl Into<String>) {
        self.extend(position, [comment.into()]);
    }

    /// Appends comments at the given position, after any existing ones.
    pub fn extend(
        &mut self,
        position: CommentPosition,
        comments: impl IntoIterator<Item = String>,
    ) {
        let mut comments = comments.into_iter().peekable();
        if comments.peek().is_none() {
            return;
        }
        match self.0.iter_mut().find(|entry| entry.position == position) {
            Some(entry) => entry.comments.extend(comments),
            None => self.0.push(PositionedComment {
                position,
                comments: comments.collect(),
            }),
        }
    }

    /// Inserts comments at the given position, ahead of any existing ones.
    pub fn prepend(&mut self, position: CommentPosition, comments: Vec<String>) {
        if comments.is_empty() {
            return;
        }
        match self.0.iter_mut().find(|entry| entry.position == position) {
            Some(entry) => {
                let existing = std::mem::replace(&mut entry.comments, comments);
                entry.comments.extend(existing);
            }
            None => self.0.insert(
                0,
                PositionedComment {
                    position,
                    comments,
                },
            ),
        }
    }

    /// Removes and returns every comment at the given position.
    pub fn take(&mut self, position: CommentPosition) -> Vec<String> {
        let mut taken = Vec::new();
        self.0.retain_mut(|entry| {
            if entry.position == position {
                taken.append(&mut entry.comments);
                false
            } else {
                true
            }
        });
        taken
    }

    /// Moves every comment of `other` into `self`, keeping positions.
    pub fn merge(&mut self, other: Self) {
        for entry in other.0 {
            self.extend(entry.position, entry.comments);
        }
    }

    /// Comments positioned before the anchor.
    pub fn before(&self) -> impl Iterator<Item = &str> {
        self.at(CommentPosition::Before)
    }

    /// Comments positioned after the anchor.
    pub fn after(&self) -> impl Iterator<Item = &str> {
        self.at(CommentPosition::After)
    }

    /// Comments at the given position.
    pub fn at(&self, position: CommentPosition) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(move |entry| entry.position == position)
            .flat_map(|entry| entry.comments.iter().map(String::as_str))
    }

    /// Every comment body, before-comments first.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.before().chain(self.after()).map(String::from).collect()
    }

    /// Iterates over the positioned groups.
    pub fn iter(&self) -> impl Iterator<Item = &PositionedComment> {
        self.0.iter()
    }
}

impl FromIterator<(CommentPosition, String)> for Comments {
    fn from_iter<I: IntoIterator<Item = (CommentPosition, String)>>(iter: I) -> Self {
        let mut comments = Self::new();
        for (position, comment) in iter {
            comments.push(position, comment);
        }
        comments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_groups_by_position() {
        let mut comments = Comments::new();
        comments.push(CommentPosition::After, "a");
        comments.push(CommentPosition::Before, "b");
        comments.push(CommentPosition::After, "c");
        assert_eq!(comments.after().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(comments.before().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn test_prepend_keeps_source_order() {
        let mut comments = Comments::new();
        comments.push(CommentPosition::Before, "own");
        comments.prepend(CommentPosition::Before, vec![String::from("moved")]);
        assert_eq!(comments.before().collect::<Vec<_>>(), vec!["moved", "own"]);
    }

    #[test]
    fn test_take_removes_position() {
        let mut comments = Comments::new();
        comments.push(CommentPosition::After, "x");
        comments.push(CommentPosition::Before, "y");
        assert_eq!(comments.take(CommentPosition::After), vec![String::from("x")]);
        assert_eq!(comments.after().count(), 0);
        assert!(!comments.is_empty());
    }

    #[test]
    fn test_empty_extend_is_noop() {
        let mut comments = Comments::new();
        comments.extend(CommentPosition::Before, Vec::new());
        assert!(comments.is_empty());
        assert_eq!(comments.iter().count(), 0);
    }

    #[test]
    fn test_to_vec_lists_before_first() {
        let mut comments = Comments::new();
        comments.push(CommentPosition::After, "tail");
        comments.push(CommentPosition::Before, "head");
        assert_eq!(comments.to_vec(), vec![String::from("head"), String::from("tail")]);
    }
}
