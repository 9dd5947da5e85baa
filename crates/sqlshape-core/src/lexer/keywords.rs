//! Multi-word keyword recognition.
//!
//! A [`KeywordTrie`] is keyed by lower-case words; a path from the root to a
//! terminal node spells a keyword such as `left outer join`. The
//! [`KeywordParser`] walks that trie over the input, skipping whitespace and
//! comments between words, and reports the longest keyword it confirmed.
//!
//! The tries are built once per process and only ever read afterwards, so
//! every tokenizer shares them by reference.

use std::collections::HashMap;
use std::sync::LazyLock;

use super::chars::word_len;
use super::trivia::skip_trivia_lenient;

/// A node of the keyword trie.
#[derive(Debug, Default, Clone)]
pub struct TrieNode {
    children: HashMap<String, TrieNode>,
    terminal: bool,
}

impl TrieNode {
    /// Returns the child reached by `word` (already lower-case).
    #[must_use]
    pub fn child(&self, word: &str) -> Option<&Self> {
        self.children.get(word)
    }

    /// Returns true if the path to this node is a complete keyword.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// Returns true if a longer keyword continues from this node.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Prefix tree over whitespace-separated keyword sequences.
#[derive(Debug, Default, Clone)]
pub struct KeywordTrie {
    root: TrieNode,
}

impl KeywordTrie {
    /// Builds a trie from keyword phrases such as `"left outer join"`.
    #[must_use]
    pub fn new(phrases: &[&str]) -> Self {
        let mut trie = Self::default();
        for phrase in phrases {
            trie.insert(phrase);
        }
        trie
    }

    /// Adds one phrase. Words are split on whitespace and lower-cased.
    pub fn insert(&mut self, phrase: &str) {
        let mut node = &mut self.root;
        for word in phrase.split_whitespace() {
            node = node.children.entry(word.to_lowercase()).or_default();
        }
        node.terminal = true;
    }

    /// The root node.
    #[must_use]
    pub const fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Returns true if `phrase` is a complete keyword.
    #[must_use]
    pub fn contains(&self, phrase: &str) -> bool {
        let mut node = &self.root;
        for word in phrase.split_whitespace() {
            match node.child(&word.to_lowercase()) {
                Some(next) => node = next,
                None => return false,
            }
        }
        node.terminal
    }
}

/// Result of a successful keyword match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatch {
    /// Canonical keyword: lower-case words joined by single spaces.
    pub keyword: String,
    /// Position right after the last matched word.
    pub end: usize,
    /// Comments found between the matched words.
    pub comments: Vec<String>,
}

/// Longest-match keyword recognizer over one trie.
#[derive(Debug, Clone, Copy)]
pub struct KeywordParser {
    trie: &'static KeywordTrie,
}

impl KeywordParser {
    /// Creates a parser over a shared trie.
    #[must_use]
    pub const fn new(trie: &'static KeywordTrie) -> Self {
        Self { trie }
    }

    /// Matches the longest keyword starting at `position`.
    ///
    /// When a later word breaks the trie path, the parser falls back to the
    /// longest keyword confirmed so far; it returns `None` only if not even
    /// the first word completes a keyword.
    #[must_use]
    pub fn parse(&self, input: &str, position: usize) -> Option<KeywordMatch> {
        let mut node = self.trie.root();
        let mut cursor = position;
        let mut words: Vec<String> = Vec::new();
        let mut comments: Vec<String> = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        let mut best: Option<KeywordMatch> = None;

        loop {
            let len = word_len(input, cursor);
            if len == 0 {
                break;
            }
            let word = input[cursor..cursor + len].to_lowercase();
            let Some(next) = node.child(&word) else {
                break;
            };
            node = next;
            words.push(word);
            comments.append(&mut pending);
            cursor += len;

            if node.is_terminal() {
                best = Some(KeywordMatch {
                    keyword: words.join(" "),
                    end: cursor,
                    comments: comments.clone(),
                });
            }
            if !node.has_children() {
                break;
            }

            let trivia = skip_trivia_lenient(input, cursor);
            if trivia.end == cursor {
                // Words must be separated; `groupby` is not `group by`.
                break;
            }
            pending = trivia.comments;
            cursor = trivia.end;
        }

        best
    }
}

/// Clause, ordering, set-operation, window and DML keywords.
pub static COMMAND_TRIE: LazyLock<KeywordTrie> = LazyLock::new(|| {
    KeywordTrie::new(&[
        "select",
        "from",
        "where",
        "group by",
        "having",
        "order by",
        "limit",
        "offset",
        "fetch",
        "for",
        "window",
        "with",
        "with recursive",
        "with ties",
        "as",
        "materialized",
        "not materialized",
        "union",
        "union all",
        "intersect",
        "intersect all",
        "except",
        "except all",
        "distinct",
        "distinct on",
        "all",
        "on",
        "using",
        "lateral",
        "case",
        "case when",
        "when",
        "then",
        "else",
        "end",
        "asc",
        "desc",
        "nulls first",
        "nulls last",
        "over",
        "partition by",
        "rows",
        "range",
        "unbounded preceding",
        "unbounded following",
        "current row",
        "values",
        "insert into",
        "update",
        "set",
        "delete from",
        "returning",
        "default",
        "default values",
        "filter",
        "within group",
        "only",
        "share",
        "key share",
        "no key update",
        "nowait",
        "skip locked",
    ])
});

/// Join keywords, kept apart so the join parser can ask "does a join
/// continue here" without matching unrelated commands.
pub static JOIN_TRIE: LazyLock<KeywordTrie> = LazyLock::new(|| {
    KeywordTrie::new(&[
        "join",
        "inner join",
        "cross join",
        "left join",
        "left outer join",
        "right join",
        "right outer join",
        "full join",
        "full outer join",
        "natural join",
        "natural inner join",
        "natural left join",
        "natural left outer join",
        "natural right join",
        "natural right outer join",
        "natural full join",
        "natural full outer join",
    ])
});

/// Keywords that start a typed literal (`interval '1 day'`) and double as
/// cast targets; tokens read from this list are both operator and type.
pub const TYPED_LITERAL_PREFIXES: &[&str] = &[
    "interval",
    "date",
    "time",
    "timestamp",
    "timestamptz",
    "time with time zone",
    "time without time zone",
    "timestamp with time zone",
    "timestamp without time zone",
];

/// Date parts accepted by `extract(<part> from <value>)`.
pub const DATE_PARTS: &[&str] = &[
    "century",
    "day",
    "decade",
    "dow",
    "doy",
    "epoch",
    "hour",
    "isodow",
    "isoyear",
    "microsecond",
    "microseconds",
    "millennium",
    "millisecond",
    "milliseconds",
    "minute",
    "month",
    "quarter",
    "second",
    "timezone",
    "timezone_hour",
    "timezone_minute",
    "week",
    "year",
];

/// Keyword operators.
pub static OPERATOR_TRIE: LazyLock<KeywordTrie> = LazyLock::new(|| {
    let mut trie = KeywordTrie::new(&[
        "and",
        "or",
        "not",
        "xor",
        "is",
        "is not",
        "is distinct from",
        "is not distinct from",
        "like",
        "not like",
        "ilike",
        "not ilike",
        "similar to",
        "not similar to",
        "rlike",
        "regexp",
        "in",
        "not in",
        "between",
        "not between",
        "exists",
        "not exists",
        "escape",
        "collate",
        "at time zone",
    ]);
    for prefix in TYPED_LITERAL_PREFIXES {
        trie.insert(prefix);
    }
    for part in DATE_PARTS {
        trie.insert(&format!("{part} from"));
    }
    trie
});

/// Multi-word type names and single-word types recognised after `::`/`as`.
pub static TYPE_TRIE: LazyLock<KeywordTrie> = LazyLock::new(|| {
    KeywordTrie::new(&[
        "double precision",
        "character varying",
        "char varying",
        "bit varying",
        "national character",
        "national character varying",
        "national char",
        "national char varying",
        "time with time zone",
        "time without time zone",
        "timestamp with time zone",
        "timestamp without time zone",
    ])
});

/// Returns true if `phrase` is a typed-literal prefix such as `interval`.
#[must_use]
pub fn is_typed_literal_prefix(phrase: &str) -> bool {
    TYPED_LITERAL_PREFIXES.contains(&phrase)
}

/// Returns true if `operator` is an `extract` date-part operator
/// (`year from`, `epoch from`, ...).
#[must_use]
pub fn is_date_part_operator(operator: &str) -> bool {
    operator
        .strip_suffix(" from")
        .is_some_and(|part| DATE_PARTS.contains(&part))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(trie: &'static KeywordTrie, input: &str) -> Option<KeywordMatch> {
        KeywordParser::new(trie).parse(input, 0)
    }

    #[test]
    fn test_trie_contains() {
        let trie = KeywordTrie::new(&["left outer join", "left join"]);
        assert!(trie.contains("left join"));
        assert!(trie.contains("LEFT OUTER JOIN"));
        assert!(!trie.contains("left"));
        assert!(!trie.contains("left outer"));
    }

    #[test]
    fn test_longest_match_wins() {
        let found = parse(&JOIN_TRIE, "LEFT OUTER JOIN b").unwrap();
        assert_eq!(found.keyword, "left outer join");
        assert_eq!(found.end, 15);
    }

    #[test]
    fn test_backs_off_to_confirmed_match() {
        let found = parse(&COMMAND_TRIE, "union select").unwrap();
        assert_eq!(found.keyword, "union");
        assert_eq!(found.end, 5);
    }

    #[test]
    fn test_incomplete_path_is_none() {
        assert!(parse(&JOIN_TRIE, "left(name, 2)").is_none());
        assert!(parse(&JOIN_TRIE, "left outer apply").is_none());
    }

    #[test]
    fn test_comments_between_words_are_captured() {
        let found = parse(&COMMAND_TRIE, "group /* x */ by a").unwrap();
        assert_eq!(found.keyword, "group by");
        assert_eq!(found.comments, vec![String::from("x")]);
    }

    #[test]
    fn test_trailing_comment_not_captured() {
        let found = parse(&COMMAND_TRIE, "union /* c */ select").unwrap();
        assert_eq!(found.keyword, "union");
        assert!(found.comments.is_empty());
    }

    #[test]
    fn test_word_boundary_required() {
        assert!(parse(&COMMAND_TRIE, "selected").is_none());
        assert!(parse(&COMMAND_TRIE, "groupby").is_none());
    }

    #[test]
    fn test_operator_trie_entries() {
        assert!(OPERATOR_TRIE.contains("is not distinct from"));
        assert!(OPERATOR_TRIE.contains("year from"));
        assert!(OPERATOR_TRIE.contains("interval"));
        assert!(is_date_part_operator("epoch from"));
        assert!(!is_date_part_operator("is distinct from"));
        assert!(is_typed_literal_prefix("timestamp with time zone"));
    }
}
