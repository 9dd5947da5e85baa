//! Clause AST types.

use serde::{Deserialize, Serialize};

use super::query::Query;
use super::value::{Expr, FunctionCall, Identifier};
use crate::comments::Comments;

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order (default).
    #[default]
    Ascending,
    /// Descending order.
    Descending,
}

impl SortDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullsPosition {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullsPosition {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "nulls first",
            Self::Last => "nulls last",
        }
    }
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByItem {
    /// The expression to order by. Comments on the direction keywords are
    /// folded onto it.
    pub value: Expr,
    /// The direction as written; `None` when omitted.
    pub direction: Option<SortDirection>,
    /// Null ordering, if written.
    pub nulls: Option<NullsPosition>,
}

impl OrderByItem {
    /// The effective direction.
    #[must_use]
    pub fn direction(&self) -> SortDirection {
        self.direction.unwrap_or_default()
    }
}

/// `order by a, b desc`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderByClause {
    /// At least one item.
    pub items: Vec<OrderByItem>,
    /// Comments on the `order by` keyword.
    pub comments: Comments,
}

/// `distinct`, `all` or `distinct on (...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distinct {
    /// `distinct`
    Distinct,
    /// `all`
    All,
    /// `distinct on (a, b)`; comments on the keyword and the parentheses
    /// are folded onto the first and last value.
    On(Vec<Expr>),
}

/// One entry of a select list or `returning` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectItem {
    /// The selected value.
    pub value: Expr,
    /// Alias, with or without `as`.
    pub alias: Option<Identifier>,
}

impl SelectItem {
    /// Creates an item without alias.
    #[must_use]
    pub const fn new(value: Expr) -> Self {
        Self { value, alias: None }
    }

    /// Output name: the alias, or the column name for a column reference.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.alias
            .as_ref()
            .map(|alias| alias.name.as_str())
            .or_else(|| self.value.as_column().map(|column| column.name.name.as_str()))
    }
}

/// `select [distinct] items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectClause {
    /// Optimizer hints written right after `select`, delimiters included.
    pub hints: Vec<String>,
    /// Duplicate handling.
    pub distinct: Option<Distinct>,
    /// At least one item.
    pub items: Vec<SelectItem>,
    /// Comments on the `select` keyword.
    pub comments: Comments,
}

/// A possibly schema-qualified table name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableName {
    /// Qualifiers, outermost first.
    pub namespaces: Vec<Identifier>,
    /// Table name.
    pub name: Identifier,
}

impl TableName {
    /// Creates an unqualified table name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            namespaces: Vec::new(),
            name: Identifier::new(name),
        }
    }
}

/// What a FROM entry reads from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// A table or view.
    Table(TableName),
    /// A parenthesized subquery.
    Subquery(Box<Query>),
    /// A set-returning function.
    Function(FunctionCall),
}

/// `alias` or `alias(col1, col2)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAlias {
    /// Alias name.
    pub name: Identifier,
    /// Column aliases.
    pub columns: Vec<Identifier>,
}

/// A FROM entry with its alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceExpr {
    /// Whether `lateral` preceded it.
    pub lateral: bool,
    /// The source.
    pub source: Source,
    /// Optional alias.
    pub alias: Option<SourceAlias>,
    /// Comments attached to the source name.
    pub comments: Comments,
}

impl SourceExpr {
    /// Creates an unaliased table source.
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            lateral: false,
            source: Source::Table(TableName::new(name)),
            alias: None,
            comments: Comments::new(),
        }
    }

    /// The name other clauses use to refer to this source.
    #[must_use]
    pub fn reference_name(&self) -> Option<&str> {
        match (&self.alias, &self.source) {
            (Some(alias), _) => Some(alias.name.name.as_str()),
            (None, Source::Table(table)) => Some(table.name.name.as_str()),
            _ => None,
        }
    }
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    /// `join` / `inner join`.
    Inner,
    /// `left [outer] join`.
    Left,
    /// `right [outer] join`.
    Right,
    /// `full [outer] join`.
    Full,
    /// `cross join` or a comma.
    Cross,
}

/// `on condition` or `using (cols)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinCondition {
    /// `on ...`
    On(Expr),
    /// `using (...)`
    Using {
        /// Join columns.
        columns: Vec<Identifier>,
        /// Before-comments render between `using` and `(`, after-comments
        /// behind `)`.
        #[serde(skip_serializing_if = "Comments::is_empty", default)]
        comments: Comments,
    },
}

/// One join of a FROM clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinClause {
    /// Canonical join keyword (`left outer join`), or `,` for a comma join.
    pub keyword: String,
    /// Joined source.
    pub source: SourceExpr,
    /// Join condition, if any.
    pub condition: Option<JoinCondition>,
    /// Comments on the join keyword.
    pub comments: Comments,
}

impl JoinClause {
    /// Join type derived from the keyword.
    #[must_use]
    pub fn join_type(&self) -> JoinType {
        let keyword = self.keyword.as_str();
        if keyword == "," || keyword.contains("cross") {
            JoinType::Cross
        } else if keyword.contains("left") {
            JoinType::Left
        } else if keyword.contains("right") {
            JoinType::Right
        } else if keyword.contains("full") {
            JoinType::Full
        } else {
            JoinType::Inner
        }
    }

    /// Returns true for `natural ... join`.
    #[must_use]
    pub fn is_natural(&self) -> bool {
        self.keyword.starts_with("natural")
    }

    /// Returns true for a comma join.
    #[must_use]
    pub fn is_comma(&self) -> bool {
        self.keyword == ","
    }
}

/// `from source [joins]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromClause {
    /// First source.
    pub source: SourceExpr,
    /// Comma and keyword joins, in order.
    pub joins: Vec<JoinClause>,
    /// Comments on the `from` keyword.
    pub comments: Comments,
}

impl FromClause {
    /// Every source of the clause, first source included.
    pub fn sources(&self) -> impl Iterator<Item = &SourceExpr> {
        std::iter::once(&self.source).chain(self.joins.iter().map(|join| &join.source))
    }
}

/// `where condition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    /// The condition.
    pub condition: Expr,
    /// Comments on the `where` keyword.
    pub comments: Comments,
}

/// `group by a, b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupByClause {
    /// Grouping expressions.
    pub items: Vec<Expr>,
    /// Comments on the `group by` keyword.
    pub comments: Comments,
}

/// `having condition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HavingClause {
    /// The condition.
    pub condition: Expr,
    /// Comments on the `having` keyword.
    pub comments: Comments,
}

/// Frame unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameUnit {
    /// `rows`
    Rows,
    /// `range`
    Range,
    /// `groups`
    Groups,
}

impl FrameUnit {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::Range => "range",
            Self::Groups => "groups",
        }
    }
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameBound {
    /// `unbounded preceding`
    UnboundedPreceding,
    /// `unbounded following`
    UnboundedFollowing,
    /// `current row`
    CurrentRow,
    /// `n preceding`
    Preceding(Box<Expr>),
    /// `n following`
    Following(Box<Expr>),
}

/// `rows between ... and ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    /// Frame unit.
    pub unit: FrameUnit,
    /// Frame start.
    pub start: FrameBound,
    /// Frame end; present only with `between`.
    pub end: Option<FrameBound>,
}

/// The body of `over (...)` or `window w as (...)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSpec {
    /// Base window name.
    pub base: Option<Identifier>,
    /// `partition by` expressions.
    pub partition_by: Vec<Expr>,
    /// `order by` items.
    pub order_by: Vec<OrderByItem>,
    /// Frame clause.
    pub frame: Option<WindowFrame>,
    /// Comments on the base name and the frame keywords, rendered at the
    /// edges of the window.
    #[serde(skip_serializing_if = "Comments::is_empty", default)]
    pub comments: Comments,
}

/// `name as (spec)` inside a WINDOW clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedWindow {
    /// Window name.
    pub name: Identifier,
    /// Definition.
    pub spec: WindowSpec,
    /// Comments before the name, and those found between the name and the
    /// closing parenthesis.
    #[serde(skip_serializing_if = "Comments::is_empty", default)]
    pub comments: Comments,
}

/// `window w as (...), ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowClause {
    /// Named windows.
    pub windows: Vec<NamedWindow>,
    /// Comments on the `window` keyword.
    pub comments: Comments,
}

/// `limit n` or `limit all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitClause {
    /// Row count; `None` for `limit all`.
    pub value: Option<Expr>,
    /// Comments on the `limit` keyword.
    pub comments: Comments,
}

/// `offset n [row|rows]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffsetClause {
    /// Rows to skip.
    pub value: Expr,
    /// `row` or `rows` when written.
    pub rows_keyword: Option<String>,
    /// Comments on the `offset` keyword.
    pub comments: Comments,
}

/// `fetch first|next [n] row|rows only|with ties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchClause {
    /// `first` or `next`.
    pub position_keyword: String,
    /// Row count; `None` means one row.
    pub count: Option<Expr>,
    /// `row` or `rows`.
    pub rows_keyword: String,
    /// `with ties` instead of `only`.
    pub with_ties: bool,
    /// Comments on the `fetch` keyword.
    pub comments: Comments,
    /// Comments on the remaining keywords, rendered at the end.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub trailing_comments: Vec<String>,
}

/// Row lock strength of a FOR clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockStrength {
    /// `for update`
    Update,
    /// `for no key update`
    NoKeyUpdate,
    /// `for share`
    Share,
    /// `for key share`
    KeyShare,
}

impl LockStrength {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::NoKeyUpdate => "no key update",
            Self::Share => "share",
            Self::KeyShare => "key share",
        }
    }
}

/// Lock wait policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockWait {
    /// `nowait`
    NoWait,
    /// `skip locked`
    SkipLocked,
}

impl LockWait {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoWait => "nowait",
            Self::SkipLocked => "skip locked",
        }
    }
}

/// `for update [of t] [nowait|skip locked]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForClause {
    /// Lock strength.
    pub strength: LockStrength,
    /// Tables named after `of`.
    pub of: Vec<TableName>,
    /// Wait policy.
    pub wait: Option<LockWait>,
    /// Comments on the `for` keyword.
    pub comments: Comments,
    /// Comments on the lock keywords and table names, rendered at the end.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub trailing_comments: Vec<String>,
}

/// One common table expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonTable {
    /// CTE name.
    pub name: Identifier,
    /// Column aliases.
    pub columns: Vec<Identifier>,
    /// `Some(true)` for `materialized`, `Some(false)` for
    /// `not materialized`.
    pub materialized: Option<bool>,
    /// The query.
    pub query: Box<Query>,
    /// Comments attached to the CTE name and column list.
    pub comments: Comments,
    /// Before-comments render between `as` and `(`, after-comments behind
    /// `)`.
    #[serde(skip_serializing_if = "Comments::is_empty", default)]
    pub query_comments: Comments,
}

/// `with [recursive] name as (...), ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithClause {
    /// Whether `recursive` was written.
    pub recursive: bool,
    /// At least one CTE.
    pub tables: Vec<CommonTable>,
    /// Comments on the `with` keyword.
    pub comments: Comments,
}

/// `returning items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturningClause {
    /// Returned items.
    pub items: Vec<SelectItem>,
    /// Comments on the `returning` keyword.
    pub comments: Comments,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join(keyword: &str) -> JoinClause {
        JoinClause {
            keyword: keyword.to_string(),
            source: SourceExpr::table("t"),
            condition: None,
            comments: Comments::new(),
        }
    }

    #[test]
    fn test_join_type_from_keyword() {
        assert_eq!(join("join").join_type(), JoinType::Inner);
        assert_eq!(join("left outer join").join_type(), JoinType::Left);
        assert_eq!(join("natural full join").join_type(), JoinType::Full);
        assert_eq!(join(",").join_type(), JoinType::Cross);
        assert!(join("natural join").is_natural());
        assert!(join(",").is_comma());
    }

    #[test]
    fn test_order_by_default_direction() {
        let item = OrderByItem {
            value: Expr::column("a"),
            direction: None,
            nulls: None,
        };
        assert_eq!(item.direction(), SortDirection::Ascending);
    }

    #[test]
    fn test_select_item_name() {
        let item = SelectItem::new(Expr::qualified_column("u", "email"));
        assert_eq!(item.name(), Some("email"));
        let aliased = SelectItem {
            value: Expr::literal("1"),
            alias: Some(Identifier::new("one")),
        };
        assert_eq!(aliased.name(), Some("one"));
    }

    #[test]
    fn test_reference_name() {
        let mut source = SourceExpr::table("users");
        assert_eq!(source.reference_name(), Some("users"));
        source.alias = Some(SourceAlias {
            name: Identifier::new("u"),
            columns: Vec::new(),
        });
        assert_eq!(source.reference_name(), Some("u"));
    }
}
