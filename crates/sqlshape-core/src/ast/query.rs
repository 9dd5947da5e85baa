//! Query and statement AST types.

use serde::{Deserialize, Serialize};

use super::clause::{
    FetchClause, ForClause, FromClause, GroupByClause, HavingClause, LimitClause, OffsetClause,
    OrderByClause, ReturningClause, SelectClause, SourceExpr, TableName, WhereClause,
    WindowClause, WithClause,
};
use super::value::{ColumnRef, Expr, Identifier};
use crate::comments::Comments;
use crate::lexer::Span;

/// A plain SELECT query with all of its clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectQuery {
    /// WITH clause.
    pub with: Option<WithClause>,
    /// SELECT list.
    pub select: SelectClause,
    /// FROM clause.
    pub from: Option<FromClause>,
    /// WHERE clause.
    #[serde(rename = "where")]
    pub where_clause: Option<WhereClause>,
    /// GROUP BY clause.
    pub group_by: Option<GroupByClause>,
    /// HAVING clause.
    pub having: Option<HavingClause>,
    /// WINDOW clause.
    pub window: Option<WindowClause>,
    /// ORDER BY clause.
    pub order_by: Option<OrderByClause>,
    /// LIMIT clause.
    pub limit: Option<LimitClause>,
    /// OFFSET clause.
    pub offset: Option<OffsetClause>,
    /// FETCH clause.
    pub fetch: Option<FetchClause>,
    /// FOR clause.
    #[serde(rename = "for")]
    pub for_clause: Option<ForClause>,
}

impl SelectQuery {
    /// Creates a query holding only a SELECT clause.
    #[must_use]
    pub const fn new(select: SelectClause) -> Self {
        Self {
            with: None,
            select,
            from: None,
            where_clause: None,
            group_by: None,
            having: None,
            window: None,
            order_by: None,
            limit: None,
            offset: None,
            fetch: None,
            for_clause: None,
        }
    }

    /// Returns true if any clause that may follow a set operation is set.
    #[must_use]
    pub const fn has_trailing_clauses(&self) -> bool {
        self.order_by.is_some()
            || self.limit.is_some()
            || self.offset.is_some()
            || self.fetch.is_some()
            || self.for_clause.is_some()
    }
}

/// Set operator joining two queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOperator {
    /// `union`
    Union,
    /// `union all`
    UnionAll,
    /// `intersect`
    Intersect,
    /// `intersect all`
    IntersectAll,
    /// `except`
    Except,
    /// `except all`
    ExceptAll,
}

impl SetOperator {
    /// Maps keyword text to the operator.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "union" => Some(Self::Union),
            "union all" => Some(Self::UnionAll),
            "intersect" => Some(Self::Intersect),
            "intersect all" => Some(Self::IntersectAll),
            "except" => Some(Self::Except),
            "except all" => Some(Self::ExceptAll),
            _ => None,
        }
    }

    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "union",
            Self::UnionAll => "union all",
            Self::Intersect => "intersect",
            Self::IntersectAll => "intersect all",
            Self::Except => "except",
            Self::ExceptAll => "except all",
        }
    }
}

/// `left <op> right`; chains are left-associative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryQuery {
    /// Left query.
    pub left: Box<Query>,
    /// Set operator.
    pub operator: SetOperator,
    /// Right query.
    pub right: Box<Query>,
    /// Comments on the operator keyword.
    pub comments: Comments,
}

/// `values (..), (..)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuesQuery {
    /// Rows; each row is a list of values. Comments on a row's parentheses
    /// are folded onto its first and last value.
    pub rows: Vec<Vec<Expr>>,
    /// Comments on the `values` keyword.
    pub comments: Comments,
}

/// Anything that produces rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// A SELECT query.
    Select(Box<SelectQuery>),
    /// A set operation.
    Binary(BinaryQuery),
    /// A VALUES list.
    Values(ValuesQuery),
    /// A parenthesized query. Comments found after the closing parenthesis
    /// stay on the parentheses.
    Paren {
        /// The inner query.
        query: Box<Query>,
        /// Comments on the parentheses.
        comments: Comments,
    },
}

impl Query {
    /// Returns the SELECT query, if this is one.
    #[must_use]
    pub fn as_select(&self) -> Option<&SelectQuery> {
        match self {
            Self::Select(select) => Some(select.as_ref()),
            _ => None,
        }
    }

    /// The leftmost simple query, where a WITH clause is attached.
    #[must_use]
    pub fn first_select(&self) -> Option<&SelectQuery> {
        match self {
            Self::Select(select) => Some(select.as_ref()),
            Self::Binary(binary) => binary.left.first_select(),
            Self::Paren { query, .. } => query.first_select(),
            Self::Values(_) => None,
        }
    }

    pub(crate) fn first_select_mut(&mut self) -> Option<&mut SelectQuery> {
        match self {
            Self::Select(select) => Some(select.as_mut()),
            Self::Binary(binary) => binary.left.first_select_mut(),
            Self::Paren { query, .. } => query.first_select_mut(),
            Self::Values(_) => None,
        }
    }

    /// Comments of the keyword the query opens with: `with`, `select` or
    /// `values`.
    pub(crate) fn leading_comments_mut(&mut self) -> &mut Comments {
        match self {
            Self::Select(select) => match &mut select.with {
                Some(with) => &mut with.comments,
                None => &mut select.select.comments,
            },
            Self::Binary(binary) => binary.left.leading_comments_mut(),
            Self::Values(values) => &mut values.comments,
            Self::Paren { query, .. } => query.leading_comments_mut(),
        }
    }

    /// The rightmost simple query, which owns trailing ORDER BY/LIMIT of a
    /// set operation.
    pub(crate) fn last_select_mut(&mut self) -> Option<&mut SelectQuery> {
        match self {
            Self::Select(select) => Some(select.as_mut()),
            Self::Binary(binary) => binary.right.last_select_mut(),
            Self::Paren { .. } | Self::Values(_) => None,
        }
    }
}

/// `column = value` in UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetItem {
    /// Target column.
    pub column: ColumnRef,
    /// Assigned value.
    pub value: Expr,
    /// Comments on the column name.
    #[serde(skip_serializing_if = "Comments::is_empty", default)]
    pub comments: Comments,
}

/// Rows inserted by INSERT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertSource {
    /// `values ...` or `select ...`.
    Query(Box<Query>),
    /// `default values`.
    DefaultValues,
}

/// `insert into t (cols) ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertQuery {
    /// WITH clause.
    pub with: Option<WithClause>,
    /// Target table.
    pub table: TableName,
    /// Target alias.
    pub alias: Option<Identifier>,
    /// Target columns.
    pub columns: Vec<Identifier>,
    /// Comments found on the target table, its alias, the column list and
    /// `default values`; they render behind the column list.
    #[serde(skip_serializing_if = "Comments::is_empty", default)]
    pub target_comments: Comments,
    /// Inserted rows.
    pub source: InsertSource,
    /// RETURNING clause.
    pub returning: Option<ReturningClause>,
    /// Comments on the `insert into` keyword.
    pub comments: Comments,
}

/// `update t set ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateQuery {
    /// WITH clause.
    pub with: Option<WithClause>,
    /// Updated table with optional alias.
    pub table: SourceExpr,
    /// Assignments.
    pub set: Vec<SetItem>,
    /// FROM clause.
    pub from: Option<FromClause>,
    /// WHERE clause.
    #[serde(rename = "where")]
    pub where_clause: Option<WhereClause>,
    /// RETURNING clause.
    pub returning: Option<ReturningClause>,
    /// Comments on the `update` keyword.
    pub comments: Comments,
}

/// `delete from t ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteQuery {
    /// WITH clause.
    pub with: Option<WithClause>,
    /// Target table with optional alias.
    pub table: SourceExpr,
    /// Sources after `using`.
    pub using: Vec<SourceExpr>,
    /// WHERE clause.
    #[serde(rename = "where")]
    pub where_clause: Option<WhereClause>,
    /// RETURNING clause.
    pub returning: Option<ReturningClause>,
    /// Comments on the `delete from` keyword.
    pub comments: Comments,
}

/// A parsed SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    /// SELECT, set operation or VALUES.
    Query(Query),
    /// INSERT.
    Insert(InsertQuery),
    /// UPDATE.
    Update(UpdateQuery),
    /// DELETE.
    Delete(DeleteQuery),
}

impl Statement {
    /// Short name of the statement kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Query(Query::Values(_)) => "values",
            Self::Query(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
        }
    }

    /// Returns the query, if this is one.
    #[must_use]
    pub const fn as_query(&self) -> Option<&Query> {
        match self {
            Self::Query(query) => Some(query),
            _ => None,
        }
    }
}

/// One statement of a multi-statement input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatement {
    /// The statement.
    pub statement: Statement,
    /// Comments between the previous statement and this one.
    pub leading_comments: Vec<String>,
    /// Comments after the final `;` of the input; only the last statement
    /// carries them.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub trailing_comments: Vec<String>,
    /// Source text of the statement.
    pub raw_text: String,
    /// Byte offsets of the statement in the input.
    pub span: Span,
}
