//! Abstract Syntax Tree (AST) types for SQL statements.
//!
//! Nodes own their children and the comments the parser attached to them.
//! Source positions stay on the tokens; the only node carrying offsets is
//! [`ParsedStatement`].

mod clause;
mod display;
mod query;
mod value;
pub mod visitor;

pub use clause::{
    CommonTable, Distinct, FetchClause, ForClause, FrameBound, FrameUnit, FromClause,
    GroupByClause, HavingClause, JoinClause, JoinCondition, JoinType, LimitClause, LockStrength,
    LockWait, NamedWindow, NullsPosition, OffsetClause, OrderByClause, OrderByItem,
    ReturningClause, SelectClause, SelectItem, SortDirection, Source, SourceAlias, SourceExpr,
    TableName, WhereClause, WindowClause, WindowFrame, WindowSpec, WithClause,
};
pub use query::{
    BinaryQuery, DeleteQuery, InsertQuery, InsertSource, ParsedStatement, Query, SelectQuery,
    SetItem, SetOperator, Statement, UpdateQuery, ValuesQuery,
};
pub use value::{
    CaseExpr, CaseKeyValuePair, CastStyle, ColumnRef, Expr, ExprKind, FunctionArg, FunctionCall,
    Identifier, InList, Literal, LiteralKind, Over, SwitchCaseArgument, TypeName,
};
pub use visitor::Visitor;
