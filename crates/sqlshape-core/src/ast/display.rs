//! SQL rendering.
//!
//! Every node renders on a single line with lower-case keywords. Comments
//! are written as `/* body */` next to the keyword or value they were
//! attached to, so rendering a parsed statement and parsing the result
//! again reaches a fixed point.

use std::fmt::{self, Display, Formatter};

use super::clause::{
    CommonTable, Distinct, FetchClause, ForClause, FrameBound, FromClause, GroupByClause,
    HavingClause, JoinClause, JoinCondition, LimitClause, NamedWindow, OffsetClause,
    OrderByClause, OrderByItem, ReturningClause, SelectClause, SelectItem, Source, SourceAlias,
    SourceExpr, TableName, WhereClause, WindowClause, WindowFrame, WindowSpec, WithClause,
};
use super::query::{
    BinaryQuery, DeleteQuery, InsertQuery, InsertSource, Query, SelectQuery, SetItem, Statement,
    UpdateQuery, ValuesQuery,
};
use super::value::{
    CaseExpr, CastStyle, ColumnRef, Expr, ExprKind, FunctionArg, FunctionCall, Identifier, InList,
    Literal, Over, TypeName,
};
use crate::comments::Comments;
use crate::lexer::chars::is_operator_symbol;
use crate::lexer::keywords::{COMMAND_TRIE, JOIN_TRIE, OPERATOR_TRIE};

const LITERAL_WORDS: &[&str] = &["null", "true", "false"];

fn write_list<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_path(f: &mut Formatter<'_>, namespaces: &[Identifier]) -> fmt::Result {
    for namespace in namespaces {
        write!(f, "{namespace}.")?;
    }
    Ok(())
}

fn write_before(f: &mut Formatter<'_>, comments: &Comments) -> fmt::Result {
    for comment in comments.before() {
        write!(f, "/* {comment} */ ")?;
    }
    Ok(())
}

fn write_after(f: &mut Formatter<'_>, comments: &Comments) -> fmt::Result {
    for comment in comments.after() {
        write!(f, " /* {comment} */")?;
    }
    Ok(())
}

fn write_trailing(f: &mut Formatter<'_>, comments: &[String]) -> fmt::Result {
    for comment in comments {
        write!(f, " /* {comment} */")?;
    }
    Ok(())
}

/// Writes a keyword surrounded by the comments attached to it.
fn write_keyword(f: &mut Formatter<'_>, keyword: &str, comments: &Comments) -> fmt::Result {
    write_before(f, comments)?;
    f.write_str(keyword)?;
    write_after(f, comments)
}

fn needs_quotes(name: &str) -> bool {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$');
    !plain
        || COMMAND_TRIE.contains(name)
        || JOIN_TRIE.contains(name)
        || OPERATOR_TRIE.contains(name)
        || LITERAL_WORDS.contains(&name)
}

impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.quoted && needs_quotes(&self.name) {
            write!(f, "\"{}\"", self.name.replace('"', "\"\""))
        } else {
            f.write_str(&self.name)
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_path(f, &self.namespaces)?;
        write!(f, "{}", self.name)
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_before(f, &self.comments)?;
        write_path(f, &self.namespaces)?;
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            write_list(f, &self.args)?;
            f.write_str(")")?;
        }
        for _ in 0..self.array_dimensions {
            f.write_str("[]")?;
        }
        write_after(f, &self.comments)
    }
}

impl Display for FunctionArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = &self.keyword {
            write!(f, "{keyword} ")?;
        }
        write!(f, "{}", self.value)
    }
}

impl Display for Over {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "over {name}"),
            Self::Window(spec) => write!(f, "over ({spec})"),
        }
    }
}

impl Display for FunctionCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_path(f, &self.namespaces)?;
        write!(f, "{}(", self.name)?;
        if self.distinct {
            f.write_str("distinct ")?;
        }
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(if arg.keyword.is_some() { " " } else { ", " })?;
            }
            write!(f, "{arg}")?;
        }
        if !self.order_by.is_empty() {
            f.write_str(" order by ")?;
            write_list(f, &self.order_by)?;
        }
        f.write_str(")")?;
        if !self.within_group.is_empty() {
            f.write_str(" within group (order by ")?;
            write_list(f, &self.within_group)?;
            f.write_str(")")?;
        }
        if let Some(filter) = &self.filter {
            write!(f, " filter (where {filter})")?;
        }
        if let Some(over) = &self.over {
            write!(f, " {over}")?;
        }
        Ok(())
    }
}

impl Display for CaseExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("case")?;
        if let Some(operand) = &self.operand {
            write!(f, " {operand}")?;
        }
        for pair in &self.switch.cases {
            f.write_str(" when ")?;
            write_before(f, &pair.comments)?;
            write!(f, "{} then ", pair.key)?;
            for comment in pair.comments.after() {
                write!(f, "/* {comment} */ ")?;
            }
            write!(f, "{}", pair.value)?;
        }
        if let Some(else_value) = &self.switch.else_value {
            f.write_str(" else ")?;
            write_before(f, &self.switch.comments)?;
            write!(f, "{else_value}")?;
        }
        f.write_str(" end")?;
        write_after(f, &self.switch.comments)
    }
}

fn write_unary(f: &mut Formatter<'_>, op: &str, operand: &Expr) -> fmt::Result {
    if op.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return write!(f, "{op} {operand}");
    }
    let rendered = operand.to_string();
    // `- -1` must not become a line comment.
    if rendered.starts_with(is_operator_symbol) {
        write!(f, "{op} {rendered}")
    } else {
        write!(f, "{op}{rendered}")
    }
}

impl Display for ExprKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(column) => write!(f, "{column}"),
            Self::Wildcard { namespaces } => {
                write_path(f, namespaces)?;
                f.write_str("*")
            }
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Parameter { text } => f.write_str(text),
            Self::PrefixedString { specifier, literal } => write!(f, "{specifier}{literal}"),
            Self::TypedLiteral { type_name, literal } => write!(f, "{type_name} {literal}"),
            Self::Unary { op, operand } => write_unary(f, op, operand),
            Self::Binary { left, op, right } => write!(f, "{left} {op} {right}"),
            Self::Between {
                expr,
                negated,
                low,
                high,
            } => {
                let not = if *negated { "not " } else { "" };
                write!(f, "{expr} {not}between {low} and {high}")
            }
            Self::In {
                expr,
                negated,
                list,
            } => {
                let not = if *negated { "not " } else { "" };
                write!(f, "{expr} {not}in (")?;
                match list {
                    InList::Values(values) => write_list(f, values)?,
                    InList::Query(query) => write!(f, "{query}")?,
                }
                f.write_str(")")
            }
            Self::Exists { negated, query } => {
                let not = if *negated { "not " } else { "" };
                write!(f, "{not}exists ({query})")
            }
            Self::Function(call) => write!(f, "{call}"),
            Self::Cast {
                expr,
                type_name,
                style,
            } => match style {
                CastStyle::Function => write!(f, "cast({expr} as {type_name})"),
                CastStyle::Operator => write!(f, "{expr}::{type_name}"),
            },
            Self::Case(case) => write!(f, "{case}"),
            Self::Paren(inner) => write!(f, "({inner})"),
            Self::Tuple(items) => {
                f.write_str("(")?;
                write_list(f, items)?;
                f.write_str(")")
            }
            Self::Subquery(query) => write!(f, "({query})"),
            Self::Array(items) => {
                f.write_str("array[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
            Self::ArrayQuery(query) => write!(f, "array({query})"),
            Self::Index { expr, index } => write!(f, "{expr}[{index}]"),
            Self::Slice { expr, lower, upper } => {
                write!(f, "{expr}[")?;
                if let Some(lower) = lower {
                    write!(f, "{lower}")?;
                }
                f.write_str(":")?;
                if let Some(upper) = upper {
                    write!(f, "{upper}")?;
                }
                f.write_str("]")
            }
            Self::Default => f.write_str("default"),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_before(f, &self.comments)?;
        write!(f, "{}", self.kind)?;
        write_after(f, &self.comments)
    }
}

impl Display for OrderByItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction.as_str())?;
        }
        if let Some(nulls) = self.nulls {
            write!(f, " {}", nulls.as_str())?;
        }
        Ok(())
    }
}

impl Display for OrderByClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "order by", &self.comments)?;
        f.write_str(" ")?;
        write_list(f, &self.items)
    }
}

impl Display for SelectItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        Ok(())
    }
}

impl Display for SelectClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "select", &self.comments)?;
        for hint in &self.hints {
            write!(f, " {hint}")?;
        }
        match &self.distinct {
            Some(Distinct::Distinct) => f.write_str(" distinct")?,
            Some(Distinct::All) => f.write_str(" all")?,
            Some(Distinct::On(values)) => {
                f.write_str(" distinct on (")?;
                write_list(f, values)?;
                f.write_str(")")?;
            }
            None => {}
        }
        f.write_str(" ")?;
        write_list(f, &self.items)
    }
}

impl Display for TableName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_path(f, &self.namespaces)?;
        write!(f, "{}", self.name)
    }
}

impl Display for SourceAlias {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.columns.is_empty() {
            f.write_str("(")?;
            write_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl Display for SourceExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_before(f, &self.comments)?;
        if self.lateral {
            f.write_str("lateral ")?;
        }
        match &self.source {
            Source::Table(table) => write!(f, "{table}")?,
            Source::Subquery(query) => write!(f, "({query})")?,
            Source::Function(call) => write!(f, "{call}")?,
        }
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        write_after(f, &self.comments)
    }
}

impl Display for JoinClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_comma() {
            write!(f, ",")?;
            write_after(f, &self.comments)?;
            return write!(f, " {}", self.source);
        }
        write_keyword(f, &self.keyword, &self.comments)?;
        write!(f, " {}", self.source)?;
        match &self.condition {
            Some(JoinCondition::On(condition)) => write!(f, " on {condition}"),
            Some(JoinCondition::Using { columns, comments }) => {
                f.write_str(" using ")?;
                write_before(f, comments)?;
                f.write_str("(")?;
                write_list(f, columns)?;
                f.write_str(")")?;
                write_after(f, comments)
            }
            None => Ok(()),
        }
    }
}

impl Display for FromClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "from", &self.comments)?;
        write!(f, " {}", self.source)?;
        for join in &self.joins {
            if join.is_comma() {
                write!(f, "{join}")?;
            } else {
                write!(f, " {join}")?;
            }
        }
        Ok(())
    }
}

impl Display for WhereClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "where", &self.comments)?;
        write!(f, " {}", self.condition)
    }
}

impl Display for GroupByClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "group by", &self.comments)?;
        f.write_str(" ")?;
        write_list(f, &self.items)
    }
}

impl Display for HavingClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "having", &self.comments)?;
        write!(f, " {}", self.condition)
    }
}

impl Display for FrameBound {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedPreceding => f.write_str("unbounded preceding"),
            Self::UnboundedFollowing => f.write_str("unbounded following"),
            Self::CurrentRow => f.write_str("current row"),
            Self::Preceding(value) => write!(f, "{value} preceding"),
            Self::Following(value) => write!(f, "{value} following"),
        }
    }
}

impl Display for WindowFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.unit.as_str())?;
        match &self.end {
            Some(end) => write!(f, " between {} and {end}", self.start),
            None => write!(f, " {}", self.start),
        }
    }
}

impl Display for WindowSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_before(f, &self.comments)?;
        let mut separator = "";
        if let Some(base) = &self.base {
            write!(f, "{base}")?;
            separator = " ";
        }
        if !self.partition_by.is_empty() {
            write!(f, "{separator}partition by ")?;
            write_list(f, &self.partition_by)?;
            separator = " ";
        }
        if !self.order_by.is_empty() {
            write!(f, "{separator}order by ")?;
            write_list(f, &self.order_by)?;
            separator = " ";
        }
        if let Some(frame) = &self.frame {
            write!(f, "{separator}{frame}")?;
        }
        write_after(f, &self.comments)
    }
}

impl Display for NamedWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_before(f, &self.comments)?;
        write!(f, "{} as ({})", self.name, self.spec)?;
        write_after(f, &self.comments)
    }
}

impl Display for WindowClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "window", &self.comments)?;
        f.write_str(" ")?;
        write_list(f, &self.windows)
    }
}

impl Display for LimitClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "limit", &self.comments)?;
        match &self.value {
            Some(value) => write!(f, " {value}"),
            None => f.write_str(" all"),
        }
    }
}

impl Display for OffsetClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "offset", &self.comments)?;
        write!(f, " {}", self.value)?;
        if let Some(rows) = &self.rows_keyword {
            write!(f, " {rows}")?;
        }
        Ok(())
    }
}

impl Display for FetchClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "fetch", &self.comments)?;
        write!(f, " {}", self.position_keyword)?;
        if let Some(count) = &self.count {
            write!(f, " {count}")?;
        }
        write!(f, " {}", self.rows_keyword)?;
        f.write_str(if self.with_ties { " with ties" } else { " only" })?;
        write_trailing(f, &self.trailing_comments)
    }
}

impl Display for ForClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "for", &self.comments)?;
        write!(f, " {}", self.strength.as_str())?;
        if !self.of.is_empty() {
            f.write_str(" of ")?;
            write_list(f, &self.of)?;
        }
        if let Some(wait) = self.wait {
            write!(f, " {}", wait.as_str())?;
        }
        write_trailing(f, &self.trailing_comments)
    }
}

impl Display for CommonTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_before(f, &self.comments)?;
        write!(f, "{}", self.name)?;
        if !self.columns.is_empty() {
            f.write_str("(")?;
            write_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        write_after(f, &self.comments)?;
        f.write_str(" as ")?;
        match self.materialized {
            Some(true) => f.write_str("materialized ")?,
            Some(false) => f.write_str("not materialized ")?,
            None => {}
        }
        write_before(f, &self.query_comments)?;
        write!(f, "({})", self.query)?;
        write_after(f, &self.query_comments)
    }
}

impl Display for WithClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let keyword = if self.recursive { "with recursive" } else { "with" };
        write_keyword(f, keyword, &self.comments)?;
        f.write_str(" ")?;
        write_list(f, &self.tables)
    }
}

impl Display for ReturningClause {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "returning", &self.comments)?;
        f.write_str(" ")?;
        write_list(f, &self.items)
    }
}

/// Writes ` {clause}` for each present clause.
fn write_clauses(f: &mut Formatter<'_>, clauses: &[Option<&dyn Display>]) -> fmt::Result {
    for clause in clauses.iter().flatten() {
        write!(f, " {clause}")?;
    }
    Ok(())
}

fn as_display<T: Display>(clause: Option<&T>) -> Option<&dyn Display> {
    clause.map(|clause| clause as &dyn Display)
}

impl Display for SelectQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with {
            write!(f, "{with} ")?;
        }
        write!(f, "{}", self.select)?;
        write_clauses(
            f,
            &[
                as_display(self.from.as_ref()),
                as_display(self.where_clause.as_ref()),
                as_display(self.group_by.as_ref()),
                as_display(self.having.as_ref()),
                as_display(self.window.as_ref()),
                as_display(self.order_by.as_ref()),
                as_display(self.limit.as_ref()),
                as_display(self.offset.as_ref()),
                as_display(self.fetch.as_ref()),
                as_display(self.for_clause.as_ref()),
            ],
        )
    }
}

impl Display for BinaryQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.left)?;
        write_keyword(f, self.operator.as_str(), &self.comments)?;
        write!(f, " {}", self.right)
    }
}

impl Display for ValuesQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_keyword(f, "values", &self.comments)?;
        for (i, row) in self.rows.iter().enumerate() {
            f.write_str(if i == 0 { " (" } else { ", (" })?;
            write_list(f, row)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(select) => write!(f, "{select}"),
            Self::Binary(binary) => write!(f, "{binary}"),
            Self::Values(values) => write!(f, "{values}"),
            Self::Paren { query, comments } => {
                write_before(f, comments)?;
                write!(f, "({query})")?;
                write_after(f, comments)
            }
        }
    }
}

impl Display for SetItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_before(f, &self.comments)?;
        write!(f, "{}", self.column)?;
        write_after(f, &self.comments)?;
        write!(f, " = {}", self.value)
    }
}

impl Display for InsertQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with {
            write!(f, "{with} ")?;
        }
        write_keyword(f, "insert into", &self.comments)?;
        write!(f, " {}", self.table)?;
        if let Some(alias) = &self.alias {
            write!(f, " as {alias}")?;
        }
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            write_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        write_trailing(f, &self.target_comments.to_vec())?;
        match &self.source {
            InsertSource::Query(query) => write!(f, " {query}")?,
            InsertSource::DefaultValues => f.write_str(" default values")?,
        }
        write_clauses(f, &[as_display(self.returning.as_ref())])
    }
}

impl Display for UpdateQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with {
            write!(f, "{with} ")?;
        }
        write_keyword(f, "update", &self.comments)?;
        write!(f, " {} set ", self.table)?;
        write_list(f, &self.set)?;
        write_clauses(
            f,
            &[
                as_display(self.from.as_ref()),
                as_display(self.where_clause.as_ref()),
                as_display(self.returning.as_ref()),
            ],
        )
    }
}

impl Display for DeleteQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(with) = &self.with {
            write!(f, "{with} ")?;
        }
        write_keyword(f, "delete from", &self.comments)?;
        write!(f, " {}", self.table)?;
        if !self.using.is_empty() {
            f.write_str(" using ")?;
            write_list(f, &self.using)?;
        }
        write_clauses(
            f,
            &[
                as_display(self.where_clause.as_ref()),
                as_display(self.returning.as_ref()),
            ],
        )
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query(query) => write!(f, "{query}"),
            Self::Insert(insert) => write!(f, "{insert}"),
            Self::Update(update) => write!(f, "{update}"),
            Self::Delete(delete) => write!(f, "{delete}"),
        }
    }
}
