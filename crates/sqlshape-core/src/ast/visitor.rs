//! Read-only AST traversal.
//!
//! Implement only the `visit_*` methods you care about; the defaults call the
//! matching `walk_*` function, which visits every child. An override that
//! still wants the children visited calls `walk_*` itself.

use super::clause::{
    FrameBound, FromClause, JoinClause, JoinCondition, OrderByItem, SelectClause, Source,
    SourceExpr, WindowSpec, WithClause,
};
use super::query::{
    DeleteQuery, InsertQuery, InsertSource, Query, SelectQuery, Statement, UpdateQuery,
};
use super::value::{CaseExpr, Expr, ExprKind, FunctionCall, InList, Over};

/// AST visitor.
pub trait Visitor {
    /// Visits a statement.
    fn visit_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    /// Visits a query.
    fn visit_query(&mut self, query: &Query) {
        walk_query(self, query);
    }

    /// Visits a SELECT query.
    fn visit_select(&mut self, select: &SelectQuery) {
        walk_select(self, select);
    }

    /// Visits an INSERT.
    fn visit_insert(&mut self, insert: &InsertQuery) {
        walk_insert(self, insert);
    }

    /// Visits an UPDATE.
    fn visit_update(&mut self, update: &UpdateQuery) {
        walk_update(self, update);
    }

    /// Visits a DELETE.
    fn visit_delete(&mut self, delete: &DeleteQuery) {
        walk_delete(self, delete);
    }

    /// Visits a WITH clause.
    fn visit_with(&mut self, with: &WithClause) {
        walk_with(self, with);
    }

    /// Visits a SELECT list.
    fn visit_select_clause(&mut self, select: &SelectClause) {
        walk_select_clause(self, select);
    }

    /// Visits a FROM clause.
    fn visit_from(&mut self, from: &FromClause) {
        walk_from(self, from);
    }

    /// Visits a FROM entry.
    fn visit_source(&mut self, source: &SourceExpr) {
        walk_source(self, source);
    }

    /// Visits a join.
    fn visit_join(&mut self, join: &JoinClause) {
        walk_join(self, join);
    }

    /// Visits an ORDER BY entry.
    fn visit_order_by_item(&mut self, item: &OrderByItem) {
        self.visit_expr(&item.value);
    }

    /// Visits a window specification.
    fn visit_window_spec(&mut self, spec: &WindowSpec) {
        walk_window_spec(self, spec);
    }

    /// Visits a value expression.
    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    /// Visits a function call.
    fn visit_function(&mut self, call: &FunctionCall) {
        walk_function(self, call);
    }

    /// Visits a CASE expression.
    fn visit_case(&mut self, case: &CaseExpr) {
        walk_case(self, case);
    }
}

pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    match statement {
        Statement::Query(query) => visitor.visit_query(query),
        Statement::Insert(insert) => visitor.visit_insert(insert),
        Statement::Update(update) => visitor.visit_update(update),
        Statement::Delete(delete) => visitor.visit_delete(delete),
    }
}

pub fn walk_query<V: Visitor + ?Sized>(visitor: &mut V, query: &Query) {
    match query {
        Query::Select(select) => visitor.visit_select(select),
        Query::Binary(binary) => {
            visitor.visit_query(&binary.left);
            visitor.visit_query(&binary.right);
        }
        Query::Values(values) => {
            for value in values.rows.iter().flatten() {
                visitor.visit_expr(value);
            }
        }
        Query::Paren { query, .. } => visitor.visit_query(query),
    }
}

pub fn walk_select<V: Visitor + ?Sized>(visitor: &mut V, select: &SelectQuery) {
    if let Some(with) = &select.with {
        visitor.visit_with(with);
    }
    visitor.visit_select_clause(&select.select);
    if let Some(from) = &select.from {
        visitor.visit_from(from);
    }
    if let Some(where_clause) = &select.where_clause {
        visitor.visit_expr(&where_clause.condition);
    }
    if let Some(group_by) = &select.group_by {
        for item in &group_by.items {
            visitor.visit_expr(item);
        }
    }
    if let Some(having) = &select.having {
        visitor.visit_expr(&having.condition);
    }
    if let Some(window) = &select.window {
        for named in &window.windows {
            visitor.visit_window_spec(&named.spec);
        }
    }
    if let Some(order_by) = &select.order_by {
        for item in &order_by.items {
            visitor.visit_order_by_item(item);
        }
    }
    if let Some(value) = select.limit.as_ref().and_then(|limit| limit.value.as_ref()) {
        visitor.visit_expr(value);
    }
    if let Some(offset) = &select.offset {
        visitor.visit_expr(&offset.value);
    }
    if let Some(count) = select.fetch.as_ref().and_then(|fetch| fetch.count.as_ref()) {
        visitor.visit_expr(count);
    }
}

pub fn walk_insert<V: Visitor + ?Sized>(visitor: &mut V, insert: &InsertQuery) {
    if let Some(with) = &insert.with {
        visitor.visit_with(with);
    }
    if let InsertSource::Query(query) = &insert.source {
        visitor.visit_query(query);
    }
    if let Some(returning) = &insert.returning {
        for item in &returning.items {
            visitor.visit_expr(&item.value);
        }
    }
}

pub fn walk_update<V: Visitor + ?Sized>(visitor: &mut V, update: &UpdateQuery) {
    if let Some(with) = &update.with {
        visitor.visit_with(with);
    }
    visitor.visit_source(&update.table);
    for item in &update.set {
        visitor.visit_expr(&item.value);
    }
    if let Some(from) = &update.from {
        visitor.visit_from(from);
    }
    if let Some(where_clause) = &update.where_clause {
        visitor.visit_expr(&where_clause.condition);
    }
    if let Some(returning) = &update.returning {
        for item in &returning.items {
            visitor.visit_expr(&item.value);
        }
    }
}

pub fn walk_delete<V: Visitor + ?Sized>(visitor: &mut V, delete: &DeleteQuery) {
    if let Some(with) = &delete.with {
        visitor.visit_with(with);
    }
    visitor.visit_source(&delete.table);
    for source in &delete.using {
        visitor.visit_source(source);
    }
    if let Some(where_clause) = &delete.where_clause {
        visitor.visit_expr(&where_clause.condition);
    }
    if let Some(returning) = &delete.returning {
        for item in &returning.items {
            visitor.visit_expr(&item.value);
        }
    }
}

pub fn walk_with<V: Visitor + ?Sized>(visitor: &mut V, with: &WithClause) {
    for table in &with.tables {
        visitor.visit_query(&table.query);
    }
}

pub fn walk_select_clause<V: Visitor + ?Sized>(visitor: &mut V, select: &SelectClause) {
    if let Some(super::clause::Distinct::On(values)) = &select.distinct {
        for value in values {
            visitor.visit_expr(value);
        }
    }
    for item in &select.items {
        visitor.visit_expr(&item.value);
    }
}

pub fn walk_from<V: Visitor + ?Sized>(visitor: &mut V, from: &FromClause) {
    visitor.visit_source(&from.source);
    for join in &from.joins {
        visitor.visit_join(join);
    }
}

pub fn walk_source<V: Visitor + ?Sized>(visitor: &mut V, source: &SourceExpr) {
    match &source.source {
        Source::Table(_) => {}
        Source::Subquery(query) => visitor.visit_query(query),
        Source::Function(call) => visitor.visit_function(call),
    }
}

pub fn walk_join<V: Visitor + ?Sized>(visitor: &mut V, join: &JoinClause) {
    visitor.visit_source(&join.source);
    if let Some(JoinCondition::On(condition)) = &join.condition {
        visitor.visit_expr(condition);
    }
}

pub fn walk_window_spec<V: Visitor + ?Sized>(visitor: &mut V, spec: &WindowSpec) {
    for value in &spec.partition_by {
        visitor.visit_expr(value);
    }
    for item in &spec.order_by {
        visitor.visit_order_by_item(item);
    }
    if let Some(frame) = &spec.frame {
        for bound in std::iter::once(&frame.start).chain(&frame.end) {
            if let FrameBound::Preceding(value) | FrameBound::Following(value) = bound {
                visitor.visit_expr(value);
            }
        }
    }
}

pub fn walk_function<V: Visitor + ?Sized>(visitor: &mut V, call: &FunctionCall) {
    for arg in &call.args {
        visitor.visit_expr(&arg.value);
    }
    for item in call.order_by.iter().chain(&call.within_group) {
        visitor.visit_order_by_item(item);
    }
    if let Some(filter) = &call.filter {
        visitor.visit_expr(filter);
    }
    if let Some(Over::Window(spec)) = &call.over {
        visitor.visit_window_spec(spec);
    }
}

pub fn walk_case<V: Visitor + ?Sized>(visitor: &mut V, case: &CaseExpr) {
    if let Some(operand) = &case.operand {
        visitor.visit_expr(operand);
    }
    for pair in &case.switch.cases {
        visitor.visit_expr(&pair.key);
        visitor.visit_expr(&pair.value);
    }
    if let Some(else_value) = &case.switch.else_value {
        visitor.visit_expr(else_value);
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Column(_)
        | ExprKind::Wildcard { .. }
        | ExprKind::Literal(_)
        | ExprKind::Parameter { .. }
        | ExprKind::PrefixedString { .. }
        | ExprKind::TypedLiteral { .. }
        | ExprKind::Default => {}
        ExprKind::Unary { operand, .. } => visitor.visit_expr(operand),
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Between {
            expr, low, high, ..
        } => {
            visitor.visit_expr(expr);
            visitor.visit_expr(low);
            visitor.visit_expr(high);
        }
        ExprKind::In { expr, list, .. } => {
            visitor.visit_expr(expr);
            match list {
                InList::Values(values) => {
                    for value in values {
                        visitor.visit_expr(value);
                    }
                }
                InList::Query(query) => visitor.visit_query(query),
            }
        }
        ExprKind::Exists { query, .. }
        | ExprKind::Subquery(query)
        | ExprKind::ArrayQuery(query) => visitor.visit_query(query),
        ExprKind::Function(call) => visitor.visit_function(call),
        ExprKind::Cast { expr, .. } | ExprKind::Paren(expr) => visitor.visit_expr(expr),
        ExprKind::Case(case) => visitor.visit_case(case),
        ExprKind::Tuple(items) | ExprKind::Array(items) => {
            for item in items {
                visitor.visit_expr(item);
            }
        }
        ExprKind::Index { expr, index } => {
            visitor.visit_expr(expr);
            visitor.visit_expr(index);
        }
        ExprKind::Slice { expr, lower, upper } => {
            visitor.visit_expr(expr);
            for bound in [lower, upper].into_iter().flatten() {
                visitor.visit_expr(bound);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::clause::SelectItem;
    use crate::comments::Comments;

    #[derive(Default)]
    struct ColumnCollector {
        columns: Vec<String>,
    }

    impl Visitor for ColumnCollector {
        fn visit_expr(&mut self, expr: &Expr) {
            if let Some(column) = expr.as_column() {
                self.columns.push(column.name.name.clone());
            }
            walk_expr(self, expr);
        }
    }

    #[test]
    fn test_walks_nested_expressions() {
        let condition = Expr::column("a").binary("+", Expr::column("b"));
        let call = FunctionCall::new("coalesce", vec![condition, Expr::column("c")]);
        let select = SelectQuery::new(SelectClause {
            hints: Vec::new(),
            distinct: None,
            items: vec![SelectItem::new(Expr::new(ExprKind::Function(call)))],
            comments: Comments::new(),
        });
        let statement = Statement::Query(Query::Select(Box::new(select)));

        let mut collector = ColumnCollector::default();
        collector.visit_statement(&statement);
        assert_eq!(collector.columns, vec!["a", "b", "c"]);
    }
}
