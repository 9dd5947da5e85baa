//! Tests for SELECT queries: clauses, sources, joins and set operations.

mod common;
use common::*;

use sqlshape_core::ast::{
    Distinct, ExprKind, FrameBound, FrameUnit, JoinCondition, JoinType, LockStrength, LockWait,
    NullsPosition, SetOperator, SortDirection, Source,
};
use sqlshape_core::Query;

#[test]
fn select_items_and_aliases() {
    let select = parse_select("SELECT id, name AS full_name, age yrs FROM users");
    let items = &select.select.items;
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].name(), Some("id"));
    assert_eq!(items[1].alias.as_ref().map(|a| a.name.as_str()), Some("full_name"));
    assert_eq!(items[2].alias.as_ref().map(|a| a.name.as_str()), Some("yrs"));
}

#[test]
fn select_without_from() {
    let select = parse_select("select 1");
    assert!(select.from.is_none());
    assert_eq!(select.select.items.len(), 1);
}

#[test]
fn select_literal_forms() {
    let select = parse_select("SELECT 1.5, -2, .5, 0x1F");
    let texts: Vec<&str> = select
        .select
        .items
        .iter()
        .map(|item| item.value.as_literal().map_or("", |literal| literal.text.as_str()))
        .collect();
    assert_eq!(texts, vec!["1.5", "-2", "0.5", "0x1F"]);
}

#[test]
fn select_distinct_on() {
    let select = parse_select("select distinct on (a, b) a, b, c from t");
    assert!(matches!(select.select.distinct, Some(Distinct::On(ref values)) if values.len() == 2));
}

#[test]
fn select_qualified_wildcard() {
    let select = parse_select("select u.*, o.total from users u join orders o on o.user_id = u.id");
    assert!(matches!(
        &select.select.items[0].value.kind,
        ExprKind::Wildcard { namespaces } if namespaces[0].name == "u"
    ));
}

#[test]
fn from_schema_qualified_table() {
    let select = parse_select("select * from public.users as u");
    let from = select.from.unwrap();
    let Source::Table(table) = &from.source.source else {
        panic!("expected table");
    };
    assert_eq!(table.namespaces[0].name, "public");
    assert_eq!(table.name.name, "users");
    assert_eq!(from.source.reference_name(), Some("u"));
}

#[test]
fn from_comma_then_join() {
    let select = parse_select("SELECT * FROM a, b JOIN c ON c.id = a.id");
    let from = select.from.unwrap();
    assert_eq!(from.joins.len(), 2);
    assert!(from.joins[0].is_comma());
    assert_eq!(from.joins[1].join_type(), JoinType::Inner);
    assert!(matches!(from.joins[1].condition, Some(JoinCondition::On(_))));
}

#[test]
fn from_join_variants() {
    let select = parse_select(
        "select * from a \
         left outer join b on b.id = a.id \
         right join c using (id) \
         full join d on true \
         cross join e \
         natural join f",
    );
    let joins = select.from.unwrap().joins;
    let types: Vec<JoinType> = joins.iter().map(|join| join.join_type()).collect();
    assert_eq!(
        types,
        vec![
            JoinType::Left,
            JoinType::Right,
            JoinType::Full,
            JoinType::Cross,
            JoinType::Inner
        ]
    );
    assert!(matches!(
        &joins[1].condition,
        Some(JoinCondition::Using { columns, .. }) if columns.len() == 1
    ));
    assert!(joins[3].condition.is_none());
    assert!(joins[4].is_natural());
}

#[test]
fn from_subquery_with_alias() {
    let select = parse_select("select s.n from (select count(*) as n from t) s");
    let from = select.from.unwrap();
    assert!(matches!(from.source.source, Source::Subquery(_)));
    assert_eq!(from.source.reference_name(), Some("s"));
}

#[test]
fn from_lateral_function() {
    let select = parse_select("select * from t, lateral unnest(t.tags) as tag(value)");
    let join = &select.from.unwrap().joins[0];
    assert!(join.source.lateral);
    assert!(matches!(join.source.source, Source::Function(_)));
    let alias = join.source.alias.as_ref().unwrap();
    assert_eq!(alias.name.name, "tag");
    assert_eq!(alias.columns.len(), 1);
}

#[test]
fn where_group_by_having() {
    let select = parse_select(
        "select dept, count(*) from emp where active group by dept having count(*) > 5",
    );
    assert!(select.where_clause.is_some());
    assert_eq!(select.group_by.unwrap().items.len(), 1);
    assert_eq!(select.having.unwrap().condition.to_string(), "count(*) > 5");
}

#[test]
fn order_by_desc_nulls_last() {
    let select = parse_select("SELECT a FROM t ORDER BY a DESC NULLS LAST, b");
    let items = select.order_by.unwrap().items;
    assert_eq!(items[0].direction, Some(SortDirection::Descending));
    assert_eq!(items[0].nulls, Some(NullsPosition::Last));
    assert_eq!(items[1].direction, None);
    assert_eq!(items[1].direction(), SortDirection::Ascending);
}

#[test]
fn limit_and_offset() {
    let select = parse_select("select a from t limit 10 offset 20");
    assert_eq!(select.limit.unwrap().value.unwrap().to_string(), "10");
    assert_eq!(select.offset.unwrap().value.to_string(), "20");
}

#[test]
fn limit_all() {
    let select = parse_select("select a from t limit all offset 5");
    assert!(select.limit.unwrap().value.is_none());
    assert_eq!(select.offset.unwrap().value.to_string(), "5");
    round_trip("select a from t limit all", "select a from t limit all");
}

#[test]
fn offset_fetch() {
    let select = parse_select("select a from t order by a offset 5 rows fetch next 10 rows only");
    let offset = select.offset.unwrap();
    assert_eq!(offset.rows_keyword.as_deref(), Some("rows"));
    let fetch = select.fetch.unwrap();
    assert_eq!(fetch.position_keyword, "next");
    assert_eq!(fetch.count.unwrap().to_string(), "10");
    assert!(!fetch.with_ties);
}

#[test]
fn for_update_skip_locked() {
    let select = parse_select("select * from jobs for update skip locked");
    let lock = select.for_clause.unwrap();
    assert_eq!(lock.strength, LockStrength::Update);
    assert_eq!(lock.wait, Some(LockWait::SkipLocked));
}

#[test]
fn named_window_and_frame() {
    let select = parse_select(
        "select sum(x) over w from t \
         window w as (partition by g order by x rows between 2 preceding and current row)",
    );
    let window = select.window.unwrap();
    let spec = &window.windows[0].spec;
    assert_eq!(window.windows[0].name.name, "w");
    assert_eq!(spec.partition_by.len(), 1);
    let frame = spec.frame.as_ref().unwrap();
    assert_eq!(frame.unit, FrameUnit::Rows);
    assert!(matches!(frame.start, FrameBound::Preceding(_)));
    assert_eq!(frame.end, Some(FrameBound::CurrentRow));
}

#[test]
fn with_recursive_cte() {
    let query = parse_query(
        "with recursive nums(n) as (select 1 union all select n + 1 from nums where n < 10) \
         select n from nums",
    );
    let with = query.first_select().unwrap().with.as_ref().unwrap();
    assert!(with.recursive);
    assert_eq!(with.tables[0].name.name, "nums");
    assert_eq!(with.tables[0].columns.len(), 1);
    assert!(matches!(*with.tables[0].query, Query::Binary(_)));
}

#[test]
fn union_except_chain() {
    let query = parse_query("select a from x union select a from y except all select a from z");
    let Query::Binary(outer) = &query else {
        panic!("expected set operation");
    };
    assert_eq!(outer.operator, SetOperator::ExceptAll);
    assert!(matches!(
        outer.left.as_ref(),
        Query::Binary(inner) if inner.operator == SetOperator::Union
    ));
}

#[test]
fn values_as_query() {
    let query = parse_query("values (1, 2), (3, 4)");
    let Query::Values(values) = &query else {
        panic!("expected values");
    };
    assert_eq!(values.rows.len(), 2);
    assert_eq!(values.rows[1].len(), 2);
}

#[test]
fn parse_statement_from_tokens() {
    let statement = parse_tokens("select a from t where b = 1");
    assert_eq!(statement.to_string(), "select a from t where b = 1");
}

#[test]
fn parsing_is_deterministic() {
    let sql = "select a, count(*) from t left join u on u.id = t.uid group by a order by 2 desc";
    assert_eq!(parse(sql), parse(sql));
    assert_eq!(parse(sql).to_string(), parse(sql).to_string());
}
