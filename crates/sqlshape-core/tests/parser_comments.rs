//! Tests for comment attachment and rendering.

mod common;
use common::*;

use sqlshape_core::ast::Query;

fn before(comments: &sqlshape_core::Comments) -> Vec<&str> {
    comments.before().collect()
}

fn after(comments: &sqlshape_core::Comments) -> Vec<&str> {
    comments.after().collect()
}

#[test]
fn comment_after_select_describes_first_item() {
    let select = parse_select("select /* id */ a from t");
    assert_eq!(before(&select.select.items[0].value.comments), vec!["id"]);
    assert!(select.select.comments.is_empty());
    round_trip("select /* id */ a from t", "select /* id */ a from t");
}

#[test]
fn line_comment_after_value() {
    let select = parse_select("select a -- note\nfrom t");
    assert_eq!(after(&select.select.items[0].value.comments), vec!["note"]);
    round_trip("select a -- note\nfrom t", "select a /* note */ from t");
}

#[test]
fn comment_after_comma_describes_next_item() {
    let select = parse_select("select a, /* second */ b from t");
    assert!(select.select.items[0].value.comments.is_empty());
    assert_eq!(before(&select.select.items[1].value.comments), vec!["second"]);
}

#[test]
fn comment_after_operator_describes_right_operand() {
    round_trip("select a + /* op */ b", "select a + /* op */ b");
}

#[test]
fn comment_after_from_describes_source() {
    let select = parse_select("select a from /* src */ users");
    let from = select.from.unwrap();
    assert!(from.comments.is_empty());
    assert_eq!(before(&from.source.comments), vec!["src"]);
    round_trip("select a from /* src */ users", "select a from /* src */ users");
}

#[test]
fn comment_after_source_stays_with_source() {
    round_trip(
        "SELECT id FROM users /* active only */ WHERE active",
        "select id from users /* active only */ where active",
    );
}

#[test]
fn leading_comment_goes_to_select_keyword() {
    let select = parse_select("-- header\nselect 1");
    assert_eq!(before(&select.select.comments), vec!["header"]);
    round_trip("-- header\nselect 1", "/* header */ select 1");
}

#[test]
fn comment_before_semicolon_stays_on_last_value() {
    let select = parse_select("select 1 /* tail */;");
    assert_eq!(after(&select.select.items[0].value.comments), vec!["tail"]);
}

#[test]
fn comment_after_set_operation_describes_next_select() {
    let query = parse_query("select 1 union /* next */ select 2");
    let Query::Binary(binary) = &query else {
        panic!("expected set operation");
    };
    assert!(binary.comments.is_empty());
    let right = binary.right.as_select().unwrap();
    assert_eq!(before(&right.select.comments), vec!["next"]);
    round_trip(
        "select 1 union /* next */ select 2",
        "select 1 union /* next */ select 2",
    );
}

#[test]
fn comment_after_order_by_describes_first_item() {
    let select = parse_select("select a from t order by /* key */ a desc");
    let order_by = select.order_by.unwrap();
    assert!(order_by.comments.is_empty());
    assert_eq!(before(&order_by.items[0].value.comments), vec!["key"]);
}

#[test]
fn comment_before_where_keyword() {
    let select = parse_select("select a from t /* filter */ where b");
    let from = select.from.unwrap();
    assert_eq!(after(&from.source.comments), vec!["filter"]);
    assert!(select.where_clause.unwrap().comments.is_empty());
}

#[test]
fn comments_between_statements_carry_forward() {
    let statements = parse_all("select 1; /* about two */ select 2; -- trailing");
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[1].leading_comments, vec!["about two".to_string()]);
}

#[test]
fn comment_after_last_statement_is_kept() {
    let statements = parse_all("select 1; -- tail note");
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].trailing_comments, vec!["tail note".to_string()]);

    let statements = parse_all("select 1; select 2; ; /* end */");
    assert!(statements[0].trailing_comments.is_empty());
    assert_eq!(statements[1].trailing_comments, vec!["end".to_string()]);
}

#[test]
fn comments_inside_case() {
    round_trip(
        "select case when a then /* yes */ 1 else /* no */ 2 end /* done */ from t",
        "select case when a then /* yes */ 1 else /* no */ 2 end /* done */ from t",
    );
}

#[test]
fn comment_after_cast_type() {
    round_trip(
        "select a::int /* c1 */ from t",
        "select a::int /* c1 */ from t",
    );
    round_trip(
        "select cast(a as /* kind */ int) from t",
        "select cast(a as /* kind */ int) from t",
    );
}

#[test]
fn comment_after_in_list() {
    round_trip(
        "select a from t where a in (1, 2) /* c3 */",
        "select a from t where a in (1, 2) /* c3 */",
    );
    round_trip(
        "select a from t where a in (/* sub */ select 1)",
        "select a from t where a in (/* sub */ select 1)",
    );
}

#[test]
fn comment_after_using() {
    round_trip(
        "select * from a join b using /* c4 */ (id)",
        "select * from a join b using /* c4 */ (id)",
    );
}

#[test]
fn comment_after_cte_as() {
    round_trip(
        "with x as /* c5 */ (select 1) select * from x",
        "with x as /* c5 */ (select 1) select * from x",
    );
}

#[test]
fn comment_on_set_column() {
    round_trip("update t set a /* c8 */ = 1", "update t set a /* c8 */ = 1");
}

#[test]
fn comment_after_fetch_and_for() {
    round_trip(
        "select a from t fetch first 5 rows only /* c9 */",
        "select a from t fetch first 5 rows only /* c9 */",
    );
    round_trip(
        "select a from t for update of t /* locked */",
        "select a from t for update of t /* locked */",
    );
}

#[test]
fn comment_after_values_row_moves_inside() {
    round_trip("values (1) /* c13 */", "values (1 /* c13 */)");
}

#[test]
fn comment_inside_distinct_on() {
    round_trip(
        "select distinct /* k12 */ on (a) a from t",
        "select distinct on (/* k12 */ a) a from t",
    );
}

#[test]
fn comments_on_filter_and_over() {
    round_trip(
        "select count(*) filter (/* big */ where a > 1) from t",
        "select count(*) filter (where /* big */ a > 1) from t",
    );
    round_trip(
        "select count(*) filter (where a > 1) /* f */ over (partition by b) /* w */ from t",
        "select count(*) filter (where a > 1) over (partition by b) /* f */ /* w */ from t",
    );
    round_trip(
        "select rank() over (/* win */ order by a) from t",
        "select rank() over (/* win */ order by a) from t",
    );
}

#[test]
fn comment_after_named_window() {
    round_trip(
        "select rank() over w from t window w as (order by a) /* named */",
        "select rank() over w from t window w as (order by a) /* named */",
    );
}

#[test]
fn limit_all_keeps_comment() {
    round_trip(
        "select a from t limit all /* every row */",
        "select a from t limit /* every row */ all",
    );
}

fn parse_all(sql: &str) -> Vec<sqlshape_core::ParsedStatement> {
    sqlshape_core::parse_all(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}
