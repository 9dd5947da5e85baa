//! Tests for multi-statement input, traversal and serialization.

mod common;
use common::*;

use sqlshape_core::ast::{ColumnRef, FunctionCall, SelectQuery};
use sqlshape_core::{parse_all, read_next_statement, Expr, Statement, Tokenizer, Visitor};

#[test]
fn parse_all_returns_each_statement() {
    let sql = "select 1;\ninsert into t values (2);\nupdate t set a = 3";
    let statements = parse_all(sql).unwrap();
    let kinds: Vec<&str> = statements
        .iter()
        .map(|parsed| parsed.statement.kind_name())
        .collect();
    assert_eq!(kinds, vec!["select", "insert", "update"]);
    for parsed in &statements {
        assert_eq!(&sql[parsed.span.start..parsed.span.end], parsed.raw_text);
    }
}

#[test]
fn parse_all_stops_at_first_error() {
    let err = parse_all("select 1; select from; select 3").unwrap_err();
    assert!(matches!(err, sqlshape_core::Error::Parse(_)));
}

#[test]
fn parse_all_empty_input() {
    assert!(parse_all("").unwrap().is_empty());
    assert!(parse_all("  -- only a comment\n").unwrap().is_empty());
}

#[test]
fn comments_of_empty_statements_carry_forward() {
    let statements = parse_all("-- one\n; -- two\n; select 1").unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(
        statements[0].leading_comments,
        vec!["one".to_string(), "two".to_string()]
    );
}

#[test]
fn read_next_statement_threads_positions() {
    let sql = "select 1; /* c */ select 2";
    let first = read_next_statement(sql, 0, Vec::new()).unwrap().unwrap();
    assert_eq!(first.raw_text, "select 1");
    assert_eq!(first.trailing_comments, vec!["c".to_string()]);

    let second = read_next_statement(sql, first.next_position, first.trailing_comments)
        .unwrap()
        .unwrap();
    assert_eq!(second.raw_text, "select 2");
    assert_eq!(second.leading_comments, vec!["c".to_string()]);

    assert!(read_next_statement(sql, sql.len(), Vec::new()).unwrap().is_none());
}

#[test]
fn read_next_statement_inside_a_character() {
    let sql = "select 'é'";
    assert!(!sql.is_char_boundary(9));
    assert!(read_next_statement(sql, 9, Vec::new()).unwrap().is_none());
    assert!(read_next_statement(sql, 0, Vec::new()).unwrap().is_some());
}

#[test]
fn statement_reader_yields_non_empty_slices() {
    let slices: Vec<_> = Tokenizer::new("select 1;;select 2;")
        .statements()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(slices.len(), 2);
    assert!(slices.iter().all(|slice| !slice.is_empty()));
}

#[test]
fn statement_reader_reports_lex_errors() {
    let mut reader = Tokenizer::new("select 1; select 'open").statements();
    assert!(reader.next().unwrap().is_ok());
    assert!(reader.next().unwrap().is_err());
    assert!(reader.next().is_none());
}

#[derive(Default)]
struct Collector {
    columns: Vec<String>,
    functions: Vec<String>,
    selects: usize,
}

impl Visitor for Collector {
    fn visit_select(&mut self, select: &SelectQuery) {
        self.selects += 1;
        sqlshape_core::ast::visitor::walk_select(self, select);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Some(ColumnRef { name, .. }) = expr.as_column() {
            self.columns.push(name.name.clone());
        }
        sqlshape_core::ast::visitor::walk_expr(self, expr);
    }

    fn visit_function(&mut self, call: &FunctionCall) {
        self.functions.push(call.name.clone());
        sqlshape_core::ast::visitor::walk_function(self, call);
    }
}

#[test]
fn visitor_reaches_nested_nodes() {
    let statement = parse(
        "select lower(name), (select max(score) from s where s.uid = u.id) \
         from users u where id in (select uid from bans) order by created",
    );
    let mut collector = Collector::default();
    collector.visit_statement(&statement);
    assert_eq!(collector.selects, 3);
    assert_eq!(collector.functions, vec!["lower", "max"]);
    for column in ["name", "score", "uid", "id", "created"] {
        assert!(
            collector.columns.iter().any(|c| c == column),
            "missing column {column}: {:?}",
            collector.columns
        );
    }
}

#[test]
fn visitor_walks_dml() {
    let statement = parse("update t set a = b + 1 where c = (select max(d) from u)");
    let mut collector = Collector::default();
    collector.visit_statement(&statement);
    assert_eq!(collector.selects, 1);
    assert_eq!(collector.functions, vec!["max"]);
    assert!(collector.columns.contains(&"b".to_string()));
    assert!(collector.columns.contains(&"d".to_string()));
}

#[test]
fn statements_serialize_to_json() {
    let statement = parse("select a from t where b = $1");
    let json = serde_json::to_value(&statement).unwrap();
    assert!(json.get("query").is_some());
    let back: Statement = serde_json::from_value(json).unwrap();
    assert_eq!(back, statement);
}

#[test]
fn tokens_serialize_with_kind_flags() {
    let json = serde_json::to_string(&tokens("select a")).unwrap();
    assert!(json.contains("\"text\":\"select\""));
    assert!(json.contains("COMMAND"));
}
