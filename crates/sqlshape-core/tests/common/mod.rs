#![allow(dead_code)]

use sqlshape_core::ast::{DeleteQuery, InsertQuery, Query, SelectQuery, UpdateQuery};
use sqlshape_core::{parse_statement, tokenize, Error, Statement, Token, TokenKind};

pub fn tokens(sql: &str) -> Vec<Token> {
    tokenize(sql).unwrap_or_else(|e| panic!("Failed to tokenize: {sql}\nError: {e}"))
}

/// `(kind, text)` for every token.
pub fn kinds(sql: &str) -> Vec<(TokenKind, String)> {
    tokens(sql)
        .into_iter()
        .map(|token| (token.kind, token.text))
        .collect()
}

pub fn parse(sql: &str) -> Statement {
    sqlshape_core::parse(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_err(sql: &str) -> Error {
    match sqlshape_core::parse(sql) {
        Ok(statement) => panic!("Expected parse error for: {sql}\nGot: {statement:?}"),
        Err(err) => err,
    }
}

pub fn parse_query(sql: &str) -> Query {
    match parse(sql) {
        Statement::Query(query) => query,
        other => panic!("Expected query, got {other:?}"),
    }
}

pub fn parse_select(sql: &str) -> SelectQuery {
    match parse_query(sql) {
        Query::Select(select) => *select,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertQuery {
    match parse(sql) {
        Statement::Insert(insert) => insert,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateQuery {
    match parse(sql) {
        Statement::Update(update) => update,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteQuery {
    match parse(sql) {
        Statement::Delete(delete) => delete,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

/// Parses directly from a token list, as callers holding tokens do.
pub fn parse_tokens(sql: &str) -> Statement {
    parse_statement(&tokens(sql)).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

/// Checks that `sql` renders as `expected` and that the rendering is a
/// fixed point: parsing it again renders the same string.
pub fn round_trip(sql: &str, expected: &str) {
    let rendered1 = parse(sql).to_string();
    assert_eq!(rendered1, expected, "Rendering mismatch for: {sql}");
    let rendered2 = parse(&rendered1).to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}
