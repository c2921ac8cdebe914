// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL text and parameter helpers for the default put resolver.

use rowput_core::{ContentValues, Value};
use rusqlite::types::Value as SqlValue;

/// Quote an identifier for use as a table or column name.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Real(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Blob(b) => SqlValue::Blob(b.clone()),
    }
}

/// Bound parameters for `values`, in column order.
pub fn params(values: &ContentValues) -> Vec<SqlValue> {
    values.iter().map(|(_, v)| to_sql_value(v)).collect()
}

pub fn insert_statement(table: &str, values: &ContentValues) -> String {
    if values.is_empty() {
        return format!("INSERT INTO {} DEFAULT VALUES", quote_ident(table));
    }
    let columns: Vec<String> = values.columns().map(quote_ident).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// `UPDATE` of every column in `values`, keyed on `id_column`.
///
/// The id is bound as the last parameter, after the values from [`params`].
pub fn update_statement(table: &str, id_column: &str, values: &ContentValues) -> String {
    let assignments: Vec<String> = values
        .columns()
        .enumerate()
        .map(|(i, column)| format!("{} = ?{}", quote_ident(column), i + 1))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = ?{}",
        quote_ident(table),
        assignments.join(", "),
        quote_ident(id_column),
        values.len() + 1
    )
}

pub fn count_by_id_statement(table: &str, id_column: &str) -> String {
    format!(
        "SELECT COUNT(*) FROM {} WHERE {} = ?1",
        quote_ident(table),
        quote_ident(id_column)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_embedded_quotes() {
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn insert_lists_columns_in_order() {
        let values = ContentValues::new().with("name", "Ada").with("id", None::<i64>);
        assert_eq!(
            insert_statement("users", &values),
            r#"INSERT INTO "users" ("id", "name") VALUES (?1, ?2)"#
        );
        assert_eq!(params(&values), vec![SqlValue::Null, SqlValue::Text("Ada".into())]);
    }

    #[test]
    fn empty_insert_uses_default_values() {
        assert_eq!(
            insert_statement("users", &ContentValues::new()),
            r#"INSERT INTO "users" DEFAULT VALUES"#
        );
    }

    #[test]
    fn update_binds_id_last() {
        let values = ContentValues::new().with("id", 3).with("name", "Ada");
        assert_eq!(
            update_statement("users", "id", &values),
            r#"UPDATE "users" SET "id" = ?1, "name" = ?2 WHERE "id" = ?3"#
        );
    }
}
