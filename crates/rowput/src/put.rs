// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `rowput put` command implementation.
//!
//! Builds a record from `--set column=value` pairs, writes it with the
//! default insert-or-update resolver on the tokio runtime, and logs the
//! change notification the write produced.

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use rowput_config::RowputConfig;
use rowput_core::{ContentValues, PutResult, RowputError, Value};
use rowput_storage::{Database, DefaultPutResolver};
use tracing::{info, warn};

#[derive(Args, Debug)]
pub struct PutArgs {
    /// Table to write to.
    #[arg(long)]
    pub table: String,

    /// Column holding the row id. Defaults to `_id`.
    #[arg(long)]
    pub id_column: Option<String>,

    /// Database file, overriding `storage.database_path`.
    #[arg(long)]
    pub database: Option<String>,

    /// Column assignment as `column=value`. Repeatable.
    #[arg(long = "set", value_name = "COLUMN=VALUE")]
    pub set: Vec<String>,
}

/// Parse one `column=value` assignment. `null`, integers and finite floats
/// are typed; anything else is stored as text.
pub fn parse_assignment(raw: &str) -> Result<(String, Value), RowputError> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| RowputError::Config(format!("expected column=value, got `{raw}`")))?;
    let column = column.trim();
    if column.is_empty() {
        return Err(RowputError::Config(format!(
            "missing column name in `{raw}`"
        )));
    }
    Ok((column.to_string(), Value::parse_literal(value)))
}

fn build_record(assignments: &[String]) -> Result<ContentValues, RowputError> {
    assignments.iter().map(|raw| parse_assignment(raw)).collect()
}

/// Run the `rowput put` command.
pub async fn run_put(config: &RowputConfig, args: PutArgs) -> Result<PutResult, RowputError> {
    let record = build_record(&args.set)?;

    let path = args
        .database
        .as_deref()
        .unwrap_or(&config.storage.database_path);
    ensure_parent_dir(path)?;
    let mut config = config.clone();
    config.storage.database_path = path.to_string();
    let db = Database::from_config(&config)?;

    let mut resolver = DefaultPutResolver::for_content_values(args.table.as_str());
    if let Some(id_column) = args.id_column {
        resolver = resolver.with_id_column(id_column);
    }

    put_record(&db, record, resolver).await
}

/// Write `record` through `resolver` as a deferred put and wait for the
/// change notification it publishes.
pub async fn put_record(
    db: &Database,
    record: ContentValues,
    resolver: DefaultPutResolver<ContentValues>,
) -> Result<PutResult, RowputError> {
    let mut changes = db.observe_changes();

    let result = db
        .put()
        .content_values(record)
        .with_put_resolver(Arc::new(resolver))
        .prepare()?
        .create_deferred()?
        .execute()
        .await?;

    // The notification is published before the result is delivered.
    match changes.try_recv() {
        Some(changes) => info!(tables = ?changes.affected_tables(), "changes published"),
        None => warn!("put completed without a change notification"),
    }
    checkpoint_after_put(db);
    Ok(result)
}

/// The row is already committed here, so a failed checkpoint is only logged.
fn checkpoint_after_put(db: &Database) {
    if let Err(e) = db.close() {
        warn!(error = %e, path = db.path(), "WAL checkpoint after put failed");
    }
}

fn ensure_parent_dir(path: &str) -> Result<(), RowputError> {
    match Path::new(path).parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent)
            .map_err(|e| RowputError::Storage {
                source: Box::new(e),
            }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    use tracing_test::traced_test;

    use super::*;

    #[test]
    fn parse_assignment_types_values() {
        assert_eq!(
            parse_assignment("name=Ada").unwrap(),
            ("name".to_string(), Value::Text("Ada".into()))
        );
        assert_eq!(
            parse_assignment("id=null").unwrap(),
            ("id".to_string(), Value::Null)
        );
        assert_eq!(
            parse_assignment("age=36").unwrap(),
            ("age".to_string(), Value::Integer(36))
        );
    }

    #[test]
    fn parse_assignment_keeps_later_equals_signs() {
        let (column, value) = parse_assignment("expr=a=b").unwrap();
        assert_eq!(column, "expr");
        assert_eq!(value, Value::Text("a=b".into()));
    }

    #[test]
    fn parse_assignment_rejects_malformed_input() {
        assert!(parse_assignment("novalue").unwrap_err().is_config());
        assert!(parse_assignment("=5").unwrap_err().is_config());
    }

    #[test]
    fn later_assignment_wins() {
        let record = build_record(&["name=Ada".into(), "name=Grace".into()]).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("name"), Some(&Value::Text("Grace".into())));
    }

    #[tokio::test]
    async fn run_put_creates_database_and_inserts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rowput.db");
        let config = RowputConfig::default();

        let setup = PutArgs {
            table: "notes".into(),
            id_column: None,
            database: Some(path.to_string_lossy().into_owned()),
            set: vec![],
        };
        // Table does not exist yet.
        assert!(run_put(&config, setup).await.is_err());

        let db = Database::open(&path.to_string_lossy(), &config.storage).unwrap();
        db.call(|conn| conn.execute_batch("CREATE TABLE notes (_id INTEGER PRIMARY KEY, body TEXT);"))
            .unwrap();
        db.close().unwrap();
        drop(db);

        let args = PutArgs {
            table: "notes".into(),
            id_column: None,
            database: Some(path.to_string_lossy().into_owned()),
            set: vec!["body=hello".into()],
        };
        let result = run_put(&config, args).await.unwrap();
        assert!(result.was_inserted());
        assert_eq!(result.inserted_id(), Some(1));
        assert_eq!(result.affected_table(), "notes");
    }

    #[test]
    #[traced_test]
    fn failed_checkpoint_is_logged_not_returned() {
        let db = Database::open_in_memory().unwrap();
        // Poison the connection mutex so every later call fails.
        let _ = catch_unwind(AssertUnwindSafe(|| {
            db.call(|_| -> Result<(), _> { panic!("writer crashed") })
        }));
        assert!(db.close().is_err());

        checkpoint_after_put(&db);
        assert!(logs_contain("WAL checkpoint after put failed"));
    }
}
