// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Table-driven insert-or-update resolver.

use rowput_core::{ContentValues, PutResult, RowputError, Value};
use rusqlite::params_from_iter;
use tracing::debug;

use crate::database::Database;
use crate::put::resolver::PutResolver;
use crate::sql;

type MapFn<T> = dyn Fn(&T) -> ContentValues + Send + Sync;
type AfterPutFn<T> = dyn Fn(&T, &PutResult) -> Result<(), RowputError> + Send + Sync;

/// Column used as the row key when none is configured.
pub const DEFAULT_ID_COLUMN: &str = "_id";

enum Written {
    Inserted(i64),
    Updated(usize),
}

/// Resolver that maps a record to [`ContentValues`] and writes it to one table.
///
/// A record whose id column is missing or `NULL` is inserted. Otherwise the
/// row with that id is updated if it exists and inserted if it does not.
/// The existence check and the write share one transaction.
pub struct DefaultPutResolver<T> {
    table: String,
    id_column: String,
    map: Box<MapFn<T>>,
    after_put: Option<Box<AfterPutFn<T>>>,
}

impl<T> DefaultPutResolver<T> {
    pub fn new<F>(table: impl Into<String>, map: F) -> Self
    where
        F: Fn(&T) -> ContentValues + Send + Sync + 'static,
    {
        Self {
            table: table.into(),
            id_column: DEFAULT_ID_COLUMN.to_string(),
            map: Box::new(map),
            after_put: None,
        }
    }

    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }

    /// Run `hook` after every successful write.
    pub fn on_after_put<F>(mut self, hook: F) -> Self
    where
        F: Fn(&T, &PutResult) -> Result<(), RowputError> + Send + Sync + 'static,
    {
        self.after_put = Some(Box::new(hook));
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn id_column(&self) -> &str {
        &self.id_column
    }
}

impl DefaultPutResolver<ContentValues> {
    /// Resolver for untyped records, written to `table` as-is.
    pub fn for_content_values(table: impl Into<String>) -> Self {
        Self::new(table, ContentValues::clone)
    }
}

impl<T> PutResolver<T> for DefaultPutResolver<T> {
    fn perform_put(&self, db: &Database, object: &T) -> Result<PutResult, RowputError> {
        if self.table.trim().is_empty() {
            return Err(RowputError::Config(
                "default put resolver needs a table name".to_string(),
            ));
        }

        let values = (self.map)(object);
        let id = record_id(&values, &self.id_column).map(sql::to_sql_value);

        let written = db.call(|conn| {
            let tx = conn.transaction()?;
            let exists = match &id {
                Some(id) => {
                    let count: i64 = tx.query_row(
                        &sql::count_by_id_statement(&self.table, &self.id_column),
                        [id],
                        |row| row.get(0),
                    )?;
                    count > 0
                }
                None => false,
            };

            let written = if exists {
                let mut params = sql::params(&values);
                params.extend(id.clone());
                let rows = tx.execute(
                    &sql::update_statement(&self.table, &self.id_column, &values),
                    params_from_iter(params),
                )?;
                Written::Updated(rows)
            } else {
                tx.execute(
                    &sql::insert_statement(&self.table, &values),
                    params_from_iter(sql::params(&values)),
                )?;
                Written::Inserted(tx.last_insert_rowid())
            };
            tx.commit()?;
            Ok(written)
        })?;

        match written {
            Written::Inserted(row_id) => {
                debug!(table = %self.table, row_id, "row inserted");
                PutResult::new_insert_result(row_id, self.table.as_str())
            }
            Written::Updated(rows) => {
                debug!(table = %self.table, rows, "rows updated");
                PutResult::new_update_result(rows, self.table.as_str())
            }
        }
    }

    fn after_put(&self, object: &T, result: &PutResult) -> Result<(), RowputError> {
        match &self.after_put {
            Some(hook) => hook(object, result),
            None => Ok(()),
        }
    }
}

/// Id value of an untyped record, if it has a non-null one.
pub fn record_id<'a>(values: &'a ContentValues, id_column: &str) -> Option<&'a Value> {
    values.get(id_column).filter(|v| !v.is_null())
}
