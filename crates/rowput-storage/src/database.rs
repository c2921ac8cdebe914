// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle: one SQLite connection plus the change bus it publishes to.
//!
//! All statements run through [`Database::call`], which serializes access to
//! the single connection. Do NOT open additional connections for writes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rowput_bus::{ChangeBus, ChangeSubscription};
use rowput_config::{RowputConfig, StorageConfig};
use rowput_core::{Changes, RowputError};
use rusqlite::Connection;
use tracing::debug;

use crate::put::PutBuilder;

/// Convert a rusqlite error into `RowputError::Storage`.
pub fn map_sql_err(e: rusqlite::Error) -> RowputError {
    RowputError::Storage {
        source: Box::new(e),
    }
}

struct Inner {
    conn: Mutex<Connection>,
    bus: ChangeBus,
    path: String,
}

/// Cheaply cloneable handle to a SQLite database.
///
/// Put resolvers receive a `&Database` and write through [`Database::call`];
/// put operations publish their [`Changes`] through
/// [`Database::notify_about_changes`].
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

impl Database {
    /// Open (or create) the database at `path` with the given storage settings.
    pub fn open(path: &str, config: &StorageConfig) -> Result<Self, RowputError> {
        Self::open_with_bus(path, config, ChangeBus::default())
    }

    /// Open the database and bus described by a full configuration.
    pub fn from_config(config: &RowputConfig) -> Result<Self, RowputError> {
        Self::open_with_bus(
            &config.storage.database_path,
            &config.storage,
            ChangeBus::new(config.bus.capacity),
        )
    }

    /// Open the database at `path`, publishing changes to an existing bus.
    pub fn open_with_bus(
        path: &str,
        config: &StorageConfig,
        bus: ChangeBus,
    ) -> Result<Self, RowputError> {
        let conn = Connection::open(path).map_err(map_sql_err)?;
        apply_pragmas(&conn, config).map_err(map_sql_err)?;
        debug!(path, wal_mode = config.wal_mode, "database opened");
        Ok(Self::from_parts(conn, bus, path))
    }

    /// Open a private in-memory database with default bus capacity.
    pub fn open_in_memory() -> Result<Self, RowputError> {
        let conn = Connection::open_in_memory().map_err(map_sql_err)?;
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(map_sql_err)?;
        Ok(Self::from_parts(conn, ChangeBus::default(), ":memory:"))
    }

    fn from_parts(conn: Connection, bus: ChangeBus, path: &str) -> Self {
        Self {
            inner: Arc::new(Inner {
                conn: Mutex::new(conn),
                bus,
                path: path.to_string(),
            }),
        }
    }

    pub fn path(&self) -> &str {
        &self.inner.path
    }

    /// Run `f` against the connection, blocking until it is available.
    pub fn call<F, T>(&self, f: F) -> Result<T, RowputError>
    where
        F: FnOnce(&mut Connection) -> Result<T, rusqlite::Error>,
    {
        let mut conn = self
            .inner
            .conn
            .lock()
            .map_err(|_| RowputError::Storage {
                source: "database connection poisoned by a panicked writer".into(),
            })?;
        f(&mut conn).map_err(map_sql_err)
    }

    /// Start building a put operation against this database.
    pub fn put(&self) -> PutBuilder {
        PutBuilder::new(self.clone())
    }

    /// Publish `changes` to every change subscriber. Never blocks.
    pub fn notify_about_changes(&self, changes: Changes) {
        self.inner.bus.notify_changes(changes);
    }

    /// Subscribe to every change published through this database.
    pub fn observe_changes(&self) -> ChangeSubscription {
        self.inner.bus.subscribe()
    }

    /// Subscribe to changes touching at least one of `tables`.
    pub fn observe_changes_in_tables<I, S>(&self, tables: I) -> ChangeSubscription
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inner.bus.subscribe_to_tables(tables)
    }

    pub fn change_bus(&self) -> &ChangeBus {
        &self.inner.bus
    }

    /// Checkpoint the WAL so the database file is self-contained.
    pub fn close(&self) -> Result<(), RowputError> {
        self.call(|conn| conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(())))?;
        debug!(path = %self.inner.path, "WAL checkpoint complete");
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.inner.path)
            .field("bus", &self.inner.bus)
            .finish()
    }
}

fn apply_pragmas(conn: &Connection, config: &StorageConfig) -> Result<(), rusqlite::Error> {
    if config.wal_mode {
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
    }
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;
    Ok(())
}
