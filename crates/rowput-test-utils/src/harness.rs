// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness with a temporary on-disk database.
//!
//! `TestHarness` opens a SQLite file in a temp directory with a `users`
//! table (`id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE`) already created.

use rowput_bus::ChangeSubscription;
use rowput_config::RowputConfig;
use rowput_core::RowputError;
use rowput_storage::Database;
use tracing::debug;

const USERS_SCHEMA: &str =
    "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);";

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    database_name: String,
    bus_capacity: Option<usize>,
    seeded_users: usize,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            database_name: "users_db".to_string(),
            bus_capacity: None,
            seeded_users: 0,
        }
    }

    /// File name of the database inside the temp directory.
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = Some(capacity);
        self
    }

    /// Insert `count` placeholder users so the next generated id is `count + 1`.
    pub fn with_seeded_users(mut self, count: usize) -> Self {
        self.seeded_users = count;
        self
    }

    pub fn build(self) -> Result<TestHarness, RowputError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| RowputError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join(&self.database_name);

        let mut config = RowputConfig::default();
        config.storage.database_path = db_path.to_string_lossy().into_owned();
        if let Some(capacity) = self.bus_capacity {
            config.bus.capacity = capacity;
        }

        let db = Database::from_config(&config)?;
        let seeded = self.seeded_users;
        db.call(move |conn| {
            conn.execute_batch(USERS_SCHEMA)?;
            for i in 1..=seeded {
                conn.execute("INSERT INTO users (name) VALUES (?1)", [format!("seed-{i}")])?;
            }
            Ok(())
        })?;
        debug!(path = %config.storage.database_path, seeded, "test harness ready");

        Ok(TestHarness {
            db,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// Temporary database plus the configuration it was opened with.
pub struct TestHarness {
    pub db: Database,
    pub config: RowputConfig,
    /// Kept alive so the database file survives until the harness is dropped.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Subscribe to every change published through the harness database.
    pub fn subscribe(&self) -> ChangeSubscription {
        self.db.observe_changes()
    }

    pub fn user_count(&self) -> Result<i64, RowputError> {
        self.db
            .call(|conn| conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0)))
    }

    pub fn user_name(&self, id: i64) -> Result<Option<String>, RowputError> {
        self.db.call(move |conn| {
            let mut stmt = conn.prepare("SELECT name FROM users WHERE id = ?1")?;
            let mut names = stmt.query_map([id], |row| row.get::<_, String>(0))?;
            names.next().transpose()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_creates_users_table() {
        let harness = TestHarness::builder().build().unwrap();
        assert_eq!(harness.user_count().unwrap(), 0);
        assert!(harness.config.storage.database_path.ends_with("users_db"));
    }

    #[test]
    fn seeded_users_advance_row_ids() {
        let harness = TestHarness::builder().with_seeded_users(6).build().unwrap();
        assert_eq!(harness.user_count().unwrap(), 6);
        assert_eq!(harness.user_name(6).unwrap().as_deref(), Some("seed-6"));
        assert_eq!(harness.user_name(7).unwrap(), None);
    }

    #[tokio::test]
    async fn subscription_sees_published_changes() {
        let harness = TestHarness::builder().build().unwrap();
        let mut changes = harness.subscribe();
        harness
            .db
            .notify_about_changes(rowput_core::Changes::new_instance("users").unwrap());
        let received = changes.recv().await.unwrap();
        assert!(received.affects("users"));
    }
}
