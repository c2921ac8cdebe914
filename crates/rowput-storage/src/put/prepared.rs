// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prepared single-record put operations.

use std::sync::Arc;

use rowput_core::{Changes, PutResult, RowputError};
use tracing::debug;

use crate::database::Database;
use crate::put::deferred::DeferredPut;
use crate::put::resolver::PutResolver;

/// Accumulates the resolver for a put of one record.
///
/// The database and record are fixed when the builder is created; the
/// resolver is checked only in [`prepare`](Self::prepare).
pub struct PreparedPutBuilder<T> {
    db: Database,
    object: Arc<T>,
    resolver: Option<Arc<dyn PutResolver<T>>>,
}

impl<T> PreparedPutBuilder<T> {
    pub(crate) fn new(db: Database, object: Arc<T>) -> Self {
        Self {
            db,
            object,
            resolver: None,
        }
    }

    /// Required: the resolver that performs the write. Replaces any earlier one.
    pub fn with_put_resolver(mut self, resolver: Arc<dyn PutResolver<T>>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Finish configuration.
    ///
    /// Fails with [`RowputError::Config`] when no resolver was given. Nothing
    /// touches the database here.
    pub fn prepare(self) -> Result<PreparedPut<T>, RowputError> {
        let resolver = self.resolver.ok_or_else(|| {
            RowputError::Config("please specify a put resolver before prepare()".to_string())
        })?;
        Ok(PreparedPut {
            db: self.db,
            object: self.object,
            resolver,
        })
    }
}

/// A fully configured put of one record.
///
/// Holds no state between executions: every call to
/// [`execute_blocking`](Self::execute_blocking) writes again.
pub struct PreparedPut<T> {
    db: Database,
    object: Arc<T>,
    resolver: Arc<dyn PutResolver<T>>,
}

impl<T> Clone for PreparedPut<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            object: Arc::clone(&self.object),
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl<T> PreparedPut<T> {
    pub fn object(&self) -> &T {
        &self.object
    }

    /// Write the record on the calling thread.
    ///
    /// Runs the resolver's write, then its post-write hook, then publishes
    /// the affected table to the change bus, stopping at the first error.
    /// Errors from the resolver are returned unchanged; no change
    /// notification is sent unless both resolver steps succeed.
    pub fn execute_blocking(&self) -> Result<PutResult, RowputError> {
        let result = self.resolver.perform_put(&self.db, &self.object)?;
        self.resolver.after_put(&self.object, &result)?;

        self.db.notify_about_changes(Changes::from(&result));
        debug!(
            table = result.affected_table(),
            kind = %result.kind(),
            "put executed"
        );
        Ok(result)
    }
}

impl<T: Send + Sync + 'static> PreparedPut<T> {
    /// Wrap this put in a deferred producer driven by the current tokio runtime.
    ///
    /// Fails with [`RowputError::MissingCapability`] when called outside a
    /// tokio runtime. Nothing is written until the producer is subscribed to.
    pub fn create_deferred(&self) -> Result<DeferredPut<T>, RowputError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            RowputError::MissingCapability {
                operation: "create_deferred()",
                capability: "a tokio runtime",
            }
        })?;
        Ok(DeferredPut::new(self.clone(), runtime))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rowput_core::ContentValues;
    use tracing_test::traced_test;

    use super::*;

    /// Resolver that records calls and fails on demand.
    pub(crate) struct ScriptedResolver {
        pub perform_calls: AtomicUsize,
        pub after_calls: AtomicUsize,
        pub fail_perform: bool,
        pub fail_after: bool,
        pub next_id: Mutex<i64>,
    }

    impl ScriptedResolver {
        pub(crate) fn new() -> Self {
            Self {
                perform_calls: AtomicUsize::new(0),
                after_calls: AtomicUsize::new(0),
                fail_perform: false,
                fail_after: false,
                next_id: Mutex::new(7),
            }
        }
    }

    impl PutResolver<ContentValues> for ScriptedResolver {
        fn perform_put(
            &self,
            _db: &Database,
            _object: &ContentValues,
        ) -> Result<PutResult, RowputError> {
            self.perform_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_perform {
                return Err(RowputError::Storage {
                    source: "UNIQUE constraint failed: users.name".into(),
                });
            }
            let mut id = self.next_id.lock().unwrap();
            let result = PutResult::new_insert_result(*id, "users");
            *id += 1;
            result
        }

        fn after_put(&self, _object: &ContentValues, _result: &PutResult) -> Result<(), RowputError> {
            self.after_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_after {
                return Err(RowputError::Resolver {
                    message: "could not write id back".into(),
                    source: None,
                });
            }
            Ok(())
        }
    }

    fn prepare(db: &Database, resolver: &Arc<ScriptedResolver>) -> PreparedPut<ContentValues> {
        db.put()
            .content_values(ContentValues::new().with("name", "Ada"))
            .with_put_resolver(resolver.clone())
            .prepare()
            .unwrap()
    }

    #[test]
    fn execute_runs_each_step_once_and_notifies() {
        let db = Database::open_in_memory().unwrap();
        let mut changes = db.observe_changes();
        let resolver = Arc::new(ScriptedResolver::new());

        let result = prepare(&db, &resolver).execute_blocking().unwrap();

        assert_eq!(result, PutResult::new_insert_result(7, "users").unwrap());
        assert_eq!(resolver.perform_calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.after_calls.load(Ordering::SeqCst), 1);
        assert_eq!(changes.try_recv(), Some(Changes::new_instance("users").unwrap()));
        assert_eq!(changes.try_recv(), None);
    }

    #[test]
    #[traced_test]
    fn successful_put_is_logged() {
        let db = Database::open_in_memory().unwrap();
        let resolver = Arc::new(ScriptedResolver::new());
        prepare(&db, &resolver).execute_blocking().unwrap();
        assert!(logs_contain("put executed"));
    }

    #[test]
    fn perform_failure_skips_hook_and_notification() {
        let db = Database::open_in_memory().unwrap();
        let mut changes = db.observe_changes();
        let resolver = Arc::new(ScriptedResolver {
            fail_perform: true,
            ..ScriptedResolver::new()
        });

        let err = prepare(&db, &resolver).execute_blocking().unwrap_err();

        assert!(err.to_string().contains("UNIQUE constraint failed"));
        assert_eq!(resolver.after_calls.load(Ordering::SeqCst), 0);
        assert_eq!(changes.try_recv(), None);
        assert_eq!(db.change_bus().changes_published(), 0);
    }

    #[test]
    fn hook_failure_suppresses_notification() {
        let db = Database::open_in_memory().unwrap();
        let mut changes = db.observe_changes();
        let resolver = Arc::new(ScriptedResolver {
            fail_after: true,
            ..ScriptedResolver::new()
        });

        let err = prepare(&db, &resolver).execute_blocking().unwrap_err();

        assert!(matches!(err, RowputError::Resolver { .. }));
        assert_eq!(resolver.perform_calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.after_calls.load(Ordering::SeqCst), 1);
        assert_eq!(changes.try_recv(), None);
    }

    #[test]
    fn prepare_without_resolver_is_a_config_error() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .put()
            .content_values(ContentValues::new().with("name", "Ada"))
            .prepare()
            .err()
            .unwrap();
        assert!(matches!(err, RowputError::Config(_)));
    }

    #[test]
    fn later_resolver_replaces_earlier_one() {
        let db = Database::open_in_memory().unwrap();
        let first = Arc::new(ScriptedResolver::new());
        let second = Arc::new(ScriptedResolver::new());

        db.put()
            .content_values(ContentValues::new())
            .with_put_resolver(first.clone())
            .with_put_resolver(second.clone())
            .prepare()
            .unwrap()
            .execute_blocking()
            .unwrap();

        assert_eq!(first.perform_calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.perform_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn repeated_execution_writes_again() {
        let db = Database::open_in_memory().unwrap();
        let resolver = Arc::new(ScriptedResolver::new());
        let put = prepare(&db, &resolver);

        let first = put.execute_blocking().unwrap();
        let second = put.execute_blocking().unwrap();

        assert_eq!(first.inserted_id(), Some(7));
        assert_eq!(second.inserted_id(), Some(8));
        assert_eq!(resolver.perform_calls.load(Ordering::SeqCst), 2);
        assert_eq!(db.change_bus().changes_published(), 2);
    }

    #[test]
    fn create_deferred_outside_runtime_fails_fast() {
        let db = Database::open_in_memory().unwrap();
        let resolver = Arc::new(ScriptedResolver::new());

        let err = prepare(&db, &resolver).create_deferred().err().unwrap();

        assert!(matches!(err, RowputError::MissingCapability { .. }));
        assert_eq!(resolver.perform_calls.load(Ordering::SeqCst), 0);
    }
}
