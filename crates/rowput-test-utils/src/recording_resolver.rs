// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Put resolver wrapper that records calls and injects failures.

use std::sync::{Arc, Mutex, PoisonError};

use rowput_core::{PutResult, RowputError};
use rowput_storage::{Database, PutResolver};

/// One call made on a [`RecordingPutResolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverCall {
    PerformPut,
    AfterPut,
}

/// Delegates to an inner resolver while recording every call.
///
/// Failures queued with [`fail_next_perform`](Self::fail_next_perform) or
/// [`fail_next_after_put`](Self::fail_next_after_put) are returned instead of
/// calling the inner resolver, once each.
pub struct RecordingPutResolver<T> {
    inner: Arc<dyn PutResolver<T>>,
    calls: Mutex<Vec<ResolverCall>>,
    perform_failure: Mutex<Option<RowputError>>,
    after_put_failure: Mutex<Option<RowputError>>,
}

impl<T> RecordingPutResolver<T> {
    pub fn wrapping(inner: Arc<dyn PutResolver<T>>) -> Self {
        Self {
            inner,
            calls: Mutex::new(Vec::new()),
            perform_failure: Mutex::new(None),
            after_put_failure: Mutex::new(None),
        }
    }

    pub fn fail_next_perform(&self, error: RowputError) {
        *lock(&self.perform_failure) = Some(error);
    }

    pub fn fail_next_after_put(&self, error: RowputError) {
        *lock(&self.after_put_failure) = Some(error);
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<ResolverCall> {
        lock(&self.calls).clone()
    }

    pub fn perform_count(&self) -> usize {
        self.count(ResolverCall::PerformPut)
    }

    pub fn after_put_count(&self) -> usize {
        self.count(ResolverCall::AfterPut)
    }

    fn count(&self, call: ResolverCall) -> usize {
        lock(&self.calls).iter().filter(|c| **c == call).count()
    }
}

impl<T> PutResolver<T> for RecordingPutResolver<T> {
    fn perform_put(&self, db: &Database, object: &T) -> Result<PutResult, RowputError> {
        lock(&self.calls).push(ResolverCall::PerformPut);
        if let Some(error) = lock(&self.perform_failure).take() {
            return Err(error);
        }
        self.inner.perform_put(db, object)
    }

    fn after_put(&self, object: &T, result: &PutResult) -> Result<(), RowputError> {
        lock(&self.calls).push(ResolverCall::AfterPut);
        if let Some(error) = lock(&self.after_put_failure).take() {
            return Err(error);
        }
        self.inner.after_put(object, result)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use rowput_core::ContentValues;
    use rowput_storage::DefaultPutResolver;

    use super::*;

    fn resolver() -> RecordingPutResolver<ContentValues> {
        RecordingPutResolver::wrapping(Arc::new(DefaultPutResolver::for_content_values("t")))
    }

    #[test]
    fn records_calls_in_order() {
        let db = Database::open_in_memory().unwrap();
        db.call(|conn| conn.execute_batch("CREATE TABLE t (_id INTEGER PRIMARY KEY, v TEXT);"))
            .unwrap();
        let resolver = resolver();
        let values = ContentValues::new().with("v", "x");

        let result = resolver.perform_put(&db, &values).unwrap();
        resolver.after_put(&values, &result).unwrap();

        assert_eq!(
            resolver.calls(),
            vec![ResolverCall::PerformPut, ResolverCall::AfterPut]
        );
    }

    #[test]
    fn queued_failure_is_returned_once() {
        let db = Database::open_in_memory().unwrap();
        let resolver = resolver();
        resolver.fail_next_perform(RowputError::Internal("boom".into()));

        let err = resolver
            .perform_put(&db, &ContentValues::new())
            .unwrap_err();
        assert!(matches!(err, RowputError::Internal(_)));
        // Table `t` does not exist, so the delegated call fails in storage instead.
        let err = resolver
            .perform_put(&db, &ContentValues::new())
            .unwrap_err();
        assert!(matches!(err, RowputError::Storage { .. }));
        assert_eq!(resolver.perform_count(), 2);
    }
}
