// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The insert-or-update strategy supplied by callers.

use rowput_core::{PutResult, RowputError};

use crate::database::Database;

/// Decides whether a record becomes an insert or an update, and performs it.
///
/// One resolver may be shared by any number of put operations; the
/// operation only borrows it for the duration of a call.
pub trait PutResolver<T>: Send + Sync {
    /// Write `object` into `db` and describe what was written.
    ///
    /// Errors are returned to the caller of the put operation unchanged.
    fn perform_put(&self, db: &Database, object: &T) -> Result<PutResult, RowputError>;

    /// Post-write hook, run once after a successful [`perform_put`](Self::perform_put).
    ///
    /// Typical use is copying a generated row id back onto the record. If
    /// this fails the row stays written and no change notification is sent.
    fn after_put(&self, object: &T, result: &PutResult) -> Result<(), RowputError>;
}
