// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-record put operations.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use rowput_core::ContentValues;
//! use rowput_storage::{Database, DefaultPutResolver};
//!
//! # fn main() -> Result<(), rowput_core::RowputError> {
//! let db = Database::open_in_memory()?;
//! let result = db
//!     .put()
//!     .content_values(ContentValues::new().with("name", "Ada"))
//!     .with_put_resolver(Arc::new(DefaultPutResolver::for_content_values("users")))
//!     .prepare()?
//!     .execute_blocking()?;
//! println!("wrote to {}", result.affected_table());
//! # Ok(())
//! # }
//! ```

pub mod default_resolver;
pub mod deferred;
pub mod prepared;
pub mod resolver;

use std::sync::Arc;

use rowput_core::ContentValues;

use crate::database::Database;

pub use default_resolver::DefaultPutResolver;
pub use deferred::{DeferredPut, PutSubscription};
pub use prepared::{PreparedPut, PreparedPutBuilder};
pub use resolver::PutResolver;

/// Entry point returned by [`Database::put`]; picks the record to write.
pub struct PutBuilder {
    db: Database,
}

impl PutBuilder {
    pub(crate) fn new(db: Database) -> Self {
        Self { db }
    }

    /// Put a typed record.
    pub fn object<T>(self, object: T) -> PreparedPutBuilder<T> {
        PreparedPutBuilder::new(self.db, Arc::new(object))
    }

    /// Put a record the caller keeps a handle to, e.g. to read back a
    /// generated id after the write.
    pub fn shared_object<T>(self, object: Arc<T>) -> PreparedPutBuilder<T> {
        PreparedPutBuilder::new(self.db, object)
    }

    /// Put an untyped row.
    pub fn content_values(self, values: ContentValues) -> PreparedPutBuilder<ContentValues> {
        self.object(values)
    }
}
