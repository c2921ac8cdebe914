// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed put pipeline for rowput.
//!
//! A put hands one record to a caller-supplied [`PutResolver`], which decides
//! between insert and update and performs the write. After the resolver's
//! post-write hook succeeds, the affected table is published on the
//! database's change bus so caches and live views can refresh.

pub mod database;
pub mod put;
pub mod sql;

pub use database::{Database, map_sql_err};
pub use put::{
    DefaultPutResolver, DeferredPut, PreparedPut, PreparedPutBuilder, PutBuilder, PutResolver,
    PutSubscription,
};
