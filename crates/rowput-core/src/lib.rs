// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for rowput.
//!
//! This crate provides the types shared by every other rowput crate: the
//! error enum, untyped record values, the outcome of a put and the change
//! event published after it.

pub mod changes;
pub mod error;
pub mod put_result;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use changes::Changes;
pub use error::RowputError;
pub use put_result::{PutKind, PutResult};
pub use types::{ContentValues, Value};
