// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for rowput.

use thiserror::Error;

/// The error type shared by every rowput crate.
///
/// Put operations never wrap or reinterpret errors raised by a resolver:
/// whatever a resolver returns is handed back to the caller as-is.
#[derive(Debug, Error)]
pub enum RowputError {
    /// Configuration errors (missing resolver, invalid config values).
    #[error("configuration error: {0}")]
    Config(String),

    /// An optional runtime capability required by an entry point is not available.
    #[error("`{operation}` requires {capability}, which is not available in this environment")]
    MissingCapability {
        operation: &'static str,
        capability: &'static str,
    },

    /// Storage backend errors (connection, SQL execution, constraint violation).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Errors raised by a put resolver outside of the storage backend.
    #[error("resolver error: {message}")]
    Resolver {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RowputError {
    /// Returns `true` for errors raised before any storage access happened.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::MissingCapability { .. })
    }
}
