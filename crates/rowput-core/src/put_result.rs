// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outcome of a successful put operation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::RowputError;

/// Which kind of write a resolver ended up performing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PutKind {
    Insert,
    Update,
}

/// Immutable descriptor of a completed write.
///
/// There is no failure variant: a resolver that cannot write returns an
/// error instead of a `PutResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PutResult {
    kind: PutKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    inserted_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    number_of_rows_updated: Option<usize>,
    affected_table: String,
}

impl PutResult {
    /// Result of an insert that produced row id `inserted_id` in `table`.
    pub fn new_insert_result(
        inserted_id: i64,
        table: impl Into<String>,
    ) -> Result<Self, RowputError> {
        Ok(Self {
            kind: PutKind::Insert,
            inserted_id: Some(inserted_id),
            number_of_rows_updated: None,
            affected_table: checked_table(table.into())?,
        })
    }

    /// Result of an update that touched `rows` rows in `table`.
    pub fn new_update_result(rows: usize, table: impl Into<String>) -> Result<Self, RowputError> {
        Ok(Self {
            kind: PutKind::Update,
            inserted_id: None,
            number_of_rows_updated: Some(rows),
            affected_table: checked_table(table.into())?,
        })
    }

    pub fn kind(&self) -> PutKind {
        self.kind
    }

    pub fn affected_table(&self) -> &str {
        &self.affected_table
    }

    pub fn inserted_id(&self) -> Option<i64> {
        self.inserted_id
    }

    pub fn number_of_rows_updated(&self) -> Option<usize> {
        self.number_of_rows_updated
    }

    pub fn was_inserted(&self) -> bool {
        self.kind == PutKind::Insert
    }

    pub fn was_not_inserted(&self) -> bool {
        !self.was_inserted()
    }

    /// `true` only when an update touched at least one row.
    pub fn was_updated(&self) -> bool {
        self.number_of_rows_updated.is_some_and(|rows| rows > 0)
    }

    pub fn was_not_updated(&self) -> bool {
        !self.was_updated()
    }
}

fn checked_table(table: String) -> Result<String, RowputError> {
    if table.trim().is_empty() {
        return Err(RowputError::Config(
            "affected table name must not be empty".to_string(),
        ));
    }
    Ok(table)
}
