// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Change events published after successful writes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::RowputError;
use crate::put_result::PutResult;

/// The set of tables affected by one logical write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changes {
    affected_tables: BTreeSet<String>,
}

impl Changes {
    /// Changes affecting a single table.
    pub fn new_instance(table: impl Into<String>) -> Result<Self, RowputError> {
        Self::for_tables([table])
    }

    /// Changes affecting every table in `tables`. At least one is required.
    pub fn for_tables<I, S>(tables: I) -> Result<Self, RowputError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let affected_tables: BTreeSet<String> = tables.into_iter().map(Into::into).collect();
        if affected_tables.is_empty() || affected_tables.iter().any(|t| t.trim().is_empty()) {
            return Err(RowputError::Config(
                "changes must name at least one non-empty table".to_string(),
            ));
        }
        Ok(Self { affected_tables })
    }

    pub fn affected_tables(&self) -> &BTreeSet<String> {
        &self.affected_tables
    }

    pub fn affects(&self, table: &str) -> bool {
        self.affected_tables.contains(table)
    }
}

impl From<&PutResult> for Changes {
    /// Changes naming the table a completed put wrote to.
    fn from(result: &PutResult) -> Self {
        Self {
            affected_tables: BTreeSet::from([result.affected_table().to_string()]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_table_changes() {
        let changes = Changes::new_instance("users").unwrap();
        assert!(changes.affects("users"));
        assert!(!changes.affects("posts"));
        assert_eq!(changes.affected_tables().len(), 1);
    }

    #[test]
    fn duplicate_tables_collapse() {
        let changes = Changes::for_tables(["users", "posts", "users"]).unwrap();
        assert_eq!(changes.affected_tables().len(), 2);
    }

    #[test]
    fn from_put_result_names_affected_table() {
        let result = PutResult::new_update_result(2, "posts").unwrap();
        let changes = Changes::from(&result);
        assert_eq!(changes, Changes::new_instance("posts").unwrap());
    }

    #[test]
    fn empty_table_set_is_rejected() {
        assert!(Changes::for_tables(Vec::<String>::new()).is_err());
        assert!(Changes::new_instance("").is_err());
    }
}
