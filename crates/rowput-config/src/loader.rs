// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./rowput.toml` > `~/.config/rowput/rowput.toml` > `/etc/rowput/rowput.toml`,
//! with `ROWPUT_` environment variables overriding every file.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use tracing::debug;

use crate::model::RowputConfig;

const SYSTEM_CONFIG: &str = "/etc/rowput/rowput.toml";
const LOCAL_CONFIG: &str = "rowput.toml";

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/rowput/rowput.toml`
/// 3. `~/.config/rowput/rowput.toml`
/// 4. `./rowput.toml`
/// 5. `ROWPUT_*` environment variables
pub fn load_config() -> Result<RowputConfig, figment::Error> {
    let config: RowputConfig = build_figment().extract()?;
    debug!(database_path = %config.storage.database_path, "configuration loaded");
    Ok(config)
}

/// Load configuration from a TOML string layered over the defaults only.
pub fn load_config_from_str(toml_content: &str) -> Result<RowputConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RowputConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RowputConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RowputConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RowputConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG))
        .merge(env_provider())
}

/// Config file locations in lookup order, most specific first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    paths.extend(user_config_path());
    paths.push(PathBuf::from(SYSTEM_CONFIG));
    paths
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rowput/rowput.toml"))
}

/// Env provider with an explicit section mapping.
///
/// `Env::split("_")` would turn `ROWPUT_STORAGE_DATABASE_PATH` into
/// `storage.database.path`; only the first underscore after the section
/// name is a separator.
fn env_provider() -> Env {
    Env::prefixed("ROWPUT_").map(|key| {
        let mapped = key
            .as_str()
            .replacen("storage_", "storage.", 1)
            .replacen("bus_", "bus.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}
