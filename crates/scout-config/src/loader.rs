// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Lookup: `./scout.toml` > `~/.config/scout/scout.toml` > `/etc/scout/scout.toml`,
//! then the bare deployment variables (`ANYPOINT_URL`, `CLIENT_ID`, ...), then
//! `SCOUT_*` overrides.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ScoutConfig;

/// Deployment variables honored without the `SCOUT_` prefix, and their keys.
const LEGACY_ENV_KEYS: &[(&str, &str)] = &[
    ("anypoint_url", "exchange.base_url"),
    ("client_id", "exchange.client_id"),
    ("client_secret", "exchange.client_secret"),
    ("org_id", "exchange.organization_id"),
    ("log_level", "logging.level"),
];

/// Load configuration from the standard file hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/scout/scout.toml`
/// 3. `~/.config/scout/scout.toml`
/// 4. `./scout.toml`
/// 5. `ANYPOINT_URL`, `CLIENT_ID`, `CLIENT_SECRET`, `ORG_ID`, `LOG_LEVEL`
/// 6. `SCOUT_*` environment variables
pub fn load_config() -> Result<ScoutConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<ScoutConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ScoutConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ScoutConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ScoutConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ScoutConfig::default()))
        .merge(Toml::file("/etc/scout/scout.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("scout/scout.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("scout.toml"))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Maps the bare deployment variables onto their config keys.
pub(crate) fn legacy_env_provider() -> Env {
    let names: Vec<&str> = LEGACY_ENV_KEYS.iter().map(|(name, _)| *name).collect();
    Env::raw().only(&names).map(|key| {
        let lowered = key.as_str().to_ascii_lowercase();
        let mapped = LEGACY_ENV_KEYS
            .iter()
            .find(|(name, _)| *name == lowered)
            .map(|(_, target)| (*target).to_string())
            .unwrap_or(lowered);
        mapped.into()
    })
}

/// `SCOUT_*` provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names contain
/// underscores: `SCOUT_EXCHANGE_CLIENT_SECRET` must become
/// `exchange.client_secret`, not `exchange.client.secret`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("SCOUT_").map(|key| {
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("exchange_", "exchange.", 1)
            .replacen("session_", "session.", 1)
            .replacen("search_", "search.", 1)
            .replacen("logging_", "logging.", 1);
        mapped.into()
    })
}
