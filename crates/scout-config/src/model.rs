// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level scout configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScoutConfig {
    /// Registry endpoint and client credentials.
    #[serde(default)]
    pub exchange: ExchangeConfig,

    /// Access-token lifetime handling.
    #[serde(default)]
    pub session: SessionConfig,

    /// Catalog search defaults.
    #[serde(default)]
    pub search: SearchConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Registry endpoint and OAuth2 client credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExchangeConfig {
    /// Base URL of the API-management platform.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Organization that scopes every catalog search.
    #[serde(default)]
    pub organization_id: Option<String>,

    /// Connected-app client id.
    #[serde(default)]
    pub client_id: Option<String>,

    /// Connected-app client secret. Never logged unmasked.
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Timeout applied to every outbound request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            organization_id: None,
            client_id: None,
            client_secret: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://anypoint.mulesoft.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Token renewal settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Seconds subtracted from the declared token lifetime.
    #[serde(default = "default_renewal_buffer_secs")]
    pub renewal_buffer_secs: u64,

    /// Lifetime assumed when the token response omits `expires_in`.
    #[serde(default = "default_expires_in_secs")]
    pub default_expires_in_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            renewal_buffer_secs: default_renewal_buffer_secs(),
            default_expires_in_secs: default_expires_in_secs(),
        }
    }
}

fn default_renewal_buffer_secs() -> u64 {
    300
}

fn default_expires_in_secs() -> u64 {
    3600
}

/// Catalog search defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Page size sent as `limit`.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Whether snapshot versions are included.
    #[serde(default = "default_include_snapshots")]
    pub include_snapshots: bool,

    /// Type filters used when a caller does not name any.
    #[serde(default = "default_types")]
    pub default_types: Vec<String>,

    /// Type filters that define an "API" for category and resource listings.
    #[serde(default = "default_api_types")]
    pub api_types: Vec<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            include_snapshots: default_include_snapshots(),
            default_types: default_types(),
            api_types: default_api_types(),
        }
    }
}

fn default_page_size() -> u32 {
    50
}

fn default_include_snapshots() -> bool {
    true
}

fn default_types() -> Vec<String> {
    ["rest-api", "soap-api", "http-api", "api-group", "connector"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_api_types() -> Vec<String> {
    ["rest-api", "soap-api", "http-api"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level for scout's own targets (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
