// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation.
//!
//! Collects every failure instead of stopping at the first one.

use crate::diagnostic::ConfigError;
use crate::model::ScoutConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const MAX_PAGE_SIZE: u32 = 250;

/// Validate a deserialized configuration for semantic correctness.
pub fn validate_config(config: &ScoutConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    match url::Url::parse(config.exchange.base_url.trim()) {
        Ok(url) => {
            let host = url.host_str().unwrap_or_default();
            let local = matches!(host, "localhost" | "127.0.0.1" | "[::1]" | "::1");
            if url.scheme() != "https" && !local {
                fail(format!(
                    "exchange.base_url `{url}` must use https for remote hosts"
                ));
            }
        }
        Err(e) => fail(format!(
            "exchange.base_url `{}` is not a valid URL: {e}",
            config.exchange.base_url
        )),
    }

    if config.exchange.request_timeout_secs == 0 {
        fail("exchange.request_timeout_secs must be greater than 0".to_string());
    }

    if !(1..=MAX_PAGE_SIZE).contains(&config.search.page_size) {
        fail(format!(
            "search.page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
            config.search.page_size
        ));
    }

    for (name, types) in [
        ("search.default_types", &config.search.default_types),
        ("search.api_types", &config.search.api_types),
    ] {
        if types.iter().any(|t| t.trim().is_empty()) {
            fail(format!("{name} must not contain empty entries"));
        }
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &ScoutConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ScoutConfig::default()).is_ok());
    }

    #[test]
    fn plain_http_remote_base_url_fails() {
        let mut config = ScoutConfig::default();
        config.exchange.base_url = "http://anypoint.mulesoft.com".into();
        assert!(messages(&config).iter().any(|m| m.contains("must use https")));
    }

    #[test]
    fn plain_http_localhost_is_allowed() {
        let mut config = ScoutConfig::default();
        config.exchange.base_url = "http://127.0.0.1:8081".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_every_failure() {
        let mut config = ScoutConfig::default();
        config.exchange.base_url = "not a url".into();
        config.exchange.request_timeout_secs = 0;
        config.search.page_size = 0;
        config.search.default_types = vec!["rest-api".into(), " ".into()];
        config.logging.level = "loud".into();
        let errors = messages(&config);
        assert_eq!(errors.len(), 5, "got: {errors:?}");
    }
}
