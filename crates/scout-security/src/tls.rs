// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TLS enforcement for outbound HTTP connections.

use std::time::Duration;

use scout_core::ScoutError;
use tracing::error;

/// Build a reqwest client with TLS 1.2+ and the given request timeout.
pub fn build_secure_client(timeout: Duration) -> Result<reqwest::Client, ScoutError> {
    reqwest::Client::builder()
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .timeout(timeout)
        .build()
        .map_err(|e| {
            error!("failed to build secure HTTP client: {e}");
            ScoutError::Config(format!("failed to build secure HTTP client: {e}"))
        })
}

/// Validate an outbound URL: remote hosts must be reached over HTTPS.
///
/// Localhost URLs are allowed with any scheme.
pub fn validate_url(url: &str) -> Result<(), ScoutError> {
    let parsed =
        url::Url::parse(url).map_err(|e| ScoutError::Config(format!("invalid URL `{url}`: {e}")))?;

    if is_localhost(parsed.host_str().unwrap_or("")) {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        error!(url = %url, "TLS required for remote connections");
        return Err(ScoutError::Config(
            "TLS required for remote connections -- use HTTPS".to_string(),
        ));
    }

    Ok(())
}

/// Whether a host refers to the loopback interface.
pub fn is_localhost(host: &str) -> bool {
    matches!(host, "::1" | "localhost" | "[::1]") || host.starts_with("127.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_secure_client_succeeds() {
        assert!(build_secure_client(Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn allows_https_remote() {
        assert!(validate_url("https://exchange2-asset-manager.s3.amazonaws.com/oas.zip").is_ok());
    }

    #[test]
    fn blocks_http_remote() {
        let err = validate_url("http://anypoint.mulesoft.com/x").unwrap_err().to_string();
        assert!(err.contains("TLS required"));
    }

    #[test]
    fn allows_http_localhost() {
        assert!(validate_url("http://127.0.0.1:8080/spec.zip").is_ok());
        assert!(validate_url("http://localhost:3000/api").is_ok());
        assert!(validate_url("http://[::1]:8080/test").is_ok());
    }

    #[test]
    fn rejects_garbage() {
        assert!(validate_url("not a url").is_err());
    }

    #[test]
    fn is_localhost_rejects_non_loopback() {
        assert!(!is_localhost("10.0.0.1"));
        assert!(!is_localhost("anypoint.mulesoft.com"));
    }
}
