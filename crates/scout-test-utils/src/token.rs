// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use scout_core::{ScoutError, TokenGrant, TokenProvider};
use secrecy::SecretString;

/// Token provider that hands out a fixed token and counts requests.
#[derive(Debug)]
pub struct CountingTokenProvider {
    token: Option<String>,
    expires_in: Option<u64>,
    delay: Option<Duration>,
    /// Number of `request_token` calls so far.
    pub calls: AtomicUsize,
}

impl CountingTokenProvider {
    /// Issues `token` with a one-hour lifetime.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            expires_in: Some(3600),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Rejects every request with an authentication error.
    pub fn failing() -> Self {
        Self {
            token: None,
            expires_in: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_expires_in(mut self, expires_in: Option<u64>) -> Self {
        self.expires_in = expires_in;
        self
    }

    /// Sleeps before answering, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for CountingTokenProvider {
    async fn request_token(&self) -> Result<TokenGrant, ScoutError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.token {
            Some(token) => Ok(TokenGrant {
                access_token: SecretString::from(token.clone()),
                expires_in: self.expires_in,
            }),
            None => Err(ScoutError::Authentication {
                message: "credentials rejected".into(),
                source: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counts_every_request() {
        let provider = CountingTokenProvider::new("abc");
        provider.request_token().await.unwrap();
        provider.request_token().await.unwrap();
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn failing_provider_rejects() {
        let provider = CountingTokenProvider::failing();
        assert!(provider.request_token().await.is_err());
        assert_eq!(provider.call_count(), 1);
    }
}
