// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OAuth2 client-credentials session management.
//!
//! [`SessionManager`] owns the only mutable state in the engine: the current
//! access token and its computed expiry. Renewal is single-flight. The state
//! lock is held across the token request, so concurrent callers that find the
//! session stale wait for the one renewal in progress and then observe its
//! result instead of issuing their own.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use scout_core::{Clock, ScoutError, SystemClock, TokenGrant, TokenProvider};
use scout_security::mask_secret;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::trace::RequestTrace;

/// Path of the token endpoint, relative to the platform base URL.
pub const TOKEN_PATH: &str = "accounts/api/v2/oauth2/token";

/// Lifetime assumed when the identity provider omits `expires_in`.
pub const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

/// Safety margin subtracted from the declared lifetime.
pub const DEFAULT_RENEWAL_BUFFER_SECS: u64 = 300;

/// Longest lifetime honored for a token, whatever the provider declares.
pub const MAX_EXPIRES_IN_SECS: i64 = 365 * 24 * 60 * 60;

fn clamped_seconds(secs: u64) -> Duration {
    let secs = i64::try_from(secs)
        .unwrap_or(i64::MAX)
        .min(MAX_EXPIRES_IN_SECS);
    Duration::try_seconds(secs).unwrap_or_default()
}

/// An access token and the instant after which it must be renewed.
///
/// `expires_at` is always set together with the token.
#[derive(Default)]
pub struct Session {
    token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Whether the token can be used at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.token, self.expires_at) {
            (Some(_), Some(expires_at)) => now < expires_at,
            _ => false,
        }
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Value for the `Authorization` header.
    pub(crate) fn bearer(&self) -> Option<String> {
        self.token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
    }

    fn snapshot(&self) -> Self {
        Self {
            token: self
                .token
                .as_ref()
                .map(|token| SecretString::from(token.expose_secret().to_owned())),
            expires_at: self.expires_at,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Issues, caches, and renews the engine's access token.
pub struct SessionManager {
    provider: Arc<dyn TokenProvider>,
    clock: Arc<dyn Clock>,
    renewal_buffer: Duration,
    default_expires_in: u64,
    state: Mutex<Session>,
}

impl SessionManager {
    /// Creates a manager with no session, using the system clock and default timings.
    pub fn new(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider,
            clock: Arc::new(SystemClock),
            renewal_buffer: clamped_seconds(DEFAULT_RENEWAL_BUFFER_SECS),
            default_expires_in: DEFAULT_EXPIRES_IN_SECS,
            state: Mutex::new(Session::default()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_renewal_buffer(mut self, secs: u64) -> Self {
        self.renewal_buffer = clamped_seconds(secs);
        self
    }

    pub fn with_default_expires_in(mut self, secs: u64) -> Self {
        self.default_expires_in = secs;
        self
    }

    /// Requests a fresh token unconditionally and stores it.
    ///
    /// On failure the previous session is left untouched.
    pub async fn authenticate(&self) -> Result<Session, ScoutError> {
        let mut state = self.state.lock().await;
        *state = self.renew().await?;
        Ok(state.snapshot())
    }

    /// Returns a usable session, renewing it first when absent or expired.
    pub async fn ensure_valid_session(&self) -> Result<Session, ScoutError> {
        let mut state = self.state.lock().await;
        if !state.is_valid_at(self.clock.now()) {
            debug!("session absent or expired, renewing");
            *state = self.renew().await?;
        }
        Ok(state.snapshot())
    }

    /// Snapshot of the current session without renewing.
    pub async fn current(&self) -> Session {
        self.state.lock().await.snapshot()
    }

    async fn renew(&self) -> Result<Session, ScoutError> {
        let grant = self.provider.request_token().await.inspect_err(|e| {
            error!(error = %e, "token request failed");
        })?;
        let expires_in = grant.expires_in.unwrap_or(self.default_expires_in);
        if expires_in == 0 {
            return Err(ScoutError::Authentication {
                message: "token endpoint issued an already expired token".into(),
                source: None,
            });
        }
        // Short-lived tokens keep at least half their lifetime usable.
        let lifetime = clamped_seconds(expires_in);
        let buffer = self.renewal_buffer.min(lifetime / 2);
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(lifetime - buffer)
            .ok_or_else(|| ScoutError::Authentication {
                message: format!("token lifetime of {expires_in}s is out of range"),
                source: None,
            })?;
        info!(expires_in, %expires_at, "session established");
        Ok(Session {
            token: Some(grant.access_token),
            expires_at: Some(expires_at),
        })
    }
}

/// Token provider that performs the client-credentials grant over HTTP.
pub struct ClientCredentialsProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
}

impl ClientCredentialsProvider {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: SecretString,
    ) -> Self {
        Self {
            http,
            token_url: format!("{}/{TOKEN_PATH}", base_url.trim_end_matches('/')),
            client_id: client_id.into(),
            client_secret,
        }
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }

    fn form_body(&self, client_secret: &str) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("client_id", &self.client_id)
            .append_pair("client_secret", client_secret)
            .append_pair("grant_type", "client_credentials")
            .finish()
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn request_token(&self) -> Result<TokenGrant, ScoutError> {
        let secret = self.client_secret.expose_secret();
        RequestTrace::new("POST", &self.token_url)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(self.form_body(&mask_secret(secret)))
            .emit(&[secret.to_owned()]);

        let response = self
            .http
            .post(&self.token_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, "application/json")
            .body(self.form_body(secret))
            .send()
            .await
            .map_err(|e| ScoutError::Authentication {
                message: format!("token endpoint unreachable: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScoutError::Authentication {
                message: format!("token endpoint returned HTTP {}: {body}", status.as_u16()),
                source: None,
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| ScoutError::Authentication {
                    message: format!("malformed token response: {e}"),
                    source: Some(Box::new(e)),
                })?;

        let access_token = token
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ScoutError::Authentication {
                message: "token response carried no access_token".into(),
                source: None,
            })?;

        Ok(TokenGrant {
            access_token: SecretString::from(access_token),
            expires_in: token.expires_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use chrono::TimeZone;
    use scout_test_utils::{CountingTokenProvider, FakeClock};
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn manager(provider: Arc<CountingTokenProvider>, clock: Arc<FakeClock>) -> SessionManager {
        SessionManager::new(provider).with_clock(clock)
    }

    #[tokio::test]
    async fn expiry_subtracts_renewal_buffer() {
        let clock = Arc::new(FakeClock::new(start()));
        let provider = Arc::new(CountingTokenProvider::new("tok-1").with_expires_in(Some(3600)));
        let session = manager(provider, clock).authenticate().await.unwrap();
        assert_eq!(session.expires_at(), Some(start() + Duration::seconds(3300)));
    }

    #[tokio::test]
    async fn oversized_lifetime_is_capped() {
        let clock = Arc::new(FakeClock::new(start()));
        for expires_in in [100_000_000_000_000_000, u64::MAX] {
            let provider =
                Arc::new(CountingTokenProvider::new("tok-1").with_expires_in(Some(expires_in)));
            let session = manager(provider, clock.clone())
                .ensure_valid_session()
                .await
                .unwrap();
            assert_eq!(
                session.expires_at(),
                Some(start() + Duration::seconds(MAX_EXPIRES_IN_SECS - 300))
            );
        }
    }

    #[test]
    fn oversized_renewal_buffer_is_capped() {
        let provider = Arc::new(CountingTokenProvider::new("tok-1"));
        let sessions = SessionManager::new(provider).with_renewal_buffer(u64::MAX);
        assert_eq!(
            sessions.renewal_buffer,
            Duration::seconds(MAX_EXPIRES_IN_SECS)
        );
    }

    #[tokio::test]
    async fn short_lifetime_shrinks_buffer() {
        let clock = Arc::new(FakeClock::new(start()));
        let provider = Arc::new(CountingTokenProvider::new("tok-1").with_expires_in(Some(120)));
        let sessions = manager(provider.clone(), clock.clone());

        for _ in 0..3 {
            let session = sessions.ensure_valid_session().await.unwrap();
            assert!(session.is_valid_at(clock.now()));
            assert_eq!(session.expires_at(), Some(start() + Duration::seconds(60)));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

        clock.advance(Duration::seconds(60));
        sessions.ensure_valid_session().await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_lifetime_is_rejected() {
        let clock = Arc::new(FakeClock::new(start()));
        let provider = Arc::new(CountingTokenProvider::new("tok-1").with_expires_in(Some(0)));
        let sessions = manager(provider, clock.clone());

        let err = sessions.ensure_valid_session().await.unwrap_err();
        assert!(matches!(err, ScoutError::Authentication { .. }));
        assert!(!sessions.current().await.is_valid_at(clock.now()));
    }

    #[tokio::test]
    async fn missing_expires_in_uses_default_lifetime() {
        let clock = Arc::new(FakeClock::new(start()));
        let provider = Arc::new(CountingTokenProvider::new("tok-1").with_expires_in(None));
        let session = manager(provider, clock).authenticate().await.unwrap();
        assert_eq!(session.expires_at(), Some(start() + Duration::seconds(3300)));
    }

    #[tokio::test]
    async fn valid_session_is_reused() {
        let clock = Arc::new(FakeClock::new(start()));
        let provider = Arc::new(CountingTokenProvider::new("tok-1"));
        let sessions = manager(provider.clone(), clock.clone());

        sessions.ensure_valid_session().await.unwrap();
        clock.advance(Duration::seconds(3000));
        sessions.ensure_valid_session().await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_session_renews_exactly_once() {
        let clock = Arc::new(FakeClock::new(start()));
        let provider = Arc::new(CountingTokenProvider::new("tok-1"));
        let sessions = manager(provider.clone(), clock.clone());

        sessions.ensure_valid_session().await.unwrap();
        clock.advance(Duration::seconds(3300));
        sessions.ensure_valid_session().await.unwrap();
        sessions.ensure_valid_session().await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_renewal() {
        let clock = Arc::new(FakeClock::new(start()));
        let provider = Arc::new(
            CountingTokenProvider::new("tok-1")
                .with_delay(std::time::Duration::from_millis(50)),
        );
        let sessions = manager(provider.clone(), clock);

        let (a, b, c) = tokio::join!(
            sessions.ensure_valid_session(),
            sessions.ensure_valid_session(),
            sessions.ensure_valid_session(),
        );

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        for session in [a, b, c] {
            let session = session.unwrap();
            assert_eq!(session.token().unwrap().expose_secret(), "tok-1");
        }
    }

    #[tokio::test]
    async fn failed_renewal_keeps_no_session() {
        let clock = Arc::new(FakeClock::new(start()));
        let provider = Arc::new(CountingTokenProvider::failing());
        let sessions = manager(provider, clock.clone());

        let err = sessions.ensure_valid_session().await.unwrap_err();
        assert!(matches!(err, ScoutError::Authentication { .. }));
        assert!(!sessions.current().await.is_valid_at(clock.now()));
    }

    #[test]
    fn session_debug_hides_token() {
        let session = Session {
            token: Some(SecretString::from("very-secret-token".to_string())),
            expires_at: None,
        };
        assert!(!format!("{session:?}").contains("very-secret-token"));
    }

    #[tokio::test]
    async fn client_credentials_grant_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts/api/v2/oauth2/token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=my-client"))
            .and(body_string_contains("client_secret=s3cr3t-value"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "issued-token",
                "expires_in": 1800,
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = ClientCredentialsProvider::new(
            reqwest::Client::new(),
            &server.uri(),
            "my-client",
            SecretString::from("s3cr3t-value".to_string()),
        );
        let grant = provider.request_token().await.unwrap();
        assert_eq!(grant.access_token.expose_secret(), "issued-token");
        assert_eq!(grant.expires_in, Some(1800));
    }

    #[tokio::test]
    async fn rejected_credentials_are_authentication_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts/api/v2/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let provider = ClientCredentialsProvider::new(
            reqwest::Client::new(),
            &server.uri(),
            "my-client",
            SecretString::from("wrong".to_string()),
        );
        let err = provider.request_token().await.unwrap_err();
        assert!(matches!(err, ScoutError::Authentication { .. }));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn token_response_without_access_token_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/accounts/api/v2/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"expires_in": 10})),
            )
            .mount(&server)
            .await;

        let provider = ClientCredentialsProvider::new(
            reqwest::Client::new(),
            &server.uri(),
            "my-client",
            SecretString::from("s3cr3t-value".to_string()),
        );
        assert!(provider.request_token().await.is_err());
    }
}
