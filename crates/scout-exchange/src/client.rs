// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared HTTP client for catalog requests.
//!
//! [`ExchangeClient`] attaches the session's bearer token, traces every
//! request in curl form, and turns anything other than HTTP 200 into a
//! [`ScoutError::Transport`] so fallback cascades can move on.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use scout_core::ScoutError;
use scout_security::validate_url;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::session::SessionManager;
use crate::trace::RequestTrace;

/// HTTP access to the catalog on behalf of one organization.
#[derive(Clone)]
pub struct ExchangeClient {
    http: reqwest::Client,
    base_url: String,
    organization_id: String,
    sessions: Arc<SessionManager>,
    known_secrets: Arc<Vec<String>>,
}

impl ExchangeClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        organization_id: impl Into<String>,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            organization_id: organization_id.into(),
            sessions,
            known_secrets: Arc::new(Vec::new()),
        }
    }

    /// Registers a value that must never appear in request traces.
    pub fn with_known_secret(mut self, secret: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.known_secrets).push(secret.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        &self.sessions
    }

    /// Absolute URL for a path below the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// GET with the session's bearer token, renewing the session if needed.
    pub async fn get_authorized(&self, url: &str) -> Result<reqwest::Response, ScoutError> {
        let session = self.sessions.ensure_valid_session().await?;
        let bearer = session.bearer().ok_or_else(|| {
            ScoutError::Internal("session reported valid without a token".into())
        })?;

        let mut known = self.known_secrets.to_vec();
        if let Some(token) = session.token() {
            known.push(token.expose_secret().to_owned());
        }
        RequestTrace::new("GET", url)
            .header("Authorization", bearer.clone())
            .header("Content-Type", "application/json")
            .emit(&known);

        let request = self
            .http
            .get(url)
            .header(AUTHORIZATION, bearer)
            .header(CONTENT_TYPE, "application/json");
        self.send(request, url).await
    }

    /// GET without credentials, for pre-signed external links.
    pub async fn get_public(&self, url: &str) -> Result<reqwest::Response, ScoutError> {
        validate_url(url)?;
        RequestTrace::new("GET", url).emit(&self.known_secrets);
        self.send(self.http.get(url), url).await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, ScoutError> {
        let response = request
            .send()
            .await
            .map_err(|e| ScoutError::transport(format!("GET {url} failed: {e}"), e))?;
        let status = response.status();
        debug!(status = %status, url, "response received");
        if status != StatusCode::OK {
            return Err(ScoutError::status(status.as_u16(), url));
        }
        Ok(response)
    }
}

/// Decodes a JSON body, reporting mismatches as unexpected shapes.
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ScoutError> {
    let url = response.url().to_string();
    let body = read_text(response).await?;
    serde_json::from_str(&body)
        .map_err(|e| ScoutError::UnexpectedResponseShape(format!("{url}: {e}")))
}

/// Reads a body as text.
pub async fn read_text(response: reqwest::Response) -> Result<String, ScoutError> {
    let url = response.url().to_string();
    response
        .text()
        .await
        .map_err(|e| ScoutError::transport(format!("reading body of {url} failed: {e}"), e))
}

#[cfg(test)]
mod tests {
    use scout_test_utils::CountingTokenProvider;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client(base_url: &str) -> ExchangeClient {
        let sessions = Arc::new(SessionManager::new(Arc::new(CountingTokenProvider::new(
            "test-access-token",
        ))));
        ExchangeClient::new(reqwest::Client::new(), base_url, "org-1", sessions)
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let client = client("https://anypoint.mulesoft.com/");
        assert_eq!(
            client.endpoint("/exchange/api/v2/assets"),
            "https://anypoint.mulesoft.com/exchange/api/v2/assets"
        );
    }

    #[tokio::test]
    async fn authorized_requests_carry_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/exchange/api/v2/assets"))
            .and(header("authorization", "Bearer test-access-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server.uri());
        let response = client
            .get_authorized(&client.endpoint("exchange/api/v2/assets"))
            .await
            .unwrap();
        let body: serde_json::Value = read_json(response).await.unwrap();
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn non_200_status_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client(&server.uri());
        let err = client
            .get_authorized(&client.endpoint("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(404));
    }

    #[tokio::test]
    async fn public_requests_omit_authorization() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/signed/spec.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let client = client(&server.uri());
        client
            .get_public(&client.endpoint("signed/spec.json"))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn decode_failures_are_shape_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client(&server.uri());
        let response = client.get_public(&client.endpoint("x")).await.unwrap();
        let err = read_json::<serde_json::Value>(response).await.unwrap_err();
        assert!(matches!(err, ScoutError::UnexpectedResponseShape(_)));
    }
}
