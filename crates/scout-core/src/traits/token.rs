// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token provider trait for OAuth2 client-credentials grants.

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::ScoutError;

/// A freshly issued access token.
#[derive(Debug)]
pub struct TokenGrant {
    pub access_token: SecretString,
    /// Lifetime in seconds as declared by the identity provider.
    pub expires_in: Option<u64>,
}

/// Issues access tokens. One call performs exactly one token request.
#[async_trait]
pub trait TokenProvider: Send + Sync + 'static {
    /// Requests a new token, failing with [`ScoutError::Authentication`] on rejection.
    async fn request_token(&self) -> Result<TokenGrant, ScoutError>;
}
