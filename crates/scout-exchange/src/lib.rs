// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asset resolution and specification extraction for an Exchange catalog.
//!
//! [`ExchangeEngine`] wires the components together:
//!
//! - [`SessionManager`] keeps the client-credentials session alive
//! - [`RegistrySearch`] queries the catalog
//! - [`AssetResolver`] resolves versions, details, and files
//! - [`SpecificationRetriever`] finds the interface specification
//! - [`ArchiveExtractor`] unpacks ZIP-packaged specifications
//! - [`analyzer`] summarizes OpenAPI documents into endpoints
//!
//! Lookups never surface errors. Exhausted fallbacks come back as `None` and
//! failed searches as an empty list, with the cause in the logs.

pub mod analyzer;
pub mod archive;
pub mod cascade;
pub mod client;
pub mod resolver;
pub mod retriever;
pub mod search;
pub mod session;
pub mod trace;

use std::sync::Arc;
use std::time::Duration;

use scout_config::ScoutConfig;
use scout_core::{
    AnalysisOutcome, AssetDetails, AssetFiles, AssetIdentity, AssetSummary, ScoutError,
    SpecificationResult,
};
use scout_security::build_secure_client;
use secrecy::SecretString;
use tracing::info;

pub use archive::ArchiveExtractor;
pub use client::ExchangeClient;
pub use resolver::AssetResolver;
pub use retriever::SpecificationRetriever;
pub use search::RegistrySearch;
pub use session::{ClientCredentialsProvider, Session, SessionManager};

/// Credentials required to talk to the catalog.
struct Credentials<'a> {
    organization_id: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn required_credentials(config: &ScoutConfig) -> Result<Credentials<'_>, ScoutError> {
    let exchange = &config.exchange;

    let mut missing = Vec::new();
    let organization_id = present(&exchange.organization_id);
    let client_id = present(&exchange.client_id);
    let client_secret = present(&exchange.client_secret);
    if organization_id.is_none() {
        missing.push("exchange.organization_id (or ORG_ID)");
    }
    if client_id.is_none() {
        missing.push("exchange.client_id (or CLIENT_ID)");
    }
    if client_secret.is_none() {
        missing.push("exchange.client_secret (or CLIENT_SECRET)");
    }

    match (organization_id, client_id, client_secret) {
        (Some(organization_id), Some(client_id), Some(client_secret)) => Ok(Credentials {
            organization_id,
            client_id,
            client_secret,
        }),
        _ => Err(ScoutError::Config(format!(
            "missing credentials: {}",
            missing.join(", ")
        ))),
    }
}

/// Entry point for every catalog operation.
#[derive(Clone)]
pub struct ExchangeEngine {
    client: ExchangeClient,
    search: RegistrySearch,
    resolver: AssetResolver,
    retriever: SpecificationRetriever,
    api_types: Vec<String>,
}

impl ExchangeEngine {
    /// Builds an engine that authenticates with the configured client credentials.
    pub fn from_config(config: &ScoutConfig) -> Result<Self, ScoutError> {
        let credentials = required_credentials(config)?;
        let http = build_secure_client(Duration::from_secs(config.exchange.request_timeout_secs))?;
        let provider = ClientCredentialsProvider::new(
            http.clone(),
            &config.exchange.base_url,
            credentials.client_id,
            SecretString::from(credentials.client_secret.to_string()),
        );
        let sessions = SessionManager::new(Arc::new(provider))
            .with_renewal_buffer(config.session.renewal_buffer_secs)
            .with_default_expires_in(config.session.default_expires_in_secs);
        Ok(Self::assemble(
            config,
            http,
            Arc::new(sessions),
            credentials.organization_id,
        ))
    }

    /// Builds an engine around an existing session manager.
    pub fn with_sessions(
        config: &ScoutConfig,
        http: reqwest::Client,
        sessions: Arc<SessionManager>,
    ) -> Result<Self, ScoutError> {
        let organization_id = present(&config.exchange.organization_id).ok_or_else(|| {
            ScoutError::Config("missing credentials: exchange.organization_id (or ORG_ID)".into())
        })?;
        Ok(Self::assemble(config, http, sessions, organization_id))
    }

    fn assemble(
        config: &ScoutConfig,
        http: reqwest::Client,
        sessions: Arc<SessionManager>,
        organization_id: &str,
    ) -> Self {
        let mut client =
            ExchangeClient::new(http, &config.exchange.base_url, organization_id, sessions);
        if let Some(secret) = &config.exchange.client_secret {
            client = client.with_known_secret(secret.clone());
        }

        let search = RegistrySearch::new(client.clone())
            .with_page_size(config.search.page_size)
            .with_snapshots(config.search.include_snapshots);
        let resolver = AssetResolver::new(client.clone(), search.clone());
        let retriever = SpecificationRetriever::new(
            client.clone(),
            resolver.clone(),
            ArchiveExtractor::new(client.clone()),
        );
        info!(base_url = %client.base_url(), organization_id, "exchange engine ready");

        Self {
            client,
            search,
            resolver,
            retriever,
            api_types: config.search.api_types.clone(),
        }
    }

    /// Establishes the initial session.
    pub async fn authenticate(&self) -> Result<Session, ScoutError> {
        self.client.sessions().authenticate().await
    }

    pub fn sessions(&self) -> &Arc<SessionManager> {
        self.client.sessions()
    }

    /// Free-text search, restricted to `types` when non-empty.
    pub async fn search<S: AsRef<str>>(&self, term: &str, types: &[S]) -> Vec<AssetSummary> {
        self.search.search(term, types).await
    }

    /// API assets mentioning `category` in their name, description, or tags.
    pub async fn find_by_category(&self, category: &str) -> Vec<AssetSummary> {
        self.search.find_by_category(category, &self.api_types).await
    }

    pub async fn list_apis(&self) -> Vec<AssetSummary> {
        self.search.list_apis(&self.api_types).await
    }

    pub async fn list_connectors(&self) -> Vec<AssetSummary> {
        self.search.list_connectors().await
    }

    pub async fn asset_details(&self, identity: &AssetIdentity) -> Option<AssetDetails> {
        self.resolver.resolve_details(identity).await
    }

    pub async fn list_files(&self, identity: &AssetIdentity) -> Option<AssetFiles> {
        self.resolver.list_files(identity).await
    }

    pub async fn file_content(&self, identity: &AssetIdentity, file_path: &str) -> Option<String> {
        self.resolver.file_content(identity, file_path).await
    }

    pub async fn specification(&self, identity: &AssetIdentity) -> Option<SpecificationResult> {
        self.retriever.get_specification(identity).await
    }

    /// Retrieves and analyzes the specification of `identity`.
    ///
    /// `None` means no specification could be retrieved at all.
    pub async fn analyze_endpoints(&self, identity: &AssetIdentity) -> Option<AnalysisOutcome> {
        let spec = self.specification(identity).await?;
        Some(analyzer::analyze(&spec))
    }
}
