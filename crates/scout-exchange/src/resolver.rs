// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Asset resolution: versions, details, and declared files.
//!
//! Details come from the first detail endpoint that answers (see
//! [`DETAIL_ENDPOINTS`]), falling back to the matching search summary.

use scout_core::{AssetDetails, AssetFiles, AssetIdentity, FileDescriptor, FilesSource, ScoutError};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::cascade::{DETAIL_ENDPOINTS, FILES_ENDPOINT, first_success};
use crate::client::{ExchangeClient, read_json, read_text};
use crate::search::RegistrySearch;

/// Version assumed when nothing else identifies one.
pub const DEFAULT_VERSION: &str = "1.0.0";

const NO_TYPES: &[&str] = &[];

/// Files endpoint payloads: a bare list or an object with `files`.
#[derive(Deserialize)]
#[serde(untagged)]
enum FilesPayload {
    Bare(Vec<FileDescriptor>),
    Wrapped { files: Vec<FileDescriptor> },
}

impl From<FilesPayload> for Vec<FileDescriptor> {
    fn from(payload: FilesPayload) -> Self {
        match payload {
            FilesPayload::Bare(files) | FilesPayload::Wrapped { files } => files,
        }
    }
}

/// Resolves asset identities to details and files.
#[derive(Clone)]
pub struct AssetResolver {
    client: ExchangeClient,
    search: RegistrySearch,
}

impl AssetResolver {
    pub fn new(client: ExchangeClient, search: RegistrySearch) -> Self {
        Self { client, search }
    }

    /// Picks the version to query: the explicit one, else the version of the
    /// matching search hit, else the first hit's, else [`DEFAULT_VERSION`].
    pub async fn candidate_version(&self, identity: &AssetIdentity) -> String {
        if let Some(version) = &identity.version {
            return version.clone();
        }
        let results = self.search.search(&identity.asset_id, NO_TYPES).await;
        let exact = results
            .iter()
            .find(|summary| identity.matches(summary))
            .map(|summary| summary.version.as_str())
            .filter(|version| !version.is_empty());
        let first = results
            .first()
            .map(|summary| summary.version.as_str())
            .filter(|version| !version.is_empty());
        exact.or(first).unwrap_or(DEFAULT_VERSION).to_string()
    }

    /// Full details for `identity`, or `None` once every source is exhausted.
    pub async fn resolve_details(&self, identity: &AssetIdentity) -> Option<AssetDetails> {
        let version = self.candidate_version(identity).await;
        let urls = DETAIL_ENDPOINTS
            .iter()
            .map(|endpoint| endpoint.render(self.client.base_url(), identity, &version));

        if let Some(mut details) = first_success(urls, |url| self.fetch_details(url)).await {
            if details.summary.version.is_empty() {
                details.summary.version = version;
            }
            info!(asset = %identity, version = %details.summary.version, "asset details resolved");
            return Some(details);
        }

        info!(asset = %identity, "detail endpoints exhausted, falling back to search");
        let found = self
            .search
            .search(&identity.asset_id, NO_TYPES)
            .await
            .into_iter()
            .find(|summary| identity.matches(summary))
            .map(AssetDetails::from);
        if found.is_none() {
            warn!(asset = %identity, "asset not found");
        }
        found
    }

    /// The version to use for version-scoped lookups: explicit, else the
    /// resolved details' version, else [`DEFAULT_VERSION`].
    pub async fn effective_version(&self, identity: &AssetIdentity) -> String {
        if let Some(version) = &identity.version {
            return version.clone();
        }
        self.resolve_details(identity)
            .await
            .map(|details| details.summary.version)
            .filter(|version| !version.is_empty())
            .unwrap_or_else(|| DEFAULT_VERSION.to_string())
    }

    /// The files declared on an asset version.
    ///
    /// Uses the `files` of the resolved details when non-empty, otherwise the
    /// dedicated files endpoint.
    pub async fn list_files(&self, identity: &AssetIdentity) -> Option<AssetFiles> {
        let version = self.effective_version(identity).await;
        let pinned = identity.pinned(&version);

        if let Some(details) = self.resolve_details(&pinned).await
            && !details.files.is_empty()
        {
            return Some(AssetFiles {
                files: details.files,
                source: FilesSource::AssetDetails,
            });
        }

        let url = FILES_ENDPOINT.render(self.client.base_url(), identity, &version);
        match self.fetch_files(&url).await {
            Ok(files) => Some(AssetFiles {
                files,
                source: FilesSource::FilesEndpoint,
            }),
            Err(e) => {
                warn!(asset = %pinned, error = %e, "files listing unavailable");
                None
            }
        }
    }

    /// Text of one file below an asset version's files endpoint.
    pub async fn file_content(&self, identity: &AssetIdentity, file_path: &str) -> Option<String> {
        let version = self.effective_version(identity).await;
        let url = format!(
            "{}/{}",
            FILES_ENDPOINT.render(self.client.base_url(), identity, &version),
            file_path.trim_start_matches('/')
        );
        let fetched = match self.client.get_authorized(&url).await {
            Ok(response) => read_text(response).await,
            Err(e) => Err(e),
        };
        fetched
            .inspect_err(|e| warn!(asset = %identity, file_path, error = %e, "file unavailable"))
            .ok()
    }

    async fn fetch_details(&self, url: String) -> Result<AssetDetails, ScoutError> {
        let details: AssetDetails = read_json(self.client.get_authorized(&url).await?).await?;
        debug!(url, files = details.files.len(), "detail endpoint answered");
        Ok(details)
    }

    async fn fetch_files(&self, url: &str) -> Result<Vec<FileDescriptor>, ScoutError> {
        let payload: FilesPayload = read_json(self.client.get_authorized(url).await?).await?;
        Ok(payload.into())
    }
}
