// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog search and response-envelope normalization.
//!
//! The search endpoint has answered with several envelope shapes over time.
//! [`decode_envelope`] tries a fixed list of probes and falls back to
//! treating the whole body as a single record.

use scout_core::{AssetSummary, ScoutError};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::{ExchangeClient, read_json};

/// Path of the search endpoint, relative to the base URL.
pub const SEARCH_PATH: &str = "exchange/api/v2/assets";

/// Results returned by [`RegistrySearch::find_by_category`] when nothing matches the filter.
pub const CATEGORY_FALLBACK_LIMIT: usize = 5;

/// The shape a search response arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// A bare JSON array of records.
    Bare(Vec<Value>),
    /// An object carrying the records under `key`.
    Keyed { key: &'static str, items: Vec<Value> },
    /// Anything else, wrapped as a single record (or nothing, when empty).
    Unrecognized(Vec<Value>),
}

impl Envelope {
    pub fn into_items(self) -> Vec<Value> {
        match self {
            Self::Bare(items) | Self::Keyed { items, .. } | Self::Unrecognized(items) => items,
        }
    }
}

type Probe = fn(&mut Value) -> Option<Envelope>;

const PROBES: &[Probe] = &[probe_bare, probe_assets, probe_data, probe_items];

fn probe_bare(body: &mut Value) -> Option<Envelope> {
    match body {
        Value::Array(items) => Some(Envelope::Bare(std::mem::take(items))),
        _ => None,
    }
}

fn probe_assets(body: &mut Value) -> Option<Envelope> {
    probe_key(body, "assets")
}

fn probe_data(body: &mut Value) -> Option<Envelope> {
    probe_key(body, "data")
}

fn probe_items(body: &mut Value) -> Option<Envelope> {
    probe_key(body, "items")
}

fn probe_key(body: &mut Value, key: &'static str) -> Option<Envelope> {
    let items = match body.as_object_mut()?.remove(key)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            warn!(key, kind = value_kind(&other), "envelope member is not an array");
            Vec::new()
        }
    };
    Some(Envelope::Keyed { key, items })
}

/// Normalizes a search response body into a list of records.
pub fn decode_envelope(mut body: Value) -> Envelope {
    if let Some(envelope) = PROBES.iter().find_map(|probe| probe(&mut body)) {
        return envelope;
    }
    match body {
        Value::Object(map) if map.is_empty() => Envelope::Unrecognized(Vec::new()),
        Value::Object(map) => {
            let keys: Vec<&String> = map.keys().collect();
            warn!(?keys, "unrecognized search envelope, treating body as one record");
            Envelope::Unrecognized(vec![Value::Object(map)])
        }
        other => {
            warn!(kind = value_kind(&other), "unrecognized search envelope");
            Envelope::Unrecognized(Vec::new())
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Full-text search over the catalog.
#[derive(Clone)]
pub struct RegistrySearch {
    client: ExchangeClient,
    page_size: u32,
    include_snapshots: bool,
}

impl RegistrySearch {
    pub fn new(client: ExchangeClient) -> Self {
        Self {
            client,
            page_size: 50,
            include_snapshots: true,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_snapshots(mut self, include_snapshots: bool) -> Self {
        self.include_snapshots = include_snapshots;
        self
    }

    /// Searches for `term`, restricted to `types` when any are given.
    ///
    /// Never fails: transport and decoding failures are logged and yield an
    /// empty list, exactly as if nothing matched.
    pub async fn search<S: AsRef<str>>(&self, term: &str, types: &[S]) -> Vec<AssetSummary> {
        match self.try_search(term, types).await {
            Ok(results) => {
                info!(term, count = results.len(), "search completed");
                results
            }
            Err(e) => {
                warn!(term, error = %e, "search failed, returning no results");
                Vec::new()
            }
        }
    }

    /// Search request URL. Empty values are omitted; `types` repeats once per entry.
    pub fn search_url<S: AsRef<str>>(&self, term: &str, types: &[S]) -> Result<String, ScoutError> {
        let mut url = url::Url::parse(&self.client.endpoint(SEARCH_PATH))
            .map_err(|e| ScoutError::Config(format!("invalid base URL: {e}")))?;
        {
            let page_size = self.page_size.to_string();
            let include_snapshots = self.include_snapshots.to_string();
            let params = [
                ("search", term),
                ("organizationId", self.client.organization_id()),
                ("offset", "0"),
                ("limit", page_size.as_str()),
                ("includeSnapshots", include_snapshots.as_str()),
            ];
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                if !value.is_empty() {
                    query.append_pair(key, value);
                }
            }
            for asset_type in types {
                let asset_type = asset_type.as_ref().trim();
                if !asset_type.is_empty() {
                    query.append_pair("types", asset_type);
                }
            }
        }
        Ok(url.into())
    }

    async fn try_search<S: AsRef<str>>(
        &self,
        term: &str,
        types: &[S],
    ) -> Result<Vec<AssetSummary>, ScoutError> {
        let url = self.search_url(term, types)?;
        let body: Value = read_json(self.client.get_authorized(&url).await?).await?;
        let envelope = decode_envelope(body);
        if let Envelope::Keyed { key, .. } = &envelope {
            debug!(key, "search envelope");
        }
        Ok(envelope
            .into_items()
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<AssetSummary>(item) {
                Ok(summary) => Some(summary),
                Err(e) => {
                    debug!(error = %e, "skipping undecodable search record");
                    None
                }
            })
            .collect())
    }

    /// Searches by category keyword and keeps results that mention it.
    ///
    /// The keyword is matched case-insensitively against name, description,
    /// and tags. If the filter removes everything, the first
    /// [`CATEGORY_FALLBACK_LIMIT`] unfiltered results are returned instead.
    pub async fn find_by_category<S: AsRef<str>>(
        &self,
        category: &str,
        types: &[S],
    ) -> Vec<AssetSummary> {
        let keyword = category.trim().to_lowercase();
        let mut results = self.search(&keyword, types).await;
        let matching: Vec<AssetSummary> = results
            .iter()
            .filter(|summary| mentions(summary, &keyword))
            .cloned()
            .collect();
        if matching.is_empty() {
            results.truncate(CATEGORY_FALLBACK_LIMIT);
            results
        } else {
            matching
        }
    }

    /// Every asset of the given API types.
    pub async fn list_apis<S: AsRef<str>>(&self, api_types: &[S]) -> Vec<AssetSummary> {
        self.search("", api_types).await
    }

    /// Every connector asset.
    pub async fn list_connectors(&self) -> Vec<AssetSummary> {
        self.search("", &["connector"]).await
    }
}

fn mentions(summary: &AssetSummary, keyword: &str) -> bool {
    summary.name.to_lowercase().contains(keyword)
        || summary.description.to_lowercase().contains(keyword)
        || summary
            .tags
            .iter()
            .any(|tag| tag.to_lowercase().contains(keyword))
}
