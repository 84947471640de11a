// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered fallback over candidate sources.
//!
//! Endpoint orders live in data tables ([`DETAIL_ENDPOINTS`],
//! [`LEGACY_SPEC_ENDPOINTS`]) and are walked by [`first_success`], which
//! stops at the first candidate that yields a value.

use std::fmt;
use std::future::Future;

use scout_core::{AssetIdentity, ScoutError};
use tracing::debug;

/// Which generation of the catalog API an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiSurface {
    V1,
    V2,
}

impl fmt::Display for ApiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        })
    }
}

/// An asset endpoint: a surface plus a path template below `assets/`.
///
/// Templates use `{group}`, `{asset}`, and `{version}` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointTemplate {
    pub surface: ApiSurface,
    pub template: &'static str,
}

impl EndpointTemplate {
    const fn new(surface: ApiSurface, template: &'static str) -> Self {
        Self { surface, template }
    }

    /// Absolute URL for `identity` at `version`.
    pub fn render(&self, base_url: &str, identity: &AssetIdentity, version: &str) -> String {
        let path = self
            .template
            .replace("{group}", &identity.group_id)
            .replace("{asset}", &identity.asset_id)
            .replace("{version}", version);
        format!(
            "{}/exchange/api/{}/assets/{path}",
            base_url.trim_end_matches('/'),
            self.surface
        )
    }

    /// Trailing literal segment, used as the classifier of what the endpoint returns.
    pub fn label(&self) -> &'static str {
        self.template.rsplit('/').next().unwrap_or(self.template)
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.surface, self.template)
    }
}

/// Asset detail endpoints, most specific first.
pub const DETAIL_ENDPOINTS: &[EndpointTemplate] = &[
    EndpointTemplate::new(ApiSurface::V2, "{group}/{asset}/{version}"),
    EndpointTemplate::new(ApiSurface::V2, "{group}/{asset}"),
    EndpointTemplate::new(ApiSurface::V1, "{group}/{asset}/{version}"),
    EndpointTemplate::new(ApiSurface::V1, "{group}/{asset}"),
];

/// Specification endpoints tried after an asset's declared files are exhausted.
pub const LEGACY_SPEC_ENDPOINTS: &[EndpointTemplate] = &[
    EndpointTemplate::new(ApiSurface::V2, "{group}/{asset}/{version}/files"),
    EndpointTemplate::new(ApiSurface::V2, "{group}/{asset}/{version}/fat-raml"),
    EndpointTemplate::new(ApiSurface::V2, "{group}/{asset}/{version}/instances"),
    EndpointTemplate::new(ApiSurface::V1, "{group}/{asset}/{version}/raml"),
    EndpointTemplate::new(ApiSurface::V1, "{group}/{asset}/{version}/oas"),
];

/// The files listing of one asset version.
pub const FILES_ENDPOINT: EndpointTemplate =
    EndpointTemplate::new(ApiSurface::V2, "{group}/{asset}/{version}/files");

/// Runs `attempt` over `candidates` in order and returns the first success.
///
/// Failures are logged and swallowed; `None` means every candidate failed.
pub async fn first_success<C, T, F, Fut>(
    candidates: impl IntoIterator<Item = C>,
    mut attempt: F,
) -> Option<T>
where
    C: fmt::Display,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<T, ScoutError>>,
{
    for candidate in candidates {
        let label = candidate.to_string();
        match attempt(candidate).await {
            Ok(value) => {
                debug!(candidate = %label, "candidate succeeded");
                return Some(value);
            }
            Err(e) => debug!(candidate = %label, error = %e, "candidate failed, trying next"),
        }
    }
    None
}
