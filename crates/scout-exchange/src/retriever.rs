// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Specification retrieval.
//!
//! Sources are tried in a fixed order and the first one that yields a
//! specification wins:
//!
//! 1. The asset's declared files, by classifier priority
//!    ([`CLASSIFIER_PRIORITY`]). ZIP packages go through the
//!    [`ArchiveExtractor`]; anything else is fetched directly.
//! 2. The legacy specification endpoints ([`LEGACY_SPEC_ENDPOINTS`]).
//!
//! Exhaustion is reported as `None`, never as an error.

use reqwest::header::CONTENT_TYPE;
use scout_core::{AssetIdentity, FileDescriptor, ScoutError, SpecBody, SpecOrigin, SpecificationResult};
use tracing::{info, warn};

use crate::archive::ArchiveExtractor;
use crate::cascade::{EndpointTemplate, LEGACY_SPEC_ENDPOINTS, first_success};
use crate::client::{ExchangeClient, read_text};
use crate::resolver::AssetResolver;

/// Classifiers that carry an interface specification, most preferred first.
pub const CLASSIFIER_PRIORITY: [&str; 4] = ["oas", "fat-oas", "raml", "fat-raml"];

/// Declared files worth trying, ordered by classifier priority then declaration order.
pub fn spec_candidates(files: &[FileDescriptor]) -> Vec<&FileDescriptor> {
    CLASSIFIER_PRIORITY
        .iter()
        .flat_map(|classifier| {
            files
                .iter()
                .filter(move |file| file.classifier == *classifier && file.usable_link().is_some())
        })
        .collect()
}

/// Builds a result from a directly fetched body.
///
/// The body is structured only when the server declared JSON and it parses.
pub fn classify_body(
    text: String,
    content_type: Option<String>,
    classifier: &str,
    origin: SpecOrigin,
) -> SpecificationResult {
    let declared_json = content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
    let body = match declared_json
        .then(|| serde_json::from_str::<serde_json::Value>(&text).ok())
        .flatten()
    {
        Some(content) => SpecBody::StructuredJson {
            content,
            raw_text: None,
        },
        None => SpecBody::RawText { content: text },
    };
    SpecificationResult {
        classifier: classifier.to_string(),
        file_name: None,
        content_type,
        archive_listing: None,
        origin,
        body,
    }
}

async fn classify_response(
    response: reqwest::Response,
    classifier: &str,
    origin: SpecOrigin,
) -> Result<SpecificationResult, ScoutError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let text = read_text(response).await?;
    Ok(classify_body(text, content_type, classifier, origin))
}

/// Locates and downloads the interface specification of an asset.
#[derive(Clone)]
pub struct SpecificationRetriever {
    client: ExchangeClient,
    resolver: AssetResolver,
    archives: ArchiveExtractor,
}

impl SpecificationRetriever {
    pub fn new(client: ExchangeClient, resolver: AssetResolver, archives: ArchiveExtractor) -> Self {
        Self {
            client,
            resolver,
            archives,
        }
    }

    /// The specification of `identity`, or `None` when no source yields one.
    pub async fn get_specification(&self, identity: &AssetIdentity) -> Option<SpecificationResult> {
        let version = self.resolver.effective_version(identity).await;
        let pinned = identity.pinned(&version);

        if let Some(details) = self.resolver.resolve_details(&pinned).await {
            let candidates = spec_candidates(&details.files);
            if let Some(spec) = first_success(candidates, |file| self.from_file(file)).await {
                info!(asset = %pinned, classifier = %spec.classifier, "specification retrieved from declared files");
                return Some(spec);
            }
        }

        let found = first_success(LEGACY_SPEC_ENDPOINTS, |endpoint| {
            self.from_legacy_endpoint(endpoint, &pinned, &version)
        })
        .await;
        match &found {
            Some(spec) => info!(asset = %pinned, classifier = %spec.classifier, "specification retrieved from legacy endpoint"),
            None => warn!(asset = %pinned, "no specification source succeeded"),
        }
        found
    }

    async fn from_file(&self, file: &FileDescriptor) -> Result<SpecificationResult, ScoutError> {
        let url = file
            .usable_link()
            .ok_or_else(|| ScoutError::NotFound(format!("{file} has no download link")))?;
        if file.is_archive() {
            return self
                .archives
                .extract(url, &file.classifier, file.declared_main_file())
                .await;
        }
        let response = self.client.get_public(url).await?;
        classify_response(
            response,
            &file.classifier,
            SpecOrigin::DirectLink {
                url: url.to_string(),
            },
        )
        .await
    }

    async fn from_legacy_endpoint(
        &self,
        endpoint: &EndpointTemplate,
        identity: &AssetIdentity,
        version: &str,
    ) -> Result<SpecificationResult, ScoutError> {
        let url = endpoint.render(self.client.base_url(), identity, version);
        let response = self.client.get_authorized(&url).await?;
        classify_response(response, endpoint.label(), SpecOrigin::LegacyEndpoint { url }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(classifier: &str, link: Option<&str>) -> FileDescriptor {
        FileDescriptor {
            classifier: classifier.into(),
            packaging: "zip".into(),
            external_link: link.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn candidates_follow_classifier_priority() {
        let files = vec![
            file("docs", Some("https://cdn/docs.zip")),
            file("raml", Some("https://cdn/raml.zip")),
            file("fat-oas", Some("https://cdn/fat-oas.zip")),
            file("oas", Some("https://cdn/oas.zip")),
        ];
        let order: Vec<&str> = spec_candidates(&files)
            .iter()
            .map(|f| f.classifier.as_str())
            .collect();
        assert_eq!(order, vec!["oas", "fat-oas", "raml"]);
    }

    #[test]
    fn candidates_without_links_are_skipped() {
        let files = vec![file("oas", None), file("oas", Some("  ")), file("raml", Some("https://x"))];
        let candidates = spec_candidates(&files);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].classifier, "raml");
    }

    #[test]
    fn json_requires_declared_content_type() {
        let origin = SpecOrigin::DirectLink {
            url: "https://x".into(),
        };
        let spec = classify_body(
            r#"{"openapi":"3.0.0"}"#.into(),
            Some("application/json; charset=utf-8".into()),
            "oas",
            origin.clone(),
        );
        assert!(spec.is_structured());

        let spec = classify_body(r#"{"openapi":"3.0.0"}"#.into(), Some("text/plain".into()), "oas", origin.clone());
        assert!(!spec.is_structured());

        let spec = classify_body("openapi: 3.0.0".into(), Some("application/json".into()), "oas", origin);
        assert!(!spec.is_structured());
        assert_eq!(spec.content_type.as_deref(), Some("application/json"));
    }
}
