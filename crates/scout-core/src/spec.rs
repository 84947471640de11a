// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Specification and endpoint-analysis value types.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use serde_json::Value;
use strum::{Display, EnumString};

/// A retrieved interface specification, tagged by shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecificationResult {
    /// Classifier of the artifact the specification came from (`oas`, `raml`, ...).
    pub classifier: String,
    /// Entry name inside an archive, when known.
    pub file_name: Option<String>,
    /// `Content-Type` reported by the server, for direct fetches.
    pub content_type: Option<String>,
    /// Every entry of the source archive, in listing order.
    pub archive_listing: Option<Vec<String>>,
    pub origin: SpecOrigin,
    #[serde(flatten)]
    pub body: SpecBody,
}

impl SpecificationResult {
    /// The parsed document for structured specifications.
    pub fn document(&self) -> Option<&Value> {
        match &self.body {
            SpecBody::StructuredJson { content, .. } => Some(content),
            SpecBody::RawText { .. } => None,
        }
    }

    /// The source text, when the specification kept it.
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            SpecBody::StructuredJson { raw_text, .. } => raw_text.as_deref(),
            SpecBody::RawText { content } => Some(content),
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self.body, SpecBody::StructuredJson { .. })
    }
}

/// The two shapes a specification can take.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecBody {
    /// A JSON document that parsed successfully.
    StructuredJson {
        content: Value,
        raw_text: Option<String>,
    },
    /// YAML, RAML, or anything that is not parseable JSON.
    RawText { content: String },
}

/// How the engine obtained a specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum SpecOrigin {
    /// Extracted from a ZIP archive downloaded from a file's external link.
    Archive { url: String },
    /// Fetched directly from a file's external link.
    DirectLink { url: String },
    /// Returned by one of the legacy specification endpoints.
    LegacyEndpoint { url: String },
}

/// Coarse interaction pattern derived from an operation's method and path shape.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InteractionPattern {
    List,
    GetById,
    Create,
    Update,
    Delete,
    Unclassified,
}

/// One `(path, method)` operation of an analyzed specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointRecord {
    pub path: String,
    /// Upper-cased HTTP method.
    pub method: String,
    pub summary: String,
    pub description_excerpt: String,
    pub pattern: InteractionPattern,
}

/// Structural summary of an OpenAPI-shaped document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointAnalysis {
    /// Number of `(path, method)` operations.
    pub endpoint_count: usize,
    /// Number of entries under `paths`.
    pub path_count: usize,
    pub method_histogram: BTreeMap<String, usize>,
    pub endpoints: Vec<EndpointRecord>,
    /// De-duplicated patterns seen across all operations, excluding `unclassified`.
    pub patterns: BTreeSet<InteractionPattern>,
}

/// The specification format the analyzer recognized but cannot walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecFormat {
    OpenapiYaml,
    Raml,
    Other(String),
}

/// Result of running the endpoint analyzer over a specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Analyzed(EndpointAnalysis),
    Unsupported {
        detected_format: SpecFormat,
        note: String,
    },
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn interaction_pattern_round_trips_through_strings() {
        for pattern in [
            InteractionPattern::List,
            InteractionPattern::GetById,
            InteractionPattern::Create,
            InteractionPattern::Update,
            InteractionPattern::Delete,
            InteractionPattern::Unclassified,
        ] {
            let s = pattern.to_string();
            assert_eq!(InteractionPattern::from_str(&s).unwrap(), pattern);
        }
        assert_eq!(InteractionPattern::GetById.to_string(), "get_by_id");
    }

    #[test]
    fn structured_spec_serializes_with_kind_tag() {
        let spec = SpecificationResult {
            classifier: "oas".into(),
            file_name: Some("api.json".into()),
            content_type: None,
            archive_listing: Some(vec!["api.json".into()]),
            origin: SpecOrigin::Archive {
                url: "https://cdn.example/oas.zip".into(),
            },
            body: SpecBody::StructuredJson {
                content: serde_json::json!({"paths": {}}),
                raw_text: Some("{\"paths\": {}}".into()),
            },
        };
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["kind"], "structured_json");
        assert_eq!(json["origin"]["via"], "archive");
        assert!(spec.is_structured());
        assert_eq!(spec.document(), Some(&serde_json::json!({"paths": {}})));
    }

    #[test]
    fn raw_text_exposes_content() {
        let spec = SpecificationResult {
            classifier: "raml".into(),
            file_name: None,
            content_type: Some("application/raml+yaml".into()),
            archive_listing: None,
            origin: SpecOrigin::DirectLink {
                url: "https://cdn.example/api.raml".into(),
            },
            body: SpecBody::RawText {
                content: "#%RAML 1.0".into(),
            },
        };
        assert!(!spec.is_structured());
        assert_eq!(spec.text(), Some("#%RAML 1.0"));
        assert_eq!(spec.document(), None);
    }
}
