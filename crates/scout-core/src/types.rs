// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Catalog value types: asset identities, search summaries, asset details,
//! and the file descriptors declared on an asset version.
//!
//! The registry is loose about field presence and nullability, so every
//! string field deserializes leniently (missing or `null` becomes empty).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Lookup key for an asset: `(group_id, asset_id)` plus an optional version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetIdentity {
    pub group_id: String,
    pub asset_id: String,
    pub version: Option<String>,
}

impl AssetIdentity {
    /// Creates an unversioned identity.
    pub fn new(group_id: impl Into<String>, asset_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            asset_id: asset_id.into(),
            version: None,
        }
    }

    /// Returns this identity pinned to `version`. Empty versions count as absent.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = if version.trim().is_empty() {
            None
        } else {
            Some(version)
        };
        self
    }

    /// Returns a copy pinned to `version`.
    pub fn pinned(&self, version: &str) -> Self {
        self.clone().with_version(version)
    }

    /// Whether a summary refers to the same `(group_id, asset_id)` pair.
    pub fn matches(&self, summary: &AssetSummary) -> bool {
        summary.group_id == self.group_id && summary.asset_id == self.asset_id
    }
}

impl fmt::Display for AssetIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_id, self.asset_id)?;
        if let Some(version) = &self.version {
            write!(f, "@{version}")?;
        }
        Ok(())
    }
}

/// One search hit from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub group_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub asset_id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub asset_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    /// Tag values in registry order. Accepts bare strings or `{"value": ..}` objects.
    #[serde(default, deserialize_with = "tag_values")]
    pub tags: Vec<String>,
}

impl AssetSummary {
    /// Identity of this summary at its reported version.
    pub fn identity(&self) -> AssetIdentity {
        AssetIdentity::new(&self.group_id, &self.asset_id).with_version(&self.version)
    }
}

/// Full record for one asset version: the summary plus its declared files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDetails {
    #[serde(flatten)]
    pub summary: AssetSummary,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub files: Vec<FileDescriptor>,
}

impl From<AssetSummary> for AssetDetails {
    fn from(summary: AssetSummary) -> Self {
        Self {
            summary,
            files: Vec::new(),
        }
    }
}

/// One artifact declared on an asset version (an OAS archive, a RAML file, docs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    #[serde(default, deserialize_with = "lenient_string")]
    pub classifier: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub packaging: String,
    #[serde(default)]
    pub main_file: Option<String>,
    #[serde(default)]
    pub external_link: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

impl FileDescriptor {
    /// The download link, if present and non-blank.
    pub fn usable_link(&self) -> Option<&str> {
        self.external_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }

    /// The declared main file, if present and non-blank.
    pub fn declared_main_file(&self) -> Option<&str> {
        self.main_file.as_deref().filter(|name| !name.is_empty())
    }

    /// Whether the artifact is packaged as a ZIP archive.
    pub fn is_archive(&self) -> bool {
        self.packaging.eq_ignore_ascii_case("zip")
    }
}

impl fmt::Display for FileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.classifier, self.packaging)
    }
}

/// Where a file listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FilesSource {
    /// Taken from the `files` array of the resolved asset details.
    AssetDetails,
    /// Fetched from the dedicated files endpoint.
    FilesEndpoint,
}

/// The artifacts declared on an asset version, with their provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetFiles {
    pub files: Vec<FileDescriptor>,
    pub source: FilesSource,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    })
}

fn tag_values<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|tag| match tag {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("value").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        })
        .collect())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_decodes_registry_shape() {
        let json = serde_json::json!({
            "name": "Accounts API",
            "description": null,
            "groupId": "org-1",
            "assetId": "accounts-api",
            "type": "rest-api",
            "version": "2.1.0",
            "tags": [{"value": "banking"}, "core", {"key": "no-value"}]
        });
        let summary: AssetSummary = serde_json::from_value(json).unwrap();
        assert_eq!(summary.name, "Accounts API");
        assert_eq!(summary.description, "");
        assert_eq!(summary.asset_type, "rest-api");
        assert_eq!(summary.tags, vec!["banking", "core"]);
    }

    #[test]
    fn summary_tolerates_missing_fields() {
        let summary: AssetSummary = serde_json::from_str("{}").unwrap();
        assert_eq!(summary, AssetSummary::default());
    }

    #[test]
    fn details_carry_files() {
        let json = serde_json::json!({
            "groupId": "org-1",
            "assetId": "accounts-api",
            "version": "1.0.0",
            "files": [
                {"classifier": "oas", "packaging": "zip", "mainFile": "api.yaml",
                 "externalLink": "https://cdn.example/oas.zip", "createdDate": "2024-01-01"}
            ]
        });
        let details: AssetDetails = serde_json::from_value(json).unwrap();
        assert_eq!(details.summary.asset_id, "accounts-api");
        assert_eq!(details.files.len(), 1);
        let file = &details.files[0];
        assert!(file.is_archive());
        assert_eq!(file.declared_main_file(), Some("api.yaml"));
        assert_eq!(file.usable_link(), Some("https://cdn.example/oas.zip"));
    }

    #[test]
    fn null_files_become_empty() {
        let details: AssetDetails =
            serde_json::from_str(r#"{"assetId": "x", "files": null}"#).unwrap();
        assert!(details.files.is_empty());
    }

    #[test]
    fn blank_link_is_not_usable() {
        let file = FileDescriptor {
            external_link: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(file.usable_link(), None);
    }

    #[test]
    fn identity_display_and_matching() {
        let id = AssetIdentity::new("org-1", "accounts-api");
        assert_eq!(id.to_string(), "org-1/accounts-api");
        assert_eq!(id.pinned("1.2.3").to_string(), "org-1/accounts-api@1.2.3");
        assert_eq!(id.clone().with_version("").version, None);

        let summary = AssetSummary {
            group_id: "org-1".into(),
            asset_id: "accounts-api".into(),
            ..Default::default()
        };
        assert!(id.matches(&summary));
    }
}
