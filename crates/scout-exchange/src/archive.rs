// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! ZIP archive download and specification entry selection.

use std::io::{Cursor, Read};

use scout_core::{ScoutError, SpecBody, SpecOrigin, SpecificationResult};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::client::ExchangeClient;

/// Picks the entry that most likely holds the specification.
///
/// In order: the declared main file when it exists in the archive, the first
/// `.yaml`/`.yml` entry, the first `.json` entry, the first entry at all.
/// Directory entries are never selected.
pub fn select_entry<'a>(listing: &'a [String], main_file: Option<&str>) -> Option<&'a str> {
    let files = || listing.iter().map(String::as_str).filter(|name| !name.ends_with('/'));

    if let Some(main_file) = main_file
        && let Some(found) = files().find(|name| *name == main_file)
    {
        return Some(found);
    }
    files()
        .find(|name| has_extension(name, &["yaml", "yml"]))
        .or_else(|| files().find(|name| has_extension(name, &["json"])))
        .or_else(|| files().next())
}

fn has_extension(name: &str, extensions: &[&str]) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn archive_error(message: impl Into<String>, source: zip::result::ZipError) -> ScoutError {
    ScoutError::ArchiveFormat {
        message: message.into(),
        source: Some(Box::new(source)),
    }
}

/// Extracts the specification entry from ZIP bytes.
///
/// Fails with [`ScoutError::ArchiveFormat`] when the bytes are not a readable
/// archive and [`ScoutError::NotFound`] when it holds no file entries.
pub fn extract_from_bytes(
    bytes: &[u8],
    classifier: &str,
    main_file: Option<&str>,
    url: &str,
) -> Result<SpecificationResult, ScoutError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| archive_error(format!("{url} is not a ZIP archive"), e))?;

    let mut listing = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| archive_error(format!("unreadable entry #{index}"), e))?;
        listing.push(entry.name().to_string());
    }
    debug!(url, entries = listing.len(), "archive listed");

    let selected = select_entry(&listing, main_file)
        .ok_or_else(|| ScoutError::NotFound(format!("archive {url} has no file entries")))?
        .to_string();

    let mut raw = Vec::new();
    archive
        .by_name(&selected)
        .map_err(|e| archive_error(format!("entry {selected} unreadable"), e))?
        .read_to_end(&mut raw)
        .map_err(|e| ScoutError::ArchiveFormat {
            message: format!("entry {selected} could not be decompressed"),
            source: Some(Box::new(e)),
        })?;
    let text = String::from_utf8(raw).map_err(|e| ScoutError::ArchiveFormat {
        message: format!("entry {selected} is not valid UTF-8"),
        source: Some(Box::new(e)),
    })?;

    let body = match has_extension(&selected, &["json"])
        .then(|| serde_json::from_str::<serde_json::Value>(&text).ok())
        .flatten()
    {
        Some(content) => SpecBody::StructuredJson {
            content,
            raw_text: Some(text),
        },
        None => SpecBody::RawText { content: text },
    };
    info!(url, entry = %selected, "specification extracted from archive");

    Ok(SpecificationResult {
        classifier: classifier.to_string(),
        file_name: Some(selected),
        content_type: None,
        archive_listing: Some(listing),
        origin: SpecOrigin::Archive {
            url: url.to_string(),
        },
        body,
    })
}

/// Downloads archives from external links and extracts their specification.
#[derive(Clone)]
pub struct ArchiveExtractor {
    client: ExchangeClient,
}

impl ArchiveExtractor {
    pub fn new(client: ExchangeClient) -> Self {
        Self { client }
    }

    /// Downloads the archive at `archive_url` and extracts its specification entry.
    pub async fn extract(
        &self,
        archive_url: &str,
        classifier: &str,
        declared_main_file: Option<&str>,
    ) -> Result<SpecificationResult, ScoutError> {
        let response = self.client.get_public(archive_url).await?;
        let bytes = response.bytes().await.map_err(|e| {
            ScoutError::transport(format!("downloading {archive_url} failed: {e}"), e)
        })?;
        extract_from_bytes(&bytes, classifier, declared_main_file, archive_url)
    }
}
