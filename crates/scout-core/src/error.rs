// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the scout Exchange engine.

use thiserror::Error;

/// Boxed error source carried by several variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The primary error type used across the engine, configuration, and CLI.
///
/// Engine entry points never hand these to callers directly: fallback cascades
/// absorb them and surface exhaustion as a typed absence. They still flow
/// through internal helpers so each attempt can be logged with its cause.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Configuration errors (missing credentials, invalid URLs, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The identity provider rejected the client credentials or was unreachable.
    #[error("authentication failed: {message}")]
    Authentication {
        message: String,
        source: Option<BoxError>,
    },

    /// No asset, version, or specification matched after every fallback.
    #[error("not found: {0}")]
    NotFound(String),

    /// A downloaded payload is not a readable ZIP archive.
    #[error("archive format error: {message}")]
    ArchiveFormat {
        message: String,
        source: Option<BoxError>,
    },

    /// The registry answered with an envelope the engine does not recognize.
    #[error("unexpected response shape: {0}")]
    UnexpectedResponseShape(String),

    /// Network failure, timeout, or non-success status on a single HTTP call.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        status: Option<u16>,
        source: Option<BoxError>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ScoutError {
    /// Builds a transport error from a reqwest-style failure.
    pub fn transport(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            message: message.into(),
            status: None,
            source: Some(source.into()),
        }
    }

    /// Builds a transport error for a non-success HTTP status.
    pub fn status(status: u16, url: &str) -> Self {
        Self::Transport {
            message: format!("{url} returned HTTP {status}"),
            status: Some(status),
            source: None,
        }
    }

    /// Returns the HTTP status code when this is a status-driven transport error.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
