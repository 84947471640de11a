// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the scout Exchange engine.
//!
//! Provides the shared error type, the catalog and specification value types
//! exchanged between engine components, and the seam traits (`Clock`,
//! `TokenProvider`) the session manager is built on.

pub mod error;
pub mod spec;
pub mod traits;
pub mod types;

pub use error::ScoutError;
pub use spec::{
    AnalysisOutcome, EndpointAnalysis, EndpointRecord, InteractionPattern, SpecBody, SpecFormat,
    SpecOrigin, SpecificationResult,
};
pub use traits::{Clock, SystemClock, TokenGrant, TokenProvider};
pub use types::{AssetDetails, AssetFiles, AssetIdentity, AssetSummary, FileDescriptor, FilesSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scout_error_has_all_variants() {
        let _config = ScoutError::Config("test".into());
        let _auth = ScoutError::Authentication {
            message: "rejected".into(),
            source: None,
        };
        let _not_found = ScoutError::NotFound("org/asset".into());
        let _archive = ScoutError::ArchiveFormat {
            message: "bad zip".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _shape = ScoutError::UnexpectedResponseShape("keys: [foo]".into());
        let _transport = ScoutError::transport("connect failed", std::io::Error::other("test"));
        let _internal = ScoutError::Internal("test".into());
    }

    #[test]
    fn status_errors_expose_http_status() {
        let err = ScoutError::status(404, "https://example.com/x");
        assert_eq!(err.http_status(), Some(404));
        assert!(err.to_string().contains("HTTP 404"));
        assert_eq!(ScoutError::Internal("x".into()).http_status(), None);
    }

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
