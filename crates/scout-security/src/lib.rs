// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound security helpers for scout.
//!
//! Secret masking and redaction for request traces and log output, plus a
//! TLS-enforcing HTTP client builder and URL policy check.

pub mod redact;
pub mod tls;

pub use redact::{RedactingWriter, mask_secret, redact};
pub use tls::{build_secure_client, is_localhost, validate_url};
