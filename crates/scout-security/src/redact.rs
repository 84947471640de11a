// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secret redaction for request traces and log output.
//!
//! Two mechanisms work together:
//! 1. **Pattern-based**: bearer tokens, `client_secret` form fields, and
//!    `access_token` JSON members are replaced wherever they appear.
//! 2. **Exact-match**: known secret values (the configured client secret,
//!    the current access token) are replaced verbatim.

use std::io::Write;
use std::sync::{Arc, LazyLock, RwLock};

use regex::Regex;

/// Secret-bearing fragments, each with the replacement that keeps its prefix.
static REDACTION_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)(Bearer\s+)[a-zA-Z0-9._~+/=\-]{8,}").expect("valid regex"),
            "${1}[REDACTED]",
        ),
        (
            Regex::new(r"(client_secret=)[^&\s']+").expect("valid regex"),
            "${1}[REDACTED]",
        ),
        (
            Regex::new(r#"("access_token"\s*:\s*")[^"]+"#).expect("valid regex"),
            "${1}[REDACTED]",
        ),
    ]
});

const REDACTED: &str = "[REDACTED]";

/// Redact secrets from `input` using the built-in patterns and exact `known_values`.
pub fn redact(input: &str, known_values: &[String]) -> String {
    let mut result = input.to_string();

    for (pattern, replacement) in REDACTION_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).into_owned();
    }

    // Longest first so a value that contains another is replaced whole.
    let mut sorted: Vec<&String> = known_values.iter().filter(|v| !v.is_empty()).collect();
    sorted.sort_by_key(|v| std::cmp::Reverse(v.len()));
    for value in sorted {
        result = result.replace(value.as_str(), REDACTED);
    }

    result
}

/// Mask a secret for display, keeping four characters at each end.
///
/// Values shorter than 10 characters are fully masked.
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() < 10 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

/// A writer that redacts secrets before forwarding to `inner`.
///
/// Used as the tracing subscriber's writer so nothing that reaches the log
/// stream carries a live credential.
pub struct RedactingWriter<W> {
    inner: W,
    known_values: Arc<RwLock<Vec<String>>>,
}

impl<W: Write> RedactingWriter<W> {
    pub fn new(inner: W, known_values: Arc<RwLock<Vec<String>>>) -> Self {
        Self {
            inner,
            known_values,
        }
    }

    /// Register another value for exact-match redaction.
    pub fn add_known_value(known_values: &Arc<RwLock<Vec<String>>>, value: String) {
        if value.is_empty() {
            return;
        }
        if let Ok(mut values) = known_values.write()
            && !values.contains(&value)
        {
            values.push(value);
        }
    }
}

impl<W: Write> Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let input = String::from_utf8_lossy(buf);
        let known = self
            .known_values
            .read()
            .map(|v| v.clone())
            .unwrap_or_default();
        self.inner.write_all(redact(&input, &known).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
