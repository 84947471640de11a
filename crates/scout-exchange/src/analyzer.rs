// SPDX-FileCopyrightText: 2026 Scout Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural endpoint analysis of OpenAPI-shaped documents.
//!
//! Only structured JSON specifications with a `paths` object are walked.
//! Everything else is reported as unsupported with its detected format.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;
use scout_core::{
    AnalysisOutcome, EndpointAnalysis, EndpointRecord, InteractionPattern, SpecFormat,
    SpecificationResult,
};
use serde_json::{Map, Value};

/// Longest description excerpt kept per endpoint, in characters.
pub const EXCERPT_LIMIT: usize = 100;

const MISSING_SUMMARY: &str = "N/A";

static PATH_PARAMETER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^/{}]+\}").expect("valid regex"));

/// Analyzes a retrieved specification.
pub fn analyze(spec: &SpecificationResult) -> AnalysisOutcome {
    if let Some(analysis) = spec.document().and_then(analyze_document) {
        return AnalysisOutcome::Analyzed(analysis);
    }
    let detected_format = detect_format(spec);
    let note = match &detected_format {
        SpecFormat::OpenapiYaml => {
            "OpenAPI YAML specification; inspect the raw specification for its endpoints".to_string()
        }
        SpecFormat::Raml => {
            "RAML specification; inspect the raw specification for its resources".to_string()
        }
        SpecFormat::Other(classifier) => {
            format!("`{classifier}` specification has no `paths` to analyze; inspect the raw specification")
        }
    };
    AnalysisOutcome::Unsupported {
        detected_format,
        note,
    }
}

/// Walks the `paths` object of a document, if it has one.
pub fn analyze_document(document: &Value) -> Option<EndpointAnalysis> {
    let paths = document.get("paths")?.as_object()?;

    let mut endpoints = Vec::new();
    let mut method_histogram = BTreeMap::new();
    for (path, item) in paths {
        let Some(operations) = item.as_object() else {
            continue;
        };
        for (method, operation) in operations {
            let Some(operation) = operation.as_object() else {
                continue;
            };
            let method = method.to_ascii_uppercase();
            *method_histogram.entry(method.clone()).or_insert(0) += 1;
            endpoints.push(EndpointRecord {
                pattern: classify(&method, path),
                summary: string_field(operation, "summary")
                    .unwrap_or(MISSING_SUMMARY)
                    .to_string(),
                description_excerpt: excerpt(string_field(operation, "description").unwrap_or("")),
                path: path.clone(),
                method,
            });
        }
    }

    let patterns: BTreeSet<InteractionPattern> = endpoints
        .iter()
        .map(|endpoint| endpoint.pattern)
        .filter(|pattern| *pattern != InteractionPattern::Unclassified)
        .collect();

    Some(EndpointAnalysis {
        endpoint_count: endpoints.len(),
        path_count: paths.len(),
        method_histogram,
        endpoints,
        patterns,
    })
}

/// Interaction pattern of one operation.
pub fn classify(method: &str, path: &str) -> InteractionPattern {
    match method.to_ascii_uppercase().as_str() {
        "GET" if PATH_PARAMETER.is_match(path) => InteractionPattern::GetById,
        "GET" => InteractionPattern::List,
        "POST" => InteractionPattern::Create,
        "PUT" | "PATCH" => InteractionPattern::Update,
        "DELETE" => InteractionPattern::Delete,
        _ => InteractionPattern::Unclassified,
    }
}

fn string_field<'a>(operation: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    operation.get(key).and_then(Value::as_str)
}

fn excerpt(description: &str) -> String {
    if description.chars().count() > EXCERPT_LIMIT {
        let cut: String = description.chars().take(EXCERPT_LIMIT).collect();
        format!("{cut}...")
    } else {
        description.to_string()
    }
}

fn detect_format(spec: &SpecificationResult) -> SpecFormat {
    let text = spec.text().unwrap_or("");
    if spec.classifier.to_ascii_lowercase().contains("raml") || text.trim_start().starts_with("#%RAML") {
        return SpecFormat::Raml;
    }
    if spec.is_structured() {
        SpecFormat::Other(spec.classifier.clone())
    } else {
        SpecFormat::OpenapiYaml
    }
}
