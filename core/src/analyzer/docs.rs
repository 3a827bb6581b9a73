#![deny(missing_docs)]

//! # Documentation
//!
//! Assembles the doc comment text of a generated method.

use crate::oas::models::ResolvedOperation;
use serde_json::Value;

/// Builds the doc text of `op`, one line per entry.
///
/// Summary then description, or a generated sentence when both are absent,
/// followed by `@deprecated`, `@tags`, `@see`, `@server`, `@security` and
/// `@x-*` annotation lines.
pub fn build_doc(op: &ResolvedOperation) -> String {
    let mut lines: Vec<String> = Vec::new();

    let summary = op.summary.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let description = op.description.as_deref().map(str::trim).filter(|s| !s.is_empty());
    match (summary, description) {
        (None, None) => lines.push(format!("Performs a {} request to {}.", op.method, op.path)),
        (summary, description) => {
            lines.extend(summary.map(str::to_string));
            lines.extend(description.map(str::to_string));
        }
    }

    if op.deprecated {
        lines.push("@deprecated".to_string());
    }
    if !op.tags.is_empty() {
        lines.push(format!("@tags {}", op.tags.join(", ")));
    }
    if let Some(docs) = &op.external_docs {
        match docs.description.as_deref().filter(|d| !d.is_empty()) {
            Some(desc) => lines.push(format!("@see {} {}", docs.url, desc)),
            None => lines.push(format!("@see {}", docs.url)),
        }
    }
    if op.servers_overridden {
        for server in &op.servers {
            if let Ok(json) = serde_json::to_string(server) {
                lines.push(format!("@server {}", json));
            }
        }
    }
    if let Some(security) = &op.security {
        lines.push(format!("@security {}", Value::Array(security.clone())));
    }
    for (key, value) in &op.extensions {
        match value {
            Value::Bool(true) => lines.push(format!("@{}", key)),
            Value::Bool(false) | Value::Null => {}
            other => lines.push(format!("@{} {}", key, other)),
        }
    }

    lines.join("\n")
}
