#![deny(missing_docs)]

//! # OpenAPI Validation
//!
//! Structural checks that run on a raw document before the parser builds
//! its operation model. Every failure is fatal (`AppError::Validation`).
//!
//! Checks:
//! - Literal `operationId`s are unique across `paths` and `webhooks`,
//!   including `additionalOperations`.
//! - Server URLs carry no query or fragment.
//! - Every server URL placeholder has a variable; every variable is used
//!   exactly once.
//! - Variable enums are non-empty and contain the default.
//! - Server names are unique within one server list.

use crate::error::{AppError, AppResult};
use crate::oas::models::HTTP_METHODS;
use crate::oas::normalization::detect_spec_version;
use crate::oas::servers::server_placeholders;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Runs every structural check on a raw document.
pub fn validate_document(doc: &Value) -> AppResult<()> {
    validate_operation_ids(doc)?;

    let is_swagger = detect_spec_version(doc).is_some_and(|v| v.is_swagger());
    if !is_swagger {
        validate_servers(doc)?;
    }
    Ok(())
}

/// Yields `(context, operation)` for every operation literally present in
/// `paths` / `webhooks`. Path items behind `$ref` are not followed.
fn literal_operations(doc: &Value) -> Vec<(String, &Value)> {
    let mut out = Vec::new();
    for section in ["paths", "webhooks"] {
        let Some(items) = doc.get(section).and_then(|v| v.as_object()) else {
            continue;
        };
        for (path, item) in items {
            for method in HTTP_METHODS {
                if let Some(op) = item.get(method) {
                    out.push((format!("{}.{}.{}", section, path, method), op));
                }
            }
            if let Some(extra) = item.get("additionalOperations").and_then(|v| v.as_object()) {
                for (method, op) in extra {
                    out.push((format!("{}.{}.additionalOperations.{}", section, path, method), op));
                }
            }
        }
    }
    out
}

fn validate_operation_ids(doc: &Value) -> AppResult<()> {
    let mut seen: HashMap<&str, String> = HashMap::new();
    for (context, op) in literal_operations(doc) {
        let Some(id) = op.get("operationId").and_then(|v| v.as_str()) else {
            continue;
        };
        if let Some(first) = seen.get(id) {
            return Err(AppError::Validation(format!(
                "Duplicate operationId '{}' found in {} and {}",
                id, first, context
            )));
        }
        seen.insert(id, context);
    }
    Ok(())
}

/// Validates document, path-item and operation level server lists.
pub(crate) fn validate_servers(doc: &Value) -> AppResult<()> {
    if let Some(servers) = doc.get("servers") {
        validate_server_list(servers, "servers")?;
    }

    for section in ["paths", "webhooks"] {
        let Some(items) = doc.get(section).and_then(|v| v.as_object()) else {
            continue;
        };
        for (path, item) in items {
            let context = format!("{}.{}", section, path);
            if let Some(servers) = item.get("servers") {
                validate_server_list(servers, &format!("{}.servers", context))?;
            }
            for method in HTTP_METHODS {
                if let Some(servers) = item.get(method).and_then(|op| op.get("servers")) {
                    validate_server_list(servers, &format!("{}.{}.servers", context, method))?;
                }
            }
        }
    }

    Ok(())
}

fn validate_server_list(servers: &Value, context: &str) -> AppResult<()> {
    let Some(list) = servers.as_array() else {
        return Ok(());
    };
    let mut seen_names = HashSet::new();
    for (idx, server) in list.iter().enumerate() {
        if let Some(name) = server.get("name").and_then(|v| v.as_str()) {
            if !seen_names.insert(name) {
                return Err(AppError::Validation(format!(
                    "Duplicate server name '{}' in {}",
                    name, context
                )));
            }
        }
        validate_server(server, &format!("{}[{}]", context, idx))?;
    }
    Ok(())
}

fn validate_server(server: &Value, context: &str) -> AppResult<()> {
    let Some(url) = server.get("url").and_then(|v| v.as_str()) else {
        return Err(AppError::Validation(format!(
            "Server in {} is missing 'url'",
            context
        )));
    };
    validate_server_url(url, context)?;

    let variables = server.get("variables").and_then(|v| v.as_object());
    let mut placeholder_counts: HashMap<String, usize> = HashMap::new();
    for name in server_placeholders(url) {
        if !variables.is_some_and(|vars| vars.contains_key(&name)) {
            return Err(AppError::Validation(format!(
                "Server URL '{}' in {} references undefined variable '{}'",
                url, context, name
            )));
        }
        *placeholder_counts.entry(name).or_insert(0) += 1;
    }

    let Some(vars) = variables else {
        return Ok(());
    };
    for (name, var) in vars {
        let default = var.get("default").and_then(|v| v.as_str());
        if let Some(enum_vals) = var.get("enum").and_then(|v| v.as_array()) {
            if enum_vals.is_empty() {
                return Err(AppError::Validation(format!(
                    "Server variable '{}' in {} has an empty enum",
                    name, context
                )));
            }
            if let Some(default) = default {
                if !enum_vals.iter().any(|v| v.as_str() == Some(default)) {
                    return Err(AppError::Validation(format!(
                        "Server variable '{}' in {} has default '{}' not in enum",
                        name, context, default
                    )));
                }
            }
        }

        match placeholder_counts.get(name).copied().unwrap_or(0) {
            0 => {
                return Err(AppError::Validation(format!(
                    "Server variable '{}' in {} is not present in URL '{}'",
                    name, context, url
                )))
            }
            1 => {}
            _ => {
                return Err(AppError::Validation(format!(
                    "Server variable '{}' appears more than once in URL '{}' for {}",
                    name, url, context
                )))
            }
        }
    }

    Ok(())
}

fn validate_server_url(url: &str, context: &str) -> AppResult<()> {
    let has_query_or_fragment = url.contains('?')
        || url.contains('#')
        || Url::parse(url).is_ok_and(|u| u.query().is_some() || u.fragment().is_some());
    if has_query_or_fragment {
        return Err(AppError::Validation(format!(
            "Server URL '{}' in {} MUST NOT include query or fragment",
            url, context
        )));
    }
    Ok(())
}
