#![deny(missing_docs)]

//! # Type Mapping
//!
//! Maps schemas to the type expressions emitted into generated clients:
//! `string`, `number`, `boolean`, `Blob`, `any`, `null`, the configured date
//! type, `T[]`, tuples, `Record<string, T>`, inline object literals, and
//! unions / intersections for `oneOf` / `anyOf` / `allOf`.
//!
//! Named component references map to their PascalCase type name. Recursion
//! is bounded at [`MAX_TYPE_DEPTH`]; anything deeper becomes `any`.

use crate::analyzer::AnalysisContext;
use crate::oas::ref_utils::{parse_reference, ref_type_name, reference_of};
use serde_json::Value;
use url::Url;

/// Nesting limit of the type mapper.
pub const MAX_TYPE_DEPTH: usize = 6;

/// Maps `schema` (resolved against `base`) to a type expression.
pub fn schema_type(ctx: &AnalysisContext<'_>, schema: Option<&Value>, base: &Url) -> String {
    map_schema(ctx, schema, base, 0)
}

/// True when a string schema carries binary content.
pub fn is_binary_schema(schema: &Value) -> bool {
    if schema.get("format").and_then(|f| f.as_str()) == Some("binary") {
        return true;
    }
    if schema.get("contentEncoding").is_some() {
        return false;
    }
    schema
        .get("contentMediaType")
        .and_then(|m| m.as_str())
        .is_some_and(crate::analyzer::media::is_binary)
}

/// True when `reference` names a reusable schema (`components/schemas/X`,
/// `definitions/X`, a whole document or a `$id`/anchor).
fn is_named_reference(reference: &str) -> bool {
    let parsed = parse_reference(reference);
    match parsed.fragment {
        None => !parsed.document.is_empty(),
        Some(fragment) if !fragment.starts_with('/') => true,
        Some(fragment) => {
            let segments: Vec<&str> = fragment.trim_start_matches('/').split('/').collect();
            matches!(
                segments.as_slice(),
                ["components", "schemas", _] | ["definitions", _]
            )
        }
    }
}

fn map_schema(ctx: &AnalysisContext<'_>, schema: Option<&Value>, base: &Url, depth: usize) -> String {
    let Some(schema) = schema else {
        return "any".to_string();
    };
    if depth > MAX_TYPE_DEPTH {
        return "any".to_string();
    }
    if let Value::Bool(allowed) = schema {
        let ty = if *allowed { "any" } else { "never" };
        return ty.to_string();
    }

    if let Some(reference) = reference_of(schema) {
        let Some((resolved, target_base)) = ctx.resolve(schema, base) else {
            return "any".to_string();
        };
        if is_named_reference(reference) {
            return ref_type_name(reference);
        }
        return map_schema(ctx, Some(&resolved), &target_base, depth + 1);
    }

    let mapped = map_inline(ctx, schema, base, depth);
    if schema.get("nullable").and_then(|n| n.as_bool()) == Some(true) && !has_null(&mapped) {
        format!("{} | null", mapped)
    } else {
        mapped
    }
}

fn map_inline(ctx: &AnalysisContext<'_>, schema: &Value, base: &Url, depth: usize) -> String {
    if let Some(value) = schema.get("const") {
        return literal(value);
    }
    if let Some(values) = schema.get("enum").and_then(|e| e.as_array()).filter(|e| !e.is_empty()) {
        return union(values.iter().map(literal).collect());
    }

    for key in ["oneOf", "anyOf"] {
        if let Some(members) = schema.get(key).and_then(|m| m.as_array()).filter(|m| !m.is_empty()) {
            return union(
                members
                    .iter()
                    .map(|m| map_schema(ctx, Some(m), base, depth + 1))
                    .collect(),
            );
        }
    }
    if let Some(parts) = schema.get("allOf").and_then(|m| m.as_array()).filter(|m| !m.is_empty()) {
        let mut mapped: Vec<String> = Vec::new();
        for part in parts {
            let ty = map_schema(ctx, Some(part), base, depth + 1);
            if !mapped.contains(&ty) && ty != "any" {
                mapped.push(ty);
            }
        }
        return match mapped.len() {
            0 => "any".to_string(),
            1 => mapped.remove(0),
            _ => mapped.join(" & "),
        };
    }

    match schema.get("type") {
        Some(Value::String(kind)) => map_kind(ctx, kind, schema, base, depth),
        Some(Value::Array(kinds)) => union(
            kinds
                .iter()
                .filter_map(|k| k.as_str())
                .map(|k| map_kind(ctx, k, schema, base, depth))
                .collect(),
        ),
        _ => {
            if schema.get("properties").is_some() || schema.get("additionalProperties").is_some() {
                map_kind(ctx, "object", schema, base, depth)
            } else if schema.get("items").is_some() || schema.get("prefixItems").is_some() {
                map_kind(ctx, "array", schema, base, depth)
            } else {
                "any".to_string()
            }
        }
    }
}

fn map_kind(ctx: &AnalysisContext<'_>, kind: &str, schema: &Value, base: &Url, depth: usize) -> String {
    match kind {
        "string" => {
            let format = schema.get("format").and_then(|f| f.as_str());
            if is_binary_schema(schema) {
                "Blob".to_string()
            } else if matches!(format, Some("date") | Some("date-time")) {
                ctx.date_type().type_name().to_string()
            } else {
                "string".to_string()
            }
        }
        "integer" | "number" => "number".to_string(),
        "boolean" => "boolean".to_string(),
        "null" => "null".to_string(),
        "file" => "Blob".to_string(),
        "array" => map_array(ctx, schema, base, depth),
        "object" => map_object(ctx, schema, base, depth),
        _ => "any".to_string(),
    }
}

fn map_array(ctx: &AnalysisContext<'_>, schema: &Value, base: &Url, depth: usize) -> String {
    let items = schema.get("items");
    let tuple = schema
        .get("prefixItems")
        .and_then(|p| p.as_array())
        .or_else(|| items.and_then(|i| i.as_array()));

    if let Some(positions) = tuple {
        let mut parts: Vec<String> = positions
            .iter()
            .map(|p| map_schema(ctx, Some(p), base, depth + 1))
            .collect();
        if schema.get("prefixItems").is_some() {
            if let Some(rest) = items.filter(|i| i.is_object()) {
                parts.push(format!("...{}[]", wrap(&map_schema(ctx, Some(rest), base, depth + 1))));
            }
        }
        return format!("[{}]", parts.join(", "));
    }

    match items {
        Some(item) => format!("{}[]", wrap(&map_schema(ctx, Some(item), base, depth + 1))),
        None => "any[]".to_string(),
    }
}

fn map_object(ctx: &AnalysisContext<'_>, schema: &Value, base: &Url, depth: usize) -> String {
    let required: Vec<&str> = schema
        .get("required")
        .and_then(|r| r.as_array())
        .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
        .unwrap_or_default();

    let fields: Vec<String> = schema
        .get("properties")
        .and_then(|p| p.as_object())
        .map(|props| {
            props
                .iter()
                .map(|(name, prop)| {
                    let optional = if required.contains(&name.as_str()) { "" } else { "?" };
                    format!(
                        "{}{}: {}",
                        property_key(name),
                        optional,
                        map_schema(ctx, Some(prop), base, depth + 1)
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    let mut extra: Vec<String> = Vec::new();
    match schema.get("additionalProperties") {
        Some(Value::Bool(true)) => extra.push("any".to_string()),
        Some(additional @ Value::Object(_)) => {
            extra.push(map_schema(ctx, Some(additional), base, depth + 1))
        }
        _ => {}
    }
    if let Some(patterns) = schema.get("patternProperties").and_then(|p| p.as_object()) {
        for pattern_schema in patterns.values() {
            extra.push(map_schema(ctx, Some(pattern_schema), base, depth + 1));
        }
    }
    let extra = (!extra.is_empty()).then(|| union(extra));

    match (fields.is_empty(), extra) {
        (true, Some(value)) => format!("Record<string, {}>", value),
        (true, None) => "Record<string, any>".to_string(),
        (false, Some(value)) => format!("{{ {}; [key: string]: {} }}", fields.join("; "), value),
        (false, None) => format!("{{ {} }}", fields.join("; ")),
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{}'", s.replace('\'', "\\'")),
        other => other.to_string(),
    }
}

fn union(mut members: Vec<String>) -> String {
    let mut seen = Vec::new();
    members.retain(|m| {
        if seen.contains(m) {
            false
        } else {
            seen.push(m.clone());
            true
        }
    });
    if members.iter().any(|m| m == "any") {
        return "any".to_string();
    }
    match members.len() {
        0 => "any".to_string(),
        _ => members.join(" | "),
    }
}

fn has_null(ty: &str) -> bool {
    ty == "null" || ty.ends_with(" | null")
}

fn wrap(ty: &str) -> String {
    if ty.contains(" | ") || ty.contains(" & ") {
        format!("({})", ty)
    } else {
        ty.to_string()
    }
}

fn property_key(name: &str) -> String {
    let mut chars = name.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "\\'"))
    }
}
