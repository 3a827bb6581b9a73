#![deny(missing_docs)]

//! # Response Resolution
//!
//! Models the successful responses of an operation as a list of variants
//! (one per media type, merged across every 2xx code, most specific code
//! first) and classifies error responses by content family.

use crate::analyzer::media;
use crate::analyzer::models::{
    BodyKind, ErrorBodyKind, ErrorResponseModel, ResponseVariant, SseMode,
};
use crate::analyzer::types::schema_type;
use crate::analyzer::xml::xml_config;
use crate::analyzer::AnalysisContext;
use crate::oas::models::ResolvedResponse;
use indexmap::IndexMap;
use serde_json::Value;
use url::Url;

/// Response side of an operation model.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseAnalysis {
    /// Successful response variants.
    pub variants: Vec<ResponseVariant>,
    /// Union of the variant types (`void` when empty).
    pub return_type: String,
    /// Framing of the first event-stream variant.
    pub sse_mode: Option<SseMode>,
    /// Non-2xx responses.
    pub errors: Vec<ErrorResponseModel>,
}

/// `200`, `204`, `2XX`, ...
pub fn is_success_status(status: &str) -> bool {
    status.starts_with('2')
}

/// Analyzes the response map of an operation.
pub fn analyze_responses(
    ctx: &AnalysisContext<'_>,
    responses: &IndexMap<String, ResolvedResponse>,
) -> ResponseAnalysis {
    let mut success: Vec<&ResolvedResponse> = responses
        .values()
        .filter(|r| is_success_status(&r.status))
        .collect();
    // Concrete codes before ranges; stable otherwise.
    success.sort_by_key(|r| !r.status.chars().all(|c| c.is_ascii_digit()));

    let mut variants: Vec<ResponseVariant> = Vec::new();
    for response in success {
        for (media_type, entry) in &response.content {
            if variants.iter().any(|v| &v.media_type == media_type) {
                continue;
            }
            variants.push(response_variant(
                ctx,
                &response.status,
                media_type,
                entry,
                &response.base_uri,
            ));
        }
    }

    let mut types: Vec<&str> = Vec::new();
    for variant in &variants {
        if !types.contains(&variant.type_name.as_str()) {
            types.push(&variant.type_name);
        }
    }
    let return_type = if types.is_empty() {
        "void".to_string()
    } else {
        types.join(" | ")
    };

    let errors = responses
        .values()
        .filter(|r| !is_success_status(&r.status))
        .map(|r| ErrorResponseModel {
            status: r.status.clone(),
            kind: classify_error(r),
        })
        .collect();

    ResponseAnalysis {
        sse_mode: variants.iter().find_map(|v| v.sse_mode),
        variants,
        return_type,
        errors,
    }
}

/// `void` without content, `Blob` when every media type is binary, `string` otherwise.
pub fn classify_error(response: &ResolvedResponse) -> ErrorBodyKind {
    if response.content.is_empty() {
        ErrorBodyKind::Void
    } else if response.content.keys().all(|m| media::is_binary(m)) {
        ErrorBodyKind::Blob
    } else {
        ErrorBodyKind::String
    }
}

fn response_variant(
    ctx: &AnalysisContext<'_>,
    status: &str,
    media_type: &str,
    raw_entry: &Value,
    base: &Url,
) -> ResponseVariant {
    let (entry, base) = ctx
        .resolve(raw_entry, base)
        .unwrap_or_else(|| (raw_entry.clone(), base.clone()));
    let schema = entry.get("schema");
    let item_schema = entry.get("itemSchema");

    let mut variant = ResponseVariant {
        status: status.to_string(),
        media_type: media_type.to_string(),
        type_name: "any".to_string(),
        kind: BodyKind::Json,
        sequential: false,
        sse_mode: None,
        xml: None,
    };

    if media::is_sequential(media_type) || item_schema.is_some() {
        let item = item_schema.cloned().or_else(|| sequence_item(ctx, schema, &base));
        let item_type = schema_type(ctx, item.as_ref(), &base);
        variant.type_name = if item_type.contains(" | ") || item_type.contains(" & ") {
            format!("({})[]", item_type)
        } else {
            format!("{}[]", item_type)
        };
        variant.sequential = true;
        variant.kind = if media::is_multipart(media_type) {
            BodyKind::Multipart
        } else {
            BodyKind::JsonLines
        };
        if media::is_event_stream(media_type) {
            variant.sse_mode = Some(sse_mode(ctx, item.as_ref(), &base));
        }
    } else if media::is_json(media_type) {
        variant.type_name = schema_type(ctx, schema, &base);
    } else if media::is_xml(media_type) {
        variant.kind = BodyKind::Xml;
        variant.type_name = match schema {
            Some(_) => schema_type(ctx, schema, &base),
            None => "string".to_string(),
        };
        variant.xml = Some(xml_config(ctx, schema, &base));
    } else if media::is_text(media_type) {
        variant.kind = BodyKind::Raw;
        variant.type_name = "string".to_string();
    } else if media::is_binary(media_type) || schema.is_none() {
        variant.kind = BodyKind::Raw;
        variant.type_name = "Blob".to_string();
    } else {
        variant.type_name = schema_type(ctx, schema, &base);
    }
    variant
}

/// The repeated item of a sequence declared through `schema`: its `items`
/// when it is an array, the schema itself otherwise.
fn sequence_item(ctx: &AnalysisContext<'_>, schema: Option<&Value>, base: &Url) -> Option<Value> {
    let raw = schema?;
    let (resolved, _) = ctx.resolve(raw, base)?;
    match resolved.get("items").filter(|i| i.is_object()) {
        Some(items) if resolved.get("type").and_then(|t| t.as_str()) == Some("array") => Some(items.clone()),
        _ => Some(raw.clone()),
    }
}

/// `event` mode when the item exposes both `data` and `event` properties.
fn sse_mode(ctx: &AnalysisContext<'_>, item: Option<&Value>, base: &Url) -> SseMode {
    let resolved = item.and_then(|i| ctx.resolve(i, base)).map(|(v, _)| v);
    let has = |name: &str| {
        resolved
            .as_ref()
            .and_then(|v| v.get("properties"))
            .is_some_and(|p| p.get(name).is_some())
    };
    if has("data") && has("event") {
        SseMode::Event
    } else {
        SseMode::Data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DateType;
    use crate::oas::document::Document;
    use crate::oas::registry::DocumentCache;
    use crate::oas::resolver::Resolver;
    use serde_json::json;

    fn response(status: &str, content: Value) -> (String, ResolvedResponse) {
        (
            status.to_string(),
            ResolvedResponse {
                status: status.to_string(),
                description: None,
                content: content
                    .as_object()
                    .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                    .unwrap_or_default(),
                headers: IndexMap::new(),
                links: IndexMap::new(),
                base_uri: Url::parse("https://example.com/api.json").unwrap(),
            },
        )
    }

    fn analyze(responses: Vec<(String, ResolvedResponse)>) -> ResponseAnalysis {
        let uri = Url::parse("https://example.com/api.json").unwrap();
        let mut cache = DocumentCache::new();
        cache.insert(Document::new(
            uri.clone(),
            json!({"components": {"schemas": {
                "User": {"type": "object", "xml": {"name": "user"}},
                "Event": {"type": "object", "properties": {"data": {"type": "string"}, "event": {"type": "string"}}}
            }}}),
        ));
        let ctx = AnalysisContext::new(Resolver::new(&cache, &uri), DateType::String);
        analyze_responses(&ctx, &responses.into_iter().collect())
    }

    #[test]
    fn test_variants_merge_all_success_codes() {
        let result = analyze(vec![
            response("2XX", json!({"text/plain": {"schema": {"type": "string"}}})),
            response("201", json!({"application/json": {"schema": {"$ref": "#/components/schemas/User"}}})),
            response("200", json!({
                "application/json": {"schema": {"type": "string"}},
                "application/xml": {"schema": {"$ref": "#/components/schemas/User"}}
            })),
        ]);
        let media: Vec<_> = result
            .variants
            .iter()
            .map(|v| (v.status.as_str(), v.media_type.as_str()))
            .collect();
        assert_eq!(
            media,
            vec![("201", "application/json"), ("200", "application/xml"), ("2XX", "text/plain")]
        );
        assert_eq!(result.return_type, "User | string");
        assert_eq!(
            result.variants[1].xml.as_ref().and_then(|x| x.name.as_deref()),
            Some("user")
        );
    }

    #[test]
    fn test_sequential_and_sse_modes() {
        let result = analyze(vec![response("200", json!({
            "application/x-ndjson": {"itemSchema": {"$ref": "#/components/schemas/User"}},
            "text/event-stream": {"itemSchema": {"$ref": "#/components/schemas/Event"}}
        }))]);
        assert_eq!(result.variants[0].type_name, "User[]");
        assert_eq!(result.variants[0].kind, BodyKind::JsonLines);
        assert_eq!(result.variants[1].sse_mode, Some(SseMode::Event));
        assert_eq!(result.sse_mode, Some(SseMode::Event));

        let data = analyze(vec![response("200", json!({
            "text/event-stream": {"schema": {"type": "array", "items": {"type": "string"}}}
        }))]);
        assert_eq!(data.variants[0].type_name, "string[]");
        assert_eq!(data.sse_mode, Some(SseMode::Data));
    }

    #[test]
    fn test_no_content_is_void_and_errors_are_classified() {
        let result = analyze(vec![
            response("204", json!({})),
            response("401", json!({})),
            response("404", json!({"application/problem+json": {"schema": {"type": "object"}}})),
            response("500", json!({"application/octet-stream": {}})),
            response("default", json!({"text/html": {}})),
        ]);
        assert!(result.variants.is_empty());
        assert_eq!(result.return_type, "void");
        let kinds: Vec<_> = result.errors.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![ErrorBodyKind::Void, ErrorBodyKind::String, ErrorBodyKind::Blob, ErrorBodyKind::String]
        );
    }
}
