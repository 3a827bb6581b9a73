#![deny(missing_docs)]

//! # Body Resolution
//!
//! Picks the media type a generated client sends, classifies it and derives
//! the encoding tree of form payloads.
//!
//! Preference: exact media types over wildcard ranges, then JSON, multipart,
//! url-encoded, XML, text and finally anything else.

use crate::analyzer::media;
use crate::analyzer::models::{BodyKind, EncodingConfig, RequestBodyModel};
use crate::analyzer::types::{is_binary_schema, schema_type};
use crate::analyzer::xml::xml_config;
use crate::analyzer::AnalysisContext;
use crate::oas::models::RequestBodyInfo;
use indexmap::IndexMap;
use serde_json::{json, Value};
use url::Url;

/// Nesting limit of encoding trees.
pub const MAX_ENCODING_DEPTH: usize = 5;

const TRANSFER_ENCODING_HEADER: &str = "Content-Transfer-Encoding";

/// Classifies one request media type entry.
pub fn classify_request_media(media_type: &str, entry: &Value) -> BodyKind {
    if media::is_form_data(media_type) {
        BodyKind::FormData
    } else if media::is_multipart(media_type) {
        BodyKind::Multipart
    } else if media::is_url_encoded(media_type) {
        BodyKind::UrlEncoded
    } else if media::is_json(media_type) {
        if entry.get("itemSchema").is_some() {
            BodyKind::JsonLines
        } else {
            BodyKind::Json
        }
    } else if media::is_sequential(media_type) && !media::is_event_stream(media_type) {
        BodyKind::JsonLines
    } else if media::is_xml(media_type) {
        BodyKind::Xml
    } else if media::is_text(media_type) || media::is_event_stream(media_type) || media::is_binary(media_type) {
        BodyKind::Raw
    } else if entry.get("schema").is_some() {
        BodyKind::Json
    } else {
        BodyKind::Raw
    }
}

fn family_rank(kind: BodyKind, media_type: &str) -> usize {
    match kind {
        BodyKind::Json | BodyKind::JsonLines => 0,
        BodyKind::FormData | BodyKind::Multipart => 1,
        BodyKind::UrlEncoded => 2,
        BodyKind::Xml => 3,
        BodyKind::Raw if media::is_text(media_type) => 4,
        BodyKind::Raw => 5,
    }
}

/// Selects the preferred `(media type, entry, kind)` of a content map.
pub fn select_request_media(content: &IndexMap<String, Value>) -> Option<(&str, &Value, BodyKind)> {
    content
        .iter()
        .enumerate()
        .map(|(idx, (media_type, entry))| {
            let kind = classify_request_media(media_type, entry);
            let rank = (media::is_wildcard(media_type), family_rank(kind, media_type), idx);
            (rank, media_type.as_str(), entry, kind)
        })
        .min_by_key(|(rank, ..)| *rank)
        .map(|(_, media_type, entry, kind)| (media_type, entry, kind))
}

/// Builds the request body model of an operation.
pub fn analyze_request_body(
    ctx: &AnalysisContext<'_>,
    body: &RequestBodyInfo,
) -> Option<RequestBodyModel> {
    let (media_type, raw_entry, kind) = select_request_media(&body.content)?;
    let (entry, base) = ctx
        .resolve(raw_entry, &body.base_uri)
        .unwrap_or_else(|| (raw_entry.clone(), body.base_uri.clone()));
    let schema = entry.get("schema");

    let type_name = match kind {
        BodyKind::JsonLines => {
            let item = entry
                .get("itemSchema")
                .or_else(|| schema.and_then(|s| s.get("items")));
            format!("{}[]", wrap_array(&schema_type(ctx, item, &base)))
        }
        BodyKind::Raw if media::is_text(media_type) => "string".to_string(),
        BodyKind::Raw => "Blob".to_string(),
        _ => schema_type(ctx, schema, &base),
    };

    let encoding = match kind {
        BodyKind::UrlEncoded => Some(form_encoding(ctx, schema, &entry, &base, 0, false)),
        BodyKind::FormData | BodyKind::Multipart => {
            Some(form_encoding(ctx, schema, &entry, &base, 0, true))
        }
        _ => None,
    };
    let xml = (kind == BodyKind::Xml).then(|| xml_config(ctx, schema, &base));

    Some(RequestBodyModel {
        media_type: media_type.to_string(),
        kind,
        type_name,
        required: body.required,
        encoding,
        xml,
    })
}

fn wrap_array(ty: &str) -> String {
    if ty.contains(" | ") || ty.contains(" & ") {
        format!("({})", ty)
    } else {
        ty.to_string()
    }
}

/// Builds the encoding tree for `schema`. `holder` is the media type entry
/// (or a parent Encoding Object) carrying `encoding` / `prefixEncoding` /
/// `itemEncoding`.
fn form_encoding(
    ctx: &AnalysisContext<'_>,
    schema: Option<&Value>,
    holder: &Value,
    base: &Url,
    depth: usize,
    multipart: bool,
) -> EncodingConfig {
    let mut config = EncodingConfig::default();
    if depth > MAX_ENCODING_DEPTH {
        return config;
    }
    let Some((schema, base)) = schema.and_then(|s| ctx.resolve(s, base)) else {
        return config;
    };

    let mut property_sources = vec![schema.clone()];
    if let Some(parts) = schema.get("allOf").and_then(|p| p.as_array()) {
        property_sources.extend(parts.iter().filter_map(|p| ctx.resolve(p, &base).map(|(v, _)| v)));
    }
    for source in &property_sources {
        let Some(props) = source.get("properties").and_then(|p| p.as_object()) else {
            continue;
        };
        for (name, prop) in props {
            let explicit = holder.get("encoding").and_then(|e| e.get(name));
            let prop_schema = ctx.resolve(prop, &base).map(|(v, _)| v);
            let mut part = explicit.map(explicit_encoding).unwrap_or_default();
            enrich_from_schema(&mut part, prop_schema.as_ref(), multipart);

            if let Some(explicit) = explicit.filter(|e| has_nested_encoding(e)) {
                let nested = form_encoding(ctx, Some(prop), explicit, &base, depth + 1, multipart);
                part.properties = nested.properties;
                part.prefix_encoding = nested.prefix_encoding;
                part.item_encoding = nested.item_encoding;
            }
            config.properties.insert(name.clone(), part);
        }
    }

    if multipart {
        apply_positional_encoding(&mut config, &schema, holder);
    }
    config
}

/// Tuple-aware part encodings of an array schema.
fn apply_positional_encoding(config: &mut EncodingConfig, schema: &Value, holder: &Value) {
    let items = schema.get("items");
    let items_is_tuple = items.is_some_and(Value::is_array);
    let positions = schema
        .get("prefixItems")
        .and_then(|p| p.as_array())
        .or_else(|| items.and_then(|i| i.as_array()));
    let explicit_prefix = holder.get("prefixEncoding").and_then(|p| p.as_array());

    if let Some(positions) = positions {
        config.prefix_encoding = positions
            .iter()
            .enumerate()
            .map(|(idx, position)| {
                match explicit_prefix.and_then(|p| p.get(idx)) {
                    Some(explicit) => explicit_encoding(explicit),
                    None => {
                        let mut part = EncodingConfig::default();
                        enrich_from_schema(&mut part, Some(position), true);
                        part
                    }
                }
            })
            .collect();
    }

    if let Some(explicit) = holder.get("itemEncoding") {
        config.item_encoding = Some(Box::new(explicit_encoding(explicit)));
    } else if !items_is_tuple {
        if let Some(item) = items.filter(|i| i.is_object()) {
            let mut part = EncodingConfig::default();
            enrich_from_schema(&mut part, Some(item), true);
            config.item_encoding = Some(Box::new(part));
        }
    }
}

fn has_nested_encoding(encoding: &Value) -> bool {
    ["encoding", "prefixEncoding", "itemEncoding"]
        .iter()
        .any(|key| encoding.get(key).is_some())
}

/// Copies an Encoding Object's fields verbatim.
fn explicit_encoding(encoding: &Value) -> EncodingConfig {
    EncodingConfig {
        content_type: encoding
            .get("contentType")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        headers: encoding
            .get("headers")
            .and_then(|h| h.as_object())
            .map(|h| h.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default(),
        style: encoding.get("style").and_then(|v| v.as_str()).map(str::to_string),
        explode: encoding.get("explode").and_then(|v| v.as_bool()),
        allow_reserved: encoding.get("allowReserved").and_then(|v| v.as_bool()),
        ..EncodingConfig::default()
    }
}

/// Fills defaults a property's own schema implies.
///
/// Objects are sent as JSON. In multipart bodies, binary parts default to
/// their `contentMediaType` (or `application/octet-stream`) and primitives
/// to `text/plain`. `contentEncoding: base64` adds a transfer-encoding
/// header unless one is already declared.
fn enrich_from_schema(part: &mut EncodingConfig, schema: Option<&Value>, multipart: bool) {
    let Some(schema) = schema else {
        return;
    };
    let kind = schema.get("type").and_then(|t| t.as_str());
    let is_object = kind == Some("object") || (kind.is_none() && schema.get("properties").is_some());

    if part.content_type.is_none() {
        part.content_type = if is_object || (multipart && kind == Some("array")) {
            Some("application/json".to_string())
        } else if multipart && is_binary_schema(schema) {
            Some(
                schema
                    .get("contentMediaType")
                    .and_then(|m| m.as_str())
                    .unwrap_or("application/octet-stream")
                    .to_string(),
            )
        } else if multipart && kind.is_some() {
            Some("text/plain".to_string())
        } else {
            None
        };
    }

    let is_base64 = schema.get("contentEncoding").and_then(|e| e.as_str()) == Some("base64");
    let has_header = part
        .headers
        .keys()
        .any(|k| k.eq_ignore_ascii_case(TRANSFER_ENCODING_HEADER));
    if is_base64 && !has_header {
        part.headers.insert(
            TRANSFER_ENCODING_HEADER.to_string(),
            json!({"schema": {"type": "string", "const": "base64"}}),
        );
    }
}
