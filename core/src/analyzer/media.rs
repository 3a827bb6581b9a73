#![deny(missing_docs)]

//! # Media Types
//!
//! Classification helpers shared by request and response analysis.

/// Lower-cased media type without parameters (`Application/JSON; charset=utf-8` -> `application/json`).
pub fn normalize_media_type(media: &str) -> String {
    media
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// True for `*/*`, `application/*` and similar ranges.
pub fn is_wildcard(media: &str) -> bool {
    normalize_media_type(media).contains('*')
}

/// `application/json`, `+json` suffixes and `vnd.*+json`.
pub fn is_json(media: &str) -> bool {
    let media = normalize_media_type(media);
    media == "application/json" || media == "text/json" || media.ends_with("+json")
}

/// `application/xml`, `text/xml` and `+xml` suffixes.
pub fn is_xml(media: &str) -> bool {
    let media = normalize_media_type(media);
    media == "application/xml" || media == "text/xml" || media.ends_with("+xml")
}

/// Media types representing a stream of same-shaped items.
pub fn is_sequential(media: &str) -> bool {
    let media = normalize_media_type(media);
    matches!(
        media.as_str(),
        "application/jsonl"
            | "application/x-jsonl"
            | "application/x-ndjson"
            | "application/json-seq"
            | "text/event-stream"
            | "multipart/mixed"
    ) || media.ends_with("+json-seq")
}

/// `text/event-stream`.
pub fn is_event_stream(media: &str) -> bool {
    normalize_media_type(media) == "text/event-stream"
}

/// `text/*` (excluding XML, JSON and event streams).
pub fn is_text(media: &str) -> bool {
    let media = normalize_media_type(media);
    media.starts_with("text/") && !is_xml(&media) && !is_json(&media) && !is_event_stream(&media)
}

/// Binary payloads.
pub fn is_binary(media: &str) -> bool {
    let media = normalize_media_type(media);
    matches!(
        media.as_str(),
        "application/octet-stream" | "application/pdf" | "application/zip" | "application/gzip"
    ) || ["image/", "audio/", "video/", "font/"]
        .iter()
        .any(|prefix| media.starts_with(prefix))
}

/// `application/x-www-form-urlencoded`.
pub fn is_url_encoded(media: &str) -> bool {
    normalize_media_type(media) == "application/x-www-form-urlencoded"
}

/// `multipart/form-data`.
pub fn is_form_data(media: &str) -> bool {
    normalize_media_type(media) == "multipart/form-data"
}

/// Any `multipart/*`.
pub fn is_multipart(media: &str) -> bool {
    normalize_media_type(media).starts_with("multipart/")
}
