#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Shared helpers for reading `$ref` / `$dynamicRef` values and walking JSON
//! Pointers. `$dynamicRef` is treated as an alternate spelling of `$ref`
//! everywhere a reference marker is checked.

use heck::ToUpperCamelCase;
use percent_encoding::percent_decode_str;
use serde_json::Value;

/// Keys that mark an object as a reference.
pub const REF_KEYS: [&str; 2] = ["$ref", "$dynamicRef"];

/// A reference string split into its document and fragment parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedReference<'a> {
    /// Everything before `#` (empty for same-document references).
    pub document: &'a str,
    /// Everything after `#`, if a `#` is present.
    pub fragment: Option<&'a str>,
}

impl ParsedReference<'_> {
    /// True when the reference targets the current document.
    pub fn is_local(&self) -> bool {
        self.document.is_empty()
    }
}

/// Splits `other.json#/components/schemas/X` into document and fragment.
pub fn parse_reference(ref_str: &str) -> ParsedReference<'_> {
    match ref_str.split_once('#') {
        Some((document, fragment)) => ParsedReference {
            document,
            fragment: Some(fragment),
        },
        None => ParsedReference {
            document: ref_str,
            fragment: None,
        },
    }
}

/// Returns the reference string when `value` is a `$ref` or `$dynamicRef` object.
pub fn reference_of(value: &Value) -> Option<&str> {
    let obj = value.as_object()?;
    REF_KEYS
        .iter()
        .find_map(|key| obj.get(*key).and_then(|v| v.as_str()))
}

/// True when `value` is a reference object.
pub fn is_reference(value: &Value) -> bool {
    reference_of(value).is_some()
}

/// Unescapes a plain JSON Pointer segment (`~1` to `/`, then `~0` to `~`).
pub fn unescape_pointer_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

/// Decodes a pointer segment taken from a URI fragment: percent escapes
/// first, then `~1` and `~0`.
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    unescape_pointer_segment(&decoded)
}

/// Encodes a key for use as a JSON Pointer segment.
pub fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// Splits the JSON Pointer of a `$ref` fragment (with or without a leading
/// `#`) into decoded segments.
///
/// The empty pointer (and `#`, `#/`) yields no segments, i.e. the whole document.
pub fn pointer_segments(pointer: &str) -> Vec<String> {
    split_pointer(pointer, decode_pointer_segment)
}

/// Like [`pointer_segments`] for a plain RFC 6901 pointer: `%` is a literal
/// character, only `~` escapes are decoded.
pub fn plain_pointer_segments(pointer: &str) -> Vec<String> {
    split_pointer(pointer, unescape_pointer_segment)
}

fn split_pointer(pointer: &str, decode: fn(&str) -> String) -> Vec<String> {
    let trimmed = pointer.strip_prefix('#').unwrap_or(pointer);
    if trimmed.is_empty() || trimmed == "/" {
        return Vec::new();
    }
    trimmed
        .strip_prefix('/')
        .unwrap_or(trimmed)
        .split('/')
        .map(decode)
        .collect()
}

/// Walks decoded pointer segments through `root`.
///
/// Objects are indexed by key and arrays by numeric index. Any missing key,
/// non-numeric array index or `null` intermediate yields `None`.
pub fn walk_pointer<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let idx: usize = segment.parse().ok()?;
                items.get(idx)?
            }
            _ => return None,
        };
    }
    Some(current)
}

/// Extracts the simple name from a reference string.
/// e.g. `#/components/schemas/User` -> `User`, `models/weird-name.json` -> `weird-name`
pub fn extract_ref_name(ref_str: &str) -> String {
    let parsed = parse_reference(ref_str);
    let source = match parsed.fragment {
        Some(frag) if !frag.trim_start_matches('/').is_empty() => frag,
        _ => parsed.document,
    };
    let last = source
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let last = decode_pointer_segment(last);
    match last.rsplit_once('.') {
        Some((stem, ext)) if matches!(ext, "json" | "yaml" | "yml") => stem.to_string(),
        _ => last,
    }
}

/// PascalCase identifier for a reference target (`weird-name.json` -> `WeirdName`).
pub fn ref_type_name(ref_str: &str) -> String {
    let name = extract_ref_name(ref_str);
    if name.is_empty() {
        return "Unknown".to_string();
    }
    if name.chars().all(|c| c.is_ascii_alphanumeric()) && name.starts_with(char::is_uppercase) {
        return name;
    }
    name.to_upper_camel_case()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_reference_split() {
        let parsed = parse_reference("other.json#/components/schemas/X");
        assert_eq!(parsed.document, "other.json");
        assert_eq!(parsed.fragment, Some("/components/schemas/X"));
        assert!(!parsed.is_local());

        let local = parse_reference("#/components/schemas/X");
        assert!(local.is_local());
    }

    #[test]
    fn test_reference_of_accepts_dynamic_ref() {
        assert_eq!(
            reference_of(&json!({"$dynamicRef": "#/components/schemas/Node"})),
            Some("#/components/schemas/Node")
        );
        assert!(reference_of(&json!({"type": "string"})).is_none());
        assert!(!is_reference(&json!("$ref")));
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        let encoded = "User%20Profile~1details";
        let decoded = decode_pointer_segment(encoded);
        assert_eq!(decoded, "User Profile/details");
    }

    #[test]
    fn test_pointer_escape_order() {
        // `~01` must decode to `~1`, not `/`.
        assert_eq!(decode_pointer_segment("a~01b"), "a~1b");
        assert_eq!(encode_pointer_segment("a/b~c"), "a~1b~0c");
    }

    #[test]
    fn test_plain_pointer_keeps_percent_literal() {
        assert_eq!(plain_pointer_segments("/a%20b/c~1d"), vec!["a%20b", "c/d"]);
        assert_eq!(pointer_segments("#/a%20b/c~1d"), vec!["a b", "c/d"]);
        // `%7E1` is a literal `~1` once percent-decoded, and then unescapes.
        assert_eq!(decode_pointer_segment("%7E1"), "/");
    }

    #[test]
    fn test_walk_pointer_arrays_and_nulls() {
        let doc = json!({"a": [{"b": 1}], "n": null});
        assert_eq!(
            walk_pointer(&doc, &pointer_segments("/a/0/b")),
            Some(&json!(1))
        );
        assert!(walk_pointer(&doc, &pointer_segments("/a/x")).is_none());
        assert!(walk_pointer(&doc, &pointer_segments("/n/deeper")).is_none());
        assert_eq!(walk_pointer(&doc, &pointer_segments("#")), Some(&doc));
    }

    #[test]
    fn test_ref_type_name() {
        assert_eq!(ref_type_name("#/components/schemas/User"), "User");
        assert_eq!(ref_type_name("https://example.com/weird-name.json"), "WeirdName");
        assert_eq!(ref_type_name("#/definitions/pet_status"), "PetStatus");
    }
}
