#![deny(missing_docs)]

//! # Reference Resolver
//!
//! Follows `$ref` / `$dynamicRef` pointers across the cached document set.
//!
//! - Chains are followed transitively (`A -> B -> C` yields `C`).
//! - Cycles are detected with a visited set and a hop cap, logged, and yield `None`.
//! - Sibling keys next to a `$ref` override the target's keys; outer
//!   references win over inner ones. Cached targets are never mutated.
//! - A missing pointer segment logs a warning and yields `None`, which callers
//!   treat as "feature absent".

use crate::oas::registry::{cache_key, DocumentCache};
use crate::oas::ref_utils::{parse_reference, pointer_segments, reference_of, walk_pointer, REF_KEYS};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;
use url::Url;

/// Upper bound on references followed for one resolution.
const MAX_REF_HOPS: usize = 32;

/// A resolved value together with the document it was found in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedNode {
    /// The resolved (non-reference) value, sibling overrides applied.
    pub value: Value,
    /// Base URI for references nested in `value`.
    pub base_uri: Url,
    /// Retrieval URI of the document holding `value`.
    pub retrieval_uri: Url,
}

/// Resolves references against a `DocumentCache`.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    cache: &'a DocumentCache,
    root: &'a Url,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver whose default base is `root` (the root document's base URI).
    pub fn new(cache: &'a DocumentCache, root: &'a Url) -> Self {
        Self { cache, root }
    }

    /// The cache this resolver reads from.
    pub fn cache(&self) -> &DocumentCache {
        self.cache
    }

    /// Resolves `node` relative to the root document.
    ///
    /// Non-reference nodes are returned unchanged.
    pub fn resolve(&self, node: &Value) -> Option<Value> {
        self.resolve_from(node, self.root).map(|resolved| resolved.value)
    }

    /// Resolves a raw reference string (`#/a/b`, `other.json#/a`, `$id` URIs) relative to the root document.
    pub fn resolve_reference(&self, reference: &str) -> Option<Value> {
        self.resolve_reference_from(reference, self.root)
            .map(|resolved| resolved.value)
    }

    /// Resolves a raw reference string relative to `base`.
    pub fn resolve_reference_from(&self, reference: &str, base: &Url) -> Option<ResolvedNode> {
        let mut node = Map::new();
        node.insert("$ref".to_string(), Value::String(reference.to_string()));
        self.resolve_from(&Value::Object(node), base)
    }

    /// Resolves `node` relative to `base`, returning where the final value lives.
    pub fn resolve_from(&self, node: &Value, base: &Url) -> Option<ResolvedNode> {
        let Some(first_ref) = reference_of(node) else {
            let retrieval_uri = self
                .cache
                .get(base)
                .map(|doc| doc.retrieval_uri().clone())
                .unwrap_or_else(|| base.clone());
            return Some(ResolvedNode {
                value: node.clone(),
                base_uri: base.clone(),
                retrieval_uri,
            });
        };

        let mut overlays: Vec<&Map<String, Value>> = Vec::new();
        if let Some(obj) = node.as_object() {
            overlays.push(obj);
        }

        let mut visited = HashSet::new();
        let mut reference = first_ref;
        let mut current_base = base.clone();

        for _ in 0..MAX_REF_HOPS {
            let (target, target_base, retrieval_uri, key) =
                self.locate(reference, &current_base)?;

            if !visited.insert(key.clone()) {
                warn!(reference = %reference, target = %key, "circular $ref chain");
                return None;
            }

            match reference_of(target) {
                Some(next) => {
                    if let Some(obj) = target.as_object() {
                        overlays.push(obj);
                    }
                    reference = next;
                    current_base = target_base;
                }
                None => {
                    return Some(ResolvedNode {
                        value: apply_overlays(target, &overlays),
                        base_uri: target_base,
                        retrieval_uri,
                    });
                }
            }
        }

        warn!(reference = %first_ref, "reference chain exceeds {} hops", MAX_REF_HOPS);
        None
    }

    /// Finds the value a single reference points at, without following further refs.
    fn locate(&self, reference: &str, base: &Url) -> Option<(&'a Value, Url, Url, String)> {
        let parsed = parse_reference(reference);
        let doc_uri = if parsed.is_local() {
            base.clone()
        } else {
            match base.join(parsed.document) {
                Ok(url) => url,
                Err(e) => {
                    warn!(reference = %reference, base = %base, error = %e, "invalid $ref URI");
                    return None;
                }
            }
        };

        let absolute = match parsed.fragment {
            Some(fragment) => format!("{}#{}", cache_key(&doc_uri), fragment),
            None => cache_key(&doc_uri),
        };

        // `$id` / `$anchor` identities take priority over document lookups.
        if let Some(location) = self.cache.lookup_schema_id(&absolute) {
            if let Some(doc) = self.cache.get_by_key(&location.document) {
                if let Some(value) = walk_pointer(doc.root(), &pointer_segments(&location.pointer)) {
                    return Some((
                        value,
                        doc.base_uri().clone(),
                        doc.retrieval_uri().clone(),
                        absolute,
                    ));
                }
            }
        }

        let Some(doc) = self.cache.get(&doc_uri) else {
            warn!(reference = %reference, document = %doc_uri, "referenced document is not loaded");
            return None;
        };

        let fragment = parsed.fragment.unwrap_or_default();
        if !fragment.is_empty() && !fragment.starts_with('/') {
            warn!(reference = %reference, "unknown anchor in $ref");
            return None;
        }

        match walk_pointer(doc.root(), &pointer_segments(fragment)) {
            Some(value) => Some((
                value,
                doc.base_uri().clone(),
                doc.retrieval_uri().clone(),
                absolute,
            )),
            None => {
                warn!(reference = %reference, document = %doc_uri, "unresolvable $ref path");
                None
            }
        }
    }
}

/// Clones `target` and layers sibling keys on top, innermost first.
fn apply_overlays(target: &Value, overlays: &[&Map<String, Value>]) -> Value {
    let Value::Object(target_map) = target else {
        return target.clone();
    };
    let mut merged = target_map.clone();
    for overlay in overlays.iter().rev() {
        for (key, value) in overlay.iter() {
            if REF_KEYS.contains(&key.as_str()) {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::document::Document;
    use serde_json::json;

    fn cache_with(docs: Vec<(&str, Value)>) -> DocumentCache {
        let mut cache = DocumentCache::new();
        for (uri, value) in docs {
            cache.insert(Document::new(Url::parse(uri).unwrap(), value));
        }
        cache.index_schema_ids();
        cache
    }

    const ROOT: &str = "https://example.com/api/openapi.json";

    #[test]
    fn test_non_reference_is_identity() {
        let cache = cache_with(vec![(ROOT, json!({}))]);
        let root = Url::parse(ROOT).unwrap();
        let resolver = Resolver::new(&cache, &root);
        let node = json!({"type": "string", "minLength": 2});
        assert_eq!(resolver.resolve(&node), Some(node.clone()));
    }

    #[test]
    fn test_transitive_chain() {
        let cache = cache_with(vec![(
            ROOT,
            json!({"components": {"schemas": {
                "A": {"$ref": "#/components/schemas/B"},
                "B": {"$ref": "#/components/schemas/C"},
                "C": {"type": "string"}
            }}}),
        )]);
        let root = Url::parse(ROOT).unwrap();
        let resolver = Resolver::new(&cache, &root);
        assert_eq!(
            resolver.resolve(&json!({"$ref": "#/components/schemas/A"})),
            Some(json!({"type": "string"}))
        );
    }

    #[test]
    fn test_cycle_terminates_with_none() {
        let cache = cache_with(vec![(
            ROOT,
            json!({"components": {"schemas": {
                "A": {"$ref": "#/components/schemas/B"},
                "B": {"$ref": "#/components/schemas/A"}
            }}}),
        )]);
        let root = Url::parse(ROOT).unwrap();
        let resolver = Resolver::new(&cache, &root);
        assert_eq!(resolver.resolve(&json!({"$ref": "#/components/schemas/A"})), None);
    }

    #[test]
    fn test_sibling_override_leaves_target_untouched() {
        let cache = cache_with(vec![(
            ROOT,
            json!({"components": {"schemas": {
                "Target": {"type": "string", "description": "Original"}
            }}}),
        )]);
        let root = Url::parse(ROOT).unwrap();
        let resolver = Resolver::new(&cache, &root);
        let resolved = resolver
            .resolve(&json!({"$ref": "#/components/schemas/Target", "description": "Overridden"}))
            .unwrap();
        assert_eq!(resolved, json!({"type": "string", "description": "Overridden"}));
        assert_eq!(
            resolver.resolve_reference("#/components/schemas/Target"),
            Some(json!({"type": "string", "description": "Original"}))
        );
    }

    #[test]
    fn test_missing_segment_and_null_intermediate() {
        let cache = cache_with(vec![(ROOT, json!({"components": {"schemas": null}}))]);
        let root = Url::parse(ROOT).unwrap();
        let resolver = Resolver::new(&cache, &root);
        assert!(resolver.resolve_reference("#/components/schemas/X").is_none());
        assert!(resolver.resolve_reference("#/nothing/here").is_none());
    }

    #[test]
    fn test_escaped_pointer_segments() {
        let cache = cache_with(vec![(
            ROOT,
            json!({"paths": {"/users/{id}": {"get": {"operationId": "getUser"}}, "a~b": 1}}),
        )]);
        let root = Url::parse(ROOT).unwrap();
        let resolver = Resolver::new(&cache, &root);
        assert_eq!(
            resolver.resolve_reference("#/paths/~1users~1{id}/get/operationId"),
            Some(json!("getUser"))
        );
        assert_eq!(resolver.resolve_reference("#/paths/a~0b"), Some(json!(1)));
    }

    #[test]
    fn test_dynamic_ref_and_cross_document() {
        let cache = cache_with(vec![
            (
                ROOT,
                json!({"components": {"schemas": {
                    "Local": {"$dynamicRef": "models/user.json#/components/schemas/User"}
                }}}),
            ),
            (
                "https://example.com/api/models/user.json",
                json!({"components": {"schemas": {
                    "User": {"properties": {"address": {"$ref": "#/components/schemas/Address"}}},
                    "Address": {"type": "object"}
                }}}),
            ),
        ]);
        let root = Url::parse(ROOT).unwrap();
        let resolver = Resolver::new(&cache, &root);
        let node = resolver
            .resolve_from(&json!({"$ref": "#/components/schemas/Local"}), &root)
            .unwrap();
        assert_eq!(
            node.base_uri.as_str(),
            "https://example.com/api/models/user.json"
        );
        let address = resolver
            .resolve_from(&node.value["properties"]["address"], &node.base_uri)
            .unwrap();
        assert_eq!(address.value, json!({"type": "object"}));
    }

    #[test]
    fn test_resolve_by_schema_id() {
        let cache = cache_with(vec![(
            ROOT,
            json!({"components": {"schemas": {
                "Pet": {"$id": "https://schemas.example.com/pet", "type": "object"}
            }}}),
        )]);
        let root = Url::parse(ROOT).unwrap();
        let resolver = Resolver::new(&cache, &root);
        let pet = resolver.resolve_reference("https://schemas.example.com/pet").unwrap();
        assert_eq!(pet["type"], json!("object"));
    }
}
