#![deny(missing_docs)]

//! # Document Registry
//!
//! The per-run multi-document cache. Documents are keyed by absolute URI
//! (fragment removed) and also reachable under their `$self` base URI.
//!
//! The cache is an explicit value owned by one generation run and threaded
//! into the resolver; there is no process-wide state.

use crate::error::AppResult;
use crate::oas::document::{load_document, Document, DocumentFetcher};
use crate::oas::ref_utils::{encode_pointer_segment, parse_reference, REF_KEYS};
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, warn};
use url::Url;

/// Depth bound when walking documents for ids and references.
const MAX_INDEX_DEPTH: usize = 64;

/// Keywords whose values are literal data, not schemas.
const DATA_KEYWORDS: [&str; 5] = ["default", "example", "examples", "enum", "const"];

/// Maps keyed by user-chosen names (properties, components, paths, status codes).
const NAMED_MAPS: [&str; 19] = [
    "properties",
    "patternProperties",
    "dependentSchemas",
    "$defs",
    "definitions",
    "paths",
    "webhooks",
    "responses",
    "schemas",
    "parameters",
    "requestBodies",
    "headers",
    "links",
    "callbacks",
    "securitySchemes",
    "pathItems",
    "mediaTypes",
    "content",
    "encoding",
];

/// True when `key` holds literal data: a data keyword outside a name-keyed map.
fn is_data_keyword(key: &str, parent: Option<&str>) -> bool {
    DATA_KEYWORDS.contains(&key) && !parent.is_some_and(|p| NAMED_MAPS.contains(&p))
}

/// Where a schema identified by `$id`, `$anchor` or component path lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaLocation {
    /// Cache key of the document holding the schema.
    pub document: String,
    /// JSON Pointer (without `#`) to the schema inside that document.
    pub pointer: String,
}

/// Multi-document cache plus cross-document schema index.
#[derive(Debug, Default, Clone)]
pub struct DocumentCache {
    docs: HashMap<String, Document>,
    aliases: HashMap<String, String>,
    order: Vec<String>,
    schema_ids: HashMap<String, SchemaLocation>,
}

/// Normalizes a URL into a cache key (fragment removed).
pub fn cache_key(uri: &Url) -> String {
    let mut uri = uri.clone();
    uri.set_fragment(None);
    uri.to_string()
}

impl DocumentCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a document, keyed by its retrieval URI and aliased by its base URI.
    ///
    /// Returns the cache key. Re-inserting a known URI keeps the first document.
    pub fn insert(&mut self, document: Document) -> String {
        let key = cache_key(document.retrieval_uri());
        let alias = cache_key(document.base_uri());
        if self.docs.contains_key(&key) {
            return key;
        }
        if alias != key {
            self.aliases.entry(alias).or_insert_with(|| key.clone());
        }
        self.order.push(key.clone());
        self.docs.insert(key.clone(), document);
        key
    }

    /// Looks a document up by any URI it is known under.
    pub fn get(&self, uri: &Url) -> Option<&Document> {
        self.get_by_key(&cache_key(uri))
    }

    /// Looks a document up by cache key or alias.
    pub fn get_by_key(&self, key: &str) -> Option<&Document> {
        self.docs
            .get(key)
            .or_else(|| self.aliases.get(key).and_then(|k| self.docs.get(k)))
    }

    /// True when a document is cached under `uri`.
    pub fn contains(&self, uri: &Url) -> bool {
        self.get(uri).is_some()
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Cached documents in insertion order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.order.iter().filter_map(|key| self.docs.get(key))
    }

    /// Loads every document transitively referenced from the cached set.
    ///
    /// Each absolute URI is fetched and parsed at most once.
    pub fn preload(&mut self, fetcher: &dyn DocumentFetcher) -> AppResult<()> {
        let mut queue: VecDeque<String> = self.order.iter().cloned().collect();
        let mut scanned: HashSet<String> = HashSet::new();

        while let Some(key) = queue.pop_front() {
            if !scanned.insert(key.clone()) {
                continue;
            }
            let Some(doc) = self.docs.get(&key) else {
                continue;
            };

            let mut refs = Vec::new();
            collect_reference_strings(doc.root(), &mut refs, None, 0);
            let base = doc.base_uri().clone();

            for reference in refs {
                let parsed = parse_reference(&reference);
                if parsed.is_local() {
                    continue;
                }
                let target = match base.join(parsed.document) {
                    Ok(url) => url,
                    Err(e) => {
                        warn!(reference = %reference, base = %base, error = %e, "unresolvable external reference");
                        continue;
                    }
                };
                if self.contains(&target) {
                    debug!(uri = %target, "document cache hit");
                    continue;
                }
                let loaded = load_document(&target, fetcher)?;
                let loaded_key = self.insert(loaded);
                queue.push_back(loaded_key);
            }
        }

        Ok(())
    }

    /// Records every locally defined schema of every cached document.
    ///
    /// Component paths, `$id` values and anchors become absolute URIs in the
    /// lookup. Duplicate simple names across documents are reported.
    pub fn index_schema_ids(&mut self) {
        let mut ids = HashMap::new();
        let mut names: HashMap<String, (String, String)> = HashMap::new();

        for key in &self.order {
            let Some(doc) = self.docs.get(key) else {
                continue;
            };
            let base = doc.base_uri().clone();

            for (section_ptr, section) in schema_sections(doc.root()) {
                for (name, schema) in section {
                    let pointer = format!("{}/{}", section_ptr, encode_pointer_segment(name));
                    let location = SchemaLocation {
                        document: key.clone(),
                        pointer: pointer.clone(),
                    };
                    ids.insert(format!("{}#{}", cache_key(&base), pointer), location);
                    collect_schema_ids(schema, &base, key, &pointer, &mut ids, None, 0);

                    let normalized = normalize_schema_name(name);
                    match names.get(&normalized) {
                        Some((other_doc, other_name)) if other_doc != key => {
                            warn!(
                                schema = %name,
                                duplicate_of = %other_name,
                                document = %key,
                                other_document = %other_doc,
                                "duplicate schema name across documents"
                            );
                        }
                        Some(_) => {}
                        None => {
                            names.insert(normalized, (key.clone(), name.clone()));
                        }
                    }
                }
            }

            // Standalone schema documents carry their identity at the root.
            if doc.root().get("$id").is_some() && schema_sections(doc.root()).is_empty() {
                collect_schema_ids(doc.root(), &base, key, "", &mut ids, None, 0);
            }
        }

        self.schema_ids = ids;
    }

    /// Looks up a schema by absolute URI (component path, `$id` or anchor).
    pub fn lookup_schema_id(&self, uri: &str) -> Option<&SchemaLocation> {
        self.schema_ids.get(uri)
    }

    /// Number of indexed schema identities.
    pub fn indexed_schema_count(&self) -> usize {
        self.schema_ids.len()
    }
}

fn schema_sections(root: &Value) -> Vec<(&'static str, &serde_json::Map<String, Value>)> {
    let mut sections = Vec::new();
    if let Some(map) = root
        .pointer("/components/schemas")
        .and_then(|v| v.as_object())
    {
        sections.push(("/components/schemas", map));
    }
    if let Some(map) = root.get("definitions").and_then(|v| v.as_object()) {
        sections.push(("/definitions", map));
    }
    sections
}

/// `UserModel`, `user_model` and `user-model` all normalize to `usermodel`.
fn normalize_schema_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | '.'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn collect_schema_ids(
    schema: &Value,
    base: &Url,
    doc_key: &str,
    pointer: &str,
    ids: &mut HashMap<String, SchemaLocation>,
    parent: Option<&str>,
    depth: usize,
) {
    if depth > MAX_INDEX_DEPTH {
        return;
    }
    let location = || SchemaLocation {
        document: doc_key.to_string(),
        pointer: pointer.to_string(),
    };

    let mut scope = base.clone();
    match schema {
        Value::Object(map) => {
            if let Some(id) = map.get("$id").and_then(|v| v.as_str()) {
                if let Ok(resolved) = base.join(id) {
                    ids.insert(resolved.to_string(), location());
                    scope = resolved;
                }
            }
            for key in ["$anchor", "$dynamicAnchor"] {
                if let Some(anchor) = map.get(key).and_then(|v| v.as_str()) {
                    let anchor = anchor.trim();
                    if !anchor.is_empty() {
                        ids.insert(format!("{}#{}", cache_key(&scope), anchor), location());
                    }
                }
            }
            for (key, child) in map {
                if is_data_keyword(key, parent) {
                    continue;
                }
                let child_ptr = format!("{}/{}", pointer, encode_pointer_segment(key));
                collect_schema_ids(child, &scope, doc_key, &child_ptr, ids, Some(key.as_str()), depth + 1);
            }
        }
        Value::Array(items) => {
            for (idx, child) in items.iter().enumerate() {
                let child_ptr = format!("{}/{}", pointer, idx);
                collect_schema_ids(child, &scope, doc_key, &child_ptr, ids, None, depth + 1);
            }
        }
        _ => {}
    }
}

fn collect_reference_strings(value: &Value, out: &mut Vec<String>, parent: Option<&str>, depth: usize) {
    if depth > MAX_INDEX_DEPTH {
        return;
    }
    match value {
        Value::Object(map) => {
            for key in REF_KEYS {
                if let Some(reference) = map.get(key).and_then(|v| v.as_str()) {
                    out.push(reference.to_string());
                }
            }
            for (key, child) in map {
                if is_data_keyword(key, parent) {
                    continue;
                }
                collect_reference_strings(child, out, Some(key.as_str()), depth + 1);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_reference_strings(child, out, None, depth + 1);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use serde_json::json;
    use std::cell::RefCell;

    struct MapFetcher {
        files: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl DocumentFetcher for MapFetcher {
        fn fetch(&self, uri: &Url) -> AppResult<String> {
            self.calls.borrow_mut().push(uri.to_string());
            self.files
                .get(uri.as_str())
                .cloned()
                .ok_or_else(|| AppError::Load(format!("Input file not found: {}", uri)))
        }
    }

    fn root_doc(value: Value) -> Document {
        Document::new(Url::parse("https://example.com/api/main.json").unwrap(), value)
    }

    #[test]
    fn test_preload_fetches_each_document_once() {
        let fetcher = MapFetcher {
            files: HashMap::from([
                (
                    "https://example.com/api/schemas.json".to_string(),
                    json!({"components": {"schemas": {
                        "User": {"type": "object"},
                        "Group": {"properties": {"owner": {"$ref": "#/components/schemas/User"}}}
                    }}})
                    .to_string(),
                ),
            ]),
            calls: RefCell::new(Vec::new()),
        };

        let mut cache = DocumentCache::new();
        cache.insert(root_doc(json!({
            "a": {"$ref": "./schemas.json#/components/schemas/User"},
            "b": {"$ref": "schemas.json#/components/schemas/Group"}
        })));
        cache.preload(&fetcher).unwrap();

        assert_eq!(cache.len(), 2);
        assert_eq!(fetcher.calls.borrow().len(), 1);
    }

    #[test]
    fn test_preload_propagates_missing_document() {
        let fetcher = MapFetcher {
            files: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        };
        let mut cache = DocumentCache::new();
        cache.insert(root_doc(json!({"a": {"$ref": "missing.yaml#/X"}})));
        let err = cache.preload(&fetcher).unwrap_err();
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_preload_follows_refs_under_keyword_named_properties() {
        let fetcher = MapFetcher {
            files: HashMap::from([
                (
                    "https://example.com/api/other.json".to_string(),
                    json!({"Profile": {"type": "string"}}).to_string(),
                ),
                (
                    "https://example.com/api/errors.json".to_string(),
                    json!({"Error": {"description": "failure"}}).to_string(),
                ),
            ]),
            calls: RefCell::new(Vec::new()),
        };

        let mut cache = DocumentCache::new();
        cache.insert(root_doc(json!({
            "components": {"schemas": {"User": {
                "type": "object",
                "properties": {"default": {"$ref": "other.json#/Profile"}},
                "default": {"$ref": "literal.json#/NotAReference"}
            }}},
            "paths": {"/a": {"get": {"responses": {
                "default": {"$ref": "errors.json#/Error"}
            }}}}
        })));
        cache.preload(&fetcher).unwrap();

        assert_eq!(cache.len(), 3);
        let calls = fetcher.calls.borrow();
        assert!(calls.iter().all(|c| !c.contains("literal.json")));
    }

    #[test]
    fn test_index_schema_ids_inside_keyword_named_properties() {
        let mut cache = DocumentCache::new();
        cache.insert(root_doc(json!({
            "components": {"schemas": {"Settings": {
                "properties": {"const": {"$anchor": "constant", "type": "string"}},
                "enum": [{"$anchor": "literal"}]
            }}}
        })));
        cache.index_schema_ids();

        let found = cache
            .lookup_schema_id("https://example.com/api/main.json#constant")
            .unwrap();
        assert_eq!(found.pointer, "/components/schemas/Settings/properties/const");
        assert!(cache
            .lookup_schema_id("https://example.com/api/main.json#literal")
            .is_none());
    }

    #[test]
    fn test_index_schema_ids_and_anchors() {
        let mut cache = DocumentCache::new();
        cache.insert(root_doc(json!({
            "components": {"schemas": {
                "Pet": {"$id": "https://example.com/schemas/pet", "type": "object"},
                "Tree": {"$anchor": "node", "type": "object"}
            }}
        })));
        cache.index_schema_ids();

        let by_id = cache.lookup_schema_id("https://example.com/schemas/pet").unwrap();
        assert_eq!(by_id.pointer, "/components/schemas/Pet");
        let by_anchor = cache
            .lookup_schema_id("https://example.com/api/main.json#node")
            .unwrap();
        assert_eq!(by_anchor.pointer, "/components/schemas/Tree");
        assert!(cache
            .lookup_schema_id("https://example.com/api/main.json#/components/schemas/Pet")
            .is_some());
    }

    #[test]
    fn test_alias_by_self_uri() {
        let mut cache = DocumentCache::new();
        cache.insert(root_doc(json!({"$self": "https://canonical.example.com/openapi.json"})));
        assert!(cache.contains(&Url::parse("https://canonical.example.com/openapi.json").unwrap()));
    }

    #[test]
    fn test_normalize_schema_name() {
        assert_eq!(normalize_schema_name("UserModel"), normalize_schema_name("user_model"));
        assert_ne!(normalize_schema_name("User"), normalize_schema_name("Users"));
    }
}
