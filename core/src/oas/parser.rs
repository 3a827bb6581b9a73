#![deny(missing_docs)]

//! # Swagger Parser
//!
//! The façade every consumer goes through. It loads a document (plus every
//! document it references), validates it, normalizes Swagger 2.0 into the
//! OAS 3 shape and flattens `paths` / `webhooks` into `ResolvedOperation`s.

use crate::config::GeneratorConfig;
use crate::error::{AppError, AppResult};
use crate::oas::document::{input_to_uri, load_document, DefaultFetcher, Document, DocumentFetcher};
use crate::oas::models::{
    ExternalDocs, ParamSource, ParamStyle, RequestBodyInfo, ResolvedOperation, ResolvedParameter,
    ResolvedResponse, RouteKind, ServerInfo, SpecVersion, HTTP_METHODS,
};
use crate::oas::normalization::{
    detect_spec_version, json_schema_dialect, normalize_swagger_parameter,
    normalize_swagger_response, normalize_swagger_security_scheme, split_swagger_body,
};
use crate::oas::polymorphism::{DiscriminatorRegistry, PolymorphicOption, PolymorphismResolver};
use crate::oas::registry::{cache_key, DocumentCache};
use crate::oas::resolver::Resolver;
use crate::oas::servers::{parse_servers, swagger_servers};
use crate::oas::validation::validate_document;
use heck::ToLowerCamelCase;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use url::Url;

/// Base used to key documents constructed without a location.
const PLACEHOLDER_BASE: &str = "http://example.invalid/";

/// A parsed, validated and normalized spec.
#[derive(Debug, Clone)]
pub struct SwaggerParser {
    spec: Value,
    config: GeneratorConfig,
    cache: DocumentCache,
    document_uri: Url,
    server_base: Option<Url>,
    version: Option<SpecVersion>,
    servers: Vec<ServerInfo>,
    operations: Vec<ResolvedOperation>,
    webhooks: Vec<ResolvedOperation>,
    schemas: IndexMap<String, Value>,
    security_schemes: IndexMap<String, Value>,
}

impl SwaggerParser {
    /// Loads `input` (path or URL) and everything it references, then builds the parser.
    pub fn create(input: &str, config: GeneratorConfig) -> AppResult<Self> {
        Self::create_with_fetcher(input, config, &DefaultFetcher)
    }

    /// As [`SwaggerParser::create`], reading documents through `fetcher`.
    pub fn create_with_fetcher(
        input: &str,
        config: GeneratorConfig,
        fetcher: &dyn DocumentFetcher,
    ) -> AppResult<Self> {
        let uri = input_to_uri(input)?;
        info!(uri = %uri, "loading root document");
        let root = load_document(&uri, fetcher)?;
        validate_document(root.root())?;

        let spec = root.root().clone();
        let document_uri = root.base_uri().clone();
        let retrieval_uri = root.retrieval_uri().clone();

        let mut cache = DocumentCache::new();
        cache.insert(root);
        cache.preload(fetcher)?;
        info!(documents = cache.len(), "preloaded referenced documents");

        for doc in cache.documents().skip(1) {
            validate_document(doc.root())?;
        }

        Self::build(spec, config, cache, document_uri, Some(retrieval_uri))
    }

    /// Builds a parser from an already loaded spec.
    ///
    /// When `cache` already holds a document under `base_uri`, that document
    /// is used for resolution. Without `base_uri`, relative server URLs stay
    /// relative.
    pub fn new(
        spec: Value,
        config: GeneratorConfig,
        cache: Option<DocumentCache>,
        base_uri: Option<&str>,
    ) -> AppResult<Self> {
        validate_document(&spec)?;

        let retrieval_uri = match base_uri {
            Some(uri) => Some(Url::parse(uri).map_err(|e| {
                AppError::General(format!("Invalid base URI '{}': {}", uri, e))
            })?),
            None => None,
        };
        let keyed_uri = match &retrieval_uri {
            Some(uri) => uri.clone(),
            None => Url::parse(PLACEHOLDER_BASE)
                .map_err(|e| AppError::General(format!("Invalid base URI: {}", e)))?,
        };

        let mut cache = cache.unwrap_or_default();
        let document = Document::new(keyed_uri, spec.clone());
        let document_uri = document.base_uri().clone();
        let server_base = retrieval_uri.map(|_| document.retrieval_uri().clone());
        cache.insert(document);

        Self::build(spec, config, cache, document_uri, server_base)
    }

    fn build(
        spec: Value,
        config: GeneratorConfig,
        mut cache: DocumentCache,
        document_uri: Url,
        server_base: Option<Url>,
    ) -> AppResult<Self> {
        cache.index_schema_ids();
        debug!(indexed = cache.indexed_schema_count(), "indexed schema identities");

        let version = detect_spec_version(&spec);
        let is_swagger = version.as_ref().is_some_and(SpecVersion::is_swagger);

        let servers = if is_swagger {
            swagger_servers(&spec, server_base.as_ref())
        } else {
            let declared = parse_servers(spec.get("servers"), server_base.as_ref());
            if declared.is_empty() {
                vec![ServerInfo::new("/")]
            } else {
                declared
            }
        };

        let (schema_section, schemes_section) = if is_swagger {
            (spec.get("definitions"), spec.get("securityDefinitions"))
        } else {
            let components = spec.get("components");
            (
                components.and_then(|c| c.get("schemas")),
                components.and_then(|c| c.get("securitySchemes")),
            )
        };
        let schemas = object_entries(schema_section);
        let security_schemes = object_entries(schemes_section)
            .into_iter()
            .map(|(name, scheme)| {
                let scheme = if is_swagger {
                    normalize_swagger_security_scheme(&scheme)
                } else {
                    scheme
                };
                (name, scheme)
            })
            .collect();

        let mut parser = Self {
            spec,
            config,
            cache,
            document_uri,
            server_base,
            version,
            servers,
            operations: Vec::new(),
            webhooks: Vec::new(),
            schemas,
            security_schemes,
        };

        parser.operations = parser.flatten_section("paths", RouteKind::Path);
        parser.webhooks = parser.flatten_section("webhooks", RouteKind::Webhook);
        parser.assert_unique_operation_ids()?;
        info!(
            operations = parser.operations.len(),
            webhooks = parser.webhooks.len(),
            "parsed document"
        );
        Ok(parser)
    }

    /// Document-level servers (defaulted and resolved).
    pub fn servers(&self) -> &[ServerInfo] {
        &self.servers
    }

    /// Operations under `paths`, in document order.
    pub fn operations(&self) -> &[ResolvedOperation] {
        &self.operations
    }

    /// Operations under `webhooks`, in document order.
    pub fn webhooks(&self) -> &[ResolvedOperation] {
        &self.webhooks
    }

    /// Named schemas (`components/schemas`, or `definitions` for Swagger 2.0).
    pub fn schemas(&self) -> &IndexMap<String, Value> {
        &self.schemas
    }

    /// A named schema, resolved.
    pub fn get_definition(&self, name: &str) -> Option<Value> {
        self.schemas.get(name).and_then(|s| self.resolve(s))
    }

    /// Security schemes in OAS 3 shape.
    pub fn get_security_schemes(&self) -> &IndexMap<String, Value> {
        &self.security_schemes
    }

    /// `components/links`, each resolved. Links that do not resolve are omitted.
    pub fn get_links(&self) -> IndexMap<String, Value> {
        let links = self
            .spec
            .get("components")
            .and_then(|c| c.get("links"))
            .and_then(|l| l.as_object());
        let Some(links) = links else {
            return IndexMap::new();
        };
        links
            .iter()
            .filter_map(|(name, link)| Some((name.clone(), self.resolve(link)?)))
            .collect()
    }

    /// Tagged variants of a discriminated `oneOf`/`anyOf` schema.
    pub fn get_polymorphic_schema_options(&self, schema: &Value) -> Vec<PolymorphicOption> {
        self.polymorphism().options(schema)
    }

    /// Tag-to-type registry of a discriminated schema.
    pub fn discriminator_registry(&self, schema: &Value) -> Option<DiscriminatorRegistry> {
        self.polymorphism().registry(schema)
    }

    /// `openapi` / `swagger` version, if declared.
    pub fn get_spec_version(&self) -> Option<&SpecVersion> {
        self.version.as_ref()
    }

    /// True when the document declares a version and at least one of
    /// `paths`, `webhooks` or `components`.
    pub fn is_valid_spec(&self) -> bool {
        self.version.is_some()
            && ["paths", "webhooks", "components"]
                .iter()
                .any(|key| self.spec.get(key).is_some_and(Value::is_object))
    }

    /// Effective JSON Schema dialect (OAS 3.1+ only).
    pub fn json_schema_dialect(&self) -> Option<String> {
        json_schema_dialect(&self.spec, self.version.as_ref())
    }

    /// A resolver over this parser's document cache, rooted at the main document.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.cache, &self.document_uri)
    }

    /// Resolves `node` relative to the main document.
    pub fn resolve(&self, node: &Value) -> Option<Value> {
        self.resolver().resolve(node)
    }

    /// Resolves a raw reference string relative to the main document.
    pub fn resolve_reference(&self, reference: &str) -> Option<Value> {
        self.resolver().resolve_reference(reference)
    }

    /// The raw root document.
    pub fn spec(&self) -> &Value {
        &self.spec
    }

    /// Generator configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Base URI of the main document.
    pub fn document_uri(&self) -> &Url {
        &self.document_uri
    }

    /// The multi-document cache.
    pub fn cache(&self) -> &DocumentCache {
        &self.cache
    }

    fn is_swagger(&self) -> bool {
        self.version.as_ref().is_some_and(SpecVersion::is_swagger)
    }

    fn polymorphism(&self) -> PolymorphismResolver<'_> {
        PolymorphismResolver::new(self.resolver(), &self.schemas, self.is_swagger())
    }

    fn flatten_section(&self, section: &str, kind: RouteKind) -> Vec<ResolvedOperation> {
        let Some(items) = self.spec.get(section).and_then(|v| v.as_object()) else {
            return Vec::new();
        };
        let resolver = self.resolver();
        let mut out = Vec::new();

        for (path, raw_item) in items {
            let Some(node) = resolver.resolve_from(raw_item, &self.document_uri) else {
                warn!(path = %path, "skipping unresolvable path item");
                continue;
            };
            // A path item from another document resolves its servers against
            // that document's location.
            let server_base = if cache_key(&node.base_uri) == cache_key(&self.document_uri) {
                self.server_base.clone()
            } else {
                Some(node.retrieval_uri.clone())
            };
            let ctx = PathItemContext {
                path,
                kind,
                item: &node.value,
                base: &node.base_uri,
                server_base: server_base.as_ref(),
            };

            for method in HTTP_METHODS {
                if let Some(op) = node.value.get(method) {
                    out.push(self.build_operation(&ctx, method, op));
                }
            }
            if let Some(extra) = node.value.get("additionalOperations").and_then(|v| v.as_object()) {
                for (method, op) in extra {
                    let op = resolver
                        .resolve_from(op, &node.base_uri)
                        .map(|n| n.value)
                        .unwrap_or_else(|| op.clone());
                    out.push(self.build_operation(&ctx, method, &op));
                }
            }
        }
        out
    }

    fn build_operation(&self, ctx: &PathItemContext<'_>, method: &str, op: &Value) -> ResolvedOperation {
        let resolver = self.resolver();
        let resolve = |v: &Value| resolver.resolve_from(v, ctx.base);

        // Path-level parameters first; operation-level ones replace them by (name, in).
        // Each keeps the base of the document it was resolved from.
        let mut raw_params: Vec<(Value, Url)> = Vec::new();
        for list in [ctx.item.get("parameters"), op.get("parameters")] {
            let Some(list) = list.and_then(|l| l.as_array()) else {
                continue;
            };
            for node in list.iter().filter_map(&resolve) {
                let existing = raw_params
                    .iter()
                    .position(|(p, _)| param_key(p) == param_key(&node.value));
                let entry = (node.value, node.base_uri);
                match existing {
                    Some(idx) => raw_params[idx] = entry,
                    None => raw_params.push(entry),
                }
            }
        }

        let (raw_params, request_body) = if self.is_swagger() {
            let base_of = |param: &Value| {
                raw_params
                    .iter()
                    .find(|(raw, _)| param_key(raw) == param_key(param))
                    .map(|(_, base)| base.clone())
                    .unwrap_or_else(|| ctx.base.clone())
            };
            let body_base = raw_params
                .iter()
                .find(|(p, _)| matches!(p.get("in").and_then(|v| v.as_str()), Some("body" | "formData")))
                .map(|(_, base)| base.clone())
                .unwrap_or_else(|| ctx.base.clone());
            let (rest, body) = split_swagger_body(
                raw_params.iter().map(|(p, _)| p.clone()).collect(),
                op,
                &self.spec,
            );
            let rest: Vec<(Value, Url)> = rest
                .iter()
                .map(|p| (normalize_swagger_parameter(p), base_of(p)))
                .collect();
            (rest, body.map(|body| request_body_info(&body, body_base)))
        } else {
            let body = op.get("requestBody").and_then(&resolve);
            (raw_params, body.map(|node| request_body_info(&node.value, node.base_uri)))
        };

        let parameters = raw_params
            .iter()
            .filter_map(|(param, base)| resolved_parameter(param, base))
            .collect();

        let mut responses = IndexMap::new();
        if let Some(map) = op.get("responses").and_then(|r| r.as_object()) {
            for (status, response) in map {
                let Some(node) = resolve(response) else {
                    warn!(status = %status, path = %ctx.path, "skipping unresolvable response");
                    continue;
                };
                let mut response = node.value;
                if self.is_swagger() {
                    response = normalize_swagger_response(&response, op, &self.spec);
                }
                responses.insert(
                    status.clone(),
                    self.resolved_response(status, &response, &node.base_uri),
                );
            }
        }

        let (servers, servers_overridden) = [op.get("servers"), ctx.item.get("servers")]
            .into_iter()
            .map(|s| parse_servers(s, ctx.server_base))
            .find(|s| !s.is_empty())
            .map(|s| (s, true))
            .unwrap_or_else(|| (self.servers.clone(), false));

        let security = op
            .get("security")
            .or_else(|| self.spec.get("security"))
            .and_then(|s| s.as_array())
            .cloned();

        let operation_id = op
            .get("operationId")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        let method_name = match &operation_id {
            Some(id) => id.to_lower_camel_case(),
            None => format!("{} {}", method.to_lowercase(), ctx.path).to_lower_camel_case(),
        };

        let text = |key: &str| {
            op.get(key)
                .and_then(|v| v.as_str())
                .or_else(|| ctx.item.get(key).and_then(|v| v.as_str()))
                .map(str::to_string)
        };

        ResolvedOperation {
            path: ctx.path.to_string(),
            method: method.to_uppercase(),
            operation_id,
            method_name,
            kind: ctx.kind,
            summary: text("summary"),
            description: text("description"),
            parameters,
            request_body,
            responses,
            security,
            servers,
            servers_overridden,
            tags: op
                .get("tags")
                .and_then(|t| t.as_array())
                .map(|t| t.iter().filter_map(|v| v.as_str()).map(str::to_string).collect())
                .unwrap_or_default(),
            deprecated: op.get("deprecated").and_then(|v| v.as_bool()).unwrap_or(false),
            external_docs: op.get("externalDocs").and_then(ExternalDocs::from_value),
            extensions: op
                .as_object()
                .map(|o| {
                    o.iter()
                        .filter(|(k, _)| k.starts_with("x-"))
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect::<IndexMap<_, _>>()
                })
                .unwrap_or_default(),
            base_uri: ctx.base.clone(),
        }
    }

    fn resolved_response(&self, status: &str, response: &Value, base: &Url) -> ResolvedResponse {
        let resolver = self.resolver();
        let resolved_map = |key: &str| -> IndexMap<String, Value> {
            response
                .get(key)
                .and_then(|v| v.as_object())
                .map(|m| {
                    m.iter()
                        .filter_map(|(name, v)| {
                            let node = resolver.resolve_from(v, base)?;
                            Some((name.clone(), node.value))
                        })
                        .collect()
                })
                .unwrap_or_default()
        };

        ResolvedResponse {
            status: status.to_string(),
            description: response
                .get("description")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            content: object_entries(response.get("content")),
            headers: resolved_map("headers"),
            links: resolved_map("links"),
            base_uri: base.clone(),
        }
    }

    fn assert_unique_operation_ids(&self) -> AppResult<()> {
        let mut seen: HashMap<&str, &ResolvedOperation> = HashMap::new();
        for op in self.operations.iter().chain(self.webhooks.iter()) {
            let Some(id) = op.operation_id.as_deref() else {
                continue;
            };
            if let Some(first) = seen.insert(id, op) {
                return Err(AppError::Validation(format!(
                    "Duplicate operationId '{}' found for {} {} and {} {}",
                    id, first.method, first.path, op.method, op.path
                )));
            }
        }
        Ok(())
    }
}

struct PathItemContext<'a> {
    path: &'a str,
    kind: RouteKind,
    item: &'a Value,
    base: &'a Url,
    server_base: Option<&'a Url>,
}

fn object_entries(value: Option<&Value>) -> IndexMap<String, Value> {
    value
        .and_then(|v| v.as_object())
        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

fn param_key(param: &Value) -> (Option<&str>, Option<&str>) {
    (
        param.get("name").and_then(|v| v.as_str()),
        param.get("in").and_then(|v| v.as_str()),
    )
}

fn request_body_info(body: &Value, base_uri: Url) -> RequestBodyInfo {
    RequestBodyInfo {
        description: body
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        required: body.get("required").and_then(|v| v.as_bool()).unwrap_or(false),
        content: object_entries(body.get("content")),
        base_uri,
    }
}

fn resolved_parameter(param: &Value, base: &Url) -> Option<ResolvedParameter> {
    let name = param.get("name")?.as_str()?.to_string();
    let location = param.get("in")?.as_str()?;
    let Some(source) = ParamSource::from_in(location) else {
        warn!(parameter = %name, location = %location, "skipping parameter with unknown location");
        return None;
    };
    let flag = |key: &str| param.get(key).and_then(|v| v.as_bool());
    let content = param
        .get("content")
        .and_then(|v| v.as_object())
        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect());

    Some(ResolvedParameter {
        name,
        source,
        required: source == ParamSource::Path || flag("required").unwrap_or(false),
        deprecated: flag("deprecated").unwrap_or(false),
        description: param
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        schema: param.get("schema").cloned(),
        content,
        style: param
            .get("style")
            .and_then(|v| v.as_str())
            .and_then(ParamStyle::parse),
        explode: flag("explode"),
        allow_reserved: flag("allowReserved").unwrap_or(false),
        base_uri: base.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DateType;
    use serde_json::json;

    fn parse(spec: Value) -> SwaggerParser {
        SwaggerParser::new(spec, GeneratorConfig::default(), None, None).unwrap()
    }

    #[test]
    fn test_default_server_for_openapi() {
        let parser = parse(json!({"openapi": "3.0.0", "paths": {}}));
        assert_eq!(parser.servers(), &[ServerInfo::new("/")]);

        let parser = parse(json!({"openapi": "3.0.0", "servers": [], "paths": {}}));
        assert_eq!(parser.servers().len(), 1);
        assert_eq!(parser.servers()[0].url, "/");
    }

    #[test]
    fn test_swagger_without_host_has_no_servers() {
        let parser = parse(json!({"swagger": "2.0", "paths": {}}));
        assert!(parser.servers().is_empty());
    }

    #[test]
    fn test_relative_servers_resolve_against_base() {
        let spec = json!({
            "openapi": "3.1.0",
            "servers": [{"url": "v1/api"}, {"url": "/root/api"}],
            "paths": {}
        });
        let parser = SwaggerParser::new(
            spec,
            GeneratorConfig::default(),
            None,
            Some("https://example.com/docs/openapi.json"),
        )
        .unwrap();
        let urls: Vec<_> = parser.servers().iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://example.com/docs/v1/api", "https://example.com/root/api"]);
    }

    #[test]
    fn test_self_does_not_affect_server_resolution() {
        let spec = json!({
            "openapi": "3.2.0",
            "$self": "https://other.example.org/specs/api.json",
            "servers": [{"url": "v2"}],
            "paths": {}
        });
        let parser = SwaggerParser::new(
            spec,
            GeneratorConfig::default(),
            None,
            Some("https://example.com/docs/openapi.json"),
        )
        .unwrap();
        assert_eq!(parser.servers()[0].url, "https://example.com/docs/v2");
        assert_eq!(
            parser.document_uri().as_str(),
            "https://other.example.org/specs/api.json"
        );
    }

    #[test]
    fn test_operations_are_flattened_with_inherited_servers() {
        let parser = parse(json!({
            "openapi": "3.2.0",
            "servers": [{"url": "https://api.example.com"}],
            "security": [{"key": []}],
            "paths": {
                "/users/{id}": {
                    "parameters": [{"name": "id", "in": "path", "schema": {"type": "string"}}],
                    "get": {"operationId": "get_user", "tags": ["users"], "x-internal": true},
                    "delete": {
                        "servers": [{"url": "https://admin.example.com"}],
                        "security": [],
                        "deprecated": true
                    },
                    "additionalOperations": {"copy": {"operationId": "copyUser"}}
                }
            }
        }));

        let ops = parser.operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].method, "GET");
        assert_eq!(ops[0].method_name, "getUser");
        assert_eq!(ops[0].parameters[0].source, ParamSource::Path);
        assert!(ops[0].parameters[0].required);
        assert_eq!(ops[0].servers[0].url, "https://api.example.com");
        assert!(!ops[0].servers_overridden);
        assert_eq!(ops[0].security.as_ref().map(Vec::len), Some(1));
        assert_eq!(ops[0].extensions.get("x-internal"), Some(&json!(true)));

        assert_eq!(ops[1].method_name, "deleteUsersId");
        assert!(ops[1].servers_overridden);
        assert_eq!(ops[1].security, Some(vec![]));
        assert!(ops[1].deprecated);

        assert_eq!(ops[2].method, "COPY");
        assert_eq!(ops[2].operation_id.as_deref(), Some("copyUser"));
    }

    #[test]
    fn test_operation_parameters_override_path_level() {
        let parser = parse(json!({
            "openapi": "3.0.3",
            "components": {"parameters": {"Limit": {"name": "limit", "in": "query", "schema": {"type": "integer"}}}},
            "paths": {"/items": {
                "parameters": [{"name": "limit", "in": "query", "description": "path level"}],
                "get": {"parameters": [
                    {"$ref": "#/components/parameters/Limit"},
                    {"name": "X-Trace", "in": "header", "required": true}
                ]}
            }}
        }));
        let params = &parser.operations()[0].parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].description, None);
        assert_eq!(params[0].schema, Some(json!({"type": "integer"})));
        assert_eq!(params[1].source, ParamSource::Header);
    }

    #[test]
    fn test_path_item_ref_duplicate_operation_id_detected_after_resolution() {
        let spec = json!({
            "openapi": "3.1.0",
            "components": {"pathItems": {"Shared": {"get": {"operationId": "dup"}}}},
            "paths": {
                "/a": {"get": {"operationId": "dup"}},
                "/b": {"$ref": "#/components/pathItems/Shared"}
            }
        });
        let err = SwaggerParser::new(spec, GeneratorConfig::default(), None, None).unwrap_err();
        assert!(err.to_string().contains("dup"));
    }

    #[test]
    fn test_webhooks_and_spec_accessors() {
        let parser = parse(json!({
            "openapi": "3.1.0",
            "webhooks": {"newPet": {"post": {"operationId": "onNewPet"}}},
            "components": {
                "schemas": {"Pet": {"$ref": "#/components/schemas/Animal"}, "Animal": {"type": "object"}},
                "links": {
                    "GetPet": {"operationId": "getPet", "parameters": {"id": "$response.body#/id"}},
                    "Broken": {"$ref": "#/components/links/Missing"}
                }
            }
        }));
        assert_eq!(parser.webhooks()[0].kind, RouteKind::Webhook);
        assert_eq!(parser.webhooks()[0].path, "newPet");
        assert_eq!(parser.get_definition("Pet"), Some(json!({"type": "object"})));
        assert_eq!(parser.get_links().keys().collect::<Vec<_>>(), vec!["GetPet"]);
        assert_eq!(parser.get_spec_version().map(|v| v.version.as_str()), Some("3.1.0"));
        assert_eq!(
            parser.json_schema_dialect().as_deref(),
            Some(crate::oas::normalization::OAS_31_DIALECT)
        );
        assert!(parser.is_valid_spec());
    }

    #[test]
    fn test_spec_version_absent() {
        let parser = parse(json!({"paths": {}}));
        assert!(parser.get_spec_version().is_none());
        assert!(!parser.is_valid_spec());
    }

    #[test]
    fn test_swagger_normalization() {
        let parser = SwaggerParser::new(
            json!({
                "swagger": "2.0",
                "host": "petstore.example.com",
                "basePath": "/v2",
                "schemes": ["https", "http"],
                "consumes": ["application/json"],
                "produces": ["application/json"],
                "securityDefinitions": {"basicAuth": {"type": "basic"}},
                "definitions": {"Pet": {"type": "object"}},
                "paths": {"/pets": {"post": {
                    "operationId": "addPet",
                    "parameters": [
                        {"name": "body", "in": "body", "required": true, "schema": {"$ref": "#/definitions/Pet"}},
                        {"name": "tags", "in": "query", "type": "array", "items": {"type": "string"}, "collectionFormat": "csv"}
                    ],
                    "responses": {"200": {"description": "ok", "schema": {"$ref": "#/definitions/Pet"}}}
                }}}
            }),
            GeneratorConfig::with_date_type(DateType::Date),
            None,
            None,
        )
        .unwrap();

        let urls: Vec<_> = parser.servers().iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://petstore.example.com/v2", "http://petstore.example.com/v2"]);
        assert_eq!(parser.get_security_schemes()["basicAuth"]["scheme"], json!("basic"));
        assert!(parser.schemas().contains_key("Pet"));

        let op = &parser.operations()[0];
        let body = op.request_body.as_ref().unwrap();
        assert!(body.required);
        assert!(body.content.contains_key("application/json"));
        assert_eq!(op.parameters.len(), 1);
        assert_eq!(op.parameters[0].style, Some(ParamStyle::Form));
        assert_eq!(op.parameters[0].explode, Some(false));
        assert!(op.responses["200"].content.contains_key("application/json"));
        assert_eq!(parser.config().options.date_type, DateType::Date);
    }

    #[test]
    fn test_extensions_keep_document_order() {
        let parser = parse(json!({
            "openapi": "3.1.0",
            "paths": {"/a": {"get": {
                "operationId": "a",
                "x-zeta": 1,
                "summary": "A",
                "x-alpha": true,
                "x-middle": "m"
            }}}
        }));
        let keys: Vec<_> = parser.operations()[0].extensions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x-zeta", "x-alpha", "x-middle"]);
    }
}
