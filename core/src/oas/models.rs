#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Normalized representation of the parts of a spec the analyzer consumes.
//!
//! Media type objects, schemas, links and security schemes stay as JSON
//! values: they are consumed through the resolver, which needs the raw
//! `$ref` markers and sibling keys intact.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use url::Url;

/// Fixed operation keys of a Path Item, in emission order.
pub const HTTP_METHODS: [&str; 9] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace", "query",
];

/// Distinguishes between standard paths and event-driven webhooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteKind {
    /// A standard HTTP endpoint defined in `paths`.
    Path,
    /// An event receiver defined in `webhooks`.
    Webhook,
}

/// Represents a Runtime Expression (OAS Links / Callbacks).
///
/// Syntax: `$url` | `$method` | `$statusCode` | `$request.{source}` | `$response.{source}`,
/// optionally embedded in a `{...}` template.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RuntimeExpression(String);

impl RuntimeExpression {
    /// Creates a new RuntimeExpression from a string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the raw expression string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for bare expressions (`$...`) and templates (`...{$...}...`).
    pub fn is_expression(&self) -> bool {
        self.0.starts_with('$') || self.0.contains("{$")
    }
}

impl fmt::Debug for RuntimeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuntimeExpression({:?})", self.0)
    }
}

impl fmt::Display for RuntimeExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The source location of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamSource {
    /// Path.
    Path,
    /// Query.
    Query,
    /// Query String (OAS 3.2).
    QueryString,
    /// Header.
    Header,
    /// Cookie.
    Cookie,
}

impl ParamSource {
    /// Parses the `in` field of a Parameter Object.
    pub fn from_in(value: &str) -> Option<Self> {
        match value {
            "path" => Some(ParamSource::Path),
            "query" => Some(ParamSource::Query),
            "querystring" => Some(ParamSource::QueryString),
            "header" => Some(ParamSource::Header),
            "cookie" => Some(ParamSource::Cookie),
            _ => None,
        }
    }

    /// The `in` value as written in specs.
    pub fn as_str(self) -> &'static str {
        match self {
            ParamSource::Path => "path",
            ParamSource::Query => "query",
            ParamSource::QueryString => "querystring",
            ParamSource::Header => "header",
            ParamSource::Cookie => "cookie",
        }
    }
}

/// Parameter serialization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamStyle {
    /// `matrix`
    Matrix,
    /// `label`
    Label,
    /// `form`
    Form,
    /// `simple`
    #[default]
    Simple,
    /// `spaceDelimited`
    SpaceDelimited,
    /// `pipeDelimited`
    PipeDelimited,
    /// `deepObject`
    DeepObject,
    /// `cookie` (OAS 3.2)
    Cookie,
}

impl ParamStyle {
    /// Parses a `style` value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "matrix" => Some(ParamStyle::Matrix),
            "label" => Some(ParamStyle::Label),
            "form" => Some(ParamStyle::Form),
            "simple" => Some(ParamStyle::Simple),
            "spaceDelimited" => Some(ParamStyle::SpaceDelimited),
            "pipeDelimited" => Some(ParamStyle::PipeDelimited),
            "deepObject" => Some(ParamStyle::DeepObject),
            "cookie" => Some(ParamStyle::Cookie),
            _ => None,
        }
    }

    /// The default style for a parameter location.
    pub fn default_for(source: ParamSource) -> Self {
        match source {
            ParamSource::Query | ParamSource::Cookie | ParamSource::QueryString => ParamStyle::Form,
            ParamSource::Path | ParamSource::Header => ParamStyle::Simple,
        }
    }
}

/// A Server Variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerVariable {
    /// Default substitution value.
    pub default: String,
    /// Allowed values.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A Server Object with its URL resolved against the declaring document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    /// URL template (absolute when a base was available).
    pub url: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Name (OAS 3.2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Template variables.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

impl ServerInfo {
    /// A server with only a URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            name: None,
            variables: IndexMap::new(),
        }
    }
}

/// External documentation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalDocs {
    /// Target URL.
    pub url: String,
    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExternalDocs {
    /// Reads an External Documentation Object.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(Self {
            url: value.get("url")?.as_str()?.to_string(),
            description: value
                .get("description")
                .and_then(|v| v.as_str())
                .map(str::to_string),
        })
    }
}

/// A parameter after `$ref` resolution and version normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameter {
    /// Parameter name as written.
    pub name: String,
    /// Location.
    pub source: ParamSource,
    /// Whether the parameter is required (path parameters always are).
    pub required: bool,
    /// Whether the parameter is deprecated.
    pub deprecated: bool,
    /// Description.
    pub description: Option<String>,
    /// Schema (schema-based serialization).
    pub schema: Option<Value>,
    /// Content map (content-based serialization).
    pub content: Option<IndexMap<String, Value>>,
    /// Declared style.
    pub style: Option<ParamStyle>,
    /// Declared explode.
    pub explode: Option<bool>,
    /// Declared allowReserved.
    pub allow_reserved: bool,
    /// Base URI of the document the parameter was resolved from.
    pub base_uri: Url,
}

/// A request body after `$ref` resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodyInfo {
    /// Description.
    pub description: Option<String>,
    /// Whether the body is required.
    pub required: bool,
    /// Media type map (`content`), entries unresolved.
    pub content: IndexMap<String, Value>,
    /// Base URI the `content` entries resolve against.
    pub base_uri: Url,
}

/// A response after `$ref` resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResponse {
    /// Status code key (`200`, `2XX`, `default`).
    pub status: String,
    /// Description.
    pub description: Option<String>,
    /// Media type map.
    pub content: IndexMap<String, Value>,
    /// Header map (each header resolved).
    pub headers: IndexMap<String, Value>,
    /// Link map (each link resolved; unresolvable links omitted).
    pub links: IndexMap<String, Value>,
    /// Base URI the `content` entries resolve against.
    pub base_uri: Url,
}

/// One HTTP operation flattened out of `paths` or `webhooks`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOperation {
    /// Path template, or webhook name.
    pub path: String,
    /// HTTP method, upper-case.
    pub method: String,
    /// Declared operationId.
    pub operation_id: Option<String>,
    /// Generated method name used by emitters.
    pub method_name: String,
    /// Path or webhook.
    pub kind: RouteKind,
    /// Summary.
    pub summary: Option<String>,
    /// Description.
    pub description: Option<String>,
    /// Parameters (path-item level merged with operation level).
    pub parameters: Vec<ResolvedParameter>,
    /// Request body.
    pub request_body: Option<RequestBodyInfo>,
    /// Responses keyed by status.
    pub responses: IndexMap<String, ResolvedResponse>,
    /// Effective security requirements.
    pub security: Option<Vec<Value>>,
    /// Effective servers.
    pub servers: Vec<ServerInfo>,
    /// True when the operation or its path item declared servers.
    pub servers_overridden: bool,
    /// Tags.
    pub tags: Vec<String>,
    /// Deprecation flag.
    pub deprecated: bool,
    /// External docs.
    pub external_docs: Option<ExternalDocs>,
    /// `x-*` extensions of the operation, in document order.
    pub extensions: IndexMap<String, Value>,
    /// Base URI for references nested inside this operation.
    pub base_uri: Url,
}

/// The spec dialect family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecKind {
    /// `openapi: 3.x`
    OpenApi,
    /// `swagger: 2.0`
    Swagger,
}

/// Declared spec version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecVersion {
    /// Family.
    #[serde(rename = "type")]
    pub kind: SpecKind,
    /// Version string as written.
    pub version: String,
}

impl SpecVersion {
    /// True for `swagger: 2.x`.
    pub fn is_swagger(&self) -> bool {
        self.kind == SpecKind::Swagger
    }

    /// True for OAS 3.0.x.
    pub fn is_oas30(&self) -> bool {
        self.kind == SpecKind::OpenApi && self.version.starts_with("3.0")
    }
}
