#![deny(missing_docs)]

//! # Analyzer Models
//!
//! The per-operation semantic model code emitters template from. Every type
//! here serializes to camelCase JSON.

use crate::oas::models::{ParamSource, ParamStyle, RouteKind, ServerInfo};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Wire format of a request or response payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyKind {
    /// One JSON document.
    Json,
    /// A sequence of JSON items (jsonl, ndjson, json-seq, event-stream).
    JsonLines,
    /// XML document.
    Xml,
    /// `multipart/*` other than `multipart/form-data`.
    Multipart,
    /// `application/x-www-form-urlencoded`.
    UrlEncoded,
    /// `multipart/form-data`.
    FormData,
    /// Text or binary sent as is.
    Raw,
}

/// Serialization of one form field or multipart part.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingConfig {
    /// Part / field content type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Part headers (Header Objects).
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, Value>,
    /// Declared style.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Declared explode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,
    /// Declared allowReserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_reserved: Option<bool>,
    /// Nested per-property encodings.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, EncodingConfig>,
    /// Positional encodings (tuple parts).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefix_encoding: Vec<EncodingConfig>,
    /// Encoding for every remaining array item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_encoding: Option<Box<EncodingConfig>>,
}

impl EncodingConfig {
    /// True when nothing was configured.
    pub fn is_empty(&self) -> bool {
        self == &EncodingConfig::default()
    }
}

/// XML serialization hints for one schema node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XmlConfig {
    /// Element or attribute name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Namespace URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Namespace prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Serialized as an attribute.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub attribute: bool,
    /// Array wrapped in an outer element.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub wrapped: bool,
    /// OAS 3.2 `nodeType` (`element`, `attribute`, `text`, `cdata`, `none`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    /// Per-property overrides.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, XmlConfig>,
    /// Array item config.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<XmlConfig>>,
    /// Tuple item configs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prefix_items: Vec<XmlConfig>,
}

/// Server-sent event framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SseMode {
    /// Each event's `data` is the item payload.
    Data,
    /// Each item is an event object with `data` / `event` fields.
    Event,
}

/// One generated parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterModel {
    /// Name on the wire.
    pub name: String,
    /// Generated identifier.
    pub identifier: String,
    /// Location.
    pub location: ParamSource,
    /// Required flag.
    pub required: bool,
    /// Deprecated flag.
    pub deprecated: bool,
    /// Type expression.
    pub type_name: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// True for content-based (`content`) serialization.
    pub serialized: bool,
    /// Media type of a content-based parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Effective style.
    pub style: ParamStyle,
    /// Effective explode.
    pub explode: bool,
    /// allowReserved.
    pub allow_reserved: bool,
}

/// The request payload of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestBodyModel {
    /// Chosen media type.
    pub media_type: String,
    /// Classification.
    pub kind: BodyKind,
    /// Type expression.
    pub type_name: String,
    /// Required flag.
    pub required: bool,
    /// Encoding tree (form kinds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<EncodingConfig>,
    /// XML tree (XML bodies).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<XmlConfig>,
}

/// One successful response shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseVariant {
    /// Status code key.
    pub status: String,
    /// Media type.
    pub media_type: String,
    /// Type expression (`T[]` for sequences).
    pub type_name: String,
    /// Serialization.
    pub kind: BodyKind,
    /// True for sequential media types.
    pub sequential: bool,
    /// Event-stream framing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sse_mode: Option<SseMode>,
    /// XML tree (XML responses).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml: Option<XmlConfig>,
}

/// How an error body is surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorBodyKind {
    /// Textual (text, json, xml) body.
    #[serde(rename = "string")]
    String,
    /// Binary body.
    Blob,
    /// No body.
    #[serde(rename = "void")]
    Void,
}

/// A non-2xx response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponseModel {
    /// Status code key (`404`, `4XX`, `default`).
    pub status: String,
    /// Body classification.
    pub kind: ErrorBodyKind,
}

/// Everything an emitter needs to generate one client method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationSemanticModel {
    /// Generated method name.
    pub method_name: String,
    /// HTTP method, upper-case.
    pub http_method: String,
    /// Path template or webhook name.
    pub path: String,
    /// Declared operationId.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    /// Path or webhook.
    pub kind: RouteKind,
    /// Parameters, required first.
    pub parameters: Vec<ParameterModel>,
    /// Request payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyModel>,
    /// Successful response shapes.
    pub response_variants: Vec<ResponseVariant>,
    /// Union of variant types, `void` when there are none.
    pub return_type: String,
    /// Event-stream framing of the first event-stream variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sse_mode: Option<SseMode>,
    /// Error responses.
    pub error_responses: Vec<ErrorResponseModel>,
    /// Effective servers.
    pub servers: Vec<ServerInfo>,
    /// Doc comment text.
    pub doc: String,
}
