#![deny(missing_docs)]

//! # Runtime Expressions
//!
//! Evaluates OpenAPI runtime expressions (Links, Callbacks) against a
//! request/response context.
//!
//! Supported sources: `$url`, `$method`, `$statusCode`,
//! `$request.header.<name>`, `$request.query.<name>`, `$request.path.<name>`,
//! `$request.body[#<pointer>]` and the `$response.*` mirror (without `path`).
//!
//! Templates (`"https://x/{$request.path.id}"`) evaluate each `{...}` segment
//! independently. If any segment does not resolve, the whole template
//! evaluates to `None`.

use crate::oas::models::RuntimeExpression;
use crate::oas::ref_utils::{plain_pointer_segments, walk_pointer};
use serde_json::Value;
use std::collections::HashMap;

/// Request side of an evaluation context.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Headers (matched case-insensitively).
    pub headers: HashMap<String, String>,
    /// Query parameters (case-sensitive).
    pub query: HashMap<String, String>,
    /// Path parameters (case-sensitive).
    pub path: HashMap<String, String>,
    /// Parsed body.
    pub body: Option<Value>,
}

/// Response side of an evaluation context.
#[derive(Debug, Clone, Default)]
pub struct ResponseContext {
    /// Headers (matched case-insensitively).
    pub headers: HashMap<String, String>,
    /// Parsed body.
    pub body: Option<Value>,
}

/// Everything a runtime expression can observe.
#[derive(Debug, Clone, Default)]
pub struct RuntimeContext {
    /// Full request URL.
    pub url: String,
    /// HTTP method.
    pub method: String,
    /// Response status code.
    pub status_code: u16,
    /// Request data, when available.
    pub request: Option<RequestContext>,
    /// Response data, when available.
    pub response: Option<ResponseContext>,
}

impl RuntimeExpression {
    /// Evaluates this expression against `ctx`.
    pub fn evaluate(&self, ctx: &RuntimeContext) -> Option<Value> {
        evaluate(self.as_str(), ctx)
    }
}

/// Evaluates a runtime expression or a `{...}` template.
///
/// Unrecognized forms and references to an absent request/response yield `None`.
pub fn evaluate(expression: &str, ctx: &RuntimeContext) -> Option<Value> {
    if expression.starts_with('$') {
        return evaluate_expression(expression, ctx);
    }
    if !expression.contains('{') {
        return None;
    }
    evaluate_template(expression, ctx)
}

fn evaluate_template(template: &str, ctx: &RuntimeContext) -> Option<Value> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}')?;
        let value = evaluate(after[..end].trim(), ctx)?;
        match value {
            Value::String(s) => out.push_str(&s),
            other => out.push_str(&other.to_string()),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(Value::String(out))
}

fn evaluate_expression(expression: &str, ctx: &RuntimeContext) -> Option<Value> {
    match expression {
        "$url" => return Some(Value::String(ctx.url.clone())),
        "$method" => return Some(Value::String(ctx.method.clone())),
        "$statusCode" => return Some(Value::from(ctx.status_code)),
        _ => {}
    }

    if let Some(source) = expression.strip_prefix("$request.") {
        let request = ctx.request.as_ref()?;
        return evaluate_source(source, &request.headers, Some(request), request.body.as_ref());
    }
    if let Some(source) = expression.strip_prefix("$response.") {
        let response = ctx.response.as_ref()?;
        return evaluate_source(source, &response.headers, None, response.body.as_ref());
    }
    None
}

fn evaluate_source(
    source: &str,
    headers: &HashMap<String, String>,
    request: Option<&RequestContext>,
    body: Option<&Value>,
) -> Option<Value> {
    if let Some(name) = source.strip_prefix("header.") {
        return headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| Value::String(v.clone()));
    }
    if let Some(name) = source.strip_prefix("query.") {
        return request?.query.get(name).map(|v| Value::String(v.clone()));
    }
    if let Some(name) = source.strip_prefix("path.") {
        return request?.path.get(name).map(|v| Value::String(v.clone()));
    }
    if source == "body" {
        return body.cloned();
    }
    if let Some(pointer) = source.strip_prefix("body#") {
        return evaluate_json_pointer(body?, pointer).cloned();
    }
    None
}

/// Walks an RFC 6901 pointer. A leading `#` is stripped; the empty pointer
/// returns `data` itself.
pub fn evaluate_json_pointer<'a>(data: &'a Value, pointer: &str) -> Option<&'a Value> {
    walk_pointer(data, &plain_pointer_segments(pointer))
}
