#![deny(missing_docs)]

//! # Version Normalization
//!
//! Maps Swagger 2.0 constructs onto the OAS 3.x shapes the rest of the
//! pipeline consumes, so downstream logic only ever sees one structure.
//!
//! The rewrites are conservative: unknown fields are carried over untouched
//! and `$ref`s are left as written (they resolve against the raw document).

use crate::oas::models::{SpecKind, SpecVersion};
use serde_json::{json, Map, Value};

/// Dialect assumed by OAS 3.1+ documents without `jsonSchemaDialect`.
pub const OAS_31_DIALECT: &str = "https://spec.openapis.org/oas/3.1/dialect/base";

const DEFAULT_MEDIA_TYPE: &str = "application/json";

/// Schema keywords a Swagger 2.0 non-body parameter carries inline.
const PARAM_SCHEMA_KEYS: [&str; 17] = [
    "type",
    "format",
    "items",
    "enum",
    "default",
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "pattern",
    "minItems",
    "maxItems",
    "uniqueItems",
    "multipleOf",
    "x-nullable",
];

/// Detects `openapi` / `swagger` version fields.
pub fn detect_spec_version(spec: &Value) -> Option<SpecVersion> {
    if let Some(version) = spec.get("openapi").and_then(|v| v.as_str()) {
        return Some(SpecVersion {
            kind: SpecKind::OpenApi,
            version: version.to_string(),
        });
    }
    spec.get("swagger").map(|v| SpecVersion {
        kind: SpecKind::Swagger,
        version: match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        },
    })
}

/// The effective `jsonSchemaDialect`: explicit value, the OAS 3.1 default for
/// 3.1+ documents, nothing for 3.0 and Swagger.
pub fn json_schema_dialect(spec: &Value, version: Option<&SpecVersion>) -> Option<String> {
    let version = version?;
    if version.is_swagger() || version.is_oas30() {
        return None;
    }
    Some(
        spec.get("jsonSchemaDialect")
            .and_then(|v| v.as_str())
            .unwrap_or(OAS_31_DIALECT)
            .to_string(),
    )
}

/// Media types an operation consumes (operation, then document, then JSON).
fn media_list(op: &Value, spec: &Value, key: &str) -> Vec<String> {
    let from = |v: &Value| -> Option<Vec<String>> {
        let list: Vec<String> = v
            .get(key)?
            .as_array()?
            .iter()
            .filter_map(|m| m.as_str())
            .map(str::to_string)
            .collect();
        (!list.is_empty()).then_some(list)
    };
    from(op)
        .or_else(|| from(spec))
        .unwrap_or_else(|| vec![DEFAULT_MEDIA_TYPE.to_string()])
}

/// Rewrites a Swagger 2.0 non-body parameter into OAS 3 form.
///
/// `type`/`format`/`items`/... move into `schema`; `collectionFormat` maps to
/// `style`/`explode`.
pub fn normalize_swagger_parameter(param: &Value) -> Value {
    let Value::Object(map) = param else {
        return param.clone();
    };
    let mut out = Map::new();
    let mut schema = Map::new();
    for (key, value) in map {
        if PARAM_SCHEMA_KEYS.contains(&key.as_str()) {
            schema.insert(key.clone(), normalize_swagger_items(value, key));
        } else if key != "collectionFormat" && key != "allowEmptyValue" {
            out.insert(key.clone(), value.clone());
        }
    }
    if schema.get("type").and_then(|t| t.as_str()) == Some("file") {
        schema.insert("type".into(), json!("string"));
        schema.insert("format".into(), json!("binary"));
    }
    if !schema.is_empty() && !out.contains_key("schema") {
        out.insert("schema".into(), Value::Object(schema));
    }

    if let Some(format) = map.get("collectionFormat").and_then(|v| v.as_str()) {
        let location = map.get("in").and_then(|v| v.as_str()).unwrap_or("query");
        let (style, explode) = match format {
            "ssv" => ("spaceDelimited", false),
            "pipes" => ("pipeDelimited", false),
            "multi" => ("form", true),
            // `csv` and `tsv` have no exact OAS 3 style; comma-joined is closest.
            _ => match location {
                "query" | "formData" => ("form", false),
                _ => ("simple", false),
            },
        };
        out.insert("style".into(), json!(style));
        out.insert("explode".into(), json!(explode));
    }
    Value::Object(out)
}

fn normalize_swagger_items(value: &Value, key: &str) -> Value {
    if key != "items" {
        return value.clone();
    }
    let Value::Object(items) = value else {
        return value.clone();
    };
    let mut out = items.clone();
    out.remove("collectionFormat");
    if let Some(nested) = items.get("items") {
        out.insert("items".into(), normalize_swagger_items(nested, "items"));
    }
    Value::Object(out)
}

/// Builds an OAS 3 `requestBody` from Swagger 2.0 `body` / `formData` parameters.
///
/// Returns the remaining (non-body) parameters and the synthesized body.
pub fn split_swagger_body(
    params: Vec<Value>,
    op: &Value,
    spec: &Value,
) -> (Vec<Value>, Option<Value>) {
    let mut rest = Vec::new();
    let mut body = None;
    let mut form_props = Map::new();
    let mut form_required = Vec::new();
    let mut has_file = false;

    for param in params {
        match param.get("in").and_then(|v| v.as_str()) {
            Some("body") => {
                let schema = param.get("schema").cloned().unwrap_or_else(|| json!({}));
                let content: Map<String, Value> = media_list(op, spec, "consumes")
                    .into_iter()
                    .map(|mt| (mt, json!({ "schema": schema.clone() })))
                    .collect();
                let mut request = Map::new();
                request.insert("content".into(), Value::Object(content));
                if let Some(desc) = param.get("description") {
                    request.insert("description".into(), desc.clone());
                }
                if param.get("required").and_then(|v| v.as_bool()) == Some(true) {
                    request.insert("required".into(), json!(true));
                }
                request.insert("x-body-name".into(), param.get("name").cloned().unwrap_or(json!("body")));
                body = Some(Value::Object(request));
            }
            Some("formData") => {
                let Some(name) = param.get("name").and_then(|v| v.as_str()).map(str::to_string) else {
                    continue;
                };
                let normalized = normalize_swagger_parameter(&param);
                let mut schema = normalized.get("schema").cloned().unwrap_or_else(|| json!({}));
                if schema.get("format").and_then(|f| f.as_str()) == Some("binary") {
                    has_file = true;
                }
                if let (Some(desc), Value::Object(obj)) = (param.get("description"), &mut schema) {
                    obj.entry("description").or_insert_with(|| desc.clone());
                }
                if param.get("required").and_then(|v| v.as_bool()) == Some(true) {
                    form_required.push(json!(name.clone()));
                }
                form_props.insert(name, schema);
            }
            _ => rest.push(param),
        }
    }

    if body.is_none() && !form_props.is_empty() {
        let consumes = media_list(op, spec, "consumes");
        let media = if has_file || consumes.iter().any(|m| m == "multipart/form-data") {
            "multipart/form-data"
        } else {
            "application/x-www-form-urlencoded"
        };
        let mut schema = json!({ "type": "object", "properties": form_props });
        if !form_required.is_empty() {
            schema["required"] = Value::Array(form_required);
        }
        body = Some(json!({ "content": { media: { "schema": schema } } }));
    }

    (rest, body)
}

/// Rewrites a Swagger 2.0 Response Object: `schema` becomes `content` per
/// `produces`, header `type`/`format` become a header `schema`.
pub fn normalize_swagger_response(response: &Value, op: &Value, spec: &Value) -> Value {
    let Value::Object(map) = response else {
        return response.clone();
    };
    let mut out = map.clone();

    if let Some(schema) = out.remove("schema") {
        let mut content = Map::new();
        for mt in media_list(op, spec, "produces") {
            let mut media = Map::new();
            media.insert("schema".into(), schema.clone());
            if let Some(example) = map.get("examples").and_then(|e| e.get(&mt)) {
                media.insert("example".into(), example.clone());
            }
            content.insert(mt, Value::Object(media));
        }
        out.insert("content".into(), Value::Object(content));
        out.remove("examples");
    }

    if let Some(Value::Object(headers)) = out.get_mut("headers") {
        for header in headers.values_mut() {
            if let Value::Object(h) = header {
                if h.contains_key("schema") || h.contains_key("$ref") {
                    continue;
                }
                let mut schema = Map::new();
                for key in PARAM_SCHEMA_KEYS {
                    if let Some(v) = h.remove(key) {
                        schema.insert(key.to_string(), v);
                    }
                }
                h.remove("collectionFormat");
                if !schema.is_empty() {
                    h.insert("schema".into(), Value::Object(schema));
                }
            }
        }
    }

    Value::Object(out)
}

/// Rewrites a Swagger 2.0 Security Scheme into the OAS 3 shape.
pub fn normalize_swagger_security_scheme(scheme: &Value) -> Value {
    let Value::Object(map) = scheme else {
        return scheme.clone();
    };
    match map.get("type").and_then(|v| v.as_str()) {
        Some("basic") => {
            let mut out = map.clone();
            out.insert("type".into(), json!("http"));
            out.insert("scheme".into(), json!("basic"));
            Value::Object(out)
        }
        Some("oauth2") => {
            let mut out = Map::new();
            let mut flow = Map::new();
            for (key, value) in map {
                match key.as_str() {
                    "flow" => {}
                    "authorizationUrl" | "tokenUrl" | "scopes" => {
                        flow.insert(key.clone(), value.clone());
                    }
                    _ => {
                        out.insert(key.clone(), value.clone());
                    }
                }
            }
            flow.entry("scopes").or_insert_with(|| json!({}));
            let flow_name = match map.get("flow").and_then(|v| v.as_str()) {
                Some("implicit") => "implicit",
                Some("password") => "password",
                Some("application") => "clientCredentials",
                _ => "authorizationCode",
            };
            out.insert("flows".into(), json!({ flow_name: Value::Object(flow) }));
            Value::Object(out)
        }
        _ => scheme.clone(),
    }
}
