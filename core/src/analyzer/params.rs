#![deny(missing_docs)]

//! # Parameter Resolution
//!
//! Turns resolved parameters into the generated parameter surface:
//! reserved headers are dropped, identifiers are generated (with a
//! `Serialized` suffix for content-based parameters and a location suffix on
//! collisions), serialization defaults are filled in and required
//! parameters are moved first.

use crate::analyzer::models::ParameterModel;
use crate::analyzer::types::schema_type;
use crate::analyzer::AnalysisContext;
use crate::oas::models::{ParamSource, ParamStyle, ResolvedParameter};
use heck::{ToLowerCamelCase, ToUpperCamelCase};
use std::collections::HashMap;

/// Headers the generated client manages itself.
pub const RESERVED_HEADERS: [&str; 3] = ["Accept", "Content-Type", "Authorization"];

/// True for headers excluded from the generated parameter list.
pub fn is_reserved_header(param: &ResolvedParameter) -> bool {
    param.source == ParamSource::Header
        && RESERVED_HEADERS
            .iter()
            .any(|h| h.eq_ignore_ascii_case(&param.name))
}

/// Builds the parameter models of an operation, required parameters first.
pub fn analyze_parameters(
    ctx: &AnalysisContext<'_>,
    params: &[ResolvedParameter],
) -> Vec<ParameterModel> {
    let mut models: Vec<ParameterModel> = params
        .iter()
        .filter(|p| !is_reserved_header(p))
        .map(|p| parameter_model(ctx, p))
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for model in &models {
        *counts.entry(model.identifier.clone()).or_insert(0) += 1;
    }
    for model in &mut models {
        if counts.get(&model.identifier).copied().unwrap_or(0) > 1 {
            model.identifier = format!(
                "{}{}",
                model.identifier,
                model.location.as_str().to_upper_camel_case()
            );
        }
    }

    models.sort_by_key(|m| !m.required);
    models
}

fn parameter_model(ctx: &AnalysisContext<'_>, param: &ResolvedParameter) -> ParameterModel {
    let base = &param.base_uri;
    let mut identifier = param.name.to_lower_camel_case();
    if identifier.is_empty() {
        identifier = "param".to_string();
    }

    let content_entry = param.content.as_ref().and_then(|c| c.iter().next());
    let (type_name, content_type) = match content_entry {
        Some((media_type, entry)) => {
            identifier.push_str("Serialized");
            (
                schema_type(ctx, entry.get("schema"), base),
                Some(media_type.clone()),
            )
        }
        None => (schema_type(ctx, param.schema.as_ref(), base), None),
    };

    let style = param
        .style
        .unwrap_or_else(|| ParamStyle::default_for(param.source));
    ParameterModel {
        name: param.name.clone(),
        identifier,
        location: param.source,
        required: param.required,
        deprecated: param.deprecated,
        type_name,
        description: param.description.clone(),
        serialized: content_entry.is_some(),
        content_type,
        style,
        explode: param.explode.unwrap_or(style == ParamStyle::Form),
        allow_reserved: param.allow_reserved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DateType;
    use crate::oas::document::Document;
    use crate::oas::registry::DocumentCache;
    use crate::oas::resolver::Resolver;
    use indexmap::IndexMap;
    use serde_json::json;
    use url::Url;

    fn api_uri() -> Url {
        Url::parse("https://example.com/api.json").unwrap()
    }

    fn param(name: &str, source: ParamSource, required: bool) -> ResolvedParameter {
        ResolvedParameter {
            name: name.to_string(),
            source,
            required,
            deprecated: false,
            description: None,
            schema: Some(json!({"type": "string"})),
            content: None,
            style: None,
            explode: None,
            allow_reserved: false,
            base_uri: api_uri(),
        }
    }

    fn analyze(params: &[ResolvedParameter]) -> Vec<ParameterModel> {
        let uri = api_uri();
        let mut cache = DocumentCache::new();
        cache.insert(Document::new(uri.clone(), json!({})));
        let ctx = AnalysisContext::new(Resolver::new(&cache, &uri), DateType::Date);
        analyze_parameters(&ctx, params)
    }

    #[test]
    fn test_reserved_headers_are_filtered() {
        let models = analyze(&[
            param("accept", ParamSource::Header, false),
            param("Authorization", ParamSource::Header, true),
            param("X-Trace-Id", ParamSource::Header, false),
            param("Accept", ParamSource::Query, false),
        ]);
        let names: Vec<_> = models.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(names, vec!["xTraceId", "accept"]);
    }

    #[test]
    fn test_required_first_and_stable() {
        let models = analyze(&[
            param("page", ParamSource::Query, false),
            param("id", ParamSource::Path, true),
            param("size", ParamSource::Query, false),
            param("tenant", ParamSource::Header, true),
        ]);
        let names: Vec<_> = models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["id", "tenant", "page", "size"]);
    }

    #[test]
    fn test_content_parameters_are_serialized() {
        let mut soap = param("soap_id", ParamSource::Query, false);
        soap.schema = None;
        soap.content = Some(IndexMap::from([(
            "application/json".to_string(),
            json!({"schema": {"type": "object", "properties": {"a": {"type": "integer"}}}}),
        )]));
        let models = analyze(&[soap]);
        assert_eq!(models[0].identifier, "soapIdSerialized");
        assert!(models[0].serialized);
        assert_eq!(models[0].content_type.as_deref(), Some("application/json"));
        assert_eq!(models[0].type_name, "{ a?: number }");
    }

    #[test]
    fn test_collisions_get_location_suffix() {
        let models = analyze(&[
            param("id", ParamSource::Path, true),
            param("id", ParamSource::Query, false),
        ]);
        let names: Vec<_> = models.iter().map(|m| m.identifier.as_str()).collect();
        assert_eq!(names, vec!["idPath", "idQuery"]);
    }

    #[test]
    fn test_style_defaults_and_date_headers() {
        let mut since = param("If-Modified-Since", ParamSource::Header, false);
        since.schema = Some(json!({"type": "string", "format": "date-time"}));
        let mut tags = param("tags", ParamSource::Query, false);
        tags.schema = Some(json!({"type": "array", "items": {"type": "string"}}));
        let models = analyze(&[since, tags]);

        assert_eq!(models[0].type_name, "Date");
        assert_eq!(models[0].style, ParamStyle::Simple);
        assert!(!models[0].explode);
        assert_eq!(models[1].style, ParamStyle::Form);
        assert!(models[1].explode);
    }
}
