#![deny(missing_docs)]

//! # XML Configuration
//!
//! Derives the XML serialization tree of a schema. Depth is capped at
//! [`MAX_XML_DEPTH`]; unresolvable or missing schemas yield an empty config.

use crate::analyzer::models::XmlConfig;
use crate::analyzer::AnalysisContext;
use crate::oas::ref_utils::{extract_ref_name, reference_of};
use serde_json::Value;
use url::Url;

/// Nesting limit of the XML tree.
pub const MAX_XML_DEPTH: usize = 5;

/// Builds the XML config tree of `schema`.
pub fn xml_config(ctx: &AnalysisContext<'_>, schema: Option<&Value>, base: &Url) -> XmlConfig {
    build(ctx, schema, base, 0)
}

fn build(ctx: &AnalysisContext<'_>, schema: Option<&Value>, base: &Url, depth: usize) -> XmlConfig {
    if depth > MAX_XML_DEPTH {
        return XmlConfig::default();
    }
    let Some(raw) = schema else {
        return XmlConfig::default();
    };
    let Some((schema, base)) = ctx.resolve(raw, base) else {
        return XmlConfig::default();
    };

    let xml = schema.get("xml");
    let text = |key: &str| {
        xml.and_then(|x| x.get(key))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };
    let flag = |key: &str| xml.and_then(|x| x.get(key)).and_then(|v| v.as_bool()).unwrap_or(false);

    let node_type = text("nodeType");
    let mut config = XmlConfig {
        name: text("name").or_else(|| reference_of(raw).map(extract_ref_name)),
        namespace: text("namespace"),
        prefix: text("prefix"),
        attribute: flag("attribute") || node_type.as_deref() == Some("attribute"),
        wrapped: flag("wrapped"),
        node_type,
        ..XmlConfig::default()
    };

    let mut property_sources = vec![schema.clone()];
    if let Some(parts) = schema.get("allOf").and_then(|p| p.as_array()) {
        property_sources.extend(parts.iter().filter_map(|p| ctx.resolve(p, &base).map(|(v, _)| v)));
    }
    for source in &property_sources {
        if let Some(props) = source.get("properties").and_then(|p| p.as_object()) {
            for (name, prop) in props {
                let mut child = build(ctx, Some(prop), &base, depth + 1);
                if child.name.is_none() {
                    child.name = Some(name.clone());
                }
                config.properties.insert(name.clone(), child);
            }
        }
    }

    let items = schema.get("items");
    let positions = schema
        .get("prefixItems")
        .and_then(|p| p.as_array())
        .or_else(|| items.and_then(|i| i.as_array()));
    if let Some(positions) = positions {
        config.prefix_items = positions
            .iter()
            .map(|p| build(ctx, Some(p), &base, depth + 1))
            .collect();
    }
    if let Some(item) = items.filter(|i| i.is_object()) {
        config.items = Some(Box::new(build(ctx, Some(item), &base, depth + 1)));
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DateType;
    use crate::oas::document::Document;
    use crate::oas::registry::DocumentCache;
    use crate::oas::resolver::Resolver;
    use serde_json::json;

    fn build_for(doc: Value, schema: Value) -> XmlConfig {
        let uri = Url::parse("https://example.com/api.json").unwrap();
        let mut cache = DocumentCache::new();
        cache.insert(Document::new(uri.clone(), doc));
        let ctx = AnalysisContext::new(Resolver::new(&cache, &uri), DateType::String);
        xml_config(&ctx, Some(&schema), &uri)
    }

    #[test]
    fn test_properties_and_attributes() {
        let doc = json!({"components": {"schemas": {"Pet": {
            "type": "object",
            "xml": {"name": "pet", "namespace": "urn:pets", "prefix": "p"},
            "properties": {
                "id": {"type": "integer", "xml": {"attribute": true}},
                "tags": {"type": "array", "xml": {"wrapped": true}, "items": {"type": "string", "xml": {"name": "tag"}}},
                "note": {"type": "string", "xml": {"nodeType": "cdata"}}
            }
        }}}});
        let config = build_for(doc, json!({"$ref": "#/components/schemas/Pet"}));
        assert_eq!(config.name.as_deref(), Some("pet"));
        assert_eq!(config.prefix.as_deref(), Some("p"));
        assert!(config.properties["id"].attribute);
        assert!(config.properties["tags"].wrapped);
        assert_eq!(
            config.properties["tags"].items.as_ref().and_then(|i| i.name.as_deref()),
            Some("tag")
        );
        assert_eq!(config.properties["note"].node_type.as_deref(), Some("cdata"));
    }

    #[test]
    fn test_ref_name_fallback_and_tuples() {
        let doc = json!({"components": {"schemas": {"Point": {
            "type": "array",
            "prefixItems": [{"type": "number", "xml": {"name": "x"}}, {"type": "number", "xml": {"name": "y"}}]
        }}}});
        let config = build_for(doc, json!({"$ref": "#/components/schemas/Point"}));
        assert_eq!(config.name.as_deref(), Some("Point"));
        assert_eq!(config.prefix_items.len(), 2);
        assert_eq!(config.prefix_items[1].name.as_deref(), Some("y"));
    }

    #[test]
    fn test_unresolvable_and_recursive_schemas() {
        assert_eq!(
            build_for(json!({}), json!({"$ref": "#/components/schemas/Missing"})),
            XmlConfig::default()
        );

        let doc = json!({"components": {"schemas": {"Tree": {
            "type": "object",
            "properties": {"child": {"$ref": "#/components/schemas/Tree"}}
        }}}});
        let mut node = build_for(doc, json!({"$ref": "#/components/schemas/Tree"}));
        let mut levels = 0;
        while let Some(child) = node.properties.get("child").cloned() {
            node = child;
            levels += 1;
        }
        assert_eq!(levels, MAX_XML_DEPTH + 1);
    }
}
