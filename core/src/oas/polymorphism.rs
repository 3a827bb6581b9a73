#![deny(missing_docs)]

//! # Polymorphism
//!
//! Turns `discriminator` + `oneOf`/`anyOf` schemas into the list of tagged
//! variants a client needs, and into the lookup registry emitted into the
//! generated runtime.

use crate::oas::ref_utils::{extract_ref_name, parse_reference, ref_type_name, reference_of};
use crate::oas::resolver::Resolver;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// One selectable variant of a polymorphic schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolymorphicOption {
    /// Discriminator tag value.
    pub name: String,
    /// Resolved variant schema.
    pub schema: Value,
}

/// Tag-to-type lookup for one discriminated union.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscriminatorRegistry {
    /// Property carrying the tag.
    pub property_name: String,
    /// Tag value to variant type name.
    pub mapping: IndexMap<String, String>,
    /// Fallback variant type name (`defaultMapping`, OAS 3.2).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_mapping: Option<String>,
}

/// Resolves discriminator mappings through a resolver, with a by-name
/// fallback into the document's schema map.
#[derive(Debug, Clone, Copy)]
pub struct PolymorphismResolver<'a> {
    resolver: Resolver<'a>,
    schemas: &'a IndexMap<String, Value>,
    swagger: bool,
}

impl<'a> PolymorphismResolver<'a> {
    /// `schemas` are the document's named schemas (`components/schemas` or `definitions`).
    pub fn new(resolver: Resolver<'a>, schemas: &'a IndexMap<String, Value>, swagger: bool) -> Self {
        Self {
            resolver,
            schemas,
            swagger,
        }
    }

    /// Returns the tagged variants of `schema`, or an empty list when it has
    /// no `discriminator.propertyName` or no `oneOf`/`anyOf` members.
    pub fn options(&self, schema: &Value) -> Vec<PolymorphicOption> {
        let Some(schema) = self.resolver.resolve(schema) else {
            return Vec::new();
        };
        let Some(property) = discriminator_property(&schema) else {
            return Vec::new();
        };
        let members = union_members(&schema);
        if members.is_empty() {
            return Vec::new();
        }

        match explicit_mapping(&schema) {
            Some(mapping) => mapping
                .iter()
                .filter_map(|(tag, target)| {
                    let target = target.as_str()?;
                    match self.lookup_target(target) {
                        Some((_, resolved)) => Some(PolymorphicOption {
                            name: tag.clone(),
                            schema: resolved,
                        }),
                        None => {
                            warn!(tag = %tag, target = %target, "skipping unresolvable discriminator mapping");
                            None
                        }
                    }
                })
                .collect(),
            None => members
                .iter()
                .filter_map(|member| {
                    let resolved = self.resolver.resolve(member)?;
                    let tag = self.implicit_tag(&resolved, property)?;
                    Some(PolymorphicOption {
                        name: tag,
                        schema: resolved,
                    })
                })
                .collect(),
        }
    }

    /// Builds the tag-to-type registry for `schema`.
    pub fn registry(&self, schema: &Value) -> Option<DiscriminatorRegistry> {
        let schema = self.resolver.resolve(schema)?;
        let property = discriminator_property(&schema)?;
        let mut registry = DiscriminatorRegistry {
            property_name: property.to_string(),
            ..Default::default()
        };

        match explicit_mapping(&schema) {
            Some(mapping) => {
                for (tag, target) in mapping {
                    let Some(target) = target.as_str() else {
                        continue;
                    };
                    if let Some((name, _)) = self.lookup_target(target) {
                        registry.mapping.insert(tag.clone(), name);
                    }
                }
            }
            None => {
                for member in union_members(&schema) {
                    let Some(reference) = reference_of(member) else {
                        continue;
                    };
                    let Some(resolved) = self.resolver.resolve(member) else {
                        continue;
                    };
                    if let Some(tag) = self.implicit_tag(&resolved, property) {
                        registry.mapping.insert(tag, ref_type_name(reference));
                    }
                }
            }
        }

        registry.default_mapping = schema
            .get("discriminator")
            .and_then(|d| d.get("defaultMapping"))
            .and_then(|v| v.as_str())
            .and_then(|target| self.lookup_target(target))
            .map(|(name, _)| name);

        debug!(property = %registry.property_name, variants = registry.mapping.len(), "built discriminator registry");
        Some(registry)
    }

    /// Resolves a mapping value to `(type name, schema)`.
    ///
    /// Bare names point into the document's schemas; references go through
    /// the resolver and fall back to a PascalCase name lookup.
    fn lookup_target(&self, target: &str) -> Option<(String, Value)> {
        let is_bare_name = !target.contains('#') && !target.contains('/') && {
            let parsed = parse_reference(target);
            !parsed.document.ends_with(".json")
                && !parsed.document.ends_with(".yaml")
                && !parsed.document.ends_with(".yml")
        };
        if is_bare_name {
            let section = if self.swagger { "definitions" } else { "components/schemas" };
            let reference = format!("#/{}/{}", section, target);
            return self
                .resolver
                .resolve_reference(&reference)
                .or_else(|| self.schemas.get(target).cloned())
                .map(|schema| (target.to_string(), schema));
        }

        if let Some(schema) = self.resolver.resolve_reference(target) {
            return Some((ref_type_name(target), schema));
        }

        let simple = extract_ref_name(target);
        let pascal = ref_type_name(target);
        let found = [pascal.as_str(), simple.as_str()]
            .into_iter()
            .find_map(|name| self.schemas.get(name))
            .map(|schema| (pascal.clone(), schema.clone()));
        found
    }

    /// Implicit tag: first `enum` (or `const`) value of the member's
    /// discriminator property, looking through `allOf` parts.
    fn implicit_tag(&self, member: &Value, property: &str) -> Option<String> {
        let prop_schema = member
            .get("properties")
            .and_then(|props| props.get(property))
            .and_then(|p| self.resolver.resolve(p))
            .or_else(|| {
                member
                    .get("allOf")?
                    .as_array()?
                    .iter()
                    .filter_map(|part| self.resolver.resolve(part))
                    .find_map(|part| {
                        let p = part.get("properties")?.get(property)?;
                        self.resolver.resolve(p)
                    })
            })?;

        let value = prop_schema
            .get("enum")
            .and_then(|e| e.as_array())
            .and_then(|e| e.first())
            .or_else(|| prop_schema.get("const"))?;
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

fn discriminator_property(schema: &Value) -> Option<&str> {
    schema
        .get("discriminator")?
        .get("propertyName")?
        .as_str()
        .filter(|p| !p.is_empty())
}

fn explicit_mapping(schema: &Value) -> Option<&serde_json::Map<String, Value>> {
    schema
        .get("discriminator")?
        .get("mapping")?
        .as_object()
        .filter(|m| !m.is_empty())
}

fn union_members(schema: &Value) -> &[Value] {
    ["oneOf", "anyOf"]
        .into_iter()
        .find_map(|key| schema.get(key)?.as_array().filter(|a| !a.is_empty()))
        .map(Vec::as_slice)
        .unwrap_or_default()
}
