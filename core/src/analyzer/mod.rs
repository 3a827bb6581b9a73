#![deny(missing_docs)]

//! # Service Method Analyzer
//!
//! Derives the per-operation semantic model code emitters consume.
//!
//! - **media**: Media type classification.
//! - **types**: Schema to type-expression mapping.
//! - **params**: Parameter surface.
//! - **body**: Request body classification and encoding trees.
//! - **xml**: XML configuration trees.
//! - **responses**: Response variants and error classification.
//! - **docs**: Doc comment assembly.
//! - **service**: The `ServiceMethodAnalyzer` entry point.

pub mod body;
pub mod docs;
pub mod media;
pub mod models;
pub mod params;
pub mod responses;
pub mod service;
pub mod types;
pub mod xml;

pub use models::{
    BodyKind, EncodingConfig, ErrorBodyKind, ErrorResponseModel, OperationSemanticModel,
    ParameterModel, RequestBodyModel, ResponseVariant, SseMode, XmlConfig,
};
pub use service::ServiceMethodAnalyzer;

use crate::config::DateType;
use crate::oas::resolver::Resolver;
use serde_json::Value;
use url::Url;

/// Shared state of one analysis pass.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisContext<'a> {
    resolver: Resolver<'a>,
    date_type: DateType,
}

impl<'a> AnalysisContext<'a> {
    /// Creates a context over `resolver`.
    pub fn new(resolver: Resolver<'a>, date_type: DateType) -> Self {
        Self {
            resolver,
            date_type,
        }
    }

    /// Configured date representation.
    pub fn date_type(&self) -> DateType {
        self.date_type
    }

    /// Resolves `node` against `base`, returning the value and the base URI
    /// of the document it lives in. Non-reference nodes come back as is.
    pub fn resolve(&self, node: &Value, base: &Url) -> Option<(Value, Url)> {
        self.resolver
            .resolve_from(node, base)
            .map(|resolved| (resolved.value, resolved.base_uri))
    }
}
