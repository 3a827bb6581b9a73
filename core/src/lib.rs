#![deny(missing_docs)]

//! # OASGen Core
//!
//! Reference resolution and semantic analysis for OpenAPI 3.x and Swagger 2.0
//! documents: loading, validation, multi-document `$ref` resolution, version
//! normalization, polymorphism, runtime expressions and the per-operation
//! model client generators template from.

/// Shared error types.
pub mod error;

/// Generator configuration.
pub mod config;

/// OpenAPI (OAS) loading, resolution and parsing.
pub mod oas;

/// Per-operation semantic analysis.
pub mod analyzer;

pub use analyzer::{OperationSemanticModel, ServiceMethodAnalyzer};
pub use config::{DateType, GeneratorConfig, GeneratorOptions};
pub use error::{AppError, AppResult};
pub use oas::{
    DefaultFetcher, DiscriminatorRegistry, DocumentCache, DocumentFetcher, PolymorphicOption,
    ResolvedOperation, Resolver, ServerInfo, SpecVersion, SwaggerParser,
};
