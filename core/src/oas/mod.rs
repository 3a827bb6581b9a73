#![deny(missing_docs)]

//! # OpenAPI Processing Module
//!
//! - **document**: Loading and content parsing.
//! - **registry**: Multi-document cache and schema identity index.
//! - **resolver**: `$ref` / `$dynamicRef` resolution.
//! - **servers**: Server URL resolution.
//! - **normalization**: Version detection and Swagger 2.0 normalization.
//! - **validation**: Structural checks.
//! - **parser**: The `SwaggerParser` façade.
//! - **polymorphism**: Discriminator handling.
//! - **runtime_expression**: Link / callback expression evaluation.

pub mod document;
pub mod models;
pub mod normalization;
pub mod parser;
pub mod polymorphism;
pub mod ref_utils;
pub mod registry;
pub mod resolver;
pub mod runtime_expression;
pub mod servers;
pub mod validation;

pub use document::{DefaultFetcher, Document, DocumentFetcher};
pub use models::{
    ParamSource, ParamStyle, ResolvedOperation, ResolvedParameter, RouteKind, ServerInfo,
    SpecKind, SpecVersion,
};
pub use parser::SwaggerParser;
pub use polymorphism::{DiscriminatorRegistry, PolymorphicOption};
pub use registry::DocumentCache;
pub use resolver::Resolver;
pub use runtime_expression::{evaluate, evaluate_json_pointer, RuntimeContext};
