#![deny(missing_docs)]

//! # Service Analysis
//!
//! Entry point combining parameters, bodies, responses and docs into one
//! `OperationSemanticModel` per operation.

use crate::analyzer::body::analyze_request_body;
use crate::analyzer::docs::build_doc;
use crate::analyzer::models::OperationSemanticModel;
use crate::analyzer::params::analyze_parameters;
use crate::analyzer::responses::analyze_responses;
use crate::analyzer::AnalysisContext;
use crate::oas::models::ResolvedOperation;
use crate::oas::parser::SwaggerParser;
use tracing::debug;

/// Analyzes the operations of a parsed document.
#[derive(Debug, Clone, Copy)]
pub struct ServiceMethodAnalyzer<'a> {
    parser: &'a SwaggerParser,
}

impl<'a> ServiceMethodAnalyzer<'a> {
    /// Creates an analyzer over `parser`.
    pub fn new(parser: &'a SwaggerParser) -> Self {
        Self { parser }
    }

    /// Builds the semantic model of `op`.
    ///
    /// Returns `None` only when the operation has no method name.
    pub fn analyze(&self, op: &ResolvedOperation) -> Option<OperationSemanticModel> {
        if op.method_name.is_empty() {
            return None;
        }
        debug!(method = %op.method, path = %op.path, "analyzing operation");

        let ctx = AnalysisContext::new(
            self.parser.resolver(),
            self.parser.config().options.date_type,
        );
        let responses = analyze_responses(&ctx, &op.responses);

        Some(OperationSemanticModel {
            method_name: op.method_name.clone(),
            http_method: op.method.clone(),
            path: op.path.clone(),
            operation_id: op.operation_id.clone(),
            kind: op.kind,
            parameters: analyze_parameters(&ctx, &op.parameters),
            request_body: op
                .request_body
                .as_ref()
                .and_then(|body| analyze_request_body(&ctx, body)),
            response_variants: responses.variants,
            return_type: responses.return_type,
            sse_mode: responses.sse_mode,
            error_responses: responses.errors,
            servers: op.servers.clone(),
            doc: build_doc(op),
        })
    }

    /// Models of every operation, then every webhook, in document order.
    pub fn analyze_all(&self) -> Vec<OperationSemanticModel> {
        self.parser
            .operations()
            .iter()
            .chain(self.parser.webhooks())
            .filter_map(|op| self.analyze(op))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::models::{BodyKind, ErrorBodyKind};
    use crate::config::GeneratorConfig;
    use serde_json::json;

    #[test]
    fn test_analyze_operation() {
        let parser = SwaggerParser::new(
            json!({
                "openapi": "3.1.0",
                "paths": {"/pets/{petId}": {"put": {
                    "operationId": "update-pet",
                    "summary": "Update a pet",
                    "parameters": [
                        {"name": "petId", "in": "path", "schema": {"type": "integer"}},
                        {"name": "Content-Type", "in": "header", "schema": {"type": "string"}},
                        {"name": "dryRun", "in": "query", "schema": {"type": "boolean"}}
                    ],
                    "requestBody": {"required": true, "content": {
                        "application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}
                    }},
                    "responses": {
                        "200": {"description": "ok", "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}},
                        "404": {"description": "missing"}
                    }
                }}},
                "components": {"schemas": {"Pet": {"type": "object"}}}
            }),
            GeneratorConfig::default(),
            None,
            None,
        )
        .unwrap();

        let analyzer = ServiceMethodAnalyzer::new(&parser);
        let model = analyzer.analyze(&parser.operations()[0]).unwrap();
        assert_eq!(model.method_name, "updatePet");
        assert_eq!(model.parameters.len(), 2);
        assert_eq!(model.parameters[0].identifier, "petId");
        let body = model.request_body.as_ref().unwrap();
        assert_eq!((body.kind, body.type_name.as_str()), (BodyKind::Json, "Pet"));
        assert_eq!(model.return_type, "Pet");
        assert_eq!(model.error_responses[0].kind, ErrorBodyKind::Void);
        assert_eq!(model.doc, "Update a pet");
        assert_eq!(analyzer.analyze_all().len(), 1);

        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["httpMethod"], json!("PUT"));
        assert_eq!(json["requestBody"]["kind"], json!("json"));
    }

    #[test]
    fn test_missing_method_name_yields_none() {
        let parser = SwaggerParser::new(
            json!({"openapi": "3.0.0", "paths": {"/a": {"get": {}}}}),
            GeneratorConfig::default(),
            None,
            None,
        )
        .unwrap();
        let analyzer = ServiceMethodAnalyzer::new(&parser);
        let mut op = parser.operations()[0].clone();
        assert_eq!(
            analyzer.analyze(&op).map(|m| m.doc),
            Some("Performs a GET request to /a.".to_string())
        );
        op.method_name.clear();
        assert!(analyzer.analyze(&op).is_none());
    }
}
