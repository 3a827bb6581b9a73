#![deny(missing_docs)]

//! # Inspect Command
//!
//! Prints a JSON summary of a parsed document.

use oasgen_core::SwaggerParser;
use serde_json::{json, Value};

use crate::error::CliResult;
use crate::spec_args::SpecArgs;

/// Arguments for the inspect command.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Document and configuration.
    #[clap(flatten)]
    pub spec: SpecArgs,
}

/// Builds the summary of a parsed document.
pub fn summarize(parser: &SwaggerParser) -> Value {
    let operations = |ops: &[oasgen_core::ResolvedOperation]| -> Vec<Value> {
        ops.iter()
            .map(|op| {
                json!({
                    "method": op.method,
                    "path": op.path,
                    "operationId": op.operation_id,
                    "methodName": op.method_name,
                })
            })
            .collect()
    };

    json!({
        "specVersion": parser.get_spec_version(),
        "jsonSchemaDialect": parser.json_schema_dialect(),
        "documents": parser.cache().documents().map(|d| d.retrieval_uri().to_string()).collect::<Vec<_>>(),
        "servers": parser.servers(),
        "operations": operations(parser.operations()),
        "webhooks": operations(parser.webhooks()),
        "schemas": parser.schemas().keys().collect::<Vec<_>>(),
        "securitySchemes": parser.get_security_schemes().keys().collect::<Vec<_>>(),
    })
}

/// Executes the inspection.
pub fn execute(args: &InspectArgs) -> CliResult<()> {
    let parser = args.spec.load()?;
    println!("{}", serde_json::to_string_pretty(&summarize(&parser))?);
    Ok(())
}
