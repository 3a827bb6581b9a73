#![deny(missing_docs)]

//! # Validate Command
//!
//! Loads a document with all its references and reports validation errors.

use oasgen_core::oas::SpecKind;

use crate::error::CliResult;
use crate::spec_args::SpecArgs;

/// Arguments for the validate command.
#[derive(clap::Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Document and configuration.
    #[clap(flatten)]
    pub spec: SpecArgs,
}

/// Executes the validation. Any load or validation failure is returned as an error.
pub fn execute(args: &ValidateArgs) -> CliResult<String> {
    let parser = args.spec.load()?;
    let version = match parser.get_spec_version() {
        Some(v) => {
            let family = match v.kind {
                SpecKind::OpenApi => "openapi",
                SpecKind::Swagger => "swagger",
            };
            format!("{} {}", family, v.version)
        }
        None => "unknown version".to_string(),
    };

    Ok(format!(
        "{} is valid ({}, {} operations, {} webhooks, {} documents)",
        args.spec.input,
        version,
        parser.operations().len(),
        parser.webhooks().len(),
        parser.cache().len()
    ))
}
