#![deny(missing_docs)]

//! # Spec Arguments
//!
//! Arguments shared by every command that loads a document.

use std::path::PathBuf;

use oasgen_core::{DateType, GeneratorConfig, SwaggerParser};
use tracing::info;

use crate::error::CliResult;

/// Input document and generator configuration.
#[derive(clap::Args, Debug, Clone)]
pub struct SpecArgs {
    /// Path or URL of the OpenAPI / Swagger document.
    pub input: String,

    /// Generator configuration file (JSON or YAML).
    #[clap(long, env = "OASGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides `options.dateType` (`string` or `Date`).
    #[clap(long)]
    pub date_type: Option<DateType>,
}

impl SpecArgs {
    /// Builds the effective configuration.
    pub fn generator_config(&self) -> CliResult<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_path(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(date_type) = self.date_type {
            config.options.date_type = date_type;
        }
        Ok(config)
    }

    /// Loads, validates and parses the input document.
    pub fn load(&self) -> CliResult<SwaggerParser> {
        let config = self.generator_config()?;
        info!(input = %self.input, "loading document");
        Ok(SwaggerParser::create(&self.input, config)?)
    }
}
