#![deny(missing_docs)]

//! # Analyze Command
//!
//! Prints the semantic model of every operation as JSON.

use std::fs;
use std::path::PathBuf;

use oasgen_core::ServiceMethodAnalyzer;

use crate::error::{CliError, CliResult};
use crate::spec_args::SpecArgs;

/// Arguments for the analyze command.
#[derive(clap::Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Document and configuration.
    #[clap(flatten)]
    pub spec: SpecArgs,

    /// Only analyze the operation with this operationId.
    #[clap(long)]
    pub operation: Option<String>,

    /// Write the JSON to this file instead of stdout.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

/// Executes the analysis.
pub fn execute(args: &AnalyzeArgs) -> CliResult<()> {
    let parser = args.spec.load()?;
    let analyzer = ServiceMethodAnalyzer::new(&parser);

    let mut models = analyzer.analyze_all();
    if let Some(id) = &args.operation {
        models.retain(|m| m.operation_id.as_deref() == Some(id.as_str()));
        if models.is_empty() {
            return Err(CliError::General(format!("Operation '{}' not found", id)));
        }
    }

    let json = serde_json::to_string_pretty(&models)?;
    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, json)?;
            eprintln!("Wrote {} operation models to {:?}", models.len(), path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SPEC: &str = r#"
openapi: 3.1.0
info: {title: Pets, version: "1"}
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: {type: array, items: {type: string}}
    post:
      operationId: createPet
      responses:
        "201": {description: created}
"#;

    #[test]
    fn test_analyze_writes_models() {
        let dir = tempdir().unwrap();
        let spec_path = dir.path().join("openapi.yaml");
        fs::write(&spec_path, SPEC).unwrap();
        let out = dir.path().join("out/models.json");

        let args = AnalyzeArgs {
            spec: SpecArgs {
                input: spec_path.to_string_lossy().to_string(),
                config: None,
                date_type: None,
            },
            operation: Some("listPets".into()),
            output: Some(out.clone()),
        };
        execute(&args).unwrap();

        let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(written.as_array().unwrap().len(), 1);
        assert_eq!(written[0]["methodName"], "listPets");
        assert_eq!(written[0]["returnType"], "string[]");
    }

    #[test]
    fn test_unknown_operation_fails() {
        let dir = tempdir().unwrap();
        let spec_path = dir.path().join("openapi.yaml");
        fs::write(&spec_path, SPEC).unwrap();

        let args = AnalyzeArgs {
            spec: SpecArgs {
                input: spec_path.to_string_lossy().to_string(),
                config: None,
                date_type: None,
            },
            operation: Some("missing".into()),
            output: None,
        };
        let err = execute(&args).unwrap_err();
        assert!(err.to_string().contains("missing"));
    }
}
