#![deny(missing_docs)]

//! # Generator Configuration
//!
//! The configuration object handed to every component. The core only
//! interprets `options.dateType`; every other generator flag is carried
//! through untouched in `options.extra`.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// How `format: date` / `format: date-time` schemas are represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateType {
    /// Keep dates as ISO-8601 strings.
    #[default]
    #[serde(rename = "string")]
    String,
    /// Use the target language's date type.
    #[serde(rename = "Date")]
    Date,
}

impl DateType {
    /// The type name emitted for date-typed schemas and headers.
    pub fn type_name(self) -> &'static str {
        match self {
            DateType::String => "string",
            DateType::Date => "Date",
        }
    }
}

impl std::str::FromStr for DateType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(DateType::String),
            "Date" | "date" => Ok(DateType::Date),
            other => Err(AppError::General(format!(
                "Unknown dateType '{}', expected 'string' or 'Date'",
                other
            ))),
        }
    }
}

/// Generator options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Date representation used by the analyzer.
    #[serde(default)]
    pub date_type: DateType,
    /// Generator-specific flags the core does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Top-level configuration object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Generator options.
    #[serde(default)]
    pub options: GeneratorOptions,
}

impl GeneratorConfig {
    /// Creates a configuration with the given date representation.
    pub fn with_date_type(date_type: DateType) -> Self {
        Self {
            options: GeneratorOptions {
                date_type,
                ..GeneratorOptions::default()
            },
        }
    }

    /// Loads a configuration file. `.json` is read as JSON, `.yaml`/`.yml`
    /// as YAML, anything else is tried as JSON first and YAML second.
    pub fn from_path(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::Load(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let text = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let parsed = match ext.as_deref() {
            Some("json") => serde_json::from_str(&text).map_err(|e| e.to_string()),
            Some("yaml") | Some("yml") => serde_yaml::from_str(&text).map_err(|e| e.to_string()),
            _ => serde_json::from_str(&text)
                .or_else(|_| serde_yaml::from_str(&text))
                .map_err(|e| e.to_string()),
        };

        parsed.map_err(|e| AppError::parse_failure(path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_date_type_is_string() {
        let config = GeneratorConfig::default();
        assert_eq!(config.options.date_type, DateType::String);
        assert_eq!(config.options.date_type.type_name(), "string");
    }

    #[test]
    fn test_deserialize_keeps_unknown_flags() {
        let config: GeneratorConfig = serde_json::from_value(json!({
            "options": { "dateType": "Date", "framework": "angular", "strict": true }
        }))
        .unwrap();
        assert_eq!(config.options.date_type, DateType::Date);
        assert_eq!(config.options.extra.get("framework"), Some(&json!("angular")));
        assert_eq!(config.options.extra.get("strict"), Some(&json!(true)));
    }

    #[test]
    fn test_from_path_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "options:\n  dateType: Date\n").unwrap();
        let config = GeneratorConfig::from_path(&path).unwrap();
        assert_eq!(config.options.date_type, DateType::Date);
    }

    #[test]
    fn test_from_path_missing() {
        let err = GeneratorConfig::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_date_type_from_str() {
        assert_eq!("Date".parse::<DateType>().unwrap(), DateType::Date);
        assert!("datetime".parse::<DateType>().is_err());
    }
}
