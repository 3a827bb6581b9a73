#![deny(missing_docs)]

//! # Document Loading
//!
//! Reads a spec document from disk or over HTTP, detects JSON vs YAML and
//! establishes the base URI used for its relative references.
//!
//! The `$self` asymmetry is kept here: `$self` governs how a document's own
//! relative `$ref`s resolve, while its relative server URLs keep resolving
//! against the retrieval URI.

use crate::error::{AppError, AppResult};
use serde_json::Value;
use std::path::Path;
use tracing::debug;
use url::Url;

/// The serialization format of a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
    /// Unknown extension: sniff JSON first, then YAML.
    Unknown,
}

/// Detects the content format from the last path segment's extension.
pub fn detect_format(uri: &Url) -> ContentFormat {
    let last = uri
        .path_segments()
        .and_then(|mut segs| segs.next_back())
        .unwrap_or_default()
        .to_ascii_lowercase();
    if last.ends_with(".json") {
        ContentFormat::Json
    } else if last.ends_with(".yaml") || last.ends_with(".yml") {
        ContentFormat::Yaml
    } else {
        ContentFormat::Unknown
    }
}

/// Parses document text into a JSON value.
///
/// Every failure is reported as `Failed to parse content from <uri>. Error: <message>`.
pub fn parse_content(text: &str, uri: &Url) -> AppResult<Value> {
    let parsed = match detect_format(uri) {
        ContentFormat::Json => serde_json::from_str::<Value>(text).map_err(|e| e.to_string()),
        ContentFormat::Yaml => serde_yaml::from_str::<Value>(text).map_err(|e| e.to_string()),
        ContentFormat::Unknown => serde_json::from_str::<Value>(text)
            .or_else(|_| serde_yaml::from_str::<Value>(text))
            .map_err(|e| e.to_string()),
    };
    parsed.map_err(|e| AppError::parse_failure(uri, e))
}

/// Abstracts how document text is obtained for a URI.
pub trait DocumentFetcher {
    /// Returns the raw text stored at `uri`.
    fn fetch(&self, uri: &Url) -> AppResult<String>;
}

/// Reads `file://` URLs from disk and `http(s)://` URLs over the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFetcher;

impl DocumentFetcher for DefaultFetcher {
    fn fetch(&self, uri: &Url) -> AppResult<String> {
        match uri.scheme() {
            "file" => {
                let path = uri
                    .to_file_path()
                    .map_err(|_| AppError::Load(format!("Invalid file URL: {}", uri)))?;
                if !path.exists() {
                    return Err(AppError::Load(format!(
                        "Input file not found: {}",
                        path.display()
                    )));
                }
                debug!(uri = %uri, "reading document from disk");
                Ok(std::fs::read_to_string(&path)?)
            }
            "http" | "https" => fetch_remote(uri),
            other => Err(AppError::Load(format!(
                "Unsupported URI scheme '{}' for {}",
                other, uri
            ))),
        }
    }
}

#[cfg(feature = "remote")]
fn fetch_remote(uri: &Url) -> AppResult<String> {
    debug!(uri = %uri, "fetching remote document");
    match ureq::get(uri.as_str()).call() {
        Ok(mut response) => response
            .body_mut()
            .read_to_string()
            .map_err(|e| AppError::Load(format!("Failed to read body of {}: {}", uri, e))),
        Err(ureq::Error::StatusCode(code)) => {
            let reason = ureq::http::StatusCode::from_u16(code)
                .ok()
                .and_then(|status| status.canonical_reason())
                .unwrap_or("Unknown Status");
            Err(AppError::Load(format!(
                "Failed to fetch {}: {} {}",
                uri, code, reason
            )))
        }
        Err(e) => Err(AppError::Load(format!("Failed to fetch {}: {}", uri, e))),
    }
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(uri: &Url) -> AppResult<String> {
    Err(AppError::Load(format!(
        "Cannot fetch {}: built without the `remote` feature",
        uri
    )))
}

/// Converts a CLI-style input (URL or local path) into an absolute URL.
pub fn input_to_uri(input: &str) -> AppResult<Url> {
    if let Ok(url) = Url::parse(input) {
        // Windows drive letters parse as one-letter schemes.
        if url.scheme().len() > 1 {
            return Ok(url);
        }
    }

    let path = Path::new(input);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Url::from_file_path(&absolute)
        .map_err(|_| AppError::Load(format!("Invalid input path: {}", input)))
}

/// An immutable parsed spec document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    retrieval_uri: Url,
    base_uri: Url,
    root: Value,
}

impl Document {
    /// Wraps a parsed tree fetched from `retrieval_uri`.
    pub fn new(retrieval_uri: Url, root: Value) -> Self {
        let mut retrieval_uri = retrieval_uri;
        retrieval_uri.set_fragment(None);
        let base_uri = root
            .get("$self")
            .and_then(|v| v.as_str())
            .and_then(|self_uri| retrieval_uri.join(self_uri).ok())
            .map(|mut url| {
                url.set_fragment(None);
                url
            })
            .unwrap_or_else(|| retrieval_uri.clone());
        Self {
            retrieval_uri,
            base_uri,
            root,
        }
    }

    /// Where the document was read from. Relative server URLs resolve against this.
    pub fn retrieval_uri(&self) -> &Url {
        &self.retrieval_uri
    }

    /// The URI the document's own relative references resolve against.
    pub fn base_uri(&self) -> &Url {
        &self.base_uri
    }

    /// The parsed tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The declared `$self`, if any.
    pub fn self_uri(&self) -> Option<&str> {
        self.root.get("$self").and_then(|v| v.as_str())
    }
}

/// Loads and parses a single document.
pub fn load_document(uri: &Url, fetcher: &dyn DocumentFetcher) -> AppResult<Document> {
    let text = fetcher.fetch(uri)?;
    let root = parse_content(&text, uri)?;
    Ok(Document::new(uri.clone(), root))
}
