//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Fatal conditions (load and validation failures) travel as `AppError`.
//! Resolution misses are not errors: they are logged and surface as `None`.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A document could not be read, fetched or parsed.
    /// The message is complete on its own (it names the URI).
    #[from(ignore)]
    #[display("{_0}")]
    Load(String),

    /// The document violates a structural rule required for generation.
    #[from(ignore)]
    #[display("Validation Error: {_0}")]
    Validation(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Builds the uniform parse failure error for the document at `uri`.
    ///
    /// Any displayable cause is accepted, so parser errors of every kind are
    /// reported with the same shape.
    pub fn parse_failure(uri: impl std::fmt::Display, cause: impl std::fmt::Display) -> Self {
        AppError::Load(format!(
            "Failed to parse content from {}. Error: {}",
            uri, cause
        ))
    }
}
