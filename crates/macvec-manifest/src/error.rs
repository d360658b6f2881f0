//! Error types for manifest parsing and validation

use thiserror::Error;

/// Result type for manifest operations
pub type Result<T> = std::result::Result<T, ManifestError>;

/// Errors that can occur while loading a `macvec.toml`
#[derive(Debug, Error)]
pub enum ManifestError {
    /// I/O error reading the manifest file
    #[error("I/O error: {0}")]
    Io(String),

    /// TOML parsing error, including unknown keys and layout names
    #[error("Failed to parse manifest: {0}")]
    Parse(String),

    /// Semantically invalid values
    #[error("Validation error: {0}")]
    Validation(String),
}
