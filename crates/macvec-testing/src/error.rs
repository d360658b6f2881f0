//! Error types for vector generation

use macvec_format::CodecError;
use macvec_manifest::ManifestError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerationError>;

/// Any failure aborts the whole run; there is no partial artifact set
#[derive(Debug, Error)]
pub enum GenerationError {
    /// An artifact could not be created or written
    #[error("failed to write artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),
}
