//! Error types for the format codec

use crate::format::DType;
use thiserror::Error;

/// Result type for codec operations
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised by encoding, decoding and hex formatting
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The tensor's element type does not match the declared storage format
    #[error("format mismatch: expected {expected} elements, found {found}")]
    FormatMismatch { expected: DType, found: DType },

    /// Byte order string is neither `little` nor `big`
    #[error("invalid byte order '{0}': expected 'little' or 'big'")]
    InvalidByteOrder(String),

    /// Element count does not agree with the tensor shape
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Byte sequence length is not a multiple of the unit being regrouped
    #[error("{len} bytes cannot be split into {unit}-byte units")]
    Misaligned { len: usize, unit: usize },

    /// Only 1, 2 and 4 byte units are interpretable
    #[error("unsupported unit size: {0} bytes")]
    UnsupportedUnitSize(usize),

    /// A hex artifact token could not be parsed
    #[error("invalid hex token '{token}': {reason}")]
    InvalidHex { token: String, reason: String },
}
