//! macvec format codec
//!
//! Bit-level conversion between in-memory floating-point tensors and the byte
//! sequences written into hex test-vector artifacts.
//!
//! This crate provides:
//! - The E4M3 scalar type used for MAC operands ([`F8E4M3`])
//! - Storage formats, element types and byte order
//! - Row-major typed tensors
//! - `encode`/`decode` between tensors and byte sequences
//! - Unit regrouping and hex row formatting for artifacts

pub mod codec;
pub mod e4m3;
pub mod error;
pub mod format;
pub mod hex;
pub mod tensor;

pub use codec::{chunk_and_interpret, decode, encode, units_to_bytes};
pub use e4m3::F8E4M3;
pub use error::{CodecError, Result};
pub use format::{ByteOrder, DType, StorageFormat};
pub use hex::{format_hex_row, parse_hex_row};
pub use tensor::{Tensor, TensorData};

// Re-exported so downstream crates name the same bf16 type
pub use half::bf16;
