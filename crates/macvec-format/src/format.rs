//! Storage formats, element types and byte order

use crate::error::CodecError;
use std::fmt;
use std::str::FromStr;

/// In-memory element type of a tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// 8-bit E4M3 float (1 sign, 4 exponent, 3 mantissa)
    F8E4M3,
    /// 16-bit bfloat16 (1 sign, 8 exponent, 7 mantissa)
    BF16,
    /// IEEE-754 single precision
    F32,
}

impl DType {
    /// Exact storage width in bits
    pub const fn bit_width(self) -> usize {
        match self {
            DType::F8E4M3 => 8,
            DType::BF16 => 16,
            DType::F32 => 32,
        }
    }

    /// Storage width in bytes
    pub const fn byte_width(self) -> usize {
        self.bit_width() / 8
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::F8E4M3 => "f8e4m3",
            DType::BF16 => "bf16",
            DType::F32 => "f32",
        };
        f.write_str(name)
    }
}

/// Floating-point encodings that can be serialized into hex artifacts
///
/// `Narrow` is the MAC operand format, `Wide` the accumulator/reference
/// format. Each maps to exactly one [`DType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageFormat {
    /// E4M3, one byte per element
    Narrow,
    /// bfloat16, two bytes per element
    Wide,
}

impl StorageFormat {
    /// Element type a tensor must hold to be encoded in this format
    pub const fn dtype(self) -> DType {
        match self {
            StorageFormat::Narrow => DType::F8E4M3,
            StorageFormat::Wide => DType::BF16,
        }
    }

    pub const fn bit_width(self) -> usize {
        self.dtype().bit_width()
    }

    pub const fn bytes_per_element(self) -> usize {
        self.dtype().byte_width()
    }
}

impl fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageFormat::Narrow => f.write_str("narrow"),
            StorageFormat::Wide => f.write_str("wide"),
        }
    }
}

impl FromStr for StorageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "narrow" | "e4m3" | "fp8" => Ok(StorageFormat::Narrow),
            "wide" | "bf16" | "bfloat16" => Ok(StorageFormat::Wide),
            other => Err(format!(
                "unknown storage format '{}': expected 'narrow' or 'wide'",
                other
            )),
        }
    }
}

/// Ordering of the bytes of a multi-byte element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Least-significant byte first
    #[default]
    Little,
    /// Most-significant byte first
    Big,
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ByteOrder::Little => f.write_str("little"),
            ByteOrder::Big => f.write_str("big"),
        }
    }
}

impl FromStr for ByteOrder {
    type Err = CodecError;

    /// Accepts exactly `little` or `big`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "little" => Ok(ByteOrder::Little),
            "big" => Ok(ByteOrder::Big),
            other => Err(CodecError::InvalidByteOrder(other.to_string())),
        }
    }
}
