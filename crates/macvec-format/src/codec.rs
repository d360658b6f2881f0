//! Bit-exact serialization of tensors into byte sequences
//!
//! Encoding is a pure reinterpretation of each element's bit pattern: no
//! rounding, no range checks. Narrow elements always produce one byte, so the
//! byte order only affects Wide elements.

use crate::e4m3::F8E4M3;
use crate::error::{CodecError, Result};
use crate::format::{ByteOrder, StorageFormat};
use crate::tensor::{Tensor, TensorData};
use half::bf16;

/// Serialize a tensor's elements in row-major order.
///
/// Fails with [`CodecError::FormatMismatch`] before producing any output if
/// the tensor's element type is not the one `format` declares.
pub fn encode(tensor: &Tensor, format: StorageFormat, order: ByteOrder) -> Result<Vec<u8>> {
    match (format, tensor.data()) {
        (StorageFormat::Narrow, TensorData::F8E4M3(values)) => {
            Ok(bytemuck::cast_slice::<F8E4M3, u8>(values).to_vec())
        }
        (StorageFormat::Wide, TensorData::BF16(values)) => {
            let mut out = Vec::with_capacity(values.len() * 2);
            for value in values {
                let bytes = match order {
                    ByteOrder::Little => value.to_bits().to_le_bytes(),
                    ByteOrder::Big => value.to_bits().to_be_bytes(),
                };
                out.extend_from_slice(&bytes);
            }
            Ok(out)
        }
        _ => Err(CodecError::FormatMismatch {
            expected: format.dtype(),
            found: tensor.dtype(),
        }),
    }
}

/// Inverse of [`encode`]: rebuild a 1-D tensor from its byte sequence
pub fn decode(bytes: &[u8], format: StorageFormat, order: ByteOrder) -> Result<Tensor> {
    let width = format.bytes_per_element();
    if bytes.len() % width != 0 {
        return Err(CodecError::Misaligned {
            len: bytes.len(),
            unit: width,
        });
    }

    let data = match format {
        StorageFormat::Narrow => {
            TensorData::F8E4M3(bytemuck::cast_slice::<u8, F8E4M3>(bytes).to_vec())
        }
        StorageFormat::Wide => TensorData::BF16(
            bytes
                .chunks_exact(2)
                .map(|pair| {
                    let pair = [pair[0], pair[1]];
                    let bits = match order {
                        ByteOrder::Little => u16::from_le_bytes(pair),
                        ByteOrder::Big => u16::from_be_bytes(pair),
                    };
                    bf16::from_bits(bits)
                })
                .collect(),
        ),
    };

    Ok(Tensor::vector(data))
}

/// Regroup a byte sequence into `unit_size`-byte unsigned integers.
///
/// Presentation only: the result feeds hex formatting and carries no numeric
/// meaning. `order` says how the bytes inside one unit are read.
pub fn chunk_and_interpret(bytes: &[u8], unit_size: usize, order: ByteOrder) -> Result<Vec<u32>> {
    if !matches!(unit_size, 1 | 2 | 4) {
        return Err(CodecError::UnsupportedUnitSize(unit_size));
    }
    if bytes.len() % unit_size != 0 {
        return Err(CodecError::Misaligned {
            len: bytes.len(),
            unit: unit_size,
        });
    }

    let units = bytes
        .chunks_exact(unit_size)
        .map(|chunk| {
            let fold = |acc: u32, byte: &u8| (acc << 8) | u32::from(*byte);
            match order {
                ByteOrder::Big => chunk.iter().fold(0, fold),
                ByteOrder::Little => chunk.iter().rev().fold(0, fold),
            }
        })
        .collect();

    Ok(units)
}

/// Inverse of [`chunk_and_interpret`]: spread units back into bytes
pub fn units_to_bytes(units: &[u32], unit_size: usize, order: ByteOrder) -> Result<Vec<u8>> {
    if !matches!(unit_size, 1 | 2 | 4) {
        return Err(CodecError::UnsupportedUnitSize(unit_size));
    }

    let mut out = Vec::with_capacity(units.len() * unit_size);
    for &unit in units {
        let bytes = unit.to_be_bytes();
        let significant = &bytes[4 - unit_size..];
        match order {
            ByteOrder::Big => out.extend_from_slice(significant),
            ByteOrder::Little => out.extend(significant.iter().rev()),
        }
    }
    Ok(out)
}
