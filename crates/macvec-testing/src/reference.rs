//! Golden MAC reference
//!
//! `reference[i] = sum_k a[i, k] * w[i, k]`, multiplied and accumulated in
//! `f32` in index order, then rounded to bf16 (nearest, ties to even).
//!
//! The sum is one left-to-right chain with a rounding per step. It can differ
//! by an f32 ulp from reductions that split a row across partial accumulators
//! (as vectorized framework sums do), and occasionally by a bf16 ulp after the
//! downcast.

use macvec_format::{bf16, CodecError, DType, Tensor};

#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    /// Per-row `f32` accumulator before downcast
    pub accumulated: Vec<f32>,
    /// Shape (N,), bf16; this is what gets emitted
    pub wide: Tensor,
}

/// Compute the row-wise MAC reference from two (N, K) `f32` shadow tensors
pub fn reference_mac(activations: &Tensor, weights: &Tensor) -> Result<Reference, CodecError> {
    for operand in [activations, weights] {
        if operand.dtype() != DType::F32 {
            return Err(CodecError::FormatMismatch {
                expected: DType::F32,
                found: operand.dtype(),
            });
        }
    }

    let (rows, cols) = activations.dims2()?;
    if weights.shape() != activations.shape() {
        return Err(CodecError::ShapeMismatch(format!(
            "activations {:?} and weights {:?} differ",
            activations.shape(),
            weights.shape()
        )));
    }

    let a = activations.to_f32_vec();
    let w = weights.to_f32_vec();

    let accumulated: Vec<f32> = if cols == 0 {
        vec![0.0; rows]
    } else {
        a.chunks_exact(cols)
            .zip(w.chunks_exact(cols))
            .map(|(a_row, w_row)| {
                a_row
                    .iter()
                    .zip(w_row)
                    .fold(0.0f32, |acc, (x, y)| acc + x * y)
            })
            .collect()
    };

    let wide = Tensor::from_bf16(
        vec![rows],
        accumulated.iter().copied().map(bf16::from_f32).collect(),
    )?;

    Ok(Reference { accumulated, wide })
}
