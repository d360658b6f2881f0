//! Random operand synthesis
//!
//! Operands are drawn from a standard normal distribution in `f32` and rounded
//! into E4M3. The exact `f32` widening of every E4M3 value is kept alongside
//! as the shadow copy the reference MAC is computed from.

use macvec_format::{CodecError, DType, Tensor};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use tracing::debug;

/// One operand tensor: its E4M3 form and the exact `f32` shadow
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    /// Emitted to the hex artifact
    pub narrow: Tensor,
    /// Used for the reference computation only
    pub shadow: Tensor,
}

impl Operand {
    /// Wrap caller-supplied E4M3 values (directed vectors)
    pub fn from_narrow(narrow: Tensor) -> Result<Self, CodecError> {
        if narrow.dtype() != DType::F8E4M3 {
            return Err(CodecError::FormatMismatch {
                expected: DType::F8E4M3,
                found: narrow.dtype(),
            });
        }
        let shadow = narrow.to_dtype(DType::F32);
        Ok(Self { narrow, shadow })
    }
}

/// Activations and weights for one run
#[derive(Debug, Clone, PartialEq)]
pub struct OperandPair {
    pub activations: Operand,
    pub weights: Operand,
}

/// Seeded source of operand tensors
pub struct OperandSynthesizer {
    rng: ChaCha8Rng,
    seed: u64,
}

impl OperandSynthesizer {
    /// Create a synthesizer; without a seed one is drawn from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        debug!("Operand synthesizer seeded with {}", seed);
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed actually in use, for reproducing the run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// One (rows, cols) operand sampled from N(0, 1)
    pub fn sample_operand(&mut self, rows: usize, cols: usize) -> Operand {
        let rng = &mut self.rng;
        let full = Tensor::from_fn(vec![rows, cols], || rng.sample::<f32, _>(StandardNormal));
        let narrow = full.to_dtype(DType::F8E4M3);
        let shadow = narrow.to_dtype(DType::F32);
        Operand { narrow, shadow }
    }

    /// Activations first, then weights, each of shape (rows, cols)
    pub fn sample_pair(&mut self, rows: usize, cols: usize) -> OperandPair {
        let activations = self.sample_operand(rows, cols);
        let weights = self.sample_operand(rows, cols);
        OperandPair {
            activations,
            weights,
        }
    }
}
