//! Resolved generation parameters

use crate::emit::Emitter;
use crate::error::Result;
use macvec_format::ByteOrder;
use macvec_manifest::{Manifest, OperandLayout, ReferenceLayout};
use std::path::PathBuf;

/// Destinations of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub activations: PathBuf,
    pub weights: PathBuf,
    pub reference: PathBuf,
}

impl ArtifactPaths {
    /// `x.hex`, `w.hex` and `ref.hex` inside `dir`
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            activations: dir.join("x.hex"),
            weights: dir.join("w.hex"),
            reference: dir.join("ref.hex"),
        }
    }
}

/// Everything one generator run needs, with the byte order already parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub rows: usize,
    pub reduction_width: usize,
    pub byte_order: ByteOrder,
    pub seed: Option<u64>,
    pub operand_layout: OperandLayout,
    pub reference_layout: ReferenceLayout,
    pub paths: ArtifactPaths,
}

impl GenerationPlan {
    /// Resolve a validated manifest.
    ///
    /// This is where a bad byte order surfaces as `InvalidByteOrder`, before
    /// any operand is sampled or encoded.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        manifest.validate()?;
        let byte_order: ByteOrder = manifest.generator.byte_order.parse()?;

        Ok(Self {
            rows: manifest.generator.rows,
            reduction_width: manifest.generator.reduction_width,
            byte_order,
            seed: manifest.generator.seed,
            operand_layout: manifest.output.operand_layout,
            reference_layout: manifest.output.reference_layout,
            paths: ArtifactPaths {
                activations: manifest.output.activations.clone(),
                weights: manifest.output.weights.clone(),
                reference: manifest.output.reference.clone(),
            },
        })
    }

    pub fn emitter(&self) -> Emitter {
        Emitter::new(self.byte_order, self.operand_layout, self.reference_layout)
    }
}
