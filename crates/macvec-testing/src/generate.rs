//! End-to-end vector generation
//!
//! Synthesizer → reference MAC → emitter. All three artifacts are rendered in
//! memory and staged beside their destinations; the set is committed only
//! once every artifact has been staged, so a failed run never mixes new and
//! old files.

use crate::emit::{stage_lines, Emitter};
use crate::error::Result;
use crate::plan::{ArtifactPaths, GenerationPlan};
use crate::reference::reference_mac;
use crate::synth::{Operand, OperandPair, OperandSynthesizer};
use macvec_format::Tensor;
use tracing::{debug, info};

/// Line counts of one written artifact set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactLines {
    pub activations: usize,
    pub weights: usize,
    pub reference: usize,
}

/// Summary of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Seed the operands were drawn with; rerun with it to reproduce
    pub seed: u64,
    pub rows: usize,
    pub reduction_width: usize,
    pub lines: ArtifactLines,
}

/// Run the full pipeline for one plan
pub fn generate(plan: &GenerationPlan) -> Result<GenerationReport> {
    info!(
        "Generating {} rows x {} MAC vectors ({} byte order)",
        plan.rows, plan.reduction_width, plan.byte_order
    );

    let mut synth = OperandSynthesizer::new(plan.seed);
    let operands = synth.sample_pair(plan.rows, plan.reduction_width);
    let lines = emit_operands(&plan.emitter(), &plan.paths, &operands)?;

    Ok(GenerationReport {
        seed: synth.seed(),
        rows: plan.rows,
        reduction_width: plan.reduction_width,
        lines,
    })
}

/// Emit caller-chosen E4M3 operands of shape (N, K) and their reference
pub fn emit_vectors(
    emitter: &Emitter,
    paths: &ArtifactPaths,
    activations: Tensor,
    weights: Tensor,
) -> Result<ArtifactLines> {
    let operands = OperandPair {
        activations: Operand::from_narrow(activations)?,
        weights: Operand::from_narrow(weights)?,
    };
    emit_operands(emitter, paths, &operands)
}

fn emit_operands(
    emitter: &Emitter,
    paths: &ArtifactPaths,
    operands: &OperandPair,
) -> Result<ArtifactLines> {
    info!("Computing reference MAC results...");
    let reference = reference_mac(&operands.activations.shadow, &operands.weights.shadow)?;
    debug!("Reference accumulators: {} rows", reference.accumulated.len());

    let activation_lines = emitter.operand_lines(&operands.activations.narrow)?;
    let weight_lines = emitter.operand_lines(&operands.weights.narrow)?;
    let reference_lines = emitter.reference_lines(&reference.wide)?;

    info!("Writing hex artifacts...");
    let activations = stage_lines(&paths.activations, &activation_lines)?;
    let weights = stage_lines(&paths.weights, &weight_lines)?;
    let reference = stage_lines(&paths.reference, &reference_lines)?;

    Ok(ArtifactLines {
        activations: activations.commit()?,
        weights: weights.commit()?,
        reference: reference.commit()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenerationError;
    use macvec_format::{ByteOrder, CodecError, DType};
    use macvec_manifest::{OperandLayout, ReferenceLayout};
    use std::fs;
    use tempfile::TempDir;

    fn plan(dir: &TempDir, rows: usize, width: usize, seed: Option<u64>) -> GenerationPlan {
        GenerationPlan {
            rows,
            reduction_width: width,
            byte_order: ByteOrder::Little,
            seed,
            operand_layout: OperandLayout::Element,
            reference_layout: ReferenceLayout::Bytes,
            paths: ArtifactPaths::in_dir(dir.path()),
        }
    }

    #[test]
    fn test_generate_reports_lines_and_seed() {
        let dir = TempDir::new().unwrap();
        let report = generate(&plan(&dir, 5, 3, Some(11))).unwrap();
        assert_eq!(report.seed, 11);
        assert_eq!(
            report.lines,
            ArtifactLines {
                activations: 15,
                weights: 15,
                reference: 5
            }
        );
    }

    #[test]
    fn test_unseeded_run_reports_its_seed() {
        let dir = TempDir::new().unwrap();
        let first = generate(&plan(&dir, 4, 4, None)).unwrap();
        let x = fs::read(dir.path().join("x.hex")).unwrap();

        let again = TempDir::new().unwrap();
        generate(&plan(&again, 4, 4, Some(first.seed))).unwrap();
        assert_eq!(fs::read(again.path().join("x.hex")).unwrap(), x);
    }

    #[test]
    fn test_mismatched_operands_write_nothing() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        let narrow = Tensor::from_f32(vec![1, 1], vec![2.0])
            .unwrap()
            .to_dtype(DType::F8E4M3);
        let wide = narrow.to_dtype(DType::BF16);

        let err = emit_vectors(&Emitter::default(), &paths, narrow, wide).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Codec(CodecError::FormatMismatch { .. })
        ));
        assert!(!paths.activations.exists());
        assert!(!paths.weights.exists());
        assert!(!paths.reference.exists());
    }

    #[test]
    fn test_unwritable_reference_keeps_previous_set() {
        let dir = TempDir::new().unwrap();
        let paths = ArtifactPaths::in_dir(dir.path());
        fs::write(&paths.activations, "old x\n").unwrap();
        fs::create_dir(&paths.reference).unwrap();

        let narrow = Tensor::from_f32(vec![1, 1], vec![2.0])
            .unwrap()
            .to_dtype(DType::F8E4M3);
        let err = emit_vectors(&Emitter::default(), &paths, narrow.clone(), narrow).unwrap_err();
        match err {
            GenerationError::Io { path, .. } => assert_eq!(path, paths.reference),
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(fs::read_to_string(&paths.activations).unwrap(), "old x\n");
        assert!(!paths.weights.exists());
        // Only the two pre-existing entries remain; no staged files linger
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_blocked_output_directory_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("ref");
        fs::write(&blocker, "not a directory").unwrap();
        let paths = ArtifactPaths {
            activations: dir.path().join("x.hex"),
            weights: dir.path().join("w.hex"),
            reference: blocker.join("ref.hex"),
        };

        let narrow = Tensor::from_f32(vec![2, 1], vec![1.0, -0.5])
            .unwrap()
            .to_dtype(DType::F8E4M3);
        assert!(emit_vectors(&Emitter::default(), &paths, narrow.clone(), narrow).is_err());

        assert!(!paths.activations.exists());
        assert!(!paths.weights.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
