//! macvec test-vector generation
//!
//! Stimulus and golden-reference generation for FP8 multiply-accumulate
//! hardware.
//!
//! This crate provides:
//! - Seeded E4M3 operand synthesis with exact `f32` shadows
//! - The `f32` MAC reference, rounded to bf16
//! - Hex artifact emission with named line layouts
//! - Golden artifact comparison for regression tests

pub mod emit;
pub mod error;
pub mod generate;
pub mod golden;
pub mod plan;
pub mod reference;
pub mod synth;

pub use emit::{stage_lines, write_lines, Emitter, StagedArtifact};
pub use error::{GenerationError, Result};
pub use generate::{emit_vectors, generate, ArtifactLines, GenerationReport};
pub use golden::GoldenTest;
pub use plan::{ArtifactPaths, GenerationPlan};
pub use reference::{reference_mac, Reference};
pub use synth::{Operand, OperandPair, OperandSynthesizer};

// Manifest-level layout choices, re-exported for plan construction
pub use macvec_manifest::{OperandLayout, ReferenceLayout};
