//! Manifest structure definitions

use crate::error::{ManifestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Rows generated when the manifest does not say
pub const DEFAULT_ROWS: usize = 10_000;

/// Reduction width of the MAC unit under test
pub const DEFAULT_REDUCTION_WIDTH: usize = 16;

/// Complete `macvec.toml` manifest
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Vector generation parameters
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Artifact destinations and line layouts
    #[serde(default)]
    pub output: OutputConfig,
}

/// Generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of independent test rows (N)
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Operand pairs summed per row (K)
    #[serde(default = "default_reduction_width")]
    pub reduction_width: usize,

    /// Byte order of multi-byte elements, `little` or `big`.
    ///
    /// Kept as text here; it is parsed when the generation plan is resolved.
    #[serde(default = "default_byte_order")]
    pub byte_order: String,

    /// Seed for the operand generator. A fresh one is drawn when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Where the three artifacts go and how their lines are laid out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Operand A (activations) hex file
    #[serde(default = "default_activations")]
    pub activations: PathBuf,

    /// Operand B (weights) hex file
    #[serde(default = "default_weights")]
    pub weights: PathBuf,

    /// Reference result hex file
    #[serde(default = "default_reference")]
    pub reference: PathBuf,

    #[serde(default)]
    pub operand_layout: OperandLayout,

    #[serde(default)]
    pub reference_layout: ReferenceLayout,
}

/// Line granularity of the two operand artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperandLayout {
    /// One line per scalar element (N*K lines)
    #[default]
    Element,
    /// One line per test row, K bytes per line (N lines)
    Row,
}

/// Line format of the reference artifact (always one line per row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceLayout {
    /// One 16-bit word per line, the emitted byte pair read little-endian
    #[default]
    Word,
    /// Two space-separated bytes in the configured byte order
    Bytes,
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_reduction_width() -> usize {
    DEFAULT_REDUCTION_WIDTH
}

fn default_byte_order() -> String {
    "little".to_string()
}

fn default_activations() -> PathBuf {
    PathBuf::from("verification/hex/input/tb_Float8Mac_X.hex")
}

fn default_weights() -> PathBuf {
    PathBuf::from("verification/hex/input/tb_Float8Mac_W.hex")
}

fn default_reference() -> PathBuf {
    PathBuf::from("verification/hex/ref/tb_Float8Mac.hex")
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            reduction_width: default_reduction_width(),
            byte_order: default_byte_order(),
            seed: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            activations: default_activations(),
            weights: default_weights(),
            reference: default_reference(),
            operand_layout: OperandLayout::default(),
            reference_layout: ReferenceLayout::default(),
        }
    }
}

impl Manifest {
    /// Validate the manifest
    pub fn validate(&self) -> Result<()> {
        self.validate_dimensions()?;
        self.validate_outputs()?;
        Ok(())
    }

    fn validate_dimensions(&self) -> Result<()> {
        if self.generator.rows == 0 {
            return Err(ManifestError::Validation(
                "generator.rows must be at least 1".to_string(),
            ));
        }
        if self.generator.reduction_width == 0 {
            return Err(ManifestError::Validation(
                "generator.reduction_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The three artifacts must not overwrite each other
    fn validate_outputs(&self) -> Result<()> {
        let out = &self.output;
        let paths = [
            ("activations", &out.activations),
            ("weights", &out.weights),
            ("reference", &out.reference),
        ];

        for (i, (name, path)) in paths.iter().enumerate() {
            if path.as_os_str().is_empty() {
                return Err(ManifestError::Validation(format!(
                    "output.{} path cannot be empty",
                    name
                )));
            }
            for (other_name, other_path) in &paths[i + 1..] {
                if path == other_path {
                    return Err(ManifestError::Validation(format!(
                        "output.{} and output.{} both point at {}",
                        name,
                        other_name,
                        path.display()
                    )));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for OperandLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandLayout::Element => f.write_str("element"),
            OperandLayout::Row => f.write_str("row"),
        }
    }
}

impl FromStr for OperandLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "element" => Ok(OperandLayout::Element),
            "row" => Ok(OperandLayout::Row),
            other => Err(format!(
                "unknown operand layout '{}': expected 'element' or 'row'",
                other
            )),
        }
    }
}

impl fmt::Display for ReferenceLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceLayout::Bytes => f.write_str("bytes"),
            ReferenceLayout::Word => f.write_str("word"),
        }
    }
}

impl FromStr for ReferenceLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "bytes" => Ok(ReferenceLayout::Bytes),
            "word" => Ok(ReferenceLayout::Word),
            other => Err(format!(
                "unknown reference layout '{}': expected 'bytes' or 'word'",
                other
            )),
        }
    }
}
