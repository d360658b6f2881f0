//! macvec manifest parsing
//!
//! This crate handles parsing and validation of `macvec.toml` files, which fix
//! the shape of a test-vector run (rows, reduction width, seed, byte order)
//! and where its three hex artifacts are written.

pub mod error;
pub mod manifest;

pub use error::{ManifestError, Result};
pub use manifest::{
    GeneratorConfig, Manifest, OperandLayout, OutputConfig, ReferenceLayout,
    DEFAULT_REDUCTION_WIDTH, DEFAULT_ROWS,
};

use std::path::Path;

/// File name looked up in the working directory when no path is given
pub const MANIFEST_FILE_NAME: &str = "macvec.toml";

/// Commented manifest written by `macvec init`; parses to `Manifest::default()`
pub const DEFAULT_MANIFEST: &str = r#"# macvec test-vector generator configuration

[generator]
# Number of independent test rows (N)
rows = 10000
# Operand pairs summed per row (K)
reduction_width = 16
# Byte order of multi-byte (bf16) elements: "little" or "big"
byte_order = "little"
# Fix the operand generator seed for reproducible artifacts
# seed = 42

[output]
activations = "verification/hex/input/tb_Float8Mac_X.hex"
weights = "verification/hex/input/tb_Float8Mac_W.hex"
reference = "verification/hex/ref/tb_Float8Mac.hex"
# "element": one operand byte per line, "row": one test row per line
operand_layout = "element"
# "word": one 16-bit word per line, "bytes": two bytes per line in byte order
reference_layout = "word"
"#;

/// Parse and validate a manifest from a file path
pub fn from_path(path: impl AsRef<Path>) -> Result<Manifest> {
    let contents =
        std::fs::read_to_string(path.as_ref()).map_err(|e| ManifestError::Io(e.to_string()))?;
    from_str(&contents)
}

/// Parse and validate a manifest from a string
pub fn from_str(s: &str) -> Result<Manifest> {
    let manifest: Manifest = toml::from_str(s).map_err(|e| ManifestError::Parse(e.to_string()))?;
    manifest.validate()?;
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_basic_manifest_parse() {
        let toml = r#"
            [generator]
            rows = 8
            reduction_width = 4
            byte_order = "big"
            seed = 7

            [output]
            activations = "x.hex"
            weights = "w.hex"
            reference = "ref.hex"
            operand_layout = "row"
            reference_layout = "bytes"
        "#;

        let manifest = from_str(toml).unwrap();
        assert_eq!(manifest.generator.rows, 8);
        assert_eq!(manifest.generator.reduction_width, 4);
        assert_eq!(manifest.generator.byte_order, "big");
        assert_eq!(manifest.generator.seed, Some(7));
        assert_eq!(manifest.output.activations, PathBuf::from("x.hex"));
        assert_eq!(manifest.output.operand_layout, OperandLayout::Row);
        assert_eq!(manifest.output.reference_layout, ReferenceLayout::Bytes);
    }

    #[test]
    fn test_empty_manifest_uses_defaults() {
        let manifest = from_str("").unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.generator.rows, DEFAULT_ROWS);
        assert_eq!(manifest.generator.reduction_width, DEFAULT_REDUCTION_WIDTH);
        assert_eq!(manifest.generator.seed, None);
    }

    #[test]
    fn test_default_template_matches_defaults() {
        assert_eq!(from_str(DEFAULT_MANIFEST).unwrap(), Manifest::default());
    }

    #[test]
    fn test_unknown_keys_and_layouts_rejected() {
        let typo = "[generator]\nrow = 4\n";
        assert!(matches!(from_str(typo), Err(ManifestError::Parse(_))));

        let layout = "[output]\noperand_layout = \"column\"\n";
        assert!(matches!(from_str(layout), Err(ManifestError::Parse(_))));
    }

    #[test]
    fn test_validation_runs_on_parse() {
        let zero = "[generator]\nrows = 0\n";
        assert!(matches!(from_str(zero), Err(ManifestError::Validation(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = from_path("/nonexistent/macvec.toml").unwrap_err();
        assert!(matches!(err, ManifestError::Io(_)));
    }
}
