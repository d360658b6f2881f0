//! Hex artifact emission
//!
//! Tensors are encoded and rendered to lines completely before any file is
//! touched. Each artifact is then staged in a temporary file and only renamed
//! into place once every artifact of the set has been staged.

use crate::error::{GenerationError, Result};
use macvec_format::{
    chunk_and_interpret, encode, format_hex_row, ByteOrder, CodecError, StorageFormat, Tensor,
};
use macvec_manifest::{OperandLayout, ReferenceLayout};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Renders operand and reference tensors into artifact lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Emitter {
    pub byte_order: ByteOrder,
    pub operand_layout: OperandLayout,
    pub reference_layout: ReferenceLayout,
}

impl Emitter {
    pub fn new(
        byte_order: ByteOrder,
        operand_layout: OperandLayout,
        reference_layout: ReferenceLayout,
    ) -> Self {
        Self {
            byte_order,
            operand_layout,
            reference_layout,
        }
    }

    /// Lines for an E4M3 operand tensor of shape (N, K)
    pub fn operand_lines(&self, operand: &Tensor) -> std::result::Result<Vec<String>, CodecError> {
        let bytes = encode(operand, StorageFormat::Narrow, self.byte_order)?;
        let units = chunk_and_interpret(&bytes, 1, self.byte_order)?;

        let lines: Vec<String> = match self.operand_layout {
            OperandLayout::Element => units
                .iter()
                .map(|unit| format_hex_row(std::slice::from_ref(unit), 1))
                .collect(),
            OperandLayout::Row => {
                let (_, cols) = operand.dims2()?;
                if cols == 0 {
                    return Err(CodecError::ShapeMismatch(
                        "row layout needs at least one column".to_string(),
                    ));
                }
                units
                    .chunks_exact(cols)
                    .map(|row| format_hex_row(row, 1))
                    .collect()
            }
        };

        debug!(
            "Rendered {} operand bytes into {} lines ({} layout)",
            bytes.len(),
            lines.len(),
            self.operand_layout
        );
        Ok(lines)
    }

    /// Lines for a bf16 reference tensor, one line per element
    pub fn reference_lines(
        &self,
        reference: &Tensor,
    ) -> std::result::Result<Vec<String>, CodecError> {
        let bytes = encode(reference, StorageFormat::Wide, self.byte_order)?;

        let lines: Vec<String> = match self.reference_layout {
            ReferenceLayout::Bytes => chunk_and_interpret(&bytes, 1, self.byte_order)?
                .chunks_exact(2)
                .map(|pair| format_hex_row(pair, 1))
                .collect(),
            // Host view of the emitted byte pairs, as a little-endian machine reads them
            ReferenceLayout::Word => chunk_and_interpret(&bytes, 2, ByteOrder::Little)?
                .iter()
                .map(|word| format_hex_row(std::slice::from_ref(word), 2))
                .collect(),
        };

        debug!(
            "Rendered {} reference bytes into {} lines ({} layout)",
            bytes.len(),
            lines.len(),
            self.reference_layout
        );
        Ok(lines)
    }
}

/// An artifact fully written to a temporary file beside its destination
///
/// Nothing at the destination changes until [`StagedArtifact::commit`].
/// Dropping an uncommitted artifact removes the temporary file.
#[derive(Debug)]
pub struct StagedArtifact {
    file: NamedTempFile,
    path: PathBuf,
    lines: usize,
}

impl StagedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rename the staged file over the destination
    pub fn commit(self) -> Result<usize> {
        let path = self.path;
        self.file.persist(&path).map_err(|e| GenerationError::Io {
            path: path.clone(),
            source: e.error,
        })?;

        info!("Wrote {} lines to {}", self.lines, path.display());
        Ok(self.lines)
    }
}

/// Write one newline-terminated line per entry to a temporary file next to
/// `path`, creating missing parent directories.
pub fn stage_lines(path: &Path, lines: &[String]) -> Result<StagedArtifact> {
    let io_err = |source: std::io::Error| GenerationError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(io_err)?;

    // A rename cannot replace a directory; catch it before anything is committed
    if path.is_dir() {
        return Err(io_err(std::io::Error::new(
            std::io::ErrorKind::Other,
            "destination is a directory",
        )));
    }

    let mut file = NamedTempFile::new_in(parent).map_err(io_err)?;
    {
        let mut writer = BufWriter::new(&mut file);
        for line in lines {
            writeln!(writer, "{}", line).map_err(io_err)?;
        }
        writer.flush().map_err(io_err)?;
    }

    debug!("Staged {} lines for {}", lines.len(), path.display());
    Ok(StagedArtifact {
        file,
        path: path.to_path_buf(),
        lines: lines.len(),
    })
}

/// Create (or replace) `path` with one line per entry.
///
/// Returns the number of lines written.
pub fn write_lines(path: &Path, lines: &[String]) -> Result<usize> {
    stage_lines(path, lines)?.commit()
}
