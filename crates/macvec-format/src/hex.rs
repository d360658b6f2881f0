//! Hex artifact rows
//!
//! One artifact line is a run of units rendered as uppercase hex, zero-padded
//! to two digits per byte of unit width, separated by single spaces, with no
//! `0x` prefix. `[0xC0, 0x40]` at unit size 1 renders as `C0 40`; the same
//! bytes regrouped little-endian at unit size 2 render as `40C0`.

use crate::error::{CodecError, Result};

/// Render one artifact line (without the trailing newline)
pub fn format_hex_row(units: &[u32], unit_size: usize) -> String {
    let digits = unit_size * 2;
    units
        .iter()
        .map(|unit| format!("{:0width$X}", unit, width = digits))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse one artifact line back into units.
///
/// Tokens may be shorter than the full width (harness tools often drop
/// leading zeros) but never longer.
pub fn parse_hex_row(line: &str, unit_size: usize) -> Result<Vec<u32>> {
    if !matches!(unit_size, 1 | 2 | 4) {
        return Err(CodecError::UnsupportedUnitSize(unit_size));
    }
    let max_digits = unit_size * 2;

    line.split_whitespace()
        .map(|token| {
            if token.len() > max_digits {
                return Err(CodecError::InvalidHex {
                    token: token.to_string(),
                    reason: format!("wider than {} digits", max_digits),
                });
            }
            u32::from_str_radix(token, 16).map_err(|e| CodecError::InvalidHex {
                token: token.to_string(),
                reason: e.to_string(),
            })
        })
        .collect()
}
