//! 8-bit E4M3 floating point
//!
//! Layout: 1 sign bit, 4 exponent bits (bias 7), 3 mantissa bits. This is the
//! "fn" flavour used by ML frameworks for FP8 activations and weights:
//!
//! - no infinities; `S.1111.111` is the only NaN pattern
//! - largest finite magnitude is 448 (`0x7E`)
//! - smallest normal is 2^-6 (`0x08`), smallest subnormal 2^-9 (`0x01`)
//!
//! Conversion from `f32` rounds to nearest, ties to even. Magnitudes that
//! would round past 448 become NaN rather than saturating.

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// An E4M3 value, stored as its raw bit pattern.
///
/// Equality compares bit patterns, so `NAN == NAN` and `+0 != -0`. That is
/// what the codec and the golden comparisons need.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct F8E4M3(u8);

/// `480.0f32`: first magnitude whose rounded encoding would land on the NaN pattern
const OVERFLOW_BITS: u32 = 1087 << 20;
/// `2^-6`: smallest normal E4M3 magnitude
const MIN_NORMAL_BITS: u32 = 121 << 23;
/// `2^14`: adding it aligns the subnormal mantissa with the f32 ulp (2^-9)
const DENORM_MAGIC_BITS: u32 = 141 << 23;
/// Rebias from f32 (127) to E4M3 (7)
const EXPONENT_REBIAS: u32 = ((7i32 - 127) as u32) << 23;

impl F8E4M3 {
    pub const ZERO: Self = Self(0x00);
    pub const NEG_ZERO: Self = Self(0x80);
    pub const ONE: Self = Self(0x38);
    pub const NEG_ONE: Self = Self(0xB8);
    /// 448.0
    pub const MAX: Self = Self(0x7E);
    /// 2^-6
    pub const MIN_POSITIVE: Self = Self(0x08);
    /// 2^-9
    pub const MIN_POSITIVE_SUBNORMAL: Self = Self(0x01);
    pub const NAN: Self = Self(0x7F);

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn to_bits(self) -> u8 {
        self.0
    }

    /// Round an `f32` into E4M3 (round-to-nearest-even, overflow to NaN)
    pub fn from_f32(value: f32) -> Self {
        let bits = value.to_bits();
        let sign = bits & 0x8000_0000;
        let magnitude = bits ^ sign;

        let encoded = if magnitude >= OVERFLOW_BITS {
            // Covers NaN and infinity too, both compare above 480.0
            0x7F
        } else if magnitude < MIN_NORMAL_BITS {
            // Let the FPU do the subnormal rounding: after adding 2^14 the low
            // mantissa bits hold the E4M3 subnormal mantissa, already RNE'd.
            let aligned = f32::from_bits(magnitude) + f32::from_bits(DENORM_MAGIC_BITS);
            (aligned.to_bits() - DENORM_MAGIC_BITS) as u8
        } else {
            let mant_odd = (magnitude >> 20) & 1;
            let rounded = magnitude
                .wrapping_add(EXPONENT_REBIAS)
                .wrapping_add(0x7_FFFF)
                .wrapping_add(mant_odd);
            (rounded >> 20) as u8
        };

        Self(encoded | (sign >> 24) as u8)
    }

    /// Exact widening to `f32`
    pub fn to_f32(self) -> f32 {
        let sign = ((self.0 & 0x80) as u32) << 24;
        let exponent = ((self.0 >> 3) & 0x0F) as u32;
        let mantissa = (self.0 & 0x07) as u32;

        if self.is_nan() {
            return f32::from_bits(sign | 0x7FC0_0000);
        }

        if exponent == 0 {
            // Subnormal: mantissa * 2^-9, exact in f32
            let magnitude = mantissa as f32 * f32::from_bits(118 << 23);
            return f32::from_bits(magnitude.to_bits() | sign);
        }

        f32::from_bits(sign | ((exponent + 120) << 23) | (mantissa << 20))
    }

    #[inline]
    pub const fn is_nan(self) -> bool {
        self.0 & 0x7F == 0x7F
    }

    #[inline]
    pub const fn is_sign_negative(self) -> bool {
        self.0 & 0x80 != 0
    }
}

impl From<F8E4M3> for f32 {
    fn from(value: F8E4M3) -> Self {
        value.to_f32()
    }
}

impl fmt::Debug for F8E4M3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F8E4M3({:#04X} = {})", self.0, self.to_f32())
    }
}

impl fmt::Display for F8E4M3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_values() {
        assert_eq!(F8E4M3::from_f32(1.0), F8E4M3::ONE);
        assert_eq!(F8E4M3::from_f32(-1.0), F8E4M3::NEG_ONE);
        assert_eq!(F8E4M3::from_f32(2.0).to_bits(), 0x40);
        assert_eq!(F8E4M3::from_f32(3.0).to_bits(), 0x44);
        assert_eq!(F8E4M3::from_f32(0.5).to_bits(), 0x30);
        assert_eq!(F8E4M3::from_f32(448.0), F8E4M3::MAX);
        assert_eq!(F8E4M3::from_f32(0.015625), F8E4M3::MIN_POSITIVE);
        assert_eq!(
            F8E4M3::from_f32(0.001953125),
            F8E4M3::MIN_POSITIVE_SUBNORMAL
        );
    }

    #[test]
    fn test_signed_zero() {
        assert_eq!(F8E4M3::from_f32(0.0), F8E4M3::ZERO);
        assert_eq!(F8E4M3::from_f32(-0.0), F8E4M3::NEG_ZERO);
        assert!(F8E4M3::NEG_ZERO.to_f32().is_sign_negative());
        assert_eq!(F8E4M3::NEG_ZERO.to_f32(), 0.0);
    }

    #[test]
    fn test_round_to_nearest_even() {
        // 1.0625 sits halfway between 1.0 (even) and 1.125
        assert_eq!(F8E4M3::from_f32(1.0625).to_bits(), 0x38);
        // 1.1875 sits halfway between 1.125 and 1.25 (even)
        assert_eq!(F8E4M3::from_f32(1.1875).to_bits(), 0x3A);
        // Just above the halfway point rounds up
        assert_eq!(F8E4M3::from_f32(1.07).to_bits(), 0x39);
    }

    #[test]
    fn test_subnormal_rounding() {
        // 2^-10 ties between 0 and 2^-9, even is 0
        assert_eq!(F8E4M3::from_f32(2f32.powi(-10)).to_bits(), 0x00);
        // 1.5 * 2^-9 ties between 1 and 2 ulps, even is 2
        assert_eq!(F8E4M3::from_f32(1.5 * 2f32.powi(-9)).to_bits(), 0x02);
        assert_eq!(F8E4M3::from_f32(-3.0 * 2f32.powi(-9)).to_bits(), 0x83);
        // Largest subnormal rounds up into the smallest normal
        assert_eq!(F8E4M3::from_f32(7.6 * 2f32.powi(-9)).to_bits(), 0x08);
    }

    #[test]
    fn test_overflow_becomes_nan() {
        // 460 rounds down to 448; 464 ties to the even 448
        assert_eq!(F8E4M3::from_f32(460.0), F8E4M3::MAX);
        assert_eq!(F8E4M3::from_f32(464.0), F8E4M3::MAX);
        assert!(F8E4M3::from_f32(470.0).is_nan());
        assert!(F8E4M3::from_f32(1.0e6).is_nan());
        assert_eq!(F8E4M3::from_f32(f32::INFINITY).to_bits(), 0x7F);
        assert_eq!(F8E4M3::from_f32(f32::NEG_INFINITY).to_bits(), 0xFF);
        assert!(F8E4M3::from_f32(f32::NAN).is_nan());
    }

    #[test]
    fn test_every_pattern_survives_widening() {
        for bits in 0..=u8::MAX {
            let value = F8E4M3::from_bits(bits);
            let widened = value.to_f32();
            assert_eq!(value.is_nan(), widened.is_nan(), "pattern {:#04X}", bits);
            assert_eq!(
                F8E4M3::from_f32(widened).to_bits(),
                bits,
                "pattern {:#04X} widened to {}",
                bits,
                widened
            );
        }
    }

    #[test]
    fn test_widening_matches_layout() {
        assert_eq!(F8E4M3::from_bits(0x7E).to_f32(), 448.0);
        assert_eq!(F8E4M3::from_bits(0x01).to_f32(), 2f32.powi(-9));
        assert_eq!(F8E4M3::from_bits(0x07).to_f32(), 7.0 * 2f32.powi(-9));
        assert_eq!(F8E4M3::from_bits(0xC4).to_f32(), -3.0);
    }
}
