//! Fixed-point format and saturating scalar primitives

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FixedPointError, Result};

/// Default total width (Q8.8)
pub const DEFAULT_TOTAL_BITS: u8 = 16;

/// Default fractional width (Q8.8)
pub const DEFAULT_FRAC_BITS: u8 = 8;

/// Widest supported format. Values are stored as i32, intermediates as i64.
pub const MAX_TOTAL_BITS: u8 = 32;

/// A signed fixed-point format with `total_bits` of storage, `frac_bits` of which
/// are fractional.
///
/// All arithmetic is saturating: results are clipped into `[min_val, max_val]`
/// and never wrap. Quantized values are plain `i32` and only meaningful together
/// with the format that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FixedPointFormat {
    total_bits: u8,
    frac_bits: u8,
}

impl FixedPointFormat {
    /// Create a format, checking `2 <= total_bits <= 32` and `frac_bits < total_bits`
    pub fn new(total_bits: u8, frac_bits: u8) -> Result<Self> {
        if !(2..=MAX_TOTAL_BITS).contains(&total_bits) || frac_bits >= total_bits {
            return Err(FixedPointError::InvalidFormat {
                total_bits,
                frac_bits,
            });
        }
        Ok(Self {
            total_bits,
            frac_bits,
        })
    }

    /// The common 16-bit hardware format
    pub const fn q8_8() -> Self {
        Self {
            total_bits: DEFAULT_TOTAL_BITS,
            frac_bits: DEFAULT_FRAC_BITS,
        }
    }

    pub fn total_bits(&self) -> u8 {
        self.total_bits
    }

    pub fn frac_bits(&self) -> u8 {
        self.frac_bits
    }

    /// Integer bits, sign bit included
    pub fn int_bits(&self) -> u8 {
        self.total_bits - self.frac_bits
    }

    /// `2^frac_bits`
    pub fn scale(&self) -> i64 {
        1i64 << self.frac_bits
    }

    /// `-2^(total_bits-1)`
    pub fn min_val(&self) -> i32 {
        (-(1i64 << (self.total_bits - 1))) as i32
    }

    /// `2^(total_bits-1) - 1`
    pub fn max_val(&self) -> i32 {
        ((1i64 << (self.total_bits - 1)) - 1) as i32
    }

    /// Smallest representable step as a real number
    pub fn resolution(&self) -> f64 {
        1.0 / self.scale() as f64
    }

    /// Whether `value` is representable in this format
    pub fn contains(&self, value: i64) -> bool {
        value >= self.min_val() as i64 && value <= self.max_val() as i64
    }

    /// Return `value` unchanged if representable, otherwise an `OutOfRange` error
    pub fn check(&self, value: i64) -> Result<i32> {
        if self.contains(value) {
            Ok(value as i32)
        } else {
            Err(FixedPointError::OutOfRange {
                value,
                min: self.min_val(),
                max: self.max_val(),
            })
        }
    }

    /// Clip a wide intermediate into `[min_val, max_val]`
    #[inline]
    pub fn saturate(&self, raw: i64) -> i32 {
        raw.clamp(self.min_val() as i64, self.max_val() as i64) as i32
    }

    /// Full-width product, arithmetic shift right by `frac_bits`, then saturate.
    ///
    /// The shift is floor division by `scale`: results truncate toward negative
    /// infinity, so `-1 * 1` in Q8.8 (`-1/256 * 1/256`) yields `-1`, not `0`.
    #[inline]
    pub fn fixed_multiply(&self, a: i32, b: i32) -> i32 {
        let product = (a as i64) * (b as i64);
        self.saturate(product >> self.frac_bits)
    }

    /// Integer add, then saturate
    #[inline]
    pub fn fixed_add(&self, a: i32, b: i32) -> i32 {
        self.saturate(a as i64 + b as i64)
    }

    /// Integer subtract, then saturate
    #[inline]
    pub fn fixed_sub(&self, a: i32, b: i32) -> i32 {
        self.saturate(a as i64 - b as i64)
    }

    /// Convert a real number into this format: round half to even, then saturate.
    ///
    /// Boundary helper for table construction and reference checks; never called
    /// on the inference data path.
    pub fn quantize(&self, value: f64) -> i32 {
        let scaled = (value * self.scale() as f64).round_ties_even();
        // `as` saturates at the i64 limits and maps NaN to 0
        self.saturate(scaled as i64)
    }

    /// Convert a quantized value back into a real number
    pub fn dequantize(&self, raw: i32) -> f64 {
        raw as f64 / self.scale() as f64
    }
}

impl Default for FixedPointFormat {
    fn default() -> Self {
        Self::q8_8()
    }
}

impl fmt::Display for FixedPointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{}.{}", self.int_bits(), self.frac_bits)
    }
}

impl FromStr for FixedPointFormat {
    type Err = FixedPointError;

    /// Parse `"Qm.n"` where `m` counts the sign bit, so `"Q8.8"` is 16 bits wide
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || FixedPointError::InvalidQNotation(s.to_string());

        let body = s
            .trim()
            .strip_prefix(['Q', 'q'])
            .ok_or_else(invalid)?;
        let (int_part, frac_part) = body.split_once('.').ok_or_else(invalid)?;
        let int_bits: u8 = int_part.parse().map_err(|_| invalid())?;
        let frac_bits: u8 = frac_part.parse().map_err(|_| invalid())?;
        let total_bits = int_bits.checked_add(frac_bits).ok_or_else(invalid)?;

        Self::new(total_bits, frac_bits)
    }
}

impl TryFrom<String> for FixedPointFormat {
    type Error = FixedPointError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FixedPointFormat> for String {
    fn from(format: FixedPointFormat) -> Self {
        format.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: FixedPointFormat = FixedPointFormat::q8_8();

    #[test]
    fn test_q8_8_derived_constants() {
        assert_eq!(Q.scale(), 256);
        assert_eq!(Q.min_val(), -32768);
        assert_eq!(Q.max_val(), 32767);
        assert_eq!(Q.int_bits(), 8);
    }

    #[test]
    fn test_widest_format_constants() {
        let f = FixedPointFormat::new(32, 16).unwrap();
        assert_eq!(f.min_val(), i32::MIN);
        assert_eq!(f.max_val(), i32::MAX);
    }

    #[test]
    fn test_invalid_formats() {
        assert!(FixedPointFormat::new(16, 16).is_err());
        assert!(FixedPointFormat::new(1, 0).is_err());
        assert!(FixedPointFormat::new(33, 8).is_err());
        assert!(FixedPointFormat::new(8, 7).is_ok());
    }

    #[test]
    fn test_saturate_clips_to_boundaries() {
        assert_eq!(Q.saturate(40_000), 32767);
        assert_eq!(Q.saturate(-40_000), -32768);
        assert_eq!(Q.saturate(123), 123);
        assert_eq!(Q.saturate(i64::MAX), 32767);
        assert_eq!(Q.saturate(i64::MIN), -32768);
    }

    #[test]
    fn test_multiply_basic() {
        // 2.0 * 3.0 = 6.0
        assert_eq!(Q.fixed_multiply(512, 768), 1536);
        // 1.0 * -1.0 = -1.0
        assert_eq!(Q.fixed_multiply(256, -256), -256);
    }

    #[test]
    fn test_multiply_truncates_toward_negative_infinity() {
        // -1 * 1 = -1 raw product; -1 >> 8 = -1 (floor), not 0
        assert_eq!(Q.fixed_multiply(-1, 1), -1);
        assert_eq!(Q.fixed_multiply(1, 1), 0);
        // -1.5/256 style case: -384 >> 8 = -2 (floor of -1.5)
        assert_eq!(Q.fixed_multiply(-384, 1), -2);
        assert_eq!(Q.fixed_multiply(384, 1), 1);
    }

    #[test]
    fn test_multiply_saturates_not_wraps() {
        // 100.0 * 100.0 = 10000.0, far outside Q8.8
        assert_eq!(Q.fixed_multiply(25600, 25600), Q.max_val());
        assert_eq!(Q.fixed_multiply(25600, -25600), Q.min_val());
        assert_eq!(Q.fixed_multiply(Q.min_val(), Q.min_val()), Q.max_val());
    }

    #[test]
    fn test_add_and_sub_saturate() {
        assert_eq!(Q.fixed_add(32767, 1), 32767);
        assert_eq!(Q.fixed_add(-32768, -1), -32768);
        assert_eq!(Q.fixed_add(100, -50), 50);
        assert_eq!(Q.fixed_sub(-32768, 1), -32768);
        assert_eq!(Q.fixed_sub(32767, -32768), 32767);
    }

    #[test]
    fn test_results_always_in_range() {
        let probes = [Q.min_val(), -12345, -1, 0, 1, 256, 9999, Q.max_val()];
        for &a in &probes {
            for &b in &probes {
                for r in [Q.fixed_multiply(a, b), Q.fixed_add(a, b), Q.fixed_sub(a, b)] {
                    assert!(Q.contains(r as i64), "{} out of range for a={}, b={}", r, a, b);
                }
            }
        }
    }

    #[test]
    fn test_quantize_rounds_and_saturates() {
        assert_eq!(Q.quantize(1.0), 256);
        assert_eq!(Q.quantize(-0.5), -128);
        // ties go to the even neighbour
        assert_eq!(Q.quantize(0.5 / 256.0), 0);
        assert_eq!(Q.quantize(1.5 / 256.0), 2);
        assert_eq!(Q.quantize(-2.5 / 256.0), -2);
        assert_eq!(Q.quantize(0.6 / 256.0), 1);
        assert_eq!(Q.quantize(1000.0), Q.max_val());
        assert_eq!(Q.quantize(-1000.0), Q.min_val());
        assert_eq!(Q.quantize(f64::NAN), 0);
        assert!((Q.dequantize(384) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_check_range() {
        assert_eq!(Q.check(100).unwrap(), 100);
        assert!(matches!(
            Q.check(40_000),
            Err(FixedPointError::OutOfRange { value: 40_000, .. })
        ));
    }

    #[test]
    fn test_q_notation_roundtrip() {
        let f: FixedPointFormat = "Q3.5".parse().unwrap();
        assert_eq!(f.total_bits(), 8);
        assert_eq!(f.frac_bits(), 5);
        assert_eq!(f.to_string(), "Q3.5");
        assert_eq!("Q8.8".parse::<FixedPointFormat>().unwrap(), Q);
    }

    #[test]
    fn test_q_notation_rejects_garbage() {
        for s in ["8.8", "Q8", "Qa.b", "Q0.8", "Q20.20", ""] {
            assert!(s.parse::<FixedPointFormat>().is_err(), "accepted {:?}", s);
        }
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Q).unwrap();
        assert_eq!(json, "\"Q8.8\"");
        let back: FixedPointFormat = serde_json::from_str("\"Q4.12\"").unwrap();
        assert_eq!(back.frac_bits(), 12);
        assert!(serde_json::from_str::<FixedPointFormat>("\"Q16.16.1\"").is_err());
    }
}
