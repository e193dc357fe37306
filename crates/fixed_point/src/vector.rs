//! Fixed-point vectors with a common format

use crate::error::{FixedPointError, Result};
use crate::fixed::FixedPointFormat;

/// A vector of quantized values sharing one format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedVector {
    /// Raw quantized values, all within the format range
    pub data: Vec<i32>,
    /// Common format for all elements
    pub format: FixedPointFormat,
}

impl FixedVector {
    /// Wrap already-quantized values, rejecting any that fall outside the format
    pub fn from_raw(data: Vec<i32>, format: FixedPointFormat) -> Result<Self> {
        for &v in &data {
            format.check(v as i64)?;
        }
        Ok(Self { data, format })
    }

    /// Quantize floating-point values (round, then saturate)
    pub fn from_f64_slice(values: &[f64], format: FixedPointFormat) -> Self {
        Self {
            data: values.iter().map(|&v| format.quantize(v)).collect(),
            format,
        }
    }

    /// Convert to floating-point vector
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.data.iter().map(|&x| self.format.dequantize(x)).collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sequential saturating dot product, folded in index order
    pub fn dot(&self, other: &Self) -> Result<i32> {
        self.check_compatible(other)?;

        let f = self.format;
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .fold(0i32, |acc, (&a, &b)| f.fixed_add(acc, f.fixed_multiply(a, b))))
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.format != other.format {
            return Err(FixedPointError::FormatMismatch {
                expected: self.format.to_string(),
                got: other.format.to_string(),
            });
        }
        if self.len() != other.len() {
            return Err(FixedPointError::DimensionMismatch {
                expected: self.len(),
                got: other.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: FixedPointFormat = FixedPointFormat::q8_8();

    #[test]
    fn test_from_f64_and_back() {
        let values = [1.0, -0.5, 2.25, 0.0];
        let v = FixedVector::from_f64_slice(&values, Q);
        assert_eq!(v.data, vec![256, -128, 576, 0]);
        assert_eq!(v.to_f64_vec(), values.to_vec());
    }

    #[test]
    fn test_from_raw_rejects_out_of_range() {
        assert!(FixedVector::from_raw(vec![0, 32767, -32768], Q).is_ok());
        assert!(matches!(
            FixedVector::from_raw(vec![0, 32768], Q),
            Err(FixedPointError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_dot_sequential() {
        let a = FixedVector::from_f64_slice(&[1.0, 2.0, 3.0], Q);
        let b = FixedVector::from_f64_slice(&[4.0, 5.0, 6.0], Q);
        // 1*4 + 2*5 + 3*6 = 32
        assert_eq!(a.dot(&b).unwrap(), 32 * 256);
    }

    #[test]
    fn test_dot_saturates_midway() {
        // 100 + 100 saturates at ~128, then -100 brings it to ~28 rather than 100
        let a = FixedVector::from_f64_slice(&[10.0, 10.0, -10.0], Q);
        let b = FixedVector::from_f64_slice(&[10.0, 10.0, 10.0], Q);
        assert_eq!(a.dot(&b).unwrap(), Q.max_val() - 25600);
    }

    #[test]
    fn test_dimension_and_format_mismatch() {
        let a = FixedVector::from_f64_slice(&[1.0, 2.0], Q);
        let b = FixedVector::from_f64_slice(&[1.0, 2.0, 3.0], Q);
        assert!(matches!(
            a.dot(&b),
            Err(FixedPointError::DimensionMismatch { expected: 2, got: 3 })
        ));

        let c = FixedVector::from_f64_slice(&[1.0, 2.0], FixedPointFormat::new(8, 5).unwrap());
        assert!(matches!(
            a.dot(&c),
            Err(FixedPointError::FormatMismatch { .. })
        ));
    }
}
