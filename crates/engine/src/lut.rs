//! Quantized lookup table for the RBF kernel's decaying exponential
//!
//! Entry `i` holds `exp(-(gamma/scale) * d_i)` with `d_i = (i / S) * domain_max`,
//! rounded and saturated into the format. Lookups are integer-only: the domain
//! bound must be a whole number of raw units and is stored as such, so indexing
//! needs no floating-point state.

use svmsim_fixed_point::FixedPointFormat;
use svmsim_model::LutConfig;

use crate::error::{EngineError, Result};

/// Immutable piecewise-constant approximation of `exp(-gamma * d)`
#[derive(Debug, Clone, PartialEq)]
pub struct ExpLookupTable {
    entries: Vec<i32>,
    /// Domain bound in raw fixed-point units
    domain_max_raw: i64,
    domain_max_distance: f64,
    gamma: i32,
    format: FixedPointFormat,
}

impl ExpLookupTable {
    /// Build the table once from quantized `gamma` and the table geometry
    pub fn build(gamma: i32, format: FixedPointFormat, config: LutConfig) -> Result<Self> {
        let LutConfig {
            size,
            domain_max_distance,
        } = config;

        if size < 2 {
            return Err(EngineError::InvalidLut(format!(
                "size ({}) must be at least 2",
                size
            )));
        }
        if !domain_max_distance.is_finite() || domain_max_distance <= 0.0 {
            return Err(EngineError::InvalidLut(format!(
                "domain_max_distance ({}) must be finite and positive",
                domain_max_distance
            )));
        }
        let scaled = domain_max_distance * format.scale() as f64;
        if scaled < 1.0 || scaled.fract() != 0.0 || scaled > i32::MAX as f64 {
            return Err(EngineError::InvalidLut(format!(
                "domain_max_distance ({}) is not a whole number of {} steps",
                domain_max_distance, format
            )));
        }
        let domain_max_raw = scaled as i64;
        if gamma <= 0 {
            tracing::warn!(gamma, "Non-positive gamma: exponential table will not decay");
        }

        let gamma_real = format.dequantize(gamma);
        let entries: Vec<i32> = (0..size)
            .map(|i| {
                let d = (i as f64 / size as f64) * domain_max_distance;
                format.quantize((-gamma_real * d).exp())
            })
            .collect();

        tracing::debug!(
            size,
            gamma,
            domain_max_distance,
            first = entries[0],
            last = entries[size - 1],
            "Built exponential lookup table"
        );

        Ok(Self {
            entries,
            domain_max_raw,
            domain_max_distance,
            gamma,
            format,
        })
    }

    /// Bucket index for a quantized squared distance.
    ///
    /// The distance is clamped to `[0, domain_max]`; anything beyond the bound
    /// lands in the last bucket.
    #[inline]
    pub fn index_for(&self, distance_sq: i32) -> usize {
        let clamped = (distance_sq as i64).clamp(0, self.domain_max_raw);
        let last = (self.entries.len() - 1) as i128;
        let index = (clamped as i128 * last) / self.domain_max_raw as i128;
        index.clamp(0, last) as usize
    }

    /// Table entry for a quantized squared distance
    #[inline]
    pub fn lookup(&self, distance_sq: i32) -> i32 {
        self.entries[self.index_for(distance_sq)]
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[i32] {
        &self.entries
    }

    pub fn domain_max_distance(&self) -> f64 {
        self.domain_max_distance
    }

    pub fn gamma(&self) -> i32 {
        self.gamma
    }

    pub fn format(&self) -> FixedPointFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: FixedPointFormat = FixedPointFormat::q8_8();

    fn geometry() -> LutConfig {
        LutConfig {
            size: 256,
            domain_max_distance: 16.0,
        }
    }

    fn table(gamma: i32) -> ExpLookupTable {
        ExpLookupTable::build(gamma, Q, geometry()).unwrap()
    }

    #[test]
    fn test_first_entry_is_one() {
        // exp(0) = 1.0 = 256 in Q8.8
        let lut = table(16);
        assert_eq!(lut.entries()[0], 256);
        assert_eq!(lut.lookup(0), 256);
    }

    #[test]
    fn test_entries_match_reference() {
        // gamma = 0.0625 -> entry i = round(256 * exp(-0.0625 * i/16))
        let lut = table(16);
        for (i, &e) in lut.entries().iter().enumerate() {
            let d = i as f64 / 256.0 * 16.0;
            let expected = (256.0 * (-0.0625 * d).exp()).round_ties_even() as i32;
            assert_eq!(e, expected, "entry {}", i);
        }
    }

    #[test]
    fn test_lookup_monotonic_non_increasing() {
        for gamma in [1, 16, 64, 256, 1024] {
            let lut = table(gamma);
            let mut prev = i32::MAX;
            for d in (0..=5000).step_by(7) {
                let v = lut.lookup(d);
                assert!(v <= prev, "gamma={} d={} v={} prev={}", gamma, d, v, prev);
                prev = v;
            }
        }
    }

    #[test]
    fn test_beyond_domain_clamps_to_last_bucket() {
        let lut = table(16);
        let last = *lut.entries().last().unwrap();
        // 16.0 in Q8.8 = 4096
        assert_eq!(lut.index_for(4096), 255);
        assert_eq!(lut.lookup(4096), last);
        assert_eq!(lut.lookup(30000), last);
        assert_eq!(lut.lookup(i32::MAX), last);
        assert!(last > 0, "last bucket is never extrapolated to zero");
    }

    #[test]
    fn test_negative_distance_clamps_to_first_bucket() {
        let lut = table(16);
        assert_eq!(lut.index_for(-500), 0);
    }

    #[test]
    fn test_index_formula() {
        let lut = table(16);
        // floor(d / 4096 * 255)
        assert_eq!(lut.index_for(16), 0);
        assert_eq!(lut.index_for(17), 1);
        assert_eq!(lut.index_for(2048), 127);
        assert_eq!(lut.index_for(4095), 254);
    }

    #[test]
    fn test_invalid_geometry() {
        let bad_size = LutConfig {
            size: 1,
            domain_max_distance: 16.0,
        };
        assert!(matches!(
            ExpLookupTable::build(16, Q, bad_size),
            Err(EngineError::InvalidLut(_))
        ));
        let bad_domain = LutConfig {
            size: 256,
            domain_max_distance: -1.0,
        };
        assert!(ExpLookupTable::build(16, Q, bad_domain).is_err());
        let tiny_domain = LutConfig {
            size: 256,
            domain_max_distance: 0.0001,
        };
        assert!(ExpLookupTable::build(16, Q, tiny_domain).is_err());
    }

    #[test]
    fn test_domain_must_be_whole_raw_units() {
        // 16.001 * 256 is not an integer, so no integer bound reproduces the bucket edges
        let off_grid = LutConfig {
            size: 256,
            domain_max_distance: 16.001,
        };
        assert!(matches!(
            ExpLookupTable::build(16, Q, off_grid),
            Err(EngineError::InvalidLut(_))
        ));

        // 15.5 * 256 = 3968 is representable
        let on_grid = LutConfig {
            size: 256,
            domain_max_distance: 15.5,
        };
        let lut = ExpLookupTable::build(16, Q, on_grid).unwrap();
        // floor(3967 / 3968 * 255)
        assert_eq!(lut.index_for(3967), 254);
        assert_eq!(lut.index_for(3968), 255);
    }

    #[test]
    fn test_deterministic_rebuild() {
        assert_eq!(table(40), table(40));
    }

    #[test]
    fn test_small_format_saturates_entries() {
        // Q1.7: max is 127/128, so exp(0) = 1.0 saturates
        let f = FixedPointFormat::new(8, 7).unwrap();
        let lut = ExpLookupTable::build(8, f, geometry()).unwrap();
        assert_eq!(lut.entries()[0], 127);
    }
}
