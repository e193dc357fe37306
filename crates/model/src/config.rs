//! Simulator configuration
//!
//! The fixed-point format, exponential table geometry and architecture constants
//! are hardware-design parameters supplied from outside; nothing here is derived
//! from the parameter records themselves.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use svmsim_fixed_point::FixedPointFormat;

use crate::error::{ModelError, Result};

/// How a run of partial products or squared differences is reduced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accumulation {
    /// Left-to-right saturating fold in index order
    #[default]
    Sequential,
    /// Balanced pairwise saturating adder tree
    AdderTree,
}

impl fmt::Display for Accumulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::AdderTree => f.write_str("adder_tree"),
        }
    }
}

impl FromStr for Accumulation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "sequential" => Ok(Self::Sequential),
            "adder_tree" => Ok(Self::AdderTree),
            other => Err(ModelError::Config(format!(
                "unknown accumulation {:?} (expected \"sequential\" or \"adder_tree\")",
                other
            ))),
        }
    }
}

/// Exponential lookup table geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LutConfig {
    /// Number of table entries
    pub size: usize,
    /// Upper bound of the squared-distance domain covered by the table (real units)
    pub domain_max_distance: f64,
}

/// Simulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Fixed-point format shared by parameters, inputs and all arithmetic
    #[serde(default)]
    pub format: FixedPointFormat,

    /// Exponential table size
    #[serde(default = "default_lut_size")]
    pub lut_size: usize,

    /// Squared-distance bound of the exponential table
    #[serde(default = "default_domain_max_distance")]
    pub domain_max_distance: f64,

    /// Reduction order over features
    #[serde(default)]
    pub accumulation: Accumulation,

    /// Per-support-vector pipeline latency of the iterative kernel design
    #[serde(default = "default_kernel_pipeline_latency")]
    pub kernel_pipeline_latency: u64,

    /// Clock frequency for latency conversion
    #[serde(default = "default_clock_mhz")]
    pub clock_mhz: f64,
}

fn default_lut_size() -> usize { 256 }
fn default_domain_max_distance() -> f64 { 16.0 }
fn default_kernel_pipeline_latency() -> u64 { 8 }
fn default_clock_mhz() -> f64 { 100.0 }

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            format: FixedPointFormat::default(),
            lut_size: default_lut_size(),
            domain_max_distance: default_domain_max_distance(),
            accumulation: Accumulation::default(),
            kernel_pipeline_latency: default_kernel_pipeline_latency(),
            clock_mhz: default_clock_mhz(),
        }
    }
}

impl SimulatorConfig {
    /// Load config from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Create config from environment variables over the defaults.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(format) = std::env::var("SVMSIM_FORMAT") {
            if let Ok(f) = format.parse() {
                config.format = f;
            }
        }

        if let Ok(size) = std::env::var("SVMSIM_LUT_SIZE") {
            if let Ok(s) = size.parse() {
                config.lut_size = s;
            }
        }

        if let Ok(dist) = std::env::var("SVMSIM_DOMAIN_MAX_DISTANCE") {
            if let Ok(d) = dist.parse() {
                config.domain_max_distance = d;
            }
        }

        if let Ok(acc) = std::env::var("SVMSIM_ACCUMULATION") {
            if let Ok(a) = acc.parse() {
                config.accumulation = a;
            }
        }

        if let Ok(latency) = std::env::var("SVMSIM_KERNEL_PIPELINE_LATENCY") {
            if let Ok(l) = latency.parse() {
                config.kernel_pipeline_latency = l;
            }
        }

        if let Ok(clock) = std::env::var("SVMSIM_CLOCK_MHZ") {
            if let Ok(c) = clock.parse() {
                config.clock_mhz = c;
            }
        }

        config
    }

    /// Exponential table geometry
    pub fn lut(&self) -> LutConfig {
        LutConfig {
            size: self.lut_size,
            domain_max_distance: self.domain_max_distance,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.lut_size < 2 {
            return Err(ModelError::Config(format!(
                "lut_size ({}) must be at least 2",
                self.lut_size
            )));
        }
        if !self.domain_max_distance.is_finite() || self.domain_max_distance <= 0.0 {
            return Err(ModelError::Config(format!(
                "domain_max_distance ({}) must be finite and positive",
                self.domain_max_distance
            )));
        }
        if (self.domain_max_distance * self.format.scale() as f64).fract() != 0.0 {
            return Err(ModelError::Config(format!(
                "domain_max_distance ({}) is not a whole number of {} steps",
                self.domain_max_distance, self.format
            )));
        }
        if self.kernel_pipeline_latency == 0 {
            return Err(ModelError::Config(
                "kernel_pipeline_latency must be at least 1".into(),
            ));
        }
        if !self.clock_mhz.is_finite() || self.clock_mhz <= 0.0 {
            return Err(ModelError::Config(format!(
                "clock_mhz ({}) must be finite and positive",
                self.clock_mhz
            )));
        }
        Ok(())
    }
}
