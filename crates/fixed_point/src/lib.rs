//! svmsim Fixed-Point Numerics
//!
//! Saturating signed fixed-point arithmetic parameterized by a configurable
//! Qm.n format. Values are i32 and intermediates i64; results clip to the format
//! range and never wrap.

mod error;
mod fixed;
mod vector;

pub use error::{FixedPointError, Result};
pub use fixed::{FixedPointFormat, DEFAULT_FRAC_BITS, DEFAULT_TOTAL_BITS, MAX_TOTAL_BITS};
pub use vector::FixedVector;
