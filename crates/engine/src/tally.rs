//! Per-inference primitive operation counts

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Operation counts for one `predict` call.
///
/// Observational only: counts never feed back into the arithmetic. Each call
/// returns a fresh tally; batch drivers sum them afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationTally {
    pub multiply_accumulate: u64,
    pub add: u64,
    pub multiply: u64,
    pub compare: u64,
    pub lookup: u64,
}

impl OperationTally {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn count_mac(&mut self, n: u64) {
        self.multiply_accumulate += n;
    }

    #[inline]
    pub fn count_add(&mut self, n: u64) {
        self.add += n;
    }

    #[inline]
    pub fn count_multiply(&mut self, n: u64) {
        self.multiply += n;
    }

    #[inline]
    pub fn count_compare(&mut self, n: u64) {
        self.compare += n;
    }

    #[inline]
    pub fn count_lookup(&mut self, n: u64) {
        self.lookup += n;
    }

    /// Primitive operation total; a MAC counts as one multiply plus one add
    pub fn total_ops(&self) -> u64 {
        2 * self.multiply_accumulate + self.add + self.multiply + self.compare + self.lookup
    }
}

impl Add for OperationTally {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for OperationTally {
    fn add_assign(&mut self, rhs: Self) {
        self.multiply_accumulate += rhs.multiply_accumulate;
        self.add += rhs.add;
        self.multiply += rhs.multiply;
        self.compare += rhs.compare;
        self.lookup += rhs.lookup;
    }
}

impl Sum for OperationTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, t| acc + t)
    }
}

impl<'a> Sum<&'a OperationTally> for OperationTally {
    fn sum<I: Iterator<Item = &'a OperationTally>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
