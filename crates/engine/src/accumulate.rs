//! Saturating reductions
//!
//! Saturating addition is not associative, so the reduction order is part of
//! the observable result. Both orders used by the hardware variants live here.

use svmsim_fixed_point::FixedPointFormat;

/// Left-to-right fold from zero: `n` adds for `n` values
#[inline]
pub fn fold_sequential(format: FixedPointFormat, values: &[i32]) -> i32 {
    values
        .iter()
        .fold(0i32, |acc, &v| format.fixed_add(acc, v))
}

/// Balanced pairwise adder tree, reduced in place: `n - 1` adds for `n` values.
///
/// On each level element `2k` is added to `2k + 1`; an odd trailing element is
/// carried to the next level unchanged. An empty slice reduces to zero.
pub fn reduce_adder_tree(format: FixedPointFormat, values: &mut [i32]) -> i32 {
    let mut len = values.len();
    if len == 0 {
        return 0;
    }
    while len > 1 {
        let half = len / 2;
        for k in 0..half {
            values[k] = format.fixed_add(values[2 * k], values[2 * k + 1]);
        }
        if len % 2 == 1 {
            values[half] = values[len - 1];
            len = half + 1;
        } else {
            len = half;
        }
    }
    values[0]
}

/// Adds performed by `reduce_adder_tree` over `n` values
pub fn adder_tree_adds(n: usize) -> u64 {
    n.saturating_sub(1) as u64
}

/// Depth of a balanced adder tree over `n` inputs: `ceil(log2(n))`
pub fn adder_tree_depth(n: usize) -> u64 {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: FixedPointFormat = FixedPointFormat::q8_8();

    #[test]
    fn test_tree_matches_fold_without_saturation() {
        for n in 0..=9 {
            let values: Vec<i32> = (0..n).map(|i| (i as i32 - 4) * 300).collect();
            let mut buf = values.clone();
            assert_eq!(reduce_adder_tree(Q, &mut buf), fold_sequential(Q, &values), "n={}", n);
        }
    }

    #[test]
    fn test_tree_and_fold_diverge_under_saturation() {
        // fold: 30000 + 30000 -> 32767, -30000 -> 2767, -30000 -> -27233
        // tree: (30000 + 30000) -> 32767, (-30000 + -30000) -> -32768, sum -> -1
        let values = [30000, 30000, -30000, -30000];
        assert_eq!(fold_sequential(Q, &values), -27233);
        let mut buf = values;
        assert_eq!(reduce_adder_tree(Q, &mut buf), -1);
    }

    #[test]
    fn test_odd_length_carries_last() {
        let mut buf = [1, 2, 3, 4, 5];
        // ((1+2)+(3+4)) + 5
        assert_eq!(reduce_adder_tree(Q, &mut buf), 15);
        assert_eq!(adder_tree_adds(5), 4);
    }

    #[test]
    fn test_tree_depth() {
        assert_eq!(adder_tree_depth(1), 0);
        assert_eq!(adder_tree_depth(2), 1);
        assert_eq!(adder_tree_depth(3), 2);
        assert_eq!(adder_tree_depth(16), 4);
        assert_eq!(adder_tree_depth(17), 5);
        assert_eq!(adder_tree_depth(40), 6);
    }
}
