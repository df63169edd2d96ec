//! Range bias classification.
//!
//! Upstream gauge ranges occupy up to ten slots ("R0".."R9"). Which slots a
//! reach actually uses says where the detail concentrates: a creek that only
//! distinguishes low flows fills the bottom slots, a big-water run fills the
//! top ones. Bias is computed from the occupied slot positions, never from
//! the threshold values themselves.

use std::collections::BTreeSet;

use crate::model::{Bias, LOW_HALF_MAX_POSITION, ReachError};

/// Classifies a set of contributing slot positions as low-, high- or
/// evenly-weighted.
///
/// Pure and deterministic. Fails with `EmptyThresholds` for an empty input:
/// bias is undefined when no slot contributed a value, and callers must not
/// ask for it.
pub fn classify(positions: &BTreeSet<u8>) -> Result<Bias, ReachError> {
    if positions.is_empty() {
        return Err(ReachError::EmptyThresholds);
    }

    let low_len = positions
        .iter()
        .filter(|p| **p <= LOW_HALF_MAX_POSITION)
        .count();
    let high_len = positions.len() - low_len;

    let bias = if low_len > high_len {
        Bias::Low
    } else if low_len < high_len {
        Bias::High
    } else {
        Bias::Balanced
    };

    Ok(bias)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(values: &[u8]) -> BTreeSet<u8> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_more_low_half_positions_is_low_bias() {
        let bias = classify(&positions(&[0, 1, 2, 7])).expect("non-empty input");
        assert_eq!(bias, Bias::Low);
    }

    #[test]
    fn test_more_high_half_positions_is_high_bias() {
        let bias = classify(&positions(&[3, 5, 6, 9])).expect("non-empty input");
        assert_eq!(bias, Bias::High);
    }

    #[test]
    fn test_equal_halves_is_balanced() {
        let bias = classify(&positions(&[0, 4, 5, 9])).expect("non-empty input");
        assert_eq!(bias, Bias::Balanced);
    }

    #[test]
    fn test_position_4_counts_toward_low_half() {
        // 4 is the top of the low half; a lone slot there must read as low.
        let bias = classify(&positions(&[4])).expect("non-empty input");
        assert_eq!(bias, Bias::Low);
    }

    #[test]
    fn test_position_5_counts_toward_high_half() {
        let bias = classify(&positions(&[5])).expect("non-empty input");
        assert_eq!(bias, Bias::High);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let result = classify(&BTreeSet::new());
        assert_eq!(result, Err(ReachError::EmptyThresholds));
    }

    #[test]
    fn test_exactly_one_bias_for_every_non_empty_subset() {
        // Totality over single- and two-element position sets.
        for a in 0u8..=9 {
            for b in 0u8..=9 {
                let bias = classify(&positions(&[a, b]))
                    .expect("non-empty input must classify");
                let low = [a, b].iter().filter(|p| **p <= 4).count();
                let high = [a, b].iter().filter(|p| **p >= 5).count();
                match bias {
                    Bias::Low => assert!(low > high, "low bias requires more low slots"),
                    Bias::High => assert!(high > low, "high bias requires more high slots"),
                    Bias::Balanced => assert_eq!(low, high),
                }
            }
        }
    }
}
