//! Stage classification.
//!
//! Maps a live gauge observation against the normalized threshold ladder to
//! one of the named runnability stages. The closed interval between the
//! lowest and highest threshold is divided into `len - 1` sub-intervals
//! bounded by consecutive threshold pairs; the sub-interval index selects a
//! name from a fixed per-(count, bias) vocabulary.
//!
//! # Boundary rule
//! Sub-intervals are closed on the left: an observation exactly equal to an
//! interior threshold takes the stage whose sub-interval starts there, and
//! an observation equal to the top threshold takes the last ladder stage.
//! This keeps classification total over the whole closed interval.

use crate::model::{Bias, ReachError, Stage, ThresholdSet};

/// Which naming vocabulary to use for the seven-threshold high-bias ladder.
///
/// `Legacy` reproduces the labels historically emitted for that ladder,
/// which repeat "medium high" for two different sub-intervals and never
/// reach "very high". It exists for consumers that must match stored labels
/// byte for byte; everything else should use `Corrected`, the monotonic
/// vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingScheme {
    #[default]
    Corrected,
    Legacy,
}

/// A classified observation: the named stage and whether the reach is
/// runnable at that stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageOutcome {
    pub stage: Stage,
    pub runnable: bool,
}

impl StageOutcome {
    fn off_ladder(stage: Stage) -> StageOutcome {
        StageOutcome { stage, runnable: false }
    }

    fn on_ladder(stage: Stage) -> StageOutcome {
        StageOutcome { stage, runnable: true }
    }
}

// ---------------------------------------------------------------------------
// Per-(count, bias) stage vocabularies
// ---------------------------------------------------------------------------

const COUNT_2: &[Stage] = &[Stage::Runnable];
const COUNT_3: &[Stage] = &[Stage::LowerRunnable, Stage::HigherRunnable];
const COUNT_4: &[Stage] = &[Stage::Low, Stage::Medium, Stage::High];
const COUNT_5_LOW: &[Stage] = &[
    Stage::VeryLow,
    Stage::MediumLow,
    Stage::Medium,
    Stage::High,
];
const COUNT_5_HIGH: &[Stage] = &[
    Stage::Low,
    Stage::Medium,
    Stage::MediumHigh,
    Stage::VeryHigh,
];
const COUNT_6: &[Stage] = &[
    Stage::Low,
    Stage::MediumLow,
    Stage::Medium,
    Stage::MediumHigh,
    Stage::High,
];
const COUNT_7_LOW: &[Stage] = &[
    Stage::VeryLow,
    Stage::Low,
    Stage::MediumLow,
    Stage::Medium,
    Stage::MediumHigh,
    Stage::High,
];
const COUNT_7_HIGH: &[Stage] = &[
    Stage::Low,
    Stage::MediumLow,
    Stage::Medium,
    Stage::MediumHigh,
    Stage::High,
    Stage::VeryHigh,
];
const COUNT_7_HIGH_LEGACY: &[Stage] = &[
    Stage::Low,
    Stage::MediumLow,
    Stage::MediumHigh,
    Stage::Medium,
    Stage::MediumHigh,
    Stage::High,
];
const COUNT_8: &[Stage] = &[
    Stage::VeryLow,
    Stage::Low,
    Stage::MediumLow,
    Stage::Medium,
    Stage::MediumHigh,
    Stage::High,
    Stage::VeryHigh,
];
const COUNT_9_LOW: &[Stage] = &[
    Stage::ExtremelyLow,
    Stage::VeryLow,
    Stage::Low,
    Stage::MediumLow,
    Stage::Medium,
    Stage::MediumHigh,
    Stage::High,
    Stage::VeryHigh,
];
const COUNT_9_HIGH: &[Stage] = &[
    Stage::VeryLow,
    Stage::Low,
    Stage::MediumLow,
    Stage::Medium,
    Stage::MediumHigh,
    Stage::High,
    Stage::VeryHigh,
    Stage::ExtremelyHigh,
];
const COUNT_10: &[Stage] = &[
    Stage::ExtremelyLow,
    Stage::VeryLow,
    Stage::Low,
    Stage::MediumLow,
    Stage::Medium,
    Stage::MediumHigh,
    Stage::High,
    Stage::VeryHigh,
    Stage::ExtremelyHigh,
];

/// The ordered stage vocabulary for a ladder, or `None` when the
/// (count, bias) combination has no defined naming.
fn ladder_vocabulary(count: usize, bias: Bias, naming: NamingScheme) -> Option<&'static [Stage]> {
    match (count, bias) {
        (2, _) => Some(COUNT_2),
        (3, _) => Some(COUNT_3),
        (4, _) => Some(COUNT_4),
        (5, Bias::Low) => Some(COUNT_5_LOW),
        (5, Bias::High) => Some(COUNT_5_HIGH),
        (6, _) => Some(COUNT_6),
        (7, Bias::Low) => Some(COUNT_7_LOW),
        (7, Bias::High) => match naming {
            NamingScheme::Corrected => Some(COUNT_7_HIGH),
            NamingScheme::Legacy => Some(COUNT_7_HIGH_LEGACY),
        },
        (8, _) => Some(COUNT_8),
        (9, Bias::Low) => Some(COUNT_9_LOW),
        (9, Bias::High) => Some(COUNT_9_HIGH),
        (10, _) => Some(COUNT_10),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies an observation against the threshold ladder using the
/// corrected naming vocabulary.
pub fn classify(
    thresholds: &ThresholdSet,
    bias: Bias,
    observation: Option<f64>,
) -> Result<StageOutcome, ReachError> {
    classify_with_naming(thresholds, bias, observation, NamingScheme::Corrected)
}

/// Classifies an observation against the threshold ladder.
///
/// - No observation: `NoReading`, not runnable, regardless of thresholds.
/// - Empty ladder: `NoThresholds` — a data-quality signal, never silently
///   defaulted.
/// - A single threshold with high bias is a ceiling: at or below it is
///   `Runnable`, above it is `TooHigh`. A single threshold with any other
///   bias has no defined meaning and yields `UnclassifiedStage`.
/// - Otherwise, below the bottom threshold is `TooLow`, above the top is
///   `TooHigh`, and anything in between indexes into the per-(count, bias)
///   vocabulary. A combination with no vocabulary yields
///   `UnclassifiedStage` rather than a nearest-stage guess.
pub fn classify_with_naming(
    thresholds: &ThresholdSet,
    bias: Bias,
    observation: Option<f64>,
    naming: NamingScheme,
) -> Result<StageOutcome, ReachError> {
    let Some(observation) = observation else {
        return Ok(StageOutcome::off_ladder(Stage::NoReading));
    };
    if thresholds.is_empty() {
        return Err(ReachError::NoThresholds);
    }

    let values = &thresholds.values;
    let count = values.len();

    if count == 1 {
        return match bias {
            Bias::High => {
                if observation <= values[0] {
                    Ok(StageOutcome::on_ladder(Stage::Runnable))
                } else {
                    Ok(StageOutcome::off_ladder(Stage::TooHigh))
                }
            }
            _ => Err(ReachError::UnclassifiedStage { count, bias }),
        };
    }

    if observation < values[0] {
        return Ok(StageOutcome::off_ladder(Stage::TooLow));
    }
    if observation > values[count - 1] {
        return Ok(StageOutcome::off_ladder(Stage::TooHigh));
    }

    let vocabulary = ladder_vocabulary(count, bias, naming)
        .ok_or(ReachError::UnclassifiedStage { count, bias })?;

    // Closed-on-the-left interval index, clamped so the top threshold falls
    // into the last sub-interval.
    let index = values
        .partition_point(|t| *t <= observation)
        .saturating_sub(1)
        .min(count - 2);

    Ok(StageOutcome::on_ladder(vocabulary[index]))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn ladder(values: &[f64]) -> ThresholdSet {
        ThresholdSet {
            values: values.to_vec(),
            // Positions are irrelevant here; bias is passed explicitly.
            positions: BTreeSet::new(),
        }
    }

    fn stage_of(values: &[f64], bias: Bias, obs: f64) -> Stage {
        classify(&ladder(values), bias, Some(obs))
            .expect("enumerated combination")
            .stage
    }

    // --- Off-ladder outcomes ------------------------------------------------

    #[test]
    fn test_missing_observation_is_no_reading_regardless_of_ladder() {
        for values in [&[][..], &[900.0][..], &[360.0, 900.0, 1680.0, 3500.0][..]] {
            let outcome = classify(&ladder(values), Bias::Balanced, None)
                .expect("missing observation never errors");
            assert_eq!(outcome.stage, Stage::NoReading);
            assert!(!outcome.runnable);
        }
    }

    #[test]
    fn test_empty_ladder_with_observation_is_no_thresholds_error() {
        let result = classify(&ladder(&[]), Bias::Balanced, Some(1200.0));
        assert_eq!(result, Err(ReachError::NoThresholds));
    }

    #[test]
    fn test_below_bottom_threshold_is_too_low() {
        let outcome = classify(&ladder(&[900.0, 3500.0]), Bias::Balanced, Some(250.0))
            .expect("two thresholds classify");
        assert_eq!(outcome.stage, Stage::TooLow);
        assert!(!outcome.runnable);
    }

    #[test]
    fn test_above_top_threshold_is_too_high() {
        let outcome = classify(&ladder(&[360.0, 900.0, 1680.0, 3500.0]), Bias::Low, Some(8000.0))
            .expect("four thresholds classify");
        assert_eq!(outcome.stage, Stage::TooHigh);
        assert!(!outcome.runnable);
    }

    // --- Pinned ladder scenarios --------------------------------------------

    #[test]
    fn test_two_thresholds_between_is_runnable() {
        let outcome = classify(&ladder(&[900.0, 3500.0]), Bias::Balanced, Some(1680.0))
            .expect("two thresholds classify");
        assert_eq!(outcome.stage, Stage::Runnable);
        assert!(outcome.runnable);
    }

    #[test]
    fn test_three_thresholds_split_runnable_into_lower_and_higher() {
        let values = [900.0, 1680.0, 3500.0];
        assert_eq!(stage_of(&values, Bias::Low, 1200.0), Stage::LowerRunnable);
        assert_eq!(stage_of(&values, Bias::Low, 2500.0), Stage::HigherRunnable);
    }

    #[test]
    fn test_four_thresholds_low_medium_high() {
        let values = [360.0, 900.0, 1680.0, 3500.0];
        assert_eq!(stage_of(&values, Bias::Balanced, 400.0), Stage::Low);
        assert_eq!(stage_of(&values, Bias::Balanced, 1000.0), Stage::Medium);
        assert_eq!(stage_of(&values, Bias::Balanced, 2000.0), Stage::High);
    }

    #[test]
    fn test_five_thresholds_low_bias_vocabulary() {
        let values = [100.0, 200.0, 300.0, 400.0, 500.0];
        assert_eq!(stage_of(&values, Bias::Low, 150.0), Stage::VeryLow);
        assert_eq!(stage_of(&values, Bias::Low, 250.0), Stage::MediumLow);
        assert_eq!(stage_of(&values, Bias::Low, 350.0), Stage::Medium);
        assert_eq!(stage_of(&values, Bias::Low, 450.0), Stage::High);
    }

    #[test]
    fn test_five_thresholds_high_bias_vocabulary() {
        let values = [100.0, 200.0, 300.0, 400.0, 500.0];
        assert_eq!(stage_of(&values, Bias::High, 150.0), Stage::Low);
        assert_eq!(stage_of(&values, Bias::High, 250.0), Stage::Medium);
        assert_eq!(stage_of(&values, Bias::High, 350.0), Stage::MediumHigh);
        assert_eq!(stage_of(&values, Bias::High, 450.0), Stage::VeryHigh);
    }

    #[test]
    fn test_five_thresholds_balanced_bias_is_unclassified() {
        let result = classify(
            &ladder(&[100.0, 200.0, 300.0, 400.0, 500.0]),
            Bias::Balanced,
            Some(250.0),
        );
        assert_eq!(
            result,
            Err(ReachError::UnclassifiedStage { count: 5, bias: Bias::Balanced })
        );
    }

    #[test]
    fn test_ten_thresholds_span_extremely_low_to_extremely_high() {
        let values: Vec<f64> = (1..=10).map(|i| (i * 100) as f64).collect();
        assert_eq!(stage_of(&values, Bias::Balanced, 150.0), Stage::ExtremelyLow);
        assert_eq!(stage_of(&values, Bias::Balanced, 550.0), Stage::Medium);
        assert_eq!(stage_of(&values, Bias::Balanced, 950.0), Stage::ExtremelyHigh);
    }

    // --- Single threshold ---------------------------------------------------

    #[test]
    fn test_single_threshold_high_bias_is_a_ceiling() {
        let values = [2200.0];
        let below = classify(&ladder(&values), Bias::High, Some(1500.0))
            .expect("ceiling case classifies");
        assert_eq!(below.stage, Stage::Runnable);
        assert!(below.runnable);

        let above = classify(&ladder(&values), Bias::High, Some(3000.0))
            .expect("ceiling case classifies");
        assert_eq!(above.stage, Stage::TooHigh);
        assert!(!above.runnable);
    }

    #[test]
    fn test_single_threshold_low_or_balanced_bias_is_unclassified() {
        for bias in [Bias::Low, Bias::Balanced] {
            let result = classify(&ladder(&[2200.0]), bias, Some(1500.0));
            assert_eq!(
                result,
                Err(ReachError::UnclassifiedStage { count: 1, bias }),
                "a floor-only ladder has no defined stage naming"
            );
        }
    }

    // --- Seven-threshold high-bias naming schemes ---------------------------

    #[test]
    fn test_seven_high_corrected_vocabulary_is_monotonic() {
        let values: Vec<f64> = (1..=7).map(|i| (i * 100) as f64).collect();
        let expected = [
            Stage::Low,
            Stage::MediumLow,
            Stage::Medium,
            Stage::MediumHigh,
            Stage::High,
            Stage::VeryHigh,
        ];
        for (i, want) in expected.iter().enumerate() {
            let obs = 150.0 + (i as f64) * 100.0;
            assert_eq!(stage_of(&values, Bias::High, obs), *want);
        }
    }

    #[test]
    fn test_seven_high_legacy_vocabulary_repeats_medium_high() {
        // The historical labels for this ladder are not monotonic: "medium
        // high" appears both below and above "medium", and "very high" is
        // never reached. Pinned so nobody "fixes" it inside the legacy
        // scheme by accident.
        let values: Vec<f64> = (1..=7).map(|i| (i * 100) as f64).collect();
        let expected = [
            Stage::Low,
            Stage::MediumLow,
            Stage::MediumHigh,
            Stage::Medium,
            Stage::MediumHigh,
            Stage::High,
        ];
        for (i, want) in expected.iter().enumerate() {
            let obs = 150.0 + (i as f64) * 100.0;
            let outcome = classify_with_naming(
                &ladder(&values),
                Bias::High,
                Some(obs),
                NamingScheme::Legacy,
            )
            .expect("legacy scheme classifies");
            assert_eq!(outcome.stage, *want);
        }
    }

    // --- Boundary rule ------------------------------------------------------

    #[test]
    fn test_observation_equal_to_interior_threshold_takes_right_hand_stage() {
        // Closed on the left: exactly 900 starts the Medium sub-interval.
        let values = [360.0, 900.0, 1680.0, 3500.0];
        assert_eq!(stage_of(&values, Bias::Balanced, 900.0), Stage::Medium);
    }

    #[test]
    fn test_observation_equal_to_bottom_threshold_takes_first_stage() {
        let values = [360.0, 900.0, 1680.0, 3500.0];
        assert_eq!(stage_of(&values, Bias::Balanced, 360.0), Stage::Low);
    }

    #[test]
    fn test_observation_equal_to_top_threshold_takes_last_stage() {
        let values = [360.0, 900.0, 1680.0, 3500.0];
        assert_eq!(stage_of(&values, Bias::Balanced, 3500.0), Stage::High);
    }

    #[test]
    fn test_two_thresholds_boundaries_are_runnable_not_off_ladder() {
        let values = [900.0, 3500.0];
        assert_eq!(stage_of(&values, Bias::Balanced, 900.0), Stage::Runnable);
        assert_eq!(stage_of(&values, Bias::Balanced, 3500.0), Stage::Runnable);
    }

    #[test]
    fn test_single_threshold_ceiling_boundary_is_still_runnable() {
        let outcome = classify(&ladder(&[2200.0]), Bias::High, Some(2200.0))
            .expect("ceiling case classifies");
        assert_eq!(outcome.stage, Stage::Runnable);
    }

    // --- Monotonicity -------------------------------------------------------

    #[test]
    fn test_stage_sequence_is_monotonic_over_a_rising_observation() {
        // Sweep an eight-threshold ladder from below the bottom to above the
        // top; the stage ordinal must never decrease and must visit TooLow
        // first and TooHigh last.
        let values: Vec<f64> = (1..=8).map(|i| (i * 100) as f64).collect();
        let thresholds = ladder(&values);

        let mut previous: Option<Stage> = None;
        let mut observation = 50.0;
        while observation < 900.0 {
            let outcome = classify(&thresholds, Bias::Balanced, Some(observation))
                .expect("eight thresholds classify");
            if let Some(prev) = previous {
                assert!(
                    outcome.stage >= prev,
                    "stage went backwards: {} -> {} at observation {}",
                    prev,
                    outcome.stage,
                    observation
                );
            }
            previous = Some(outcome.stage);
            observation += 10.0;
        }

        let bottom = classify(&thresholds, Bias::Balanced, Some(50.0)).unwrap();
        let top = classify(&thresholds, Bias::Balanced, Some(850.0)).unwrap();
        assert_eq!(bottom.stage, Stage::TooLow);
        assert_eq!(top.stage, Stage::TooHigh);
    }

    #[test]
    fn test_runnable_flag_tracks_ladder_membership() {
        let values = [360.0, 900.0, 1680.0, 3500.0];
        let thresholds = ladder(&values);
        for (obs, runnable) in [(100.0, false), (400.0, true), (2000.0, true), (9000.0, false)] {
            let outcome = classify(&thresholds, Bias::Balanced, Some(obs))
                .expect("four thresholds classify");
            assert_eq!(
                outcome.runnable, runnable,
                "runnable flag wrong at observation {}",
                obs
            );
        }
    }
}
