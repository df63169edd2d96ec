//! Whitewater difficulty notation parsing.
//!
//! The upstream combines up to three class ratings into one compact string:
//! an optional minimum before a hyphen, a mandatory maximum with an optional
//! `+`/`-` intensity modifier, and an optional parenthesized outlier marking
//! a notably harder isolated feature. "III-IV+(V)" reads: usually class III
//! to IV+, with one class V drop. Ratings use the International Scale
//! (I..VI) or the aid-style "5.x" tokens, so the token grammar is ambiguous
//! and matched permissively.

use regex::Regex;

use crate::model::{DifficultyRating, ReachError};

/// min-hyphen lookahead restated as a consumed hyphen; class tokens are 1-3
/// characters over the roman/decimal alphabet with an optional modifier.
const DIFFICULTY_PATTERN: &str =
    r"^(?:([IV5.\d]{1,3})-)?([IV5.\d]{1,3}[+-]?)(?:\(([IV5.\d]{1,3}[+-]?)\))?";

/// Parses a combined difficulty string into its minimum/maximum/outlier
/// parts.
///
/// An empty string or the literal "none" (any casing) is ordinary absence:
/// all three parts come back empty. Anything else must contain at least the
/// mandatory maximum class group, or the string is surfaced as
/// `UnparsableDifficulty` for the caller to decide whether to drop or
/// report.
pub fn parse(rating: &str) -> Result<DifficultyRating, ReachError> {
    let trimmed = rating.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(DifficultyRating::default());
    }

    let pattern = Regex::new(DIFFICULTY_PATTERN).expect("valid difficulty regex");
    let captures = pattern
        .captures(trimmed)
        .ok_or_else(|| ReachError::UnparsableDifficulty(rating.to_string()))?;

    let part = |index: usize| {
        captures
            .get(index)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    Ok(DifficultyRating {
        minimum: part(1),
        maximum: part(2),
        outlier: part(3),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(rating: &str) -> (Option<String>, Option<String>, Option<String>) {
        let parsed = parse(rating).expect("rating should parse");
        (parsed.minimum, parsed.maximum, parsed.outlier)
    }

    fn owned(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_full_notation_with_range_modifier_and_outlier() {
        assert_eq!(parts("III-IV+(V)"), (owned("III"), owned("IV+"), owned("V")));
    }

    #[test]
    fn test_single_class_is_maximum_only() {
        assert_eq!(parts("II"), (None, owned("II"), None));
    }

    #[test]
    fn test_single_class_with_modifier() {
        assert_eq!(parts("IV+"), (None, owned("IV+"), None));
        assert_eq!(parts("III-"), (None, owned("III-"), None));
    }

    #[test]
    fn test_range_without_outlier() {
        assert_eq!(parts("II-III"), (owned("II"), owned("III"), None));
    }

    #[test]
    fn test_decimal_aid_style_token() {
        assert_eq!(parts("5.9"), (None, owned("5.9"), None));
    }

    #[test]
    fn test_outlier_without_minimum() {
        assert_eq!(parts("IV(V+)"), (None, owned("IV"), owned("V+")));
    }

    #[test]
    fn test_class_six_parses() {
        assert_eq!(parts("V-VI"), (owned("V"), owned("VI"), None));
    }

    #[test]
    fn test_empty_string_is_all_absent() {
        assert_eq!(parts(""), (None, None, None));
    }

    #[test]
    fn test_none_sentinel_is_all_absent_any_casing() {
        assert_eq!(parts("none"), (None, None, None));
        assert_eq!(parts("NONE"), (None, None, None));
        assert_eq!(parts("None"), (None, None, None));
    }

    #[test]
    fn test_unmatchable_string_is_an_error() {
        let result = parse("Class Unknown");
        assert!(
            matches!(result, Err(ReachError::UnparsableDifficulty(_))),
            "strings without a maximum class group must surface, got {:?}",
            result
        );
    }

    #[test]
    fn test_whitespace_is_trimmed_before_matching() {
        assert_eq!(parts("  III  "), (None, owned("III"), None));
    }
}
