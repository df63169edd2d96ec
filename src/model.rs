/// Core data types for the whitewater reach monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond trivial accessors, no I/O, and no external
/// dependencies — only types.

use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Gauge range slot constants
// ---------------------------------------------------------------------------

/// Upstream gauge range slots are indexed 0 through 9 ("R0".."R9").
pub const MAX_SLOT_POSITION: u8 = 9;

/// Slot positions at or below this index count toward the low half of the
/// scale when computing range bias; positions above it count toward the
/// high half.
pub const LOW_HALF_MAX_POSITION: u8 = 4;

// ---------------------------------------------------------------------------
// Threshold types
// ---------------------------------------------------------------------------

/// The normalized gauge threshold ladder for a reach.
///
/// `values` is always sorted ascending and contains no duplicates — a value
/// is included once even when two distinct upstream slots carry it.
/// `positions` records which slot indexes (0..=9) contributed at least one
/// non-null endpoint; range bias is computed from positions, not values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ThresholdSet {
    pub values: Vec<f64>,
    pub positions: BTreeSet<u8>,
}

impl ThresholdSet {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lowest threshold value, if any.
    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    /// Highest threshold value, if any.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }
}

/// Whether the upstream gauge ranges provide more detail at the low or high
/// end of the flow scale, or are evenly balanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Low,
    High,
    Balanced,
}

impl fmt::Display for Bias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bias::Low => write!(f, "low"),
            Bias::High => write!(f, "high"),
            Bias::Balanced => write!(f, "balanced"),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage vocabulary
// ---------------------------------------------------------------------------

/// Human-readable runnability stage derived from comparing the current gauge
/// observation against the threshold ladder.
///
/// This is a closed vocabulary, ordered from lowest water to highest. The
/// display strings match the upstream phrasing ("too low", "medium high",
/// ...), with the upstream's inconsistent "high medium"/"medium high"
/// spellings collapsed to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    NoReading,
    TooLow,
    ExtremelyLow,
    VeryLow,
    LowerRunnable,
    Low,
    MediumLow,
    Runnable,
    Medium,
    MediumHigh,
    HigherRunnable,
    High,
    VeryHigh,
    ExtremelyHigh,
    TooHigh,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::NoReading => "no gauge reading",
            Stage::TooLow => "too low",
            Stage::ExtremelyLow => "extremely low",
            Stage::VeryLow => "very low",
            Stage::LowerRunnable => "lower runnable",
            Stage::Low => "low",
            Stage::MediumLow => "medium low",
            Stage::Runnable => "runnable",
            Stage::Medium => "medium",
            Stage::MediumHigh => "medium high",
            Stage::HigherRunnable => "higher runnable",
            Stage::High => "high",
            Stage::VeryHigh => "very high",
            Stage::ExtremelyHigh => "extremely high",
            Stage::TooHigh => "too high",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Difficulty types
// ---------------------------------------------------------------------------

/// Parsed whitewater difficulty rating from the combined class notation
/// (e.g. "III-IV+(V)").
///
/// `outlier` is the parenthesized rating denoting a notably harder isolated
/// feature. All three fields are absent when the source string is empty or
/// the literal "none".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DifficultyRating {
    pub minimum: Option<String>,
    pub maximum: Option<String>,
    pub outlier: Option<String>,
}

// ---------------------------------------------------------------------------
// Reach point classification
// ---------------------------------------------------------------------------

/// Primary classification of a reach point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointType {
    Access,
    Rapid,
    Hazard,
    Generic,
}

impl fmt::Display for PointType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointType::Access => write!(f, "access"),
            PointType::Rapid => write!(f, "rapid"),
            PointType::Hazard => write!(f, "hazard"),
            PointType::Generic => write!(f, "generic"),
        }
    }
}

/// Secondary classification. Required for access points (putin, takeout or
/// intermediate); optional display overlay for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointSubtype {
    Putin,
    Takeout,
    Intermediate,
    Portage,
    Waterfall,
    Playspot,
}

impl fmt::Display for PointSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointSubtype::Putin => write!(f, "putin"),
            PointSubtype::Takeout => write!(f, "takeout"),
            PointSubtype::Intermediate => write!(f, "intermediate"),
            PointSubtype::Portage => write!(f, "portage"),
            PointSubtype::Waterfall => write!(f, "waterfall"),
            PointSubtype::Playspot => write!(f, "playspot"),
        }
    }
}

// ---------------------------------------------------------------------------
// Geometry handle
// ---------------------------------------------------------------------------

/// Opaque geometry carried through from the upstream document.
///
/// The service never computes geometry; this wraps the raw GeoJSON value and
/// hands it to the feature-emission consumer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryHandle(pub serde_json::Value);

impl GeometryHandle {
    pub fn as_geojson(&self) -> &serde_json::Value {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while normalizing reach data.
///
/// Network and cache failures are the concern of the ingest and cache
/// modules and deliberately do not appear here.
#[derive(Debug, Clone, PartialEq)]
pub enum ReachError {
    /// The gauge range block was found but does not match any known schema
    /// variant. Fatal to stage computation for that reach; the rest of the
    /// entity is still usable.
    MalformedRangeBlock(String),
    /// Bias was requested for an empty slot-position set. Bias is undefined
    /// without at least one contributing slot.
    EmptyThresholds,
    /// Stage was requested against an empty threshold ladder. Data absent,
    /// not malformed — callers recover locally with an unknown stage.
    NoThresholds,
    /// The threshold count / bias combination has no defined stage naming.
    /// Surfaced rather than mapped to a nearest stage, since guessing would
    /// fabricate a false signal about river safety.
    UnclassifiedStage { count: usize, bias: Bias },
    /// The mandatory maximum-class group of a difficulty string did not
    /// match. Propagated so the caller decides whether to drop or report.
    UnparsableDifficulty(String),
}

impl fmt::Display for ReachError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReachError::MalformedRangeBlock(msg) => {
                write!(f, "malformed gauge range block: {}", msg)
            }
            ReachError::EmptyThresholds => {
                write!(f, "range bias is undefined for an empty slot set")
            }
            ReachError::NoThresholds => {
                write!(f, "no gauge thresholds available for stage classification")
            }
            ReachError::UnclassifiedStage { count, bias } => {
                write!(
                    f,
                    "no stage naming defined for {} thresholds with {} bias",
                    count, bias
                )
            }
            ReachError::UnparsableDifficulty(raw) => {
                write!(f, "unparsable difficulty rating: '{}'", raw)
            }
        }
    }
}

impl std::error::Error for ReachError {}
