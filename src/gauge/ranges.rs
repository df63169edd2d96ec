//! Gauge range extraction and normalization.
//!
//! The upstream range block is loosely structured: slots may repeat values,
//! endpoints arrive as numbers or numeric strings under two naming
//! conventions, and unrelated keys show up next to real slots. This module
//! reduces all of that to a `ThresholdSet` — a sorted, deduplicated value
//! ladder plus the set of slot positions that contributed to it.

use serde_json::Value;

use crate::model::{MAX_SLOT_POSITION, ReachError, ThresholdSet};
use crate::shape::DocumentShape;

/// Endpoint field names, primary and accepted alias.
const LOW_ENDPOINT_KEYS: [&str; 2] = ["min", "range_min"];
const HIGH_ENDPOINT_KEYS: [&str; 2] = ["max", "range_max"];

/// Field carrying the slot position key ("R0".."R9").
const POSITION_KEY_FIELD: &str = "range";

/// Locates the gauge range slot list inside a raw document, trying the known
/// wrapper shapes in fixed priority order.
///
/// Returns `None` when the document simply has no range block — absence is
/// ordinary, not an error.
pub fn locate_range_block(doc: &Value) -> Option<&Vec<Value>> {
    DocumentShape::resolve(doc).ranges_block(doc)
}

/// Extracts the normalized threshold ladder from a raw document.
///
/// Every slot with a well-formed position key contributes its non-null
/// endpoints; a value already present in the accumulated ladder is not
/// added again, but the slot position still counts toward the bias set.
/// Slots whose position key does not match the prefixed-digit pattern are
/// skipped: the upstream sometimes emits unrelated keys alongside real
/// slots.
///
/// Fails with `MalformedRangeBlock` when the located block is non-empty but
/// its first record lacks the position-key field — the document shape could
/// not be matched to any known schema variant, and silently tolerating it
/// would misclassify every downstream stage.
pub fn extract(doc: &Value) -> Result<ThresholdSet, ReachError> {
    let Some(block) = locate_range_block(doc) else {
        return Ok(ThresholdSet::default());
    };
    if block.is_empty() {
        return Ok(ThresholdSet::default());
    }
    if block[0].get(POSITION_KEY_FIELD).is_none() {
        return Err(ReachError::MalformedRangeBlock(format!(
            "first slot record has no '{}' field",
            POSITION_KEY_FIELD
        )));
    }

    let mut thresholds = ThresholdSet::default();

    for slot in block {
        let Some(position) = slot
            .get(POSITION_KEY_FIELD)
            .and_then(|k| k.as_str())
            .and_then(slot_position)
        else {
            continue;
        };

        let mut contributed = false;
        for keys in [&LOW_ENDPOINT_KEYS, &HIGH_ENDPOINT_KEYS] {
            if let Some(value) = endpoint_value(slot, keys) {
                contributed = true;
                if !thresholds.values.iter().any(|v| *v == value) {
                    thresholds.values.push(value);
                }
            }
        }
        if contributed {
            thresholds.positions.insert(position);
        }
    }

    // Ingestion order is upstream slot order; sorting by value is the final
    // normalization step.
    thresholds.values.sort_by(f64::total_cmp);

    Ok(thresholds)
}

/// Parses a slot position key like "R3" into its zero-based index.
///
/// The key must be a single alphabetic prefix character followed by a digit
/// in the slot range; anything else is not a slot key.
fn slot_position(key: &str) -> Option<u8> {
    let rest = key.strip_prefix(|c: char| c.is_ascii_alphabetic())?;
    rest.parse::<u8>()
        .ok()
        .filter(|p| *p <= MAX_SLOT_POSITION)
}

/// Reads one endpoint from a slot record, accepting either naming
/// convention, coercing to f64.
///
/// Null, missing, non-numeric and non-finite endpoints contribute nothing;
/// one bad endpoint must not discard an otherwise healthy ladder.
fn endpoint_value(slot: &Value, keys: &[&str; 2]) -> Option<f64> {
    let raw = keys.iter().find_map(|k| {
        slot.get(*k).filter(|v| !v.is_null())
    })?;

    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    value.is_finite().then_some(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
