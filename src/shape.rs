//! Upstream document shape resolution.
//!
//! AW reach detail documents arrive in one of three nesting variants: a
//! container view wrapping the main gadget payload, the main gadget payload
//! at top level, or the payload already unwrapped. The shape is resolved
//! once per document and reused by every sub-extractor, so no module
//! re-sniffs wrappers per field.

use serde_json::Value;

/// Top-level wrapper key on fully-wrapped documents.
pub const VIEW_WRAPPER_KEY: &str = "CContainerViewJSON_view";

/// Main payload key, present inside the view wrapper or at top level.
pub const MAIN_WRAPPER_KEY: &str = "CRiverMainGadgetJSON_main";

/// Gauge summary block key. The upstream misspells it; keep the literal.
pub const GAUGE_SUMMARY_KEY: &str = "guagesummary";

/// How the payload is nested inside the raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// view wrapper -> main wrapper -> payload
    Wrapped,
    /// main wrapper -> payload
    SingleWrapped,
    /// payload at top level
    Flat,
}

impl DocumentShape {
    /// Probes the wrapper keys in fixed priority order. A document that
    /// matches none of the known wrappers is treated as already unwrapped.
    pub fn resolve(doc: &Value) -> DocumentShape {
        if doc.get(VIEW_WRAPPER_KEY).is_some() {
            DocumentShape::Wrapped
        } else if doc.get(MAIN_WRAPPER_KEY).is_some() {
            DocumentShape::SingleWrapped
        } else {
            DocumentShape::Flat
        }
    }

    /// The main payload object for this document under the resolved shape.
    pub fn main_block<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        match self {
            DocumentShape::Wrapped => doc
                .get(VIEW_WRAPPER_KEY)
                .and_then(|v| v.get(MAIN_WRAPPER_KEY)),
            DocumentShape::SingleWrapped => doc.get(MAIN_WRAPPER_KEY),
            DocumentShape::Flat => Some(doc),
        }
    }

    /// The reach info object (names, description, class, coordinates).
    pub fn info_block<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.main_block(doc).and_then(|m| m.get("info"))
    }

    /// The live gauge block (reading, id, units, metric).
    pub fn gauges_block<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.main_block(doc).and_then(|m| m.get("gauges"))
    }

    /// The gauge range slot list. Found under the gauge summary block on
    /// well-formed documents; some snapshots carry `ranges` directly on the
    /// payload, so that is probed second.
    pub fn ranges_block<'a>(&self, doc: &'a Value) -> Option<&'a Vec<Value>> {
        let main = self.main_block(doc)?;
        main.get(GAUGE_SUMMARY_KEY)
            .and_then(|s| s.get("ranges"))
            .or_else(|| main.get("ranges"))
            .and_then(|r| r.as_array())
    }

    /// The rapids/points list for the reach.
    pub fn points_block<'a>(&self, doc: &'a Value) -> Option<&'a Vec<Value>> {
        self.main_block(doc)
            .and_then(|m| m.get("rapids"))
            .and_then(|r| r.as_array())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
