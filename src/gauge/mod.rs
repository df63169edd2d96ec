/// Gauge threshold normalization and stage classification.
///
/// The pipeline runs leaf-first: `ranges` pulls the schema-variable
/// threshold block out of a raw document and normalizes it, `bias`
/// classifies where the upstream put its detail on the flow scale, and
/// `stage` maps a live observation against the resulting ladder to a named
/// runnability stage. All three are pure, synchronous and clock-free.

pub mod bias;
pub mod ranges;
pub mod stage;
