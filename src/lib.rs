//! Whitewater reach normalization and runnability service.
//!
//! Ingests loosely-structured reach detail documents from American
//! Whitewater and derives a normalized, queryable model: reach identity,
//! difficulty rating, and a human-readable runnability stage computed from
//! the reach's gauge threshold ladder and its live gauge reading.
//!
//! The core pipeline is pure and synchronous: `shape` resolves the document
//! nesting variant once, `gauge::ranges` normalizes the threshold block,
//! `gauge::bias` classifies where the detail concentrates, and
//! `gauge::stage` names the stage for the current observation. `reach`
//! assembles the entity pair and `feature` emits it as flat attributes plus
//! opaque geometry. `ingest`, `cache`, `reaches` and `logging` are the thin
//! I/O shell around that core.

pub mod cache;
pub mod difficulty;
pub mod feature;
pub mod gauge;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod reach;
pub mod reaches;
pub mod shape;
pub mod text;
