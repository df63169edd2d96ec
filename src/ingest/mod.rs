/// Upstream data retrieval.
///
/// Submodules:
/// - `aw` — American Whitewater detail document client.

pub mod aw;
