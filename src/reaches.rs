/// Monitored reach registry for the whitewater reach service.
///
/// Defines which AW reaches the service tracks, loaded from a TOML
/// configuration file. This is the single source of truth for reach ids —
/// other modules should take ids from here rather than hardcoding them.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Registry types
// ---------------------------------------------------------------------------

/// One monitored reach.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonitoredReach {
    /// Numeric AW reach id, kept as a string because it is an identifier,
    /// not a quantity.
    pub reach_id: String,
    /// Display name used in run summaries.
    pub name: String,
    /// Free-form operator notes.
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    reach: Vec<MonitoredReach>,
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

/// Loads and validates the monitored reach registry from a TOML file.
pub fn load_reaches(path: &Path) -> Result<Vec<MonitoredReach>, Box<dyn Error>> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("cannot read registry file {}: {}", path.display(), e))?;
    parse_registry(&contents)
}

/// Parses registry TOML and validates the entries.
pub fn parse_registry(contents: &str) -> Result<Vec<MonitoredReach>, Box<dyn Error>> {
    let registry: RegistryFile = toml::from_str(contents)?;
    validate(&registry.reach)?;
    Ok(registry.reach)
}

/// Registry invariants: ids are non-empty numeric strings and unique.
/// An id that violates this would be silently dropped by the upstream API.
pub fn validate(reaches: &[MonitoredReach]) -> Result<(), String> {
    let mut seen = std::collections::HashSet::new();
    for reach in reaches {
        if reach.reach_id.is_empty() || !reach.reach_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!(
                "reach id for '{}' must be numeric, got '{}'",
                reach.name, reach.reach_id
            ));
        }
        if !seen.insert(reach.reach_id.as_str()) {
            return Err(format!("duplicate reach id '{}' in registry", reach.reach_id));
        }
    }
    Ok(())
}

/// Looks up a registry entry by reach id. Returns `None` if not found.
pub fn find_reach<'a>(
    reaches: &'a [MonitoredReach],
    reach_id: &str,
) -> Option<&'a MonitoredReach> {
    reaches.iter().find(|r| r.reach_id == reach_id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [[reach]]
        reach_id = "3411"
        name = "Gauley, Upper"
        notes = "Fall release schedule only"

        [[reach]]
        reach_id = "1203"
        name = "Cheat, Canyon"
    "#;

    #[test]
    fn test_parse_registry_reads_all_entries() {
        let reaches = parse_registry(SAMPLE).expect("sample registry parses");
        assert_eq!(reaches.len(), 2);
        assert_eq!(reaches[0].reach_id, "3411");
        assert_eq!(reaches[0].notes.as_deref(), Some("Fall release schedule only"));
        assert_eq!(reaches[1].notes, None);
    }

    #[test]
    fn test_find_reach_returns_correct_entry() {
        let reaches = parse_registry(SAMPLE).expect("sample registry parses");
        let found = find_reach(&reaches, "1203").expect("Cheat Canyon is registered");
        assert_eq!(found.name, "Cheat, Canyon");
        assert!(find_reach(&reaches, "999999").is_none());
    }

    #[test]
    fn test_non_numeric_reach_id_is_rejected() {
        let bad = r#"
            [[reach]]
            reach_id = "gauley"
            name = "Gauley, Upper"
        "#;
        let result = parse_registry(bad);
        assert!(result.is_err(), "non-numeric id must be rejected");
    }

    #[test]
    fn test_duplicate_reach_ids_are_rejected() {
        let bad = r#"
            [[reach]]
            reach_id = "3411"
            name = "Gauley, Upper"

            [[reach]]
            reach_id = "3411"
            name = "Gauley, Upper again"
        "#;
        let result = parse_registry(bad);
        assert!(result.is_err(), "duplicate ids must be rejected");
    }

    #[test]
    fn test_empty_registry_is_valid() {
        let reaches = parse_registry("").expect("empty registry parses");
        assert!(reaches.is_empty());
    }
}
