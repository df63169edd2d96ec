//! Raw document caching.
//!
//! Downloaded detail documents are kept on disk so refresh runs and tests
//! can work without hitting the upstream. The directory layout mirrors the
//! standard data tree: `raw/` for untouched upstream JSON, `interim/` and
//! `processed/` for downstream stages, `external/` for hand-curated inputs.
//! A cache miss is ordinary absence, never an error.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::logging::{self, DataSource};

/// Creates a directory (and missing parents) if it does not already exist.
pub fn build_data_directory(dir_path: &Path) -> std::io::Result<PathBuf> {
    if dir_path.exists() {
        logging::debug(
            DataSource::Cache,
            None,
            &format!("Directory already exists, so not recreating, \"{}\"", dir_path.display()),
        );
    } else {
        fs::create_dir_all(dir_path)?;
        logging::info(
            DataSource::Cache,
            None,
            &format!("Created directory at \"{}\"", dir_path.display()),
        );
    }
    Ok(dir_path.to_path_buf())
}

/// Builds out the standard data directory structure under `data_dir`.
pub fn build_data_resources(data_dir: &Path) -> std::io::Result<PathBuf> {
    build_data_directory(data_dir)?;

    build_data_directory(&data_dir.join("external"))?;
    build_data_directory(&data_dir.join("raw"))?;
    build_data_directory(&data_dir.join("interim"))?;
    build_data_directory(&data_dir.join("processed"))?;

    Ok(data_dir.to_path_buf())
}

/// Cache file location for one reach's raw JSON.
pub fn raw_json_path(raw_dir: &Path, reach_id: &str) -> PathBuf {
    raw_dir.join(format!("{}.json", reach_id))
}

/// Writes a raw document to the cache, pretty-printed so diffs between
/// refresh runs stay reviewable.
pub fn save_raw_json(raw_dir: &Path, reach_id: &str, doc: &Value) -> std::io::Result<PathBuf> {
    build_data_directory(raw_dir)?;
    let path = raw_json_path(raw_dir, reach_id);
    let pretty = serde_json::to_string_pretty(doc)?;
    fs::write(&path, pretty)?;
    Ok(path)
}

/// Reads a cached raw document. `None` on a miss or an unreadable file.
pub fn load_raw_json(raw_dir: &Path, reach_id: &str) -> Option<Value> {
    let path = raw_json_path(raw_dir, reach_id);
    let contents = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(doc) => Some(doc),
        Err(e) => {
            logging::warn(
                DataSource::Cache,
                Some(reach_id),
                &format!("cached file is not valid JSON, ignoring: {}", e),
            );
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_data_resources_creates_the_full_tree() {
        let dir = tempfile::tempdir().expect("temp dir");
        let data_dir = dir.path().join("data");
        build_data_resources(&data_dir).expect("tree builds");
        for sub in ["external", "raw", "interim", "processed"] {
            assert!(data_dir.join(sub).is_dir(), "missing data subdirectory '{}'", sub);
        }
    }

    #[test]
    fn test_build_data_directory_is_idempotent() {
        let dir = tempfile::tempdir().expect("temp dir");
        let target = dir.path().join("nested").join("deep");
        build_data_directory(&target).expect("first build");
        build_data_directory(&target).expect("second build leaves it alone");
        assert!(target.is_dir());
    }

    #[test]
    fn test_save_then_load_round_trips_the_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let doc = json!({ "info": { "id": 3411, "river": "Gauley" } });

        let path = save_raw_json(dir.path(), "3411", &doc).expect("save");
        assert!(path.ends_with("3411.json"));

        let loaded = load_raw_json(dir.path(), "3411").expect("load hits");
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_load_missing_reach_is_a_miss_not_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        assert!(load_raw_json(dir.path(), "424242").is_none());
    }

    #[test]
    fn test_load_corrupt_cache_file_is_a_miss() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = raw_json_path(dir.path(), "7");
        fs::write(&path, "{ not json").expect("write corrupt file");
        assert!(load_raw_json(dir.path(), "7").is_none());
    }
}
