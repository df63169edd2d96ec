//! Registry refresh driver.
//!
//! Loads the monitored reach registry, fetches (or reads cached) detail
//! documents, normalizes each into a reach entity, and prints a stage
//! summary. Run with a warm cache to work fully offline.

use std::error::Error;
use std::path::Path;

use reachmon_service::ingest::aw;
use reachmon_service::logging::{self, DataSource, LogLevel};
use reachmon_service::reach::Reach;
use reachmon_service::{cache, reaches};

const REGISTRY_PATH: &str = "./reaches.toml";
const DATA_DIR: &str = "./data";

fn main() -> Result<(), Box<dyn Error>> {
    logging::init_logger(LogLevel::Info, Some("./reachmon.log"), false);

    let registry = reaches::load_reaches(Path::new(REGISTRY_PATH))?;
    let data_dir = cache::build_data_resources(Path::new(DATA_DIR))?;
    let raw_dir = data_dir.join("raw");

    let client = aw::build_client()?;

    println!("🛶 Refreshing {} monitored reaches...", registry.len());

    let mut successful = 0;
    let mut failed = 0;

    for entry in &registry {
        print!("  {} ({}) ... ", entry.name, entry.reach_id);

        // Cached document wins; the upstream is only hit on a miss.
        let doc = match cache::load_raw_json(&raw_dir, &entry.reach_id) {
            Some(doc) => doc,
            None => match aw::fetch_reach_json(&client, &entry.reach_id) {
                Ok(doc) => {
                    if let Err(e) = cache::save_raw_json(&raw_dir, &entry.reach_id, &doc) {
                        logging::warn(
                            DataSource::Cache,
                            Some(&entry.reach_id),
                            &format!("could not cache document: {}", e),
                        );
                    }
                    doc
                }
                Err(e) => {
                    println!("✗ FAILED");
                    logging::log_fetch_failure(&entry.reach_id, "detail fetch", &e);
                    failed += 1;
                    continue;
                }
            },
        };

        let reach = Reach::from_normalized(&doc);

        let stage = reach
            .gauge_stage()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let observation = reach
            .gauge_observation()
            .map(|v| format!("{} {}", v, reach.gauge_units.as_deref().unwrap_or("")))
            .unwrap_or_else(|| "-".to_string());

        if reach.error {
            println!("⚠ {} ({}) [data issues]", stage, observation.trim_end());
            if let Some(notes) = &reach.notes {
                logging::warn(DataSource::System, Some(&entry.reach_id), notes);
            }
        } else {
            println!("✓ {} ({})", stage, observation.trim_end());
        }
        successful += 1;
    }

    logging::log_refresh_summary(registry.len(), successful, failed);
    println!(
        "\nDone: {}/{} reaches refreshed, {} failed",
        successful,
        registry.len(),
        failed
    );

    Ok(())
}
