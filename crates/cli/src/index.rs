use qbind_core::config::IndexConfig;
use std::path::PathBuf;
use tracing::{info, warn};

pub fn run(locations: Vec<PathBuf>, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config = IndexConfig::from_env(super::current_dir_or(output));
    if locations.is_empty() {
        warn!("No locations given, nothing to index");
    }

    let result = qbind_runtime::index_components(locations, &config)?;

    info!("Indexing complete!");
    info!("Locations: {} ({} skipped)", result.locations, result.skipped_locations);
    info!("Types: {}", result.descriptors);
    if result.failed_manifests > 0 {
        warn!("{} manifests could not be read", result.failed_manifests);
    }

    Ok(())
}
