use qbind_core::config::IndexConfig;
use qbind_core::index::IndexBuilder;
use std::path::PathBuf;
use tracing::info;

pub fn run(dir: Option<PathBuf>, category: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = IndexConfig::from_env(super::current_dir_or(dir));
    let entries = IndexBuilder::from_config(&config).read_category(category)?;

    if entries.is_empty() {
        info!(
            "No entries in {}",
            config.target_dir.join(config.index_path(category)).display()
        );
        return Ok(());
    }

    for entry in entries {
        println!("{entry}");
    }
    Ok(())
}
