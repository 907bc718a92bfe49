use qbind_api::{Binder, ComponentScanner, ScanResult};
use qbind_core::binding::{BindStats, QualifiedTypeBinder};
use qbind_core::config::{BinderConfig, IndexConfig};
use qbind_core::index::IndexBuilder;
use qbind_core::scan::ManifestScanner;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> Option<impl Drop> {
    Some(qbind_core::logging::init_logging(component, to_stderr))
}

/// Runs one binding pass of `scanner` into `registry`.
///
/// Binding problems are reported to the registry; only scanner failures are errors here.
pub fn bind_components(
    scanner: &dyn ComponentScanner,
    registry: Arc<dyn Binder>,
    config: BinderConfig,
) -> qbind_core::Result<(ScanResult, BindStats)> {
    let mut binder = QualifiedTypeBinder::with_config(registry, config);
    let result = scanner.scan(&mut binder)?;
    Ok((result, binder.stats().clone()))
}

/// Scans manifest locations and merges the discovered names into the index
/// under `config.target_dir`.
pub fn index_components(
    locations: Vec<PathBuf>,
    config: &IndexConfig,
) -> qbind_core::Result<ScanResult> {
    info!(
        "Indexing {} locations into {}",
        locations.len(),
        config.target_dir.display()
    );
    let scanner = ManifestScanner::new(locations);
    IndexBuilder::from_config(config).index(&scanner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbind_core::registry::InMemoryRegistry;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_bind_components_reports_stats() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("beans.qualified.json"),
            r#"[{"type": "com.acme.RedWidget"}, {"type": "com.acme.BadProvider", "kind": "provider"}]"#,
        )
        .unwrap();

        let registry = InMemoryRegistry::new();
        let scanner = ManifestScanner::new([dir.path()]);
        let (result, stats) =
            bind_components(&scanner, Arc::new(registry.clone()), BinderConfig::default()).unwrap();

        assert_eq!(result.descriptors, 2);
        assert_eq!(stats.beans, 1);
        assert_eq!(stats.errors, 1);
        assert_eq!(registry.errors().len(), 1);
    }

    #[test]
    fn test_index_components_skips_missing_locations() {
        let out = tempdir().unwrap();
        let input = tempdir().unwrap();
        fs::write(
            input.path().join("a.qualified.json"),
            r#"[{"type": "com.acme.Foo"}]"#,
        )
        .unwrap();

        let result = index_components(
            vec![input.path().to_path_buf(), out.path().join("nowhere")],
            &IndexConfig::new(out.path()),
        )
        .unwrap();

        assert_eq!(result.skipped_locations, 1);
        assert_eq!(
            fs::read_to_string(out.path().join("META-INF/sisu/javax.inject.Named")).unwrap(),
            "com.acme.Foo\n"
        );
    }
}
