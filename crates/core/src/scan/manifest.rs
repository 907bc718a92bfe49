//! Manifest-driven component scanner.
//!
//! Each location is a `*.qualified.json` file or a directory searched for them.
//! A manifest is a JSON array of records:
//!
//! ```json
//! [
//!   { "type": "com.acme.RedWidget", "named": "red", "interfaces": ["com.acme.Widget"] },
//!   { "type": "com.acme.WidgetProvider", "interfaces": ["javax.inject.Provider<com.acme.Widget>"] }
//! ]
//! ```

use qbind_api::{
    BoxError, ComponentKind, ComponentScanner, Constructor, QualifiedDescriptor,
    QualifiedTypeListener, ScanResult, ScopeHint, SourceTag, TypeName, TypeRef,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const MANIFEST_SUFFIX: &str = ".qualified.json";

/// One discovered type as written in a manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestRecord {
    #[serde(rename = "type")]
    pub type_name: TypeName,
    /// Overrides the kind classified from `interfaces`.
    #[serde(default)]
    pub kind: Option<ComponentKind>,
    #[serde(default)]
    pub named: Option<String>,
    #[serde(default)]
    pub typed: Option<Vec<TypeName>>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub scope: ScopeHint,
    /// Overrides the arguments taken from the classifying capability.
    #[serde(default)]
    pub type_arguments: Option<Vec<TypeRef>>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
}

impl ManifestRecord {
    pub fn into_descriptor(self) -> QualifiedDescriptor {
        let mut descriptor = QualifiedDescriptor::from_interfaces(self.type_name, self.interfaces)
            .with_scope(self.scope);
        if let Some(kind) = self.kind {
            descriptor.kind = kind;
        }
        if let Some(args) = self.type_arguments {
            descriptor = descriptor.with_type_arguments(args);
        }
        if let Some(name) = self.named {
            descriptor = descriptor.named(name);
        }
        if let Some(types) = self.typed {
            descriptor = descriptor.typed(types);
        }
        if self.is_abstract {
            descriptor = descriptor.non_concrete();
        }
        descriptor
    }
}

/// Scans manifest files and reports their records in location order.
#[derive(Default)]
pub struct ManifestScanner {
    locations: Vec<PathBuf>,
    constructors: HashMap<TypeName, Constructor>,
}

impl ManifestScanner {
    pub fn new(locations: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            locations: locations.into_iter().map(Into::into).collect(),
            constructors: HashMap::new(),
        }
    }

    /// Supplies the no-argument constructor for a type named in the manifests.
    pub fn with_constructor(mut self, type_name: impl Into<TypeName>, constructor: Constructor) -> Self {
        self.constructors.insert(type_name.into(), constructor);
        self
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    fn manifests(location: &Path) -> Vec<PathBuf> {
        if location.is_file() {
            return vec![location.to_path_buf()];
        }

        WalkDir::new(location)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Skipping unreadable entry under {:?}: {}", location, e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(MANIFEST_SUFFIX))
            })
            .map(|entry| entry.into_path())
            .collect()
    }

    fn read_manifest(path: &Path) -> crate::Result<Vec<ManifestRecord>> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl ComponentScanner for ManifestScanner {
    fn scan(&self, listener: &mut dyn QualifiedTypeListener) -> Result<ScanResult, BoxError> {
        let mut result = ScanResult::default();
        let start = Instant::now();

        for location in &self.locations {
            if !location.exists() {
                warn!("Skipping missing location {:?}", location);
                result.skipped_locations += 1;
                continue;
            }
            result.locations += 1;
            let source = SourceTag::new(location.display().to_string());

            for manifest in Self::manifests(location) {
                let records = match Self::read_manifest(&manifest) {
                    Ok(records) => records,
                    Err(e) => {
                        warn!("Skipping malformed manifest {:?}: {}", manifest, e);
                        result.failed_manifests += 1;
                        continue;
                    }
                };
                debug!("Read {} records from {:?}", records.len(), manifest);

                for record in records {
                    let mut descriptor = record.into_descriptor();
                    descriptor.constructor = self.constructors.get(&descriptor.type_name).map(Arc::clone);
                    listener.observe(&descriptor, Some(&source));
                    result.descriptors += 1;
                }
            }
        }

        listener.finish()?;

        result.duration = start.elapsed();
        info!(
            "Manifest scan complete: {} locations, {} skipped, {} descriptors in {:?}",
            result.locations, result.skipped_locations, result.descriptors, result.duration
        );
        Ok(result)
    }
}
