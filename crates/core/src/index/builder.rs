use super::store::{FsIndexStore, IndexStore};
use crate::config::{self, IndexConfig};
use crate::error::Result;
use indexmap::{IndexMap, IndexSet};
use qbind_api::models::names;
use qbind_api::{
    BoxError, ComponentScanner, QualifiedDescriptor, QualifiedTypeListener, ScanResult, SourceTag,
};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Accumulates qualified-type names per category and merges them into the
/// persisted index.
///
/// Flushing never drops entries already on disk, so repeated passes over
/// overlapping inputs converge on the same sorted union.
pub struct IndexBuilder<S: IndexStore = FsIndexStore> {
    store: S,
    namespace: String,
    pending: IndexMap<String, IndexSet<String>>,
}

impl IndexBuilder<FsIndexStore> {
    pub fn from_config(config: &IndexConfig) -> Self {
        Self::new(FsIndexStore::new(&config.target_dir), config.namespace.clone())
    }
}

impl<S: IndexStore> IndexBuilder<S> {
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            pending: IndexMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn add_entry(&mut self, category: &str, name: &str) {
        self.pending
            .entry(category.to_string())
            .or_default()
            .insert(name.to_string());
    }

    /// Number of entries waiting to be flushed.
    pub fn pending(&self) -> usize {
        self.pending.values().map(IndexSet::len).sum()
    }

    /// Merges every pending category into the store.
    ///
    /// Returns the number of category files written. Pending entries are
    /// only dropped once their category has been written.
    pub fn flush(&mut self) -> Result<usize> {
        let mut written = 0;
        while let Some((category, entries)) = self.pending.first() {
            self.write_category(category, entries)?;
            self.pending.shift_remove_index(0);
            written += 1;
        }
        Ok(written)
    }

    /// Reads the stored entries of a category, ignoring blank lines.
    pub fn read_category(&self, category: &str) -> Result<Vec<String>> {
        let path = config::index_path(&self.namespace, category);
        Ok(self
            .store
            .read(&path)?
            .map(|contents| parse_entries(&contents))
            .unwrap_or_default())
    }

    /// Runs a scan pass with this builder as the listener, flushing anything
    /// the scanner left pending, even when the scan itself failed.
    pub fn index(&mut self, scanner: &dyn ComponentScanner) -> Result<ScanResult> {
        let scanned = scanner.scan(self);
        self.flush()?;
        Ok(scanned?)
    }

    fn write_category(&self, category: &str, entries: &IndexSet<String>) -> Result<()> {
        let path = config::index_path(&self.namespace, category);
        let existing = self.store.read(&path)?;
        if existing.is_some() {
            info!("Updating index {}", path);
        } else {
            info!("Creating index {}", path);
        }

        let merged: BTreeSet<String> = existing
            .as_deref()
            .map(parse_entries)
            .unwrap_or_default()
            .into_iter()
            .chain(entries.iter().cloned())
            .collect();

        let mut contents = String::new();
        for name in &merged {
            contents.push_str(name);
            contents.push('\n');
        }
        debug!("Writing {} entries to {}", merged.len(), path);
        self.store.write(&path, &contents)
    }
}

fn parse_entries(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

impl<S: IndexStore> QualifiedTypeListener for IndexBuilder<S> {
    fn observe(&mut self, descriptor: &QualifiedDescriptor, _source: Option<&SourceTag>) {
        if !descriptor.concrete {
            return;
        }
        self.add_entry(names::NAMED, descriptor.type_name.as_str());
    }

    fn finish(&mut self) -> std::result::Result<(), BoxError> {
        self.flush()?;
        Ok(())
    }
}
