use crate::binder::SourceTag;
use crate::error::BoxError;
use crate::models::QualifiedDescriptor;
use std::time::Duration;

/// Push-style consumer of a scan pass.
pub trait QualifiedTypeListener {
    /// Called once per discovered type. `None` means the root source.
    fn observe(&mut self, descriptor: &QualifiedDescriptor, source: Option<&SourceTag>);

    /// Called exactly once, after the last `observe` of the pass.
    fn finish(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Walks a component space and reports qualified types to a listener.
pub trait ComponentScanner {
    fn scan(&self, listener: &mut dyn QualifiedTypeListener) -> Result<ScanResult, BoxError>;
}

/// Result of a scan pass
#[derive(Debug, Default, Clone)]
pub struct ScanResult {
    /// Number of locations visited
    pub locations: usize,
    /// Number of locations skipped (missing or unreadable)
    pub skipped_locations: usize,
    /// Number of manifests that failed to parse
    pub failed_manifests: usize,
    /// Number of descriptors reported to the listener
    pub descriptors: usize,
    /// Time taken for the scan
    pub duration: Duration,
}
