//! Concrete component scanners.

mod manifest;

pub use manifest::{MANIFEST_SUFFIX, ManifestRecord, ManifestScanner};
