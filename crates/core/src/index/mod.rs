//! Offline index of qualified types.
//!
//! A later run can read the persisted names instead of rescanning every location.

mod builder;
mod store;

pub use builder::IndexBuilder;
pub use store::{FsIndexStore, IndexStore, MemoryIndexStore};
