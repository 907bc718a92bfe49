//! Qualified-type binding.
//!
//! Turns each discovered [`QualifiedDescriptor`](qbind_api::QualifiedDescriptor) into
//! registry instructions:
//!
//! ```text
//! scanner ──observe──▶ QualifiedTypeBinder ──┬──▶ Binder (bind_key / bind_alias / install)
//!                            │               └──▶ MediationDispatcher (mediators)
//!                            ▼
//!                    BindingKeyResolver (names, export types, scopes)
//! ```

pub mod binder;
pub mod error;
pub mod naming;

pub use binder::{BindStats, QualifiedTypeBinder};
pub use error::BindingError;
pub use naming::BindingKeyResolver;
