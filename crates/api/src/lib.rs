pub mod binder;
pub mod error;
pub mod mediation;
pub mod models;
pub mod scan;

// Re-export commonly used types
pub use binder::{Binder, BindingInstruction, Module, SourceTag, Target};
pub use error::{ApiError, ApiResult, BoxError};
pub use mediation::{BeanRef, LegacyEntry, LegacyMediator, Mediator, RegistryEvent, RegistryListener};
pub use models::*;
pub use scan::{ComponentScanner, QualifiedTypeListener, ScanResult};
