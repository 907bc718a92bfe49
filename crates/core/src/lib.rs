pub mod binding;
pub mod config;
pub mod error;
pub mod index;
pub mod logging;
pub mod mediation;
pub mod registry;
pub mod scan;

pub use error::Result;
