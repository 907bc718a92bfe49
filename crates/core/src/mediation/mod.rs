//! Mediator registration and event delivery.

mod dispatcher;
mod legacy;

pub use dispatcher::{MediationDispatcher, MediationEntry};
pub use legacy::LegacyMediatorAdapter;
