use crate::error::BoxError;
use crate::models::{Key, TypeName};
use std::any::Any;
use std::sync::Arc;

/// A bound instance as seen by watchers.
pub type BeanRef = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub enum RegistryEvent {
    Added { key: Key, bean: BeanRef },
    Removed { key: Key, bean: BeanRef },
}

impl RegistryEvent {
    pub fn key(&self) -> &Key {
        match self {
            RegistryEvent::Added { key, .. } | RegistryEvent::Removed { key, .. } => key,
        }
    }

    pub fn bean(&self) -> &BeanRef {
        match self {
            RegistryEvent::Added { bean, .. } | RegistryEvent::Removed { bean, .. } => bean,
        }
    }

    pub fn is_added(&self) -> bool {
        matches!(self, RegistryEvent::Added { .. })
    }
}

impl std::fmt::Debug for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = if self.is_added() { "Added" } else { "Removed" };
        write!(f, "{label}({})", self.key())
    }
}

/// Receives every registry change, in the order the registry produced them.
pub trait RegistryListener: Send + Sync {
    fn on_event(&self, event: &RegistryEvent);
}

/// Mediates bindings matching a watched key into watchers of a given type.
pub trait Mediator: Send + Sync {
    fn add(&self, key: &Key, bean: &BeanRef, watcher_type: &TypeName) -> Result<(), BoxError>;

    fn remove(&self, key: &Key, bean: &BeanRef, watcher_type: &TypeName) -> Result<(), BoxError>;
}

/// Entry handed to legacy mediators: the binding name instead of the full key.
#[derive(Clone, Copy)]
pub struct LegacyEntry<'a> {
    pub name: Option<&'a str>,
    pub bean: &'a BeanRef,
}

/// Older mediator contract. Adapted to [`Mediator`] before registration.
pub trait LegacyMediator: Send + Sync {
    fn add(&self, entry: LegacyEntry<'_>, watcher_type: &TypeName) -> Result<(), BoxError>;

    fn remove(&self, entry: LegacyEntry<'_>, watcher_type: &TypeName) -> Result<(), BoxError>;
}
