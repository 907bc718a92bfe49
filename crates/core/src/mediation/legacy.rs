use qbind_api::{BeanRef, BoxError, Key, LegacyEntry, LegacyMediator, Mediator, TypeName};
use std::sync::Arc;

/// Presents a legacy mediator through the current [`Mediator`] contract.
///
/// Legacy mediators only see the binding name, never the full key.
pub struct LegacyMediatorAdapter {
    inner: Arc<dyn LegacyMediator>,
}

impl LegacyMediatorAdapter {
    pub fn new(inner: Arc<dyn LegacyMediator>) -> Self {
        Self { inner }
    }
}

impl Mediator for LegacyMediatorAdapter {
    fn add(&self, key: &Key, bean: &BeanRef, watcher_type: &TypeName) -> Result<(), BoxError> {
        self.inner.add(
            LegacyEntry {
                name: key.name(),
                bean,
            },
            watcher_type,
        )
    }

    fn remove(&self, key: &Key, bean: &BeanRef, watcher_type: &TypeName) -> Result<(), BoxError> {
        self.inner.remove(
            LegacyEntry {
                name: key.name(),
                bean,
            },
            watcher_type,
        )
    }
}
