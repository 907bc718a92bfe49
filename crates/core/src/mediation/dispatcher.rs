use qbind_api::{
    Binder, BoxError, Key, KeyType, Mediator, RegistryEvent, RegistryListener, TypeName, TypeRef,
};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tracing::{debug, warn};

/// A mediator together with the key it watches.
pub struct MediationEntry {
    pub watched: Key,
    pub mediator: Arc<dyn Mediator>,
    pub watcher_type: TypeName,
}

impl MediationEntry {
    /// Whether a binding under `key` is visible to this entry's watchers.
    ///
    /// An unqualified watched key matches any qualifier.
    pub fn matches(&self, key: &Key) -> bool {
        let type_matches = match &self.watched.ty {
            KeyType::Exact(ty) => key.exposes(ty),
            KeyType::Wildcard { of, .. } => key.exposes(&TypeRef::raw(of.clone())),
        };
        if !type_matches {
            return false;
        }
        match &self.watched.qualifier {
            None => true,
            Some(qualifier) => qualifier.accepts(key.qualifier.as_ref()),
        }
    }
}

/// Fans registry events out to every registered mediator.
///
/// Subscribes to the registry at most once, on the first registration.
#[derive(Default)]
pub struct MediationDispatcher {
    entries: RwLock<Vec<Arc<MediationEntry>>>,
    subscribed: AtomicBool,
    failures: AtomicUsize,
    reporter: Option<Weak<dyn Binder>>,
}

impl MediationDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that also reports failed mediator calls through
    /// [`Binder::add_error`]. Holds the binder weakly, since the registry in
    /// turn holds this dispatcher as a listener.
    pub fn reporting_to(binder: &Arc<dyn Binder>) -> Self {
        Self {
            reporter: Some(Arc::downgrade(binder)),
            ..Self::default()
        }
    }

    /// Registers a mediator, subscribing this dispatcher to `registry` if it
    /// has not done so already.
    pub fn mediate(
        self: &Arc<Self>,
        registry: &dyn Binder,
        watched: Key,
        mediator: Arc<dyn Mediator>,
        watcher_type: TypeName,
    ) {
        debug!("Mediating {} for watchers of {}", watched, watcher_type);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(MediationEntry {
                watched,
                mediator,
                watcher_type,
            }));

        if !self.subscribed.swap(true, Ordering::AcqRel) {
            registry.subscribe(Arc::clone(self) as Arc<dyn RegistryListener>);
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::Acquire)
    }

    /// Snapshot of the registered entries, in registration order.
    pub fn entries(&self) -> Vec<Arc<MediationEntry>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of mediator calls that returned an error or panicked.
    pub fn failed_deliveries(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    fn deliver(&self, entry: &MediationEntry, event: &RegistryEvent) {
        let call = || -> Result<(), BoxError> {
            match event {
                RegistryEvent::Added { key, bean } => {
                    entry.mediator.add(key, bean, &entry.watcher_type)
                }
                RegistryEvent::Removed { key, bean } => {
                    entry.mediator.remove(key, bean, &entry.watcher_type)
                }
            }
        };

        let failure = match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err.to_string(),
            Err(_) => "mediator panicked".to_string(),
        };
        self.failures.fetch_add(1, Ordering::Relaxed);
        warn!(
            "Mediator for {} failed on {:?}: {}",
            entry.watcher_type, event, failure
        );
        if let Some(reporter) = self.reporter.as_ref().and_then(Weak::upgrade) {
            reporter.add_error(format!(
                "Mediator for {} failed on {}: {}",
                entry.watcher_type,
                event.key(),
                failure
            ));
        }
    }
}

impl RegistryListener for MediationDispatcher {
    fn on_event(&self, event: &RegistryEvent) {
        // Deliver outside the lock so mediators may register further mediators.
        for entry in self.entries() {
            if entry.matches(event.key()) {
                self.deliver(&entry, event);
            }
        }
    }
}
