//! In-memory implementation of [`Binder`].
//!
//! Records binding instructions instead of constructing anything, which makes it
//! the registry of choice for dry runs and tests. Bindings made under a hidden
//! [`SourceTag`] are recorded but skipped by [`InMemoryRegistry::lookup`] and
//! [`InMemoryRegistry::publish`].

use qbind_api::{
    Binder, BindingInstruction, Key, Module, RegistryEvent, RegistryListener, Scope, SourceTag,
    Target, TypeRef,
};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// A binding error together with the source it was reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportedError {
    pub message: String,
    pub source: Option<SourceTag>,
}

#[derive(Default)]
struct RegistryState {
    bindings: RwLock<Vec<BindingInstruction>>,
    errors: RwLock<Vec<ReportedError>>,
    listeners: RwLock<Vec<Arc<dyn RegistryListener>>>,
}

/// Thread-safe recording registry.
///
/// Source views created by [`Binder::with_source`] share the same state.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    state: Arc<RegistryState>,
    source: Option<SourceTag>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded bindings, in the order they were made.
    pub fn bindings(&self) -> Vec<BindingInstruction> {
        self.state
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn errors(&self) -> Vec<ReportedError> {
        self.state
            .errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn listener_count(&self) -> usize {
        self.state
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Visible bindings whose key can satisfy a lookup for `ty`.
    pub fn lookup(&self, ty: &TypeRef) -> Vec<BindingInstruction> {
        self.state
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|binding| !is_hidden(binding) && binding.key.exposes(ty))
            .cloned()
            .collect()
    }

    /// Whether `key` was only ever bound under hidden sources.
    pub fn is_hidden_key(&self, key: &Key) -> bool {
        let bindings = self
            .state
            .bindings
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut bound = bindings.iter().filter(|binding| binding.key == *key).peekable();
        bound.peek().is_some() && bound.all(is_hidden)
    }

    /// Delivers a registry change to every subscriber, in subscription order.
    ///
    /// Changes to keys bound under a hidden source are not delivered.
    pub fn publish(&self, event: RegistryEvent) {
        if self.is_hidden_key(event.key()) {
            debug!("Withholding {:?} bound under a hidden source", event);
            return;
        }
        let listeners = self
            .state
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        debug!("Publishing {:?} to {} listeners", event, listeners.len());
        for listener in listeners {
            listener.on_event(&event);
        }
    }

    pub fn source(&self) -> Option<&SourceTag> {
        self.source.as_ref()
    }
}

fn is_hidden(binding: &BindingInstruction) -> bool {
    binding.source.as_ref().is_some_and(SourceTag::is_hidden)
}

impl Binder for InMemoryRegistry {
    fn with_source(&self, source: SourceTag) -> Arc<dyn Binder> {
        Arc::new(Self {
            state: Arc::clone(&self.state),
            source: Some(source),
        })
    }

    fn bind_key(&self, key: Key, target: Target, scope: Scope) {
        self.state
            .bindings
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(BindingInstruction {
                key,
                target,
                scope,
                source: self.source.clone(),
            });
    }

    fn install(&self, module: Box<dyn Module>) {
        module.configure(self);
    }

    fn add_error(&self, message: String) {
        self.state
            .errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ReportedError {
                message,
                source: self.source.clone(),
            });
    }

    fn subscribe(&self, listener: Arc<dyn RegistryListener>) {
        self.state
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }
}
