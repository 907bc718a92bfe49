use crate::mediation::RegistryListener;
use crate::models::{Key, Scope, TypeName};
use std::fmt;
use std::sync::Arc;

/// Identifies where a binding came from, for diagnostics.
///
/// Bindings made under a hidden source are recorded but never offered to
/// lookups or watchers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceTag {
    tag: Arc<str>,
    hidden: bool,
}

impl SourceTag {
    pub fn new(tag: impl AsRef<str>) -> Self {
        Self {
            tag: Arc::from(tag.as_ref()),
            hidden: false,
        }
    }

    pub fn hidden(tag: impl AsRef<str>) -> Self {
        Self {
            hidden: true,
            ..Self::new(tag)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.tag
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

/// What a binding key resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Construct the key's own type.
    Constructor,
    /// Delegate to the given provider type.
    Provider(TypeName),
    /// Resolve through another key.
    Linked(Key),
}

/// A single binding emitted towards the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInstruction {
    pub key: Key,
    pub target: Target,
    pub scope: Scope,
    pub source: Option<SourceTag>,
}

/// Write side of the external binding registry.
///
/// The registry owns instance construction and scope enforcement; the binder
/// only describes what should be bound.
pub trait Binder: Send + Sync {
    /// A view of this registry that attributes every binding to `source`.
    fn with_source(&self, source: SourceTag) -> Arc<dyn Binder>;

    fn bind_key(&self, key: Key, target: Target, scope: Scope);

    fn bind_alias(&self, key: Key, to: Key) {
        self.bind_key(key, Target::Linked(to), Scope::Unscoped);
    }

    fn install(&self, module: Box<dyn Module>);

    /// Records a non-fatal binding error.
    fn add_error(&self, message: String);

    /// Subscribes to the registry's add/remove feed.
    fn subscribe(&self, listener: Arc<dyn RegistryListener>);
}

/// A composed unit of further bindings.
pub trait Module: Send + Sync {
    fn configure(&self, binder: &dyn Binder);
}
