use super::key::ScopeHint;
use super::names;
use super::types::{TypeName, TypeRef};
use crate::binder::Module;
use crate::error::BoxError;
use crate::mediation::{BeanRef, LegacyMediator, Mediator};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a discovered component is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    Module,
    Mediator,
    LegacyMediator,
    Provider,
    Bean,
}

impl ComponentKind {
    /// Classifies a type from its declared capabilities.
    ///
    /// The first match wins, in this order: module, mediator, legacy mediator, provider.
    /// Anything else is a plain qualified bean.
    pub fn classify(capabilities: &[TypeRef]) -> Self {
        let declares = |name: &str| capabilities.iter().any(|c| c.is_raw(name));
        if declares(names::MODULE) {
            ComponentKind::Module
        } else if declares(names::MEDIATOR) {
            ComponentKind::Mediator
        } else if declares(names::LEGACY_MEDIATOR) {
            ComponentKind::LegacyMediator
        } else if declares(names::PROVIDER) {
            ComponentKind::Provider
        } else {
            ComponentKind::Bean
        }
    }

    /// The generic capability whose arguments configure this kind, if any.
    pub fn capability(&self) -> Option<&'static str> {
        match self {
            ComponentKind::Mediator => Some(names::MEDIATOR),
            ComponentKind::LegacyMediator => Some(names::LEGACY_MEDIATOR),
            ComponentKind::Provider => Some(names::PROVIDER),
            ComponentKind::Module | ComponentKind::Bean => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ComponentKind::Module => "module",
            ComponentKind::Mediator => "mediator",
            ComponentKind::LegacyMediator => "legacy-mediator",
            ComponentKind::Provider => "provider",
            ComponentKind::Bean => "bean",
        };
        f.write_str(label)
    }
}

/// A freshly constructed component.
pub enum Instance {
    Module(Box<dyn Module>),
    Mediator(Arc<dyn Mediator>),
    LegacyMediator(Arc<dyn LegacyMediator>),
    Bean(BeanRef),
}

impl Instance {
    pub fn variant(&self) -> &'static str {
        match self {
            Instance::Module(_) => "module",
            Instance::Mediator(_) => "mediator",
            Instance::LegacyMediator(_) => "legacy-mediator",
            Instance::Bean(_) => "bean",
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Instance::{}", self.variant())
    }
}

/// No-argument constructor for a discovered type.
pub type Constructor = Arc<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

/// A discovered concrete type tagged for automatic registration.
#[derive(Clone)]
pub struct QualifiedDescriptor {
    pub type_name: TypeName,
    pub kind: ComponentKind,
    pub concrete: bool,
    /// Value of the declared `@Named` qualifier, if any.
    pub named: Option<String>,
    /// Declared export types. `Some(vec![])` exports the declared interfaces.
    pub typed: Option<Vec<TypeName>>,
    /// The type's declared capability signature.
    pub interfaces: Vec<TypeRef>,
    pub scope: ScopeHint,
    /// Resolved arguments of the capability that determines `kind`.
    pub type_arguments: Vec<TypeRef>,
    pub constructor: Option<Constructor>,
}

impl QualifiedDescriptor {
    pub fn new(type_name: impl Into<TypeName>, kind: ComponentKind) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            concrete: true,
            named: None,
            typed: None,
            interfaces: Vec::new(),
            scope: ScopeHint::Unscoped,
            type_arguments: Vec::new(),
            constructor: None,
        }
    }

    /// Builds a descriptor whose kind and type arguments are derived from its interfaces.
    pub fn from_interfaces(type_name: impl Into<TypeName>, interfaces: Vec<TypeRef>) -> Self {
        let kind = ComponentKind::classify(&interfaces);
        let type_arguments = kind
            .capability()
            .and_then(|cap| interfaces.iter().find(|i| i.is_raw(cap)))
            .map(|cap| cap.args.clone())
            .unwrap_or_default();

        Self {
            interfaces,
            type_arguments,
            ..Self::new(type_name, kind)
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.named = Some(name.into());
        self
    }

    pub fn typed(mut self, types: Vec<TypeName>) -> Self {
        self.typed = Some(types);
        self
    }

    pub fn with_interfaces(mut self, interfaces: Vec<TypeRef>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn with_scope(mut self, scope: ScopeHint) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_type_arguments(mut self, args: Vec<TypeRef>) -> Self {
        self.type_arguments = args;
        self
    }

    pub fn with_constructor<F>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    pub fn non_concrete(mut self) -> Self {
        self.concrete = false;
        self
    }
}

impl fmt::Debug for QualifiedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QualifiedDescriptor")
            .field("type_name", &self.type_name)
            .field("kind", &self.kind)
            .field("concrete", &self.concrete)
            .field("named", &self.named)
            .field("typed", &self.typed)
            .field("interfaces", &self.interfaces)
            .field("scope", &self.scope)
            .field("type_arguments", &self.type_arguments)
            .field("constructor", &self.constructor.is_some())
            .finish()
    }
}
