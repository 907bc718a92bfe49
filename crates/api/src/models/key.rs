use super::names;
use super::types::{TypeName, TypeRef};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Qualifier part of a binding key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Qualifier {
    /// `@Named("value")`
    Named(String),
    /// Any qualifier of the given annotation type, regardless of its value.
    AnnotationType(TypeName),
}

impl Qualifier {
    pub fn named(name: impl Into<String>) -> Self {
        Qualifier::Named(name.into())
    }

    pub fn annotation_type(&self) -> &str {
        match self {
            Qualifier::Named(_) => names::NAMED,
            Qualifier::AnnotationType(ty) => ty.as_str(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Qualifier::Named(name) => Some(name),
            Qualifier::AnnotationType(_) => None,
        }
    }

    /// Whether a binding carrying `bound` satisfies this qualifier when used as a filter.
    pub fn accepts(&self, bound: Option<&Qualifier>) -> bool {
        match (self, bound) {
            (Qualifier::Named(wanted), Some(Qualifier::Named(actual))) => wanted == actual,
            (Qualifier::AnnotationType(wanted), Some(actual)) => {
                actual.annotation_type() == wanted.as_str()
            }
            _ => false,
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Named(name) => write!(f, "@{}(value={name})", names::NAMED),
            Qualifier::AnnotationType(ty) => write!(f, "@{ty}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyType {
    Exact(TypeRef),
    /// Matches the bound type itself or any capability it declares.
    Wildcard {
        of: TypeName,
        capabilities: Vec<TypeRef>,
    },
}

/// Binding key: declared type plus optional qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub ty: KeyType,
    pub qualifier: Option<Qualifier>,
}

impl Key {
    /// Unqualified key for a raw type.
    pub fn of(raw: impl Into<TypeName>) -> Self {
        Self::exact(TypeRef::raw(raw), None)
    }

    pub fn exact(ty: TypeRef, qualifier: Option<Qualifier>) -> Self {
        Self {
            ty: KeyType::Exact(ty),
            qualifier,
        }
    }

    pub fn wildcard(of: TypeName, capabilities: Vec<TypeRef>, qualifier: Option<Qualifier>) -> Self {
        Self {
            ty: KeyType::Wildcard { of, capabilities },
            qualifier,
        }
    }

    /// Same qualifier, different declared type.
    pub fn of_type(&self, ty: impl Into<TypeRef>) -> Self {
        Self::exact(ty.into(), self.qualifier.clone())
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.ty, KeyType::Wildcard { .. })
    }

    /// The primary declared type (the implementation type for wildcard keys).
    pub fn type_name(&self) -> &TypeName {
        match &self.ty {
            KeyType::Exact(ty) => &ty.raw,
            KeyType::Wildcard { of, .. } => of,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.qualifier.as_ref().and_then(Qualifier::name)
    }

    /// Whether a lookup for `ty` can be satisfied by a binding under this key.
    pub fn exposes(&self, ty: &TypeRef) -> bool {
        match &self.ty {
            KeyType::Exact(own) => own == ty,
            KeyType::Wildcard { of, capabilities } => {
                (ty.args.is_empty() && &ty.raw == of) || capabilities.contains(ty)
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            KeyType::Exact(ty) => write!(f, "Key[type={ty}")?,
            KeyType::Wildcard { of, .. } => write!(f, "WildcardKey[type={of}")?,
        }
        match &self.qualifier {
            Some(qualifier) => write!(f, ", qualifier={qualifier}]"),
            None => f.write_str("]"),
        }
    }
}

/// Scope applied by the registry to a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Unscoped,
    Singleton,
    /// Instantiated as soon as the registry is built.
    EagerSingleton,
}

/// Scope declared by the discovered type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeHint {
    #[default]
    #[serde(alias = "none")]
    Unscoped,
    Singleton,
    EagerSingleton,
}
