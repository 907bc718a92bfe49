//! Binding-key heuristics shared by provider and bean bindings.

use crate::config::BinderConfig;
use qbind_api::models::names;
use qbind_api::{Key, Qualifier, QualifiedDescriptor, Scope, ScopeHint, TypeName, TypeRef};

/// Derives binding names, export types and scopes from a descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindingKeyResolver {
    config: BinderConfig,
}

impl BindingKeyResolver {
    pub fn new(config: BinderConfig) -> Self {
        Self { config }
    }

    /// Qualifier for the descriptor's bindings.
    ///
    /// A non-empty declared name wins, except the literal `"default"` which means
    /// unqualified. Otherwise types whose simple name starts with `Default` are
    /// unqualified, and everything else is named after its fully-qualified type name.
    pub fn binding_name(&self, descriptor: &QualifiedDescriptor) -> Option<Qualifier> {
        if let Some(name) = descriptor.named.as_deref().filter(|name| !name.is_empty()) {
            return if name == names::DEFAULT_NAME {
                None
            } else {
                Some(Qualifier::named(name))
            };
        }

        if descriptor
            .type_name
            .simple_name()
            .starts_with(names::DEFAULT_PREFIX)
        {
            return None;
        }

        Some(Qualifier::named(descriptor.type_name.as_str()))
    }

    /// Declared export types, or `None` when the type exports nothing explicitly.
    ///
    /// An empty declaration exports the type's declared interfaces.
    pub fn binding_types(&self, descriptor: &QualifiedDescriptor) -> Option<Vec<TypeName>> {
        if !self.config.typed_exports {
            return None;
        }
        descriptor.typed.as_ref().map(|types| {
            if types.is_empty() {
                descriptor
                    .interfaces
                    .iter()
                    .map(|interface| interface.raw.clone())
                    .collect()
            } else {
                types.clone()
            }
        })
    }

    pub fn binding_key(&self, binding_type: TypeRef, qualifier: Option<Qualifier>) -> Key {
        Key::exact(binding_type, qualifier)
    }

    /// Scope of a provided or bean binding.
    pub fn provided_scope(&self, descriptor: &QualifiedDescriptor) -> Scope {
        match descriptor.scope {
            ScopeHint::EagerSingleton => Scope::EagerSingleton,
            ScopeHint::Singleton => Scope::Singleton,
            ScopeHint::Unscoped => Scope::Unscoped,
        }
    }

    /// Key a mediator watches: `watched_type` qualified by `annotation_type`,
    /// or unqualified when the annotation type is the base annotation.
    pub fn watched_key(&self, watched_type: TypeRef, annotation_type: &TypeName) -> Key {
        if annotation_type.as_str() == names::ANY_ANNOTATION {
            Key::exact(watched_type, None)
        } else {
            Key::exact(
                watched_type,
                Some(Qualifier::AnnotationType(annotation_type.clone())),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qbind_api::ComponentKind;

    fn bean(name: &str) -> QualifiedDescriptor {
        QualifiedDescriptor::new(name, ComponentKind::Bean)
    }

    #[test]
    fn test_unnamed_type_is_named_after_itself() {
        let resolver = BindingKeyResolver::default();
        for name in ["com.acme.RedWidget", "com.acme.Widgets", "Plain", "com.acme.Defaults$Impl"] {
            assert_eq!(
                resolver.binding_name(&bean(name)),
                Some(Qualifier::named(name)),
                "{name}"
            );
        }
    }

    #[test]
    fn test_default_sentinel_is_unqualified() {
        let resolver = BindingKeyResolver::default();
        assert_eq!(
            resolver.binding_name(&bean("com.acme.RedWidget").named("default")),
            None
        );
        // case-sensitive
        assert_eq!(
            resolver.binding_name(&bean("com.acme.RedWidget").named("Default")),
            Some(Qualifier::named("Default"))
        );
    }

    #[test]
    fn test_default_prefix_is_unqualified() {
        let resolver = BindingKeyResolver::default();
        assert_eq!(resolver.binding_name(&bean("com.acme.DefaultWidget")), None);
        assert_eq!(
            resolver.binding_name(&bean("com.acme.Outer$DefaultInner")),
            None
        );
        // an explicit name beats the prefix
        assert_eq!(
            resolver.binding_name(&bean("com.acme.DefaultWidget").named("red")),
            Some(Qualifier::named("red"))
        );
    }

    #[test]
    fn test_empty_name_falls_back_to_heuristic() {
        let resolver = BindingKeyResolver::default();
        assert_eq!(
            resolver.binding_name(&bean("com.acme.RedWidget").named("")),
            Some(Qualifier::named("com.acme.RedWidget"))
        );
        assert_eq!(
            resolver.binding_name(&bean("com.acme.DefaultWidget").named("")),
            None
        );
    }

    #[test]
    fn test_binding_types() {
        let resolver = BindingKeyResolver::default();
        let untyped = bean("com.acme.RedWidget");
        assert_eq!(resolver.binding_types(&untyped), None);

        let typed = bean("com.acme.RedWidget").typed(vec![TypeName::new("com.acme.Widget")]);
        assert_eq!(
            resolver.binding_types(&typed),
            Some(vec![TypeName::new("com.acme.Widget")])
        );

        let all_interfaces = bean("com.acme.RedWidget")
            .typed(vec![])
            .with_interfaces(vec![
                TypeRef::raw("com.acme.Widget"),
                TypeRef::parse("java.lang.Comparable<com.acme.Widget>").unwrap(),
            ]);
        assert_eq!(
            resolver.binding_types(&all_interfaces),
            Some(vec![
                TypeName::new("com.acme.Widget"),
                TypeName::new("java.lang.Comparable")
            ])
        );
    }

    #[test]
    fn test_typed_exports_can_be_disabled() {
        let resolver = BindingKeyResolver::new(BinderConfig {
            typed_exports: false,
        });
        let typed = bean("com.acme.RedWidget").typed(vec![TypeName::new("com.acme.Widget")]);
        assert_eq!(resolver.binding_types(&typed), None);
    }

    #[test]
    fn test_watched_key() {
        let resolver = BindingKeyResolver::default();
        let widget = TypeRef::raw("com.acme.Widget");

        let any = resolver.watched_key(widget.clone(), &TypeName::new(names::ANY_ANNOTATION));
        assert_eq!(any.qualifier, None);

        let named = resolver.watched_key(widget, &TypeName::new(names::NAMED));
        assert_eq!(
            named.qualifier,
            Some(Qualifier::AnnotationType(TypeName::new(names::NAMED)))
        );
    }
}
