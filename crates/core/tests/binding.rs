//! Binding scenarios driven through the in-memory registry

use qbind_api::models::names;
use qbind_api::{
    BeanRef, Binder, BoxError, ComponentKind, Instance, Key, KeyType, LegacyEntry, LegacyMediator,
    Mediator, Module, QualifiedDescriptor, QualifiedTypeListener, Qualifier, RegistryEvent, Scope,
    ScopeHint, SourceTag, Target, TypeName, TypeRef,
};
use qbind_core::binding::QualifiedTypeBinder;
use qbind_core::config::BinderConfig;
use qbind_core::registry::InMemoryRegistry;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn widget() -> TypeRef {
    TypeRef::raw("com.acme.Widget")
}

fn binder_for(registry: &InMemoryRegistry) -> QualifiedTypeBinder {
    QualifiedTypeBinder::new(Arc::new(registry.clone()))
}

fn mediator_args() -> Vec<TypeRef> {
    vec![
        TypeRef::raw(names::NAMED),
        widget(),
        TypeRef::raw("com.acme.WidgetWatcher"),
    ]
}

#[derive(Default)]
struct RecordingMediator {
    events: Mutex<Vec<String>>,
}

impl Mediator for RecordingMediator {
    fn add(&self, key: &Key, _bean: &BeanRef, _watcher: &TypeName) -> Result<(), BoxError> {
        self.events.lock().unwrap().push(format!("add {:?}", key.name()));
        Ok(())
    }

    fn remove(&self, key: &Key, _bean: &BeanRef, _watcher: &TypeName) -> Result<(), BoxError> {
        self.events.lock().unwrap().push(format!("remove {:?}", key.name()));
        Ok(())
    }
}

#[test]
fn test_default_widget_binds_unqualified_export() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);

    let descriptor = QualifiedDescriptor::new("com.acme.DefaultWidget", ComponentKind::Bean)
        .typed(vec![TypeName::new("com.acme.Widget")]);
    binder.observe(&descriptor, None);

    let bindings = registry.bindings();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].key, Key::of("com.acme.DefaultWidget"));
    assert_eq!(bindings[0].target, Target::Constructor);

    assert_eq!(bindings[1].key, Key::exact(widget(), None));
    assert_eq!(
        bindings[1].target,
        Target::Linked(Key::of("com.acme.DefaultWidget"))
    );
}

#[test]
fn test_red_widget_binds_wildcard_key() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);

    let descriptor = QualifiedDescriptor::new("com.acme.RedWidget", ComponentKind::Bean)
        .named("red")
        .with_interfaces(vec![widget()]);
    binder.observe(&descriptor, None);

    let bindings = registry.bindings();
    assert_eq!(bindings.len(), 2);
    let alias = &bindings[1];
    match &alias.key.ty {
        KeyType::Wildcard { of, capabilities } => {
            assert_eq!(of.as_str(), "com.acme.RedWidget");
            assert_eq!(capabilities, &vec![widget()]);
        }
        other => panic!("expected a wildcard key, got {other:?}"),
    }
    assert_eq!(alias.key.qualifier, Some(Qualifier::named("red")));
    assert!(alias.key.exposes(&widget()));
}

#[test]
fn test_export_types_yield_one_alias_each() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);

    let descriptor = QualifiedDescriptor::new("com.acme.RedWidget", ComponentKind::Bean)
        .named("red")
        .typed(vec![
            TypeName::new("com.acme.Widget"),
            TypeName::new("com.acme.Paintable"),
        ])
        .with_scope(ScopeHint::EagerSingleton);
    binder.observe(&descriptor, None);

    let bindings = registry.bindings();
    assert_eq!(bindings.len(), 3);
    assert_eq!(bindings[0].scope, Scope::EagerSingleton);
    for alias in &bindings[1..] {
        assert_eq!(alias.key.qualifier, Some(Qualifier::named("red")));
        assert_eq!(alias.target, Target::Linked(Key::of("com.acme.RedWidget")));
    }
}

#[test]
fn test_typed_exports_disabled_falls_back_to_wildcard() {
    let registry = InMemoryRegistry::new();
    let mut binder = QualifiedTypeBinder::with_config(
        Arc::new(registry.clone()),
        BinderConfig {
            typed_exports: false,
        },
    );

    let descriptor = QualifiedDescriptor::new("com.acme.RedWidget", ComponentKind::Bean)
        .typed(vec![TypeName::new("com.acme.Widget")]);
    binder.observe(&descriptor, None);

    let bindings = registry.bindings();
    assert_eq!(bindings.len(), 2);
    assert!(bindings[1].key.is_wildcard());
}

#[test]
fn test_provider_binding() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);

    let descriptor = QualifiedDescriptor::from_interfaces(
        "com.acme.WidgetProvider",
        vec![TypeRef::generic(names::PROVIDER, vec![widget()])],
    )
    .named("blue")
    .typed(vec![TypeName::new("com.acme.Paintable")])
    .with_scope(ScopeHint::Singleton);
    binder.observe(&descriptor, None);

    let bindings = registry.bindings();
    assert_eq!(bindings.len(), 3);

    assert_eq!(bindings[0].key, Key::of("com.acme.WidgetProvider"));
    assert_eq!(bindings[0].scope, Scope::Singleton);

    let provided = Key::exact(widget(), Some(Qualifier::named("blue")));
    assert_eq!(bindings[1].key, provided);
    assert_eq!(
        bindings[1].target,
        Target::Provider(TypeName::new("com.acme.WidgetProvider"))
    );
    assert_eq!(bindings[1].scope, Scope::Singleton);

    assert_eq!(
        bindings[2].key,
        Key::exact(
            TypeRef::raw("com.acme.Paintable"),
            Some(Qualifier::named("blue"))
        )
    );
    assert_eq!(bindings[2].target, Target::Linked(provided));
}

#[test]
fn test_provider_with_wrong_arity_is_reported_and_skipped() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);

    let descriptor = QualifiedDescriptor::new("com.acme.RawProvider", ComponentKind::Provider);
    binder.observe(&descriptor, None);

    assert!(registry.bindings().is_empty());
    let errors = registry.errors();
    assert_eq!(errors.len(), 1);
    assert!(
        errors[0].message.contains("com.acme.RawProvider"),
        "{}",
        errors[0].message
    );
    assert_eq!(binder.stats().errors, 1);
}

#[test]
fn test_mediator_with_wrong_arity_registers_nothing() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);

    let descriptor = QualifiedDescriptor::new("com.acme.HalfMediator", ComponentKind::Mediator)
        .with_type_arguments(vec![widget()])
        .with_constructor(|| Ok(Instance::Mediator(Arc::new(RecordingMediator::default()))));
    binder.observe(&descriptor, None);

    assert!(binder.dispatcher().is_none());
    assert_eq!(registry.listener_count(), 0);
    assert_eq!(registry.errors().len(), 1);
}

#[test]
fn test_mediators_share_one_subscription() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);
    let first = Arc::new(RecordingMediator::default());
    let second = Arc::new(RecordingMediator::default());

    for (name, mediator) in [("com.acme.First", &first), ("com.acme.Second", &second)] {
        let mediator = Arc::clone(mediator);
        let descriptor = QualifiedDescriptor::new(name, ComponentKind::Mediator)
            .with_type_arguments(mediator_args())
            .with_constructor(move || Ok(Instance::Mediator(mediator.clone())));
        binder.observe(&descriptor, None);
    }

    assert_eq!(registry.listener_count(), 1);
    assert_eq!(binder.dispatcher().map(|d| d.len()), Some(2));

    let bean: BeanRef = Arc::new(());
    let red = Key::exact(widget(), Some(Qualifier::named("red")));
    registry.publish(RegistryEvent::Added {
        key: red.clone(),
        bean: bean.clone(),
    });
    // Unqualified bindings are not visible to a @Named watcher.
    registry.publish(RegistryEvent::Added {
        key: Key::exact(widget(), None),
        bean: bean.clone(),
    });
    registry.publish(RegistryEvent::Removed { key: red, bean });

    for mediator in [&first, &second] {
        assert_eq!(
            *mediator.events.lock().unwrap(),
            vec!["add Some(\"red\")", "remove Some(\"red\")"]
        );
    }
}

#[test]
fn test_legacy_mediator_is_adapted() {
    struct Names(Mutex<Vec<Option<String>>>);

    impl LegacyMediator for Names {
        fn add(&self, entry: LegacyEntry<'_>, _watcher: &TypeName) -> Result<(), BoxError> {
            self.0.lock().unwrap().push(entry.name.map(str::to_string));
            Ok(())
        }

        fn remove(&self, _entry: LegacyEntry<'_>, _watcher: &TypeName) -> Result<(), BoxError> {
            Ok(())
        }
    }

    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);
    let legacy = Arc::new(Names(Mutex::new(Vec::new())));
    let handle = Arc::clone(&legacy);

    let descriptor = QualifiedDescriptor::new("com.acme.OldMediator", ComponentKind::LegacyMediator)
        .with_type_arguments(vec![
            TypeRef::raw(names::ANY_ANNOTATION),
            widget(),
            TypeRef::raw("com.acme.WidgetWatcher"),
        ])
        .with_constructor(move || Ok(Instance::LegacyMediator(handle.clone())));
    binder.observe(&descriptor, None);

    registry.publish(RegistryEvent::Added {
        key: Key::wildcard(
            TypeName::new("com.acme.RedWidget"),
            vec![widget()],
            Some(Qualifier::named("red")),
        ),
        bean: Arc::new(()),
    });
    registry.publish(RegistryEvent::Added {
        key: Key::exact(widget(), None),
        bean: Arc::new(()),
    });

    assert_eq!(
        *legacy.0.lock().unwrap(),
        vec![Some("red".to_string()), None]
    );
}

#[test]
fn test_module_is_installed_under_its_source() {
    struct WidgetModule;

    impl Module for WidgetModule {
        fn configure(&self, binder: &dyn Binder) {
            binder.bind_key(Key::of("com.acme.Gear"), Target::Constructor, Scope::Unscoped);
        }
    }

    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);
    let source = SourceTag::new("lib/gears");

    let descriptor = QualifiedDescriptor::new("com.acme.WidgetModule", ComponentKind::Module)
        .with_constructor(|| Ok(Instance::Module(Box::new(WidgetModule))));
    binder.observe(&descriptor, Some(&source));
    binder.observe(
        &QualifiedDescriptor::new("com.acme.Plain", ComponentKind::Bean),
        None,
    );

    let bindings = registry.bindings();
    assert_eq!(bindings[0].key, Key::of("com.acme.Gear"));
    assert_eq!(bindings[0].source, Some(source));
    assert_eq!(bindings[1].source, None);
    assert_eq!(binder.stats().modules, 1);
}

#[test]
fn test_construction_failures_are_isolated() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let failing = QualifiedDescriptor::new("com.acme.BrokenModule", ComponentKind::Module)
        .with_constructor(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err("missing resource".into())
        });
    let panicking = QualifiedDescriptor::new("com.acme.PanickyModule", ComponentKind::Module)
        .with_constructor(|| panic!("boom"));
    let no_constructor = QualifiedDescriptor::new("com.acme.HiddenModule", ComponentKind::Module);

    binder.observe(&failing, None);
    binder.observe(&panicking, None);
    binder.observe(&no_constructor, None);
    binder.observe(
        &QualifiedDescriptor::new("com.acme.RedWidget", ComponentKind::Bean),
        None,
    );

    let errors = registry.errors();
    assert_eq!(errors.len(), 3);
    assert!(errors[0].message.contains("missing resource"));
    assert!(errors[1].message.contains("boom"));
    assert!(errors[2].message.contains("com.acme.HiddenModule"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.bindings().len(), 2);
}

#[test]
fn test_non_concrete_types_are_skipped() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);

    binder.observe(
        &QualifiedDescriptor::new("com.acme.AbstractWidget", ComponentKind::Bean).non_concrete(),
        None,
    );
    binder.finish().unwrap();

    assert!(registry.bindings().is_empty());
    assert_eq!(binder.stats().skipped, 1);
}

fn register_mediator(binder: &mut QualifiedTypeBinder, name: &str, mediator: Arc<dyn Mediator>) {
    let descriptor = QualifiedDescriptor::new(name, ComponentKind::Mediator)
        .with_type_arguments(mediator_args())
        .with_constructor(move || Ok(Instance::Mediator(mediator.clone())));
    binder.observe(&descriptor, None);
}

#[test]
fn test_hidden_source_beans_are_not_mediated() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);
    let watcher = Arc::new(RecordingMediator::default());
    register_mediator(&mut binder, "com.acme.Watching", watcher.clone());

    let red = QualifiedDescriptor::new("com.acme.RedWidget", ComponentKind::Bean)
        .named("red")
        .with_interfaces(vec![widget()]);
    let blue = QualifiedDescriptor::new("com.acme.BlueWidget", ComponentKind::Bean)
        .named("blue")
        .with_interfaces(vec![widget()]);
    binder.observe(&red, Some(&SourceTag::hidden("internal")));
    binder.observe(&blue, Some(&SourceTag::new("lib/widgets")));

    for (of, name) in [("com.acme.RedWidget", "red"), ("com.acme.BlueWidget", "blue")] {
        registry.publish(RegistryEvent::Added {
            key: Key::wildcard(TypeName::new(of), vec![widget()], Some(Qualifier::named(name))),
            bean: Arc::new(()),
        });
    }

    assert_eq!(*watcher.events.lock().unwrap(), vec!["add Some(\"blue\")"]);
    let visible = registry.lookup(&widget());
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].source, Some(SourceTag::new("lib/widgets")));
}

#[test]
fn test_mediator_seen_twice_is_registered_once() {
    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);
    let watcher = Arc::new(RecordingMediator::default());

    register_mediator(&mut binder, "com.acme.Watching", watcher.clone());
    register_mediator(&mut binder, "com.acme.Watching", watcher.clone());

    assert_eq!(binder.dispatcher().map(|d| d.len()), Some(1));
    assert_eq!(binder.stats().mediators, 1);

    registry.publish(RegistryEvent::Added {
        key: Key::exact(widget(), Some(Qualifier::named("red"))),
        bean: Arc::new(()),
    });
    assert_eq!(watcher.events.lock().unwrap().len(), 1);
}

#[test]
fn test_mediator_failures_are_reported_to_registry() {
    struct Rejecting;

    impl Mediator for Rejecting {
        fn add(&self, _key: &Key, _bean: &BeanRef, _watcher: &TypeName) -> Result<(), BoxError> {
            Err("watcher is closed".into())
        }

        fn remove(&self, _key: &Key, _bean: &BeanRef, _watcher: &TypeName) -> Result<(), BoxError> {
            Ok(())
        }
    }

    let registry = InMemoryRegistry::new();
    let mut binder = binder_for(&registry);
    register_mediator(&mut binder, "com.acme.Rejecting", Arc::new(Rejecting));

    registry.publish(RegistryEvent::Added {
        key: Key::exact(widget(), Some(Qualifier::named("red"))),
        bean: Arc::new(()),
    });

    let errors = registry.errors();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("com.acme.WidgetWatcher"), "{}", errors[0].message);
    assert!(errors[0].message.contains("watcher is closed"));
    assert_eq!(binder.dispatcher().map(|d| d.failed_deliveries()), Some(1));
}
