use super::error::BindingError;
use super::naming::BindingKeyResolver;
use crate::config::BinderConfig;
use crate::mediation::{LegacyMediatorAdapter, MediationDispatcher};
use qbind_api::models::names;
use qbind_api::{
    Binder, BoxError, ComponentKind, Instance, Key, Mediator, QualifiedDescriptor,
    QualifiedTypeListener, Scope, SourceTag, Target, TypeName, TypeRef,
};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Counters for a single binding pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BindStats {
    pub modules: usize,
    pub mediators: usize,
    pub providers: usize,
    pub beans: usize,
    /// Abstract or otherwise non-concrete types
    pub skipped: usize,
    /// Reported, non-fatal binding errors
    pub errors: usize,
}

/// Binds qualified types reported by a scanner into the registry.
///
/// Single-pass and single-threaded: feed it one scan's output in order.
pub struct QualifiedTypeBinder {
    root: Arc<dyn Binder>,
    binder: Arc<dyn Binder>,
    current_source: Option<SourceTag>,
    resolver: BindingKeyResolver,
    dispatcher: Option<Arc<MediationDispatcher>>,
    /// Mediator types already handed to the dispatcher
    mediator_types: HashSet<TypeName>,
    stats: BindStats,
}

impl QualifiedTypeBinder {
    pub fn new(binder: Arc<dyn Binder>) -> Self {
        Self::with_config(binder, BinderConfig::default())
    }

    pub fn with_config(binder: Arc<dyn Binder>, config: BinderConfig) -> Self {
        Self {
            root: Arc::clone(&binder),
            binder,
            current_source: None,
            resolver: BindingKeyResolver::new(config),
            dispatcher: None,
            mediator_types: HashSet::new(),
            stats: BindStats::default(),
        }
    }

    /// The dispatcher, once the first mediator has been registered.
    pub fn dispatcher(&self) -> Option<&Arc<MediationDispatcher>> {
        self.dispatcher.as_ref()
    }

    pub fn stats(&self) -> &BindStats {
        &self.stats
    }

    fn switch_source(&mut self, source: Option<&SourceTag>) {
        if self.current_source.as_ref() == source {
            return;
        }
        match source {
            Some(source) => {
                self.binder = self.root.with_source(source.clone());
                self.current_source = Some(source.clone());
            }
            None => {
                self.binder = Arc::clone(&self.root);
                self.current_source = None;
            }
        }
    }

    fn install_module(&mut self, descriptor: &QualifiedDescriptor) {
        match self.new_instance(descriptor) {
            Some(Instance::Module(module)) => {
                self.stats.modules += 1;
                self.binder.install(module);
            }
            Some(other) => self.report_unexpected(descriptor, "module", &other),
            None => {}
        }
    }

    fn register_mediator(&mut self, descriptor: &QualifiedDescriptor) {
        let args = &descriptor.type_arguments;
        if args.len() != 3 {
            self.report(BindingError::WrongTypeArguments {
                type_name: descriptor.type_name.clone(),
                expected: 3,
                found: args.len(),
            });
            return;
        }
        if self.mediator_types.contains(&descriptor.type_name) {
            debug!("Mediator {} is already registered", descriptor.type_name);
            return;
        }

        let mediator: Arc<dyn Mediator> = match (self.new_instance(descriptor), descriptor.kind) {
            (Some(Instance::Mediator(mediator)), ComponentKind::Mediator) => mediator,
            (Some(Instance::LegacyMediator(legacy)), ComponentKind::LegacyMediator) => {
                Arc::new(LegacyMediatorAdapter::new(legacy))
            }
            (Some(other), kind) => {
                self.report_unexpected(descriptor, &kind.to_string(), &other);
                return;
            }
            (None, _) => return,
        };

        let watched = self.resolver.watched_key(args[1].clone(), &args[0].raw);
        let watcher_type = args[2].raw.clone();
        self.mediator_types.insert(descriptor.type_name.clone());
        self.stats.mediators += 1;
        self.mediate(watched, mediator, watcher_type);
    }

    fn mediate(&mut self, watched: Key, mediator: Arc<dyn Mediator>, watcher_type: TypeName) {
        let dispatcher = self
            .dispatcher
            .get_or_insert_with(|| Arc::new(MediationDispatcher::reporting_to(&self.root)));
        dispatcher.mediate(self.binder.as_ref(), watched, mediator, watcher_type);
    }

    fn bind_provider_type(&mut self, descriptor: &QualifiedDescriptor) {
        let args = &descriptor.type_arguments;
        if args.len() != 1 {
            self.report(BindingError::WrongTypeArguments {
                type_name: descriptor.type_name.clone(),
                expected: 1,
                found: args.len(),
            });
            return;
        }

        let provider_type = &descriptor.type_name;
        self.binder
            .bind_key(Key::of(provider_type.clone()), Target::Constructor, Scope::Singleton);

        let name = self.resolver.binding_name(descriptor);
        let key = self.resolver.binding_key(args[0].clone(), name);
        self.binder.bind_key(
            key.clone(),
            Target::Provider(provider_type.clone()),
            self.resolver.provided_scope(descriptor),
        );

        for binding_type in self.resolver.binding_types(descriptor).unwrap_or_default() {
            self.binder.bind_alias(key.of_type(binding_type), key.clone());
        }
        self.stats.providers += 1;
    }

    fn bind_qualified_type(&mut self, descriptor: &QualifiedDescriptor) {
        let qualified_type = &descriptor.type_name;
        let scope = self.resolver.provided_scope(descriptor);
        self.binder
            .bind_key(Key::of(qualified_type.clone()), Target::Constructor, scope);

        let name = self.resolver.binding_name(descriptor);
        match self.resolver.binding_types(descriptor) {
            Some(types) => {
                let key = self
                    .resolver
                    .binding_key(TypeRef::raw(names::OBJECT), name);
                for binding_type in types {
                    self.binder
                        .bind_alias(key.of_type(binding_type), Key::of(qualified_type.clone()));
                }
            }
            None => {
                let key = Key::wildcard(
                    qualified_type.clone(),
                    descriptor.interfaces.clone(),
                    name,
                );
                self.binder.bind_alias(key, Key::of(qualified_type.clone()));
            }
        }
        self.stats.beans += 1;
    }

    /// Runs the descriptor's no-argument constructor, reporting any failure.
    fn new_instance(&mut self, descriptor: &QualifiedDescriptor) -> Option<Instance> {
        let reason = match &descriptor.constructor {
            None => "no accessible no-argument constructor".to_string(),
            Some(constructor) => match panic::catch_unwind(AssertUnwindSafe(|| constructor())) {
                Ok(Ok(instance)) => return Some(instance),
                Ok(Err(cause)) => root_cause(cause.as_ref()),
                Err(payload) => format!("constructor panicked: {}", panic_message(payload.as_ref())),
            },
        };
        self.report(BindingError::Construction {
            type_name: descriptor.type_name.clone(),
            reason,
        });
        None
    }

    fn report_unexpected(&mut self, descriptor: &QualifiedDescriptor, expected: &str, actual: &Instance) {
        self.report(BindingError::Construction {
            type_name: descriptor.type_name.clone(),
            reason: format!("expected a {expected} but got a {}", actual.variant()),
        });
    }

    fn report(&mut self, error: BindingError) {
        warn!("{}", error);
        self.stats.errors += 1;
        self.binder.add_error(error.to_string());
    }
}

impl QualifiedTypeListener for QualifiedTypeBinder {
    fn observe(&mut self, descriptor: &QualifiedDescriptor, source: Option<&SourceTag>) {
        self.switch_source(source);

        if !descriptor.concrete {
            debug!("Skipping non-concrete type {}", descriptor.type_name);
            self.stats.skipped += 1;
            return;
        }

        debug!("Binding {} as {}", descriptor.type_name, descriptor.kind);
        match descriptor.kind {
            ComponentKind::Module => self.install_module(descriptor),
            ComponentKind::Mediator | ComponentKind::LegacyMediator => {
                self.register_mediator(descriptor)
            }
            ComponentKind::Provider => self.bind_provider_type(descriptor),
            ComponentKind::Bean => self.bind_qualified_type(descriptor),
        }
    }

    fn finish(&mut self) -> Result<(), BoxError> {
        let stats = &self.stats;
        info!(
            "Binding pass complete: {} beans, {} providers, {} modules, {} mediators, {} skipped, {} errors",
            stats.beans, stats.providers, stats.modules, stats.mediators, stats.skipped, stats.errors
        );
        Ok(())
    }
}

fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut cause = error;
    while let Some(next) = cause.source() {
        cause = next;
    }
    cause.to_string()
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
