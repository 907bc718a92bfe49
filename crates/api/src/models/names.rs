//! Well-known capability names recognised by the binder.
//!
//! The names follow the JVM conventions of the component spaces being scanned,
//! so they are plain strings rather than Rust types.

/// Marks a component that contributes further bindings when installed.
pub const MODULE: &str = "com.google.inject.Module";

/// Current mediator contract: `Mediator<Q, T, W>`.
pub const MEDIATOR: &str = "org.eclipse.sisu.Mediator";

/// Older mediator contract, adapted before registration.
pub const LEGACY_MEDIATOR: &str = "org.sonatype.inject.Mediator";

/// Provider contract: `Provider<T>`.
pub const PROVIDER: &str = "javax.inject.Provider";

/// Qualifier annotation carrying a binding name. Also the default index category.
pub const NAMED: &str = "javax.inject.Named";

/// Base annotation type; a mediator watching it matches every qualifier.
pub const ANY_ANNOTATION: &str = "java.lang.annotation.Annotation";

/// Root of every type hierarchy, used as the primary type of exported aliases.
pub const OBJECT: &str = "java.lang.Object";

/// Binding name that means "unqualified".
pub const DEFAULT_NAME: &str = "default";

/// Simple-name prefix that marks a default (unqualified) implementation.
pub const DEFAULT_PREFIX: &str = "Default";
