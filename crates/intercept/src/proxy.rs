use crate::error::InterceptError;
use crate::import::{Import, Lease};
use crate::invocation::{Argument, Invocation, MethodInterceptor, MethodSignature, Value};
use crate::matcher::Matcher;
use once_cell::sync::OnceCell;
use std::any::{Any, type_name};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// A service contract that can be fronted by an intercepting proxy.
///
/// Implemented on the trait object (`impl Proxied for dyn Greeter`), returning a
/// proxy type whose methods forward to [`InterceptHandler::invoke`].
pub trait Proxied: Send + Sync + 'static {
    /// Builds a proxy for the capabilities `instance` exposes.
    ///
    /// `instance` is only borrowed for the duration of construction; the proxy
    /// must re-acquire the service through `handler` on every call.
    fn proxy(instance: &Self, handler: Arc<InterceptHandler<Self>>) -> Arc<Self>;
}

/// Wraps imports of `T` so that matching calls run through an interceptor chain.
///
/// The class matcher sees the name of the capability that declares the called
/// method ([`MethodSignature::declaring`]), not the live instance.
pub struct InterceptingDecorator<T: ?Sized> {
    class_matcher: Arc<dyn Matcher<str>>,
    method_matcher: Arc<dyn Matcher<MethodSignature>>,
    interceptors: Arc<[Arc<dyn MethodInterceptor>]>,
    _service: PhantomData<fn(&T)>,
}

impl<T: ?Sized + Proxied> InterceptingDecorator<T> {
    pub fn new(
        class_matcher: Arc<dyn Matcher<str>>,
        method_matcher: Arc<dyn Matcher<MethodSignature>>,
        interceptors: Vec<Arc<dyn MethodInterceptor>>,
    ) -> Result<Self, InterceptError> {
        if interceptors.is_empty() {
            return Err(InterceptError::NoInterceptors);
        }
        Ok(Self {
            class_matcher,
            method_matcher,
            interceptors: interceptors.into(),
            _service: PhantomData,
        })
    }

    pub fn decorate(&self, import: Arc<dyn Import<T>>) -> ProxyImport<T> {
        ProxyImport {
            handler: Arc::new(InterceptHandler {
                import,
                class_matcher: Arc::clone(&self.class_matcher),
                method_matcher: Arc::clone(&self.method_matcher),
                interceptors: Arc::clone(&self.interceptors),
            }),
            proxy: OnceCell::new(),
        }
    }
}

/// Decorated import handing out a single, lazily created proxy.
pub struct ProxyImport<T: ?Sized> {
    handler: Arc<InterceptHandler<T>>,
    proxy: OnceCell<Arc<T>>,
}

impl<T: ?Sized + Proxied> ProxyImport<T> {
    pub fn handler(&self) -> &Arc<InterceptHandler<T>> {
        &self.handler
    }

    pub fn is_created(&self) -> bool {
        self.proxy.get().is_some()
    }

    fn create(&self) -> Result<Arc<T>, InterceptError> {
        let (_lease, instance) = Lease::acquire(self.handler.import.as_ref());
        let instance = instance.ok_or_else(|| {
            InterceptError::ServiceUnavailable(type_name::<T>().to_string())
        })?;
        debug!("Creating intercepting proxy for {}", type_name::<T>());
        Ok(T::proxy(&*instance, Arc::clone(&self.handler)))
    }
}

impl<T: ?Sized + Proxied> Import<T> for ProxyImport<T> {
    /// Returns the cached proxy, creating it on first use.
    ///
    /// Concurrent first calls block on the cell, so at most one proxy is ever
    /// built; later calls take no lock. Nothing is cached while the underlying
    /// service is unavailable.
    fn get(&self) -> Option<Arc<T>> {
        self.proxy
            .get_or_try_init(|| self.create())
            .ok()
            .map(Arc::clone)
    }

    /// Calls through the proxy acquire and release the service themselves.
    fn unget(&self) {}
}

/// Per-call dispatch shared by every proxy of one decorated import.
pub struct InterceptHandler<T: ?Sized> {
    import: Arc<dyn Import<T>>,
    class_matcher: Arc<dyn Matcher<str>>,
    method_matcher: Arc<dyn Matcher<MethodSignature>>,
    interceptors: Arc<[Arc<dyn MethodInterceptor>]>,
}

impl<T: ?Sized + Proxied> InterceptHandler<T> {
    /// Dispatches one call. `call` invokes the real method on the live instance.
    ///
    /// The service is acquired for the duration of the call and always released.
    pub fn invoke<F>(
        &self,
        method: &MethodSignature,
        arguments: &[Argument<'_>],
        call: F,
    ) -> Result<Value, InterceptError>
    where
        F: Fn(&T, &[Argument<'_>]) -> Result<Value, InterceptError>,
    {
        let (_lease, instance) = Lease::acquire(self.import.as_ref());
        let Some(instance) = instance else {
            return Err(InterceptError::ServiceUnavailable(method.to_string()));
        };

        if !(self.class_matcher.matches(method.declaring) && self.method_matcher.matches(method)) {
            return call(&*instance, arguments);
        }

        let real = |arguments: &[Argument<'_>]| call(&*instance, arguments);
        Invocation::start(method, arguments, &self.interceptors, &real).proceed()
    }

    /// Like [`invoke`](Self::invoke), downcasting the result to `R`.
    pub fn invoke_typed<R, F>(
        &self,
        method: &MethodSignature,
        arguments: &[Argument<'_>],
        call: F,
    ) -> Result<R, InterceptError>
    where
        R: Any,
        F: Fn(&T, &[Argument<'_>]) -> Result<Value, InterceptError>,
    {
        self.invoke(method, arguments, call)?
            .downcast::<R>()
            .map(|value| *value)
            .map_err(|_| InterceptError::ReturnType {
                method: method.to_string(),
                expected: type_name::<R>(),
            })
    }
}
