use crate::error::InterceptError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Return value of an intercepted call.
pub type Value = Box<dyn Any + Send>;

/// A type-erased call argument.
pub type Argument<'a> = &'a (dyn Any + 'static);

/// The real method, already bound to its receiver.
pub type RealMethod<'a> = dyn Fn(&[Argument<'_>]) -> Result<Value, InterceptError> + 'a;

/// Identifies an interceptable method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    pub declaring: &'static str,
    pub name: &'static str,
}

impl MethodSignature {
    pub const fn new(declaring: &'static str, name: &'static str) -> Self {
        Self { declaring, name }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring, self.name)
    }
}

pub trait MethodInterceptor: Send + Sync {
    fn invoke(&self, invocation: &Invocation<'_>) -> Result<Value, InterceptError>;
}

/// One step of an interceptor chain.
///
/// The position in the chain is fixed when the step is created, so calling
/// [`proceed`](Invocation::proceed) again replays the rest of the chain from
/// the same point.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    method: &'a MethodSignature,
    arguments: &'a [Argument<'a>],
    interceptors: &'a [Arc<dyn MethodInterceptor>],
    index: usize,
    real: &'a RealMethod<'a>,
}

impl<'a> Invocation<'a> {
    /// The chain head: `proceed` calls the first interceptor.
    pub(crate) fn start(
        method: &'a MethodSignature,
        arguments: &'a [Argument<'a>],
        interceptors: &'a [Arc<dyn MethodInterceptor>],
        real: &'a RealMethod<'a>,
    ) -> Self {
        Self {
            method,
            arguments,
            interceptors,
            index: 0,
            real,
        }
    }

    pub fn method(&self) -> &MethodSignature {
        self.method
    }

    pub fn arguments(&self) -> &[Argument<'a>] {
        self.arguments
    }

    /// Typed access to an argument.
    pub fn argument<T: Any>(&self, index: usize) -> Option<&'a T> {
        self.arguments.get(index)?.downcast_ref::<T>()
    }

    /// Index of the interceptor `proceed` will call next.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Calls the next interceptor, or the real method once the chain is exhausted.
    pub fn proceed(&self) -> Result<Value, InterceptError> {
        match self.interceptors.get(self.index) {
            Some(interceptor) => interceptor.invoke(&Invocation {
                index: self.index + 1,
                ..*self
            }),
            None => (self.real)(self.arguments),
        }
    }
}

impl fmt::Debug for Invocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invocation")
            .field("method", self.method)
            .field("arguments", &self.arguments.len())
            .field("index", &self.index)
            .finish()
    }
}
