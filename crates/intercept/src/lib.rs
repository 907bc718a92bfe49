//! Intercepting proxies for imported services.
//!
//! ```text
//! Import<T> ──decorate──▶ ProxyImport<T> ──get()──▶ proxy (created once)
//!                                                     │ every call
//!                                                     ▼
//!                          InterceptHandler ──▶ interceptor[0] ──▶ ... ──▶ real method
//! ```

pub mod error;
pub mod import;
pub mod invocation;
pub mod matcher;
pub mod proxy;

pub use error::InterceptError;
pub use import::Import;
pub use invocation::{Argument, Invocation, MethodInterceptor, MethodSignature, RealMethod, Value};
pub use matcher::{MatchAll, Matcher, any};
pub use proxy::{InterceptHandler, InterceptingDecorator, Proxied, ProxyImport};
