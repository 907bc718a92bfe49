use qbind_api::BoxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterceptError {
    #[error("at least one interceptor is required")]
    NoInterceptors,
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("invocation failed: {0}")]
    Interceptor(#[source] BoxError),
    #[error("{method} did not return a {expected}")]
    ReturnType {
        method: String,
        expected: &'static str,
    },
}

impl InterceptError {
    pub fn interceptor(err: impl Into<BoxError>) -> Self {
        InterceptError::Interceptor(err.into())
    }
}
