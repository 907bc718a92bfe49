pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid type signature `{signature}`: {reason}")]
    InvalidSignature { signature: String, reason: String },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
