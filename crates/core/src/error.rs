use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QbindError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Index error at {}: {source}", .path.display())]
    Index {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Scan error: {0}")]
    Scan(String),
}

impl From<Box<dyn std::error::Error + Send + Sync>> for QbindError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match err.downcast::<QbindError>() {
            Ok(err) => *err,
            Err(other) => QbindError::Scan(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, QbindError>;
