use thiserror::Error;

pub type Result<T> = std::result::Result<T, MimirError>;

/// Unified error type for submission validation and backend failures.
#[derive(Debug, Error)]
pub enum MimirError {
    #[error("invalid metric type: {0}")]
    InvalidMetricType(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("storage: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
