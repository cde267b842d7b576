use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Engine not ready: no skill snapshot has been published yet")]
    NotReady,

    #[error("Upstream unavailable: {0}")]
    Upstream(String),

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("A refresh is already running for {0}")]
    RefreshBusy(&'static str),

    #[error("Refresh cancelled")]
    Cancelled,

    #[error("Mapping already exists for role: {0}")]
    MappingExists(String),

    #[error("Mapping not found for role: {0}")]
    MappingNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
