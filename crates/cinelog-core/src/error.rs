use cinelog_models::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] KvError),

    #[error("failed to serialize movies: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("a movie with id '{0}' already exists")]
    DuplicateId(String),

    #[error("invalid movie: {0}")]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    /// True when the durable write failed after the in-memory change was applied
    pub fn is_persistence_failure(&self) -> bool {
        matches!(self, StoreError::Storage(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
