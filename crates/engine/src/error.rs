use beadstash_core::CoreError;
use beadstash_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[source] StorageError),

    #[error("core error: {0}")]
    Core(#[source] CoreError),

    #[error("color not found: {hex} in brand {brand}")]
    ColorNotFound { hex: String, brand: String },

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("duplicate inventory line: {0}")]
    DuplicateInventoryLine(String),

    #[error("persistence failure: {0}")]
    PersistenceFailure(#[source] StorageError),

    #[error("line not loaded: {0}")]
    LineNotLoaded(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),
}

impl EngineError {
    /// Wraps an error from a durable write. Conflicts and data errors keep
    /// their own variants; everything else is a persistence failure.
    pub fn persistence(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateInventoryLine { key } => Self::DuplicateInventoryLine(key),
            StorageError::Core(core) => core.into(),
            other => Self::PersistenceFailure(other),
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ColorNotFound { hex, brand } => Self::ColorNotFound { hex, brand },
            other => Self::Core(other),
        }
    }
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DuplicateInventoryLine { key } => Self::DuplicateInventoryLine(key),
            StorageError::Core(core) => core.into(),
            other => Self::Storage(other),
        }
    }
}
