use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate inventory line: {key}")]
    DuplicateInventoryLine { key: String },

    #[error("core error: {0}")]
    Core(#[from] beadstash_core::CoreError),
}
