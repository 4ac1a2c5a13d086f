//! Durable key-value storage abstraction and backends.

/// Atomic file-per-key backend.
pub mod file;
/// In-process map backend.
pub mod memory;
/// SQLite-backed key-value table.
pub mod sqlite;

/// Storage read or write failure.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// SQLite backend error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// JSON encode or decode error.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Any other failure, described.
    #[error("{0}")]
    Message(String),
}

/// Result alias for storage operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// One opaque blob per key, overwritten wholesale on every `set`.
pub trait KvStorage: Send {
    /// Reads the blob under `key`, or `None` when absent.
    fn get(&self, key: &str) -> PersistResult<Option<Vec<u8>>>;
    /// Replaces the blob under `key`.
    fn set(&mut self, key: &str, value: &[u8]) -> PersistResult<()>;
}
