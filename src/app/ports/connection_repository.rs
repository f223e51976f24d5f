use std::path::PathBuf;

use thiserror::Error;

use crate::domain::connection::ConnectionDescriptor;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Config version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("Read error: {0}")]
    ReadError(String),
    #[error("Write error: {0}")]
    WriteError(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("IO error: {0}")]
    IoError(String),
}

/// Backing store for saved connections.
///
/// Calls block; the store runs them on the blocking pool.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionRepository: Send + Sync {
    fn load(&self) -> Result<Vec<ConnectionDescriptor>, RepositoryError>;

    /// Inserts or replaces the record with the descriptor's id.
    fn save(&self, descriptor: &ConnectionDescriptor) -> Result<(), RepositoryError>;

    /// Removing an unknown id is not an error.
    fn delete(&self, descriptor: &ConnectionDescriptor) -> Result<(), RepositoryError>;

    fn storage_path(&self) -> PathBuf;
}
