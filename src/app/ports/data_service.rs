use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::connection::{ConnectionDescriptor, ConnectionId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataServiceError {
    /// Shown to the user as-is.
    #[error("{0}")]
    ConnectionFailed(String),
    #[error("{0}")]
    Unsupported(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
}

/// A live connection produced by a [`DataService`].
#[async_trait]
pub trait DataSession: Send + Sync + Debug {
    fn connection_id(&self) -> &ConnectionId;

    /// Human-readable target, never containing credentials.
    fn label(&self) -> &str;

    async fn server_version(&self) -> Result<String, DataServiceError>;

    /// Releases the underlying connection. Further calls fail.
    async fn close(&self) -> Result<(), DataServiceError>;
}

pub type SessionHandle = Arc<dyn DataSession>;

#[async_trait]
pub trait DataService: Send + Sync {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<SessionHandle, DataServiceError>;

    async fn disconnect(&self, session: SessionHandle) -> Result<(), DataServiceError>;
}
