use crate::connection_state::ConnectionState;
use crate::domain::connection::{ConnectionDescriptor, ConnectionRegistry};

/// The snapshot sent to subscribers on every broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectState {
    /// Draft being edited in the form.
    pub current_connection: ConnectionDescriptor,
    pub connections: ConnectionRegistry,
    /// False after a rejected or failed connect until the next reset or success.
    pub is_valid: bool,
    pub connection_state: ConnectionState,
    /// Diagnostic from the last failed connect attempt.
    pub error_message: Option<String>,
}

impl ConnectState {
    pub fn new() -> Self {
        Self {
            current_connection: ConnectionDescriptor::new(),
            connections: ConnectionRegistry::new(),
            is_valid: true,
            connection_state: ConnectionState::NotConnected,
            error_message: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connection_state.is_connected()
    }

    pub fn is_connecting(&self) -> bool {
        self.connection_state.is_connecting()
    }
}

impl Default for ConnectState {
    fn default() -> Self {
        Self::new()
    }
}
