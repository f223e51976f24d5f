/// Lifecycle of the store's connect attempt.
///
/// State transitions:
/// - NotConnected → Connecting (Connect on a valid draft)
/// - Connecting → Connected (data service returned a session)
/// - Connecting → Failed (data service returned an error)
/// - Failed → NotConnected (draft reset)
/// - Connected → NotConnected (session closed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    NotConnected,
    Connecting,
    Connected,
    Failed,
}

impl ConnectionState {
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::NotConnected)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}
