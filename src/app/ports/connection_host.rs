use super::data_service::SessionHandle;

/// The application hosting the store. Receives live sessions; the store
/// closes them on disconnect or when a newer connect replaces them.
#[cfg_attr(test, mockall::automock)]
pub trait ConnectionHost: Send + Sync {
    /// Called once per successful connect.
    fn connection_established(&self, session: SessionHandle);
}
