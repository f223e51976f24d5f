use tokio::sync::mpsc;
use tracing::warn;

use crate::app::ports::{ConnectionHost, SessionHandle};

/// Hands established sessions to whoever holds the receiving end.
pub struct ChannelHost {
    tx: mpsc::UnboundedSender<SessionHandle>,
}

impl ChannelHost {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ConnectionHost for ChannelHost {
    fn connection_established(&self, session: SessionHandle) {
        let label = session.label().to_string();
        if self.tx.send(session).is_err() {
            warn!(session = %label, "No receiver for established session");
        }
    }
}
