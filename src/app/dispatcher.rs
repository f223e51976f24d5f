use tokio::sync::mpsc;
use tracing::warn;

use crate::action::Action;

/// Cloneable, fire-and-forget handle for sending actions to a running store.
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    tx: mpsc::Sender<Action>,
}

impl ActionDispatcher {
    pub fn new(tx: mpsc::Sender<Action>) -> Self {
        Self { tx }
    }

    /// Queues `action`. Never blocks; a full or closed queue drops it.
    pub fn dispatch(&self, action: Action) {
        let name = action.name();
        if let Err(e) = self.tx.try_send(action) {
            warn!(action = name, error = %e, "Dropped action");
        }
    }
}
