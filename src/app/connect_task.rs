use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::action::Action;
use crate::domain::connection::ConnectionDescriptor;
use crate::ports::DataService;

/// Runs one connect attempt off the store task and reports back through `tx`.
pub fn spawn_connect_task(
    data_service: Arc<dyn DataService>,
    descriptor: ConnectionDescriptor,
    tx: mpsc::Sender<Action>,
) {
    let id = descriptor.id.clone();
    let uri = descriptor.to_masked_connection_string();
    tokio::spawn(async move {
        let result = tokio::spawn(async move { data_service.connect(&descriptor).await }).await;

        let action = match result {
            Ok(Ok(session)) => {
                info!(connection_id = %id, uri = %uri, "Connected");
                Action::ConnectSucceeded(session)
            }
            Ok(Err(e)) => {
                warn!(connection_id = %id, uri = %uri, error = %e, "Connect failed");
                Action::ConnectFailed(e.to_string())
            }
            Err(e) => Action::ConnectFailed(format!("Connect task panicked: {}", e)),
        };

        let _ = tx.send(action).await;
    });
}
