//! Lifecycle sub-reducer: connect, disconnect and their completions.

use chrono::{DateTime, Utc};

use crate::action::Action;
use crate::connection_state::ConnectionState;
use crate::domain::connection::is_valid;
use crate::effect::Effect;
use crate::state::ConnectState;

/// Handles the connect/disconnect lifecycle.
/// Returns Some(effects) if action was handled, None otherwise.
pub fn reduce_lifecycle(
    state: &mut ConnectState,
    action: &Action,
    _now: DateTime<Utc>,
) -> Option<Vec<Effect>> {
    match action {
        Action::Connect => {
            if !is_valid(&state.current_connection) {
                state.is_valid = false;
                state.error_message = None;
                return Some(vec![Effect::Broadcast]);
            }
            // Overlapping attempts are not cancelled; the last completion wins.
            state.connection_state = ConnectionState::Connecting;
            Some(vec![
                Effect::Broadcast,
                Effect::Connect {
                    descriptor: Box::new(state.current_connection.clone()),
                },
            ])
        }
        Action::ConnectSucceeded(session) => {
            state.is_valid = true;
            state.connection_state = ConnectionState::Connected;
            state.error_message = None;
            Some(vec![
                Effect::HandOffSession {
                    session: session.clone(),
                },
                Effect::Broadcast,
            ])
        }
        Action::ConnectFailed(message) => {
            state.is_valid = false;
            state.connection_state = ConnectionState::Failed;
            state.error_message = Some(message.clone());
            Some(vec![Effect::Broadcast])
        }

        Action::Disconnect => Some(vec![Effect::CloseSession]),
        Action::Disconnected => {
            state.connection_state = ConnectionState::NotConnected;
            Some(vec![Effect::Broadcast])
        }

        Action::VisitAtlasLink | Action::AtlasLearnMore => Some(vec![]),

        _ => None,
    }
}
