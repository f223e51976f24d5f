//! Registry sub-reducer: favorites, recents, save and delete.

use chrono::{DateTime, Utc};

use crate::action::Action;
use crate::domain::connection::{ConnectionDescriptor, ConnectionRegistry};
use crate::effect::{Effect, PersistReason, RemovalReason};
use crate::state::ConnectState;

/// Handles persistence-backed actions and their completions.
/// Returns Some(effects) if action was handled, None otherwise.
pub fn reduce_registry(
    state: &mut ConnectState,
    action: &Action,
    now: DateTime<Utc>,
) -> Option<Vec<Effect>> {
    match action {
        Action::LoadConnections => Some(vec![Effect::LoadConnections]),
        Action::ConnectionsLoaded(descriptors) => {
            state.connections = ConnectionRegistry::from_descriptors(descriptors.iter().cloned());
            Some(vec![Effect::Broadcast])
        }

        Action::CreateFavorite => {
            let mut candidate = state.current_connection.clone();
            candidate.is_favorite = true;
            Some(vec![persist(candidate, PersistReason::Favorite)])
        }
        Action::CreateRecent => {
            let mut candidate = state.current_connection.clone();
            candidate.last_used = Some(now);
            Some(evict_then_persist(
                &state.connections,
                candidate,
                PersistReason::Recent,
            ))
        }
        Action::SaveConnection(descriptor) => Some(evict_then_persist(
            &state.connections,
            descriptor.as_ref().clone(),
            PersistReason::Save,
        )),
        Action::ConnectionPersisted { descriptor, reason } => {
            state.connections.upsert(descriptor.as_ref().clone());
            let updates_draft = matches!(reason, PersistReason::Favorite | PersistReason::Recent);
            if updates_draft && state.current_connection.id == descriptor.id {
                state.current_connection = descriptor.as_ref().clone();
            }
            Some(vec![Effect::Broadcast])
        }

        Action::DeleteConnection(descriptor) => Some(vec![Effect::RemoveConnection {
            descriptor: descriptor.clone(),
            reason: RemovalReason::Deleted,
        }]),
        Action::DeleteConnections(descriptors) => {
            if descriptors.is_empty() {
                return Some(vec![]);
            }
            Some(vec![Effect::DispatchActions(
                descriptors
                    .iter()
                    .map(|d| Action::DeleteConnection(Box::new(d.clone())))
                    .collect(),
            )])
        }
        Action::ConnectionRemoved { id, reason } => {
            state.connections.remove(id);
            match reason {
                RemovalReason::Evicted => Some(vec![]),
                RemovalReason::Deleted => {
                    if &state.current_connection.id == id {
                        state.current_connection = ConnectionDescriptor::new();
                    }
                    Some(vec![Effect::Broadcast])
                }
            }
        }

        _ => None,
    }
}

fn persist(descriptor: ConnectionDescriptor, reason: PersistReason) -> Effect {
    Effect::PersistConnection {
        descriptor: Box::new(descriptor),
        reason,
    }
}

/// Evictions run before the write.
fn evict_then_persist(
    registry: &ConnectionRegistry,
    candidate: ConnectionDescriptor,
    reason: PersistReason,
) -> Vec<Effect> {
    let evictions = registry.eviction_candidates(&candidate);
    if evictions.is_empty() {
        return vec![persist(candidate, reason)];
    }

    let mut steps: Vec<Effect> = evictions
        .into_iter()
        .map(|descriptor| Effect::RemoveConnection {
            descriptor: Box::new(descriptor),
            reason: RemovalReason::Evicted,
        })
        .collect();
    steps.push(persist(candidate, reason));
    vec![Effect::Sequence(steps)]
}
