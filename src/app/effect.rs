//! Side effects returned by the reducer, executed by EffectRunner.

use crate::action::Action;
use crate::domain::connection::ConnectionDescriptor;
use crate::ports::SessionHandle;

/// Why a descriptor is being written. Decides what happens to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistReason {
    Favorite,
    Recent,
    Save,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Explicit delete. Broadcasts and may reset the draft.
    Deleted,
    /// Recent dropped to make room. Silent.
    Evicted,
}

#[derive(Debug, Clone)]
pub enum Effect {
    /// Send the current snapshot to subscribers
    Broadcast,

    LoadConnections,
    PersistConnection {
        descriptor: Box<ConnectionDescriptor>,
        reason: PersistReason,
    },
    RemoveConnection {
        descriptor: Box<ConnectionDescriptor>,
        reason: RemovalReason,
    },

    /// Runs on a spawned task; completion arrives through the action channel
    Connect {
        descriptor: Box<ConnectionDescriptor>,
    },
    HandOffSession {
        session: SessionHandle,
    },
    CloseSession,

    /// Runs in order; a failure stops the rest
    Sequence(Vec<Effect>),

    /// Dispatch actions to be processed by the reducer
    DispatchActions(Vec<Action>),
}
