//! Pure reducer: state transitions only, no I/O.
//!
//! # Purity Rules
//!
//! The reducer MUST NOT:
//! - Call `Utc::now()` (time is passed as `now` parameter)
//! - Touch the backing store or the data service
//! - Spawn async tasks
//!
//! Anything with a side effect is returned as an [`Effect`].

use chrono::{DateTime, Utc};

use crate::action::Action;
use crate::effect::Effect;
use crate::reducers::{reduce_form, reduce_lifecycle, reduce_registry};
use crate::state::ConnectState;

pub fn reduce(state: &mut ConnectState, action: Action, now: DateTime<Utc>) -> Vec<Effect> {
    if let Some(effects) = reduce_form(state, &action, now) {
        return effects;
    }
    if let Some(effects) = reduce_registry(state, &action, now) {
        return effects;
    }
    if let Some(effects) = reduce_lifecycle(state, &action, now) {
        return effects;
    }

    debug_assert!(false, "Unhandled action: {}", action.name());
    vec![]
}
