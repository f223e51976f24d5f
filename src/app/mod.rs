//! Application layer: the reactive connection store and its ports.

use mongoconnect_domain as domain;

pub mod action;
pub mod connect_task;
pub mod connection_error;
pub mod connection_state;
pub mod dispatcher;
pub mod effect;
pub mod effect_runner;
pub mod ports;
pub mod reducer;
pub mod reducers;
pub mod state;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use action::Action;
pub use dispatcher::ActionDispatcher;
pub use state::ConnectState;
pub use store::{ConnectionStore, StoreError};
