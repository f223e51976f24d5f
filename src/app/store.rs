//! The connection store: owns the state, reduces actions, runs effects.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::action::Action;
use crate::dispatcher::ActionDispatcher;
use crate::effect::Effect;
use crate::effect_runner::EffectRunner;
use crate::ports::{ConnectionHost, ConnectionRepository, DataService, RepositoryError};
use crate::reducer::reduce;
use crate::state::ConnectState;

const ACTION_CHANNEL_CAPACITY: usize = 256;
const SUBSCRIBER_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("{0}")]
    TaskFailed(String),
    #[error("Action channel closed")]
    ChannelClosed,
}

/// Single owner of [`ConnectState`].
///
/// Every mutation goes through [`ConnectionStore::apply`], which reduces the
/// action and runs the resulting effects to completion before returning.
/// Connect attempts are the exception: they finish on a spawned task and
/// come back as queued actions, picked up by [`ConnectionStore::run`] or
/// [`ConnectionStore::process_next`].
pub struct ConnectionStore {
    state: ConnectState,
    runner: EffectRunner,
    action_tx: mpsc::Sender<Action>,
    action_rx: mpsc::Receiver<Action>,
    subscribers: broadcast::Sender<ConnectState>,
    published: ConnectState,
}

impl ConnectionStore {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        data_service: Arc<dyn DataService>,
        host: Arc<dyn ConnectionHost>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::channel(ACTION_CHANNEL_CAPACITY);
        let (subscribers, _) = broadcast::channel(SUBSCRIBER_CHANNEL_CAPACITY);
        let runner = EffectRunner::new(repository, data_service, host, action_tx.clone());
        let state = ConnectState::new();

        Self {
            published: state.clone(),
            state,
            runner,
            action_tx,
            action_rx,
            subscribers,
        }
    }

    /// Loads the registry from the backing store.
    pub async fn init(&mut self) -> Result<ConnectState, StoreError> {
        self.apply(Action::LoadConnections).await
    }

    pub fn state(&self) -> &ConnectState {
        &self.state
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectState> {
        self.subscribers.subscribe()
    }

    pub fn dispatcher(&self) -> ActionDispatcher {
        ActionDispatcher::new(self.action_tx.clone())
    }

    pub async fn apply(&mut self, action: Action) -> Result<ConnectState, StoreError> {
        self.apply_at(action, Utc::now()).await
    }

    pub async fn apply_at(
        &mut self,
        action: Action,
        now: DateTime<Utc>,
    ) -> Result<ConnectState, StoreError> {
        debug!(action = action.name(), "Applying action");
        let effects = reduce(&mut self.state, action, now);
        if let Err(e) = self.run_effects(effects, now).await {
            // Steps completed before the failure stay applied.
            if self.state != self.published {
                self.broadcast();
            }
            return Err(e);
        }
        Ok(self.state.clone())
    }

    /// Waits for the next queued action and applies it.
    pub async fn process_next(&mut self) -> Result<ConnectState, StoreError> {
        let action = self
            .action_rx
            .recv()
            .await
            .ok_or(StoreError::ChannelClosed)?;
        self.apply(action).await
    }

    /// Applies queued actions until `cancel` fires. Failures are logged;
    /// dispatchers have no one to return them to.
    pub async fn run(&mut self, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                Some(action) = self.action_rx.recv() => {
                    let name = action.name();
                    if let Err(e) = self.apply(action).await {
                        error!(action = name, error = %e, "Action failed");
                    }
                }
            }
        }
    }

    /// Depth first: a completion's effects run before the remaining
    /// siblings, so a failed step stops everything after it.
    async fn run_effects(
        &mut self,
        effects: Vec<Effect>,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut queue: VecDeque<Effect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            match effect {
                Effect::Broadcast => self.broadcast(),
                Effect::Sequence(steps) => prepend(&mut queue, steps),
                Effect::DispatchActions(actions) => {
                    let mut actions = actions.into_iter();
                    if let Some(action) = actions.next() {
                        let rest: Vec<Action> = actions.collect();
                        if !rest.is_empty() {
                            queue.push_front(Effect::DispatchActions(rest));
                        }
                        debug!(action = action.name(), "Applying follow-up action");
                        let effects = reduce(&mut self.state, action, now);
                        prepend(&mut queue, effects);
                    }
                }
                io_effect => {
                    if let Some(action) = self.runner.run(io_effect).await? {
                        queue.push_front(Effect::DispatchActions(vec![action]));
                    }
                }
            }
        }

        Ok(())
    }

    fn broadcast(&mut self) {
        self.published = self.state.clone();
        // No subscribers is fine.
        let _ = self.subscribers.send(self.state.clone());
    }
}

fn prepend(queue: &mut VecDeque<Effect>, effects: Vec<Effect>) {
    for effect in effects.into_iter().rev() {
        queue.push_front(effect);
    }
}
