//! Executes side effects returned by the reducer.
//!
//! Repository calls block and run on the blocking pool; the store awaits them
//! so a persistence step finishes before the next action is reduced. Connect
//! attempts are spawned and report back through the action channel.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::connect_task::spawn_connect_task;
use crate::effect::Effect;
use crate::ports::{
    ConnectionHost, ConnectionRepository, DataService, RepositoryError, SessionHandle,
};
use crate::store::StoreError;

pub struct EffectRunner {
    repository: Arc<dyn ConnectionRepository>,
    data_service: Arc<dyn DataService>,
    host: Arc<dyn ConnectionHost>,
    action_tx: mpsc::Sender<Action>,
    active_session: Option<SessionHandle>,
}

impl EffectRunner {
    pub fn new(
        repository: Arc<dyn ConnectionRepository>,
        data_service: Arc<dyn DataService>,
        host: Arc<dyn ConnectionHost>,
        action_tx: mpsc::Sender<Action>,
    ) -> Self {
        Self {
            repository,
            data_service,
            host,
            action_tx,
            active_session: None,
        }
    }

    pub fn active_session(&self) -> Option<&SessionHandle> {
        self.active_session.as_ref()
    }

    /// Runs one I/O effect. Returns the completion action to feed back
    /// through the reducer, if the effect finished synchronously.
    pub async fn run(&mut self, effect: Effect) -> Result<Option<Action>, StoreError> {
        match effect {
            Effect::LoadConnections => {
                let descriptors = self.with_repository(|repo| repo.load()).await?;
                info!(count = descriptors.len(), "Loaded saved connections");
                Ok(Some(Action::ConnectionsLoaded(descriptors)))
            }
            Effect::PersistConnection { descriptor, reason } => {
                let to_save = descriptor.as_ref().clone();
                self.with_repository(move |repo| repo.save(&to_save))
                    .await?;
                info!(
                    connection_id = %descriptor.id,
                    reason = ?reason,
                    uri = %descriptor.to_masked_connection_string(),
                    "Saved connection"
                );
                Ok(Some(Action::ConnectionPersisted { descriptor, reason }))
            }
            Effect::RemoveConnection { descriptor, reason } => {
                let id = descriptor.id.clone();
                self.with_repository(move |repo| repo.delete(&descriptor))
                    .await?;
                info!(connection_id = %id, reason = ?reason, "Removed connection");
                Ok(Some(Action::ConnectionRemoved { id, reason }))
            }

            Effect::Connect { descriptor } => {
                spawn_connect_task(
                    Arc::clone(&self.data_service),
                    *descriptor,
                    self.action_tx.clone(),
                );
                Ok(None)
            }
            Effect::HandOffSession { session } => {
                if let Some(previous) = self.active_session.replace(Arc::clone(&session)) {
                    debug!(
                        session = %previous.label(),
                        "Closing session replaced by a newer connection"
                    );
                    self.close(previous).await;
                }
                self.host.connection_established(session);
                Ok(None)
            }
            Effect::CloseSession => {
                if let Some(session) = self.active_session.take() {
                    self.close(session).await;
                }
                Ok(Some(Action::Disconnected))
            }

            Effect::Broadcast | Effect::Sequence(_) | Effect::DispatchActions(_) => {
                debug_assert!(false, "Control effect passed to EffectRunner: {:?}", effect);
                Ok(None)
            }
        }
    }

    async fn close(&self, session: SessionHandle) {
        let label = session.label().to_string();
        match self.data_service.disconnect(session).await {
            Ok(()) => info!(session = %label, "Disconnected"),
            Err(e) => warn!(session = %label, error = %e, "Disconnect failed"),
        }
    }

    async fn with_repository<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn ConnectionRepository) -> Result<T, RepositoryError> + Send + 'static,
    {
        let repository = Arc::clone(&self.repository);
        let result = tokio::task::spawn_blocking(move || f(repository.as_ref()))
            .await
            .map_err(|e| StoreError::TaskFailed(format!("Task panicked: {}", e)))?;
        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::connection::{ConnectionDescriptor, ConnectionId};
    use crate::effect::{PersistReason, RemovalReason};
    use crate::ports::{MockConnectionHost, MockConnectionRepository};
    use crate::test_support::{FakeDataService, FakeSession};

    fn runner(
        repository: MockConnectionRepository,
        data_service: Arc<FakeDataService>,
        host: MockConnectionHost,
    ) -> (EffectRunner, mpsc::Receiver<Action>) {
        let (tx, rx) = mpsc::channel(8);
        (
            EffectRunner::new(Arc::new(repository), data_service, Arc::new(host), tx),
            rx,
        )
    }

    mod persistence {
        use super::*;

        #[tokio::test]
        async fn load_returns_loaded_action() {
            let mut repository = MockConnectionRepository::new();
            repository
                .expect_load()
                .times(1)
                .returning(|| Ok(vec![ConnectionDescriptor::new()]));
            let (mut runner, _rx) = runner(
                repository,
                Arc::new(FakeDataService::succeeding()),
                MockConnectionHost::new(),
            );

            let action = runner.run(Effect::LoadConnections).await.unwrap();

            assert!(matches!(action, Some(Action::ConnectionsLoaded(ref d)) if d.len() == 1));
        }

        #[tokio::test]
        async fn save_failure_is_propagated() {
            let mut repository = MockConnectionRepository::new();
            repository
                .expect_save()
                .returning(|_| Err(RepositoryError::WriteError("read-only".to_string())));
            let (mut runner, _rx) = runner(
                repository,
                Arc::new(FakeDataService::succeeding()),
                MockConnectionHost::new(),
            );

            let result = runner
                .run(Effect::PersistConnection {
                    descriptor: Box::new(ConnectionDescriptor::new()),
                    reason: PersistReason::Favorite,
                })
                .await;

            assert!(matches!(
                result,
                Err(StoreError::Repository(RepositoryError::WriteError(_)))
            ));
        }

        #[tokio::test]
        async fn remove_reports_id_and_reason() {
            let mut repository = MockConnectionRepository::new();
            repository
                .expect_delete()
                .withf(|d| d.id.as_str() == "gone")
                .times(1)
                .returning(|_| Ok(()));
            let (mut runner, _rx) = runner(
                repository,
                Arc::new(FakeDataService::succeeding()),
                MockConnectionHost::new(),
            );
            let descriptor = ConnectionDescriptor {
                id: ConnectionId::from("gone"),
                ..ConnectionDescriptor::new()
            };

            let action = runner
                .run(Effect::RemoveConnection {
                    descriptor: Box::new(descriptor),
                    reason: RemovalReason::Evicted,
                })
                .await
                .unwrap();

            match action {
                Some(Action::ConnectionRemoved { id, reason }) => {
                    assert_eq!(id.as_str(), "gone");
                    assert_eq!(reason, RemovalReason::Evicted);
                }
                other => panic!("unexpected action: {:?}", other),
            }
        }

        struct PanicRepository;

        impl ConnectionRepository for PanicRepository {
            fn load(&self) -> Result<Vec<ConnectionDescriptor>, RepositoryError> {
                panic!("corrupt")
            }

            fn save(&self, _descriptor: &ConnectionDescriptor) -> Result<(), RepositoryError> {
                Ok(())
            }

            fn delete(&self, _descriptor: &ConnectionDescriptor) -> Result<(), RepositoryError> {
                Ok(())
            }

            fn storage_path(&self) -> std::path::PathBuf {
                std::path::PathBuf::new()
            }
        }

        #[tokio::test]
        async fn panicking_repository_becomes_task_failure() {
            let (tx, _rx) = mpsc::channel(8);
            let mut runner = EffectRunner::new(
                Arc::new(PanicRepository),
                Arc::new(FakeDataService::succeeding()),
                Arc::new(MockConnectionHost::new()),
                tx,
            );

            let result = runner.run(Effect::LoadConnections).await;

            assert!(matches!(result, Err(StoreError::TaskFailed(_))));
        }
    }

    mod sessions {
        use super::*;

        #[tokio::test]
        async fn hand_off_notifies_host_once() {
            let mut host = MockConnectionHost::new();
            host.expect_connection_established().times(1).return_const(());
            let (mut runner, _rx) = runner(
                MockConnectionRepository::new(),
                Arc::new(FakeDataService::succeeding()),
                host,
            );
            let session: SessionHandle = Arc::new(FakeSession::new(ConnectionId::from("c")));

            let action = runner
                .run(Effect::HandOffSession { session })
                .await
                .unwrap();

            assert!(action.is_none());
            assert!(runner.active_session().is_some());
        }

        #[tokio::test]
        async fn close_disconnects_active_session() {
            let mut host = MockConnectionHost::new();
            host.expect_connection_established().return_const(());
            let data_service = Arc::new(FakeDataService::succeeding());
            let (mut runner, _rx) = runner(
                MockConnectionRepository::new(),
                Arc::clone(&data_service),
                host,
            );
            let fake = Arc::new(FakeSession::new(ConnectionId::from("c")));
            let session: SessionHandle = Arc::clone(&fake) as _;
            runner
                .run(Effect::HandOffSession { session })
                .await
                .unwrap();

            let action = runner.run(Effect::CloseSession).await.unwrap();

            assert!(matches!(action, Some(Action::Disconnected)));
            assert_eq!(data_service.disconnect_calls(), 1);
            assert!(fake.is_closed());
            assert!(runner.active_session().is_none());
        }

        #[tokio::test]
        async fn newer_hand_off_closes_replaced_session() {
            let mut host = MockConnectionHost::new();
            host.expect_connection_established().times(2).return_const(());
            let data_service = Arc::new(FakeDataService::succeeding());
            let (mut runner, _rx) = runner(
                MockConnectionRepository::new(),
                Arc::clone(&data_service),
                host,
            );
            let first = Arc::new(FakeSession::new(ConnectionId::from("first")));
            let second = Arc::new(FakeSession::new(ConnectionId::from("second")));

            for fake in [&first, &second] {
                let session: SessionHandle = Arc::clone(fake) as _;
                runner
                    .run(Effect::HandOffSession { session })
                    .await
                    .unwrap();
            }

            assert!(first.is_closed());
            assert!(!second.is_closed());
            assert_eq!(data_service.disconnect_calls(), 1);
            let active = runner.active_session().unwrap();
            assert_eq!(active.connection_id().as_str(), "second");
        }

        #[tokio::test]
        async fn close_without_session_still_completes() {
            let data_service = Arc::new(FakeDataService::succeeding());
            let (mut runner, _rx) = runner(
                MockConnectionRepository::new(),
                Arc::clone(&data_service),
                MockConnectionHost::new(),
            );

            let action = runner.run(Effect::CloseSession).await.unwrap();

            assert!(matches!(action, Some(Action::Disconnected)));
            assert_eq!(data_service.disconnect_calls(), 0);
        }

        #[tokio::test]
        async fn connect_reports_through_channel() {
            let data_service = Arc::new(FakeDataService::failing("refused"));
            let (mut runner, mut rx) = runner(
                MockConnectionRepository::new(),
                Arc::clone(&data_service),
                MockConnectionHost::new(),
            );

            let action = runner
                .run(Effect::Connect {
                    descriptor: Box::new(ConnectionDescriptor::new()),
                })
                .await
                .unwrap();

            assert!(action.is_none());
            assert!(matches!(
                rx.recv().await,
                Some(Action::ConnectFailed(ref m)) if m == "refused"
            ));
            assert_eq!(data_service.connect_calls(), 1);
        }
    }
}
