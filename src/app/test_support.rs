//! In-memory collaborators for exercising the store without I/O.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::connection::{ConnectionDescriptor, ConnectionId};
use crate::ports::{
    ConnectionHost, ConnectionRepository, DataService, DataServiceError, DataSession,
    RepositoryError, SessionHandle,
};

#[derive(Debug)]
pub struct FakeSession {
    id: ConnectionId,
    label: String,
    closed: AtomicBool,
}

impl FakeSession {
    pub fn new(id: ConnectionId) -> Self {
        Self {
            label: format!("fake:{}", id),
            id,
            closed: AtomicBool::new(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSession for FakeSession {
    fn connection_id(&self) -> &ConnectionId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    async fn server_version(&self) -> Result<String, DataServiceError> {
        Ok("7.0.0".to_string())
    }

    async fn close(&self) -> Result<(), DataServiceError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Outcome {
    Succeed,
    Fail(String),
    Panic,
}

/// Data service that never touches the network.
#[derive(Debug)]
pub struct FakeDataService {
    outcome: Outcome,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
}

impl FakeDataService {
    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Self {
        Self::with_outcome(Outcome::Succeed)
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_outcome(Outcome::Fail(message.into()))
    }

    pub fn panicking() -> Self {
        Self::with_outcome(Outcome::Panic)
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataService for FakeDataService {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<SessionHandle, DataServiceError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Succeed => Ok(Arc::new(FakeSession::new(descriptor.id.clone()))),
            Outcome::Fail(message) => Err(DataServiceError::ConnectionFailed(message.clone())),
            Outcome::Panic => panic!("fake data service panic"),
        }
    }

    async fn disconnect(&self, session: SessionHandle) -> Result<(), DataServiceError> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        session.close().await
    }
}

/// Repository backed by a vector, with switchable write failures.
#[derive(Debug, Default)]
pub struct InMemoryConnectionRepository {
    entries: Mutex<Vec<ConnectionDescriptor>>,
    fail_writes: AtomicBool,
}

impl InMemoryConnectionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<ConnectionDescriptor>) -> Self {
        Self {
            entries: Mutex::new(entries),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn entries(&self) -> Vec<ConnectionDescriptor> {
        self.entries.lock().unwrap().clone()
    }
}

impl ConnectionRepository for InMemoryConnectionRepository {
    fn load(&self) -> Result<Vec<ConnectionDescriptor>, RepositoryError> {
        Ok(self.entries())
    }

    fn save(&self, descriptor: &ConnectionDescriptor) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::WriteError("disk full".to_string()));
        }
        let mut entries = self.entries.lock().unwrap();
        match entries.iter_mut().find(|d| d.id == descriptor.id) {
            Some(existing) => *existing = descriptor.clone(),
            None => entries.push(descriptor.clone()),
        }
        Ok(())
    }

    fn delete(&self, descriptor: &ConnectionDescriptor) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::WriteError("disk full".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .retain(|d| d.id != descriptor.id);
        Ok(())
    }

    fn storage_path(&self) -> PathBuf {
        PathBuf::from(":memory:")
    }
}

/// Host that keeps every session it is handed.
#[derive(Debug, Default)]
pub struct RecordingHost {
    sessions: Mutex<Vec<SessionHandle>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> Vec<SessionHandle> {
        self.sessions.lock().unwrap().clone()
    }
}

impl ConnectionHost for RecordingHost {
    fn connection_established(&self, session: SessionHandle) {
        self.sessions.lock().unwrap().push(session);
    }
}
