pub mod fixtures;

use std::sync::Arc;

use tempfile::TempDir;
use tokio::sync::mpsc;

use mongoconnect::app::ConnectionStore;
use mongoconnect::app::ports::SessionHandle;
use mongoconnect::app::test_support::FakeDataService;
use mongoconnect::infra::adapters::{ChannelHost, TomlConnectionRepository};

/// A store wired to a TOML repository in a temp dir and a fake data service.
pub struct TestApp {
    pub store: ConnectionStore,
    pub sessions: mpsc::UnboundedReceiver<SessionHandle>,
    pub data_service: Arc<FakeDataService>,
    pub dir: TempDir,
}

impl TestApp {
    pub async fn start(data_service: FakeDataService) -> Self {
        Self::start_in(TempDir::new().unwrap(), data_service).await
    }

    /// Reopens a store over an existing directory, as a second process would.
    pub async fn start_in(dir: TempDir, data_service: FakeDataService) -> Self {
        let repository = TomlConnectionRepository::with_config_dir(dir.path().to_path_buf());
        let data_service = Arc::new(data_service);
        let (host, sessions) = ChannelHost::new();
        let mut store = ConnectionStore::new(
            Arc::new(repository),
            Arc::clone(&data_service) as _,
            Arc::new(host),
        );
        store.init().await.unwrap();
        Self {
            store,
            sessions,
            data_service,
            dir,
        }
    }

    pub async fn restart(self, data_service: FakeDataService) -> Self {
        Self::start_in(self.dir, data_service).await
    }

    pub fn repository(&self) -> TomlConnectionRepository {
        TomlConnectionRepository::with_config_dir(self.dir.path().to_path_buf())
    }
}
