use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::debug;

use mongoconnect::app::ports::{ConnectionRepository, RepositoryError};
use mongoconnect::app::{ConnectionStore, StoreError};
use mongoconnect::cli::{self, Cli};
use mongoconnect::infra::adapters::{ChannelHost, MongoDataService, TomlConnectionRepository};
use mongoconnect::infra::config::Settings;
use mongoconnect::{error, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    error::install_hooks()?;
    logging::init();

    let args = Cli::parse();
    let settings = Settings::load()?;

    let repository = TomlConnectionRepository::new()?;
    let storage_path = repository.storage_path();
    debug!(path = %storage_path.display(), "Using connections file");
    let (host, mut sessions) = ChannelHost::new();
    let mut store = ConnectionStore::new(
        Arc::new(repository),
        Arc::new(MongoDataService::new(settings)),
        Arc::new(host),
    );

    match store.init().await {
        Ok(_) => {}
        Err(StoreError::Repository(RepositoryError::VersionMismatch { found, expected })) => {
            print_version_hint(found, expected, &storage_path);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    }

    cli::execute(args.command, &mut store, &mut sessions, &mut std::io::stdout()).await
}

#[allow(clippy::print_stderr, reason = "startup hint printed before exit")]
fn print_version_hint(found: u32, expected: u32, path: &Path) {
    eprintln!(
        "Error: Connections file version mismatch (found v{}, expected v{}).\n\
         Please delete {} and save your connections again.",
        found,
        expected,
        path.display()
    );
}
