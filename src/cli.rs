use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, bail, eyre};
use tokio::sync::mpsc;

use crate::app::Action;
use crate::app::ConnectionStore;
use crate::app::ports::SessionHandle;
use crate::domain::connection::{
    AuthMethod, ConnectionDescriptor, ConnectionId, ReadPreference, SslMethod, validate,
};

#[derive(Parser, Debug)]
#[command(name = "mongoconnect")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compose, save and open MongoDB connections", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List favorites and recent connections
    List,
    /// Connect to a deployment and record it as recent (or favorite)
    Connect(ConnectArgs),
    /// Delete a saved connection
    Delete { id: ConnectionId },
    /// Delete every recent connection, keeping favorites
    ClearRecents,
}

#[derive(Args, Debug, Default)]
pub struct ConnectArgs {
    /// Reuse a saved connection instead of composing one
    #[arg(long, conflicts_with_all = ["host", "port", "srv"])]
    pub id: Option<ConnectionId>,
    #[arg(long)]
    pub host: Option<String>,
    #[arg(long)]
    pub port: Option<String>,
    /// Resolve the host through a DNS seedlist (mongodb+srv)
    #[arg(long)]
    pub srv: bool,
    #[arg(long)]
    pub read_preference: Option<ReadPreference>,
    #[arg(long)]
    pub replica_set: Option<String>,
    /// NONE, MONGODB, KERBEROS, LDAP or X509
    #[arg(long = "auth")]
    pub auth_method: Option<AuthMethod>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long, env = "MONGOCONNECT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    #[arg(long)]
    pub auth_source: Option<String>,
    /// NONE, UNVALIDATED, SERVER, SYSTEMCA or ALL
    #[arg(long = "tls")]
    pub ssl_method: Option<SslMethod>,
    #[arg(long = "tls-ca")]
    pub ca_files: Vec<PathBuf>,
    #[arg(long)]
    pub tls_certificate: Option<PathBuf>,
    #[arg(long)]
    pub tls_private_key: Option<PathBuf>,
    /// Save as a favorite under this name instead of as a recent
    #[arg(long)]
    pub favorite: Option<String>,
}

impl ConnectArgs {
    /// Form edits for every flag given, in form order.
    pub fn field_actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(host) = &self.host {
            actions.push(Action::HostnameChanged(host.clone()));
        }
        if let Some(port) = &self.port {
            actions.push(Action::PortChanged(port.clone()));
        }
        if self.srv {
            actions.push(Action::SrvRecordToggle);
        }
        if let Some(preference) = self.read_preference {
            actions.push(Action::ReadPreferenceChanged(preference));
        }
        if let Some(name) = &self.replica_set {
            actions.push(Action::ReplicaSetNameChanged(name.clone()));
        }
        if let Some(method) = self.auth_method {
            actions.push(Action::AuthenticationMethodChanged(method));
        }
        if let Some(username) = &self.username {
            actions.push(Action::UsernameChanged(username.clone()));
        }
        if let Some(password) = &self.password {
            actions.push(Action::PasswordChanged(password.clone()));
        }
        if let Some(source) = &self.auth_source {
            actions.push(Action::AuthSourceChanged(source.clone()));
        }
        if let Some(method) = self.ssl_method {
            actions.push(Action::SslMethodChanged(method));
        }
        if !self.ca_files.is_empty() {
            actions.push(Action::SslCaChanged(self.ca_files.clone()));
        }
        if let Some(path) = &self.tls_certificate {
            actions.push(Action::SslCertificateChanged(Some(path.clone())));
        }
        if let Some(path) = &self.tls_private_key {
            actions.push(Action::SslPrivateKeyChanged(Some(path.clone())));
        }
        actions
    }
}

/// Runs one command against an initialized store. `sessions` receives what
/// the store hands to its host.
pub async fn execute<W: Write>(
    command: Command,
    store: &mut ConnectionStore,
    sessions: &mut mpsc::UnboundedReceiver<SessionHandle>,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::List => list(store, out),
        Command::Connect(args) => connect(args, store, sessions, out).await,
        Command::Delete { id } => delete(&id, store, out).await,
        Command::ClearRecents => clear_recents(store, out).await,
    }
}

fn list<W: Write>(store: &ConnectionStore, out: &mut W) -> Result<()> {
    let registry = &store.state().connections;
    if registry.is_empty() {
        writeln!(out, "No saved connections.")?;
        return Ok(());
    }

    let favorites: Vec<_> = registry.favorites().collect();
    if !favorites.is_empty() {
        writeln!(out, "Favorites:")?;
        for d in favorites {
            writeln!(
                out,
                "  {}  {}  {}",
                d.id,
                d.display_name(),
                d.to_masked_connection_string()
            )?;
        }
    }

    let mut recents: Vec<_> = registry.recents().collect();
    if !recents.is_empty() {
        recents.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        writeln!(out, "Recent:")?;
        for d in recents {
            let used = d
                .last_used
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            writeln!(
                out,
                "  {}  {}  {}  {}",
                d.id,
                used,
                d.display_name(),
                d.to_masked_connection_string()
            )?;
        }
    }

    Ok(())
}

async fn connect<W: Write>(
    args: ConnectArgs,
    store: &mut ConnectionStore,
    sessions: &mut mpsc::UnboundedReceiver<SessionHandle>,
    out: &mut W,
) -> Result<()> {
    if let Some(id) = &args.id {
        let descriptor = find(store, id)?;
        store.apply(Action::ConnectionSelected(Box::new(descriptor))).await?;
    }
    for action in args.field_actions() {
        store.apply(action).await?;
    }

    let state = store.apply(Action::Connect).await?;
    if !state.is_valid {
        let problems: Vec<String> = validate(&state.current_connection)
            .iter()
            .map(ToString::to_string)
            .collect();
        bail!("Invalid connection: {}", problems.join("; "));
    }

    let state = store.process_next().await?;
    if !state.is_connected() {
        let message = state
            .error_message
            .unwrap_or_else(|| "Connection failed".to_string());
        bail!(message);
    }

    let session = sessions
        .try_recv()
        .map_err(|_| eyre!("Connected, but no session was handed over"))?;
    let version = session.server_version().await?;
    writeln!(out, "Connected to {} (MongoDB {})", session.label(), version)?;

    match args.favorite {
        Some(name) => {
            store.apply(Action::FavoriteNameChanged(name)).await?;
            store.apply(Action::CreateFavorite).await?;
        }
        None => {
            store.apply(Action::CreateRecent).await?;
        }
    }
    let saved = store.state().current_connection.clone();
    writeln!(out, "Saved {} as {}", saved.display_name(), saved.id)?;

    store.apply(Action::Disconnect).await?;
    Ok(())
}

async fn delete<W: Write>(
    id: &ConnectionId,
    store: &mut ConnectionStore,
    out: &mut W,
) -> Result<()> {
    let descriptor = find(store, id)?;
    let name = descriptor.display_name();
    store.apply(Action::DeleteConnection(Box::new(descriptor))).await?;
    writeln!(out, "Deleted {}", name)?;
    Ok(())
}

async fn clear_recents<W: Write>(store: &mut ConnectionStore, out: &mut W) -> Result<()> {
    let recents: Vec<ConnectionDescriptor> =
        store.state().connections.recents().cloned().collect();
    let count = recents.len();
    store.apply(Action::DeleteConnections(recents)).await?;
    writeln!(out, "Deleted {} recent connection(s)", count)?;
    Ok(())
}

fn find(store: &ConnectionStore, id: &ConnectionId) -> Result<ConnectionDescriptor> {
    store
        .state()
        .connections
        .get(id)
        .cloned()
        .ok_or_else(|| eyre!("No saved connection with id {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_connect_flags() {
        let cli = Cli::try_parse_from([
            "mongoconnect",
            "connect",
            "--host",
            "db.internal",
            "--auth",
            "mongodb",
            "--username",
            "app",
            "--tls",
            "SYSTEMCA",
            "--favorite",
            "Prod",
        ])
        .unwrap();

        let Command::Connect(args) = cli.command else {
            panic!("expected connect");
        };
        assert_eq!(args.auth_method, Some(AuthMethod::Mongodb));
        assert_eq!(args.ssl_method, Some(SslMethod::SystemCa));
        assert_eq!(args.favorite.as_deref(), Some("Prod"));
    }

    #[test]
    fn id_conflicts_with_host() {
        let result = Cli::try_parse_from(["mongoconnect", "connect", "--id", "a", "--host", "b"]);

        assert!(result.is_err());
    }

    #[test]
    fn field_actions_follow_form_order() {
        let args = ConnectArgs {
            host: Some("h".to_string()),
            srv: true,
            username: Some("u".to_string()),
            ssl_method: Some(SslMethod::None),
            ..ConnectArgs::default()
        };

        let names: Vec<_> = args.field_actions().iter().map(Action::name).collect();

        assert_eq!(
            names,
            vec!["hostname_changed", "srv_record_toggle", "username_changed", "ssl_method_changed"]
        );
    }
}
