use std::path::PathBuf;

use crate::domain::connection::{
    AuthMethod, ConnectionDescriptor, ConnectionId, ReadPreference, SshTunnelMethod, SslMethod,
};
use crate::effect::{PersistReason, RemovalReason};
use crate::ports::SessionHandle;

/// Everything that can change the store's state.
///
/// The first group is dispatched by callers. The second group is produced
/// by the effect runner when a side effect completes.
#[derive(Debug, Clone)]
pub enum Action {
    ResetConnection,

    // Draft field edits
    HostnameChanged(String),
    PortChanged(String),
    ReadPreferenceChanged(ReadPreference),
    /// Empty clears the replica set.
    ReplicaSetNameChanged(String),
    AuthenticationMethodChanged(AuthMethod),
    UsernameChanged(String),
    PasswordChanged(String),
    AuthSourceChanged(String),
    SslMethodChanged(SslMethod),
    SslCaChanged(Vec<PathBuf>),
    SslCertificateChanged(Option<PathBuf>),
    SslPrivateKeyChanged(Option<PathBuf>),
    SslPrivateKeyPasswordChanged(String),
    FavoriteNameChanged(String),
    SshTunnelChanged(SshTunnelMethod),
    SshTunnelHostnameChanged(String),
    SshTunnelPortChanged(String),
    SshTunnelUsernameChanged(String),
    SshTunnelPasswordChanged(String),
    SshTunnelPassphraseChanged(String),
    SshTunnelIdentityFileChanged(Option<PathBuf>),
    SrvRecordToggle,

    // Registry
    CreateFavorite,
    CreateRecent,
    ConnectionSelected(Box<ConnectionDescriptor>),
    SaveConnection(Box<ConnectionDescriptor>),
    DeleteConnection(Box<ConnectionDescriptor>),
    DeleteConnections(Vec<ConnectionDescriptor>),

    // Lifecycle
    Connect,
    Disconnect,

    // Navigation intents handled by the host, ignored here
    VisitAtlasLink,
    AtlasLearnMore,

    // Effect completions
    LoadConnections,
    ConnectionsLoaded(Vec<ConnectionDescriptor>),
    ConnectionPersisted {
        descriptor: Box<ConnectionDescriptor>,
        reason: PersistReason,
    },
    ConnectionRemoved {
        id: ConnectionId,
        reason: RemovalReason,
    },
    ConnectSucceeded(SessionHandle),
    ConnectFailed(String),
    Disconnected,
}

impl Action {
    /// Stable name for logs. Never includes the payload, which may hold secrets.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResetConnection => "reset_connection",
            Self::HostnameChanged(_) => "hostname_changed",
            Self::PortChanged(_) => "port_changed",
            Self::ReadPreferenceChanged(_) => "read_preference_changed",
            Self::ReplicaSetNameChanged(_) => "replica_set_name_changed",
            Self::AuthenticationMethodChanged(_) => "authentication_method_changed",
            Self::UsernameChanged(_) => "username_changed",
            Self::PasswordChanged(_) => "password_changed",
            Self::AuthSourceChanged(_) => "auth_source_changed",
            Self::SslMethodChanged(_) => "ssl_method_changed",
            Self::SslCaChanged(_) => "ssl_ca_changed",
            Self::SslCertificateChanged(_) => "ssl_certificate_changed",
            Self::SslPrivateKeyChanged(_) => "ssl_private_key_changed",
            Self::SslPrivateKeyPasswordChanged(_) => "ssl_private_key_password_changed",
            Self::FavoriteNameChanged(_) => "favorite_name_changed",
            Self::SshTunnelChanged(_) => "ssh_tunnel_changed",
            Self::SshTunnelHostnameChanged(_) => "ssh_tunnel_hostname_changed",
            Self::SshTunnelPortChanged(_) => "ssh_tunnel_port_changed",
            Self::SshTunnelUsernameChanged(_) => "ssh_tunnel_username_changed",
            Self::SshTunnelPasswordChanged(_) => "ssh_tunnel_password_changed",
            Self::SshTunnelPassphraseChanged(_) => "ssh_tunnel_passphrase_changed",
            Self::SshTunnelIdentityFileChanged(_) => "ssh_tunnel_identity_file_changed",
            Self::SrvRecordToggle => "srv_record_toggle",
            Self::CreateFavorite => "create_favorite",
            Self::CreateRecent => "create_recent",
            Self::ConnectionSelected(_) => "connection_selected",
            Self::SaveConnection(_) => "save_connection",
            Self::DeleteConnection(_) => "delete_connection",
            Self::DeleteConnections(_) => "delete_connections",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::VisitAtlasLink => "visit_atlas_link",
            Self::AtlasLearnMore => "atlas_learn_more",
            Self::LoadConnections => "load_connections",
            Self::ConnectionsLoaded(_) => "connections_loaded",
            Self::ConnectionPersisted { .. } => "connection_persisted",
            Self::ConnectionRemoved { .. } => "connection_removed",
            Self::ConnectSucceeded(_) => "connect_succeeded",
            Self::ConnectFailed(_) => "connect_failed",
            Self::Disconnected => "disconnected",
        }
    }
}
