use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::connection::{
    AuthMethod, AuthSettings, ConnectionDescriptor, ConnectionId, DEFAULT_HOSTNAME, DEFAULT_PORT,
    DEFAULT_SSH_PORT, ReadPreference, SshTunnelMethod, SshTunnelSettings, SslMethod,
    TlsSettings,
};

pub const CURRENT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectionsFile {
    pub version: u32,
    #[serde(default)]
    pub connections: Vec<ConnectionEntry>,
}

/// One saved connection as written to disk. Empty optional fields are
/// omitted so hand-edited files stay short.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionEntry {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default = "default_hostname")]
    pub hostname: String,
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_srv_record: bool,
    #[serde(default)]
    pub read_preference: ReadPreference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica_set_name: Option<String>,

    #[serde(default)]
    pub auth_method: AuthMethod,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub auth_source: String,

    #[serde(default)]
    pub ssl_method: SslMethod,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ssl_ca: Vec<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_certificate: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssl_private_key: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssl_private_key_password: String,

    #[serde(default)]
    pub ssh_tunnel: SshTunnelMethod,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssh_tunnel_hostname: String,
    #[serde(default = "default_ssh_port")]
    pub ssh_tunnel_port: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssh_tunnel_username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssh_tunnel_password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssh_tunnel_passphrase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_tunnel_identity_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

fn default_hostname() -> String {
    DEFAULT_HOSTNAME.to_string()
}

fn default_port() -> String {
    DEFAULT_PORT.to_string()
}

fn default_ssh_port() -> String {
    DEFAULT_SSH_PORT.to_string()
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ConnectionsFile {
    pub fn from_descriptors(descriptors: &[ConnectionDescriptor]) -> Self {
        Self {
            version: CURRENT_VERSION,
            connections: descriptors.iter().map(ConnectionEntry::from_descriptor).collect(),
        }
    }

    /// Entries with a blank id are skipped.
    pub fn to_descriptors(&self) -> Vec<ConnectionDescriptor> {
        self.connections
            .iter()
            .filter_map(ConnectionEntry::to_descriptor)
            .collect()
    }
}

impl ConnectionEntry {
    pub fn from_descriptor(d: &ConnectionDescriptor) -> Self {
        Self {
            id: d.id.as_str().to_string(),
            name: d.name.clone(),
            hostname: d.hostname.clone(),
            port: d.port.clone(),
            is_srv_record: d.is_srv_record,
            read_preference: d.read_preference,
            replica_set_name: d.replica_set_name.clone(),
            auth_method: d.auth.method,
            username: d.auth.username.clone(),
            password: d.auth.password.clone(),
            auth_source: d.auth.auth_source.clone(),
            ssl_method: d.tls.method,
            ssl_ca: d.tls.ca_files.clone(),
            ssl_certificate: d.tls.certificate.clone(),
            ssl_private_key: d.tls.private_key.clone(),
            ssl_private_key_password: d.tls.private_key_password.clone(),
            ssh_tunnel: d.ssh_tunnel.method,
            ssh_tunnel_hostname: d.ssh_tunnel.hostname.clone(),
            ssh_tunnel_port: d.ssh_tunnel.port.clone(),
            ssh_tunnel_username: d.ssh_tunnel.username.clone(),
            ssh_tunnel_password: d.ssh_tunnel.password.clone(),
            ssh_tunnel_passphrase: d.ssh_tunnel.passphrase.clone(),
            ssh_tunnel_identity_file: d.ssh_tunnel.identity_file.clone(),
            is_favorite: d.is_favorite,
            last_used: d.last_used,
        }
    }

    pub fn to_descriptor(&self) -> Option<ConnectionDescriptor> {
        let id: ConnectionId = self.id.parse().ok()?;
        Some(ConnectionDescriptor {
            id,
            name: self.name.clone(),
            hostname: self.hostname.clone(),
            port: self.port.clone(),
            is_srv_record: self.is_srv_record,
            read_preference: self.read_preference,
            replica_set_name: self.replica_set_name.clone(),
            auth: AuthSettings {
                method: self.auth_method,
                username: self.username.clone(),
                password: self.password.clone(),
                auth_source: self.auth_source.clone(),
            },
            tls: TlsSettings {
                method: self.ssl_method,
                ca_files: self.ssl_ca.clone(),
                certificate: self.ssl_certificate.clone(),
                private_key: self.ssl_private_key.clone(),
                private_key_password: self.ssl_private_key_password.clone(),
            },
            ssh_tunnel: SshTunnelSettings {
                method: self.ssh_tunnel,
                hostname: self.ssh_tunnel_hostname.clone(),
                port: self.ssh_tunnel_port.clone(),
                username: self.ssh_tunnel_username.clone(),
                password: self.ssh_tunnel_password.clone(),
                passphrase: self.ssh_tunnel_passphrase.clone(),
                identity_file: self.ssh_tunnel_identity_file.clone(),
            },
            is_favorite: self.is_favorite,
            last_used: self.last_used,
        })
    }
}
