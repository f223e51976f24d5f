mod auth;
mod connection_string;
mod descriptor;
mod id;
mod read_preference;
mod registry;
mod ssh_tunnel;
mod tls;
mod validation;

pub use auth::{AuthMethod, AuthSettings, Credential};
pub use descriptor::{
    ConnectionDescriptor, DEFAULT_HOSTNAME, DEFAULT_PORT, MANAGED_CLOUD_HOST_SUFFIXES,
    is_managed_cloud_host,
};
pub use id::ConnectionId;
pub use read_preference::ReadPreference;
pub use registry::{ConnectionRegistry, MAX_RECENT_CONNECTIONS};
pub use ssh_tunnel::{DEFAULT_SSH_PORT, SshTunnelMethod, SshTunnelSettings};
pub use tls::{SslMethod, TlsSettings};
pub use validation::{ValidationError, is_valid, validate};
