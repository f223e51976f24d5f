pub mod connection;

pub use connection::{
    AuthMethod, ConnectionDescriptor, ConnectionId, ConnectionRegistry, ReadPreference,
    SshTunnelMethod, SslMethod,
};
