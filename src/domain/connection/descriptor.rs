use chrono::{DateTime, Utc};

use super::auth::AuthSettings;
use super::id::ConnectionId;
use super::read_preference::ReadPreference;
use super::ssh_tunnel::SshTunnelSettings;
use super::tls::TlsSettings;

pub const DEFAULT_HOSTNAME: &str = "localhost";
pub const DEFAULT_PORT: &str = "27017";

/// Hostnames that are only reachable over TLS with the system CA store.
pub const MANAGED_CLOUD_HOST_SUFFIXES: &[&str] = &["mongodb.net"];

/// Everything needed to reach one MongoDB deployment.
///
/// A descriptor is a favorite when `is_favorite` is set and a recent when it
/// carries `last_used` without being a favorite. Connecting from a favorite
/// stamps `last_used` but keeps it a favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    pub id: ConnectionId,
    /// Favorite name. Empty for recents.
    pub name: String,
    pub hostname: String,
    /// Kept as entered so the form can hold partial input.
    pub port: String,
    pub is_srv_record: bool,
    pub read_preference: ReadPreference,
    pub replica_set_name: Option<String>,
    pub auth: AuthSettings,
    pub tls: TlsSettings,
    pub ssh_tunnel: SshTunnelSettings,
    pub is_favorite: bool,
    pub last_used: Option<DateTime<Utc>>,
}

impl ConnectionDescriptor {
    pub fn new() -> Self {
        Self {
            id: ConnectionId::generate(),
            name: String::new(),
            hostname: DEFAULT_HOSTNAME.to_string(),
            port: DEFAULT_PORT.to_string(),
            is_srv_record: false,
            read_preference: ReadPreference::default(),
            replica_set_name: None,
            auth: AuthSettings::default(),
            tls: TlsSettings::default(),
            ssh_tunnel: SshTunnelSettings::default(),
            is_favorite: false,
            last_used: None,
        }
    }

    pub fn is_recent(&self) -> bool {
        !self.is_favorite && self.last_used.is_some()
    }

    pub fn port_number(&self) -> Option<u16> {
        self.port.trim().parse::<u16>().ok().filter(|p| *p > 0)
    }

    /// Favorite name, or `host:port` for anything unnamed.
    pub fn display_name(&self) -> String {
        let name = self.name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        if self.is_srv_record {
            self.hostname.clone()
        } else {
            format!("{}:{}", self.hostname, self.port)
        }
    }

    pub fn is_managed_cloud_host(&self) -> bool {
        is_managed_cloud_host(&self.hostname)
    }
}

impl Default for ConnectionDescriptor {
    fn default() -> Self {
        Self::new()
    }
}

pub fn is_managed_cloud_host(hostname: &str) -> bool {
    let lower = hostname.to_lowercase();
    MANAGED_CLOUD_HOST_SUFFIXES
        .iter()
        .any(|suffix| lower.contains(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn new_descriptor_points_at_local_default() {
        let d = ConnectionDescriptor::new();

        assert_eq!(d.hostname, "localhost");
        assert_eq!(d.port, "27017");
        assert!(!d.is_favorite);
        assert!(d.last_used.is_none());
        assert!(!d.is_recent());
    }

    #[test]
    fn new_descriptors_get_distinct_ids() {
        assert_ne!(ConnectionDescriptor::new().id, ConnectionDescriptor::new().id);
    }

    mod is_recent {
        use super::*;

        #[test]
        fn used_non_favorite_is_recent() {
            let d = ConnectionDescriptor {
                last_used: Some(Utc::now()),
                ..ConnectionDescriptor::new()
            };
            assert!(d.is_recent());
        }

        #[test]
        fn used_favorite_is_not_recent() {
            let d = ConnectionDescriptor {
                is_favorite: true,
                last_used: Some(Utc::now()),
                ..ConnectionDescriptor::new()
            };
            assert!(!d.is_recent());
        }
    }

    #[rstest]
    #[case("27017", Some(27017))]
    #[case(" 27018 ", Some(27018))]
    #[case("0", None)]
    #[case("70000", None)]
    #[case("abc", None)]
    #[case("", None)]
    fn port_number_parses_valid_ports(#[case] port: &str, #[case] expected: Option<u16>) {
        let d = ConnectionDescriptor {
            port: port.to_string(),
            ..ConnectionDescriptor::new()
        };
        assert_eq!(d.port_number(), expected);
    }

    mod display_name {
        use super::*;

        #[test]
        fn uses_favorite_name() {
            let d = ConnectionDescriptor {
                name: "Prod".to_string(),
                ..ConnectionDescriptor::new()
            };
            assert_eq!(d.display_name(), "Prod");
        }

        #[test]
        fn falls_back_to_host_and_port() {
            assert_eq!(ConnectionDescriptor::new().display_name(), "localhost:27017");
        }

        #[test]
        fn srv_records_omit_the_port() {
            let d = ConnectionDescriptor {
                hostname: "cluster0.example.com".to_string(),
                is_srv_record: true,
                ..ConnectionDescriptor::new()
            };
            assert_eq!(d.display_name(), "cluster0.example.com");
        }
    }

    #[rstest]
    #[case("cluster0-shard-00-00.abcde.mongodb.net", true)]
    #[case("CLUSTER0.MONGODB.NET", true)]
    #[case("localhost", false)]
    #[case("mongodb.example.com", false)]
    fn detects_managed_cloud_hosts(#[case] host: &str, #[case] expected: bool) {
        assert_eq!(is_managed_cloud_host(host), expected);
    }
}
