use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_SSH_PORT: &str = "22";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SshTunnelMethod {
    #[default]
    None,
    UserPassword,
    IdentityFile,
}

impl SshTunnelMethod {
    pub fn all_variants() -> &'static [SshTunnelMethod] {
        &[
            SshTunnelMethod::None,
            SshTunnelMethod::UserPassword,
            SshTunnelMethod::IdentityFile,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SshTunnelMethod::None => "NONE",
            SshTunnelMethod::UserPassword => "USER_PASSWORD",
            SshTunnelMethod::IdentityFile => "IDENTITY_FILE",
        }
    }
}

impl fmt::Display for SshTunnelMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SshTunnelMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        SshTunnelMethod::all_variants()
            .iter()
            .copied()
            .find(|method| method.as_str() == normalized)
            .ok_or_else(|| format!("Unknown SSH tunnel method: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTunnelSettings {
    pub method: SshTunnelMethod,
    pub hostname: String,
    pub port: String,
    pub username: String,
    pub password: String,
    pub passphrase: String,
    pub identity_file: Option<PathBuf>,
}

impl Default for SshTunnelSettings {
    fn default() -> Self {
        Self {
            method: SshTunnelMethod::None,
            hostname: String::new(),
            port: DEFAULT_SSH_PORT.to_string(),
            username: String::new(),
            password: String::new(),
            passphrase: String::new(),
            identity_file: None,
        }
    }
}

impl SshTunnelSettings {
    pub fn is_enabled(&self) -> bool {
        self.method != SshTunnelMethod::None
    }
}
