use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// TLS/SSL mode for MongoDB connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SslMethod {
    #[default]
    #[serde(rename = "NONE")]
    None,
    /// TLS without certificate validation.
    #[serde(rename = "UNVALIDATED")]
    Unvalidated,
    /// Server validated against the given certificate authority.
    #[serde(rename = "SERVER")]
    Server,
    /// Server validated against the operating system's CA store.
    #[serde(rename = "SYSTEMCA")]
    SystemCa,
    /// Server and client validation.
    #[serde(rename = "ALL")]
    All,
}

impl SslMethod {
    pub fn all_variants() -> &'static [SslMethod] {
        &[
            SslMethod::None,
            SslMethod::Unvalidated,
            SslMethod::Server,
            SslMethod::SystemCa,
            SslMethod::All,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SslMethod::None => "NONE",
            SslMethod::Unvalidated => "UNVALIDATED",
            SslMethod::Server => "SERVER",
            SslMethod::SystemCa => "SYSTEMCA",
            SslMethod::All => "ALL",
        }
    }

    pub fn uses_tls(self) -> bool {
        !matches!(self, SslMethod::None)
    }

    pub fn requires_certificate_authority(self) -> bool {
        matches!(self, SslMethod::Server | SslMethod::All)
    }

    pub fn requires_client_certificate(self) -> bool {
        matches!(self, SslMethod::All)
    }
}

impl fmt::Display for SslMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SslMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NONE" => Ok(SslMethod::None),
            "UNVALIDATED" => Ok(SslMethod::Unvalidated),
            "SERVER" => Ok(SslMethod::Server),
            "SYSTEMCA" => Ok(SslMethod::SystemCa),
            "ALL" => Ok(SslMethod::All),
            _ => Err(format!("Unknown SSL method: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsSettings {
    pub method: SslMethod,
    pub ca_files: Vec<PathBuf>,
    pub certificate: Option<PathBuf>,
    pub private_key: Option<PathBuf>,
    pub private_key_password: String,
}

/// The driver takes one CA file and one combined certificate-and-key file.
/// Anything else has to be bundled before connecting.
impl TlsSettings {
    /// The CA file when exactly one is configured.
    pub fn ca_file(&self) -> Option<&Path> {
        match self.ca_files.as_slice() {
            [single] if self.method.requires_certificate_authority() => Some(single.as_path()),
            _ => None,
        }
    }

    pub fn needs_ca_bundle(&self) -> bool {
        self.method.requires_certificate_authority() && self.ca_files.len() > 1
    }

    /// The client key file when certificate and key share one file.
    pub fn client_key_file(&self) -> Option<&Path> {
        if !self.method.requires_client_certificate() || self.split_client_key().is_some() {
            return None;
        }
        self.certificate.as_deref().or(self.private_key.as_deref())
    }

    /// Certificate and key, when they live in separate files.
    pub fn split_client_key(&self) -> Option<(&Path, &Path)> {
        if !self.method.requires_client_certificate() {
            return None;
        }
        match (self.certificate.as_deref(), self.private_key.as_deref()) {
            (Some(certificate), Some(key)) if certificate != key => Some((certificate, key)),
            _ => None,
        }
    }

    pub fn key_password(&self) -> Option<&str> {
        (self.method.requires_client_certificate() && !self.private_key_password.is_empty())
            .then_some(self.private_key_password.as_str())
    }
}
