use std::sync::OnceLock;

use regex::Regex;

static URI_RE: OnceLock<Regex> = OnceLock::new();
static PARAM_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectErrorKind {
    HostUnreachable,
    AuthFailed,
    TlsFailed,
    Timeout,
    #[default]
    Unknown,
}

impl ConnectErrorKind {
    pub fn classify(details: &str) -> Self {
        let lower = details.to_lowercase();

        if lower.contains("connection refused")
            || lower.contains("failed to lookup address")
            || lower.contains("name or service not known")
            || lower.contains("nodename nor servname provided")
            || lower.contains("no such host")
            || lower.contains("network is unreachable")
        {
            return Self::HostUnreachable;
        }

        if lower.contains("authentication failed")
            || lower.contains("scram failure")
            || lower.contains("auth error")
        {
            return Self::AuthFailed;
        }

        if lower.contains("certificate")
            || lower.contains("tls handshake")
            || lower.contains("invalid peer certificate")
            || lower.contains("ssl")
        {
            return Self::TlsFailed;
        }

        if lower.contains("timed out") || lower.contains("timeout") {
            return Self::Timeout;
        }

        Self::Unknown
    }

    pub fn summary(&self) -> &'static str {
        match self {
            Self::HostUnreachable => "MongoDB not running on the provided host and port",
            Self::AuthFailed => "Authentication failed",
            Self::TlsFailed => "TLS negotiation failed",
            Self::Timeout => "Connection timed out",
            Self::Unknown => "Connection failed",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::HostUnreachable => "Check the hostname and port",
            Self::AuthFailed => "Check username, password and authentication database",
            Self::TlsFailed => "Check the SSL method and certificate files",
            Self::Timeout => "Check network connectivity",
            Self::Unknown => "See details for more information",
        }
    }
}

/// A data service failure, classified and stripped of credentials.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectErrorInfo {
    pub kind: ConnectErrorKind,
    pub raw_details: String,
    pub masked_details: String,
}

impl ConnectErrorInfo {
    pub fn new(raw_details: impl Into<String>) -> Self {
        let raw_details = raw_details.into();
        let kind = ConnectErrorKind::classify(&raw_details);
        let masked_details = Self::mask_password(&raw_details);

        Self {
            kind,
            raw_details,
            masked_details,
        }
    }

    pub fn summary(&self) -> &'static str {
        self.kind.summary()
    }

    pub fn hint(&self) -> &'static str {
        self.kind.hint()
    }

    /// What ends up in the store's `error_message`.
    pub fn message(&self) -> String {
        if self.masked_details.trim().is_empty() {
            return self.summary().to_string();
        }
        format!("{}: {}", self.summary(), self.masked_details)
    }

    fn mask_password(text: &str) -> String {
        let uri_re = URI_RE.get_or_init(|| {
            Regex::new(r"(?i)(mongodb(?:\+srv)?://[^:/@\s]+:)[^@\s]+(@)").unwrap()
        });
        let result = uri_re.replace_all(text, "${1}****${2}");

        let param_re = PARAM_RE.get_or_init(|| Regex::new(r"(?i)(password=)[^\s&]+").unwrap());
        param_re.replace_all(&result, "${1}****").into_owned()
    }
}
