use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Authentication mechanism offered by the connection form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMethod {
    #[default]
    None,
    Mongodb,
    Kerberos,
    Ldap,
    X509,
}

/// A credential field on the descriptor that a method may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Credential {
    Username,
    Password,
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => write!(f, "username"),
            Self::Password => write!(f, "password"),
        }
    }
}

impl AuthMethod {
    pub fn all_variants() -> &'static [AuthMethod] {
        &[
            AuthMethod::None,
            AuthMethod::Mongodb,
            AuthMethod::Kerberos,
            AuthMethod::Ldap,
            AuthMethod::X509,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuthMethod::None => "NONE",
            AuthMethod::Mongodb => "MONGODB",
            AuthMethod::Kerberos => "KERBEROS",
            AuthMethod::Ldap => "LDAP",
            AuthMethod::X509 => "X509",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AuthMethod::None => "None",
            AuthMethod::Mongodb => "Username / Password",
            AuthMethod::Kerberos => "Kerberos",
            AuthMethod::Ldap => "LDAP",
            AuthMethod::X509 => "X.509",
        }
    }

    /// Kerberos takes an optional password; X.509 only names the certificate subject.
    pub fn required_credentials(self) -> &'static [Credential] {
        match self {
            AuthMethod::None => &[],
            AuthMethod::Mongodb | AuthMethod::Ldap => &[Credential::Username, Credential::Password],
            AuthMethod::Kerberos | AuthMethod::X509 => &[Credential::Username],
        }
    }

    /// `authMechanism` URI option. `None` lets the driver negotiate SCRAM.
    pub fn mechanism(self) -> Option<&'static str> {
        match self {
            AuthMethod::None | AuthMethod::Mongodb => None,
            AuthMethod::Kerberos => Some("GSSAPI"),
            AuthMethod::Ldap => Some("PLAIN"),
            AuthMethod::X509 => Some("MONGODB-X509"),
        }
    }

    pub fn default_auth_source(self) -> Option<&'static str> {
        match self {
            AuthMethod::None => None,
            AuthMethod::Mongodb => Some("admin"),
            AuthMethod::Kerberos | AuthMethod::Ldap | AuthMethod::X509 => Some("$external"),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuthMethod::all_variants()
            .iter()
            .copied()
            .find(|method| method.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown authentication method: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSettings {
    pub method: AuthMethod,
    pub username: String,
    pub password: String,
    /// Database holding the user's credentials (`authSource`).
    pub auth_source: String,
}

impl AuthSettings {
    pub fn missing_credentials(&self) -> Vec<Credential> {
        self.method
            .required_credentials()
            .iter()
            .copied()
            .filter(|credential| match credential {
                Credential::Username => self.username.trim().is_empty(),
                Credential::Password => self.password.is_empty(),
            })
            .collect()
    }

    pub fn effective_auth_source(&self) -> Option<&str> {
        if self.method == AuthMethod::None {
            return None;
        }
        let explicit = self.auth_source.trim();
        if explicit.is_empty() {
            self.method.default_auth_source()
        } else {
            Some(explicit)
        }
    }
}
