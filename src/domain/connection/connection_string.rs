use std::path::Path;

use super::auth::AuthMethod;
use super::descriptor::ConnectionDescriptor;
use super::read_preference::ReadPreference;
use super::tls::SslMethod;

const MASK: &str = "****";

impl ConnectionDescriptor {
    pub fn to_connection_string(&self) -> String {
        render(self, false)
    }

    /// For logging - password replaced with ****
    pub fn to_masked_connection_string(&self) -> String {
        render(self, true)
    }
}

fn render(d: &ConnectionDescriptor, masked: bool) -> String {
    let mut uri = String::from(if d.is_srv_record {
        "mongodb+srv://"
    } else {
        "mongodb://"
    });

    if let Some(userinfo) = userinfo(d, masked) {
        uri.push_str(&userinfo);
        uri.push('@');
    }

    uri.push_str(d.hostname.trim());
    if !d.is_srv_record {
        uri.push(':');
        uri.push_str(d.port.trim());
    }
    uri.push('/');

    let options = options(d, masked);
    if !options.is_empty() {
        uri.push('?');
        uri.push_str(&options.join("&"));
    }

    uri
}

fn userinfo(d: &ConnectionDescriptor, masked: bool) -> Option<String> {
    let auth = &d.auth;
    let username = auth.username.trim();
    if auth.method == AuthMethod::None || username.is_empty() {
        return None;
    }

    let user = urlencoding::encode(username).into_owned();
    let password = match auth.method {
        AuthMethod::Mongodb | AuthMethod::Ldap => Some(auth.password.as_str()),
        AuthMethod::Kerberos if !auth.password.is_empty() => Some(auth.password.as_str()),
        _ => None,
    };

    Some(match password {
        Some(_) if masked => format!("{}:{}", user, MASK),
        Some(pw) => format!("{}:{}", user, urlencoding::encode(pw)),
        None => user,
    })
}

fn options(d: &ConnectionDescriptor, masked: bool) -> Vec<String> {
    let mut options = Vec::new();

    if let Some(source) = d.auth.effective_auth_source() {
        options.push(format!("authSource={}", urlencoding::encode(source)));
    }
    if let Some(mechanism) = d.auth.method.mechanism() {
        options.push(format!("authMechanism={}", mechanism));
    }
    if d.read_preference != ReadPreference::Primary {
        options.push(format!("readPreference={}", d.read_preference));
    }
    if let Some(replica_set) = d
        .replica_set_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        options.push(format!("replicaSet={}", urlencoding::encode(replica_set)));
    }

    let tls = &d.tls;
    if tls.method.uses_tls() {
        options.push("tls=true".to_string());
    }
    if tls.method == SslMethod::Unvalidated {
        options.push("tlsAllowInvalidCertificates=true".to_string());
    }
    // Several CA files or a separate key file are bundled by the data service.
    if let Some(ca) = tls.ca_file() {
        options.push(format!("tlsCAFile={}", encode_path(ca)));
    }
    if let Some(key_file) = tls.client_key_file() {
        options.push(format!("tlsCertificateKeyFile={}", encode_path(key_file)));
        if let Some(password) = tls.key_password() {
            let password = if masked {
                MASK.to_string()
            } else {
                urlencoding::encode(password).into_owned()
            };
            options.push(format!("tlsCertificateKeyFilePassword={}", password));
        }
    }

    options
}

fn encode_path(path: &Path) -> String {
    urlencoding::encode(&path.to_string_lossy()).into_owned()
}
