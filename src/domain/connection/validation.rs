use thiserror::Error;

use super::auth::{AuthMethod, Credential};
use super::descriptor::ConnectionDescriptor;
use super::ssh_tunnel::SshTunnelMethod;
use super::tls::SslMethod;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Hostname is required")]
    MissingHostname,
    #[error("Port must be a number between 1 and 65535")]
    InvalidPort,
    #[error("{method} authentication requires a {credential}")]
    MissingCredential {
        method: AuthMethod,
        credential: Credential,
    },
    #[error("SSL method {0} requires a certificate authority file")]
    MissingCertificateAuthority(SslMethod),
    #[error("Client certificate is required")]
    MissingClientCertificate,
    #[error("Client private key is required")]
    MissingClientPrivateKey,
    #[error("SSH tunnel hostname is required")]
    MissingSshHostname,
    #[error("SSH tunnel port must be a number between 1 and 65535")]
    InvalidSshPort,
    #[error("SSH tunnel username is required")]
    MissingSshUsername,
    #[error("SSH tunnel password is required")]
    MissingSshPassword,
    #[error("SSH tunnel identity file is required")]
    MissingSshIdentityFile,
}

/// Every problem that would keep `descriptor` from producing a usable
/// connection, in form order. Empty means the descriptor is connectable.
pub fn validate(descriptor: &ConnectionDescriptor) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if descriptor.hostname.trim().is_empty() {
        errors.push(ValidationError::MissingHostname);
    }
    // SRV lookups resolve the port from DNS.
    if !descriptor.is_srv_record && descriptor.port_number().is_none() {
        errors.push(ValidationError::InvalidPort);
    }

    for credential in descriptor.auth.missing_credentials() {
        errors.push(ValidationError::MissingCredential {
            method: descriptor.auth.method,
            credential,
        });
    }

    let tls = &descriptor.tls;
    if tls.method.requires_certificate_authority() && tls.ca_files.is_empty() {
        errors.push(ValidationError::MissingCertificateAuthority(tls.method));
    }
    if tls.method.requires_client_certificate() {
        if tls.certificate.is_none() {
            errors.push(ValidationError::MissingClientCertificate);
        }
        if tls.private_key.is_none() {
            errors.push(ValidationError::MissingClientPrivateKey);
        }
    }

    // SSH fields only matter once a tunnel method is picked.
    let ssh = &descriptor.ssh_tunnel;
    if ssh.is_enabled() {
        if ssh.hostname.trim().is_empty() {
            errors.push(ValidationError::MissingSshHostname);
        }
        if !matches!(ssh.port.trim().parse::<u16>(), Ok(p) if p > 0) {
            errors.push(ValidationError::InvalidSshPort);
        }
        if ssh.username.trim().is_empty() {
            errors.push(ValidationError::MissingSshUsername);
        }
        match ssh.method {
            SshTunnelMethod::UserPassword if ssh.password.is_empty() => {
                errors.push(ValidationError::MissingSshPassword);
            }
            SshTunnelMethod::IdentityFile if ssh.identity_file.is_none() => {
                errors.push(ValidationError::MissingSshIdentityFile);
            }
            _ => {}
        }
    }

    errors
}

pub fn is_valid(descriptor: &ConnectionDescriptor) -> bool {
    validate(descriptor).is_empty()
}
