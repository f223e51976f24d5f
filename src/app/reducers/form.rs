//! Draft sub-reducer: field edits, reset and selection.

use chrono::{DateTime, Utc};

use crate::action::Action;
use crate::connection_state::ConnectionState;
use crate::domain::connection::{ConnectionDescriptor, SslMethod};
use crate::effect::Effect;
use crate::state::ConnectState;

/// Handles edits to the draft descriptor.
/// Returns Some(effects) if action was handled, None otherwise.
pub fn reduce_form(
    state: &mut ConnectState,
    action: &Action,
    _now: DateTime<Utc>,
) -> Option<Vec<Effect>> {
    let draft = &mut state.current_connection;

    match action {
        Action::ResetConnection => {
            state.current_connection = ConnectionDescriptor::new();
            state.is_valid = true;
            state.error_message = None;
            if state.connection_state.is_failed() {
                state.connection_state = ConnectionState::NotConnected;
            }
        }
        Action::ConnectionSelected(descriptor) => {
            state.current_connection = descriptor.as_ref().clone();
        }

        Action::HostnameChanged(hostname) => {
            draft.hostname = hostname.clone();
            if draft.is_managed_cloud_host() {
                draft.tls.method = SslMethod::SystemCa;
            }
        }
        Action::PortChanged(port) => draft.port = port.clone(),
        Action::ReadPreferenceChanged(preference) => draft.read_preference = *preference,
        Action::ReplicaSetNameChanged(name) => {
            draft.replica_set_name = (!name.is_empty()).then(|| name.clone());
        }
        Action::SrvRecordToggle => draft.is_srv_record = !draft.is_srv_record,

        Action::AuthenticationMethodChanged(method) => draft.auth.method = *method,
        Action::UsernameChanged(username) => draft.auth.username = username.clone(),
        Action::PasswordChanged(password) => draft.auth.password = password.clone(),
        Action::AuthSourceChanged(source) => draft.auth.auth_source = source.clone(),

        Action::SslMethodChanged(method) => draft.tls.method = *method,
        Action::SslCaChanged(paths) => draft.tls.ca_files = paths.clone(),
        Action::SslCertificateChanged(path) => draft.tls.certificate = path.clone(),
        Action::SslPrivateKeyChanged(path) => draft.tls.private_key = path.clone(),
        Action::SslPrivateKeyPasswordChanged(password) => {
            draft.tls.private_key_password = password.clone();
        }

        Action::FavoriteNameChanged(name) => draft.name = name.clone(),

        Action::SshTunnelChanged(method) => draft.ssh_tunnel.method = *method,
        Action::SshTunnelHostnameChanged(hostname) => draft.ssh_tunnel.hostname = hostname.clone(),
        Action::SshTunnelPortChanged(port) => draft.ssh_tunnel.port = port.clone(),
        Action::SshTunnelUsernameChanged(username) => {
            draft.ssh_tunnel.username = username.clone();
        }
        Action::SshTunnelPasswordChanged(password) => {
            draft.ssh_tunnel.password = password.clone();
        }
        Action::SshTunnelPassphraseChanged(passphrase) => {
            draft.ssh_tunnel.passphrase = passphrase.clone();
        }
        Action::SshTunnelIdentityFileChanged(path) => draft.ssh_tunnel.identity_file = path.clone(),

        _ => return None,
    }

    Some(vec![Effect::Broadcast])
}
