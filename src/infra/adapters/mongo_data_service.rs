use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::Client;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Tls};
use tempfile::NamedTempFile;
use tokio::sync::Mutex;
use tracing::debug;

use crate::app::connection_error::ConnectErrorInfo;
use crate::app::ports::{DataService, DataServiceError, DataSession, SessionHandle};
use crate::config::settings::Settings;
use crate::domain::connection::{ConnectionDescriptor, ConnectionId, TlsSettings};

const SSH_TUNNEL_UNSUPPORTED: &str = "SSH tunnels are not supported by this data service";

/// [`DataService`] backed by the official MongoDB driver.
///
/// A connect succeeds once the deployment answers `ping` on `admin`.
pub struct MongoDataService {
    settings: Settings,
}

impl MongoDataService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    async fn client_options(&self, uri: &str) -> Result<ClientOptions, DataServiceError> {
        let mut options = ClientOptions::parse(uri).await.map_err(connect_error)?;
        options.connect_timeout = Some(self.settings.connect_timeout());
        options.server_selection_timeout = Some(self.settings.server_selection_timeout());
        options.app_name = Some(self.settings.app_name.clone());
        Ok(options)
    }
}

/// PEM files the connection string cannot point at directly. They must
/// outlive the client built from them.
#[derive(Debug, Default)]
struct TlsBundles {
    ca: Option<NamedTempFile>,
    client_key: Option<NamedTempFile>,
}

impl TlsBundles {
    fn build(tls: &TlsSettings) -> Result<Self, DataServiceError> {
        let mut bundles = Self::default();
        if tls.needs_ca_bundle() {
            let parts: Vec<&Path> = tls.ca_files.iter().map(PathBuf::as_path).collect();
            bundles.ca = Some(write_bundle(&parts)?);
        }
        if let Some((certificate, key)) = tls.split_client_key() {
            bundles.client_key = Some(write_bundle(&[certificate, key])?);
        }
        Ok(bundles)
    }

    fn apply(&self, settings: &TlsSettings, options: &mut ClientOptions) {
        if let Some(Tls::Enabled(tls)) = options.tls.as_mut() {
            if let Some(ca) = &self.ca {
                tls.ca_file_path = Some(ca.path().to_path_buf());
            }
            if let Some(client_key) = &self.client_key {
                tls.cert_key_file_path = Some(client_key.path().to_path_buf());
                tls.tls_certificate_key_file_password =
                    settings.key_password().map(|p| p.as_bytes().to_vec());
            }
        }
    }
}

fn write_bundle(parts: &[&Path]) -> Result<NamedTempFile, DataServiceError> {
    let mut bundle = tempfile::Builder::new()
        .prefix("mongoconnect-")
        .suffix(".pem")
        .tempfile()
        .map_err(bundle_error)?;
    for part in parts {
        let pem = std::fs::read(part).map_err(|e| {
            DataServiceError::ConnectionFailed(format!(
                "Cannot read TLS file {}: {}",
                part.display(),
                e
            ))
        })?;
        append_pem(&mut bundle, &pem).map_err(bundle_error)?;
    }
    Ok(bundle)
}

fn append_pem(bundle: &mut NamedTempFile, pem: &[u8]) -> std::io::Result<()> {
    bundle.write_all(pem)?;
    if !pem.ends_with(b"\n") {
        bundle.write_all(b"\n")?;
    }
    bundle.flush()
}

fn bundle_error(e: std::io::Error) -> DataServiceError {
    DataServiceError::ConnectionFailed(format!("Cannot write TLS bundle: {}", e))
}

fn connect_error(e: mongodb::error::Error) -> DataServiceError {
    let info = ConnectErrorInfo::new(e.to_string());
    debug!(kind = ?info.kind, hint = info.hint(), "Connect attempt failed");
    DataServiceError::ConnectionFailed(info.message())
}

#[async_trait]
impl DataService for MongoDataService {
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<SessionHandle, DataServiceError> {
        if descriptor.ssh_tunnel.is_enabled() {
            return Err(DataServiceError::Unsupported(SSH_TUNNEL_UNSUPPORTED.to_string()));
        }

        let tls = descriptor.tls.clone();
        let bundles = tokio::task::spawn_blocking(move || TlsBundles::build(&tls))
            .await
            .map_err(|e| DataServiceError::ConnectionFailed(format!("Task panicked: {}", e)))??;
        let mut options = self
            .client_options(&descriptor.to_connection_string())
            .await?;
        bundles.apply(&descriptor.tls, &mut options);
        let client = Client::with_options(options).map_err(connect_error)?;

        let label = descriptor.to_masked_connection_string();
        debug!(uri = %label, "Pinging deployment");
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connect_error)?;

        Ok(Arc::new(MongoSession {
            id: descriptor.id.clone(),
            label,
            client: Mutex::new(Some(client)),
            _tls_bundles: bundles,
        }))
    }

    async fn disconnect(&self, session: SessionHandle) -> Result<(), DataServiceError> {
        session.close().await
    }
}

#[derive(Debug)]
pub struct MongoSession {
    id: ConnectionId,
    label: String,
    client: Mutex<Option<Client>>,
    _tls_bundles: TlsBundles,
}

impl MongoSession {
    async fn client(&self) -> Result<Client, DataServiceError> {
        self.client
            .lock()
            .await
            .clone()
            .ok_or_else(|| DataServiceError::QueryFailed("session is closed".to_string()))
    }
}

#[async_trait]
impl DataSession for MongoSession {
    fn connection_id(&self) -> &ConnectionId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    async fn server_version(&self) -> Result<String, DataServiceError> {
        let info = self
            .client()
            .await?
            .database("admin")
            .run_command(doc! { "buildInfo": 1 })
            .await
            .map_err(|e| DataServiceError::QueryFailed(e.to_string()))?;
        info.get_str("version")
            .map(str::to_string)
            .map_err(|e| DataServiceError::QueryFailed(e.to_string()))
    }

    async fn close(&self) -> Result<(), DataServiceError> {
        let client = self
            .client
            .lock()
            .await
            .take()
            .ok_or_else(|| DataServiceError::QueryFailed("session is closed".to_string()))?;
        client.shutdown().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::connection::SshTunnelMethod;

    fn fast_settings() -> Settings {
        Settings {
            connect_timeout_secs: 1,
            server_selection_timeout_secs: 1,
            ..Settings::default()
        }
    }

    mod tls_bundles {
        use super::*;
        use crate::domain::connection::SslMethod;
        use tempfile::TempDir;

        fn pem_files(dir: &TempDir) -> TlsSettings {
            let write = |name: &str, body: &str| {
                let path = dir.path().join(name);
                std::fs::write(&path, body).unwrap();
                path
            };
            TlsSettings {
                method: SslMethod::All,
                ca_files: vec![write("ca1.pem", "CA1\n"), write("ca2.pem", "CA2")],
                certificate: Some(write("client.crt", "CERT\n")),
                private_key: Some(write("client.key", "KEY\n")),
                private_key_password: "kp".to_string(),
            }
        }

        #[test]
        fn separate_files_are_concatenated() {
            let dir = TempDir::new().unwrap();
            let tls = pem_files(&dir);

            let bundles = TlsBundles::build(&tls).unwrap();

            let ca = std::fs::read_to_string(bundles.ca.as_ref().unwrap().path()).unwrap();
            let key = std::fs::read_to_string(bundles.client_key.as_ref().unwrap().path()).unwrap();
            assert_eq!(ca, "CA1\nCA2\n");
            assert_eq!(key, "CERT\nKEY\n");
        }

        #[test]
        fn single_files_need_no_bundle() {
            let dir = TempDir::new().unwrap();
            let mut tls = pem_files(&dir);
            tls.ca_files.truncate(1);
            tls.private_key = tls.certificate.clone();

            let bundles = TlsBundles::build(&tls).unwrap();

            assert!(bundles.ca.is_none());
            assert!(bundles.client_key.is_none());
        }

        #[test]
        fn missing_file_is_reported() {
            let dir = TempDir::new().unwrap();
            let mut tls = pem_files(&dir);
            tls.private_key = Some(dir.path().join("absent.key"));

            let err = TlsBundles::build(&tls).unwrap_err();

            assert!(err.to_string().contains("absent.key"));
        }

        #[tokio::test]
        async fn bundles_replace_driver_paths() {
            let dir = TempDir::new().unwrap();
            let mut descriptor = ConnectionDescriptor::new();
            descriptor.tls = pem_files(&dir);
            let bundles = TlsBundles::build(&descriptor.tls).unwrap();
            let mut options = MongoDataService::new(fast_settings())
                .client_options(&descriptor.to_connection_string())
                .await
                .unwrap();

            bundles.apply(&descriptor.tls, &mut options);

            let Some(Tls::Enabled(tls)) = options.tls else {
                panic!("expected tls options");
            };
            assert_eq!(
                tls.ca_file_path.as_deref(),
                Some(bundles.ca.as_ref().unwrap().path())
            );
            assert_eq!(
                tls.cert_key_file_path.as_deref(),
                Some(bundles.client_key.as_ref().unwrap().path())
            );
            assert_eq!(tls.tls_certificate_key_file_password, Some(b"kp".to_vec()));
        }
    }

    #[tokio::test]
    async fn ssh_tunnel_is_unsupported() {
        let mut descriptor = ConnectionDescriptor::new();
        descriptor.ssh_tunnel.method = SshTunnelMethod::UserPassword;

        let result = MongoDataService::new(fast_settings()).connect(&descriptor).await;

        assert!(matches!(result, Err(DataServiceError::Unsupported(_))));
    }

    #[tokio::test]
    async fn unreachable_host_fails_with_message() {
        let descriptor = ConnectionDescriptor {
            hostname: "127.0.0.1".to_string(),
            port: "1".to_string(),
            ..ConnectionDescriptor::new()
        };

        let result = MongoDataService::new(fast_settings()).connect(&descriptor).await;

        match result {
            Err(DataServiceError::ConnectionFailed(message)) => assert!(!message.is_empty()),
            other => panic!("expected connection failure, got {:?}", other.map(|_| ())),
        }
    }
}
