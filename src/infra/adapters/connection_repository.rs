use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::app::ports::{ConnectionRepository, RepositoryError};
use crate::config::connection_config::{CURRENT_VERSION, ConnectionsFile};
use crate::config::settings::config_dir;
use crate::domain::connection::ConnectionDescriptor;

const CONFIG_FILE_NAME: &str = "connections.toml";

pub struct TomlConnectionRepository {
    config_dir: PathBuf,
}

impl TomlConnectionRepository {
    pub fn new() -> Result<Self, RepositoryError> {
        let config_dir = config_dir().map_err(|e| RepositoryError::IoError(e.to_string()))?;
        Ok(Self { config_dir })
    }

    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    fn config_file_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    fn read_all(&self) -> Result<Vec<ConnectionDescriptor>, RepositoryError> {
        let path = self.config_file_path();

        if !path.exists() {
            return Ok(Vec::new());
        }

        let content =
            fs::read_to_string(&path).map_err(|e| RepositoryError::ReadError(e.to_string()))?;

        let file: ConnectionsFile =
            toml::from_str(&content).map_err(|e| RepositoryError::InvalidFormat(e.to_string()))?;

        if file.version != CURRENT_VERSION {
            return Err(RepositoryError::VersionMismatch {
                found: file.version,
                expected: CURRENT_VERSION,
            });
        }

        Ok(file.to_descriptors())
    }

    fn write_all(&self, descriptors: &[ConnectionDescriptor]) -> Result<(), RepositoryError> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)
                .map_err(|e| RepositoryError::IoError(e.to_string()))?;
        }

        let file = ConnectionsFile::from_descriptors(descriptors);
        let content = toml::to_string_pretty(&file)
            .map_err(|e| RepositoryError::WriteError(e.to_string()))?;

        let content_with_header = format!(
            "# mongoconnect saved connections\n# WARNING: Passwords are stored in plain text\n\n{}",
            content
        );

        let path = self.config_file_path();
        fs::write(&path, content_with_header)
            .map_err(|e| RepositoryError::WriteError(e.to_string()))?;

        set_file_permissions(&path)?;
        debug!(path = %path.display(), count = descriptors.len(), "Wrote connections file");

        Ok(())
    }
}

impl ConnectionRepository for TomlConnectionRepository {
    fn load(&self) -> Result<Vec<ConnectionDescriptor>, RepositoryError> {
        self.read_all()
    }

    fn save(&self, descriptor: &ConnectionDescriptor) -> Result<(), RepositoryError> {
        let mut descriptors = self.read_all()?;
        match descriptors.iter_mut().find(|d| d.id == descriptor.id) {
            Some(existing) => *existing = descriptor.clone(),
            None => descriptors.push(descriptor.clone()),
        }
        self.write_all(&descriptors)
    }

    fn delete(&self, descriptor: &ConnectionDescriptor) -> Result<(), RepositoryError> {
        let mut descriptors = self.read_all()?;
        let before = descriptors.len();
        descriptors.retain(|d| d.id != descriptor.id);
        if descriptors.len() == before {
            return Ok(());
        }
        self.write_all(&descriptors)
    }

    fn storage_path(&self) -> PathBuf {
        self.config_file_path()
    }
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), RepositoryError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o600);
    fs::set_permissions(path, perms).map_err(|e| RepositoryError::IoError(e.to_string()))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), RepositoryError> {
    Ok(())
}
