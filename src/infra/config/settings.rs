use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const APP_DIR_NAME: &str = "mongoconnect";
pub const CONFIG_DIR_ENV: &str = "MONGOCONNECT_CONFIG_DIR";
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Could not find config directory")]
    NoConfigDir,
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Driver tuning read from `settings.toml`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
    pub app_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
            app_name: APP_DIR_NAME.to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&config_dir()?)
    }

    /// Reads `settings.toml` under `dir`; a missing file yields defaults.
    pub fn load_from(dir: &Path) -> Result<Self, SettingsError> {
        let path = dir.join(SETTINGS_FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|source| SettingsError::Read {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::Parse { path, source })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout_secs)
    }
}

/// `$MONGOCONNECT_CONFIG_DIR`, else `<platform config dir>/mongoconnect`.
pub fn config_dir() -> Result<PathBuf, SettingsError> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|base| base.join(APP_DIR_NAME))
        .ok_or(SettingsError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let settings = Settings::load_from(temp_dir.path()).unwrap();

        assert_eq!(settings, Settings::default());
        assert_eq!(settings.connect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.server_selection_timeout(), Duration::from_secs(30));
        assert_eq!(settings.app_name, "mongoconnect");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(SETTINGS_FILE_NAME),
            "connect_timeout_secs = 3\n",
        )
        .unwrap();

        let settings = Settings::load_from(temp_dir.path()).unwrap();

        assert_eq!(settings.connect_timeout_secs, 3);
        assert_eq!(settings.server_selection_timeout_secs, 30);
        assert_eq!(settings.app_name, "mongoconnect");
    }

    #[test]
    fn invalid_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(SETTINGS_FILE_NAME),
            "connect_timeout_secs = \"soon\"\n",
        )
        .unwrap();

        let result = Settings::load_from(temp_dir.path());

        assert!(matches!(result, Err(SettingsError::Parse { .. })));
    }
}
