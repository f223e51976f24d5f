pub mod connection_config;
pub mod settings;

pub use settings::{Settings, SettingsError, config_dir};
