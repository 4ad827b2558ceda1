use std::io;
use std::path::PathBuf;

use crate::core::error::ChatError;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Config directory not found")]
    NoConfigDir,

    #[error("Config file already exists at {}", .0.display())]
    AlreadyExists(PathBuf),
}

impl From<ConfigError> for ChatError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
