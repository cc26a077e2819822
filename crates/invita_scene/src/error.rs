//! Error types for invita_scene

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a scene configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for a scene configuration
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to serialize a configuration
    #[error("failed to serialize scene config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The configuration parsed but describes an impossible scene
    #[error("invalid scene config: {0}")]
    Invalid(String),
}

/// Result type for invita_scene operations
pub type Result<T> = std::result::Result<T, ConfigError>;
