//! Error types for configuration loading

use thiserror::Error;

/// Errors that can occur when loading configuration or palette files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse configuration TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
