//! Configuration loading errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a [`RestConfig`](crate::RestConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        /// Path of the file that failed to load.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has wrong field types.
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
