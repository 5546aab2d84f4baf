use std::io;
use std::path::PathBuf;

/// Errors produced while loading or querying the harness configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
