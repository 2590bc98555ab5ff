use thiserror::Error;

/// Errors raised by the chunking engine.
///
/// Malformed markdown is never an error: unterminated fences and broken
/// tables degrade gracefully instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("Invalid chunk config: {0}")]
    InvalidConfig(String),
}

/// Errors raised while loading a [`ChunkConfig`](crate::ChunkConfig) from disk.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    Invalid(#[from] ChunkError),
}

/// A storage string that does not name a known label.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown label: {0}")]
pub struct UnknownLabel(pub String);
