/// Error types for the gallery
///
/// Errors that travel inside application messages must be `Clone`,
/// so foreign error values are flattened into strings at the boundary.
use std::path::PathBuf;

/// Failure while talking to a remote endpoint
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS, timeout or body transfer failure
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a non-success status code
    #[error("server responded with status {0}")]
    Status(u16),
    /// The response body exceeded the configured cap
    #[error("response exceeded {0} bytes")]
    TooLarge(usize),
    /// The listing body could not be decoded
    #[error("malformed listing: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Network(err.to_string()),
        }
    }
}

/// Failure while producing a thumbnail for a tile
#[derive(Debug, Clone, thiserror::Error)]
pub enum ThumbnailError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("background task failed: {0}")]
    Task(String),
}

/// Failure while importing a local folder
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImportError {
    #[error("background task failed: {0}")]
    Task(String),
}

/// Failure while loading the settings file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
