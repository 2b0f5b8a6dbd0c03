//! Error types for dbxsync-core.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid run configuration. Always fatal, raised before any sync work.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The destination directory does not exist.
    #[error("destination folder not found: {path}")]
    DestinationNotFound { path: PathBuf },

    /// The destination exists but is not a directory.
    #[error("destination is not a directory: {path}")]
    DestinationNotDir { path: PathBuf },

    /// Sampling probability outside `(0.0, 1.0]`.
    #[error("probability must be in (0.0, 1.0], got {value}")]
    ProbabilityOutOfRange { value: f64 },

    /// No Dropbox access token in the environment.
    #[error("Dropbox token not found; set the {var} environment variable")]
    MissingToken { var: &'static str },
}

/// Failure while scanning the local destination tree.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by a remote tree provider.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The remote API answered with an error status.
    #[error("remote API error for '{path}' (HTTP {status}): {summary}")]
    Api {
        path: String,
        status: u16,
        summary: String,
    },

    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("transport error for '{path}': {message}")]
    Transport { path: String, message: String },

    /// The response body could not be read or decoded.
    #[error("could not decode response for '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The path does not exist on the remote.
    #[error("remote path not found: '{path}'")]
    NotFound { path: String },
}

/// Convenience constructor for [`ManifestError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ManifestError {
    ManifestError::Io {
        path: path.into(),
        source,
    }
}
