//! Error types for dbxsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use dbxsync_core::{ConfigError, ManifestError, RemoteError};

/// All errors that can arise from sync operations.
///
/// Only [`SyncError::Config`] and [`SyncError::Manifest`] abort a run; the
/// walker reports every other error and moves on.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Invalid run configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The local destination tree could not be scanned.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// A remote listing or download failed.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
