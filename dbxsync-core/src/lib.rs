//! dbxsync core library — domain types, run options, local manifest, errors.
//!
//! - [`types`] — relative paths, manifest entries, remote entries
//! - [`options`] — [`SyncOptions`] and [`Probability`]
//! - [`manifest`] — [`build_manifest`] / [`LocalManifest`]
//! - [`remote`] — the [`RemoteTree`] provider trait
//! - [`error`] — [`ConfigError`], [`ManifestError`], [`RemoteError`]

pub mod error;
pub mod manifest;
pub mod options;
pub mod remote;
pub mod types;

pub use error::{ConfigError, ManifestError, RemoteError};
pub use manifest::{build_manifest, LocalManifest};
pub use options::{validate_destination, Probability, SyncOptions};
pub use remote::RemoteTree;
pub use types::{EntryKind, ManifestEntry, RelPath, RemoteEntry, RemoteKind};
