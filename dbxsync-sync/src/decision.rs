//! Per-entry reconciliation decisions.
//!
//! Files:
//!
//! | in manifest | sampled | excluded | action   |
//! |-------------|---------|----------|----------|
//! | yes         | -       | -        | skip     |
//! | no          | no      | -        | skip     |
//! | no          | yes     | yes      | skip     |
//! | no          | yes     | no       | download |
//!
//! Folders are always walked; they are only created when absent from the
//! manifest and the layout is hierarchical.
//!
//! Keys are built from the parent folder's local path plus the entry's own
//! name. Only the last component of a remote display path is guaranteed to
//! carry the right casing, so display paths are never used as keys.
//!
//! Sampling draws a fresh uniform value per file. Unless the run is seeded,
//! two runs over the same inputs may pick different subsets when the
//! probability is below 1.0.

use rand::Rng;

use dbxsync_core::{LocalManifest, RelPath, RemoteEntry, SyncOptions};

/// Why a remote file was not downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    AlreadyPresent,
    NotSampled,
    Excluded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileDecision {
    Download,
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderDecision {
    Create,
    /// Already present locally.
    Exists,
    /// Flat layout never creates folders.
    Flat,
}

impl FolderDecision {
    pub fn creates(self) -> bool {
        self == FolderDecision::Create
    }
}

/// Manifest key for a remote file of folder `parent` under the active layout.
pub fn file_key(parent: &RelPath, entry: &RemoteEntry, flat: bool) -> RelPath {
    if flat {
        RelPath::from(entry.name.as_str())
    } else {
        parent.join(&entry.name)
    }
}

/// Decides whether a remote file should be downloaded.
///
/// A sampling value is drawn from `rng` only for files absent from the
/// manifest.
pub fn decide_file<R: Rng + ?Sized>(
    parent: &RelPath,
    entry: &RemoteEntry,
    manifest: &LocalManifest,
    options: &SyncOptions,
    rng: &mut R,
) -> FileDecision {
    if manifest.contains_file(&file_key(parent, entry, options.flat)) {
        return FileDecision::Skip(SkipReason::AlreadyPresent);
    }
    if !options.probability.admits(rng.gen::<f64>()) {
        return FileDecision::Skip(SkipReason::NotSampled);
    }
    if options.is_excluded(entry.extension()) {
        return FileDecision::Skip(SkipReason::Excluded);
    }
    FileDecision::Download
}

/// Decides whether a remote folder should be created locally.
pub fn decide_folder(
    parent: &RelPath,
    entry: &RemoteEntry,
    manifest: &LocalManifest,
    options: &SyncOptions,
) -> FolderDecision {
    if manifest.contains_dir(&parent.join(&entry.name)) {
        FolderDecision::Exists
    } else if options.flat {
        FolderDecision::Flat
    } else {
        FolderDecision::Create
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
