//! Local folder creation and file writes, plus the action log.
//!
//! ## File writes
//!
//! 1. Fetch the content from the remote (skipped under dry-run).
//! 2. Create the parent directories.
//! 3. Write to `<path>.dbxsync.tmp`.
//! 4. Rename to the final path (atomic on POSIX).
//!
//! Dry-run performs the decision and logging steps only, so its action log
//! is a preview of exactly what a real run would record.

use std::path::{Path, PathBuf};

use dbxsync_core::{RelPath, RemoteEntry, RemoteTree};

use crate::error::{io_err, SyncError};
use crate::report::ActionLog;

/// Suffix of the temporary file a download is staged in.
pub const TMP_SUFFIX: &str = ".dbxsync.tmp";

/// Writes remote nodes below the destination root and records each success.
#[derive(Debug)]
pub struct Materializer {
    root: PathBuf,
    flat: bool,
    dry_run: bool,
    log: ActionLog,
}

impl Materializer {
    pub fn new(root: impl Into<PathBuf>, flat: bool, dry_run: bool) -> Self {
        Self {
            root: root.into(),
            flat,
            dry_run,
            log: ActionLog::default(),
        }
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn into_log(self) -> ActionLog {
        self.log
    }

    /// Local path a remote file of folder `parent` lands at under the
    /// active layout.
    pub fn local_file_path(&self, parent: &RelPath, entry: &RemoteEntry) -> PathBuf {
        if self.flat {
            self.root.join(&entry.name)
        } else {
            parent.to_local(&self.root).join(&entry.name)
        }
    }

    /// Creates `<root>/<parent>/<name>`; succeeds if it already exists.
    pub fn create_folder(
        &mut self,
        parent: &RelPath,
        name: &str,
        depth: usize,
    ) -> Result<PathBuf, SyncError> {
        let local = parent.to_local(&self.root).join(name);
        if !self.dry_run {
            std::fs::create_dir_all(&local).map_err(|e| io_err(&local, e))?;
        }
        self.log.folder(depth, name);
        Ok(local)
    }

    /// Fetches `entry` by its display path and writes it byte-for-byte
    /// below `parent`.
    pub fn download_file(
        &mut self,
        remote: &dyn RemoteTree,
        parent: &RelPath,
        entry: &RemoteEntry,
        depth: usize,
    ) -> Result<PathBuf, SyncError> {
        let local = self.local_file_path(parent, entry);
        if !self.dry_run {
            let bytes = remote.fetch_content(&entry.path_display)?;
            atomic_write(&local, &bytes)?;
        }
        self.log.file(depth, &entry.name);
        Ok(local)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}{TMP_SUFFIX}", path.display()))
}

/// Write `content` to `path` through a sibling temp file and a rename.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let tmp = tmp_path(path);
    std::fs::write(&tmp, content).map_err(|e| io_err(&tmp, e))?;

    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
