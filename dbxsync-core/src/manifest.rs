//! Local manifest: the set of directories and files already present under
//! the destination root.
//!
//! The manifest is built once before a sync run and is only ever queried for
//! membership afterwards. Any unreadable directory aborts the build, since a
//! partial manifest would cause duplicate downloads or missed skips.

use std::collections::HashSet;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{io_err, ManifestError};
use crate::types::{EntryKind, ManifestEntry, RelPath};

/// Immutable existence oracle over the local destination tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalManifest {
    entries: HashSet<ManifestEntry>,
}

impl LocalManifest {
    pub fn contains(&self, entry: &ManifestEntry) -> bool {
        self.entries.contains(entry)
    }

    pub fn contains_dir(&self, path: &RelPath) -> bool {
        self.contains(&ManifestEntry::dir(path.clone()))
    }

    pub fn contains_file(&self, path: &RelPath) -> bool {
        self.contains(&ManifestEntry::file(path.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

impl FromIterator<ManifestEntry> for LocalManifest {
    fn from_iter<T: IntoIterator<Item = ManifestEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Walk `root` and record every directory and file below it.
///
/// Directories are recorded by their root-relative path. Files are recorded
/// by their root-relative path, or by their bare file name when `flat` is
/// set, matching how remote files are placed in each layout.
///
/// Symlinks are never descended into. A link that resolves to a regular file
/// counts as that file; links to directories and dangling links are ignored.
pub fn build_manifest(root: &Path, flat: bool) -> Result<LocalManifest, ManifestError> {
    let root = root.canonicalize().map_err(|e| io_err(root, e))?;
    let mut entries = HashSet::new();

    for item in WalkDir::new(&root).min_depth(1).follow_links(false) {
        let item = item.map_err(|e| walk_err(&root, e))?;
        let Some(rel) = RelPath::from_local(&root, item.path()) else {
            continue;
        };

        let file_type = item.file_type();
        if file_type.is_dir() {
            entries.insert(ManifestEntry::dir(rel));
        } else if file_type.is_file() || (file_type.is_symlink() && item.path().is_file()) {
            let key = if flat {
                RelPath::from(rel.file_name())
            } else {
                rel
            };
            entries.insert(ManifestEntry::file(key));
        }
    }

    Ok(LocalManifest { entries })
}

fn walk_err(root: &Path, err: walkdir::Error) -> ManifestError {
    let path = err.path().unwrap_or(root).to_path_buf();
    io_err(path, err.into())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
