//! Domain types shared by the manifest builder, the remote provider and the
//! sync engine.
//!
//! Relative paths are always `/`-separated and never carry a leading slash,
//! on every platform, so a local entry and a remote entry for the same node
//! compare equal.

use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A `/`-separated path relative to the sync root (`a/b/y.jpg`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelPath(pub String);

impl RelPath {
    /// Builds a relative path from a remote display path (`/a/b/y.jpg`).
    ///
    /// Leading and trailing slashes are stripped; the remote root becomes
    /// the empty path.
    pub fn from_remote(path_display: &str) -> Self {
        Self(path_display.trim_matches('/').to_owned())
    }

    /// Builds a relative path from a local path below `root`.
    ///
    /// Returns `None` when `path` is not inside `root`.
    pub fn from_local(root: &Path, path: &Path) -> Option<Self> {
        let rel = path.strip_prefix(root).ok()?;
        let parts: Vec<_> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(Self(parts.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends one component (`a/b` + `y.jpg` → `a/b/y.jpg`).
    pub fn join(&self, name: &str) -> Self {
        if self.is_root() {
            Self::from(name)
        } else {
            Self(format!("{}/{}", self.0, name.trim_matches('/')))
        }
    }

    /// The last path component (`y.jpg` for `a/b/y.jpg`).
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or("")
    }

    /// Resolves this path below a local root directory.
    pub fn to_local(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(root.to_path_buf(), |acc, part| acc.join(part))
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RelPath {
    fn from(s: &str) -> Self {
        Self(s.trim_matches('/').to_owned())
    }
}

impl From<String> for RelPath {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

// ---------------------------------------------------------------------------
// Manifest entries
// ---------------------------------------------------------------------------

/// Whether a manifest entry names a directory or a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    Dir,
    File,
}

impl EntryKind {
    /// Short tag used in the canonical display form.
    pub fn tag(self) -> &'static str {
        match self {
            EntryKind::Dir => "dir",
            EntryKind::File => "file",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A single local manifest entry: a kind plus a root-relative path.
///
/// In flat mode, file entries carry only the bare file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManifestEntry {
    pub kind: EntryKind,
    pub path: RelPath,
}

impl ManifestEntry {
    pub fn dir(path: impl Into<RelPath>) -> Self {
        Self {
            kind: EntryKind::Dir,
            path: path.into(),
        }
    }

    pub fn file(path: impl Into<RelPath>) -> Self {
        Self {
            kind: EntryKind::File,
            path: path.into(),
        }
    }
}

/// Renders as `dir%/a/b` or `file%/a/x.txt`.
impl fmt::Display for ManifestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%/{}", self.kind, self.path)
    }
}

// ---------------------------------------------------------------------------
// Remote entries
// ---------------------------------------------------------------------------

/// Kind of a remote node, as reported by the remote provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteKind {
    File,
    Folder,
}

/// A child returned by a remote listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub kind: RemoteKind,
    /// Bare name of the node (`y.jpg`).
    pub name: String,
    /// Absolute display path on the remote (`/a/b/y.jpg`).
    pub path_display: String,
}

impl RemoteEntry {
    pub fn file(name: impl Into<String>, path_display: impl Into<String>) -> Self {
        Self {
            kind: RemoteKind::File,
            name: name.into(),
            path_display: path_display.into(),
        }
    }

    pub fn folder(name: impl Into<String>, path_display: impl Into<String>) -> Self {
        Self {
            kind: RemoteKind::Folder,
            name: name.into(),
            path_display: path_display.into(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == RemoteKind::Folder
    }

    /// Text after the last `.` of the name; a name without a dot is its own
    /// extension.
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
