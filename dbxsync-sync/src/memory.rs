//! In-memory [`RemoteTree`] test fixture.
//!
//! Only compiled for this crate's own tests or with the `test-utils`
//! feature.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use dbxsync_core::{RemoteEntry, RemoteError, RemoteTree};

/// A remote tree held in memory.
///
/// Children are listed in insertion order. Parent folders are created on
/// demand by [`MemoryRemote::with_file`] and [`MemoryRemote::with_folder`].
#[derive(Debug, Default)]
pub struct MemoryRemote {
    children: HashMap<String, Vec<RemoteEntry>>,
    contents: HashMap<String, Vec<u8>>,
    failing_listings: HashSet<String>,
    failing_downloads: HashSet<String>,
    listed: RefCell<Vec<String>>,
    fetched: RefCell<Vec<String>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        let mut remote = Self::default();
        remote.children.insert(String::new(), Vec::new());
        remote
    }

    /// Adds a folder (and its missing ancestors) at `path`, e.g. `/a/b`.
    pub fn with_folder(mut self, path: &str) -> Self {
        self.ensure_folder(&normalize(path));
        self
    }

    /// Adds a file (and its missing parent folders) at `path`, e.g. `/a/x.txt`.
    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        let path = normalize(path);
        let (parent, name) = split(&path);
        self.ensure_folder(parent);
        let siblings = self.children.entry(parent.to_string()).or_default();
        siblings.retain(|e| e.path_display != path);
        siblings.push(RemoteEntry::file(name, path.clone()));
        self.contents.insert(path, content.to_vec());
        self
    }

    /// Appends `entry` verbatim to the listing of `parent`.
    ///
    /// Unlike [`MemoryRemote::with_file`], the entry's name and display path
    /// are not derived from each other, so a listing can mimic a provider
    /// that reports ancestors with a different casing.
    pub fn with_entry(mut self, parent: &str, entry: RemoteEntry) -> Self {
        let parent = normalize(parent);
        self.ensure_folder(&parent);
        if entry.is_folder() {
            self.children
                .entry(normalize(&entry.path_display))
                .or_default();
        }
        self.children.entry(parent).or_default().push(entry);
        self
    }

    /// Serves `content` for downloads of `path`.
    pub fn with_content(mut self, path: &str, content: &[u8]) -> Self {
        self.contents.insert(normalize(path), content.to_vec());
        self
    }

    /// Makes every listing of `path` fail.
    pub fn fail_listing(mut self, path: &str) -> Self {
        self.failing_listings.insert(normalize(path));
        self
    }

    /// Makes every download of `path` fail.
    pub fn fail_download(mut self, path: &str) -> Self {
        self.failing_downloads.insert(normalize(path));
        self
    }

    /// Paths passed to `list_children`, in call order.
    pub fn listed(&self) -> Vec<String> {
        self.listed.borrow().clone()
    }

    /// Paths passed to `fetch_content`, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    fn ensure_folder(&mut self, path: &str) {
        if path.is_empty() || self.children.contains_key(path) {
            return;
        }
        let (parent, name) = split(path);
        self.ensure_folder(parent);
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(RemoteEntry::folder(name, path));
        self.children.insert(path.to_string(), Vec::new());
    }
}

impl RemoteTree for MemoryRemote {
    fn list_children(&self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        let path = normalize(path);
        self.listed.borrow_mut().push(path.clone());
        if self.failing_listings.contains(&path) {
            return Err(RemoteError::Api {
                path,
                status: 500,
                summary: "injected listing failure".to_string(),
            });
        }
        self.children
            .get(&path)
            .cloned()
            .ok_or(RemoteError::NotFound { path })
    }

    fn fetch_content(&self, path: &str) -> Result<Vec<u8>, RemoteError> {
        let path = normalize(path);
        self.fetched.borrow_mut().push(path.clone());
        if self.failing_downloads.contains(&path) {
            return Err(RemoteError::Api {
                path,
                status: 500,
                summary: "injected download failure".to_string(),
            });
        }
        self.contents
            .get(&path)
            .cloned()
            .ok_or(RemoteError::NotFound { path })
    }
}

/// `a/b/` → `/a/b`; the root stays `""`.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// `/a/b/y.jpg` → (`/a/b`, `y.jpg`)
fn split(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}
