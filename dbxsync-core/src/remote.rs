//! The remote filesystem seam.
//!
//! The sync engine only needs two capabilities from a cloud provider: list
//! the children of a folder and fetch the bytes of a file.

use crate::error::RemoteError;
use crate::types::RemoteEntry;

/// A remote tree the sync engine can walk.
///
/// Paths are absolute remote display paths (`/a/b`); the root is `""`.
pub trait RemoteTree {
    /// All children of `path`, in the provider's order.
    ///
    /// Paginated providers must drain every continuation page before
    /// returning.
    fn list_children(&self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError>;

    /// The full content of the file at `path`.
    fn fetch_content(&self, path: &str) -> Result<Vec<u8>, RemoteError>;
}

impl<T: RemoteTree + ?Sized> RemoteTree for &T {
    fn list_children(&self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        (**self).list_children(path)
    }

    fn fetch_content(&self, path: &str) -> Result<Vec<u8>, RemoteError> {
        (**self).fetch_content(path)
    }
}
