//! # dbxsync-dropbox
//!
//! Dropbox v2 API provider for the sync engine. [`DropboxClient`] implements
//! [`dbxsync_core::RemoteTree`] with blocking `ureq` requests: folder
//! listings drain every continuation page, downloads return the raw bytes.

pub mod client;
mod wire;

pub use client::{DropboxClient, Endpoints, API_BASE, CONTENT_BASE};

/// Environment variable holding the access token.
pub const TOKEN_ENV: &str = "DBX_TOKEN";
