//! Request and response bodies for the Dropbox v2 `files/*` endpoints.

use serde::{Deserialize, Serialize};

use dbxsync_core::RemoteEntry;

#[derive(Debug, Serialize)]
pub(crate) struct ListFolderArg<'a> {
    pub path: &'a str,
    pub recursive: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListFolderContinueArg<'a> {
    pub cursor: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DownloadArg<'a> {
    pub path: &'a str,
}

/// One page of a folder listing.
#[derive(Debug, Deserialize)]
pub(crate) struct ListFolderResult {
    pub entries: Vec<Metadata>,
    pub cursor: String,
    pub has_more: bool,
}

/// Entry metadata, discriminated by the `.tag` field.
#[derive(Debug, Deserialize)]
#[serde(tag = ".tag", rename_all = "lowercase")]
pub(crate) enum Metadata {
    File {
        name: String,
        path_display: Option<String>,
    },
    Folder {
        name: String,
        path_display: Option<String>,
    },
    Deleted,
}

impl Metadata {
    /// Maps live entries to [`RemoteEntry`]; deleted entries yield `None`.
    ///
    /// `path_display` is optional in the API; `parent` is used to rebuild it
    /// when it is missing.
    pub fn into_entry(self, parent: &str) -> Option<RemoteEntry> {
        let rebuild = |name: &str| format!("{}/{}", parent.trim_end_matches('/'), name);
        match self {
            Metadata::File { name, path_display } => {
                let path = path_display.unwrap_or_else(|| rebuild(&name));
                Some(RemoteEntry::file(name, path))
            }
            Metadata::Folder { name, path_display } => {
                let path = path_display.unwrap_or_else(|| rebuild(&name));
                Some(RemoteEntry::folder(name, path))
            }
            Metadata::Deleted => None,
        }
    }
}

/// Error body returned alongside 409 and most 4xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error_summary: String,
}
