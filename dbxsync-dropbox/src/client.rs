//! Blocking Dropbox v2 HTTP client implementing [`RemoteTree`].

use std::io::Read;
use std::time::Duration;

use serde::Serialize;

use dbxsync_core::{RemoteEntry, RemoteError, RemoteTree};

use crate::wire::{
    ApiErrorBody, DownloadArg, ListFolderArg, ListFolderContinueArg, ListFolderResult,
};

pub const API_BASE: &str = "https://api.dropboxapi.com/2";
pub const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const READ_TIMEOUT: Duration = Duration::from_secs(300);

/// Base URLs for the RPC and content hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api: String,
    pub content: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: API_BASE.to_string(),
            content: CONTENT_BASE.to_string(),
        }
    }
}

/// Dropbox client authenticated with a bearer token.
pub struct DropboxClient {
    agent: ureq::Agent,
    bearer: String,
    endpoints: Endpoints,
}

impl DropboxClient {
    pub fn new(token: &str) -> Self {
        Self::with_endpoints(token, Endpoints::default())
    }

    pub fn with_endpoints(token: &str, endpoints: Endpoints) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .user_agent(concat!("dbxsync/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            bearer: format!("Bearer {token}"),
            endpoints,
        }
    }

    fn rpc<B: Serialize>(
        &self,
        route: &str,
        body: &B,
        path: &str,
    ) -> Result<ureq::Response, RemoteError> {
        let url = format!("{}/{}", self.endpoints.api, route);
        self.agent
            .post(&url)
            .set("Authorization", &self.bearer)
            .send_json(body)
            .map_err(|e| map_ureq_error(path, e))
    }

    fn list_page<B: Serialize>(
        &self,
        route: &str,
        body: &B,
        path: &str,
    ) -> Result<ListFolderResult, RemoteError> {
        self.rpc(route, body, path)?
            .into_json::<ListFolderResult>()
            .map_err(|source| RemoteError::Decode {
                path: path.to_string(),
                source,
            })
    }
}

impl RemoteTree for DropboxClient {
    fn list_children(&self, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
        let mut page = self.list_page(
            "files/list_folder",
            &ListFolderArg {
                path,
                recursive: false,
            },
            path,
        )?;
        let mut entries = Vec::with_capacity(page.entries.len());

        loop {
            entries.extend(page.entries.into_iter().filter_map(|m| m.into_entry(path)));
            if !page.has_more {
                break;
            }
            tracing::debug!("listing '{path}': fetching continuation page");
            page = self.list_page(
                "files/list_folder/continue",
                &ListFolderContinueArg {
                    cursor: &page.cursor,
                },
                path,
            )?;
        }

        Ok(entries)
    }

    fn fetch_content(&self, path: &str) -> Result<Vec<u8>, RemoteError> {
        let url = format!("{}/files/download", self.endpoints.content);
        let arg = header_safe_json(&DownloadArg { path }).map_err(|e| RemoteError::Decode {
            path: path.to_string(),
            source: e.into(),
        })?;

        let response = self
            .agent
            .post(&url)
            .set("Authorization", &self.bearer)
            .set("Dropbox-API-Arg", &arg)
            .call()
            .map_err(|e| map_ureq_error(path, e))?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|source| RemoteError::Decode {
                path: path.to_string(),
                source,
            })?;
        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Serializes `value` as JSON with every non-ASCII character escaped, as
/// required for the `Dropbox-API-Arg` header.
pub(crate) fn header_safe_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let raw = serde_json::to_string(value)?;
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    Ok(out)
}

/// Pulls `error_summary` out of a Dropbox error body, falling back to the
/// raw text.
pub(crate) fn error_summary(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error_summary)
        .unwrap_or_else(|_| body.trim().to_string())
}

fn map_ureq_error(path: &str, err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            let summary = error_summary(&body);
            if status == 409 && summary.starts_with("path/not_found") {
                RemoteError::NotFound {
                    path: path.to_string(),
                }
            } else {
                RemoteError::Api {
                    path: path.to_string(),
                    status,
                    summary,
                }
            }
        }
        ureq::Error::Transport(transport) => RemoteError::Transport {
            path: path.to_string(),
            message: transport.to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/a/x.txt", r#"{"path":"/a/x.txt"}"#)]
    #[case("/café/ü.txt", r#"{"path":"/caf\u00e9/\u00fc.txt"}"#)]
    #[case("/emoji/😀.png", r#"{"path":"/emoji/\ud83d\ude00.png"}"#)]
    fn download_header_is_ascii_only(#[case] path: &str, #[case] expected: &str) {
        let header = header_safe_json(&DownloadArg { path }).unwrap();
        assert!(header.is_ascii());
        assert_eq!(header, expected);
    }

    #[test]
    fn escaped_header_decodes_back_to_original_path() {
        let header = header_safe_json(&DownloadArg { path: "/café" }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&header).unwrap();
        assert_eq!(value["path"], "/café");
    }

    #[test]
    fn error_summary_prefers_json_field() {
        let body = r#"{"error_summary": "path/not_found/..", "error": {".tag": "path"}}"#;
        assert_eq!(error_summary(body), "path/not_found/..");
    }

    #[test]
    fn error_summary_falls_back_to_raw_text() {
        assert_eq!(
            error_summary("  Error in call to API function  \n"),
            "Error in call to API function"
        );
    }

    #[test]
    fn endpoints_default_to_dropbox_hosts() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.api, API_BASE);
        assert_eq!(endpoints.content, CONTENT_BASE);
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        let client = DropboxClient::with_endpoints(
            "token",
            Endpoints {
                api: "http://127.0.0.1:9".to_string(),
                content: "http://127.0.0.1:9".to_string(),
            },
        );
        let err = client.list_children("").unwrap_err();
        assert!(matches!(err, RemoteError::Transport { .. }), "got: {err}");
        let err = client.fetch_content("/x.txt").unwrap_err();
        assert!(matches!(err, RemoteError::Transport { .. }), "got: {err}");
    }
}
