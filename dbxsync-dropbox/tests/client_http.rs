//! HTTP-level client tests against a local mock Dropbox server.

use dbxsync_core::{RemoteError, RemoteKind, RemoteTree};
use dbxsync_dropbox::{DropboxClient, Endpoints};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> DropboxClient {
    DropboxClient::with_endpoints(
        "token",
        Endpoints {
            api: server.uri(),
            content: server.uri(),
        },
    )
}

/// Runs a blocking client call off the async runtime.
async fn blocking<T, F>(call: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(call).await.expect("join")
}

fn not_found_body() -> serde_json::Value {
    json!({
        "error_summary": "path/not_found/..",
        "error": {".tag": "path", "path": {".tag": "not_found"}}
    })
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn continuation_pages_are_concatenated_in_order() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .and(header("Authorization", "Bearer token"))
        .and(body_json(json!({"path": "/photos", "recursive": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                {".tag": "file", "name": "a.jpg", "path_display": "/photos/a.jpg"},
                {".tag": "deleted", "name": "gone.jpg"},
                {".tag": "folder", "name": "2024", "path_display": "/photos/2024"}
            ],
            "cursor": "page-1",
            "has_more": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/files/list_folder/continue"))
        .and(body_json(json!({"cursor": "page-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [
                {".tag": "file", "name": "z.png", "path_display": "/photos/z.png"}
            ],
            "cursor": "page-2",
            "has_more": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let entries = blocking(move || client.list_children("/photos"))
        .await
        .expect("listing");

    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["a.jpg", "2024", "z.png"]);
    assert_eq!(entries[1].kind, RemoteKind::Folder);
    assert_eq!(entries[2].path_display, "/photos/z.png");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_folder_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(409).set_body_json(not_found_body()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = blocking(move || client.list_children("/nope"))
        .await
        .unwrap_err();
    assert!(
        matches!(&err, RemoteError::NotFound { path } if path == "/nope"),
        "got: {err}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn other_error_statuses_keep_status_and_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error_summary": "path/malformed_path/",
            "error": {".tag": "path"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = blocking(move || client.list_children("/bad"))
        .await
        .unwrap_err();
    match err {
        RemoteError::Api {
            status, summary, ..
        } => {
            assert_eq!(status, 409);
            assert_eq!(summary, "path/malformed_path/");
        }
        other => panic!("expected Api error, got: {other}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_continuation_page_fails_the_whole_listing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{".tag": "file", "name": "a.txt", "path_display": "/a.txt"}],
            "cursor": "c",
            "has_more": true
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/files/list_folder/continue"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = blocking(move || client.list_children("")).await.unwrap_err();
    assert!(
        matches!(err, RemoteError::Api { status: 500, .. }),
        "got: {err}"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn undecodable_page_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/list_folder"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = blocking(move || client.list_children("")).await.unwrap_err();
    assert!(matches!(err, RemoteError::Decode { .. }), "got: {err}");
}

// =============================================================================
// Download
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn download_sends_escaped_arg_header_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/download"))
        .and(header("Authorization", "Bearer token"))
        .and(header("Dropbox-API-Arg", r#"{"path":"/caf\u00e9.txt"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"coffee".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bytes = blocking(move || client.fetch_content("/café.txt"))
        .await
        .expect("download");
    assert_eq!(bytes, b"coffee");
}

#[tokio::test(flavor = "multi_thread")]
async fn download_of_missing_file_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/files/download"))
        .respond_with(ResponseTemplate::new(409).set_body_json(not_found_body()))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = blocking(move || client.fetch_content("/gone.txt"))
        .await
        .unwrap_err();
    assert!(matches!(err, RemoteError::NotFound { .. }), "got: {err}");
}
