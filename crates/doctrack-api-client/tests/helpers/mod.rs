#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use doctrack_api_client::{ApiClient, Credentials};
use mockito::{Matcher, Mock, ServerGuard};
use serde_json::json;
use tempfile::TempDir;

pub const SESSION_COOKIE: &str = "session=test-session";

/// Start a mock document service and a client pointed at it.
pub async fn setup() -> (ServerGuard, ApiClient) {
    let server = mockito::Server::new_async().await;
    let client = ApiClient::new(&server.url()).expect("client");
    (server, client)
}

pub fn credentials() -> Credentials {
    Credentials::new("alice", "correct horse")
}

/// Mock a successful `/login` for `alice` that sets the session cookie.
pub async fn mock_login(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/login")
        .match_body(Matcher::Json(json!({
            "username": "alice",
            "password": "correct horse"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_header("set-cookie", &format!("{}; Path=/", SESSION_COOKIE))
        .with_body(r#"{"message":"Login successful"}"#)
        .create_async()
        .await
}

/// Mock `GET /documents?username=alice` returning `body`.
pub async fn mock_list(server: &mut ServerGuard, body: serde_json::Value) -> Mock {
    server
        .mock("GET", "/documents")
        .match_query(Matcher::UrlEncoded("username".into(), "alice".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Write a small file into a fresh temp dir and return both.
pub fn upload_fixture(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create fixture");
    file.write_all(b"%PDF-1.4 fixture").expect("write fixture");
    (dir, path)
}
