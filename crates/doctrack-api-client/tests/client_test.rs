mod helpers;

use doctrack_api_client::{Credentials, UpdateDocumentRequest};
use doctrack_core::{AppError, Expiration};
use helpers::{credentials, mock_list, mock_login, setup, upload_fixture, SESSION_COOKIE};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn test_login_sends_credentials() {
    let (mut server, client) = setup().await;
    let login = mock_login(&mut server).await;

    client.login(&credentials()).await.unwrap();

    login.assert_async().await;
}

#[tokio::test]
async fn test_login_error_message_from_body() {
    let (mut server, client) = setup().await;
    server
        .mock("POST", "/login")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Invalid username or password"}"#)
        .create_async()
        .await;

    let err = client.login(&credentials()).await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
    assert_eq!(err.user_message(), "Invalid username or password");
}

#[tokio::test]
async fn test_login_fallback_message() {
    let (mut server, client) = setup().await;
    server
        .mock("POST", "/login")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let err = client.login(&credentials()).await.unwrap_err();
    assert_eq!(err.user_message(), "Login failed");
}

#[tokio::test]
async fn test_invalid_credentials_are_rejected_locally() {
    let (mut server, client) = setup().await;
    let login = server
        .mock("POST", "/login")
        .expect(0)
        .create_async()
        .await;

    let err = client
        .login(&Credentials::new("", "pw"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    login.assert_async().await;
}

#[tokio::test]
async fn test_signup_error_message() {
    let (mut server, client) = setup().await;
    server
        .mock("POST", "/signup")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"Username already exists"}"#)
        .create_async()
        .await;

    let err = client.signup(&credentials()).await.unwrap_err();
    assert_eq!(err.user_message(), "Username already exists");
}

#[tokio::test]
async fn test_session_cookie_is_reused() {
    let (mut server, client) = setup().await;
    mock_login(&mut server).await;
    let list = server
        .mock("GET", "/documents")
        .match_query(Matcher::UrlEncoded("username".into(), "alice".into()))
        .match_header("cookie", SESSION_COOKIE)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    client.login(&credentials()).await.unwrap();
    let documents = client.list_documents("alice").await.unwrap();

    assert!(documents.is_empty());
    list.assert_async().await;
}

#[tokio::test]
async fn test_list_documents_parses_expirations() {
    let (mut server, client) = setup().await;
    mock_list(
        &mut server,
        json!([
            {"_id": "1", "document_name": "Passport", "original_filename": "passport.pdf", "expiration_date": "01-02-2030"},
            {"_id": "2", "document_name": "Diploma", "original_filename": "diploma.pdf", "expiration_date": "NOT PRESENT"},
            {"_id": "3", "document_name": "Receipt", "original_filename": "receipt.png", "expiration_date": "someday"}
        ]),
    )
    .await;

    let documents = client.list_documents("alice").await.unwrap();

    assert_eq!(documents.len(), 3);
    assert_eq!(documents[0].expiration_date.to_wire(), "01-02-2030");
    assert_eq!(documents[1].expiration_date, Expiration::NotPresent);
    assert_eq!(
        documents[2].expiration_date,
        Expiration::Malformed("someday".to_string())
    );
}

#[tokio::test]
async fn test_list_documents_rejects_non_json() {
    let (mut server, client) = setup().await;
    server
        .mock("GET", "/documents")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;

    let err = client.list_documents("alice").await.unwrap_err();
    assert!(matches!(err, AppError::Api { status: 200, .. }));
}

#[tokio::test]
async fn test_upload_sends_multipart_file_and_username() {
    let (mut server, client) = setup().await;
    let upload = server
        .mock("POST", "/upload")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="file"; filename="passport.pdf""#.to_string()),
            Matcher::Regex(r#"name="username""#.to_string()),
            Matcher::Regex("alice".to_string()),
            Matcher::Regex("PDF-1.4 fixture".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"_id":"new-1","document_name":"Passport","expiration_date":"15-08-2031"}"#)
        .create_async()
        .await;

    let (_dir, path) = upload_fixture("passport.pdf");
    let document = client.upload_document("alice", &path).await.unwrap();

    upload.assert_async().await;
    assert_eq!(document.id, "new-1");
    assert_eq!(document.original_filename.as_deref(), Some("passport.pdf"));
    assert_eq!(document.expiration_date.to_wire(), "15-08-2031");
}

#[tokio::test]
async fn test_upload_rejects_missing_file_without_request() {
    let (mut server, client) = setup().await;
    let upload = server
        .mock("POST", "/upload")
        .expect(0)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = client
        .upload_document("alice", &dir.path().join("missing.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidInput(_)));
    upload.assert_async().await;
}

#[tokio::test]
async fn test_update_document_body() {
    let (mut server, client) = setup().await;
    let update = server
        .mock("POST", "/update_expiration")
        .match_body(Matcher::Json(json!({
            "document_id": "1",
            "expiration_date": "09-04-2027",
            "document_name": "Passport"
        })))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let request = UpdateDocumentRequest {
        document_id: "1".to_string(),
        expiration_date: Expiration::from_iso("2027-04-09").unwrap(),
        document_name: "Passport".to_string(),
    };
    client.update_document(&request).await.unwrap();

    update.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = doctrack_api_client::ApiClient::new("http://127.0.0.1:9").unwrap();
    let err = client.list_documents("alice").await.unwrap_err();
    assert!(matches!(err, AppError::Transport(_)));
}
