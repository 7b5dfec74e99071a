//! Domain methods for the document service.
//!
//! Endpoint paths and payload shapes follow the service as deployed; request
//! and response types live in `doctrack_core::models`.

use std::path::Path;

use doctrack_core::models::{Credentials, Document, UpdateDocumentRequest, UploadResponse};
use doctrack_core::validation::{upload_file_name, validate_upload_path};
use doctrack_core::AppResult;
use validator::Validate;

use crate::ApiClient;

/// A file read from disk, ready to be sent as multipart.
struct UploadFile {
    file_name: String,
    contents: Vec<u8>,
}

async fn read_upload(path: &Path) -> AppResult<UploadFile> {
    validate_upload_path(path)?;
    let file_name = upload_file_name(path)?;
    let contents = tokio::fs::read(path).await?;
    Ok(UploadFile {
        file_name,
        contents,
    })
}

impl ApiClient {
    /// Start a session. The service sets a cookie that later calls reuse.
    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> AppResult<()> {
        credentials.validate()?;
        self.post_json("/login", credentials, "Login failed").await?;
        tracing::info!("Logged in");
        Ok(())
    }

    #[tracing::instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn signup(&self, credentials: &Credentials) -> AppResult<()> {
        credentials.validate()?;
        self.post_json("/signup", credentials, "Signup failed").await?;
        tracing::info!("Account created");
        Ok(())
    }

    /// List the documents owned by `username`.
    #[tracing::instrument(skip(self))]
    pub async fn list_documents(&self, username: &str) -> AppResult<Vec<Document>> {
        let documents: Vec<Document> = self
            .get(
                "/documents",
                &[("username", username)],
                "Failed to fetch documents",
            )
            .await?;
        tracing::debug!(count = documents.len(), "Fetched documents");
        Ok(documents)
    }

    /// Upload a local file as a new document.
    #[tracing::instrument(skip(self))]
    pub async fn upload_document(&self, username: &str, path: &Path) -> AppResult<Document> {
        self.send_upload(username, path, "Upload failed").await
    }

    /// Upload a new version of an existing document.
    ///
    /// The service treats this as a regular upload; callers keep the existing
    /// document's identifier and take name and expiration from the response.
    #[tracing::instrument(skip(self))]
    pub async fn replace_document(
        &self,
        username: &str,
        document_id: &str,
        path: &Path,
    ) -> AppResult<Document> {
        self.send_upload(username, path, "Replace failed").await
    }

    async fn send_upload(&self, username: &str, path: &Path, fallback: &str) -> AppResult<Document> {
        let upload = read_upload(path).await?;
        let size = upload.contents.len();

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(upload.contents)
                    .file_name(upload.file_name.clone()),
            )
            .text("username", username.to_string());

        let response: UploadResponse = self.post_multipart("/upload", form, fallback).await?;
        tracing::info!(
            document_id = %response.id,
            file_name = %upload.file_name,
            size,
            "Uploaded document"
        );
        Ok(response.into_document(upload.file_name))
    }

    /// Rename a document and set or clear its expiration date.
    #[tracing::instrument(skip(self, request), fields(document_id = %request.document_id))]
    pub async fn update_document(&self, request: &UpdateDocumentRequest) -> AppResult<()> {
        request.validate()?;
        self.post_json("/update_expiration", request, "Failed to update document")
            .await?;
        tracing::info!(expiration_date = %request.expiration_date, "Updated document");
        Ok(())
    }
}
