//! Dashboard session: the document client's state container.
//!
//! Each method performs at most one request and then applies one
//! [`Transition`]. Failures are logged and returned; the state is only
//! changed in the ways the matching failure transition describes.

use std::path::Path;

use chrono::{DateTime, TimeZone};
use doctrack_core::models::{Credentials, Document, DocumentRow};
use doctrack_core::{AppError, AppResult, EditDraft, ErrorMetadata, LogLevel, Transition, ViewState};

use crate::ApiClient;

/// Log a failed action at the level its error kind asks for.
fn log_failure(action: &str, err: &AppError) {
    let code = err.error_code();
    match err.log_level() {
        LogLevel::Debug => tracing::debug!(error = %err, code, "{}", action),
        LogLevel::Warn => tracing::warn!(error = %err, code, "{}", action),
        LogLevel::Error => tracing::error!(
            error = %err,
            code,
            suggestion = err.suggested_action().unwrap_or(""),
            "{}",
            action
        ),
    }
}

pub struct Dashboard {
    client: ApiClient,
    state: ViewState,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: ViewState::new(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Documents with status evaluated at `now`.
    pub fn rows<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<DocumentRow> {
        self.state.rows(now)
    }

    fn apply(&mut self, transition: Transition) {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(transition);
    }

    fn require_username(&self) -> AppResult<String> {
        self.state
            .username()
            .map(str::to_string)
            .ok_or_else(|| AppError::Unauthorized("Not logged in".to_string()))
    }

    /// Log in and fetch the user's documents.
    ///
    /// A failed fetch after a successful login leaves the session signed in
    /// and returns the fetch error.
    pub async fn login(&mut self, credentials: Credentials) -> AppResult<()> {
        if let Err(err) = self.client.login(&credentials).await {
            log_failure("Login failed", &err);
            self.apply(Transition::LoginFailed {
                message: err.user_message(),
            });
            return Err(err);
        }

        self.apply(Transition::LoginSucceeded {
            username: credentials.username,
        });
        self.refresh().await.map(|_| ())
    }

    /// Show the login form. Drops the session if one is active.
    pub fn show_login(&mut self) {
        self.apply(Transition::LoginRequested);
    }

    pub async fn signup(&mut self, credentials: Credentials) -> AppResult<()> {
        self.apply(Transition::SignupRequested);
        match self.client.signup(&credentials).await {
            Ok(()) => {
                self.apply(Transition::SignupSucceeded);
                Ok(())
            }
            Err(err) => {
                log_failure("Signup failed", &err);
                self.apply(Transition::SignupFailed {
                    message: err.user_message(),
                });
                Err(err)
            }
        }
    }

    /// Refetch the document list. Returns the number of documents.
    pub async fn refresh(&mut self) -> AppResult<usize> {
        let username = self.require_username()?;
        let documents = self
            .client
            .list_documents(&username)
            .await
            .inspect_err(|err| log_failure("Failed to fetch documents", err))?;

        let count = documents.len();
        self.apply(Transition::DocumentsFetched { documents });
        Ok(count)
    }

    pub async fn upload(&mut self, path: &Path) -> AppResult<Document> {
        let username = self.require_username()?;
        let document = self
            .client
            .upload_document(&username, path)
            .await
            .inspect_err(|err| log_failure("Upload failed", err))?;

        self.apply(Transition::DocumentUploaded {
            document: document.clone(),
        });
        Ok(document)
    }

    /// Re-upload `document_id` from `path`. The returned document keeps `document_id`.
    pub async fn replace(&mut self, document_id: &str, path: &Path) -> AppResult<Document> {
        let username = self.require_username()?;
        if self.state.document(document_id).is_none() {
            return Err(AppError::NotFound(format!("Document {}", document_id)));
        }

        let replacement = self
            .client
            .replace_document(&username, document_id, path)
            .await
            .inspect_err(|err| log_failure("Replace failed", err))?;

        self.apply(Transition::DocumentReplaced {
            document_id: document_id.to_string(),
            replacement,
        });
        self.state
            .document(document_id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Document {} vanished", document_id)))
    }

    pub fn open_edit(&mut self, document_id: &str) -> AppResult<&EditDraft> {
        self.require_username()?;
        self.apply(Transition::EditOpened {
            document_id: document_id.to_string(),
        });
        self.state
            .editing
            .as_ref()
            .ok_or_else(|| AppError::NotFound(format!("Document {}", document_id)))
    }

    pub fn set_edit_name(&mut self, name: &str) {
        self.apply(Transition::EditNameChanged {
            name: name.to_string(),
        });
    }

    /// Set the draft's expiration as `YYYY-MM-DD`, or empty to clear it.
    pub fn set_edit_expiration(&mut self, input: &str) {
        self.apply(Transition::EditExpirationChanged {
            input: input.to_string(),
        });
    }

    /// Send the open draft to the service and apply it locally.
    ///
    /// On failure the draft stays open.
    pub async fn save_edit(&mut self) -> AppResult<()> {
        self.require_username()?;
        let draft = self
            .state
            .editing
            .as_ref()
            .ok_or_else(|| AppError::InvalidInput("No document is being edited".to_string()))?;
        let request = draft.to_request()?;

        self.client
            .update_document(&request)
            .await
            .inspect_err(|err| log_failure("Failed to update document", err))?;

        self.apply(Transition::EditSaved { request });
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.apply(Transition::EditCancelled);
    }

    /// Drop the local session state. The server-side cookie is not revoked.
    pub fn sign_out(&mut self) {
        self.apply(Transition::SignedOut);
    }
}
