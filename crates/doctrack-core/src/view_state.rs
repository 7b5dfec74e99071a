//! Dashboard view state.
//!
//! `ViewState` is an immutable value. Every user-visible change goes through
//! [`ViewState::apply`] with a [`Transition`], which returns the next state.
//! Document status is not part of the state; [`ViewState::rows`] derives it
//! for a given instant.

use chrono::{DateTime, TimeZone};
use serde::Serialize;

use crate::error::AppResult;
use crate::expiration::Expiration;
use crate::models::{Document, DocumentRow, UpdateDocumentRequest};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Session {
    SignedOut { mode: AuthMode },
    SignedIn { username: String },
}

impl Default for Session {
    fn default() -> Self {
        Session::SignedOut {
            mode: AuthMode::Login,
        }
    }
}

/// Open edit form for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditDraft {
    pub document_id: String,
    pub name: String,
    /// `YYYY-MM-DD`, or empty for no expiration.
    pub expiration_input: String,
    /// Stored value the service sent back unparsable. Saved as-is until the
    /// date input is changed.
    #[serde(skip)]
    unparsed_expiration: Option<Expiration>,
}

impl EditDraft {
    pub fn for_document(document: &Document) -> Self {
        EditDraft {
            document_id: document.id.clone(),
            name: document.document_name.clone(),
            expiration_input: document.expiration_date.to_iso().unwrap_or_default(),
            unparsed_expiration: match &document.expiration_date {
                Expiration::Malformed(_) => Some(document.expiration_date.clone()),
                _ => None,
            },
        }
    }

    /// Request body for saving this draft. Fails on an unparsable date input.
    pub fn to_request(&self) -> AppResult<UpdateDocumentRequest> {
        let expiration_date = match &self.unparsed_expiration {
            Some(stored) => stored.clone(),
            None => Expiration::from_iso(&self.expiration_input)?,
        };
        Ok(UpdateDocumentRequest {
            document_id: self.document_id.clone(),
            expiration_date,
            document_name: self.name.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    SignupRequested,
    LoginRequested,
    LoginSucceeded { username: String },
    LoginFailed { message: String },
    SignupSucceeded,
    SignupFailed { message: String },
    DocumentsFetched { documents: Vec<Document> },
    DocumentUploaded { document: Document },
    /// The server returned `replacement` for a re-upload of `document_id`.
    DocumentReplaced { document_id: String, replacement: Document },
    EditOpened { document_id: String },
    EditNameChanged { name: String },
    EditExpirationChanged { input: String },
    EditSaved { request: UpdateDocumentRequest },
    EditCancelled,
    SignedOut,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub session: Session,
    pub documents: Vec<Document>,
    pub editing: Option<EditDraft>,
    pub login_error: Option<String>,
    pub signup_error: Option<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(&self) -> Option<&str> {
        match &self.session {
            Session::SignedIn { username } => Some(username),
            Session::SignedOut { .. } => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.username().is_some()
    }

    pub fn document(&self, document_id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == document_id)
    }

    /// Documents with their status evaluated at `now`.
    pub fn rows<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<DocumentRow> {
        self.documents
            .iter()
            .map(|doc| DocumentRow::evaluate(doc, now))
            .collect()
    }

    /// Show the login or signup form. An active session is dropped first.
    fn with_auth_mode(self, mode: AuthMode) -> ViewState {
        let base = if self.is_signed_in() {
            ViewState::default()
        } else {
            self
        };
        ViewState {
            session: Session::SignedOut { mode },
            ..base
        }
    }

    pub fn apply(self, transition: Transition) -> ViewState {
        match transition {
            Transition::SignupRequested => self.with_auth_mode(AuthMode::Signup),
            Transition::LoginRequested => self.with_auth_mode(AuthMode::Login),
            Transition::LoginSucceeded { username } => ViewState {
                session: Session::SignedIn { username },
                documents: Vec::new(),
                editing: None,
                login_error: None,
                signup_error: None,
            },
            Transition::LoginFailed { message } => ViewState {
                login_error: Some(message),
                ..self
            },
            Transition::SignupSucceeded => ViewState {
                session: Session::SignedOut {
                    mode: AuthMode::Login,
                },
                signup_error: None,
                ..self
            },
            Transition::SignupFailed { message } => ViewState {
                signup_error: Some(message),
                ..self
            },
            Transition::DocumentsFetched { documents } => ViewState { documents, ..self },
            Transition::DocumentUploaded { document } => {
                let mut documents = self.documents;
                documents.push(document);
                ViewState { documents, ..self }
            }
            Transition::DocumentReplaced {
                document_id,
                replacement,
            } => {
                let documents = self
                    .documents
                    .into_iter()
                    .map(|doc| {
                        if doc.id == document_id {
                            Document {
                                id: doc.id,
                                ..replacement.clone()
                            }
                        } else {
                            doc
                        }
                    })
                    .collect();
                ViewState { documents, ..self }
            }
            Transition::EditOpened { document_id } => {
                let editing = self.document(&document_id).map(EditDraft::for_document);
                ViewState { editing, ..self }
            }
            Transition::EditNameChanged { name } => {
                let editing = self.editing.map(|draft| EditDraft { name, ..draft });
                ViewState { editing, ..self }
            }
            Transition::EditExpirationChanged { input } => {
                let editing = self.editing.map(|draft| EditDraft {
                    expiration_input: input,
                    unparsed_expiration: None,
                    ..draft
                });
                ViewState { editing, ..self }
            }
            Transition::EditSaved { request } => {
                let documents = self
                    .documents
                    .into_iter()
                    .map(|doc| {
                        if doc.id == request.document_id {
                            Document {
                                document_name: request.document_name.clone(),
                                expiration_date: request.expiration_date.clone(),
                                ..doc
                            }
                        } else {
                            doc
                        }
                    })
                    .collect();
                ViewState {
                    documents,
                    editing: None,
                    ..self
                }
            }
            Transition::EditCancelled => ViewState {
                editing: None,
                ..self
            },
            Transition::SignedOut => ViewState::default(),
        }
    }
}
