//! HTTP client for the remote document service.
//!
//! Provides a minimal client with a cookie-backed session, generic JSON and
//! multipart helpers, and domain methods (login, signup, list, upload,
//! update). [`Dashboard`] pairs the client with a `ViewState` so that every
//! user action is one request followed by one state transition.

pub mod api;
pub mod dashboard;

use doctrack_core::{AppError, AppResult, ClientConfig};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use dashboard::Dashboard;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// HTTP client for the document service.
///
/// The service authenticates with a session cookie set by `/login`, so the
/// underlying reqwest client keeps a cookie store. Clones share that store.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> AppResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: doctrack_core::config::normalize_api_url(base_url)?,
        })
    }

    pub fn from_config(config: &ClientConfig) -> AppResult<Self> {
        Self::with_timeout(&config.api_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn non-success statuses into `AppError`s.
    ///
    /// `fallback` is the message used when the error body has no `error` field.
    async fn send(&self, request: RequestBuilder, fallback: &str) -> AppResult<Response> {
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::from_response_body(
                status.as_u16(),
                &error_text,
                fallback,
            ));
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(transport_error)?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::Api {
            status,
            message: format!("Failed to parse response as JSON: {}", e),
        })
    }

    /// GET request with query parameters. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        fallback: &str,
    ) -> AppResult<T> {
        let mut request = self.client.get(self.build_url(path));
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = self.send(request, fallback).await?;
        Self::decode(response).await
    }

    /// POST JSON body and ignore the response body.
    pub async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> AppResult<()> {
        let request = self.client.post(self.build_url(path)).json(body);
        self.send(request, fallback).await?;
        Ok(())
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        fallback: &str,
    ) -> AppResult<T> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        let response = self.send(request, fallback).await?;
        Self::decode(response).await
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Transport(format!("Request timed out: {}", err))
    } else {
        AppError::Transport(format!("Failed to send request: {}", err))
    }
}

// Re-export domain types for convenience.
pub use doctrack_core::models::{Credentials, Document, UpdateDocumentRequest, UploadResponse};
