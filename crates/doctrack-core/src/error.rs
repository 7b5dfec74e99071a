//! Error types module
//!
//! All fallible client operations report an `AppError`. Expiration parsing
//! never does: a bad date becomes `Expiration::Malformed` and evaluates to
//! `Invalid Date`.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for rejected requests such as bad credentials
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Self-description of an error for logs and CLI output.
pub trait ErrorMetadata {
    /// Machine-readable error code (e.g., "API_ERROR")
    fn error_code(&self) -> &'static str;

    /// Whether repeating the same action may succeed
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the user
    fn suggested_action(&self) -> Option<&'static str>;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (error_code, recoverable, suggested_action, log_level).
fn app_error_static_metadata(err: &AppError) -> (&'static str, bool, Option<&'static str>, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (
            "INVALID_INPUT",
            false,
            Some("Check the arguments and try again"),
            LogLevel::Debug,
        ),
        AppError::Validation(_) => (
            "VALIDATION_ERROR",
            false,
            Some("Check field lengths and required values"),
            LogLevel::Debug,
        ),
        AppError::Unauthorized(_) => (
            "UNAUTHORIZED",
            false,
            Some("Log in again with valid credentials"),
            LogLevel::Warn,
        ),
        AppError::NotFound(_) => (
            "NOT_FOUND",
            false,
            Some("Verify the document ID exists"),
            LogLevel::Debug,
        ),
        AppError::Api { status, .. } if *status >= 500 => (
            "API_ERROR",
            true,
            Some("Retry after a short delay"),
            LogLevel::Error,
        ),
        AppError::Api { .. } => (
            "API_ERROR",
            false,
            Some("Check the request and try again"),
            LogLevel::Warn,
        ),
        AppError::Transport(_) => (
            "TRANSPORT_ERROR",
            true,
            Some("Check the API URL and network connectivity"),
            LogLevel::Error,
        ),
        AppError::Config(_) => (
            "CONFIG_ERROR",
            false,
            Some("Fix the DOCTRACK_* environment variables"),
            LogLevel::Error,
        ),
        AppError::Io(_) => (
            "IO_ERROR",
            false,
            Some("Check the file path and permissions"),
            LogLevel::Error,
        ),
        AppError::Internal(_) => ("INTERNAL_ERROR", false, None, LogLevel::Error),
    }
}

impl AppError {
    /// Builds an API error from a non-success status and the response body.
    ///
    /// The remote service reports failures as `{"error": "..."}`. When the body
    /// has that shape its message is used, otherwise `fallback`.
    pub fn from_response_body(status: u16, body: &str, fallback: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        match status {
            401 | 403 => AppError::Unauthorized(message),
            404 => AppError::NotFound(message),
            _ => AppError::Api { status, message },
        }
    }

    /// Message suitable for showing to the user, without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Transport(msg)
            | AppError::Config(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Validation(errs) => errs.to_string(),
            AppError::Io(err) => err.to_string(),
        }
    }
}

impl ErrorMetadata for AppError {
    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).0
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).1
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_message_is_used() {
        let err = AppError::from_response_body(400, r#"{"error":"Username taken"}"#, "Signup failed");
        assert_eq!(err.user_message(), "Username taken");
        assert!(matches!(err, AppError::Api { status: 400, .. }));
    }

    #[test]
    fn test_fallback_when_body_has_no_error_field() {
        let err = AppError::from_response_body(500, "<html>oops</html>", "Login failed");
        assert_eq!(err.user_message(), "Login failed");

        let err = AppError::from_response_body(400, r#"{"error":"  "}"#, "Login failed");
        assert_eq!(err.user_message(), "Login failed");
    }

    #[test]
    fn test_auth_statuses_map_to_unauthorized() {
        let err = AppError::from_response_body(401, r#"{"error":"Invalid credentials"}"#, "Login failed");
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Invalid credentials"));
        assert_eq!(err.error_code(), "UNAUTHORIZED");
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_server_errors_are_recoverable() {
        let server = AppError::Api {
            status: 503,
            message: "busy".to_string(),
        };
        let client = AppError::Api {
            status: 422,
            message: "bad".to_string(),
        };
        assert!(server.is_recoverable());
        assert!(!client.is_recoverable());
        assert!(AppError::Transport("refused".into()).is_recoverable());
    }

    #[test]
    fn test_display_includes_status() {
        let err = AppError::Api {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API request failed with status 502: bad gateway"
        );
    }
}
