//! doctrack core library
//!
//! Domain models, the expiration status evaluator, dashboard view state,
//! error types, configuration, and validation shared by the API client and
//! the CLI.

pub mod config;
pub mod error;
pub mod expiration;
pub mod models;
pub mod validation;
pub mod view_state;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{AppError, AppResult, ErrorMetadata, LogLevel};
pub use expiration::{
    evaluate, evaluate_now, evaluate_str, DayCount, DayDirection, Expiration, ExpirationStatus,
    StatusReport, EXPIRING_SOON_WINDOW_DAYS, NO_EXPIRATION_SENTINEL,
};
pub use view_state::{AuthMode, EditDraft, Session, Transition, ViewState};
