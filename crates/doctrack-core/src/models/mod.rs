//! Data models for the document client
//!
//! Wire shapes exchanged with the remote document service plus the derived
//! row type used for display.

mod auth;
mod document;

pub use auth::*;
pub use document::*;
