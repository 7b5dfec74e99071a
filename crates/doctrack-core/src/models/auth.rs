use serde::Serialize;
use std::fmt;
use validator::Validate;

/// Username and password for `/login` and `/signup`.
#[derive(Clone, Serialize, Validate)]
pub struct Credentials {
    #[validate(length(
        min = 1,
        max = 64,
        message = "Username must be between 1 and 64 characters"
    ))]
    pub username: String,
    #[validate(length(
        min = 1,
        max = 256,
        message = "Password must be between 1 and 256 characters"
    ))]
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into().trim().to_string(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
