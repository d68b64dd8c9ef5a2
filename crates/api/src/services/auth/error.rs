//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user has this email (or the email is malformed).
    #[error("User with email {0} not found")]
    UserNotFound(String),

    /// The password does not match the stored hash.
    #[error("Invalid password for user {0}")]
    InvalidCredentials(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing or decoding failed.
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Whether the caller supplied bad credentials, as opposed to a server fault.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::InvalidCredentials(_))
    }
}
