//! User domain types.

use serde::Serialize;

use netvalue_shop_core::{Email, UserId, UserRole};

/// A shop user as returned by the API.
///
/// The password hash lives on [`UserCredentials`] and never reaches a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID.
    pub user_id: UserId,
    /// User's email address (unique).
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    /// Role embedded in issued tokens.
    pub role: UserRole,
}

/// A user together with the stored Argon2 PHC hash, used only by login.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    #[sqlx(rename = "password")]
    pub password_hash: String,
}
