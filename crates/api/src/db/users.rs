//! User repository for database operations.
//!
//! The API only reads users; rows are written by `nv-cli user create`.

use sqlx::PgPool;

use netvalue_shop_core::{Email, UserRole};

use super::RepositoryError;
use crate::models::user::{User, UserCredentials};

const SELECT_USER: &str = r"
    SELECT user_id, email, first_name, last_name, role
    FROM netvalue_shop_users
    WHERE email = $1
";

const SELECT_CREDENTIALS: &str = r"
    SELECT user_id, email, first_name, last_name, role, password
    FROM netvalue_shop_users
    WHERE email = $1
";

/// Fields needed to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub email: &'a Email,
    pub first_name: &'a str,
    pub last_name: &'a str,
    /// Argon2 PHC string, never the plaintext.
    pub password_hash: &'a str,
    pub role: UserRole,
}

/// Repository for user database operations.
#[derive(Clone, Copy)]
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        tracing::info!(%email, "Fetching user by email");

        let user = sqlx::query_as::<_, User>(SELECT_USER)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(user)
    }

    /// Get a user together with their password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<UserCredentials>, RepositoryError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(SELECT_CREDENTIALS)
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(credentials)
    }

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new_user: &NewUser<'_>) -> Result<User, RepositoryError> {
        tracing::info!(email = %new_user.email, role = %new_user.role, "Creating user");

        sqlx::query_as::<_, User>(
            r"
            INSERT INTO netvalue_shop_users (email, first_name, last_name, password, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id, email, first_name, last_name, role
            ",
        )
        .bind(new_user.email)
        .bind(new_user.first_name)
        .bind(new_user.last_name)
        .bind(new_user.password_hash)
        .bind(new_user.role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "email"))
    }
}
