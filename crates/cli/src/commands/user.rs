//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! nv-cli user create -e jane@netvalue.io -f Jane -l Doe -p 'correct horse' -r admin
//! ```

use thiserror::Error;

use netvalue_shop_api::db::RepositoryError;
use netvalue_shop_api::db::users::{NewUser, UserRepository};
use netvalue_shop_api::services::auth::hash_password;
use netvalue_shop_core::{Email, EmailError, UserId, UserRole};

use super::ConnectError;

/// Minimum accepted password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: user, admin")]
    InvalidRole(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),

    /// Database error.
    #[error("Database error: {0}")]
    Repository(RepositoryError),
}

/// Validated arguments for a new user.
#[derive(Debug)]
struct UserArgs {
    email: Email,
    role: UserRole,
}

fn validate(email: &str, password: &str, role: &str) -> Result<UserArgs, UserError> {
    let role: UserRole = role
        .parse()
        .map_err(|_| UserError::InvalidRole(role.to_owned()))?;
    let email = Email::parse(email)?;

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserError::WeakPassword);
    }

    Ok(UserArgs { email, role })
}

/// Create a new user.
///
/// # Returns
///
/// The ID of the created user.
pub async fn create(
    email: &str,
    first_name: &str,
    last_name: &str,
    password: &str,
    role: &str,
) -> Result<UserId, UserError> {
    let args = validate(email, password, role)?;
    let password_hash = hash_password(password).map_err(|_| UserError::PasswordHash)?;

    let pool = super::connect().await?;

    tracing::info!("Creating user: {} ({})", args.email, args.role);

    let user = UserRepository::new(&pool)
        .create(&NewUser {
            email: &args.email,
            first_name,
            last_name,
            password_hash: &password_hash,
            role: args.role,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => UserError::UserExists(args.email.to_string()),
            other => UserError::Repository(other),
        })?;

    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Role: {}",
        user.user_id,
        user.email,
        user.role
    );

    Ok(user.user_id)
}
