//! Authentication service.
//!
//! Password login against Argon2 PHC hashes, answered with a signed token.

mod error;
mod token;

pub use error::AuthError;
pub use token::{Claims, TokenIssuer};

use std::future::Future;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use netvalue_shop_core::Email;

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::UserCredentials;

/// Lookup of stored credentials by email.
pub trait CredentialStore {
    fn credentials(
        &self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<UserCredentials>, RepositoryError>> + Send;
}

impl CredentialStore for UserRepository<'_> {
    async fn credentials(&self, email: &Email) -> Result<Option<UserCredentials>, RepositoryError> {
        self.get_credentials(email).await
    }
}

/// Authentication service.
pub struct AuthService<'a, S> {
    users: S,
    tokens: &'a TokenIssuer,
}

impl<'a, S: CredentialStore + Sync> AuthService<'a, S> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: S, tokens: &'a TokenIssuer) -> Self {
        Self { users, tokens }
    }

    /// Login with email and password, returning a signed token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no user has this email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, AuthError> {
        tracing::info!(%email, "Logging in user");

        let Ok(parsed) = Email::parse(email) else {
            tracing::warn!(%email, "Malformed email on login");
            return Err(AuthError::UserNotFound(email.to_owned()));
        };

        let Some(credentials) = self.users.credentials(&parsed).await? else {
            tracing::warn!(%email, "User not found");
            return Err(AuthError::UserNotFound(email.to_owned()));
        };

        if verify_password(password, &credentials.password_hash).is_err() {
            tracing::warn!(%email, "Invalid password");
            return Err(AuthError::InvalidCredentials(email.to_owned()));
        }

        let user = credentials.user;
        let token = self.tokens.issue(user.user_id, user.role)?;
        tracing::info!(user_id = %user.user_id, "User logged in");

        Ok(token)
    }
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHash)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::PasswordHash)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use netvalue_shop_core::{UserId, UserRole};

    use super::*;
    use crate::models::user::User;

    struct OneUser(UserCredentials);

    impl CredentialStore for OneUser {
        async fn credentials(
            &self,
            email: &Email,
        ) -> Result<Option<UserCredentials>, RepositoryError> {
            Ok((self.0.user.email == *email).then(|| self.0.clone()))
        }
    }

    fn store(password: &str) -> OneUser {
        OneUser(UserCredentials {
            user: User {
                user_id: UserId::new(5),
                email: Email::parse("jane@netvalue.io").unwrap(),
                first_name: "Jane".to_owned(),
                last_name: "Doe".to_owned(),
                role: UserRole::User,
            },
            password_hash: hash_password(password).unwrap(),
        })
    }

    fn tokens() -> TokenIssuer {
        TokenIssuer::new(&SecretString::from("Qm7#vL2$xP9!rT4@kW8^nB3&yH6*zD1%"))
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(verify_password("wrong horse", &hash).is_err());
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let tokens = tokens();
        let service = AuthService::new(store("s3cret!"), &tokens);

        let err = service.login("john@netvalue.io", "s3cret!").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound(ref e) if e == "john@netvalue.io"));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let tokens = tokens();
        let service = AuthService::new(store("s3cret!"), &tokens);

        let err = service.login("jane@netvalue.io", "guess").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(_)));
        assert_eq!(err.to_string(), "Invalid password for user jane@netvalue.io");
    }

    #[tokio::test]
    async fn test_login_success_issues_one_hour_token() {
        let tokens = tokens();
        let service = AuthService::new(store("s3cret!"), &tokens);

        let token = service.login("jane@netvalue.io", "s3cret!").await.unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.user_id, UserId::new(5));
        assert_eq!(claims.role, UserRole::User);
        assert_eq!(claims.exp - claims.iat, TokenIssuer::DEFAULT_TTL_SECS);
    }

    #[tokio::test]
    async fn test_login_malformed_email_is_not_found() {
        let tokens = tokens();
        let service = AuthService::new(store("s3cret!"), &tokens);

        let err = service.login("jane", "s3cret!").await.unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound(_)));
    }
}
