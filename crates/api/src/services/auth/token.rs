//! Login token signing.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use netvalue_shop_core::{UserId, UserRole};

use super::AuthError;

/// Claims carried by a login token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub role: UserRole,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
}

/// Signs HS256 tokens with the configured secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Tokens expire one hour after issue.
    pub const DEFAULT_TTL_SECS: i64 = 3600;

    /// Build an issuer for `secret` with the default lifetime.
    #[must_use]
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl: Duration::seconds(Self::DEFAULT_TTL_SECS),
        }
    }

    /// Sign a token for a user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if encoding fails.
    pub fn issue(&self, user_id: UserId, role: UserRole) -> Result<String, AuthError> {
        let iat = Utc::now();
        let claims = Claims {
            user_id,
            role,
            iat: iat.timestamp(),
            exp: (iat + self.ttl).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify a token's signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if the token is malformed, forged or expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::new(Algorithm::HS256))?;
        Ok(data.claims)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn issuer(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&SecretString::from(secret))
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = issuer("Qm7#vL2$xP9!rT4@kW8^nB3&yH6*zD1%");

        let token = tokens.issue(UserId::new(42), UserRole::Admin).unwrap();
        let claims = tokens.verify(&token).unwrap();

        assert_eq!(claims.user_id, UserId::new(42));
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let token = issuer("Qm7#vL2$xP9!rT4@kW8^nB3&yH6*zD1%")
            .issue(UserId::new(1), UserRole::User)
            .unwrap();

        let result = issuer("a-completely-different-signing-key!").verify(&token);
        assert!(matches!(result, Err(AuthError::Token(_))));
    }

    #[test]
    fn test_claims_use_user_id_key() {
        let claims = Claims {
            user_id: UserId::new(3),
            role: UserRole::User,
            iat: 0,
            exp: 3600,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["userId"], 3);
        assert_eq!(json["role"], "user");
    }
}
