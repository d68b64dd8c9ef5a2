//! Shared-secret gate applied to every route.
//!
//! Every request must carry the configured key in `x-api-key`. A missing (or
//! empty) header is answered with 401, a wrong key with 403, and no handler
//! runs in either case.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::error::AppError;
use crate::state::AppState;

/// The HTTP header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Compare two keys without short-circuiting on the first differing byte.
fn keys_match(presented: &[u8], expected: &[u8]) -> bool {
    presented.ct_eq(expected).into()
}

/// Middleware that rejects requests without the shared API key.
///
/// # Errors
///
/// Returns `AppError::Unauthorized` if the header is absent or empty.
/// Returns `AppError::Forbidden` if the key does not match.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .map(axum::http::HeaderValue::as_bytes)
        .filter(|v| !v.is_empty());

    let Some(presented) = presented else {
        tracing::warn!(uri = %request.uri(), "API key is missing");
        return Err(AppError::Unauthorized("API key is missing".to_owned()));
    };

    if !keys_match(presented, state.config().api_key.expose_secret().as_bytes()) {
        tracing::warn!(uri = %request.uri(), "Invalid API key");
        return Err(AppError::Forbidden("Invalid API key".to_owned()));
    }

    tracing::debug!("API key is valid");
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_match() {
        assert!(keys_match(b"k3y-Vq8Zr2Lm9Tx4", b"k3y-Vq8Zr2Lm9Tx4"));
        assert!(!keys_match(b"k3y-Vq8Zr2Lm9Tx5", b"k3y-Vq8Zr2Lm9Tx4"));
        assert!(!keys_match(b"k3y", b"k3y-Vq8Zr2Lm9Tx4"));
        assert!(!keys_match(b"", b"k3y-Vq8Zr2Lm9Tx4"));
    }
}
