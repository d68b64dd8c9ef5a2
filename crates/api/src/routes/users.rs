//! User lookup handler.

use axum::{
    Json,
    extract::{Path, State},
};

use netvalue_shop_core::Email;

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::models::user::User;
use crate::state::AppState;

/// `GET /users/{email}`.
pub async fn show(State(state): State<AppState>, Path(email): Path<String>) -> Result<Json<User>> {
    tracing::info!(%email, "Fetching user");

    let user = match Email::parse(&email) {
        Ok(parsed) => UserRepository::new(state.pool()).get_by_email(&parsed).await?,
        Err(_) => None,
    };

    user.map(Json).ok_or_else(|| {
        tracing::warn!(%email, "User not found");
        AppError::NotFound("User not found".to_owned())
    })
}
