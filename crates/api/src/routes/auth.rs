//! Login route handler.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::db::UserRepository;
use crate::error::Result;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body returned on successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// `POST /auth/login`: exchange email and password for a one-hour token.
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginForm>,
) -> Result<Json<LoginResponse>> {
    let service = AuthService::new(UserRepository::new(state.pool()), state.tokens());
    let token = service.login(&form.email, &form.password).await?;
    Ok(Json(LoginResponse { token }))
}
