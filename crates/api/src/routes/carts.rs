//! Cart route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use netvalue_shop_core::Email;

use crate::db::{CartItemRepository, CartRepository, PgCartLedger, UserRepository};
use crate::error::Result;
use crate::models::cart::{AddToCartRequest, Cart, CartDetails, CartWithUser};
use crate::services::cart::{self, CartError};
use crate::state::AppState;

/// `GET /carts`: every cart with its owner.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<CartWithUser>>> {
    let carts = CartRepository::new(state.pool()).list_with_users().await?;
    Ok(Json(carts))
}

/// `GET /carts/{user_email}`: the user's cart and lines, or `{}` if they have none.
pub async fn show(State(state): State<AppState>, Path(user_email): Path<String>) -> Result<Response> {
    let pool = state.pool();

    let user = match Email::parse(&user_email) {
        Ok(email) => UserRepository::new(pool).get_by_email(&email).await?,
        Err(_) => None,
    };
    let Some(user) = user else {
        tracing::info!(%user_email, "User not found");
        return Err(CartError::InvalidUser(user_email).into());
    };

    let Some(cart) = CartRepository::new(pool).get_by_user(user.user_id).await? else {
        tracing::info!(user_id = %user.user_id, "No cart found");
        return Ok(Json(json!({})).into_response());
    };

    let cart_items = CartItemRepository::new(pool)
        .list_with_products(cart.cart_id)
        .await?;

    Ok(Json(CartDetails { cart, cart_items }).into_response())
}

/// `POST /carts`: add a product to the user's cart.
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<Cart>> {
    let mut ledger = PgCartLedger::begin(state.pool()).await?;
    let cart = cart::add_product_to_cart(&mut ledger, &request).await?;
    ledger.commit().await?;

    Ok(Json(cart))
}
