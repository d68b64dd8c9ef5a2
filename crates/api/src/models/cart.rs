//! Cart and cart-item types.

use serde::{Deserialize, Serialize};

use netvalue_shop_core::{CartId, CartItemId, CartStatus, Email, Price, ProductId, UserId};

/// A user's cart with running totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Cart {
    pub cart_id: CartId,
    pub user_id: UserId,
    /// Sum of every quantity ever added.
    pub total_quantity: i32,
    /// Sum of every price ever added.
    pub total_price: Price,
    pub status: CartStatus,
}

/// One product line in a cart.
///
/// `quantity` and `price` accumulate across repeated adds of the same product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CartItem {
    pub cart_item_id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Price,
}

/// A cart item joined with the product's display fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CartItemView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub item: CartItem,
    pub product_name: String,
    pub product_image_url: String,
}

/// A cart joined with its owner's name and email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CartWithUser {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub cart: Cart,
    pub user_first_name: String,
    pub user_last_name: String,
    pub user_email: Email,
}

/// A user's cart with its lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartDetails {
    pub cart: Cart,
    pub cart_items: Vec<CartItemView>,
}

/// Body of `POST /carts`.
///
/// The email stays a raw string so an unparsable address is reported the same
/// way as an unknown one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub user_email: String,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Price,
}
