//! Domain models for the shop API.
//!
//! Row types derive `sqlx::FromRow` and serialize with the column names used
//! by the schema (`user_id`, `total_price`, ...). Request payloads use the
//! camelCase keys clients send (`imageUrl`, `userEmail`).

pub mod cart;
pub mod product;
pub mod user;

pub use cart::{AddToCartRequest, Cart, CartDetails, CartItem, CartItemView, CartWithUser};
pub use product::{Product, ProductInput, ProductPage};
pub use user::{User, UserCredentials};
