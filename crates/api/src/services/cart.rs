//! Cart aggregation.
//!
//! Adding a product is additive: a repeat add of the same product increases
//! the existing line by the request's quantity and price, and every add
//! increases the cart totals by the same amounts. Nothing here is idempotent.

use std::future::Future;

use thiserror::Error;

use netvalue_shop_core::{CartId, CartItemId, Email, Price, ProductId, UserId};

use crate::db::RepositoryError;
use crate::models::cart::{AddToCartRequest, Cart, CartItem};

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The email does not belong to any user.
    #[error("invalid user: {0}")]
    InvalidUser(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Storage steps the add-to-cart workflow is built from.
///
/// Implementations take `&mut self` so a single transaction can back every
/// step of one add.
pub trait CartLedger {
    fn find_user_id(
        &mut self,
        email: &Email,
    ) -> impl Future<Output = Result<Option<UserId>, RepositoryError>> + Send;

    fn find_cart(
        &mut self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Cart>, RepositoryError>> + Send;

    /// Insert an `OPEN` cart whose totals are the first line's values.
    fn create_cart(
        &mut self,
        user_id: UserId,
        quantity: i32,
        price: Price,
    ) -> impl Future<Output = Result<Cart, RepositoryError>> + Send;

    fn find_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> impl Future<Output = Result<Option<CartItem>, RepositoryError>> + Send;

    fn create_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        price: Price,
    ) -> impl Future<Output = Result<CartItem, RepositoryError>> + Send;

    /// Add `quantity` and `price` to an existing line.
    fn add_to_item(
        &mut self,
        cart_item_id: CartItemId,
        quantity: i32,
        price: Price,
    ) -> impl Future<Output = Result<CartItem, RepositoryError>> + Send;

    /// Add to the cart totals and mark it `UPDATED`.
    fn add_to_cart(
        &mut self,
        cart_id: CartId,
        quantity: i32,
        price: Price,
    ) -> impl Future<Output = Result<Cart, RepositoryError>> + Send;
}

/// Add a product to the user's cart, creating the cart on first use.
///
/// Returns the created or updated cart.
///
/// # Errors
///
/// Returns `CartError::InvalidUser` if `user_email` is malformed or unknown.
/// Returns `CartError::Repository` if any storage step fails.
pub async fn add_product_to_cart<L: CartLedger + Send>(
    ledger: &mut L,
    request: &AddToCartRequest,
) -> Result<Cart, CartError> {
    let AddToCartRequest {
        user_email,
        product_id,
        quantity,
        price,
    } = request;
    let (product_id, quantity, price) = (*product_id, *quantity, *price);

    let Ok(email) = Email::parse(user_email) else {
        tracing::warn!(user_email = %user_email, "Malformed user email");
        return Err(CartError::InvalidUser(user_email.clone()));
    };
    let Some(user_id) = ledger.find_user_id(&email).await? else {
        tracing::warn!(%email, "User not found");
        return Err(CartError::InvalidUser(user_email.clone()));
    };

    tracing::info!(%user_id, %product_id, quantity, %price, "Adding product to cart");

    let Some(cart) = ledger.find_cart(user_id).await? else {
        tracing::info!(%user_id, "No cart found, creating one");
        let cart = ledger.create_cart(user_id, quantity, price).await?;
        ledger
            .create_item(cart.cart_id, product_id, quantity, price)
            .await?;
        return Ok(cart);
    };

    match ledger.find_item(cart.cart_id, product_id).await? {
        Some(item) => {
            tracing::info!(cart_item_id = %item.cart_item_id, "Product already in cart");
            ledger
                .add_to_item(item.cart_item_id, quantity, price)
                .await?;
        }
        None => {
            ledger
                .create_item(cart.cart_id, product_id, quantity, price)
                .await?;
        }
    }

    Ok(ledger.add_to_cart(cart.cart_id, quantity, price).await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    use netvalue_shop_core::CartStatus;

    /// In-memory ledger with SERIAL-like id assignment.
    #[derive(Default)]
    struct MemoryLedger {
        users: Vec<(Email, UserId)>,
        carts: Vec<Cart>,
        items: Vec<CartItem>,
    }

    impl MemoryLedger {
        fn with_user(email: &str, id: i32) -> Self {
            Self {
                users: vec![(Email::parse(email).unwrap(), UserId::new(id))],
                ..Self::default()
            }
        }

        fn next_id(len: usize) -> i32 {
            i32::try_from(len).unwrap() + 1
        }
    }

    impl CartLedger for MemoryLedger {
        async fn find_user_id(&mut self, email: &Email) -> Result<Option<UserId>, RepositoryError> {
            Ok(self.users.iter().find(|(e, _)| e == email).map(|(_, id)| *id))
        }

        async fn find_cart(&mut self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
            Ok(self.carts.iter().find(|c| c.user_id == user_id).cloned())
        }

        async fn create_cart(
            &mut self,
            user_id: UserId,
            quantity: i32,
            price: Price,
        ) -> Result<Cart, RepositoryError> {
            let cart = Cart {
                cart_id: CartId::new(Self::next_id(self.carts.len())),
                user_id,
                total_quantity: quantity,
                total_price: price,
                status: CartStatus::Open,
            };
            self.carts.push(cart.clone());
            Ok(cart)
        }

        async fn find_item(
            &mut self,
            cart_id: CartId,
            product_id: ProductId,
        ) -> Result<Option<CartItem>, RepositoryError> {
            Ok(self
                .items
                .iter()
                .find(|i| i.cart_id == cart_id && i.product_id == product_id)
                .cloned())
        }

        async fn create_item(
            &mut self,
            cart_id: CartId,
            product_id: ProductId,
            quantity: i32,
            price: Price,
        ) -> Result<CartItem, RepositoryError> {
            let item = CartItem {
                cart_item_id: CartItemId::new(Self::next_id(self.items.len())),
                cart_id,
                product_id,
                quantity,
                price,
            };
            self.items.push(item.clone());
            Ok(item)
        }

        async fn add_to_item(
            &mut self,
            cart_item_id: CartItemId,
            quantity: i32,
            price: Price,
        ) -> Result<CartItem, RepositoryError> {
            let item = self
                .items
                .iter_mut()
                .find(|i| i.cart_item_id == cart_item_id)
                .ok_or(RepositoryError::NotFound)?;
            item.quantity += quantity;
            item.price += price;
            Ok(item.clone())
        }

        async fn add_to_cart(
            &mut self,
            cart_id: CartId,
            quantity: i32,
            price: Price,
        ) -> Result<Cart, RepositoryError> {
            let cart = self
                .carts
                .iter_mut()
                .find(|c| c.cart_id == cart_id)
                .ok_or(RepositoryError::NotFound)?;
            cart.total_quantity += quantity;
            cart.total_price += price;
            cart.status = CartStatus::Updated;
            Ok(cart.clone())
        }
    }

    fn add(email: &str, product: i32, quantity: i32, cents: i64) -> AddToCartRequest {
        AddToCartRequest {
            user_email: email.to_owned(),
            product_id: ProductId::new(product),
            quantity,
            price: Price::from_cents(cents),
        }
    }

    const SHOPPER: &str = "shopper@netvalue.io";

    #[tokio::test]
    async fn test_first_add_creates_open_cart_and_one_item() {
        let mut ledger = MemoryLedger::with_user(SHOPPER, 1);

        let cart = add_product_to_cart(&mut ledger, &add(SHOPPER, 10, 2, 3000))
            .await
            .unwrap();

        assert_eq!(cart.status, CartStatus::Open);
        assert_eq!(cart.total_quantity, 2);
        assert_eq!(cart.total_price, Price::from_cents(3000));
        assert_eq!(ledger.carts.len(), 1);
        assert_eq!(ledger.items.len(), 1);
        assert_eq!(ledger.items[0].quantity, 2);
        assert_eq!(ledger.items[0].price, Price::from_cents(3000));
    }

    #[tokio::test]
    async fn test_repeat_add_accumulates_item_and_totals() {
        let mut ledger = MemoryLedger::with_user(SHOPPER, 1);

        add_product_to_cart(&mut ledger, &add(SHOPPER, 10, 2, 3000))
            .await
            .unwrap();
        let cart = add_product_to_cart(&mut ledger, &add(SHOPPER, 10, 1, 1500))
            .await
            .unwrap();

        assert_eq!(ledger.items.len(), 1);
        assert_eq!(ledger.items[0].quantity, 3);
        assert_eq!(ledger.items[0].price, Price::from_cents(4500));
        assert_eq!(cart.total_quantity, 3);
        assert_eq!(cart.total_price, Price::from_cents(4500));
        assert_eq!(cart.status, CartStatus::Updated);
    }

    #[tokio::test]
    async fn test_different_product_adds_new_line_only() {
        let mut ledger = MemoryLedger::with_user(SHOPPER, 1);

        add_product_to_cart(&mut ledger, &add(SHOPPER, 10, 2, 3000))
            .await
            .unwrap();
        let cart = add_product_to_cart(&mut ledger, &add(SHOPPER, 11, 4, 800))
            .await
            .unwrap();

        assert_eq!(ledger.carts.len(), 1);
        assert_eq!(ledger.items.len(), 2);
        assert_eq!(ledger.items[0].quantity, 2);
        assert_eq!(ledger.items[0].price, Price::from_cents(3000));
        assert_eq!(ledger.items[1].product_id, ProductId::new(11));
        assert_eq!(cart.total_quantity, 6);
        assert_eq!(cart.total_price, Price::from_cents(3800));
    }

    #[tokio::test]
    async fn test_unknown_user_is_rejected_without_writes() {
        let mut ledger = MemoryLedger::with_user(SHOPPER, 1);

        let err = add_product_to_cart(&mut ledger, &add("ghost@netvalue.io", 10, 1, 100))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::InvalidUser(ref e) if e == "ghost@netvalue.io"));
        assert!(ledger.carts.is_empty());
        assert!(ledger.items.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_email_is_an_invalid_user() {
        let mut ledger = MemoryLedger::with_user(SHOPPER, 1);

        let err = add_product_to_cart(&mut ledger, &add("not-an-email", 10, 1, 100))
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::InvalidUser(_)));
        assert!(ledger.carts.is_empty());
    }

    #[tokio::test]
    async fn test_carts_are_per_user() {
        let mut ledger = MemoryLedger::with_user(SHOPPER, 1);
        ledger
            .users
            .push((Email::parse("other@netvalue.io").unwrap(), UserId::new(2)));

        add_product_to_cart(&mut ledger, &add(SHOPPER, 10, 1, 100))
            .await
            .unwrap();
        let other = add_product_to_cart(&mut ledger, &add("other@netvalue.io", 10, 5, 500))
            .await
            .unwrap();

        assert_eq!(ledger.carts.len(), 2);
        assert_eq!(other.user_id, UserId::new(2));
        assert_eq!(other.status, CartStatus::Open);
        assert_eq!(ledger.carts[0].total_quantity, 1);
    }
}
