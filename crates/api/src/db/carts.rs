//! Cart and cart-item persistence.
//!
//! Reads go through [`CartRepository`] and [`CartItemRepository`] on the pool.
//! Writes made while adding a product go through [`PgCartLedger`], which holds
//! one transaction for the whole add so item and cart totals commit together.

use sqlx::{PgPool, Postgres, Transaction};

use netvalue_shop_core::{CartId, CartItemId, CartStatus, Email, Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{Cart, CartItem, CartItemView, CartWithUser};
use crate::services::cart::CartLedger;

const SELECT_CART_BY_USER: &str = r"
    SELECT cart_id, user_id, total_quantity, total_price, status
    FROM netvalue_shop_carts
    WHERE user_id = $1
    ORDER BY cart_id
    LIMIT 1
";

const SELECT_CART_ITEM: &str = r"
    SELECT cart_item_id, cart_id, product_id, quantity, price
    FROM netvalue_shop_cart_items
    WHERE cart_id = $1 AND product_id = $2
    ORDER BY cart_item_id
    LIMIT 1
";

const INSERT_CART: &str = r"
    INSERT INTO netvalue_shop_carts (user_id, total_quantity, total_price, status)
    VALUES ($1, $2, $3, $4)
    RETURNING cart_id, user_id, total_quantity, total_price, status
";

const INSERT_CART_ITEM: &str = r"
    INSERT INTO netvalue_shop_cart_items (cart_id, product_id, quantity, price)
    VALUES ($1, $2, $3, $4)
    RETURNING cart_item_id, cart_id, product_id, quantity, price
";

// Repeated adds accumulate into the existing row.
const ADD_TO_CART_ITEM: &str = r"
    UPDATE netvalue_shop_cart_items
    SET quantity = quantity + $1, price = price + $2
    WHERE cart_item_id = $3
    RETURNING cart_item_id, cart_id, product_id, quantity, price
";

const ADD_TO_CART_TOTALS: &str = r"
    UPDATE netvalue_shop_carts
    SET total_quantity = total_quantity + $1,
        total_price = total_price + $2,
        status = $3
    WHERE cart_id = $4
    RETURNING cart_id, user_id, total_quantity, total_price, status
";

/// Repository for cart reads.
#[derive(Clone, Copy)]
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List every cart with its owner's name and email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_users(&self) -> Result<Vec<CartWithUser>, RepositoryError> {
        tracing::info!("Fetching carts");

        let carts = sqlx::query_as::<_, CartWithUser>(
            r"
            SELECT c.cart_id, c.user_id, c.total_quantity, c.total_price, c.status,
                   u.first_name AS user_first_name,
                   u.last_name AS user_last_name,
                   u.email AS user_email
            FROM netvalue_shop_carts c
            INNER JOIN netvalue_shop_users u ON c.user_id = u.user_id
            ORDER BY c.cart_id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(carts)
    }

    /// Get a user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        tracing::info!(%user_id, "Fetching cart by user");

        let cart = sqlx::query_as::<_, Cart>(SELECT_CART_BY_USER)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(cart)
    }
}

/// Repository for cart-item reads.
#[derive(Clone, Copy)]
pub struct CartItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartItemRepository<'a> {
    /// Create a new cart-item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a cart's lines with each product's name and image.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_with_products(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<CartItemView>, RepositoryError> {
        tracing::info!(%cart_id, "Fetching cart items");

        let items = sqlx::query_as::<_, CartItemView>(
            r"
            SELECT c.cart_item_id, c.cart_id, c.product_id, c.quantity, c.price,
                   p.name AS product_name,
                   p.image_url AS product_image_url
            FROM netvalue_shop_cart_items c
            INNER JOIN netvalue_shop_products p ON c.product_id = p.id
            WHERE c.cart_id = $1
            ORDER BY c.cart_item_id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }
}

/// Transactional cart writer.
///
/// Dropping the ledger without calling [`PgCartLedger::commit`] rolls back.
pub struct PgCartLedger {
    tx: Transaction<'static, Postgres>,
}

impl PgCartLedger {
    /// Open a transaction on the pool.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if no connection can be acquired.
    pub async fn begin(pool: &PgPool) -> Result<Self, RepositoryError> {
        Ok(Self {
            tx: pool.begin().await?,
        })
    }

    /// Commit every write made through this ledger.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the commit fails.
    pub async fn commit(self) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl CartLedger for PgCartLedger {
    async fn find_user_id(&mut self, email: &Email) -> Result<Option<UserId>, RepositoryError> {
        let user_id = sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM netvalue_shop_users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(user_id)
    }

    async fn find_cart(&mut self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(SELECT_CART_BY_USER)
            .bind(user_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(cart)
    }

    async fn create_cart(
        &mut self,
        user_id: UserId,
        quantity: i32,
        price: Price,
    ) -> Result<Cart, RepositoryError> {
        tracing::info!(%user_id, quantity, %price, "Creating cart");

        let cart = sqlx::query_as::<_, Cart>(INSERT_CART)
            .bind(user_id)
            .bind(quantity)
            .bind(price)
            .bind(CartStatus::Open)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(cart)
    }

    async fn find_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(SELECT_CART_ITEM)
            .bind(cart_id)
            .bind(product_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(item)
    }

    async fn create_item(
        &mut self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
        price: Price,
    ) -> Result<CartItem, RepositoryError> {
        tracing::info!(%cart_id, %product_id, quantity, %price, "Creating cart item");

        let item = sqlx::query_as::<_, CartItem>(INSERT_CART_ITEM)
            .bind(cart_id)
            .bind(product_id)
            .bind(quantity)
            .bind(price)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(item)
    }

    async fn add_to_item(
        &mut self,
        cart_item_id: CartItemId,
        quantity: i32,
        price: Price,
    ) -> Result<CartItem, RepositoryError> {
        tracing::info!(%cart_item_id, quantity, %price, "Adding to cart item");

        sqlx::query_as::<_, CartItem>(ADD_TO_CART_ITEM)
            .bind(quantity)
            .bind(price)
            .bind(cart_item_id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn add_to_cart(
        &mut self,
        cart_id: CartId,
        quantity: i32,
        price: Price,
    ) -> Result<Cart, RepositoryError> {
        tracing::info!(%cart_id, quantity, %price, "Adding to cart totals");

        sqlx::query_as::<_, Cart>(ADD_TO_CART_TOTALS)
            .bind(quantity)
            .bind(price)
            .bind(CartStatus::Updated)
            .bind(cart_id)
            .fetch_optional(&mut *self.tx)
            .await?
            .ok_or(RepositoryError::NotFound)
    }
}
