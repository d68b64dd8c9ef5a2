//! Product repository for database operations.
//!
//! Listing and counting share one search predicate: a case-insensitive
//! substring match against name, SKU, the price rendered as text, and
//! description.

use sqlx::{PgPool, Postgres, QueryBuilder};

use netvalue_shop_core::ProductId;

use super::RepositoryError;
use crate::models::product::{Product, ProductInput};

const PRODUCT_COLUMNS: &str = "id, name, sku, price, description, image_url";

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    /// Rows skipped before this page starts.
    ///
    /// Saturates at `i64::MAX`; such an offset simply selects no rows.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        if self.page <= 1 || self.limit <= 0 {
            return 0;
        }
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Append the search predicate, if any.
fn push_search(builder: &mut QueryBuilder<'static, Postgres>, search: Option<&str>) {
    let Some(term) = search else {
        return;
    };
    let pattern = format!("%{term}%");

    builder
        .push(" WHERE name ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR sku ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR price::text ILIKE ")
        .push_bind(pattern.clone())
        .push(" OR description ILIKE ")
        .push_bind(pattern);
}

/// Build the listing query.
fn list_query(search: Option<&str>, page: Option<Page>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "SELECT {PRODUCT_COLUMNS} FROM netvalue_shop_products"
    ));
    push_search(&mut builder, search);
    builder.push(" ORDER BY id");

    if let Some(page) = page {
        builder
            .push(" OFFSET ")
            .push_bind(page.offset())
            .push(" LIMIT ")
            .push_bind(page.limit);
    }

    builder
}

/// Build the count query.
fn count_query(search: Option<&str>) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM netvalue_shop_products");
    push_search(&mut builder, search);
    builder
}

/// Repository for product database operations.
#[derive(Clone, Copy)]
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        tracing::info!(%id, "Fetching product");

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM netvalue_shop_products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// List products, optionally filtered and paged.
    ///
    /// Without a page every matching row is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        search: Option<&str>,
        page: Option<Page>,
    ) -> Result<Vec<Product>, RepositoryError> {
        tracing::info!(?search, ?page, "Fetching products");

        let mut builder = list_query(search, page);
        let products = builder
            .build_query_as::<Product>()
            .fetch_all(self.pool)
            .await?;

        Ok(products)
    }

    /// Count products matching the same predicate as [`Self::list`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self, search: Option<&str>) -> Result<i64, RepositoryError> {
        tracing::info!(?search, "Counting products");

        let mut builder = count_query(search);
        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        tracing::info!(name = %input.name, sku = %input.sku, "Creating product");

        sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO netvalue_shop_products (name, sku, price, description, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&input.name)
        .bind(&input.sku)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_insert(e, "product"))
    }

    /// Replace every field of a product.
    ///
    /// Returns `None` if no product has this ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        tracing::info!(%id, "Updating product");

        let product = sqlx::query_as::<_, Product>(&format!(
            r"
            UPDATE netvalue_shop_products
            SET name = $1, sku = $2, price = $3, description = $4, image_url = $5
            WHERE id = $6
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&input.name)
        .bind(&input.sku)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image_url)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Delete a product, returning the deleted row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a cart item still references it.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        tracing::info!(%id, "Deleting product");

        sqlx::query_as::<_, Product>(&format!(
            "DELETE FROM netvalue_shop_products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::Conflict(format!("product {id} is in a cart"));
            }
            RepositoryError::Database(e)
        })
    }

    /// Delete every product that no cart references.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn clear_unreferenced(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM netvalue_shop_products p
            WHERE NOT EXISTS (
                SELECT 1 FROM netvalue_shop_cart_items i WHERE i.product_id = p.id
            )
            ",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &str = " WHERE name ILIKE $1 OR sku ILIKE $2 OR price::text ILIKE $3 OR description ILIKE $4";

    #[test]
    fn test_page_offset() {
        assert_eq!(Page { page: 1, limit: 10 }.offset(), 0);
        assert_eq!(Page { page: 3, limit: 25 }.offset(), 50);
    }

    #[test]
    fn test_page_offset_saturates() {
        assert_eq!(Page { page: i64::MAX, limit: 10 }.offset(), i64::MAX);
        assert_eq!(Page { page: 2, limit: i64::MAX }.offset(), i64::MAX);
        assert_eq!(Page { page: 0, limit: 10 }.offset(), 0);
    }

    #[test]
    fn test_list_query_without_filters_returns_all_rows() {
        let builder = list_query(None, None);
        assert_eq!(
            builder.sql(),
            "SELECT id, name, sku, price, description, image_url FROM netvalue_shop_products ORDER BY id"
        );
    }

    #[test]
    fn test_list_query_with_search_and_page() {
        let builder = list_query(Some("mug"), Some(Page { page: 2, limit: 5 }));
        assert_eq!(
            builder.sql(),
            format!(
                "SELECT id, name, sku, price, description, image_url FROM netvalue_shop_products{SEARCH} ORDER BY id OFFSET $5 LIMIT $6"
            )
        );
    }

    #[test]
    fn test_list_query_page_without_search() {
        let builder = list_query(None, Some(Page { page: 1, limit: 10 }));
        assert!(builder.sql().ends_with(" ORDER BY id OFFSET $1 LIMIT $2"));
        assert!(!builder.sql().contains("ILIKE"));
    }

    #[test]
    fn test_count_query_mirrors_search() {
        assert_eq!(
            count_query(None).sql(),
            "SELECT COUNT(*) FROM netvalue_shop_products"
        );
        assert_eq!(
            count_query(Some("19.99")).sql(),
            format!("SELECT COUNT(*) FROM netvalue_shop_products{SEARCH}")
        );
    }
}
