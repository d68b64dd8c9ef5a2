//! Product catalog types.

use serde::{Deserialize, Serialize};

use netvalue_shop_core::{Price, ProductId};

/// A catalog product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Price,
    pub description: String,
    pub image_url: String,
}

/// Full field set accepted by create and update.
///
/// Update is a full replace, so every field is required on both paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub sku: String,
    pub price: Price,
    pub description: String,
    pub image_url: String,
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// 1-based page number that was requested.
    pub page: i64,
    /// `ceil(total / limit)`, or 0 when nothing matched.
    pub total_pages: i64,
    pub limit: i64,
    /// Number of products matching the search.
    pub total: i64,
    pub data: Vec<Product>,
}

impl ProductPage {
    /// The page returned when no product matches.
    #[must_use]
    pub const fn empty(page: i64, limit: i64) -> Self {
        Self {
            page,
            total_pages: 0,
            limit,
            total: 0,
            data: Vec::new(),
        }
    }
}
