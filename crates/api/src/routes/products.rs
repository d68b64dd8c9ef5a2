//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use netvalue_shop_core::ProductId;

use crate::db::{Page, ProductRepository};
use crate::error::{AppError, Result};
use crate::models::product::{Product, ProductInput, ProductPage};
use crate::services::catalog::{self, DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::state::AppState;

/// Listing query parameters.
///
/// `page` and `limit` stay raw strings so garbage falls back to the defaults
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Search-only query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

/// Body of `GET /products/total`.
#[derive(Debug, Serialize)]
pub struct ProductCount {
    pub count: i64,
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".to_owned())
}

/// `GET /products`: one page of products, optionally searched.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductPage>> {
    let search = catalog::normalize_search(query.search.as_deref());
    let page = Page {
        page: catalog::positive_or(query.page.as_deref(), DEFAULT_PAGE),
        limit: catalog::positive_or(query.limit.as_deref(), DEFAULT_LIMIT),
    };
    tracing::info!(?search, page = page.page, limit = page.limit, "Listing products");

    let products = ProductRepository::new(state.pool());
    Ok(Json(catalog::list_page(&products, search, page).await?))
}

/// `GET /products/total`: number of products matching the search.
pub async fn total(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ProductCount>> {
    let search = catalog::normalize_search(query.search.as_deref());
    let count = ProductRepository::new(state.pool()).count(search).await?;
    Ok(Json(ProductCount { count }))
}

/// `GET /products/{id}`.
pub async fn show(State(state): State<AppState>, Path(id): Path<ProductId>) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            tracing::warn!(%id, "Product not found");
            not_found()
        })
}

/// `POST /products`.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool()).create(&input).await?;
    tracing::info!(id = %product.id, "Product created");
    Ok(Json(product))
}

/// `PUT /products/{id}`: full replace.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .update(id, &input)
        .await?
        .map(Json)
        .ok_or_else(|| {
            tracing::warn!(%id, "Product to update not found");
            not_found()
        })
}

/// `DELETE /products/{id}`: returns the deleted row.
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .delete(id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            tracing::warn!(%id, "Product to delete not found");
            not_found()
        })
}
