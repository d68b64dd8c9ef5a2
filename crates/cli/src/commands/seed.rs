//! Seed the product catalog from a YAML file.
//!
//! The file holds a `products` list using the same field names as the
//! `POST /products` body:
//!
//! ```yaml
//! products:
//!   - name: Oak Desk
//!     sku: DESK-OAK-01
//!     price: "249.00"
//!     description: Solid oak writing desk
//!     imageUrl: https://cdn.netvalue.io/desk-oak.png
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use netvalue_shop_api::db::{ProductRepository, RepositoryError};
use netvalue_shop_api::models::ProductInput;
use netvalue_shop_core::Price;

use super::ConnectError;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} validation errors found")]
    Invalid(usize),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Top-level layout of a product seed file.
#[derive(Debug, Deserialize)]
struct ProductSeedFile {
    products: Vec<ProductInput>,
}

fn parse_products(content: &str) -> Result<Vec<ProductInput>, serde_yaml::Error> {
    serde_yaml::from_str::<ProductSeedFile>(content).map(|file| file.products)
}

/// Check each entry and return one message per problem.
fn validate_products(products: &[ProductInput]) -> Vec<String> {
    let mut errors = Vec::new();
    for (index, product) in products.iter().enumerate() {
        if product.name.trim().is_empty() {
            errors.push(format!("product #{}: name is empty", index + 1));
        }
        if product.sku.trim().is_empty() {
            errors.push(format!("product #{}: sku is empty", index + 1));
        }
        if product.price < Price::ZERO {
            errors.push(format!("product #{} ({}): price is negative", index + 1, product.sku));
        }
    }
    errors
}

/// Insert every product in `file_path`.
///
/// With `clear_existing`, products that no cart item references are deleted
/// first. Referenced products are kept so existing carts stay intact.
pub async fn products(file_path: &str, clear_existing: bool) -> Result<(), SeedError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::FileNotFound(file_path.to_owned()));
    }

    info!(path = %file_path, "Loading products from file");

    // Read and validate before connecting to the database
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_products(&content)?;

    let errors = validate_products(&products);
    if !errors.is_empty() {
        error!("Seed file validation failed:");
        for err in &errors {
            error!("  - {err}");
        }
        return Err(SeedError::Invalid(errors.len()));
    }

    info!(count = products.len(), "Seed file validated");

    let pool = super::connect().await?;
    let repo = ProductRepository::new(&pool);

    if clear_existing {
        let removed = repo.clear_unreferenced().await?;
        info!(removed, "Cleared unreferenced products");
    }

    for input in &products {
        let product = repo.create(input).await?;
        info!(id = %product.id, sku = %product.sku, "Inserted product");
    }

    info!(inserted = products.len(), "Product seeding complete");
    Ok(())
}
