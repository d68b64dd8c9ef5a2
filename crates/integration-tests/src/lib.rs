//! End-to-end tests for the NetValue shop API.
//!
//! Every test in `tests/` talks to a running server over HTTP and is marked
//! `#[ignore]`, so a plain `cargo test` stays offline.
//!
//! # Running Tests
//!
//! ```bash
//! nv-cli migrate
//! nv-cli user create -e e2e@netvalue.io -f E2E -l Tester -p 'e2e-password'
//! cargo run -p netvalue-shop-api &
//! cargo test -p netvalue-shop-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `SHOP_BASE_URL` - API base URL (default: `http://localhost:3000`)
//! - `SHOP_API_KEY` - value sent in `x-api-key` (falls back to `API_KEY`)
//! - `SHOP_TEST_EMAIL` / `SHOP_TEST_PASSWORD` - credentials of a seeded user

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{Value, json};

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Connection details for a running shop API.
#[derive(Debug, Clone)]
pub struct TestContext {
    /// Client that sends the API key on every request.
    pub client: Client,
    /// Client that sends no API key.
    pub anonymous: Client,
    pub base_url: String,
    pub api_key: String,
}

impl TestContext {
    /// Build a context from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SHOP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());
        let api_key = std::env::var("SHOP_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .expect("SHOP_API_KEY or API_KEY must be set");

        let mut headers = HeaderMap::new();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&api_key).expect("API key is not a valid header value"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            anonymous: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Credentials of the seeded test user.
    #[must_use]
    pub fn test_user() -> (String, String) {
        let email = std::env::var("SHOP_TEST_EMAIL").expect("SHOP_TEST_EMAIL must be set");
        let password =
            std::env::var("SHOP_TEST_PASSWORD").expect("SHOP_TEST_PASSWORD must be set");
        (email, password)
    }

    /// Create a product with a unique SKU and return its JSON body.
    pub async fn create_product(&self, name: &str, price: &str) -> Value {
        let sku = format!("E2E-{}", uuid::Uuid::new_v4().simple());
        let resp = self
            .client
            .post(self.url("/products"))
            .json(&json!({
                "name": name,
                "sku": sku,
                "price": price,
                "description": "created by integration tests",
                "imageUrl": "https://cdn.netvalue.io/e2e.png",
            }))
            .send()
            .await
            .expect("Failed to create product");

        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        resp.json().await.expect("Product body is not JSON")
    }

    /// Delete a product, ignoring the outcome.
    pub async fn delete_product(&self, id: &Value) {
        let _ = self
            .client
            .delete(self.url(&format!("/products/{id}")))
            .send()
            .await;
    }
}
