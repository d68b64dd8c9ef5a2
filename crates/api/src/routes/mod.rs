//! HTTP route handlers for the shop API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                - Liveness
//! GET    /health/ready          - Readiness (database ping)
//!
//! # Auth
//! POST   /auth/login            - Email + password, returns a token
//!
//! # Users
//! GET    /users/{email}         - User lookup
//!
//! # Products
//! GET    /products              - Paged listing (?search&page&limit)
//! GET    /products/total        - Count (?search)
//! POST   /products              - Create
//! GET    /products/{id}         - Detail
//! PUT    /products/{id}         - Full replace
//! DELETE /products/{id}         - Delete
//!
//! # Carts
//! GET    /carts                 - Every cart with its owner
//! POST   /carts                 - Add a product to a user's cart
//! GET    /carts/{user_email}    - A user's cart and lines
//! ```
//!
//! Every route, including unmatched paths, sits behind the API-key gate.

pub mod auth;
pub mod carts;
pub mod health;
pub mod products;
pub mod users;

use std::any::Any;
use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, require_api_key};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(auth::login))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/{email}", get(users::show))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/total", get(products::total))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(carts::index).post(carts::add))
        .route("/{user_email}", get(carts::show))
}

/// Create all routes for the shop API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/carts", cart_routes())
        .fallback(not_found)
}

/// JSON 404 for unmatched paths.
async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Not found" })),
    )
        .into_response()
}

/// Answer a handler panic with a JSON 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Internal Server Error" })),
    )
        .into_response()
}

/// Build the full application: routes, API-key gate, request IDs, tracing and
/// panic capture.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
