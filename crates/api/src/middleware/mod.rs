//! HTTP middleware stack for the shop API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors and transactions)
//! 2. `CatchPanicLayer` (turn handler panics into a JSON 500)
//! 3. `TraceLayer` (request span with method, uri, status, latency)
//! 4. Request ID (add unique ID to each request)
//! 5. API-key gate (reject before any handler runs)

pub mod api_key;
pub mod request_id;

pub use api_key::{API_KEY_HEADER, require_api_key};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
