//! NetValue Shop API library.
//!
//! The HTTP server is a thin binary over this library so routers, services
//! and repositories can be exercised directly from tests and from `nv-cli`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
