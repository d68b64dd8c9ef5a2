//! Business logic services.
//!
//! Each service is written against a small storage trait so it can run against
//! the `PostgreSQL` repositories in production and in-memory fakes in tests.

pub mod auth;
pub mod cart;
pub mod catalog;
