//! NetValue Shop Core - Shared types library.
//!
//! This crate provides the domain newtypes used by every NetValue shop component:
//! - `api` - The REST backend (auth, users, products, carts)
//! - `cli` - Command-line tools for migrations, user creation and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database encoding is available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, emails, prices, cart statuses and user roles

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
