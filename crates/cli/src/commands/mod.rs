//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use sqlx::postgres::PgSslMode;
use thiserror::Error;

/// Errors that can occur while connecting to the shop database.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// `POSTGRES_SSL_MODE` is not a libpq mode.
    #[error("Invalid POSTGRES_SSL_MODE: {0}")]
    InvalidSslMode(String),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect to the shop database using the same variables as the API server.
pub async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("POSTGRES_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| ConnectError::MissingEnvVar("POSTGRES_URL"))?;

    let ssl_mode = std::env::var("POSTGRES_SSL_MODE").unwrap_or_else(|_| "require".to_owned());
    let ssl_mode: PgSslMode = ssl_mode
        .parse()
        .map_err(|_| ConnectError::InvalidSslMode(ssl_mode))?;

    tracing::info!("Connecting to shop database...");
    Ok(netvalue_shop_api::db::create_pool(&database_url, ssl_mode).await?)
}
