//! Database operations for the discount configuration store.
//!
//! # Tables
//!
//! - `discount_configuration` - one row per shop, carries the timestamps
//! - `discount_group` - named tiers, unique per shop by normalized name
//! - `group_product` - per-group product lists, unique by product id
//! - `excluded_product` - shop-level excluded set, unique by product id
//!
//! The unique indexes double as a defense-in-depth backstop: a duplicate
//! that slips past service validation fails the write as a
//! [`RepositoryError::Conflict`] instead of corrupting the document.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p seagrape-cli -- migrate server
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub mod discounts;

pub use discounts::DiscountRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Constraint violation (e.g., duplicate group name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
