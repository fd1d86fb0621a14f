//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! sg-cli migrate server
//! ```
//!
//! # Environment Variables
//!
//! - `SEAGRAPE_DATABASE_URL` - `PostgreSQL` connection string

use sqlx::PgPool;
use thiserror::Error;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run server database migrations.
///
/// Migrations are embedded from `crates/server/migrations/` at compile time.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn server() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("SEAGRAPE_DATABASE_URL")
        .map_err(|_| MigrationError::MissingEnvVar("SEAGRAPE_DATABASE_URL"))?;

    tracing::info!("Connecting to server database...");
    let pool = PgPool::connect(&database_url).await?;

    tracing::info!("Running server migrations...");
    sqlx::migrate!("../server/migrations").run(&pool).await?;

    tracing::info!("Server migrations complete!");
    Ok(())
}
