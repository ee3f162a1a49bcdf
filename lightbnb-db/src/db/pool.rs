//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection and acquire-timeout limits.
//! Queuing of excess callers is left to the pool.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::config::DbConfig;
use crate::error::Result;

/// Create a PostgreSQL connection pool from configuration.
///
/// # Errors
///
/// Returns `DbError::Config` for a malformed connection string and
/// `DbError::Sqlx` if the first connection cannot be established.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::from_env()?).await?;
/// ```
pub async fn create_pool(config: &DbConfig) -> Result<PgPool> {
    let options = config.connect_options()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_with(options)
        .await?;

    info!(
        max_connections = config.max_connections,
        "database pool connected"
    );
    Ok(pool)
}

/// Create a pool that connects on first use instead of up front.
pub fn create_lazy_pool(config: &DbConfig) -> Result<PgPool> {
    let options = config.connect_options()?;

    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout())
        .connect_lazy_with(options))
}
