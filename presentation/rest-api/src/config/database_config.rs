use anyhow::Context;
use persistence::db::{DatabaseConfig, create_postgres_pool, run_migrations};
use sqlx::PgPool;
use std::env;

use super::env_or;

/// Initialize the record store connection pool from environment variables
///
/// Environment variables:
/// - DATABASE_URL: PostgreSQL connection string (required)
/// - DATABASE_MAX_CONNECTIONS: Pool size (default: 10)
/// - DATABASE_MIGRATIONS_PATH: Applies migrations from this directory when set
///
/// # Errors
/// Returns error if DATABASE_URL is not set, is malformed, or migrations fail
pub async fn init_database() -> anyhow::Result<PgPool> {
    let db_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let config = DatabaseConfig::new(db_url)
        .with_max_connections(env_or("DATABASE_MAX_CONNECTIONS", 10));
    let pool = create_postgres_pool(&config)?;

    if let Ok(path) = env::var("DATABASE_MIGRATIONS_PATH") {
        run_migrations(&pool, &path)
            .await
            .with_context(|| format!("failed to run migrations from {}", path))?;
        tracing::info!("Applied record store migrations from {}", path);
    }

    Ok(pool)
}
