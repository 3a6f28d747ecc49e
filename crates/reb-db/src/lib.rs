//! PostgreSQL storage for the listings bot: pool setup, embedded migrations and the
//! `ListingStore` implementation.

use std::time::Duration;

use reb_core::config::Config;
use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;
pub mod store;

pub use store::PgListingStore;

pub type DbPool = sqlx::PgPool;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a connection pool sized from the configuration.
pub async fn create_pool(cfg: &Config) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .min_connections(cfg.db_min_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&cfg.database_url)
        .await
}

/// Apply the embedded migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    tracing::info!(migrations = MIGRATOR.iter().count(), "database migrations applied");
    Ok(())
}

/// Whether the tables this crate expects exist (migrations applied by hand or at startup).
pub async fn schema_ready(pool: &DbPool) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public' AND table_name = 'listings'
        )",
    )
    .fetch_one(pool)
    .await
}
