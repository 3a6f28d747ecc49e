use std::sync::Arc;

use anyhow::Context;

use reb_core::{config::Config, ports::ListingStore};
use reb_db::PgListingStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    reb_core::logging::init("reb")?;

    let cfg = Arc::new(Config::load()?);

    let pool = reb_db::create_pool(&cfg)
        .await
        .context("failed to connect to the database")?;
    tracing::info!(
        max_connections = cfg.db_max_connections,
        "database pool ready"
    );

    if cfg.db_run_migrations {
        reb_db::run_migrations(&pool)
            .await
            .context("failed to apply migrations")?;
    } else if !reb_db::schema_ready(&pool).await.unwrap_or(false) {
        tracing::warn!("listings table missing: run the migrations or set DB_RUN_MIGRATIONS=true");
    }

    let store: Arc<dyn ListingStore> = Arc::new(PgListingStore::new(pool.clone()));

    let result = reb_telegram::router::run_polling(cfg, store).await;

    pool.close().await;
    tracing::info!("database pool closed");

    result.context("telegram bot failed")
}
