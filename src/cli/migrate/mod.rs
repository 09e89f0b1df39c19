//! Migrate command - applies the PostgreSQL schema

use tracing::info;

use crate::infrastructure::storage::{connect_postgres, run_migrations};

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let database_url = crate::resolve_database_url(&config)?;
    let pool = connect_postgres(&database_url, config.storage.max_connections).await?;

    run_migrations(&pool).await?;
    pool.close().await;

    info!("Migrations complete");
    Ok(())
}
