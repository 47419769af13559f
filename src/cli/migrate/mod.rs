//! Migrate command - applies the embedded schema migrations

use anyhow::bail;
use tracing::info;

use crate::infrastructure::storage::{connect, Migrator, PostgresConfig, PostgresMigrator};

/// Apply all pending migrations, or revert the latest one
pub async fn run(revert: bool) -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    if !config.database.is_configured() {
        bail!("No database URL configured; set APP__DATABASE__URL or DATABASE_URL");
    }

    let pool = connect(
        &PostgresConfig::new(config.database.url.clone())
            .with_max_connections(config.database.max_connections),
    )
    .await?;

    let migrator = PostgresMigrator::new(pool);

    if revert {
        migrator.revert().await?;
        info!(version = ?migrator.version().await?, "Reverted latest migration");
    } else {
        migrator.run().await?;
        info!(version = ?migrator.version().await?, "Database schema is up to date");
    }

    Ok(())
}
