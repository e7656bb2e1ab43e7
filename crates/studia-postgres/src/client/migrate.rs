//! Database migration management.

use std::time::Instant;

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use crate::error::{PgError, PgResult};
use crate::{MIGRATIONS, PgClient, TRACING_TARGET_MIGRATION};

/// Runs all pending migrations on the database.
///
/// Embedded migrations are applied in a blocking task since the migration
/// harness drives the connection synchronously. Returns the list of applied
/// migration versions.
#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
pub async fn run_pending_migrations(pg: &PgClient) -> PgResult<Vec<String>> {
    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        "starting database migration process"
    );

    let start_time = Instant::now();
    let conn = pg.get_pooled_connection().await?;

    let mut conn: AsyncConnectionWrapper<_> = conn.into();
    let results = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.into_iter().map(|v| v.to_string()).collect())
    })
    .await;

    let duration = start_time.elapsed();
    let versions: Vec<String> = results
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                duration = ?duration,
                error = %err,
                "migration task panicked"
            );
            PgError::Migration(err.into())
        })?
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                duration = ?duration,
                error = &err,
                "database migration process failed"
            );
            PgError::Migration(err)
        })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        migrations_count = versions.len(),
        "database migration process completed"
    );

    Ok(versions)
}
