/// Database migration runner
///
/// Migrations live in the `migrations/` directory at the workspace root and
/// are embedded into the binary at compile time.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// Already-applied migrations are skipped; a failing migration aborts the run
/// and is returned as an error.
///
/// # Errors
///
/// Returns an error if a migration fails to execute, if an applied migration
/// was modified after being run, or if the connection is lost.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrator = sqlx::migrate!("../migrations");
    info!(available = migrator.iter().count(), "Loaded migrations");

    match migrator.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Migration failed");
            Err(e)
        }
    }
}
