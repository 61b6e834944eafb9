/// Schema migrations
///
/// The SQL files in the workspace `migrations/` directory are embedded at
/// compile time. The API server applies pending ones at startup; running
/// them again is a no-op.
///
/// | Migration | Creates |
/// |---|---|
/// | `create_boards` | `boards` |
/// | `create_columns` | `columns`, cascading from `boards` |
/// | `create_tasks` | `tasks`, cascading from `columns` |
/// | `create_subtasks` | `subtasks`, cascading from `tasks` |

use sqlx::{
    migrate::{MigrateDatabase, MigrateError, Migrator},
    postgres::PgPool,
    Postgres,
};
use tracing::{debug, info};

/// Embedded migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("../migrations");

/// Applied versus embedded migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Versions recorded as successfully applied
    pub applied: Vec<i64>,

    /// Embedded versions not yet applied
    pub pending: Vec<i64>,
}

impl MigrationStatus {
    pub fn is_current(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Applies every pending migration
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    let status = migration_status(pool).await.map_err(MigrateError::Execute)?;
    if status.is_current() {
        debug!(applied = status.applied.len(), "Schema is up to date");
        return Ok(());
    }

    info!(pending = ?status.pending, "Applying migrations");
    MIGRATOR.run(pool).await?;
    info!("Migrations applied");
    Ok(())
}

/// Compares the migrations table with the embedded migrations
pub async fn migration_status(pool: &PgPool) -> Result<MigrationStatus, sqlx::Error> {
    let has_table: bool =
        sqlx::query_scalar("SELECT to_regclass('public._sqlx_migrations') IS NOT NULL")
            .fetch_one(pool)
            .await?;

    let applied: Vec<i64> = if has_table {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(pool)
            .await?
    } else {
        Vec::new()
    };

    let pending = MIGRATOR
        .iter()
        .map(|migration| migration.version)
        .filter(|version| !applied.contains(version))
        .collect();

    Ok(MigrationStatus { applied, pending })
}

/// Creates the database named in `database_url` when missing (development
/// and tests)
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        return Ok(());
    }

    info!("Creating database");
    Postgres::create_database(database_url).await
}
