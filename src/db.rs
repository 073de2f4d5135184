use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Sizing of the r2d2 pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// Idle connections kept around between requests.
    pub min_idle: u32,
    /// Connections are recycled once they reach this age.
    pub max_lifetime: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 100,
            min_idle: 10,
            max_lifetime: Duration::from_secs(60 * 60),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DbSetupError {
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("failed to run migrations: {0}")]
    Migration(String),
}

#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL;",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Build an r2d2 pool for the SQLite database at `database_url`.
///
/// Every connection handed out by the pool has foreign keys enforced.
pub fn establish_connection_pool(
    database_url: &str,
    settings: PoolSettings,
) -> Result<DbPool, DbSetupError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(settings.max_connections.max(1))
        .min_idle(Some(settings.min_idle.min(settings.max_connections)))
        .max_lifetime(Some(settings.max_lifetime))
        .connection_customizer(Box::new(SqlitePragmas {
            busy_timeout_ms: 5_000,
        }))
        .build(manager)?;
    Ok(pool)
}

/// Apply all pending migrations. With `reset` every migration is reverted
/// first, which drops and recreates the tables.
pub fn run_migrations(pool: &DbPool, reset: bool) -> Result<(), DbSetupError> {
    let mut conn = pool.get()?;

    if reset {
        log::warn!("Dropping existing tables for a fresh migration");
        conn.revert_all_migrations(MIGRATIONS)
            .map_err(|e| DbSetupError::Migration(e.to_string()))?;
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbSetupError::Migration(e.to_string()))?;
    log::info!("Database migrated ({} migrations applied)", applied.len());

    Ok(())
}
