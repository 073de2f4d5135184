//! Helpers for integration tests.

use std::time::Duration;

use sales_tracker::db::{DbPool, PoolSettings, establish_connection_pool, run_migrations};

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: DbPool,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let settings = PoolSettings {
            max_connections: 4,
            min_idle: 1,
            max_lifetime: Duration::from_secs(60),
        };
        let pool = establish_connection_pool(filename, settings)
            .expect("Failed to establish SQLite connection.");
        run_migrations(&pool, false).expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}
