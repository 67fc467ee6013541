use parimutuel::adapter::outbound::sqlite::database::connection::{
    create_pool, enable_wal, run_migrations, DbPool, PoolOptions,
};
use parimutuel::adapter::outbound::sqlite::SqliteStore;
use tempfile::TempDir;

/// Temporary SQLite database file for integration tests.
///
/// The directory and everything in it (WAL and SHM files included) is
/// removed on drop.
pub struct TempDb {
    url: String,
    pool: DbPool,
    _dir: TempDir,
}

impl TempDb {
    pub fn create(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let url = dir
            .path()
            .join(format!("parimutuel-{name}.db"))
            .to_string_lossy()
            .into_owned();

        let pool = create_pool(&url, PoolOptions::default()).expect("create sqlite pool");
        // WAL mode improves concurrent writer behavior in tests.
        enable_wal(&pool).expect("enable WAL mode");
        run_migrations(&pool).expect("run migrations");

        Self {
            url,
            pool,
            _dir: dir,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub fn store(&self) -> SqliteStore {
        SqliteStore::new(self.pool.clone())
    }
}
