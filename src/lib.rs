use std::path::Path;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Builds the shared connection pool over the posts database file.
/// SQLite itself serializes writers; readers are unrestricted.
pub fn build_pool(db_path: &Path) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(db_path);
    Pool::builder().build(manager)
}

pub mod config;
pub mod helper;
pub mod models;
pub mod setup;
