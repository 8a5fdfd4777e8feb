use crate::models::db_operations::posts_db_operations::{self, DbError};
use crate::models::{Post, PostInput};
use crate::setup::db_setup;
use crate::DbPool;

// Thin pool-aware wrappers for the HTTP layer: one connection checkout per
// operation, absence stays an Option, storage failures propagate as DbError.

/// Brings the schema up to date and seeds demo content on first boot.
pub fn initialize_store(pool: &DbPool) -> Result<(), DbError> {
    let mut conn = pool.get()?;
    db_setup::initialize(&mut conn)
}

pub fn fetch_all_posts(pool: &DbPool) -> Result<Vec<Post>, DbError> {
    let conn = pool.get()?;
    posts_db_operations::read_all_posts(&conn)
}

pub fn fetch_post_by_id(pool: &DbPool, post_id: i64) -> Result<Option<Post>, DbError> {
    let conn = pool.get()?;
    posts_db_operations::read_post_by_id(&conn, post_id)
}

pub fn fetch_latest_post(pool: &DbPool) -> Result<Option<Post>, DbError> {
    let conn = pool.get()?;
    posts_db_operations::read_latest_post(&conn)
}

pub fn create_post(pool: &DbPool, input: &PostInput) -> Result<Post, DbError> {
    let conn = pool.get()?;
    posts_db_operations::create_post(&conn, input)
}

pub fn update_post(pool: &DbPool, post_id: i64, input: &PostInput) -> Result<Option<Post>, DbError> {
    let conn = pool.get()?;
    posts_db_operations::update_post(&conn, post_id, input)
}

pub fn delete_post(pool: &DbPool, post_id: i64) -> Result<bool, DbError> {
    let conn = pool.get()?;
    posts_db_operations::delete_post(&conn, post_id)
}
