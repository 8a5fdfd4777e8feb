use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as RusqliteResult};
use thiserror::Error;

use crate::models::{Post, PostInput};

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

const POST_COLUMNS: &str =
    "id, title, category, color, size, excerpt, content, markdown_content, media_files, created_at, updated_at, read_time";

/// Derived display label: one minute per 200 words of stored content,
/// never less than one.
pub fn read_time_label(content: &str) -> String {
    let word_count = content.split_whitespace().count();
    format!("{} min read", (word_count / 200).max(1))
}

/// Timestamps are persisted as fixed-width RFC 3339 text so that
/// `ORDER BY created_at` stays a plain lexicographic sort.
pub(crate) fn timestamp_string(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(idx: usize, raw: String) -> RusqliteResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_post(row: &rusqlite::Row) -> RusqliteResult<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        color: row.get(3)?,
        size: row.get(4)?,
        excerpt: row.get(5)?,
        content: row.get(6)?,
        markdown_content: row.get(7)?,
        media_files: row.get(8)?,
        created_at: parse_timestamp(9, row.get(9)?)?,
        updated_at: parse_timestamp(10, row.get(10)?)?,
        read_time: row.get(11)?,
    })
}

/// All posts, newest first. No pagination, no filtering.
pub fn read_all_posts(conn: &Connection) -> Result<Vec<Post>, DbError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM posts ORDER BY created_at DESC, id DESC",
        POST_COLUMNS
    ))?;
    let rows = stmt.query_map([], row_to_post)?;

    let mut posts = Vec::new();
    for post in rows {
        posts.push(post?);
    }
    Ok(posts)
}

pub fn read_post_by_id(conn: &Connection, post_id: i64) -> Result<Option<Post>, DbError> {
    let post = conn
        .query_row(
            &format!("SELECT {} FROM posts WHERE id = ?1", POST_COLUMNS),
            [post_id],
            row_to_post,
        )
        .optional()?;
    Ok(post)
}

pub fn read_latest_post(conn: &Connection) -> Result<Option<Post>, DbError> {
    let post = conn
        .query_row(
            &format!(
                "SELECT {} FROM posts ORDER BY created_at DESC, id DESC LIMIT 1",
                POST_COLUMNS
            ),
            [],
            row_to_post,
        )
        .optional()?;
    Ok(post)
}

/// Inserts a new post and returns it re-fetched by its assigned id.
/// The category is normalized to upper-case and read_time is derived from
/// the content word count.
pub fn create_post(conn: &Connection, input: &PostInput) -> Result<Post, DbError> {
    let now = timestamp_string(Utc::now());
    conn.execute(
        "INSERT INTO posts (title, category, color, size, excerpt, content, markdown_content, media_files, created_at, updated_at, read_time)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            input.title,
            input.category.to_uppercase(),
            input.color,
            input.size,
            input.excerpt,
            input.content,
            input.markdown_content,
            input.media_files.join(","),
            now,
            now,
            read_time_label(&input.content),
        ],
    )?;

    let post_id = conn.last_insert_rowid();
    match read_post_by_id(conn, post_id)? {
        Some(post) => Ok(post),
        None => Err(rusqlite::Error::QueryReturnedNoRows.into()),
    }
}

/// Replaces every mutable field of an existing post and advances updated_at;
/// created_at is never touched. Returns `None` without mutating anything when
/// no row matches.
pub fn update_post(
    conn: &Connection,
    post_id: i64,
    input: &PostInput,
) -> Result<Option<Post>, DbError> {
    let changed = conn.execute(
        "UPDATE posts
         SET title = ?1,
             category = ?2,
             color = ?3,
             size = ?4,
             excerpt = ?5,
             content = ?6,
             markdown_content = ?7,
             media_files = ?8,
             read_time = ?9,
             updated_at = ?10
         WHERE id = ?11",
        params![
            input.title,
            input.category.to_uppercase(),
            input.color,
            input.size,
            input.excerpt,
            input.content,
            input.markdown_content,
            input.media_files.join(","),
            read_time_label(&input.content),
            timestamp_string(Utc::now()),
            post_id,
        ],
    )?;

    if changed == 0 {
        return Ok(None);
    }
    read_post_by_id(conn, post_id)
}

/// Removes the row entirely. Referenced media files stay on disk.
pub fn delete_post(conn: &Connection, post_id: i64) -> Result<bool, DbError> {
    let deleted = conn.execute("DELETE FROM posts WHERE id = ?1", [post_id])?;
    Ok(deleted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::db_setup;

    fn empty_store() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        db_setup::initialize(&mut conn).unwrap();
        conn.execute("DELETE FROM posts", []).unwrap();
        conn
    }

    fn draft(title: &str) -> PostInput {
        PostInput {
            title: title.to_string(),
            category: "technology".to_string(),
            color: "neon-pink".to_string(),
            size: "bento-large".to_string(),
            excerpt: "teaser".to_string(),
            content: "<p>Hello world</p>".to_string(),
            media_files: vec!["uploads/images/a.png".to_string()],
            markdown_content: String::new(),
        }
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn create_then_fetch_round_trips() {
        let conn = empty_store();
        let created = create_post(&conn, &draft("First")).unwrap();

        let fetched = read_post_by_id(&conn, created.id).unwrap().unwrap();
        assert_eq!(fetched.title, "First");
        assert_eq!(fetched.category, "TECHNOLOGY");
        assert_eq!(fetched.excerpt, "teaser");
        assert_eq!(fetched.content, "<p>Hello world</p>");
        assert_eq!(fetched.media_files, "uploads/images/a.png");
        assert_eq!(fetched.created_at, created.created_at);
        assert_eq!(fetched.updated_at, created.updated_at);
        assert_eq!(fetched.created_at, fetched.updated_at);
        assert_eq!(fetched.read_time, "1 min read");
    }

    #[test]
    fn category_is_normalized_to_upper_case() {
        let conn = empty_store();
        let mut input = draft("Tips post");
        input.category = "tips".to_string();
        let created = create_post(&conn, &input).unwrap();
        assert_eq!(created.category, "TIPS");
    }

    #[test]
    fn read_all_posts_is_newest_first() {
        let conn = empty_store();
        create_post(&conn, &draft("a")).unwrap();
        create_post(&conn, &draft("b")).unwrap();
        create_post(&conn, &draft("c")).unwrap();

        let titles: Vec<String> = read_all_posts(&conn)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["c", "b", "a"]);
    }

    #[test]
    fn read_latest_post_tracks_insertions() {
        let conn = empty_store();
        assert!(read_latest_post(&conn).unwrap().is_none());

        create_post(&conn, &draft("older")).unwrap();
        create_post(&conn, &draft("newer")).unwrap();
        assert_eq!(read_latest_post(&conn).unwrap().unwrap().title, "newer");
    }

    #[test]
    fn update_replaces_fields_and_advances_updated_at() {
        let conn = empty_store();
        let created = create_post(&conn, &draft("Before")).unwrap();

        let mut input = draft("After");
        input.category = "design".to_string();
        input.content = words(401);
        input.media_files = vec![
            "uploads/images/a.png".to_string(),
            "uploads/videos/b.mp4".to_string(),
        ];
        input.markdown_content = "# After".to_string();

        let updated = update_post(&conn, created.id, &input).unwrap().unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "After");
        assert_eq!(updated.category, "DESIGN");
        assert_eq!(updated.read_time, "2 min read");
        assert_eq!(updated.media_files, "uploads/images/a.png,uploads/videos/b.mp4");
        assert_eq!(updated.markdown_content, "# After");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[test]
    fn update_missing_id_returns_none_and_mutates_nothing() {
        let conn = empty_store();
        let existing = create_post(&conn, &draft("only")).unwrap();

        let absent = update_post(&conn, existing.id + 1, &draft("ghost")).unwrap();
        assert!(absent.is_none());

        let unchanged = read_post_by_id(&conn, existing.id).unwrap().unwrap();
        assert_eq!(unchanged.title, "only");
        assert_eq!(unchanged.updated_at, existing.updated_at);
        assert_eq!(read_all_posts(&conn).unwrap().len(), 1);
    }

    #[test]
    fn delete_reports_removal_exactly_once() {
        let conn = empty_store();
        let created = create_post(&conn, &draft("doomed")).unwrap();

        assert!(delete_post(&conn, created.id).unwrap());
        assert!(!delete_post(&conn, created.id).unwrap());
        assert!(read_post_by_id(&conn, created.id).unwrap().is_none());
    }

    #[test]
    fn read_time_floors_at_one_minute() {
        assert_eq!(read_time_label(&words(199)), "1 min read");
        assert_eq!(read_time_label(&words(200)), "1 min read");
        assert_eq!(read_time_label(&words(401)), "2 min read");
        assert_eq!(read_time_label(""), "1 min read");
    }
}
