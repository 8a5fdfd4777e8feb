use chrono::Utc;
use rusqlite::{params, Connection};

use crate::models::db_operations::posts_db_operations::{timestamp_string, DbError};

/// Idempotently brings the posts database up to the current schema and seeds
/// demonstration content on a first run. Safe to call on every boot.
pub fn initialize(conn: &mut Connection) -> Result<(), DbError> {
    let tx = conn.transaction()?;

    log::info!("Ensuring 'posts' table exists...");
    create_posts_table(&tx)?;

    log::info!("Applying schema migrations...");
    apply_migrations(&tx)?;

    if count_posts(&tx)? == 0 {
        log::info!("Posts table is empty, seeding demo posts...");
        seed_demo_posts(&tx)?;
    }

    tx.commit()?;
    Ok(())
}

fn create_posts_table(conn: &Connection) -> Result<(), DbError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS posts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            category TEXT NOT NULL,
            color TEXT NOT NULL,
            size TEXT NOT NULL,
            excerpt TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL,
            markdown_content TEXT NOT NULL DEFAULT '',
            media_files TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            read_time TEXT NOT NULL DEFAULT '1 min read'
        )",
        [],
    )?;
    Ok(())
}

// Each step must stay independently re-runnable: the add-column steps are
// no-ops on a current schema, the backfill only touches rows the add-column
// step just defaulted.
const MIGRATIONS: &[&str] = &[
    "ALTER TABLE posts ADD COLUMN markdown_content TEXT NOT NULL DEFAULT ''",
    "ALTER TABLE posts ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
    "UPDATE posts SET updated_at = created_at WHERE updated_at = ''",
];

fn apply_migrations(conn: &Connection) -> Result<(), DbError> {
    for step in MIGRATIONS {
        match conn.execute(step, []) {
            Ok(_) => {}
            Err(ref err) if is_duplicate_column(err) => {
                log::debug!("Migration step already applied, skipping: {}", step);
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("duplicate column name")
    )
}

fn count_posts(conn: &Connection) -> Result<i64, DbError> {
    let count = conn.query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))?;
    Ok(count)
}

fn seed_demo_posts(conn: &Connection) -> Result<(), DbError> {
    // (title, category, color, size, excerpt, content, markdown_content, media_files, read_time)
    let sample_posts: &[(&str, &str, &str, &str, &str, &str, &str, &str, &str)] = &[
        (
            "The Future of Web Development: HTMX and Hypermedia",
            "TECHNOLOGY",
            "neon-pink",
            "bento-large",
            "Exploring how HTMX is changing the way we think about building interactive web applications...",
            r#"<p>In recent years, the web development landscape has been dominated by JavaScript frameworks like React, Vue, and Angular. But a quiet revolution is happening, led by tools like HTMX that embrace the original hypermedia model of the web.</p>
<p>HTMX allows you to access modern browser features directly from HTML, rather than using JavaScript. This means you can create dynamic, interactive web applications with significantly less code and complexity.</p>
<h2>Why HTMX?</h2>
<p>The main advantage of HTMX is simplicity. Instead of managing complex client-side state, you let the server handle the logic and return HTML fragments that HTMX swaps into your page.</p>
<p>This approach has several benefits:</p>
<ul>
<li>Smaller bundle sizes</li>
<li>Better SEO out of the box</li>
<li>Simpler mental model</li>
<li>Works with any backend language</li>
</ul>"#,
            r#"# The Future of Web Development: HTMX and Hypermedia

In recent years, the web development landscape has been dominated by JavaScript frameworks like React, Vue, and Angular. But a quiet revolution is happening, led by tools like HTMX that embrace the original hypermedia model of the web.

HTMX allows you to access modern browser features directly from HTML, rather than using JavaScript. This means you can create dynamic, interactive web applications with significantly less code and complexity.

## Why HTMX?

The main advantage of HTMX is simplicity. Instead of managing complex client-side state, you let the server handle the logic and return HTML fragments that HTMX swaps into your page.

This approach has several benefits:

- Smaller bundle sizes
- Better SEO out of the box
- Simpler mental model
- Works with any backend language"#,
            "",
            "5 min read",
        ),
        (
            "Neon Aesthetics in Modern UI",
            "DESIGN",
            "neon-cyan",
            "bento-medium",
            "Why glowing colors are making a comeback...",
            r#"<p>Neon colors have made a dramatic comeback in web design, bringing energy and personality to digital interfaces.</p>
<p>The cyberpunk aesthetic, popularized by movies and games, has influenced modern UI design trends.</p>
<h2>Key Principles</h2>
<ul>
<li>Use dark backgrounds to make colors pop</li>
<li>Add subtle glow effects with box-shadow</li>
<li>Limit your neon palette to maintain hierarchy</li>
</ul>"#,
            r#"# Neon Aesthetics in Modern UI

Neon colors have made a dramatic comeback in web design, bringing energy and personality to digital interfaces.

The cyberpunk aesthetic, popularized by movies and games, has influenced modern UI design trends.

## Key Principles

- Use dark backgrounds to make colors pop
- Add subtle glow effects with box-shadow
- Limit your neon palette to maintain hierarchy"#,
            "",
            "3 min read",
        ),
        (
            "Quick CSS Tricks",
            "TIPS",
            "neon-purple",
            "bento-small",
            "",
            r#"<p>Here are some useful CSS tricks:</p>
<h3>Center anything with Flexbox</h3>
<pre><code>display: flex;
align-items: center;
justify-content: center;</code></pre>"#,
            r#"# Quick CSS Tricks

Here are some useful CSS tricks:

### Center anything with Flexbox

```css
display: flex;
align-items: center;
justify-content: center;
```"#,
            "",
            "2 min read",
        ),
    ];

    let now = timestamp_string(Utc::now());
    for (title, category, color, size, excerpt, content, markdown_content, media_files, read_time) in
        sample_posts
    {
        conn.execute(
            "INSERT INTO posts (title, category, color, size, excerpt, content, markdown_content, media_files, created_at, updated_at, read_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                title,
                category,
                color,
                size,
                excerpt,
                content,
                markdown_content,
                media_files,
                now,
                now,
                read_time
            ],
        )?;
    }
    Ok(())
}
