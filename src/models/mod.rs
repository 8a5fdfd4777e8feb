use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single blog entry as stored in the posts table. `content` is the HTML
/// storage form; `markdown_content` holds the original markdown source and is
/// empty for HTML-authored posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub color: String,
    pub size: String,
    pub excerpt: String,
    pub content: String,
    pub markdown_content: String,
    pub media_files: String, // Stored as a comma-separated string
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub read_time: String,
}

impl Post {
    /// Splits the persisted comma-separated media string into a list,
    /// trimming entries and dropping empty ones.
    pub fn media_list(&self) -> Vec<String> {
        self.media_files
            .split(',')
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect()
    }

    pub fn formatted_date(&self) -> String {
        self.created_at.format("%b %d, %Y").to_string()
    }

    pub fn formatted_date_long(&self) -> String {
        self.created_at.format("%B %d, %Y").to_string()
    }

    /// True when the post carries markdown source and can be re-opened in the
    /// markdown editor.
    pub fn has_markdown(&self) -> bool {
        !self.markdown_content.trim().is_empty()
    }
}

/// Creation/update contract for a post. Excerpt, media and markdown source
/// are defaultable; everything else the boundary must supply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub category: String,
    pub color: String,
    pub size: String,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub media_files: Vec<String>,
    #[serde(default)]
    pub markdown_content: String,
}

/// How an attached media path should be presented. Paths with any other
/// extension are not accepted media and are silently skipped at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn from_path(path: &str) -> Option<MediaKind> {
        let extension = std::path::Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_lowercase();

        match extension.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" => Some(MediaKind::Image),
            "mp4" | "webm" | "ogg" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

pub mod db_operations;
