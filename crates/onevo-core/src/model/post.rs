// ── Published-post domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post that has gone out to a platform (read-only history).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishedPost {
    pub id: String,
    pub client_id: Option<String>,
    pub platform: Option<String>,
    pub content: Option<String>,
    pub media_urls: Vec<String>,
    pub status: Option<String>,
    pub external_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// One delivery attempt for a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishLog {
    pub id: String,
    pub post_id: Option<String>,
    pub platform: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub attempted_at: Option<DateTime<Utc>>,
}
