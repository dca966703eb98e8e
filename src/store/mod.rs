pub mod sqlite;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::Result;
use crate::domain::Comment;

pub use sqlite::SqliteCache;

/// The last result shown for one piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResult {
    pub comments: Vec<Comment>,
    pub min_likes: u64,
    pub cached_at: DateTime<Utc>,
}

/// Last-result cache keyed by content identifier (a video ID).
pub trait CommentCache {
    fn load(&self, content_id: &str) -> Result<Option<CachedResult>>;
    fn save(&self, content_id: &str, comments: &[Comment], min_likes: u64) -> Result<()>;
    fn remove(&self, content_id: &str) -> Result<()>;
}
