use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rusqlite_migration::{Migrations, M};

use crate::app::{ChorusError, Result};
use crate::domain::Comment;
use crate::store::{CachedResult, CommentCache};

pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.run_migrations()?;
        Ok(cache)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self {
            conn: Mutex::new(conn),
        };
        cache.run_migrations()?;
        Ok(cache)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations.to_latest(&mut conn)?;
        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| ChorusError::Other(format!("Cache lock poisoned: {}", e)))
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    }
}

impl CommentCache for SqliteCache {
    fn load(&self, content_id: &str) -> Result<Option<CachedResult>> {
        let conn = self.conn()?;

        let row = conn
            .query_row(
                "SELECT comments, min_likes, cached_at FROM cached_results WHERE content_id = ?1",
                params![content_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((comments, min_likes, cached_at)) = row else {
            return Ok(None);
        };

        Ok(Some(CachedResult {
            comments: serde_json::from_str(&comments)?,
            min_likes: u64::try_from(min_likes).unwrap_or_default(),
            cached_at: Self::parse_datetime(&cached_at).unwrap_or_else(Utc::now),
        }))
    }

    fn save(&self, content_id: &str, comments: &[Comment], min_likes: u64) -> Result<()> {
        let conn = self.conn()?;
        let json = serde_json::to_string(comments)?;

        conn.execute(
            "INSERT INTO cached_results (content_id, min_likes, comments, cached_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(content_id) DO UPDATE SET
                min_likes = excluded.min_likes,
                comments = excluded.comments,
                cached_at = excluded.cached_at",
            params![
                content_id,
                i64::try_from(min_likes).unwrap_or(i64::MAX),
                json,
                Utc::now().to_rfc3339()
            ],
        )?;

        Ok(())
    }

    fn remove(&self, content_id: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "DELETE FROM cached_results WHERE content_id = ?1",
            params![content_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_is_none() {
        let cache = SqliteCache::in_memory().unwrap();
        assert!(cache.load("nope").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let cache = SqliteCache::in_memory().unwrap();
        let comments = vec![Comment::new("top", 900), Comment::new("next", 12)];
        cache.save("dQw4w9WgXcQ", &comments, 10).unwrap();

        let cached = cache.load("dQw4w9WgXcQ").unwrap().unwrap();
        assert_eq!(cached.comments, comments);
        assert_eq!(cached.min_likes, 10);
    }

    #[test]
    fn test_save_replaces_previous_result() {
        let cache = SqliteCache::in_memory().unwrap();
        cache.save("vid", &[Comment::new("old", 5)], 5).unwrap();
        cache.save("vid", &[Comment::new("new", 50)], 50).unwrap();

        let cached = cache.load("vid").unwrap().unwrap();
        assert_eq!(cached.comments, vec![Comment::new("new", 50)]);
        assert_eq!(cached.min_likes, 50);
    }

    #[test]
    fn test_remove() {
        let cache = SqliteCache::in_memory().unwrap();
        cache.save("vid", &[Comment::new("x", 1)], 1).unwrap();
        cache.remove("vid").unwrap();
        assert!(cache.load("vid").unwrap().is_none());
    }

    #[test]
    fn test_file_backed_cache_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chorus.db");

        SqliteCache::new(&path)
            .unwrap()
            .save("vid", &[Comment::new("kept", 3)], 1)
            .unwrap();

        let reopened = SqliteCache::new(&path).unwrap();
        assert_eq!(
            reopened.load("vid").unwrap().unwrap().comments,
            vec![Comment::new("kept", 3)]
        );
    }
}
