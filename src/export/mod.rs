//! Ranking, naming and writing exported comment lists.

pub mod filename;
pub mod format;
pub mod rank;

pub use filename::sanitize_file_name;
pub use format::{format_comments, format_likes};
pub use rank::rank_comments;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::Failure;
use crate::domain::Comment;

/// Configuration for exported files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory exports are written to (default: current directory)
    pub dir: Option<PathBuf>,
}

impl ExportConfig {
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Writes comment lists as text files into one directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.dir())
    }

    /// Write `comments` to `<sanitized title>.txt`, never overwriting an
    /// existing file. Returns the path written.
    pub fn export(&self, title: &str, comments: &[Comment]) -> Result<PathBuf, Failure> {
        fs::create_dir_all(&self.dir).map_err(|e| Failure::ExportFailed(e.to_string()))?;

        let name = sanitize_file_name(title);
        let path = unique_path(&self.dir, &name);
        debug!("Exporting {} comments as {}", comments.len(), path.display());

        fs::write(&path, format_comments(comments))
            .map_err(|e| Failure::ExportFailed(e.to_string()))?;
        Ok(path)
    }
}

/// `<dir>/<name>.txt`, or `<dir>/<name> (n).txt` if that is taken.
fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let first = dir.join(format!("{name}.{}", filename::EXTENSION));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("{name} ({n}).{}", filename::EXTENSION)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_export_writes_ranked_text() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());
        let comments = rank_comments(vec![Comment::new("meh", 2), Comment::new("wow", 40)]);

        let path = assert_ok!(exporter.export("Song / Live", &comments));
        assert_eq!(path, dir.path().join("Song Live_comments.txt"));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "Comment: wow\nLikes: 40\n\nComment: meh\nLikes: 2\n"
        );
    }

    #[test]
    fn test_export_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path());

        let first = exporter.export("Same", &[Comment::new("a", 1)]).unwrap();
        let second = exporter.export("Same", &[Comment::new("b", 1)]).unwrap();

        assert_ne!(first, second);
        assert_eq!(second, dir.path().join("Same_comments (1).txt"));
    }

    #[test]
    fn test_export_creates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path().join("nested").join("out"));
        assert_ok!(exporter.export("t", &[]));
    }

    #[test]
    fn test_export_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a dir").unwrap();

        let exporter = Exporter::new(&blocker);
        let err = assert_err!(exporter.export("t", &[]));
        assert!(matches!(err, Failure::ExportFailed(_)));
    }

    #[test]
    fn test_export_config_defaults_to_cwd() {
        assert_eq!(ExportConfig::default().dir(), PathBuf::from("."));
    }
}
