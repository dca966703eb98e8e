use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChorusError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("An extraction is already in progress")]
    Busy,

    #[error(transparent)]
    Failure(#[from] Failure),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ChorusError>;

/// Failures surfaced to the user at the end of a session or export.
///
/// Display strings are shown verbatim, so each one tells the user what to do next.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    #[error("Comments section not found. Scroll to the comments and try again.")]
    ContainerNotFound,

    #[error("No comments found or page not fully loaded")]
    NoContentFound,

    #[error("No active YouTube tab found")]
    NoActiveTarget,

    #[error("Failed to extract comments. Please refresh the page and try again.")]
    DeliveryFailed,

    #[error("Operation timed out. Please refresh the page and try again.")]
    TimedOut,

    #[error("Failed to export comments: {0}")]
    ExportFailed(String),

    #[error("{0}")]
    Unknown(String),
}
