//! The user-facing side of an extraction: what the popup used to do.
//!
//! A [`ClientSession`] opens one coordinator port per action, turns the
//! event stream into status lines, and remembers the last result per video.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};
use url::Url;

use crate::app::{ChorusError, Result};
use crate::coordinator::Coordinator;
use crate::domain::{ClientMessage, Comment, CoordinatorEvent, ExportRequest};
use crate::store::{CachedResult, CommentCache};

pub const DISCONNECTED_MESSAGE: &str = "Connection to background script failed";

/// Visual flavor of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Success,
    /// Neutral outcome, such as nothing meeting the threshold
    Info,
    Error,
}

/// Where status lines go (terminal, test recorder, ...).
pub trait StatusSink: Send {
    fn status(&mut self, kind: StatusKind, message: &str);
}

/// How one extraction ended, from the user's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Comments { comments: Vec<Comment>, min_likes: u64 },
    /// Nothing met the threshold. Not an error.
    NoResults { min_likes: u64 },
    Failed(String),
}

/// Video ID from a watch URL's `v` query parameter.
pub fn content_id(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|v| !v.is_empty())
}

/// Look up the last result cached for `page_url` without a browser.
pub fn restore(
    cache: &dyn CommentCache,
    page_url: &str,
    sink: &mut dyn StatusSink,
) -> Result<Option<CachedResult>> {
    let Some(id) = content_id(page_url) else {
        debug!("No content identifier in {}", page_url);
        return Ok(None);
    };

    let cached = cache.load(&id)?.filter(|c| !c.comments.is_empty());
    if let Some(ref hit) = cached {
        info!("Cache hit for {} ({} comments)", id, hit.comments.len());
        sink.status(
            StatusKind::Success,
            &format!("Showing {} cached comments", hit.comments.len()),
        );
    }
    Ok(cached)
}

pub struct ClientSession {
    coordinator: Coordinator,
    cache: Arc<dyn CommentCache + Send + Sync>,
    busy: AtomicBool,
}

/// Clears the busy flag however the extraction ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ClientSession {
    pub fn new(coordinator: Coordinator, cache: Arc<dyn CommentCache + Send + Sync>) -> Self {
        Self {
            coordinator,
            cache,
            busy: AtomicBool::new(false),
        }
    }

    /// Whether an extraction is outstanding (the trigger is "disabled").
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run one extraction for the page at `page_url`.
    pub async fn extract(
        &self,
        page_url: &str,
        min_likes: u64,
        sink: &mut dyn StatusSink,
    ) -> Result<SessionOutcome> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ChorusError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        sink.status(StatusKind::Loading, "Initializing comment extraction...");

        let mut port = self.coordinator.connect();
        if port
            .send(ClientMessage::GetComments {
                min_likes: Some(min_likes),
            })
            .is_err()
        {
            sink.status(StatusKind::Error, DISCONNECTED_MESSAGE);
            return Ok(SessionOutcome::Failed(DISCONNECTED_MESSAGE.to_string()));
        }

        let outcome = loop {
            match port.recv().await {
                Some(CoordinatorEvent::Progress { progress }) => {
                    sink.status(StatusKind::Loading, &progress);
                }
                Some(CoordinatorEvent::Success { comments }) if comments.is_empty() => {
                    sink.status(
                        StatusKind::Info,
                        &format!("No comments found with {} or more likes", min_likes),
                    );
                    break SessionOutcome::NoResults { min_likes };
                }
                Some(CoordinatorEvent::Success { comments }) => {
                    sink.status(
                        StatusKind::Success,
                        &format!("Found {} comments with {}+ likes", comments.len(), min_likes),
                    );
                    self.remember(page_url, &comments, min_likes);
                    break SessionOutcome::Comments {
                        comments,
                        min_likes,
                    };
                }
                Some(CoordinatorEvent::Failure { error }) => {
                    sink.status(StatusKind::Error, &error);
                    break SessionOutcome::Failed(error);
                }
                None => {
                    sink.status(StatusKind::Error, DISCONNECTED_MESSAGE);
                    break SessionOutcome::Failed(DISCONNECTED_MESSAGE.to_string());
                }
            }
        };

        port.disconnect();
        Ok(outcome)
    }

    /// The last cached result for `page_url`, if any.
    pub fn cached(&self, page_url: &str, sink: &mut dyn StatusSink) -> Result<Option<CachedResult>> {
        restore(self.cache.as_ref(), page_url, sink)
    }

    /// Ask the coordinator to export `comments`. Returns whether it succeeded.
    pub async fn export(&self, comments: &[Comment], sink: &mut dyn StatusSink) -> bool {
        if comments.is_empty() {
            sink.status(StatusKind::Error, "Nothing to export");
            return false;
        }

        sink.status(StatusKind::Loading, "Preparing to export comments...");
        let reply = self
            .coordinator
            .export(ExportRequest::ExportComments {
                comments: comments.to_vec(),
            })
            .await;

        if reply.success {
            sink.status(StatusKind::Success, "Comments exported successfully!");
            true
        } else {
            let error = reply
                .error
                .unwrap_or_else(|| "Failed to export comments".to_string());
            sink.status(StatusKind::Error, &error);
            false
        }
    }

    fn remember(&self, page_url: &str, comments: &[Comment], min_likes: u64) {
        let Some(id) = content_id(page_url) else {
            return;
        };
        if let Err(e) = self.cache.save(&id, comments, min_likes) {
            warn!("Failed to cache comments for {}: {}", id, e);
        }
    }
}
