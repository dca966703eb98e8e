//! The content agent: code that runs inside the target page's context.
//!
//! The coordinator never touches the page directly. It hands an
//! [`ExtractionCommand`] to an [`AgentLink`] and waits for the single
//! [`ExtractionReply`]. Everything that can go wrong on the page side is
//! turned into an `{ error }` reply here, at the boundary.
//!
//! ```text
//! AgentLink ──command──► ContentAgent ── load() ── extract() ──reply──► AgentLink
//! ```
//!
//! A coordinator that stops waiting does not stop the agent: an in-flight
//! scroll/extract pass runs to completion and its reply is dropped.

pub mod config;
pub mod extract;
pub mod loader;

pub use config::{LoaderConfig, Selectors};
pub use extract::{extract, filter_items, normalize_text, parse_likes};
pub use loader::{load, LoadReport, LoadState, LoadStep};

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

use crate::app::Failure;
use crate::domain::{ExtractionCommand, ExtractionReply};

/// A comment element as rendered; either part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub text: Option<String>,
    pub likes_label: Option<String>,
}

/// A page-side operation failed (script error, detached page, ...).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PageError(pub String);

/// Errors raised inside the agent before they are flattened into a reply.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Comments section not found")]
    ContainerNotFound,

    #[error("No comments found on the page")]
    NoContentFound,

    #[error("Page script failed: {0}")]
    Page(#[from] PageError),
}

impl From<ExtractError> for Failure {
    fn from(err: ExtractError) -> Self {
        match err {
            ExtractError::ContainerNotFound => Failure::ContainerNotFound,
            ExtractError::NoContentFound => Failure::NoContentFound,
            ExtractError::Page(e) => Failure::Unknown(format!(
                "Page script failed ({}). Please refresh the page and try again.",
                e
            )),
        }
    }
}

/// Direct access to the page's DOM and scroll position.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Scroll the comment container into view. `false` if it does not exist.
    async fn reveal_container(&self) -> Result<bool, PageError>;

    /// Number of comment items currently rendered.
    async fn count_items(&self) -> Result<usize, PageError>;

    /// Move the viewport down by `px` pixels.
    async fn scroll_by(&self, px: u32) -> Result<(), PageError>;

    /// Read every rendered comment item in page order.
    async fn read_items(&self) -> Result<Vec<RawItem>, PageError>;
}

pub(crate) struct Envelope {
    command: ExtractionCommand,
    reply: oneshot::Sender<ExtractionReply>,
}

/// Handle to a running agent. Cheap to clone.
#[derive(Clone, Debug)]
pub struct AgentLink {
    tx: mpsc::Sender<Envelope>,
}

impl AgentLink {
    /// Send one command and wait for its reply.
    ///
    /// Fails with [`Failure::DeliveryFailed`] when the agent is gone or
    /// drops the command without answering.
    pub async fn request(&self, command: ExtractionCommand) -> Result<ExtractionReply, Failure> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Envelope {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| Failure::DeliveryFailed)?;

        reply_rx.await.map_err(|_| Failure::DeliveryFailed)
    }

    pub fn is_alive(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Link backed by a bare channel, for hosts that service commands themselves.
    #[cfg(test)]
    pub(crate) fn detached() -> (Self, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(8);
        (Self { tx }, rx)
    }
}

/// Agent loop bound to one page. Commands are handled one at a time.
pub struct ContentAgent {
    driver: Arc<dyn PageDriver>,
    config: LoaderConfig,
    rx: mpsc::Receiver<Envelope>,
}

impl ContentAgent {
    pub fn new(driver: Arc<dyn PageDriver>, config: LoaderConfig) -> (Self, AgentLink) {
        let (tx, rx) = mpsc::channel(8);
        let agent = Self { driver, config, rx };
        (agent, AgentLink { tx })
    }

    pub async fn run(mut self) {
        info!("Content agent started");

        while let Some(envelope) = self.rx.recv().await {
            let reply = self.handle(envelope.command).await;
            if envelope.reply.send(reply).is_err() {
                warn!("Coordinator stopped waiting; discarding late reply");
            }
        }

        info!("Content agent stopped");
    }

    async fn handle(&self, command: ExtractionCommand) -> ExtractionReply {
        match command {
            ExtractionCommand::GetComments { min_likes } => {
                match extract(self.driver.as_ref(), min_likes, &self.config).await {
                    Ok(comments) => ExtractionReply::Comments { comments },
                    Err(e) => {
                        warn!("Error extracting comments: {}", e);
                        ExtractionReply::Error {
                            error: Failure::from(e).to_string(),
                        }
                    }
                }
            }
        }
    }
}

/// Spawn an agent for `driver` as a tokio task.
pub fn spawn_agent(driver: Arc<dyn PageDriver>, config: LoaderConfig) -> AgentLink {
    let (agent, link) = ContentAgent::new(driver, config);

    tokio::spawn(async move {
        agent.run().await;
    });

    link
}
