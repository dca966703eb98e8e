use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::agent::AgentLink;
use crate::app::Failure;
use crate::channel::{duplex, Port};
use crate::coordinator::host::{Delivery, TargetHost, TargetId};
use crate::coordinator::session::{Effect, Input, Session};
use crate::domain::{
    ClientMessage, CoordinatorEvent, ExportReply, ExportRequest, ExtractionReply,
};
use crate::export::Exporter;

/// Title used for exports when the page's own title cannot be read.
pub const FALLBACK_TITLE: &str = "youtube_comments";

/// Outcome of the one host operation a session may have in flight.
enum Completion {
    Target(Option<TargetId>),
    Delivered(Result<Delivery, Failure>),
    Reply(Result<ExtractionReply, Failure>),
}

/// Background side of the extension: serves client ports and export requests.
#[derive(Clone)]
pub struct Coordinator {
    host: Arc<dyn TargetHost>,
    exporter: Arc<Exporter>,
    timeout: Duration,
}

impl Coordinator {
    pub fn new(host: Arc<dyn TargetHost>, exporter: Exporter, timeout: Duration) -> Self {
        Self {
            host,
            exporter: Arc::new(exporter),
            timeout,
        }
    }

    /// Open a port to a fresh session task. Dropping the returned port
    /// cancels the session.
    pub fn connect(&self) -> Port<ClientMessage, CoordinatorEvent> {
        let (client, background) = duplex("popup");
        let coordinator = self.clone();

        tokio::spawn(async move {
            coordinator.serve(background).await;
        });

        client
    }

    /// Run one session over `port` until it reaches `Done`.
    pub async fn serve(&self, mut port: Port<CoordinatorEvent, ClientMessage>) {
        let mut session = Session::new();
        let mut deadline: Option<Instant> = None;
        let mut pending: Option<BoxFuture<'static, Completion>> = None;
        let mut link: Option<AgentLink> = None;

        while !session.is_done() {
            let input = tokio::select! {
                msg = port.recv() => match msg {
                    Some(ClientMessage::GetComments { min_likes }) => Input::Start { min_likes },
                    None => Input::ChannelClosed,
                },
                _ = sleep_until(deadline) => {
                    deadline = None;
                    Input::TimeoutFired
                }
                completion = poll_pending(&mut pending) => {
                    pending = None;
                    match completion {
                        Completion::Target(target) => Input::TargetResolved(target),
                        Completion::Delivered(Ok(delivery)) => {
                            debug!(installed = delivery.installed, "Agent delivered");
                            link = Some(delivery.link);
                            Input::Delivered(Ok(()))
                        }
                        Completion::Delivered(Err(failure)) => Input::Delivered(Err(failure)),
                        Completion::Reply(reply) => Input::Reply(reply),
                    }
                }
            };

            let mut inputs = VecDeque::from([input]);
            while let Some(input) = inputs.pop_front() {
                for effect in session.handle(input) {
                    match effect {
                        Effect::ArmTimeout => {
                            deadline = Some(Instant::now() + self.timeout);
                        }
                        Effect::DisarmTimeout => {
                            deadline = None;
                        }
                        Effect::Emit(event) => {
                            if event.is_terminal() {
                                info!("Session finished: {}", summarize(&event));
                            }
                            if port.send(event).is_err() {
                                debug!("Client disconnected; dropping event");
                            }
                        }
                        Effect::ResolveTarget => {
                            let host = self.host.clone();
                            pending = Some(
                                async move { Completion::Target(host.active_target().await) }
                                    .boxed(),
                            );
                        }
                        Effect::Deliver(target) => {
                            let host = self.host.clone();
                            pending = Some(
                                async move { Completion::Delivered(host.deliver(&target).await) }
                                    .boxed(),
                            );
                        }
                        Effect::SendCommand(command) => match link.clone() {
                            Some(agent) => {
                                pending = Some(
                                    async move { Completion::Reply(agent.request(command).await) }
                                        .boxed(),
                                );
                                inputs.push_back(Input::CommandDispatched);
                            }
                            None => inputs.push_back(Input::Reply(Err(Failure::DeliveryFailed))),
                        },
                        Effect::CloseChannel => port.disconnect(),
                    }
                }
            }
        }

        if pending.is_some() {
            // The agent keeps working; only our wait ends here.
            warn!("Session ended with a page operation still running");
        }
        debug_assert!(deadline.is_none());
    }

    /// Export `comments` to a text file named after the active page.
    pub async fn export(&self, request: ExportRequest) -> ExportReply {
        let ExportRequest::ExportComments { comments } = request;

        let Some(target) = self.host.active_target().await else {
            return ExportReply::failed("Could not find active tab");
        };

        let title = self
            .host
            .page_title(&target)
            .await
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_TITLE.to_string());

        match self.exporter.export(&title, &comments) {
            Ok(path) => {
                info!("Exported {} comments to {}", comments.len(), path.display());
                ExportReply::ok()
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                ExportReply::failed(e)
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn poll_pending(pending: &mut Option<BoxFuture<'static, Completion>>) -> Completion {
    match pending {
        Some(fut) => fut.await,
        None => std::future::pending().await,
    }
}

fn summarize(event: &CoordinatorEvent) -> String {
    match event {
        CoordinatorEvent::Success { comments } => format!("{} comments", comments.len()),
        CoordinatorEvent::Failure { error } => format!("failed: {}", error),
        CoordinatorEvent::Progress { progress } => progress.clone(),
    }
}
