//! Per-request coordinator state machine.
//!
//! `Session` owns no I/O. It consumes [`Input`]s and answers with the
//! [`Effect`]s the driver must carry out, which keeps the lifecycle rules
//! checkable without a browser or a clock:
//!
//! ```text
//! Idle ─start─► Connecting ─delivered─► Loading ─dispatched─► Extracting ─reply─► Done
//!                   │                                               │
//!                   └──────── no target / delivery error / timeout / close ──────► Done
//! ```
//!
//! Once `Done`, every input is ignored, so at most one terminal event is ever
//! emitted and nothing follows it.

use tracing::debug;

use crate::app::Failure;
use crate::coordinator::host::TargetId;
use crate::domain::{CoordinatorEvent, ExtractionCommand, ExtractionReply, ExtractionRequest};
use crate::export::rank_comments;

pub const CONNECTING_MESSAGE: &str = "Connecting to page...";
pub const LOADING_MESSAGE: &str = "Loading and extracting comments...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Resolving the active target and delivering the agent
    Connecting,
    /// Agent delivered, command on its way
    Loading,
    /// Command in the target context, awaiting the single reply
    Extracting,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Start { min_likes: Option<u64> },
    TargetResolved(Option<TargetId>),
    Delivered(Result<(), Failure>),
    CommandDispatched,
    Reply(Result<ExtractionReply, Failure>),
    TimeoutFired,
    ChannelClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ArmTimeout,
    DisarmTimeout,
    Emit(CoordinatorEvent),
    ResolveTarget,
    Deliver(TargetId),
    SendCommand(ExtractionCommand),
    CloseChannel,
}

#[derive(Debug, Clone)]
pub struct Session {
    phase: Phase,
    timeout_armed: bool,
    request: ExtractionRequest,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            timeout_armed: false,
            request: ExtractionRequest::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn timeout_armed(&self) -> bool {
        self.timeout_armed
    }

    pub fn request(&self) -> ExtractionRequest {
        self.request
    }

    /// Apply one input and return the effects to perform, in order.
    pub fn handle(&mut self, input: Input) -> Vec<Effect> {
        if self.phase == Phase::Done {
            debug!("Session done; ignoring {:?}", input);
            return Vec::new();
        }

        match (self.phase, input) {
            (_, Input::ChannelClosed) => {
                let mut effects = Vec::new();
                self.disarm(&mut effects);
                self.phase = Phase::Done;
                effects
            }
            (phase, Input::TimeoutFired) if phase != Phase::Idle && self.timeout_armed => {
                self.timeout_armed = false;
                self.phase = Phase::Done;
                vec![
                    Effect::Emit(CoordinatorEvent::failure(Failure::TimedOut)),
                    Effect::CloseChannel,
                ]
            }
            (Phase::Idle, Input::Start { min_likes }) => {
                self.request = ExtractionRequest::from_option(min_likes);
                self.phase = Phase::Connecting;
                self.timeout_armed = true;
                vec![Effect::ArmTimeout, Effect::ResolveTarget]
            }
            (Phase::Connecting, Input::TargetResolved(Some(target))) => vec![
                Effect::Emit(CoordinatorEvent::progress(CONNECTING_MESSAGE)),
                Effect::Deliver(target),
            ],
            (Phase::Connecting, Input::TargetResolved(None)) => self.fail(Failure::NoActiveTarget),
            (Phase::Connecting, Input::Delivered(Ok(()))) => {
                self.phase = Phase::Loading;
                vec![
                    Effect::Emit(CoordinatorEvent::progress(LOADING_MESSAGE)),
                    Effect::SendCommand(ExtractionCommand::GetComments {
                        min_likes: self.request.min_likes,
                    }),
                ]
            }
            (Phase::Connecting, Input::Delivered(Err(failure))) => self.fail(failure),
            (Phase::Loading, Input::CommandDispatched) => {
                self.phase = Phase::Extracting;
                Vec::new()
            }
            (Phase::Loading | Phase::Extracting, Input::Reply(reply)) => match reply {
                Ok(ExtractionReply::Comments { comments }) => {
                    let mut effects = Vec::new();
                    self.disarm(&mut effects);
                    self.phase = Phase::Done;
                    effects.push(Effect::Emit(CoordinatorEvent::Success {
                        comments: rank_comments(comments),
                    }));
                    effects
                }
                Ok(ExtractionReply::Error { error }) => self.fail(Failure::Unknown(error)),
                Err(failure) => self.fail(failure),
            },
            (phase, input) => {
                debug!("Ignoring {:?} in {:?}", input, phase);
                Vec::new()
            }
        }
    }

    fn disarm(&mut self, effects: &mut Vec<Effect>) {
        if self.timeout_armed {
            self.timeout_armed = false;
            effects.push(Effect::DisarmTimeout);
        }
    }

    fn fail(&mut self, failure: Failure) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.disarm(&mut effects);
        self.phase = Phase::Done;
        effects.push(Effect::Emit(CoordinatorEvent::failure(failure)));
        effects
    }
}
