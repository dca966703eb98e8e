//! Messages exchanged between the client, the coordinator and the target page.
//!
//! Every type serializes to the JSON shape the contexts agree on, e.g.
//! `{"action":"getComments","minLikes":25}` or `{"progress":"..."}`.

use serde::{Deserialize, Serialize};

use crate::domain::Comment;

/// Client → coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ClientMessage {
    #[serde(rename = "getComments")]
    GetComments {
        #[serde(rename = "minLikes", default, skip_serializing_if = "Option::is_none")]
        min_likes: Option<u64>,
    },
}

/// Coordinator → client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinatorEvent {
    Progress { progress: String },
    Success { comments: Vec<Comment> },
    Failure { error: String },
}

impl CoordinatorEvent {
    pub fn progress(message: impl Into<String>) -> Self {
        Self::Progress {
            progress: message.into(),
        }
    }

    pub fn failure(reason: impl ToString) -> Self {
        Self::Failure {
            error: reason.to_string(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

/// Coordinator → target page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ExtractionCommand {
    #[serde(rename = "getComments")]
    GetComments {
        #[serde(rename = "minLikes")]
        min_likes: u64,
    },
}

/// Target page → coordinator. Exactly one per command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionReply {
    Comments { comments: Vec<Comment> },
    Error { error: String },
}

/// Client → export adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum ExportRequest {
    #[serde(rename = "exportComments")]
    ExportComments { comments: Vec<Comment> },
}

/// Export adapter → client. Failures travel as data, never as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportReply {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
        }
    }
}
