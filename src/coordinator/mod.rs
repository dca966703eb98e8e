//! The coordinator: owns one extraction request per connected client.
//!
//! # Architecture
//!
//! ```text
//! ClientSession ══port══► Coordinator::serve ──TargetHost──► ContentAgent (page)
//!       ▲                       │
//!       └──progress / result────┘
//! ```
//!
//! [`Session`] decides, [`Coordinator`] does. The driver owns the timer and
//! the single in-flight host operation and feeds their outcomes back into the
//! state machine.

mod driver;
pub mod host;
pub mod session;

pub use driver::{Coordinator, FALLBACK_TITLE};
pub use host::{AgentRegistry, Delivery, TargetHost, TargetId};
pub use session::{Effect, Input, Phase, Session, CONNECTING_MESSAGE, LOADING_MESSAGE};
