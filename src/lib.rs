//! # Chorus
//!
//! Pulls the most-liked comments out of a YouTube video page.
//!
//! ## Architecture
//!
//! Three contexts talk only through messages:
//!
//! ```text
//! ClientSession ⇄ Coordinator ⇄ ContentAgent (inside the page)
//! ```
//!
//! The agent scrolls until the comment count stabilizes, then filters
//! comments by likes. The coordinator drives each request through an explicit
//! state machine with a timeout, ranks the result, and handles exports.
//!
//! ## Quick Start
//!
//! ```bash
//! # Extract comments with at least 50 likes and save them to a file
//! chorus extract "https://www.youtube.com/watch?v=..." --min-likes 50 --export
//!
//! # Show what was extracted last time
//! chorus cached "https://www.youtube.com/watch?v=..."
//! ```

/// Target-context content agent: stabilization loader and extractor.
///
/// - [`ContentAgent`](agent::ContentAgent): answers `getComments` commands
/// - [`PageDriver`](agent::PageDriver): the page operations the agent needs
pub mod agent;

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config, cache,
/// browser host, coordinator and client session.
pub mod app;

/// Headless Chrome host for target pages, via chromiumoxide.
pub mod browser;

/// Named duplex ports between contexts.
pub mod channel;

/// Command-line interface using clap.
///
/// - `extract <url>` - Extract liked comments from a video page
/// - `cached <url>` - Show the last cached result
/// - `export <url>` - Export the last cached result
pub mod cli;

/// User-facing extraction sessions and the result cache.
pub mod client;

/// Configuration loaded from `~/.config/chorus/config.toml`.
pub mod config;

/// Request coordinator: session state machine, timeout and export handling.
pub mod coordinator;

/// Core domain models and wire messages.
pub mod domain;

/// Ranking, file naming and writing of exports.
pub mod export;

/// SQLite cache of the last result per video.
pub mod store;

#[cfg(test)]
mod testing;
