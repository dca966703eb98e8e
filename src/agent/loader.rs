//! Stabilization loader.
//!
//! The host page never says "all comments are loaded", so loading is declared
//! done once the rendered item count stays the same, and non-zero, for a few
//! consecutive rounds. This is a heuristic: a slow network can still stop it
//! early, and the round budget caps how much gets revealed.

use tracing::{debug, info};

use crate::agent::config::LoaderConfig;
use crate::agent::{ExtractError, PageDriver};

/// Loop state threaded through [`LoadState::observe`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadState {
    /// Rounds completed so far
    pub round: u32,
    /// Item count seen in the previous round
    pub last_count: usize,
    /// Consecutive rounds with an unchanged, non-zero count
    pub stable_streak: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStep {
    /// Keep scrolling
    Continue(LoadState),
    /// Count held steady long enough
    Converged(LoadState),
    /// Round budget spent without converging
    Exhausted(LoadState),
}

impl LoadState {
    /// Fold one round's item count into the state.
    ///
    /// A zero count never extends the streak, so an empty thread is not
    /// mistaken for a finished one.
    pub fn observe(self, count: usize, config: &LoaderConfig) -> LoadStep {
        let mut stable_streak = self.stable_streak;
        if count > 0 {
            if count == self.last_count {
                stable_streak += 1;
            } else {
                stable_streak = 0;
            }
        }

        let next = LoadState {
            round: self.round + 1,
            last_count: count,
            stable_streak,
        };

        if count > 0 && stable_streak >= config.stable_rounds {
            LoadStep::Converged(next)
        } else if next.round >= config.max_rounds {
            LoadStep::Exhausted(next)
        } else {
            LoadStep::Continue(next)
        }
    }
}

/// Outcome of a load pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub rounds: u32,
    pub final_count: usize,
    pub converged: bool,
}

/// Scroll the thread into view and keep nudging the viewport until the item
/// count settles or the round budget runs out. Running out is not an error.
pub async fn load<D: PageDriver + ?Sized>(
    driver: &D,
    config: &LoaderConfig,
) -> Result<LoadReport, ExtractError> {
    if !driver.reveal_container().await? {
        return Err(ExtractError::ContainerNotFound);
    }

    let mut state = LoadState::default();
    loop {
        tokio::time::sleep(config.interval()).await;

        let count = driver.count_items().await?;
        debug!(round = state.round + 1, count, "Loader round");

        match state.observe(count, config) {
            LoadStep::Continue(next) => {
                state = next;
                driver.scroll_by(config.scroll_step_px).await?;
            }
            LoadStep::Converged(done) => {
                info!("Comment count settled at {} after {} rounds", done.last_count, done.round);
                return Ok(LoadReport {
                    rounds: done.round,
                    final_count: done.last_count,
                    converged: true,
                });
            }
            LoadStep::Exhausted(done) => {
                driver.scroll_by(config.scroll_step_px).await?;
                info!(
                    "Stopped loading after {} rounds with {} comments rendered",
                    done.round, done.last_count
                );
                return Ok(LoadReport {
                    rounds: done.round,
                    final_count: done.last_count,
                    converged: false,
                });
            }
        }
    }
}
