use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tuning for the scroll-and-wait loop that reveals lazily rendered comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Upper bound on polling rounds (default: 10)
    pub max_rounds: u32,

    /// Pause before each recount in milliseconds (default: 1000)
    pub interval_ms: u64,

    /// Viewport advance after each round in pixels (default: 1000)
    pub scroll_step_px: u32,

    /// Consecutive unchanged, non-zero counts that end loading early (default: 3)
    pub stable_rounds: u32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            interval_ms: 1000,
            scroll_step_px: 1000,
            stable_rounds: 3,
        }
    }
}

impl LoaderConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// CSS selectors locating the comment thread on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// The section that hosts the thread and triggers lazy loading when visible
    pub container: String,
    /// One element per top-level comment
    pub item: String,
    /// Comment body, relative to an item
    pub text: String,
    /// Like-count label, relative to an item
    pub likes: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            container: "ytd-comments".to_string(),
            item: "ytd-comment-thread-renderer".to_string(),
            text: "#content-text".to_string(),
            likes: "#vote-count-middle".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_loader_values() {
        let config = LoaderConfig::default();
        assert_eq!(config.max_rounds, 10);
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert_eq!(config.scroll_step_px, 1000);
        assert_eq!(config.stable_rounds, 3);
    }

    #[test]
    fn test_partial_loader_config() {
        let config: LoaderConfig = toml::from_str("max_rounds = 4").unwrap();
        assert_eq!(config.max_rounds, 4);
        assert_eq!(config.stable_rounds, 3);
    }

    #[test]
    fn test_default_selectors_target_youtube() {
        let selectors = Selectors::default();
        assert_eq!(selectors.container, "ytd-comments");
        assert_eq!(selectors.item, "ytd-comment-thread-renderer");
    }
}
