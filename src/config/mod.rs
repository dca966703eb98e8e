//! Configuration management for Chorus.
//!
//! Configuration is read from `~/.config/chorus/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use crate::agent::{LoaderConfig, Selectors};
use crate::browser::ChromeConfig;
use crate::domain::DEFAULT_MIN_LIKES;
use crate::export::ExportConfig;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: ChromeConfig,
    pub loader: LoaderConfig,
    pub selectors: Selectors,
    pub session: SessionConfig,
    pub export: ExportConfig,
}

/// Settings for one extraction session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds before an unanswered extraction is abandoned (default: 60)
    pub timeout_secs: u64,

    /// Like threshold when none is given (default: 10)
    pub default_min_likes: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            default_min_likes: DEFAULT_MIN_LIKES,
        }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(config_path)
    }

    /// Load configuration from `config_path`, creating it when absent.
    pub fn load_from(config_path: PathBuf) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: config_path,
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/chorus/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("chorus").join("config.toml"))
    }

    fn create_default_config(path: &PathBuf) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.clone(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# Chorus Configuration

[browser]
# Run browser in headless mode (no visible window)
headless = true

# Page load timeout in seconds
timeout_secs = 30

# Wait time after page load for the page's own scripts (milliseconds)
wait_after_load_ms = 2000

# Override the browser user agent
# user_agent = "Mozilla/5.0 ..."

[loader]
# Maximum number of scroll-and-count rounds
max_rounds = 10

# Pause before each count (milliseconds)
interval_ms = 1000

# Pixels scrolled after each round
scroll_step_px = 1000

# Unchanged non-zero counts in a row that end loading early
stable_rounds = 3

[selectors]
container = "ytd-comments"
item = "ytd-comment-thread-renderer"
text = "#content-text"
likes = "#vote-count-middle"

[session]
# Seconds before an extraction is abandoned
timeout_secs = 60

# Like threshold used when --min-likes is not given
default_min_likes = 10

[export]
# Directory exported files are written to (default: current directory)
# dir = "/home/me/Downloads"
"##
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
