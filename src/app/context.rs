use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{ChorusError, Result};
use crate::browser::ChromeHost;
use crate::client::ClientSession;
use crate::config::Config;
use crate::coordinator::Coordinator;
use crate::export::Exporter;
use crate::store::SqliteCache;

pub struct AppContext {
    pub config: Config,
    pub cache: Arc<SqliteCache>,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        Ok(Self {
            config,
            cache: Arc::new(SqliteCache::new(&db_path)?),
        })
    }

    /// Start a browser configured from `[browser]`, `[loader]` and `[selectors]`.
    pub async fn launch_host(&self) -> Result<Arc<ChromeHost>> {
        let host = ChromeHost::launch(
            self.config.browser.clone(),
            self.config.loader.clone(),
            self.config.selectors.clone(),
        )
        .await?;
        Ok(Arc::new(host))
    }

    /// Wire a coordinator over `host` and a client session on top of it.
    pub fn client(&self, host: Arc<ChromeHost>) -> ClientSession {
        let coordinator = Coordinator::new(
            host,
            Exporter::from_config(&self.config.export),
            self.config.session.timeout(),
        );
        ClientSession::new(coordinator, self.cache.clone())
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ChorusError::Config("Could not find data directory".into()))?;
        let chorus_dir = data_dir.join("chorus");
        std::fs::create_dir_all(&chorus_dir)?;
        Ok(chorus_dir.join("chorus.db"))
    }
}
