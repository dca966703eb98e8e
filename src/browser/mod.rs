//! Headless Chrome as the environment that holds target pages.
//!
//! [`ChromeHost`] opens pages, tracks which one is active, and installs a
//! content agent into a page on demand. Pages are driven through
//! [`ChromePage`], which implements the agent's [`PageDriver`].

mod config;
mod page;

pub use config::ChromeConfig;
pub use page::ChromePage;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::agent::{LoaderConfig, PageDriver, Selectors};
use crate::app::{ChorusError, Failure, Result};
use crate::coordinator::{AgentRegistry, Delivery, TargetHost, TargetId};

pub struct ChromeHost {
    browser: tokio::sync::Mutex<Browser>,
    handler: JoinHandle<()>,
    config: ChromeConfig,
    loader: LoaderConfig,
    selectors: Selectors,
    /// Open pages; the last one is the active target.
    pages: Mutex<Vec<(TargetId, Page)>>,
    agents: AgentRegistry,
    next_id: AtomicU64,
}

impl ChromeHost {
    /// Launch a browser with the given configuration
    pub async fn launch(
        config: ChromeConfig,
        loader: LoaderConfig,
        selectors: Selectors,
    ) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer");

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ChorusError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            ChorusError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
        });

        info!("Browser launched (headless: {})", config.headless);

        Ok(Self {
            browser: tokio::sync::Mutex::new(browser),
            handler,
            config,
            loader,
            selectors,
            pages: Mutex::new(Vec::new()),
            agents: AgentRegistry::new(),
            next_id: AtomicU64::new(1),
        })
    }

    /// Navigate a new page to `url` and make it the active target.
    pub async fn open(&self, url: &str) -> Result<TargetId> {
        let page = self
            .browser
            .lock()
            .await
            .new_page(url)
            .await
            .map_err(|e| ChorusError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = self.config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| ChorusError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        tokio::time::timeout(self.config.timeout(), page.wait_for_navigation())
            .await
            .map_err(|_| ChorusError::Browser(format!("Timed out loading {}", url)))?
            .map_err(|e| ChorusError::Browser(format!("Navigation failed: {}", e)))?;

        // Let the page's own scripts render before anything is injected.
        tokio::time::sleep(self.config.wait_after_load()).await;

        let id = TargetId(format!("page-{}", self.next_id.fetch_add(1, Ordering::SeqCst)));
        self.pages
            .lock()
            .map_err(|_| ChorusError::Other("Page table lock poisoned".into()))?
            .push((id.clone(), page));
        info!("Opened {} as {}", url, id);

        Ok(id)
    }

    /// Close every page and shut the browser down.
    pub async fn close(&self) -> Result<()> {
        let pages = match self.pages.lock() {
            Ok(mut pages) => std::mem::take(&mut *pages),
            Err(_) => Vec::new(),
        };
        for (id, page) in pages {
            self.agents.remove(&id);
            if let Err(e) = page.close().await {
                warn!("Failed to close {}: {}", id, e);
            }
        }

        let mut browser = self.browser.lock().await;
        browser
            .close()
            .await
            .map_err(|e| ChorusError::Browser(format!("Failed to close browser: {}", e)))?;
        if let Err(e) = browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", e);
        }
        self.handler.abort();
        Ok(())
    }

    fn page(&self, target: &TargetId) -> Option<Page> {
        self.pages
            .lock()
            .ok()?
            .iter()
            .find(|(id, _)| id == target)
            .map(|(_, page)| page.clone())
    }
}

#[async_trait]
impl TargetHost for ChromeHost {
    async fn active_target(&self) -> Option<TargetId> {
        self.pages.lock().ok()?.last().map(|(id, _)| id.clone())
    }

    async fn deliver(&self, target: &TargetId) -> std::result::Result<Delivery, Failure> {
        let page = self.page(target).ok_or(Failure::DeliveryFailed)?;
        let selectors = self.selectors.clone();

        self.agents.ensure_present(
            target,
            move || Arc::new(ChromePage::new(page, selectors)) as Arc<dyn PageDriver>,
            &self.loader,
        )
    }

    async fn page_title(&self, target: &TargetId) -> Option<String> {
        let page = self.page(target)?;
        match page.evaluate(page::title_script().to_string()).await {
            Ok(result) => result
                .into_value::<Option<String>>()
                .ok()
                .flatten()
                .map(|t| t.trim().to_string()),
            Err(e) => {
                warn!("Error getting video title: {}", e);
                None
            }
        }
    }
}
