use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::info;

use crate::agent::{spawn_agent, AgentLink, LoaderConfig, PageDriver};
use crate::app::Failure;

/// Identifies one browsing context the coordinator can target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetId(pub String);

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of delivering the content agent into a target.
#[derive(Debug, Clone)]
pub struct Delivery {
    pub link: AgentLink,
    /// `false` when an agent was already running in the target
    pub installed: bool,
}

/// The environment the coordinator runs in: which page is active, and how to
/// get an agent into it.
#[async_trait]
pub trait TargetHost: Send + Sync {
    /// The page the user is currently looking at, if any.
    async fn active_target(&self) -> Option<TargetId>;

    /// Make sure a content agent is running in `target`.
    async fn deliver(&self, target: &TargetId) -> Result<Delivery, Failure>;

    /// Best-effort title of the page, used to name exports.
    async fn page_title(&self, target: &TargetId) -> Option<String>;
}

/// One content agent per target, installed on first use.
#[derive(Default)]
pub struct AgentRegistry {
    agents: Mutex<HashMap<TargetId, AgentLink>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the running agent for `target`, or spawn one over `driver`.
    /// `installed` reports whether this call did the spawning.
    pub fn ensure_present(
        &self,
        target: &TargetId,
        driver: impl FnOnce() -> Arc<dyn PageDriver>,
        config: &LoaderConfig,
    ) -> Result<Delivery, Failure> {
        let mut agents = self
            .agents
            .lock()
            .map_err(|_| Failure::DeliveryFailed)?;

        if let Some(link) = agents.get(target).filter(|link| link.is_alive()) {
            return Ok(Delivery {
                link: link.clone(),
                installed: false,
            });
        }

        let link = spawn_agent(driver(), config.clone());
        agents.insert(target.clone(), link.clone());
        info!("Content agent installed in {}", target);

        Ok(Delivery {
            link,
            installed: true,
        })
    }

    /// Forget the agent for `target`; it stops once the last link is dropped.
    pub fn remove(&self, target: &TargetId) {
        if let Ok(mut agents) = self.agents.lock() {
            agents.remove(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedPage;

    #[tokio::test]
    async fn test_ensure_present_installs_once() {
        let registry = AgentRegistry::new();
        let target = TargetId("tab-1".into());
        let config = LoaderConfig::default();
        let page: Arc<dyn PageDriver> = Arc::new(ScriptedPage::new(vec![1], vec![]));

        let first = registry
            .ensure_present(&target, || page.clone(), &config)
            .unwrap();
        let second = registry
            .ensure_present(&target, || panic!("agent should be reused"), &config)
            .unwrap();

        assert!(first.installed);
        assert!(!second.installed);
    }

    #[tokio::test]
    async fn test_ensure_present_is_per_target() {
        let registry = AgentRegistry::new();
        let config = LoaderConfig::default();
        let driver = || -> Arc<dyn PageDriver> { Arc::new(ScriptedPage::new(vec![1], vec![])) };

        let a = registry
            .ensure_present(&TargetId("a".into()), driver, &config)
            .unwrap();
        let b = registry
            .ensure_present(&TargetId("b".into()), driver, &config)
            .unwrap();
        assert!(a.installed && b.installed);

        registry.remove(&TargetId("a".into()));
        let again = registry
            .ensure_present(&TargetId("a".into()), driver, &config)
            .unwrap();
        assert!(again.installed);
    }
}
