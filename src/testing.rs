//! Scripted pages and hosts for exercising the agent and coordinator
//! without a browser.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::agent::{AgentLink, Envelope, LoaderConfig, PageDriver, PageError, RawItem};
use crate::app::Failure;
use crate::coordinator::{AgentRegistry, Delivery, TargetHost, TargetId};

pub fn raw(text: &str, likes: &str) -> RawItem {
    RawItem {
        text: Some(text.to_string()),
        likes_label: Some(likes.to_string()),
    }
}

/// A page whose rendered item count follows a fixed script. Once the script
/// runs out the last count repeats.
pub struct ScriptedPage {
    container: bool,
    failure: Option<String>,
    counts: Mutex<VecDeque<usize>>,
    last_count: Mutex<usize>,
    items: Vec<RawItem>,
    scrolls: Mutex<Vec<u32>>,
    revealed: AtomicBool,
}

impl ScriptedPage {
    pub fn new(counts: Vec<usize>, items: Vec<RawItem>) -> Self {
        Self {
            container: true,
            failure: None,
            counts: Mutex::new(counts.into()),
            last_count: Mutex::new(0),
            items,
            scrolls: Mutex::new(Vec::new()),
            revealed: AtomicBool::new(false),
        }
    }

    pub fn without_container() -> Self {
        Self {
            container: false,
            ..Self::new(Vec::new(), Vec::new())
        }
    }

    /// Every driver call fails with `message`.
    pub fn broken(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(Vec::new(), Vec::new())
        }
    }

    pub fn scrolls(&self) -> Vec<u32> {
        self.scrolls.lock().unwrap().clone()
    }

    pub fn container_revealed(&self) -> bool {
        self.revealed.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), PageError> {
        match &self.failure {
            Some(message) => Err(PageError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PageDriver for ScriptedPage {
    async fn reveal_container(&self) -> Result<bool, PageError> {
        self.check()?;
        if self.container {
            self.revealed.store(true, Ordering::SeqCst);
        }
        Ok(self.container)
    }

    async fn count_items(&self) -> Result<usize, PageError> {
        self.check()?;
        let mut last = self.last_count.lock().unwrap();
        if let Some(next) = self.counts.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(*last)
    }

    async fn scroll_by(&self, px: u32) -> Result<(), PageError> {
        self.check()?;
        self.scrolls.lock().unwrap().push(px);
        Ok(())
    }

    async fn read_items(&self) -> Result<Vec<RawItem>, PageError> {
        self.check()?;
        Ok(self.items.clone())
    }
}

enum Behavior {
    NoTarget,
    Undeliverable,
    Page(Arc<ScriptedPage>),
    /// Accepts commands and never answers them
    Silent,
}

pub struct FakeHost {
    behavior: Behavior,
    registry: AgentRegistry,
    title: Option<String>,
    parked: Mutex<Vec<mpsc::Receiver<Envelope>>>,
}

impl FakeHost {
    fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            registry: AgentRegistry::new(),
            title: None,
            parked: Mutex::new(Vec::new()),
        }
    }

    pub fn with_page(page: ScriptedPage) -> Self {
        Self::with_behavior(Behavior::Page(Arc::new(page)))
    }

    pub fn no_target() -> Self {
        Self::with_behavior(Behavior::NoTarget)
    }

    pub fn undeliverable() -> Self {
        Self::with_behavior(Behavior::Undeliverable)
    }

    pub fn silent() -> Self {
        Self::with_behavior(Behavior::Silent)
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

#[async_trait]
impl TargetHost for FakeHost {
    async fn active_target(&self) -> Option<TargetId> {
        match self.behavior {
            Behavior::NoTarget => None,
            _ => Some(TargetId("tab-1".into())),
        }
    }

    async fn deliver(&self, target: &TargetId) -> Result<Delivery, Failure> {
        match &self.behavior {
            Behavior::NoTarget | Behavior::Undeliverable => Err(Failure::DeliveryFailed),
            Behavior::Page(page) => self.registry.ensure_present(
                target,
                || page.clone() as Arc<dyn PageDriver>,
                &LoaderConfig::default(),
            ),
            Behavior::Silent => {
                let (link, rx) = AgentLink::detached();
                self.parked.lock().unwrap().push(rx);
                Ok(Delivery {
                    link,
                    installed: true,
                })
            }
        }
    }

    async fn page_title(&self, _target: &TargetId) -> Option<String> {
        self.title.clone()
    }
}
