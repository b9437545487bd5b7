//! Scripted browser session for testing
//!
//! Every wait succeeds immediately unless its locator was marked missing, and
//! the performance-entry script returns a fixed list. Clones share the action
//! log and release counter, so a test can keep a handle while the pipeline
//! owns the boxed session.

use async_trait::async_trait;
use hashwatch_core::HashwatchError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::driver::{BrowserDriver, Locator, SessionProvider, WaitCondition};
use crate::error::Result;

/// Minimal PNG signature returned as screenshot data
const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Deterministic stand-in for a browser session
#[derive(Clone, Default)]
pub struct ScriptedSession {
    entries: Vec<String>,
    missing: Vec<Locator>,
    navigation_error: Option<String>,
    script_error: Option<String>,
    screenshot_error: Option<String>,
    url: String,
    closed: bool,
    actions: Arc<Mutex<Vec<String>>>,
    releases: Arc<AtomicUsize>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs returned by the performance-entry script
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Waits on `locator` time out
    pub fn with_missing_element(mut self, locator: Locator) -> Self {
        self.missing.push(locator);
        self
    }

    pub fn with_navigation_failure(mut self, message: impl Into<String>) -> Self {
        self.navigation_error = Some(message.into());
        self
    }

    pub fn with_script_failure(mut self, message: impl Into<String>) -> Self {
        self.script_error = Some(message.into());
        self
    }

    pub fn with_screenshot_failure(mut self, message: impl Into<String>) -> Self {
        self.screenshot_error = Some(message.into());
        self
    }

    /// Every call made against this session (and its clones), in order
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().map(|a| a.clone()).unwrap_or_default()
    }

    /// Number of `quit` calls across this session and its clones
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    fn record(&self, action: String) {
        if let Ok(mut actions) = self.actions.lock() {
            actions.push(action);
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(HashwatchError::Session(
                "Browser session already closed".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for ScriptedSession {
    async fn browser_version(&mut self) -> Result<String> {
        self.ensure_open()?;
        Ok("ScriptedSession/1.0".to_string())
    }

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.ensure_open()?;
        self.record(format!("navigate {}", url));
        if let Some(ref message) = self.navigation_error {
            return Err(HashwatchError::Session(message.clone()));
        }
        self.url = url.to_string();
        Ok(())
    }

    async fn wait_for(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<()> {
        self.ensure_open()?;
        self.record(format!("wait {} {}", condition, locator));
        if self.missing.contains(locator) {
            return Err(HashwatchError::ElementNotFound(format!(
                "{} not {} after {:?}",
                locator, condition, timeout
            )));
        }
        Ok(())
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        self.ensure_open()?;
        self.record(format!("click {}", locator));
        Ok(())
    }

    async fn send_keys(&mut self, locator: &Locator, text: &str) -> Result<()> {
        self.ensure_open()?;
        self.record(format!("type {} {}", locator, text));
        Ok(())
    }

    async fn press_enter(&mut self, locator: &Locator) -> Result<()> {
        self.ensure_open()?;
        self.record(format!("enter {}", locator));
        Ok(())
    }

    async fn execute_script(&mut self, _script: &str) -> Result<serde_json::Value> {
        self.ensure_open()?;
        self.record("script".to_string());
        if let Some(ref message) = self.script_error {
            return Err(HashwatchError::Session(message.clone()));
        }
        // the real script returns JSON.stringify(urls)
        Ok(serde_json::Value::String(serde_json::to_string(&self.entries)?))
    }

    async fn current_url(&mut self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.url.clone())
    }

    async fn capture_screenshot(&mut self) -> Result<Vec<u8>> {
        self.ensure_open()?;
        self.record("screenshot".to_string());
        if let Some(ref message) = self.screenshot_error {
            return Err(HashwatchError::Session(message.clone()));
        }
        Ok(FAKE_PNG.to_vec())
    }

    async fn quit(&mut self) -> Result<()> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        self.record("quit".to_string());
        self.closed = true;
        Ok(())
    }
}

/// Provider handing out clones of one scripted session
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    session: ScriptedSession,
    launch_error: Option<String>,
    launches: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn new(session: ScriptedSession) -> Self {
        Self {
            session,
            launch_error: None,
            launches: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every launch fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            launch_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Handle sharing the action log and release counter with launched sessions
    pub fn session(&self) -> &ScriptedSession {
        &self.session
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for ScriptedProvider {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if let Some(ref message) = self.launch_error {
            return Err(HashwatchError::Session(format!(
                "Failed to launch browser: {}",
                message
            )));
        }
        Ok(Box::new(self.session.clone()))
    }
}
