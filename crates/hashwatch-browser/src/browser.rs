//! Headless Chrome session using the Chrome DevTools Protocol

use async_trait::async_trait;
use hashwatch_core::config::BrowserSettings;
use hashwatch_core::HashwatchError;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::driver::{BrowserDriver, Locator, SessionProvider, WaitCondition};
use crate::error::Result;

/// Launch settings for a Chrome session
pub type LaunchSettings = BrowserSettings;

/// Delay between readiness checks while waiting for an element
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Keep the CDP connection open across the longest wait plus settle pauses
const IDLE_BROWSER_TIMEOUT: Duration = Duration::from_secs(120);

const IS_CLICKABLE_FN: &str = "function() { \
    const rect = this.getBoundingClientRect(); \
    return !this.disabled && rect.width > 0 && rect.height > 0; \
}";

/// Launches a fresh headless Chrome per run
#[derive(Debug, Clone)]
pub struct ChromeLauncher {
    settings: LaunchSettings,
}

impl ChromeLauncher {
    pub fn new(settings: LaunchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &LaunchSettings {
        &self.settings
    }
}

#[async_trait]
impl SessionProvider for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>> {
        let session = ChromeSession::launch(&self.settings)?;
        Ok(Box::new(session))
    }
}

/// Active browser session with one tab
pub struct ChromeSession {
    /// Underlying browser instance; dropping it kills the browser process
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl ChromeSession {
    /// Launch browser with the given settings
    pub fn launch(settings: &LaunchSettings) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            settings.headless, settings.window_width, settings.window_height
        );

        let user_agent_arg: Option<String> = settings
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));
        let mut args: Vec<&OsStr> = Vec::new();
        if let Some(ref ua_arg) = user_agent_arg {
            args.push(OsStr::new(ua_arg));
        }

        if let Some(ref path) = settings.chrome_path {
            info!("Using browser binary: {}", path.display());
        }

        let launch_options = LaunchOptions::default_builder()
            .headless(settings.headless)
            .window_size(Some((settings.window_width, settings.window_height)))
            .path(settings.chrome_path.clone())
            .idle_browser_timeout(IDLE_BROWSER_TIMEOUT)
            .args(args)
            .build()
            .map_err(|e| HashwatchError::Session(format!("Invalid launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| HashwatchError::Session(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| HashwatchError::Session(format!("Failed to create tab: {}", e)))?;

        info!("Browser launched successfully");

        Ok(Self {
            browser: Some(browser),
            tab: Some(tab),
        })
    }

    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| HashwatchError::Session("Browser session already closed".to_string()))
    }

    /// Look up an element without waiting
    fn find<'a>(tab: &'a Tab, locator: &Locator) -> Result<Element<'a>> {
        let found = match locator {
            Locator::XPath(expr) => tab.find_element_by_xpath(expr),
            Locator::Css(selector) => tab.find_element(selector),
        };
        found.map_err(|_| HashwatchError::ElementNotFound(locator.to_string()))
    }

    fn is_clickable(element: &Element<'_>) -> bool {
        element
            .call_js_fn(IS_CLICKABLE_FN, vec![], false)
            .ok()
            .and_then(|obj| obj.value)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}

#[async_trait]
impl BrowserDriver for ChromeSession {
    async fn browser_version(&mut self) -> Result<String> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| HashwatchError::Session("Browser session already closed".to_string()))?;

        let version = browser
            .get_version()
            .map_err(|e| HashwatchError::Session(format!("Failed to query browser version: {}", e)))?;

        Ok(format!(
            "{} (protocol {})",
            version.product, version.protocol_version
        ))
    }

    async fn navigate(&mut self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        let tab = self.tab()?;

        tab.navigate_to(url)
            .map_err(|e| HashwatchError::Session(format!("Failed to navigate to {}: {}", url, e)))?;

        tab.wait_until_navigated()
            .map_err(|e| HashwatchError::Session(format!("Navigation timeout for {}: {}", url, e)))?;

        info!("Successfully navigated to {}", url);
        Ok(())
    }

    async fn wait_for(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<()> {
        debug!("Waiting for {} to be {} (timeout: {:?})", locator, condition, timeout);

        let tab = Arc::clone(self.tab()?);
        let deadline = Instant::now() + timeout;

        loop {
            let ready = match Self::find(&tab, locator) {
                Ok(element) => match condition {
                    WaitCondition::Present => true,
                    WaitCondition::Clickable => Self::is_clickable(&element),
                },
                Err(_) => false,
            };

            if ready {
                debug!("Element ready: {}", locator);
                return Ok(());
            }

            if Instant::now() >= deadline {
                return Err(HashwatchError::ElementNotFound(format!(
                    "{} not {} after {:?}",
                    locator, condition, timeout
                )));
            }

            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&mut self, locator: &Locator) -> Result<()> {
        let tab = self.tab()?;
        let element = Self::find(tab, locator)?;

        element
            .click()
            .map_err(|e| HashwatchError::Session(format!("Failed to click {}: {}", locator, e)))?;

        debug!("Clicked {}", locator);
        Ok(())
    }

    async fn send_keys(&mut self, locator: &Locator, text: &str) -> Result<()> {
        let tab = self.tab()?;
        let element = Self::find(tab, locator)?;

        element
            .type_into(text)
            .map_err(|e| HashwatchError::Session(format!("Failed to type into {}: {}", locator, e)))?;

        debug!("Typed {:?} into {}", text, locator);
        Ok(())
    }

    async fn press_enter(&mut self, locator: &Locator) -> Result<()> {
        let tab = self.tab()?;
        let element = Self::find(tab, locator)?;

        element
            .focus()
            .map_err(|e| HashwatchError::Session(format!("Failed to focus {}: {}", locator, e)))?;
        tab.press_key("Enter")
            .map_err(|e| HashwatchError::Session(format!("Failed to press Enter: {}", e)))?;

        debug!("Pressed Enter on {}", locator);
        Ok(())
    }

    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value> {
        debug!("Evaluating JavaScript ({} chars)", script.len());

        let result = self
            .tab()?
            .evaluate(script, false)
            .map_err(|e| HashwatchError::Session(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    async fn current_url(&mut self) -> Result<String> {
        Ok(self.tab()?.get_url())
    }

    async fn capture_screenshot(&mut self) -> Result<Vec<u8>> {
        self.tab()?
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| HashwatchError::Session(format!("CDP capture failed: {}", e)))
    }

    async fn quit(&mut self) -> Result<()> {
        let Some(browser) = self.browser.take() else {
            debug!("Browser session already closed");
            return Ok(());
        };

        info!("Closing browser session");
        if let Some(tab) = self.tab.take() {
            if let Err(e) = tab.close(true) {
                debug!("Failed to close tab cleanly: {}", e);
            }
        }
        drop(browser);
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if self.browser.is_some() {
            debug!("ChromeSession dropped without quit, browser will be cleaned up");
        }
    }
}
