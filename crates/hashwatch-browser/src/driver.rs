//! Browser session abstraction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::Result;

/// How to find an element on the page
///
/// Serialized as `{ xpath = "..." }` or `{ css = "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
    XPath(String),
    Css(String),
}

impl Locator {
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// The raw selector text
    pub fn value(&self) -> &str {
        match self {
            Self::XPath(v) | Self::Css(v) => v,
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::XPath(v) => write!(f, "xpath:{}", v),
            Self::Css(v) => write!(f, "css:{}", v),
        }
    }
}

/// Readiness predicate for a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitCondition {
    /// Element is in the DOM
    Present,
    /// Element is in the DOM, visible and not disabled
    Clickable,
}

impl std::fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present => write!(f, "present"),
            Self::Clickable => write!(f, "clickable"),
        }
    }
}

/// Operations the pipeline needs from a live browser session
///
/// Every method is attempted once; implementations must not retry.
/// After `quit` the session is unusable.
#[async_trait]
pub trait BrowserDriver: Send {
    /// Product/version string of the browser, for the run log
    async fn browser_version(&mut self) -> Result<String>;

    async fn navigate(&mut self, url: &str) -> Result<()>;

    /// Block until `locator` satisfies `condition`, or fail with
    /// `ElementNotFound` once `timeout` has passed
    async fn wait_for(
        &mut self,
        locator: &Locator,
        condition: WaitCondition,
        timeout: Duration,
    ) -> Result<()>;

    async fn click(&mut self, locator: &Locator) -> Result<()>;

    /// Type `text` into the element
    async fn send_keys(&mut self, locator: &Locator, text: &str) -> Result<()>;

    /// Press the commit key (Enter) with the element focused
    async fn press_enter(&mut self, locator: &Locator) -> Result<()>;

    /// Evaluate a JavaScript expression and return its value
    async fn execute_script(&mut self, script: &str) -> Result<serde_json::Value>;

    async fn current_url(&mut self) -> Result<String>;

    /// PNG bytes of the current viewport
    async fn capture_screenshot(&mut self) -> Result<Vec<u8>>;

    /// Release the browser
    async fn quit(&mut self) -> Result<()>;
}

/// Source of fresh browser sessions
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserDriver>>;
}
