//! Observer hooks run after each interaction step
//!
//! Hooks are fail-open: failures are logged but never change the
//! interaction's control flow.

use async_trait::async_trait;
use hashwatch_browser::screenshot::{save_screenshot, snapshot_path};
use hashwatch_browser::BrowserDriver;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::state_machine::Step;

/// Result from hook execution
#[derive(Debug, Clone)]
pub struct HookResult {
    pub success: bool,
    pub message: String,
}

impl HookResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Trait for post-step hooks
#[async_trait]
pub trait StepObserver: Send + Sync {
    /// Execute the hook
    ///
    /// Implementations should handle their own errors and return failure
    /// results rather than propagating errors.
    async fn after_step(&self, step: Step, session: &mut dyn BrowserDriver) -> HookResult;
}

/// Observers executed in registration order
pub struct ObserverPipeline {
    observers: Vec<Box<dyn StepObserver>>,
}

impl ObserverPipeline {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn StepObserver>) {
        self.observers.push(observer);
    }

    /// Notify every observer of a completed step (fail-open)
    pub async fn notify_all(&self, step: Step, session: &mut dyn BrowserDriver) -> Vec<HookResult> {
        let mut results = Vec::with_capacity(self.observers.len());

        for observer in &self.observers {
            let result = observer.after_step(step, session).await;

            if result.success {
                debug!("Observer after {}: {}", step, result.message);
            } else {
                warn!("Observer after {} failed (continuing): {}", step, result.message);
            }

            results.push(result);
        }

        results
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Default for ObserverPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes the numbered PNG snapshot for each step that has one
pub struct ScreenshotHook {
    dir: PathBuf,
}

impl ScreenshotHook {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl StepObserver for ScreenshotHook {
    async fn after_step(&self, step: Step, session: &mut dyn BrowserDriver) -> HookResult {
        let Some(name) = step.snapshot_name() else {
            return HookResult::success(format!("No snapshot for {}", step));
        };

        let path = snapshot_path(&self.dir, name);
        match save_screenshot(session, &path).await {
            Ok(saved) => HookResult::success(format!("Saved {}", saved.display())),
            Err(e) => HookResult::failure(format!("Could not save {}: {}", path.display(), e)),
        }
    }
}
