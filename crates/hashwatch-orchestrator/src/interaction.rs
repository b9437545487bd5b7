//! Interaction driver: runs the search script against a browser session
//!
//! Each step waits once, bounded by the wait timeout, for the element it
//! needs. Nothing is retried; the first unmet wait ends the interaction.

use hashwatch_browser::{BrowserDriver, Locator, WaitCondition};
use hashwatch_core::{HashwatchConfig, HashwatchError, Result};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::hooks::ObserverPipeline;
use crate::state_machine::{transition, Event, State, Step};

/// Element locators for the IMDb advanced title search page
///
/// These track the site's current markup and are the first thing to break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub expand_all: Locator,
    pub title_input: Locator,
    pub movie_chip: Locator,
    pub result_title: Locator,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            expand_all: Locator::xpath(r#"//span[@class="ipc-btn__text" and text()="Expand all"]"#),
            title_input: Locator::xpath(r#"//input[@aria-label="Title name"]"#),
            movie_chip: Locator::xpath(r#"//button[@data-testid="test-chip-id-movie"]"#),
            result_title: Locator::css("h3.ipc-title__text"),
        }
    }
}

/// What to search for and how long to wait
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionScript {
    pub url: String,
    pub keyword: String,
    pub wait_timeout: Duration,
    pub settle: Duration,
    pub selectors: Selectors,
}

impl InteractionScript {
    pub fn new(url: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            keyword: keyword.into(),
            wait_timeout: Duration::from_secs(20),
            settle: Duration::from_secs(5),
            selectors: Selectors::default(),
        }
    }

    pub fn from_config(config: &HashwatchConfig) -> Self {
        Self::new(&config.target.url, &config.target.keyword)
            .with_timings(config.timing.wait_timeout(), config.timing.settle())
    }

    pub fn with_timings(mut self, wait_timeout: Duration, settle: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self.settle = settle;
        self
    }

    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }
}

/// Drives one session through the search steps
pub struct InteractionDriver<'a> {
    session: &'a mut dyn BrowserDriver,
    observers: &'a ObserverPipeline,
}

impl<'a> InteractionDriver<'a> {
    pub fn new(session: &'a mut dyn BrowserDriver, observers: &'a ObserverPipeline) -> Self {
        Self { session, observers }
    }

    /// Run every step in order, leaving the session on the results page
    pub async fn run(&mut self, script: &InteractionScript) -> Result<()> {
        info!("Current URL: {}", script.url);
        info!("Keyword: {}", script.keyword);

        let mut state = State::initial();
        let mut failure: Option<HashwatchError> = None;

        loop {
            let step = match state {
                State::Ready(step) => step,
                State::Complete => return Ok(()),
                State::Failed { step, error } => {
                    debug!("Interaction stopped at {:?}", step);
                    return Err(failure.unwrap_or(HashwatchError::Other(error)));
                }
            };

            let event = match self.perform(step, script).await {
                Ok(()) => {
                    debug!("Step {} complete", step);
                    self.observers.notify_all(step, &mut *self.session).await;
                    Event::StepSucceeded
                }
                Err(e) => {
                    error!("Interaction step {} failed: {}", step, e);
                    let error = e.to_string();
                    failure = Some(e);
                    Event::StepFailed { error }
                }
            };

            state = transition(state, event);
        }
    }

    async fn perform(&mut self, step: Step, script: &InteractionScript) -> Result<()> {
        let selectors = &script.selectors;
        let timeout = script.wait_timeout;

        match step {
            Step::LoadPage => {
                self.session.navigate(&script.url).await?;
                settle(script.settle).await;
            }
            Step::ExpandFilters => {
                self.session
                    .wait_for(&selectors.expand_all, WaitCondition::Clickable, timeout)
                    .await?;
                self.session.click(&selectors.expand_all).await?;
            }
            Step::EnterKeyword => {
                self.session
                    .wait_for(&selectors.title_input, WaitCondition::Present, timeout)
                    .await?;
                self.session
                    .send_keys(&selectors.title_input, &script.keyword)
                    .await?;
            }
            Step::SelectCategory => {
                self.session
                    .wait_for(&selectors.movie_chip, WaitCondition::Clickable, timeout)
                    .await?;
                self.session.click(&selectors.movie_chip).await?;
            }
            Step::SubmitSearch => {
                self.session.press_enter(&selectors.title_input).await?;
            }
            Step::AwaitResults => {
                settle(script.settle).await;
                self.session
                    .wait_for(&selectors.result_title, WaitCondition::Present, timeout)
                    .await?;
                let url = self.session.current_url().await?;
                info!("Current URL after first search results found: {}", url);
            }
        }

        Ok(())
    }
}

async fn settle(interval: Duration) {
    if !interval.is_zero() {
        debug!("Settling for {:?}", interval);
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashwatch_browser::ScriptedSession;

    fn script() -> InteractionScript {
        InteractionScript::new("https://www.imdb.com/search/title/", "Shrek")
            .with_timings(Duration::from_secs(20), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_runs_steps_in_order() {
        let handle = ScriptedSession::new();
        let mut session = handle.clone();
        let observers = ObserverPipeline::new();

        InteractionDriver::new(&mut session, &observers)
            .run(&script())
            .await
            .unwrap();

        let sel = Selectors::default();
        assert_eq!(
            handle.actions(),
            vec![
                "navigate https://www.imdb.com/search/title/".to_string(),
                format!("wait clickable {}", sel.expand_all),
                format!("click {}", sel.expand_all),
                format!("wait present {}", sel.title_input),
                format!("type {} Shrek", sel.title_input),
                format!("wait clickable {}", sel.movie_chip),
                format!("click {}", sel.movie_chip),
                format!("enter {}", sel.title_input),
                format!("wait present {}", sel.result_title),
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_element_stops_chain() {
        let sel = Selectors::default();
        let handle = ScriptedSession::new().with_missing_element(sel.movie_chip.clone());
        let mut session = handle.clone();
        let observers = ObserverPipeline::new();

        let err = InteractionDriver::new(&mut session, &observers)
            .run(&script())
            .await
            .unwrap_err();

        assert!(matches!(err, HashwatchError::ElementNotFound(_)));
        let actions = handle.actions();
        assert_eq!(actions.last(), Some(&format!("wait clickable {}", sel.movie_chip)));
        // one attempt, no retry
        assert_eq!(
            actions.iter().filter(|a| a.contains("test-chip-id-movie")).count(),
            1
        );
        assert!(!actions.iter().any(|a| a.starts_with("enter")));
    }

    #[tokio::test]
    async fn test_navigation_failure_is_session_error() {
        let handle = ScriptedSession::new().with_navigation_failure("net::ERR_NAME_NOT_RESOLVED");
        let mut session = handle.clone();
        let observers = ObserverPipeline::new();

        let err = InteractionDriver::new(&mut session, &observers)
            .run(&script())
            .await
            .unwrap_err();

        assert!(matches!(err, HashwatchError::Session(_)));
        assert_eq!(handle.actions().len(), 1);
    }

    #[test]
    fn test_script_from_config() {
        let mut config = HashwatchConfig::default();
        config.target.keyword = "Alien".to_string();
        config.timing.settle_secs = 0;

        let script = InteractionScript::from_config(&config);
        assert_eq!(script.keyword, "Alien");
        assert_eq!(script.settle, Duration::ZERO);
        assert_eq!(script.wait_timeout, Duration::from_secs(20));
        assert_eq!(script.selectors, Selectors::default());
    }
}
