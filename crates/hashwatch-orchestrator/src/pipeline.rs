//! End-to-end run: stored hash → browser → traffic → hash → reconcile
//!
//! The browser session is acquired once per run and released exactly once,
//! whatever stage fails. Failures are logged here and folded into the
//! [`RunReport`]; `run` itself never fails.

use hashwatch_browser::{capture_network_entries, BrowserDriver, SessionProvider};
use hashwatch_core::{
    extract_hash, reconcile, ExtractedHash, HashStore, MarkerSet, NetworkEntry, Result, RunReport,
};
use tracing::{error, info, warn};

use crate::hooks::{ObserverPipeline, StepObserver};
use crate::interaction::{InteractionDriver, InteractionScript};

/// One configured hash-watch run
pub struct Pipeline<P: SessionProvider> {
    provider: P,
    script: InteractionScript,
    store: HashStore,
    observers: ObserverPipeline,
}

impl<P: SessionProvider> Pipeline<P> {
    pub fn new(provider: P, script: InteractionScript, store: HashStore) -> Self {
        Self {
            provider,
            script,
            store,
            observers: ObserverPipeline::new(),
        }
    }

    /// Register a hook to run after each interaction step
    pub fn with_observer(mut self, observer: Box<dyn StepObserver>) -> Self {
        self.observers.add_observer(observer);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &HashStore {
        &self.store
    }

    /// Execute the run and report what happened
    pub async fn run(&self) -> RunReport {
        let previous = self.store.load().await;

        let (hash, failure) = match self.capture_hash().await {
            Ok(hash) => (Some(hash), None),
            Err(e) if e.is_extraction_miss() => {
                info!("No hash found: {}", e);
                (None, Some(e.to_string()))
            }
            Err(e) => {
                error!("An error occurred: {}", e);
                (None, Some(e.to_string()))
            }
        };

        let reconciliation = reconcile(&self.store, previous.as_deref(), hash.as_ref()).await;

        let report = RunReport {
            outcome: reconciliation.outcome,
            hash,
            previous,
            written: reconciliation.written,
            failure,
        };
        info!("{}", report.summary());
        report
    }

    async fn capture_hash(&self) -> Result<ExtractedHash> {
        let mut session = self.provider.launch().await?;

        let captured = self.drive(session.as_mut()).await;

        if let Err(e) = session.quit().await {
            warn!("Failed to release browser session: {}", e);
        }

        let entries = captured?;
        extract_hash(&entries, &MarkerSet::for_keyword(&self.script.keyword))
    }

    async fn drive(&self, session: &mut dyn BrowserDriver) -> Result<Vec<NetworkEntry>> {
        match session.browser_version().await {
            Ok(version) => info!("Browser version: {}", version),
            Err(e) => warn!("Could not read browser version: {}", e),
        }

        InteractionDriver::new(&mut *session, &self.observers)
            .run(&self.script)
            .await?;

        capture_network_entries(session).await
    }
}
