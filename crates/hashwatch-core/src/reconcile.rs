//! Compare a fresh extraction with the stored hash and persist it
//!
//! The freshest extraction always wins: every successful extraction is
//! written, whether or not it matches. A run without an extraction leaves the
//! store untouched.

use tracing::{error, info};

use crate::{ExtractedHash, HashStore, RunOutcome};

/// Outcome of reconciling one run against the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub outcome: RunOutcome,
    /// Whether the store now holds the extracted hash
    pub written: bool,
}

/// Pure outcome table
pub fn classify(stored: Option<&str>, extracted: Option<&ExtractedHash>) -> RunOutcome {
    match (stored, extracted) {
        (_, None) => RunOutcome::ExtractionFailed,
        (None, Some(_)) => RunOutcome::NoPriorValue,
        (Some(prev), Some(hash)) if prev == hash.as_str() => RunOutcome::Match,
        (Some(_), Some(_)) => RunOutcome::Mismatch,
    }
}

/// Classify the run, log the outcome and write the extracted hash when there is one.
///
/// A failed write is logged and reported through `written`; it does not change
/// the outcome.
pub async fn reconcile(
    store: &HashStore,
    stored: Option<&str>,
    extracted: Option<&ExtractedHash>,
) -> Reconciliation {
    let outcome = classify(stored, extracted);

    let Some(hash) = extracted else {
        info!("Failed to retrieve SHA-256 hash; stored hash left untouched.");
        return Reconciliation {
            outcome,
            written: false,
        };
    };

    info!("SHA-256 hash from network tab: {}", hash);
    match outcome {
        RunOutcome::Match => info!("Hash in file and hash retrieved match."),
        RunOutcome::Mismatch => info!(
            "Hash in file and hash retrieved DO NOT match (stored: {}).",
            stored.unwrap_or_default()
        ),
        RunOutcome::NoPriorValue => info!(
            "No existing hash found in the {} file.",
            store.path().display()
        ),
        RunOutcome::ExtractionFailed => {}
    }

    let written = match store.save(hash).await {
        Ok(()) => {
            info!("SHA-256 hash written to {} file.", store.path().display());
            true
        }
        Err(e) => {
            error!("Failed to write SHA-256 hash: {}", e);
            false
        }
    };

    Reconciliation { outcome, written }
}
