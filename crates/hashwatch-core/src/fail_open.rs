//! Fail-open utilities for diagnostic side effects
//!
//! Screenshots and log housekeeping must never change the outcome of a run.
//! Wrap them here so failures are logged and dropped.
//!
//! DO NOT use fail-open for:
//! - Interaction steps (an unmet wait ends the run)
//! - Hash extraction
//! - Stored-hash writes (the outcome reports whether the write happened)

use std::future::Future;
use tracing::warn;

use crate::Result;

/// Execute an operation whose failure should only be logged
///
/// Logs the error via `tracing::warn!` on failure and returns `None`.
///
/// # Usage
///
/// ```no_run
/// use hashwatch_core::fail_open::fail_open;
/// use hashwatch_core::Result;
///
/// async fn save_snapshot() -> Result<()> {
///     Ok(())
/// }
///
/// async fn example() {
///     let saved = fail_open("screenshot", || save_snapshot()).await;
///     // saved is None if save_snapshot() failed
/// }
/// ```
pub async fn fail_open<F, Fut, T>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match f().await {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}

/// Synchronous counterpart of [`fail_open`]
pub fn fail_open_sync<F, T, E>(operation_name: &str, f: F) -> Option<T>
where
    F: FnOnce() -> std::result::Result<T, E>,
    E: std::fmt::Display,
{
    match f() {
        Ok(val) => Some(val),
        Err(e) => {
            warn!("{} failed (fail-open): {}", operation_name, e);
            None
        }
    }
}
