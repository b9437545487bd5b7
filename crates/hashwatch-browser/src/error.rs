//! Browser error types - re-exports the unified HashwatchError from hashwatch-core
//!
//! Browser code reports through two variants:
//! - ElementNotFound(String) - a wait ran out before the element was ready
//! - Session(String) - launch, navigation, CDP, script or screenshot failures
//!
//! Messages should name the locator or URL involved.

pub use hashwatch_core::{HashwatchError, Result};

pub type BrowserError = HashwatchError;
