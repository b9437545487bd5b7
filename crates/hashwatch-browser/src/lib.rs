//! Browser session control and traffic capture for hashwatch
//!
//! The rest of the workspace talks to the browser only through the
//! [`BrowserDriver`] trait, so the interaction sequence can run against a real
//! Chrome (via the Chrome DevTools Protocol) or a scripted double.
//!
//! # Example
//!
//! ```no_run
//! use hashwatch_browser::{BrowserDriver, ChromeLauncher, LaunchSettings, SessionProvider};
//! use hashwatch_browser::traffic::capture_network_entries;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let launcher = ChromeLauncher::new(LaunchSettings::default());
//!     let mut session = launcher.launch().await?;
//!
//!     session.navigate("https://www.imdb.com/search/title/").await?;
//!     let entries = capture_network_entries(session.as_mut()).await?;
//!     println!("{} network entries", entries.len());
//!
//!     session.quit().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`driver`]: the session traits, locators and wait conditions
//! - [`browser`]: headless Chrome implementation
//! - [`mock`]: deterministic session double for tests
//! - [`traffic`]: performance-timeline capture
//! - [`screenshot`]: PNG snapshots for diagnostics
//! - [`error`]: error types for browser operations

pub mod browser;
pub mod driver;
pub mod error;
pub mod mock;
pub mod screenshot;
pub mod traffic;

// Re-export commonly used types
pub use browser::{ChromeLauncher, ChromeSession, LaunchSettings};
pub use driver::{BrowserDriver, Locator, SessionProvider, WaitCondition};
pub use error::{BrowserError, Result};
pub use mock::{ScriptedProvider, ScriptedSession};
pub use screenshot::save_screenshot;
pub use traffic::capture_network_entries;
