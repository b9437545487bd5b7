//! # hashwatch-core
//!
//! Core types for hashwatch, a tool that watches the persisted-query hash
//! IMDb's search page sends to its GraphQL caching host.
//!
//! ## Pipeline pieces that live here
//!
//! - [`extract`]: filter captured network entries by marker substrings and
//!   parse the `sha256Hash` field out of the decoded URL
//! - [`store`]: the flat `HASH` file holding the previously seen value
//! - [`reconcile`]: compare a fresh extraction with the stored value and
//!   persist the fresh one
//!
//! Browser control lives in `hashwatch-browser`; the step sequence and the
//! end-to-end run live in `hashwatch-orchestrator`.

pub mod config;
mod error;
pub mod extract;
pub mod fail_open;
pub mod reconcile;
pub mod store;
mod types;

pub use config::HashwatchConfig;
pub use error::{HashwatchError, Result};
pub use extract::{candidate_urls, decode_url, extract_hash, parse_hash_field};
pub use reconcile::{classify, reconcile, Reconciliation};
pub use store::HashStore;
pub use types::*;
