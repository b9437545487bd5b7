//! Performance-timeline capture
//!
//! Resource timing entries list every request the page issued since
//! navigation, including the GraphQL call the search triggers. The script
//! serializes the list itself because CDP returns arrays by reference.

use hashwatch_core::{HashwatchError, NetworkEntry};
use serde_json::Value;
use tracing::{debug, info};

use crate::driver::BrowserDriver;
use crate::error::Result;

/// Collects `entry.name || entry.initiatorType` for every performance entry
pub const PERFORMANCE_ENTRIES_SCRIPT: &str = r#"(() => {
    const urls = [];
    const entries = window.performance.getEntries() || [];
    for (const entry of entries) {
        const url = entry.name || entry.initiatorType;
        if (url) {
            urls.push(url);
        }
    }
    return JSON.stringify(urls);
})()"#;

/// Pull every network entry the browser observed for the current page load
pub async fn capture_network_entries(session: &mut dyn BrowserDriver) -> Result<Vec<NetworkEntry>> {
    let value = session.execute_script(PERFORMANCE_ENTRIES_SCRIPT).await?;
    let entries = parse_entries(value)?;

    if entries.is_empty() {
        info!("No performance entries found.");
    } else {
        debug!("Captured {} performance entries", entries.len());
    }

    Ok(entries)
}

/// Decode the script result: a JSON array, or a string holding one
pub fn parse_entries(value: Value) -> Result<Vec<NetworkEntry>> {
    let items = match value {
        Value::Null => return Ok(Vec::new()),
        Value::String(encoded) => serde_json::from_str::<Vec<Value>>(&encoded).map_err(|e| {
            HashwatchError::Session(format!("Unreadable performance entries: {}", e))
        })?,
        Value::Array(items) => items,
        other => {
            return Err(HashwatchError::Session(format!(
                "Unexpected performance entries payload: {}",
                other
            )))
        }
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(url) if !url.is_empty() => Some(NetworkEntry::from(url)),
            _ => None,
        })
        .collect())
}
