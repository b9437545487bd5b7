//! Core type definitions for hashwatch

use serde::{Deserialize, Serialize};

/// Marker for IMDb's persisted-query GraphQL requests
pub const PERSISTED_QUERY_MARKER: &str = "persistedQuery";

/// Marker for the hash field inside the `extensions` query parameter
pub const HASH_FIELD_MARKER: &str = "sha256Hash";

/// Host that serves cached GraphQL queries
pub const GRAPHQL_CACHE_HOST: &str = "caching.graphql.imdb.com";

/// A single URL (or resource-type tag) from the browser's performance timeline
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkEntry(String);

impl NetworkEntry {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for NetworkEntry {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NetworkEntry {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for NetworkEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Substrings that must all appear, verbatim and case-sensitive, in a
/// candidate request URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerSet {
    markers: Vec<String>,
}

impl MarkerSet {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    /// The persisted-query signature for a search on `keyword`
    pub fn for_keyword(keyword: &str) -> Self {
        Self::new(vec![
            PERSISTED_QUERY_MARKER.to_string(),
            HASH_FIELD_MARKER.to_string(),
            GRAPHQL_CACHE_HOST.to_string(),
            keyword.to_string(),
        ])
    }

    /// True if every marker occurs in `url`
    pub fn matches(&self, url: &str) -> bool {
        self.markers.iter().all(|m| url.contains(m.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Hash value parsed out of a candidate request URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedHash(String);

impl ExtractedHash {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// True if the value is 64 hex characters (a 32-byte SHA-256 digest)
    pub fn is_sha256_hex(&self) -> bool {
        matches!(hex::decode(&self.0), Ok(bytes) if bytes.len() == 32)
    }
}

impl std::fmt::Display for ExtractedHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of comparing a fresh extraction with the stored hash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Stored and extracted hashes are identical
    Match,
    /// Stored hash differs from the extracted one
    Mismatch,
    /// A hash was extracted but nothing was stored before
    NoPriorValue,
    /// No hash was extracted this run
    ExtractionFailed,
}

impl RunOutcome {
    /// Whether this outcome writes the extracted hash to the store
    pub fn writes_hash(&self) -> bool {
        !matches!(self, Self::ExtractionFailed)
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::NoPriorValue => write!(f, "no_prior_value"),
            Self::ExtractionFailed => write!(f, "extraction_failed"),
        }
    }
}

/// Everything a finished run knows about itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// Hash extracted this run
    pub hash: Option<ExtractedHash>,
    /// Hash read from the store before the run
    pub previous: Option<String>,
    /// Whether the store was successfully overwritten
    pub written: bool,
    /// Why no hash was extracted, if it wasn't
    pub failure: Option<String>,
}

impl RunReport {
    /// Definitive one-line statement of what the run found
    pub fn summary(&self) -> String {
        match (&self.hash, self.outcome) {
            (Some(hash), RunOutcome::Match) => {
                format!("Retrieved SHA-256 hash {}; it matches the stored hash", hash)
            }
            (Some(hash), RunOutcome::Mismatch) => format!(
                "Retrieved SHA-256 hash {}; it DOES NOT match the stored hash {}",
                hash,
                self.previous.as_deref().unwrap_or("")
            ),
            (Some(hash), _) => {
                format!("Retrieved SHA-256 hash {}; no stored hash to compare with", hash)
            }
            (None, _) => match &self.failure {
                Some(reason) => format!("Failed to retrieve SHA-256 hash: {}", reason),
                None => "Failed to retrieve SHA-256 hash".to_string(),
            },
        }
    }
}
