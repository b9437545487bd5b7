//! Hash extraction from captured network traffic
//!
//! The search page fires a GraphQL GET whose query string carries
//! `extensions={"persistedQuery":{"sha256Hash":"<hash>",...}}`, percent-encoded.
//! Extraction filters the captured entries down to that request, decodes the
//! URL and pulls the hash out with a regex.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::{ExtractedHash, HashwatchError, MarkerSet, NetworkEntry, Result};

static HASH_FIELD: OnceLock<Regex> = OnceLock::new();

fn hash_field_pattern() -> &'static Regex {
    HASH_FIELD.get_or_init(|| Regex::new(r#"sha256Hash":"([^"]+)"#).expect("hash field pattern is valid"))
}

/// Entries containing every marker, deduplicated.
///
/// The browser may report the same URL more than once; iteration order of the
/// returned set is unspecified.
pub fn candidate_urls<'a>(entries: &'a [NetworkEntry], markers: &MarkerSet) -> HashSet<&'a str> {
    entries
        .iter()
        .map(NetworkEntry::as_str)
        .filter(|url| markers.matches(url))
        .collect()
}

/// Reverse `%XX` percent-encoding.
///
/// Malformed escapes are kept as-is, `+` is left alone and invalid UTF-8 is
/// replaced lossily. Input without `%` comes back unchanged.
pub fn decode_url(input: &str) -> String {
    let mut out = Vec::with_capacity(input.len());
    let bytes = input.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' && i + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(high << 4 | low);
                i += 3;
                continue;
            }
        }
        out.push(b);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Value of the first `sha256Hash":"…"` field in an already-decoded URL
pub fn parse_hash_field(decoded: &str) -> Option<ExtractedHash> {
    hash_field_pattern()
        .captures(decoded)
        .and_then(|caps| caps.get(1))
        .map(|m| ExtractedHash::new(m.as_str()))
}

/// Find the persisted-query request among `entries` and extract its hash.
///
/// When several candidates qualify, whichever the set yields first with a
/// parseable hash wins; any of them is an acceptable answer.
pub fn extract_hash(entries: &[NetworkEntry], markers: &MarkerSet) -> Result<ExtractedHash> {
    let candidates = candidate_urls(entries, markers);
    debug!(
        "{} of {} network entries matched the marker set",
        candidates.len(),
        entries.len()
    );

    if candidates.is_empty() {
        return Err(HashwatchError::NoMatchingRequest(entries.len()));
    }

    for url in &candidates {
        info!("Network request URL containing SHA-256 hash (ENCODED): {}", url);
        let decoded = decode_url(url);
        info!("Network request URL containing SHA-256 hash (DECODED): {}", decoded);

        if let Some(hash) = parse_hash_field(&decoded) {
            if !hash.is_sha256_hex() {
                warn!("Extracted hash is not a 64-character hex digest: {}", hash);
            }
            info!("Extracted SHA-256 hash: {}", hash);
            return Ok(hash);
        }
    }

    Err(HashwatchError::HashFieldMissing(candidates.len()))
}
