//! Integration tests for the end-to-end run
//!
//! Drives the full pipeline with a scripted browser session:
//! - Outcome table against a real stored-hash file
//! - Stored hash untouched when extraction fails
//! - Exactly one session release per run, whatever stage fails
//! - Diagnostic screenshots via the screenshot hook

use hashwatch_browser::{Locator, ScriptedProvider, ScriptedSession};
use hashwatch_core::{HashStore, RunOutcome};
use hashwatch_orchestrator::{InteractionScript, Pipeline, ScreenshotHook, Selectors};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const HASH: &str = "9fc7c8867ff66c1e1aa0f39d0fd4869c64db97cddda14fea1c048ca4b568f06a";
const OLD_HASH: &str = "e2b7e3c1e9f3c2f0c6c5a8f0b1d2e3f4a5b6c7d8e9f0a1b2c3d4e5f6a7b8c9d0";

/// Helper to build the GraphQL request the search page sends
fn graphql_url(keyword: &str, hash: &str) -> String {
    format!(
        "https://caching.graphql.imdb.com/?operationName=AdvancedTitleSearch\
         &variables=%7B%22titleTextConstraint%22%3A%7B%22searchTerm%22%3A%22{}%22%7D%2C%22titleTypeConstraint%22%3A%7B%22anyTitleTypeIds%22%3A%5B%22movie%22%5D%7D%7D\
         &extensions=%7B%22persistedQuery%22%3A%7B%22sha256Hash%22%3A%22{}%22%2C%22version%22%3A1%7D%7D",
        keyword, hash
    )
}

/// Helper for a typical page load's traffic, with the target request in the middle
fn traffic_with(hash: &str) -> Vec<String> {
    vec![
        "https://www.imdb.com/search/title/".to_string(),
        "https://m.media-amazon.com/images/G/01/imdb/images-ANDW73HA/favicon.ico".to_string(),
        graphql_url("Shrek", hash),
        "script".to_string(),
        graphql_url("Shrek", hash),
    ]
}

fn script() -> InteractionScript {
    InteractionScript::new("https://www.imdb.com/search/title/", "Shrek")
        .with_timings(Duration::from_secs(20), Duration::ZERO)
}

/// Helper to create a hash store in a temp dir, optionally pre-seeded
fn create_store(dir: &TempDir, content: Option<&str>) -> (HashStore, PathBuf) {
    let path = dir.path().join("HASH");
    if let Some(content) = content {
        std::fs::write(&path, content).expect("Failed to seed HASH file");
    }
    (HashStore::new(&path), path)
}

#[tokio::test]
async fn test_first_run_stores_hash() {
    let dir = TempDir::new().unwrap();
    let (store, path) = create_store(&dir, None);
    let provider = ScriptedProvider::new(ScriptedSession::new().with_entries(traffic_with(HASH)));

    let report = Pipeline::new(provider.clone(), script(), store).run().await;

    assert_eq!(report.outcome, RunOutcome::NoPriorValue);
    assert_eq!(report.hash.as_ref().map(|h| h.as_str()), Some(HASH));
    assert!(report.written);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), HASH);
    assert_eq!(provider.session().release_count(), 1);
}

#[tokio::test]
async fn test_unchanged_hash_is_match() {
    let dir = TempDir::new().unwrap();
    let (store, path) = create_store(&dir, Some(HASH));
    let provider = ScriptedProvider::new(ScriptedSession::new().with_entries(traffic_with(HASH)));

    let report = Pipeline::new(provider, script(), store).run().await;

    assert_eq!(report.outcome, RunOutcome::Match);
    assert_eq!(report.previous.as_deref(), Some(HASH));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), HASH);
    assert!(report.summary().contains("matches the stored hash"));
}

#[tokio::test]
async fn test_changed_hash_is_mismatch_and_replaced() {
    let dir = TempDir::new().unwrap();
    let (store, path) = create_store(&dir, Some(&format!("{}\n", OLD_HASH)));
    let provider = ScriptedProvider::new(ScriptedSession::new().with_entries(traffic_with(HASH)));

    let report = Pipeline::new(provider, script(), store).run().await;

    assert_eq!(report.outcome, RunOutcome::Mismatch);
    assert_eq!(report.previous.as_deref(), Some(OLD_HASH));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), HASH);
}

#[tokio::test]
async fn test_no_matching_request_leaves_file_unchanged() {
    let dir = TempDir::new().unwrap();
    let seeded = format!("{}\n", OLD_HASH);
    let (store, path) = create_store(&dir, Some(&seeded));
    // right request, wrong keyword: three of four markers
    let session = ScriptedSession::new().with_entries(vec![
        "https://www.imdb.com/search/title/".to_string(),
        graphql_url("Alien", HASH),
    ]);
    let provider = ScriptedProvider::new(session);

    let report = Pipeline::new(provider.clone(), script(), store).run().await;

    assert_eq!(report.outcome, RunOutcome::ExtractionFailed);
    assert!(report.hash.is_none());
    assert!(!report.written);
    assert!(report.failure.as_deref().unwrap().contains("No network request matched"));
    assert_eq!(std::fs::read(&path).unwrap(), seeded.as_bytes());
    assert_eq!(provider.session().release_count(), 1);
}

#[tokio::test]
async fn test_empty_traffic_is_extraction_failure() {
    let dir = TempDir::new().unwrap();
    let (store, path) = create_store(&dir, None);
    let provider = ScriptedProvider::new(ScriptedSession::new());

    let report = Pipeline::new(provider, script(), store).run().await;

    assert_eq!(report.outcome, RunOutcome::ExtractionFailed);
    assert!(!path.exists());
    assert!(report.summary().starts_with("Failed to retrieve SHA-256 hash"));
}

#[tokio::test]
async fn test_missing_results_element_releases_session_once() {
    let dir = TempDir::new().unwrap();
    let (store, path) = create_store(&dir, Some(OLD_HASH));
    let session = ScriptedSession::new()
        .with_entries(traffic_with(HASH))
        .with_missing_element(Selectors::default().result_title);
    let provider = ScriptedProvider::new(session);

    let report = Pipeline::new(provider.clone(), script(), store).run().await;

    assert_eq!(report.outcome, RunOutcome::ExtractionFailed);
    assert!(report.failure.as_deref().unwrap().contains("Element not found"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), OLD_HASH);
    assert_eq!(provider.session().release_count(), 1);
    // traffic is never captured after a failed interaction
    assert!(!provider.session().actions().contains(&"script".to_string()));
}

#[tokio::test]
async fn test_session_failure_during_capture_releases_once() {
    let dir = TempDir::new().unwrap();
    let (store, _) = create_store(&dir, None);
    let session = ScriptedSession::new().with_script_failure("Target closed");
    let provider = ScriptedProvider::new(session);

    let report = Pipeline::new(provider.clone(), script(), store).run().await;

    assert_eq!(report.outcome, RunOutcome::ExtractionFailed);
    assert!(report.failure.as_deref().unwrap().contains("Target closed"));
    assert_eq!(provider.session().release_count(), 1);
    assert_eq!(provider.session().actions().last().map(String::as_str), Some("quit"));
}

#[tokio::test]
async fn test_release_happens_once_for_every_failing_stage() {
    let sel = Selectors::default();
    let cases: Vec<(&str, ScriptedSession)> = vec![
        ("success", ScriptedSession::new().with_entries(traffic_with(HASH))),
        (
            "navigation",
            ScriptedSession::new().with_navigation_failure("net::ERR_CONNECTION_RESET"),
        ),
        ("expand", ScriptedSession::new().with_missing_element(sel.expand_all.clone())),
        ("title", ScriptedSession::new().with_missing_element(sel.title_input.clone())),
        ("movie", ScriptedSession::new().with_missing_element(sel.movie_chip.clone())),
        ("results", ScriptedSession::new().with_missing_element(sel.result_title.clone())),
        ("script", ScriptedSession::new().with_script_failure("boom")),
        ("no match", ScriptedSession::new().with_entries(["img", "script"])),
        (
            "no field",
            ScriptedSession::new().with_entries([
                "https://caching.graphql.imdb.com/?persistedQuery&sha256Hash=x&q=Shrek",
            ]),
        ),
    ];

    for (name, session) in cases {
        let dir = TempDir::new().unwrap();
        let (store, _) = create_store(&dir, None);
        let provider = ScriptedProvider::new(session);

        Pipeline::new(provider.clone(), script(), store).run().await;

        assert_eq!(provider.launch_count(), 1, "case {}", name);
        assert_eq!(provider.session().release_count(), 1, "case {}", name);
    }
}

#[tokio::test]
async fn test_launch_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let (store, path) = create_store(&dir, Some(OLD_HASH));
    let provider = ScriptedProvider::failing("chrome not found");

    let report = Pipeline::new(provider.clone(), script(), store).run().await;

    assert_eq!(report.outcome, RunOutcome::ExtractionFailed);
    assert!(report.failure.as_deref().unwrap().contains("chrome not found"));
    assert_eq!(provider.session().release_count(), 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), OLD_HASH);
}

#[tokio::test]
async fn test_screenshots_written_after_each_step() {
    let dir = TempDir::new().unwrap();
    let shots = TempDir::new().unwrap();
    let (store, _) = create_store(&dir, None);
    let provider = ScriptedProvider::new(ScriptedSession::new().with_entries(traffic_with(HASH)));

    let report = Pipeline::new(provider, script(), store)
        .with_observer(Box::new(ScreenshotHook::new(shots.path())))
        .run()
        .await;

    assert_eq!(report.outcome, RunOutcome::NoPriorValue);
    for name in [
        "01_current_url.png",
        "02_after_expand_all_click.png",
        "03_after_sending_keyword.png",
        "04_after_movie_button_click.png",
        "05_after_search_results_found.png",
    ] {
        assert!(shots.path().join(name).exists(), "missing {}", name);
    }
}

#[tokio::test]
async fn test_screenshot_failures_do_not_change_outcome() {
    let dir = TempDir::new().unwrap();
    let (store, _) = create_store(&dir, None);
    let session = ScriptedSession::new()
        .with_entries(traffic_with(HASH))
        .with_screenshot_failure("no surface");
    let provider = ScriptedProvider::new(session);

    let report = Pipeline::new(provider, script(), store)
        .with_observer(Box::new(ScreenshotHook::new(dir.path())))
        .run()
        .await;

    assert_eq!(report.outcome, RunOutcome::NoPriorValue);
    assert!(report.written);
}

#[tokio::test]
async fn test_custom_selectors_are_used() {
    let dir = TempDir::new().unwrap();
    let (store, _) = create_store(&dir, None);
    let selectors = Selectors {
        result_title: Locator::css("h3.result"),
        ..Selectors::default()
    };
    let session = ScriptedSession::new()
        .with_entries(traffic_with(HASH))
        .with_missing_element(Locator::css("h3.ipc-title__text"));
    let provider = ScriptedProvider::new(session);

    let report = Pipeline::new(provider, script().with_selectors(selectors), store)
        .run()
        .await;

    assert_eq!(report.outcome, RunOutcome::NoPriorValue);
}
