//! Screenshot capture for run diagnostics

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::driver::BrowserDriver;
use crate::error::{BrowserError, Result};

/// Path of a named PNG snapshot inside `dir`
pub fn snapshot_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.png", name))
}

/// Capture the current page and write it to `path` as PNG
///
/// # Example
/// ```no_run
/// use hashwatch_browser::{BrowserDriver, ChromeSession, LaunchSettings};
/// use hashwatch_browser::screenshot::save_screenshot;
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() {
///     let mut session = ChromeSession::launch(&LaunchSettings::default()).unwrap();
///     session.navigate("https://www.imdb.com/search/title/").await.unwrap();
///     save_screenshot(&mut session, Path::new("./01_current_url.png")).await.unwrap();
/// }
/// ```
pub async fn save_screenshot(session: &mut dyn BrowserDriver, path: &Path) -> Result<PathBuf> {
    debug!("Capturing screenshot to {}", path.display());

    let data = session.capture_screenshot().await?;

    tokio::fs::write(path, &data).await.map_err(|e| {
        BrowserError::Session(format!(
            "Failed to write screenshot {}: {}",
            path.display(),
            e
        ))
    })?;

    info!("Screenshot stored: {} ({} bytes)", path.display(), data.len());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::ScriptedSession;
    use tempfile::TempDir;

    #[test]
    fn test_snapshot_path() {
        assert_eq!(
            snapshot_path(Path::new("shots"), "01_current_url"),
            PathBuf::from("shots/01_current_url.png")
        );
    }

    #[tokio::test]
    async fn test_save_writes_png() {
        let dir = TempDir::new().unwrap();
        let path = snapshot_path(dir.path(), "02_after_expand_all_click");
        let mut session = ScriptedSession::new();

        let saved = save_screenshot(&mut session, &path).await.unwrap();

        assert_eq!(saved, path);
        assert!(std::fs::read(&path).unwrap().starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn test_capture_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let mut session = ScriptedSession::new().with_screenshot_failure("no surface");

        let result = save_screenshot(&mut session, &snapshot_path(dir.path(), "x")).await;
        assert!(result.is_err());
    }
}
