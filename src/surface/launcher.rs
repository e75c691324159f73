// * Browser bootstrap: executable discovery and launch flags.
// * Resolved once at process start; the pipeline never branches on the
// * deployment environment.

use std::path::PathBuf;
use tracing::info;

// * Environment override for the browser binary
const CHROME_PATH_ENV: &str = "CHROME_PATH";

// * Well-known executable locations probed in order
const KNOWN_EXECUTABLES: &[&str] = &[
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/opt/google/chrome/chrome",
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

// * Flags required to run headless Chromium inside a constrained
// * (containerized/serverless) execution environment
pub const SERVERLESS_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-extensions",
    "--disable-notifications",
];

// * Identity pinned on every scrape page
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// * Scrape page viewport
pub const VIEWPORT_WIDTH: u32 = 1200;
pub const VIEWPORT_HEIGHT: u32 = 800;

/// Launch-time browser configuration, resolved once at startup.
#[derive(Debug, Clone, Default)]
pub struct LaunchProfile {
    pub executable: Option<PathBuf>,
}

impl LaunchProfile {
    /// Resolves the browser executable: explicit env override first, then
    /// well-known locations, finally chromiumoxide's own detection.
    pub fn resolve() -> Self {
        if let Ok(path) = std::env::var(CHROME_PATH_ENV) {
            let candidate = PathBuf::from(&path);
            if candidate.is_file() {
                info!(path = %candidate.display(), "Using browser executable from {CHROME_PATH_ENV}");
                return Self {
                    executable: Some(candidate),
                };
            }
        }

        for location in KNOWN_EXECUTABLES {
            let candidate = PathBuf::from(location);
            if candidate.is_file() {
                info!(path = %candidate.display(), "Using detected browser executable");
                return Self {
                    executable: Some(candidate),
                };
            }
        }

        info!("No browser executable found in known locations, deferring to default detection");
        Self { executable: None }
    }
}
