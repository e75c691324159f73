// * Rendering Surface abstraction
// * The pipeline depends only on this capability set: navigate with a
// * timeout, evaluate extraction rules, scroll, read rendered content,
// * close. Which browser product provides it is a launch-time decision.

pub mod chromium;
pub mod launcher;

pub use chromium::ChromiumProvider;
pub use launcher::LaunchProfile;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Page open failed: {0}")]
    OpenPage(String),

    #[error("Page navigation failed: {0}")]
    Navigation(String),

    #[error("Navigation timeout after {0}ms")]
    Timeout(u64),

    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    #[error("Content extraction failed: {0}")]
    Content(String),
}

/// One navigable, scriptable page.
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// Navigates to `url`, bounded by `timeout`. The caller decides whether
    /// a failure is fatal; most call sites swallow it and scan whatever
    /// state the surface reached.
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), SurfaceError>;

    /// Evaluates an extraction rule against the current render state and
    /// returns its JSON result.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, SurfaceError>;

    /// Rendered document markup for parse-side extraction.
    async fn content(&self) -> Result<String, SurfaceError>;

    /// Advances the render state by one viewport-height scroll.
    async fn scroll(&self) -> Result<(), SurfaceError>;

    /// Releases the page. Best effort; never errors.
    async fn close(self: Box<Self>);
}

/// One provisioned browser session, able to hand out surfaces.
#[async_trait]
pub trait RenderSession: Send + Sync {
    async fn open_surface(&self) -> Result<Box<dyn RenderSurface>, SurfaceError>;

    /// Releases the whole session (browser process included). Called on
    /// every request exit path, including the hard-timeout path.
    async fn close(self: Box<Self>);
}

/// Provisions one session per request. Resolved once at process start.
#[async_trait]
pub trait SurfaceProvider: Send + Sync {
    async fn provision(&self) -> Result<Box<dyn RenderSession>, SurfaceError>;
}
