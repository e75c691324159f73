// * Chromium-backed rendering surface via ChromiumOxide
// * One browser process per provisioned session; one page alive at a time.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetBlockedUrLsParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::ops::telemetry;
use crate::surface::launcher::{
    LaunchProfile, SERVERLESS_ARGS, USER_AGENT, VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use crate::surface::{RenderSession, RenderSurface, SurfaceError, SurfaceProvider};

// * Heavy resources aborted on every scrape page; none of them contribute
// * identifiers or metadata
const BLOCKED_URL_PATTERNS: &[&str] = &[
    "*.png", "*.jpg", "*.jpeg", "*.gif", "*.webp", "*.svg", "*.ico", "*.css", "*.woff",
    "*.woff2", "*.ttf", "*.mp4", "*.webm", "*.m4s",
];

// * Scroll-equivalent action advancing the listing render state
const SCROLL_JS: &str = "window.scrollBy(0, window.innerHeight)";

/// Launches one Chromium process per scrape request.
pub struct ChromiumProvider {
    profile: LaunchProfile,
}

impl ChromiumProvider {
    pub fn new(profile: LaunchProfile) -> Self {
        Self { profile }
    }

    fn browser_config(&self) -> Result<BrowserConfig, SurfaceError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .arg(format!("--user-agent={USER_AGENT}"));

        for arg in SERVERLESS_ARGS {
            builder = builder.arg(*arg);
        }

        if let Some(exe) = &self.profile.executable {
            builder = builder.chrome_executable(exe);
        }

        builder
            .build()
            .map_err(|e| SurfaceError::Launch(e.to_string()))
    }
}

#[async_trait]
impl SurfaceProvider for ChromiumProvider {
    async fn provision(&self) -> Result<Box<dyn RenderSession>, SurfaceError> {
        let config = self.browser_config()?;

        let (browser, mut handler) = match Browser::launch(config).await {
            Ok(pair) => pair,
            Err(e) => {
                telemetry::record_browser_launch("error");
                return Err(SurfaceError::Launch(e.to_string()));
            }
        };

        // * The handler drives the CDP connection and must be polled for
        // * the browser to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        telemetry::record_browser_launch("ok");
        info!("Chromium session provisioned");

        Ok(Box::new(BrowserSession {
            browser: Some(browser),
            handler_task,
        }))
    }
}

/// One live browser process plus its CDP handler task.
pub struct BrowserSession {
    browser: Option<Browser>,
    handler_task: tokio::task::JoinHandle<()>,
}

#[async_trait]
impl RenderSession for BrowserSession {
    async fn open_surface(&self) -> Result<Box<dyn RenderSurface>, SurfaceError> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| SurfaceError::OpenPage("session already released".into()))?;

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| SurfaceError::OpenPage(e.to_string()))?;

        // * One awaited command replaces per-request interception callbacks
        let patterns: Vec<String> = BLOCKED_URL_PATTERNS.iter().map(|p| p.to_string()).collect();
        if let Err(e) = page.execute(SetBlockedUrLsParams::new(patterns)).await {
            warn!(error = %e, "Resource blocking unavailable, continuing without it");
        }

        Ok(Box::new(ChromiumSurface { page }))
    }

    async fn close(mut self: Box<Self>) {
        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!(error = %e, "Browser close reported an error");
            }
        }
        self.handler_task.abort();
        debug!("Chromium session released");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // * Best effort - can't await in drop
        self.handler_task.abort();
    }
}

struct ChromiumSurface {
    page: Page,
}

#[async_trait]
impl RenderSurface for ChromiumSurface {
    async fn goto(&self, url: &str, timeout: Duration) -> Result<(), SurfaceError> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SurfaceError::Navigation(e.to_string())),
            Err(_) => Err(SurfaceError::Timeout(timeout.as_millis() as u64)),
        }
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value, SurfaceError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| SurfaceError::Evaluation(e.to_string()))?;

        result
            .into_value::<serde_json::Value>()
            .map_err(|e| SurfaceError::Evaluation(e.to_string()))
    }

    async fn content(&self) -> Result<String, SurfaceError> {
        self.page
            .content()
            .await
            .map_err(|e| SurfaceError::Content(e.to_string()))
    }

    async fn scroll(&self) -> Result<(), SurfaceError> {
        self.page
            .evaluate(SCROLL_JS)
            .await
            .map_err(|e| SurfaceError::Evaluation(e.to_string()))?;
        Ok(())
    }

    async fn close(self: Box<Self>) {
        let this = *self;
        if let Err(e) = this.page.close().await {
            debug!(error = %e, "Page close reported an error");
        }
    }
}
