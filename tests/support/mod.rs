// * Scripted rendering surfaces for integration tests. Each fake plays
// * back pre-arranged extraction results instead of driving a browser.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use shortscout::refinery::watch_url;
use shortscout::surface::{RenderSession, RenderSurface, SurfaceError, SurfaceProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Builds one extraction-round payload from `(href, title)` pairs.
pub fn hits(entries: &[(&str, &str)]) -> Value {
    Value::Array(
        entries
            .iter()
            .map(|(href, title)| json!({ "href": href, "title": title }))
            .collect(),
    )
}

/// Builds one player-probe payload.
pub fn probe(duration: u64, title: &str) -> Value {
    json!({ "duration": duration, "title": title })
}

/// Keys a detail payload by the canonical watch URL of `id`.
pub fn detail_entry(id: &str, payload: Value) -> (String, Value) {
    (watch_url(id), payload)
}

pub struct FakeSurface {
    round: AtomicUsize,
    primary_rounds: Vec<Value>,
    fallback_rounds: Vec<Value>,
    details: HashMap<String, Value>,
    content: HashMap<String, String>,
    last_goto: Mutex<Option<String>>,
    fail_goto: bool,
    goto_delay: Duration,
}

impl FakeSurface {
    fn empty() -> Self {
        Self {
            round: AtomicUsize::new(0),
            primary_rounds: Vec::new(),
            fallback_rounds: Vec::new(),
            details: HashMap::new(),
            content: HashMap::new(),
            last_goto: Mutex::new(None),
            fail_goto: false,
            goto_delay: Duration::ZERO,
        }
    }

    /// A listing surface answering the primary rule round by round.
    pub fn listing(primary_rounds: Vec<Value>) -> Self {
        Self {
            primary_rounds,
            ..Self::empty()
        }
    }

    /// A listing surface whose primary rule finds nothing.
    pub fn listing_fallback_only(fallback_rounds: Vec<Value>) -> Self {
        Self {
            fallback_rounds,
            ..Self::empty()
        }
    }

    /// A detail surface answering the player probe by watch URL.
    pub fn detail(entries: Vec<(String, Value)>) -> Self {
        Self {
            details: entries.into_iter().collect(),
            ..Self::empty()
        }
    }

    pub fn with_content(mut self, entries: Vec<(String, String)>) -> Self {
        self.content = entries.into_iter().collect();
        self
    }

    pub fn with_goto_failure(mut self) -> Self {
        self.fail_goto = true;
        self
    }

    pub fn with_goto_delay(mut self, delay: Duration) -> Self {
        self.goto_delay = delay;
        self
    }

    fn last_goto(&self) -> String {
        self.last_goto.lock().unwrap().clone().unwrap_or_default()
    }
}

#[async_trait]
impl RenderSurface for FakeSurface {
    async fn goto(&self, url: &str, _timeout: Duration) -> Result<(), SurfaceError> {
        *self.last_goto.lock().unwrap() = Some(url.to_string());
        if !self.goto_delay.is_zero() {
            tokio::time::sleep(self.goto_delay).await;
        }
        if self.fail_goto {
            return Err(SurfaceError::Navigation("connection refused".into()));
        }
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value, SurfaceError> {
        if script.contains("ytInitialPlayerResponse") {
            return Ok(self
                .details
                .get(&self.last_goto())
                .cloned()
                .unwrap_or_else(|| probe(0, "")));
        }

        let idx = self.round.load(Ordering::SeqCst);
        let rounds = if script.contains("ytd-rich-item-renderer") {
            &self.primary_rounds
        } else {
            &self.fallback_rounds
        };
        Ok(rounds.get(idx).cloned().unwrap_or_else(|| json!([])))
    }

    async fn content(&self) -> Result<String, SurfaceError> {
        Ok(self
            .content
            .get(&self.last_goto())
            .cloned()
            .unwrap_or_else(|| "<html></html>".to_string()))
    }

    async fn scroll(&self) -> Result<(), SurfaceError> {
        self.round.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(self: Box<Self>) {}
}

pub struct FakeSession {
    surfaces: Mutex<Vec<FakeSurface>>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicBool>,
    open_delay: Duration,
}

impl FakeSession {
    pub fn new(surfaces: Vec<FakeSurface>) -> Self {
        Self {
            surfaces: Mutex::new(surfaces),
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicBool::new(false)),
            open_delay: Duration::ZERO,
        }
    }

    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }
}

#[async_trait]
impl RenderSession for FakeSession {
    async fn open_surface(&self) -> Result<Box<dyn RenderSurface>, SurfaceError> {
        if !self.open_delay.is_zero() {
            tokio::time::sleep(self.open_delay).await;
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        let mut surfaces = self.surfaces.lock().unwrap();
        if surfaces.is_empty() {
            return Err(SurfaceError::OpenPage("no surface scripted".into()));
        }
        Ok(Box::new(surfaces.remove(0)))
    }

    async fn close(self: Box<Self>) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

pub struct FakeProvider {
    sessions: Mutex<Vec<FakeSession>>,
    fail_launch: bool,
}

impl FakeProvider {
    pub fn new(sessions: Vec<FakeSession>) -> Self {
        Self {
            sessions: Mutex::new(sessions),
            fail_launch: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sessions: Mutex::new(Vec::new()),
            fail_launch: true,
        }
    }
}

#[async_trait]
impl SurfaceProvider for FakeProvider {
    async fn provision(&self) -> Result<Box<dyn RenderSession>, SurfaceError> {
        if self.fail_launch {
            return Err(SurfaceError::Launch("browser executable not found".into()));
        }
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.is_empty() {
            return Err(SurfaceError::Launch("no session scripted".into()));
        }
        Ok(Box::new(sessions.remove(0)))
    }
}
