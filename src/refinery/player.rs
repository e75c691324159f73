// * Watch-page metadata extraction
// * Extraction chain: embedded player response -> meta[itemprop] fallback

use scraper::{Html, Selector};
use serde::Deserialize;
use std::sync::LazyLock;

use crate::refinery::duration::parse_iso_duration;

// * Precompiled selectors for the fallback parse
static SELECTOR_META_DURATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[itemprop="duration"]"#).unwrap());
static SELECTOR_TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());

// * Evaluated against the watch page: pulls duration and title out of the
// * embedded player response without throwing when it is absent.
pub const PLAYER_PROBE_JS: &str = r#"
(() => {
    try {
        const d = (window.ytInitialPlayerResponse || {}).videoDetails || {};
        return {
            duration: Number(d.lengthSeconds || 0) || 0,
            title: String(d.title || document.title || '')
        };
    } catch (e) {
        return { duration: 0, title: '' };
    }
})()
"#;

/// Structured result of the primary player-metadata probe.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlayerProbe {
    duration: f64,
    pub title: String,
}

impl PlayerProbe {
    /// Parses the probe payload returned by [`PLAYER_PROBE_JS`].
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Duration in whole seconds, zero when the probe found nothing usable.
    pub fn duration_seconds(&self) -> u64 {
        if self.duration.is_finite() && self.duration > 0.0 {
            self.duration as u64
        } else {
            0
        }
    }
}

/// Fallback metadata scraped from the rendered watch-page HTML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WatchPageFallback {
    pub duration_seconds: Option<u64>,
    pub title: Option<String>,
}

/// Parses the structured duration annotation and document title out of a
/// rendered watch page. Used only when the primary probe yields no duration.
pub fn parse_watch_page(html: &str) -> WatchPageFallback {
    let doc = Html::parse_document(html);

    let duration_seconds = doc
        .select(&SELECTOR_META_DURATION)
        .find_map(|el| el.value().attr("content"))
        .and_then(parse_iso_duration);

    let title = doc
        .select(&SELECTOR_TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty());

    WatchPageFallback {
        duration_seconds,
        title,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_probe_from_value() {
        let probe = PlayerProbe::from_value(json!({"duration": 42.0, "title": "Clip"}));
        assert_eq!(probe.duration_seconds(), 42);
        assert_eq!(probe.title, "Clip");
    }

    #[test]
    fn test_probe_missing_fields_defaults() {
        let probe = PlayerProbe::from_value(json!({}));
        assert_eq!(probe.duration_seconds(), 0);
        assert!(probe.title.is_empty());
    }

    #[test]
    fn test_probe_malformed_payload_defaults() {
        let probe = PlayerProbe::from_value(json!("not an object"));
        assert_eq!(probe.duration_seconds(), 0);
    }

    #[test]
    fn test_probe_negative_duration_clamped() {
        let probe = PlayerProbe::from_value(json!({"duration": -5.0, "title": ""}));
        assert_eq!(probe.duration_seconds(), 0);
    }

    #[test]
    fn test_watch_page_fallback() {
        let html = r#"
            <html>
            <head>
                <title>Some Short - Site</title>
                <meta itemprop="duration" content="PT45S">
            </head>
            <body></body>
            </html>
        "#;

        let fallback = parse_watch_page(html);
        assert_eq!(fallback.duration_seconds, Some(45));
        assert_eq!(fallback.title.as_deref(), Some("Some Short - Site"));
    }

    #[test]
    fn test_watch_page_without_annotation() {
        let fallback = parse_watch_page("<html><head></head><body></body></html>");
        assert_eq!(fallback.duration_seconds, None);
        assert_eq!(fallback.title, None);
    }

    #[test]
    fn test_watch_page_unparseable_annotation() {
        let html = r#"<html><head><meta itemprop="duration" content="later"></head></html>"#;
        assert_eq!(parse_watch_page(html).duration_seconds, None);
    }

    #[test]
    fn test_probe_js_guards_against_missing_player() {
        // * The probe must not throw on pages without the player object
        assert!(PLAYER_PROBE_JS.contains("ytInitialPlayerResponse"));
        assert!(PLAYER_PROBE_JS.contains("catch"));
    }
}
