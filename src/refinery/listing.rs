// * Listing-hit parsing: raw anchors observed on the listing surface are
// * reduced to opaque video identifiers, and canonical URLs are derived
// * deterministically from those identifiers.

use serde::Deserialize;
use url::Url;

// * Base used to resolve relative listing hrefs before query inspection
const RESOLVE_BASE: &str = "https://www.youtube.com";

/// A single raw observation from a listing extraction rule.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingHit {
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub title: String,
}

/// Extracts the video identifier from a listing href.
///
/// Handles both `/shorts/<id>` path segments and `watch?v=<id>` query
/// forms; anything else is not a candidate.
pub fn video_id_from_href(href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if let Some(pos) = href.rfind("/shorts/") {
        let tail = &href[pos + "/shorts/".len()..];
        let id: String = tail
            .chars()
            .take_while(|c| *c != '?' && *c != '#' && *c != '/')
            .collect();
        return if id.is_empty() { None } else { Some(id) };
    }

    if href.contains("watch?v=") {
        let base = Url::parse(RESOLVE_BASE).ok()?;
        let url = base.join(href).ok()?;
        return url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty());
    }

    None
}

/// Canonical watch URL for an identifier.
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}

/// Deterministic thumbnail URL for an identifier.
pub fn thumbnail_url(id: &str) -> String {
    format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg")
}
