// * Fallback duration parsing for the `meta[itemprop="duration"]` annotation
// * Strict PT(H)(M)(S) grammar: any unmatched component counts as zero

use regex::Regex;
use std::sync::LazyLock;

// * Anchored on both ends: partial matches inside a longer string are not
// * durations. "PT" with no components is valid and parses to zero.
static ISO_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?$").unwrap());

/// Parses an ISO-8601-style `PT(H)(M)(S)` duration string into seconds.
///
/// Returns `None` when the string does not match the grammar at all.
pub fn parse_iso_duration(raw: &str) -> Option<u64> {
    let caps = ISO_DURATION.captures(raw.trim())?;

    let component = |idx: usize| -> u64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .unwrap_or(0)
    };

    Some(component(1) * 3600 + component(2) * 60 + component(3))
}
