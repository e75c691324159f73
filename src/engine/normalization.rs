use url::Url;

// * Normalizes a user-supplied channel URL into the short-form listing URL
// * the discovery phase navigates to.
// *
// * Logic:
// * 1. Trim and prefix "https://" when no scheme is given.
// * 2. Parse; anything unparseable is rejected.
// * 3. Map to the "/shorts" listing path unless already pointing at one.
pub fn listing_url(channel_url: &str) -> Option<String> {
    let trimmed = channel_url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&with_scheme).ok()?;
    url.host_str()?;

    if is_shorts_path(url.path()) {
        return Some(url.to_string());
    }

    let base = url.to_string();
    Some(format!("{}/shorts", base.trim_end_matches('/')))
}

// * A path already targets the listing when it ends in "/shorts" or
// * contains a "/shorts/" segment.
fn is_shorts_path(path: &str) -> bool {
    path.ends_with("/shorts") || path.contains("/shorts/")
}
