// * Discovery Scanner
// * Scroll-driven identifier discovery against a rendered listing surface.
// * Each round: extract candidates, merge into the first-seen-ordered set,
// * advance the render state, settle. Never returns an error - on slice
// * expiry whatever was found so far is the result.

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::engine::budget::RunBudget;
use crate::refinery::listing::{video_id_from_href, ListingHit};
use crate::surface::RenderSurface;

// * Primary extraction rule: item containers on the listing grid. Titles
// * ride along when the container exposes one.
pub const LISTING_PRIMARY_JS: &str = r#"
(() => {
    const out = [];
    const containers = document.querySelectorAll(
        'ytd-rich-item-renderer, ytd-reel-item-renderer, ytm-shorts-lockup-view-model'
    );
    containers.forEach((item) => {
        const a = item.querySelector('a[href*="/shorts/"], a[href*="watch?v="]');
        if (!a) return;
        const titleEl = item.querySelector('#video-title, [title]');
        const title = (titleEl && (titleEl.textContent || titleEl.getAttribute('title'))) || '';
        out.push({ href: a.getAttribute('href') || '', title: title.trim() });
    });
    return out;
})()
"#;

// * Looser anchor-based rule used when the container rule yields nothing
pub const LISTING_FALLBACK_JS: &str = r#"
(() => {
    const out = [];
    document.querySelectorAll('a[href*="/shorts/"], a[href*="watch?v="]').forEach((a) => {
        const title = a.getAttribute('title') || a.getAttribute('aria-label') || '';
        out.push({ href: a.getAttribute('href') || '', title: title.trim() });
    });
    return out;
})()
"#;

/// An unconfirmed video identifier awaiting enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    pub title: String,
}

/// First-seen-ordered, identifier-deduplicated candidate accumulator.
#[derive(Debug, Default)]
pub struct CandidateSet {
    ordered: Vec<Candidate>,
    index: HashMap<String, usize>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Merges one round of listing hits. First-seen data wins, except that
    /// an empty stored title is upgraded by a later non-empty observation.
    /// Returns the number of newly discovered identifiers.
    pub fn merge(&mut self, hits: Vec<ListingHit>) -> usize {
        let mut added = 0;

        for hit in hits {
            let Some(id) = video_id_from_href(&hit.href) else {
                continue;
            };

            match self.index.get(&id) {
                Some(&pos) => {
                    let stored = &mut self.ordered[pos];
                    if stored.title.is_empty() && !hit.title.is_empty() {
                        stored.title = hit.title;
                    }
                }
                None => {
                    self.index.insert(id.clone(), self.ordered.len());
                    self.ordered.push(Candidate {
                        id,
                        title: hit.title,
                    });
                    added += 1;
                }
            }
        }

        added
    }

    /// Consumes the set, yielding at most `max` candidates in first-seen order.
    pub fn into_ordered(mut self, max: usize) -> Vec<Candidate> {
        self.ordered.truncate(max);
        self.ordered
    }
}

/// Runs the discovery loop until `max` unique identifiers are found or the
/// budget's discovery slice elapses.
pub async fn discover(
    surface: &dyn RenderSurface,
    budget: &RunBudget,
    max: usize,
    settle: Duration,
) -> Vec<Candidate> {
    let mut set = CandidateSet::default();
    let mut rounds = 0u32;

    while set.len() < max && !budget.discovery_expired() {
        rounds += 1;

        let hits = extract_round(surface).await;
        let added = set.merge(hits);
        debug!(round = rounds, added, total = set.len(), "Discovery round");

        if set.len() >= max || budget.discovery_expired() {
            break;
        }

        // * Advance the render state, then let new content settle in
        let _ = surface.scroll().await;
        tokio::time::sleep(settle).await;
    }

    info!(count = set.len(), rounds, "Discovery phase finished");
    set.into_ordered(max)
}

// * One extraction pass: container rule first, anchor rule when it comes
// * back empty. Rule failures count as zero hits for the round.
async fn extract_round(surface: &dyn RenderSurface) -> Vec<ListingHit> {
    let primary = evaluate_rule(surface, LISTING_PRIMARY_JS).await;
    if !primary.is_empty() {
        return primary;
    }
    evaluate_rule(surface, LISTING_FALLBACK_JS).await
}

async fn evaluate_rule(surface: &dyn RenderSurface, rule: &str) -> Vec<ListingHit> {
    match surface.evaluate(rule).await {
        Ok(value) => serde_json::from_value(value).unwrap_or_default(),
        Err(e) => {
            debug!(error = %e, "Extraction rule failed, treating as empty");
            Vec::new()
        }
    }
}
