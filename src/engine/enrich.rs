// * Detail Enricher
// * Sequential per-identifier metadata fetch against the shared budget.
// * Per-item failures are absorbed here; the batch itself never fails.

use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::engine::budget::RunBudget;
use crate::engine::discovery::Candidate;
use crate::refinery::listing::{thumbnail_url, watch_url};
use crate::refinery::player::{parse_watch_page, PlayerProbe, PLAYER_PROBE_JS};
use crate::surface::RenderSurface;

/// One fully enriched result entry. Immutable once constructed; thumbnail
/// and watch URL are derived deterministically from the identifier.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EnrichedVideo {
    pub id: String,
    pub title: String,
    pub thumbnail: String,
    pub url: String,
    pub duration: u64,
}

impl EnrichedVideo {
    pub fn new(id: String, title: String, duration: u64) -> Self {
        Self {
            thumbnail: thumbnail_url(&id),
            url: watch_url(&id),
            id,
            title,
            duration,
        }
    }
}

/// Enriches candidates in discovery order, stopping early once the budget's
/// phase-2 safety margin is reached. Items without a usable duration, or
/// longer than `ceiling_secs`, are discarded.
pub async fn enrich(
    surface: &dyn RenderSurface,
    budget: &RunBudget,
    candidates: &[Candidate],
    nav_timeout: Duration,
    ceiling_secs: u64,
) -> Vec<EnrichedVideo> {
    let mut results = Vec::new();

    for (idx, candidate) in candidates.iter().enumerate() {
        if budget.enrichment_expired() {
            info!(
                enriched = results.len(),
                pending = candidates.len() - idx,
                "Budget safety margin reached, returning partial results"
            );
            break;
        }

        // * Navigation failures are swallowed: extraction runs against
        // * whatever state the surface reached
        if let Err(e) = surface.goto(&watch_url(&candidate.id), nav_timeout).await {
            debug!(id = %candidate.id, error = %e, "Detail navigation incomplete");
        }

        let mut duration = 0u64;
        let mut title = candidate.title.clone();

        match surface.evaluate(PLAYER_PROBE_JS).await {
            Ok(value) => {
                let probe = PlayerProbe::from_value(value);
                duration = probe.duration_seconds();
                if !probe.title.is_empty() {
                    title = probe.title;
                }
            }
            Err(e) => debug!(id = %candidate.id, error = %e, "Player probe failed"),
        }

        // * Fallback: structured duration annotation in the rendered markup
        if duration == 0 {
            match surface.content().await {
                Ok(html) => {
                    let fallback = parse_watch_page(&html);
                    if let Some(secs) = fallback.duration_seconds {
                        duration = secs;
                    }
                    if title.is_empty() {
                        if let Some(t) = fallback.title {
                            title = t;
                        }
                    }
                }
                Err(e) => debug!(id = %candidate.id, error = %e, "Fallback parse unavailable"),
            }
        }

        if duration == 0 || duration > ceiling_secs {
            debug!(id = %candidate.id, duration, "Discarded by duration filter");
            continue;
        }

        results.push(EnrichedVideo::new(candidate.id.clone(), title, duration));
    }

    info!(count = results.len(), "Enrichment phase finished");
    results
}
