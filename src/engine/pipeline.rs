// * Pipeline orchestration: discovery fully completes (or times out)
// * before enrichment begins; one surface is alive at a time.

use std::time::Duration;
use tracing::{debug, info};

use crate::config::constants::{
    DETAIL_NAV_TIMEOUT_MS, DISCOVERY_SLICE_MS, DURATION_CEILING_SECS, LISTING_NAV_TIMEOUT_MS,
    PHASE2_SAFETY_MARGIN_MS, SCROLL_SETTLE_MS, TOTAL_BUDGET_MS,
};
use crate::engine::budget::RunBudget;
use crate::engine::discovery::discover;
use crate::engine::enrich::{enrich, EnrichedVideo};
use crate::ops::telemetry;
use crate::surface::{RenderSession, SurfaceError};

/// Tunable knobs for one pipeline run. `Default` wires in the production
/// constants; tests shrink the budgets to keep runs instantaneous.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub total_budget_ms: u64,
    pub discovery_slice_ms: u64,
    pub phase2_margin_ms: u64,
    pub listing_nav_timeout_ms: u64,
    pub detail_nav_timeout_ms: u64,
    pub settle_ms: u64,
    pub duration_ceiling_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            total_budget_ms: TOTAL_BUDGET_MS,
            discovery_slice_ms: DISCOVERY_SLICE_MS,
            phase2_margin_ms: PHASE2_SAFETY_MARGIN_MS,
            listing_nav_timeout_ms: LISTING_NAV_TIMEOUT_MS,
            detail_nav_timeout_ms: DETAIL_NAV_TIMEOUT_MS,
            settle_ms: SCROLL_SETTLE_MS,
            duration_ceiling_secs: DURATION_CEILING_SECS,
        }
    }
}

/// Runs the two-phase scrape against a provisioned session.
///
/// Returns the assembled result list; soft budget expiry inside either
/// phase yields a partial (possibly empty) list, never an error. The only
/// error here is a surface that cannot be opened at all.
pub async fn run(
    session: &dyn RenderSession,
    listing_url: &str,
    limit: usize,
    config: &PipelineConfig,
) -> Result<Vec<EnrichedVideo>, SurfaceError> {
    let budget = RunBudget::with_phases(
        config.total_budget_ms,
        config.discovery_slice_ms,
        config.phase2_margin_ms,
    );

    // * Phase 1: scroll-driven identifier discovery
    let listing = session.open_surface().await?;

    // * Listing navigation failures are swallowed - whatever rendered gets
    // * scanned, and an empty page simply discovers nothing
    if let Err(e) = listing
        .goto(
            listing_url,
            Duration::from_millis(config.listing_nav_timeout_ms),
        )
        .await
    {
        debug!(url = listing_url, error = %e, "Listing navigation incomplete");
    }

    let candidates = discover(
        listing.as_ref(),
        &budget,
        limit,
        Duration::from_millis(config.settle_ms),
    )
    .await;

    // * Free the listing page before detail fetches begin
    listing.close().await;

    telemetry::record_candidates(candidates.len());

    if candidates.is_empty() {
        info!(url = listing_url, "No candidates discovered");
        return Ok(Vec::new());
    }

    // * Phase 2: sequential per-identifier enrichment on a fresh surface
    let detail = session.open_surface().await?;
    let videos = enrich(
        detail.as_ref(),
        &budget,
        &candidates,
        Duration::from_millis(config.detail_nav_timeout_ms),
        config.duration_ceiling_secs,
    )
    .await;
    detail.close().await;

    Ok(assemble(videos, limit))
}

// * Result Assembler: order is enrichment order, size is capped at the
// * requested limit. Nothing else to do.
fn assemble(mut videos: Vec<EnrichedVideo>, limit: usize) -> Vec<EnrichedVideo> {
    videos.truncate(limit);
    videos
}
