// * Budget Controller
// * One monotonic wall-clock budget shared by both pipeline phases.
// * Queried at arbitrary frequency; never errors, never blocks.

use std::time::{Duration, Instant};

/// Wall-clock budget for a single scrape run.
///
/// All arithmetic saturates: once the budget is spent, `remaining()` is
/// zero and every `expired` check holds, so an exhausted clock degrades to
/// "return partial results" rather than a hang or a panic.
#[derive(Debug, Clone)]
pub struct RunBudget {
    started: Instant,
    total: Duration,
    phase1_slice: Duration,
    phase2_margin: Duration,
}

impl RunBudget {
    /// Starts a budget of `total_ms` with explicit phase bounds.
    pub fn with_phases(total_ms: u64, phase1_slice_ms: u64, phase2_margin_ms: u64) -> Self {
        Self {
            started: Instant::now(),
            total: Duration::from_millis(total_ms),
            phase1_slice: Duration::from_millis(phase1_slice_ms.min(total_ms)),
            phase2_margin: Duration::from_millis(phase2_margin_ms),
        }
    }

    /// Starts a budget with the default phase split from `config`.
    pub fn start(total_ms: u64) -> Self {
        Self::with_phases(
            total_ms,
            crate::config::constants::DISCOVERY_SLICE_MS,
            crate::config::constants::PHASE2_SAFETY_MARGIN_MS,
        )
    }

    /// Milliseconds left of the total budget, saturating at zero.
    pub fn remaining(&self) -> Duration {
        self.total.saturating_sub(self.started.elapsed())
    }

    /// True once no more than `margin` is left.
    pub fn expired(&self, margin: Duration) -> bool {
        self.remaining() <= margin
    }

    /// True once the discovery slice has elapsed.
    pub fn discovery_expired(&self) -> bool {
        self.started.elapsed() >= self.phase1_slice
    }

    /// True once enrichment must stop to leave room for response assembly.
    pub fn enrichment_expired(&self) -> bool {
        self.expired(self.phase2_margin)
    }
}
