// * Configuration Constants
// * Central location for all configurable budgets, timeouts and thresholds

// * Hard wall-clock ceiling for a whole /scrape request in milliseconds.
// * The serverless platform kills the function shortly after this, so the
// * outer race must win first and still produce a JSON body.
pub const HARD_TIMEOUT_MS: u64 = 55_000;

// * Soft budget shared by both pipeline phases
pub const TOTAL_BUDGET_MS: u64 = 50_000;

// * Wall-clock slice granted to the discovery scroll loop
pub const DISCOVERY_SLICE_MS: u64 = 15_000;

// * Enrichment stops once less than this remains of the total budget
pub const PHASE2_SAFETY_MARGIN_MS: u64 = 5_000;

// * Listing page navigation timeout in milliseconds
pub const LISTING_NAV_TIMEOUT_MS: u64 = 15_000;

// * Per-item watch page navigation timeout in milliseconds
pub const DETAIL_NAV_TIMEOUT_MS: u64 = 4_000;

// * Pause after each scroll so newly loaded items can render
pub const SCROLL_SETTLE_MS: u64 = 500;

// * Items longer than this are not short-form and are discarded
pub const DURATION_CEILING_SECS: u64 = 60;

// * Default and absolute maximum for the ?limit query parameter
pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 200;

// * Default HTTP port when the PORT environment variable is unset
pub const DEFAULT_PORT: u16 = 3000;
