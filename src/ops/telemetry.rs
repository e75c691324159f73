// * Telemetry - JSON Logging and Prometheus Metrics
// * Structured logging plus the handful of counters this service exposes

use lazy_static::lazy_static;
use prometheus::{
    register_counter, register_counter_vec, register_histogram, Counter, CounterVec, Encoder,
    Histogram, TextEncoder,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

lazy_static! {
    // * Scrape requests by terminal status
    pub static ref SCRAPES_TOTAL: CounterVec = register_counter_vec!(
        "shortscout_scrapes_total",
        "Total scrape requests by status",
        &["status"]
    ).unwrap();

    // * End-to-end scrape duration
    pub static ref SCRAPE_DURATION_SECONDS: Histogram = register_histogram!(
        "shortscout_scrape_duration_seconds",
        "Scrape request duration in seconds",
        vec![1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 45.0, 60.0]
    ).unwrap();

    // * Candidates found by the discovery phase
    pub static ref CANDIDATES_DISCOVERED_TOTAL: Counter = register_counter!(
        "shortscout_candidates_discovered_total",
        "Total candidate identifiers discovered"
    ).unwrap();

    // * Videos that survived enrichment and filtering
    pub static ref VIDEOS_RETURNED_TOTAL: Counter = register_counter!(
        "shortscout_videos_returned_total",
        "Total videos returned to callers"
    ).unwrap();

    // * Browser launches by outcome
    pub static ref BROWSER_LAUNCHES_TOTAL: CounterVec = register_counter_vec!(
        "shortscout_browser_launches_total",
        "Browser launches by outcome",
        &["outcome"]
    ).unwrap();
}

/// Initializes the tracing subscriber with JSON formatting.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .init();
}

/// Initializes tracing with pretty formatting (for development).
pub fn init_tracing_pretty() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().pretty())
        .init();
}

pub fn record_scrape(status: &str) {
    SCRAPES_TOTAL.with_label_values(&[status]).inc();
}

pub fn record_scrape_duration(seconds: f64) {
    SCRAPE_DURATION_SECONDS.observe(seconds);
}

pub fn record_candidates(count: usize) {
    CANDIDATES_DISCOVERED_TOTAL.inc_by(count as f64);
}

pub fn record_videos_returned(count: usize) {
    VIDEOS_RETURNED_TOTAL.inc_by(count as f64);
}

pub fn record_browser_launch(outcome: &str) {
    BROWSER_LAUNCHES_TOTAL.with_label_values(&[outcome]).inc();
}

/// Renders all registered metrics in the Prometheus text format.
pub fn get_metrics_string() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
