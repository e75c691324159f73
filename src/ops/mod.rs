// * Operations: observability infrastructure for the service.

pub mod telemetry;

pub use telemetry::{get_metrics_string, init_tracing, init_tracing_pretty};
