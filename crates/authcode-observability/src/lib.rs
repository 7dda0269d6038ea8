//! Telemetry, Prometheus metrics and storage instrumentation shared by the server crates.

pub mod metrics;
pub mod storage;
pub mod telemetry;

#[cfg(feature = "actix")]
pub mod actix;

pub use metrics::Metrics;
pub use storage::ObservedStorage;
pub use telemetry::{annotate_span_with_trace_ids, init_telemetry, TelemetryGuard};
