use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Prometheus instruments for the HTTP surface and the grant lifecycle.
///
/// Cheap to clone: every instrument is reference counted internally.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    pub http_requests_total: IntCounter,
    pub http_request_duration_seconds: Histogram,
    pub http_requests_total_by_route: IntCounterVec,
    pub http_request_duration_seconds_by_route: HistogramVec,

    pub oauth_authorization_codes_issued: IntCounter,
    pub oauth_token_issued_total: IntCounter,
    /// Labelled by OAuth error code (`invalid_client`, `invalid_grant`, ...).
    pub oauth_grant_failures_total: IntCounterVec,
    /// Labelled by outcome (`granted` / `denied`).
    pub resource_access_total: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests_total =
            IntCounter::new("http_requests_total", "Total number of HTTP requests")?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ))?;
        let http_requests_total_by_route = IntCounterVec::new(
            Opts::new(
                "http_requests_by_route_total",
                "HTTP requests by method, route and status",
            ),
            &["method", "route", "status"],
        )?;
        let http_request_duration_seconds_by_route = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_by_route_seconds",
                "HTTP request latency by method, route and status",
            ),
            &["method", "route", "status"],
        )?;

        let oauth_authorization_codes_issued = IntCounter::new(
            "oauth_authorization_codes_issued_total",
            "Authorization codes issued",
        )?;
        let oauth_token_issued_total =
            IntCounter::new("oauth_token_issued_total", "Access tokens issued")?;
        let oauth_grant_failures_total = IntCounterVec::new(
            Opts::new(
                "oauth_grant_failures_total",
                "Declined authorize/token requests by error code",
            ),
            &["error"],
        )?;
        let resource_access_total = IntCounterVec::new(
            Opts::new(
                "resource_access_total",
                "Protected resource requests by outcome",
            ),
            &["outcome"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;
        registry.register(Box::new(http_requests_total_by_route.clone()))?;
        registry.register(Box::new(http_request_duration_seconds_by_route.clone()))?;
        registry.register(Box::new(oauth_authorization_codes_issued.clone()))?;
        registry.register(Box::new(oauth_token_issued_total.clone()))?;
        registry.register(Box::new(oauth_grant_failures_total.clone()))?;
        registry.register(Box::new(resource_access_total.clone()))?;

        Ok(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            http_requests_total_by_route,
            http_request_duration_seconds_by_route,
            oauth_authorization_codes_issued,
            oauth_token_issued_total,
            oauth_grant_failures_total,
            resource_access_total,
        })
    }

    pub fn record_grant_failure(&self, error: &str) {
        self.oauth_grant_failures_total
            .with_label_values(&[error])
            .inc();
    }

    pub fn record_resource_access(&self, granted: bool) {
        let outcome = if granted { "granted" } else { "denied" };
        self.resource_access_total
            .with_label_values(&[outcome])
            .inc();
    }

    /// Record one finished HTTP request in both the global and the per-route series.
    pub fn observe_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        let seconds = elapsed.as_secs_f64();
        let status = status.to_string();
        let labels = [method, route, status.as_str()];

        self.http_request_duration_seconds.observe(seconds);
        self.http_requests_total_by_route
            .with_label_values(&labels)
            .inc();
        self.http_request_duration_seconds_by_route
            .with_label_values(&labels)
            .observe(seconds);
    }

    /// Render the registry in the Prometheus text exposition format (version 0.0.4).
    pub fn render(&self) -> Result<Vec<u8>, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(buffer)
    }
}
