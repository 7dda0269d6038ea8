use opentelemetry::global;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use opentelemetry_sdk::Resource;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Keeps the tracer provider alive; call [`TelemetryGuard::shutdown`] before exit.
pub struct TelemetryGuard {
    provider: SdkTracerProvider,
}

impl TelemetryGuard {
    pub fn shutdown(self) {
        if let Err(err) = self.provider.shutdown() {
            eprintln!("tracer provider shutdown failed: {err}");
        }
    }
}

/// Initialize tracing/logging.
///
/// - Always emits structured JSON logs via `tracing_subscriber` (`RUST_LOG`, default `info`).
/// - Bridges `log` records into `tracing` so Actix internals are correlated.
/// - Installs a local OpenTelemetry tracer provider so every span carries trace/span IDs,
///   and the W3C trace-context propagator.
pub fn init_telemetry(service_name: &str) -> Result<TelemetryGuard, Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    global::set_text_map_propagator(TraceContextPropagator::new());

    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();
    let provider = SdkTracerProvider::builder()
        .with_resource(resource)
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::AlwaysOn)))
        .build();
    let tracer = provider.tracer(service_name.to_string());
    global::set_tracer_provider(provider.clone());

    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    // with_current_span + with_span_list puts the active span stack (and the
    // trace_id/span_id fields recorded on it) on every event.
    let formatting_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer)
        .with(formatting_layer)
        .try_init()?;

    // Ignore errors if a logger was already set (e.g., by the subscriber itself).
    let _ = tracing_log::LogTracer::init();

    Ok(TelemetryGuard { provider })
}

/// Record OpenTelemetry trace/span identifiers onto a span.
///
/// Spans must declare `trace_id` and `span_id` as `tracing::field::Empty`.
pub fn annotate_span_with_trace_ids(span: &Span) {
    use opentelemetry::trace::TraceContextExt;
    use tracing_opentelemetry::OpenTelemetrySpanExt;
    let cx = span.context();
    let otel_span = cx.span();
    let sc = otel_span.span_context();
    if sc.is_valid() {
        span.record("trace_id", tracing::field::display(sc.trace_id()));
        span.record("span_id", tracing::field::display(sc.span_id()));
    }
}
