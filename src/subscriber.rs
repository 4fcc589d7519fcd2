use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::error::Error;
use crate::format::CloudLoggingFormat;

/// Compose and globally register the tracing subscriber.
///
/// Layers added:
/// - [`EnvFilter`] — respects `RUST_LOG` (defaults to `info`)
/// - `fmt` — Cloud Logging structured JSON on stdout, with trace
///   correlation injected by [`CloudLoggingFormat`]
/// - `OpenTelemetryLayer` — bridges tracing spans to OTel traces (if a
///   tracer provider was built)
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub(crate) fn compose_subscriber(
    tracer_provider: Option<&SdkTracerProvider>,
    project_id: &str,
) -> Result<(), Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().event_format(CloudLoggingFormat::new(project_id));

    let otel_trace_layer = tracer_provider.map(|tp| {
        use opentelemetry::trace::TracerProvider as _;
        tracing_opentelemetry::layer().with_tracer(tp.tracer("marmot-otel"))
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_trace_layer);

    tracing::subscriber::set_global_default(subscriber).map_err(|_| Error::AlreadyInitialized)
}
