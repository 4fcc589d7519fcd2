//! # marmot-otel
//!
//! GCP-ready OpenTelemetry bootstrap for Rust applications using the
//! [`tracing`] crate.
//!
//! One function call wires an OTLP trace pipeline, an OTLP metrics pipeline,
//! and Cloud Logging structured JSON logs with trace/span correlation —
//! existing `#[instrument]`, `tracing::info!()`, and span macros work
//! unchanged, and every log line emitted inside a span carries the
//! `logging.googleapis.com/*` attributes Cloud Logging uses to link logs to
//! traces.
//!
//! ## Quick Start
//!
//! ```no_run
//! use marmot_otel::{service_resource, OtelOptions};
//!
//! # fn main() -> Result<(), marmot_otel::Error> {
//! let options = OtelOptions::builder()
//!     .resource(service_resource("checkout", [("service.version", "1.4.2")]))
//!     .build();
//! let _telemetry = marmot_otel::setup_otel("checkout", Some(options))?;
//!
//! tracing::info!("telemetry wired");
//! # Ok(())
//! # }
//! ```
//!
//! ## Configured Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use marmot_otel::{service_resource, OtelOptions, Protocol};
//!
//! # fn main() -> Result<(), marmot_otel::Error> {
//! let _telemetry = marmot_otel::setup_otel("checkout", Some(
//!     OtelOptions::builder()
//!         .resource(service_resource("checkout", [("deployment.environment", "production")]))
//!         .endpoint("http://collector:4318")
//!         .protocol(Protocol::HttpProtobuf)
//!         .export_timeout(Duration::from_secs(30))
//!         .debug_tracer()
//!         .build()
//! ))?;
//! # Ok(())
//! # }
//! ```
//!
//! On GCP the project id embedded in log trace paths is discovered from the
//! metadata server once at startup; elsewhere the literal `non-gcp` is used.

mod env;
mod error;
mod format;
mod handle;
mod options;
mod project_id;
mod propagation;
mod providers;
mod resource;
mod subscriber;

pub mod re_exports;

pub use error::Error;
pub use handle::Telemetry;
pub use options::{OtelOptions, OtelOptionsBuilder, Protocol};
pub use resource::service_resource;

use std::sync::atomic::{AtomicBool, Ordering};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize OpenTelemetry for the given component and optional configuration.
///
/// Sets up the trace and metrics pipelines, installs a composite W3C
/// trace-context + baggage propagator, registers the providers as
/// process-wide defaults, and installs the global `tracing` subscriber with
/// Cloud Logging structured output. Returns a [`Telemetry`] handle holding
/// the providers plus a tracer named `"<name>-tracer"` and a meter named
/// `"<name>-meter"`.
///
/// The handle **must** be held for the duration of the application.
/// Dropping it triggers a graceful flush and shutdown of the providers.
///
/// # Configuration Priority
///
/// 1. **Programmatic** — values set in [`OtelOptions`]
/// 2. **Environment variables** — `OTEL_EXPORTER_OTLP_ENDPOINT`,
///    `OTEL_TRACES_EXPORTER`, `OTEL_METRICS_EXPORTER`, `OTEL_PROPAGATORS`, etc.
/// 3. **Defaults** — OTLP to `http://localhost:4318` (HTTP+protobuf), 30s
///    timeout, `info` log level
///
/// # Errors
///
/// Returns an error if:
/// - The resource metadata option is missing, or `component_name` is empty
/// - An exporter or metric reader fails to initialize, or an exporter
///   selection variable names an unsupported exporter
/// - Telemetry was already initialized in this process
///
/// Global side effects are applied as construction proceeds, so a failed
/// call may leave some defaults installed (e.g. the tracer provider when
/// the metrics pipeline fails). Treat any error as fatal to startup.
pub fn setup_otel(
    component_name: &str,
    options: Option<OtelOptions>,
) -> Result<Telemetry, Error> {
    let opts = options.unwrap_or_default();

    if component_name.is_empty() {
        return Err(Error::Configuration(
            "component name must be non-empty; it names the tracer and meter".to_owned(),
        ));
    }
    let resource = opts.resource.clone().ok_or_else(|| {
        Error::Configuration(
            "resource metadata is required; supply it with OtelOptions::builder().resource(...)"
                .to_owned(),
        )
    })?;

    // Installing providers twice would silently replace process-wide
    // defaults; reject instead. The shot is consumed even if construction
    // fails below, since globals may already be partially installed.
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Err(Error::AlreadyInitialized);
    }

    let resolved = env::resolve_config(&opts);
    let project_id = project_id::resolve();

    opentelemetry::global::set_text_map_propagator(propagation::from_env());

    let tracer_provider = if cfg!(feature = "traces") {
        Some(providers::tracer::build_tracer_provider(
            resource.clone(),
            &resolved,
        )?)
    } else {
        None
    };

    let meter_provider = if cfg!(feature = "metrics") {
        Some(providers::meter::build_meter_provider(resource, &resolved)?)
    } else {
        None
    };

    subscriber::compose_subscriber(tracer_provider.as_ref(), project_id)?;

    Ok(Telemetry::new(
        component_name,
        tracer_provider,
        meter_provider,
    ))
}
