use opentelemetry::global::{self, BoxedTracer};
use opentelemetry::metrics::Meter;
use opentelemetry::InstrumentationScope;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use opentelemetry_sdk::trace::SdkTracerProvider;

/// Process-wide telemetry state returned by [`setup_otel`](crate::setup_otel).
///
/// Holds the constructed providers plus a named tracer and meter for the
/// component that initialized them. The handle **must** be held for the
/// duration of the application: dropping it flushes and shuts down the
/// providers.
#[derive(Debug)]
#[must_use = "dropping the Telemetry handle immediately shuts down the OTel providers — \
              hold it for the lifetime of your application (e.g. `let _telemetry = ...;`)"]
pub struct Telemetry {
    tracer_name: String,
    meter_name: String,
    tracer: BoxedTracer,
    meter: Meter,
    tracer_provider: Option<SdkTracerProvider>,
    meter_provider: Option<SdkMeterProvider>,
    shutdown_called: bool,
}

impl Telemetry {
    pub(crate) fn new(
        component_name: &str,
        tracer_provider: Option<SdkTracerProvider>,
        meter_provider: Option<SdkMeterProvider>,
    ) -> Self {
        let tracer_name = format!("{component_name}-tracer");
        let meter_name = format!("{component_name}-meter");
        let tracer = global::tracer(tracer_name.clone());
        let meter =
            global::meter_with_scope(InstrumentationScope::builder(meter_name.clone()).build());

        Self {
            tracer_name,
            meter_name,
            tracer,
            meter,
            tracer_provider,
            meter_provider,
            shutdown_called: false,
        }
    }

    /// Tracer namespaced to the component that initialized telemetry.
    pub fn tracer(&self) -> &BoxedTracer {
        &self.tracer
    }

    /// Meter namespaced to the component that initialized telemetry.
    pub fn meter(&self) -> &Meter {
        &self.meter
    }

    /// Instrumentation scope name of [`tracer`](Self::tracer).
    pub fn tracer_name(&self) -> &str {
        &self.tracer_name
    }

    /// Instrumentation scope name of [`meter`](Self::meter).
    pub fn meter_name(&self) -> &str {
        &self.meter_name
    }

    /// Explicitly flush and shut down the providers.
    ///
    /// Safe to call multiple times; subsequent calls are no-ops.
    /// This is also called automatically when the handle is dropped.
    pub fn shutdown(&mut self) {
        if self.shutdown_called {
            return;
        }
        self.shutdown_called = true;
        self.do_shutdown();
    }

    fn do_shutdown(&self) {
        if let Some(ref tp) = self.tracer_provider {
            if let Err(e) = tp.force_flush() {
                eprintln!("marmot-otel: error flushing tracer provider: {e}");
            }
            if let Err(e) = tp.shutdown() {
                eprintln!("marmot-otel: error shutting down tracer provider: {e}");
            }
        }

        if let Some(ref mp) = self.meter_provider {
            if let Err(e) = mp.force_flush() {
                eprintln!("marmot-otel: error flushing meter provider: {e}");
            }
            if let Err(e) = mp.shutdown() {
                eprintln!("marmot-otel: error shutting down meter provider: {e}");
            }
        }
    }
}

impl Drop for Telemetry {
    fn drop(&mut self) {
        if !self.shutdown_called {
            self.shutdown_called = true;
            self.do_shutdown();
        }
    }
}
