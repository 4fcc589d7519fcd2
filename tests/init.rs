//! Initialization lifecycle.
//!
//! `setup_otel` mutates process-wide defaults, so the whole lifecycle runs
//! in a single test function to keep ordering deterministic.

use marmot_otel::{service_resource, Error, OtelOptions};

#[test]
fn initialization_lifecycle() {
    // Hermetic: no collector and no metadata server in CI.
    std::env::set_var("OTEL_TRACES_EXPORTER", "none");
    std::env::set_var("OTEL_METRICS_EXPORTER", "none");
    std::env::set_var("GCE_METADATA_HOST", "127.0.0.1:1");

    // Missing resource metadata is rejected before any global is touched.
    let err = marmot_otel::setup_otel("checkout", None).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    // So is an empty component name.
    let options = OtelOptions::builder()
        .resource(service_resource("checkout", [("service.version", "0.0.0")]))
        .build();
    let err = marmot_otel::setup_otel("", Some(options.clone())).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    // A valid option set initializes and names the handles after the component.
    let telemetry = marmot_otel::setup_otel("checkout", Some(options.clone()))
        .expect("initialization succeeds");
    assert_eq!(telemetry.tracer_name(), "checkout-tracer");
    assert_eq!(telemetry.meter_name(), "checkout-meter");

    // A second call is rejected instead of silently replacing the globals.
    let err = marmot_otel::setup_otel("checkout", Some(options)).unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized));
}
