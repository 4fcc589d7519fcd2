use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider, SpanExporter};
use opentelemetry_sdk::Resource;

use crate::env::{self, ExporterKind, ResolvedConfig};
use crate::error::Error;
use crate::options::Protocol;

/// Build and globally register a [`SdkTracerProvider`].
///
/// The span exporter is selected from `OTEL_TRACES_EXPORTER`; spans flow
/// through a batching processor and an always-on sampler. With the debug
/// flag set, a synchronous stdout processor is attached in addition to the
/// primary pipeline.
///
/// # Errors
///
/// Returns an error if the exporter selection is unrecognized or the OTLP
/// exporter fails to initialize.
pub(crate) fn build_tracer_provider(
    resource: Resource,
    config: &ResolvedConfig,
) -> Result<SdkTracerProvider, Error> {
    let provider = match env::exporter_kind("OTEL_TRACES_EXPORTER")? {
        ExporterKind::Otlp => {
            provider_with_primary(resource, build_span_exporter(config)?, config.debug_tracer)
        }
        ExporterKind::Console => provider_with_primary(
            resource,
            opentelemetry_stdout::SpanExporter::default(),
            config.debug_tracer,
        ),
        ExporterKind::None => provider_without_primary(resource, config.debug_tracer),
    };

    // Register globally so auto-instrumentation and context propagation work
    opentelemetry::global::set_tracer_provider(provider.clone());

    Ok(provider)
}

fn provider_with_primary<E: SpanExporter + 'static>(
    resource: Resource,
    primary: E,
    debug_console: bool,
) -> SdkTracerProvider {
    let mut builder = SdkTracerProvider::builder()
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource)
        .with_batch_exporter(primary);

    if debug_console {
        builder = builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default());
    }

    builder.build()
}

fn provider_without_primary(resource: Resource, debug_console: bool) -> SdkTracerProvider {
    let mut builder = SdkTracerProvider::builder()
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(resource);

    if debug_console {
        builder = builder.with_simple_exporter(opentelemetry_stdout::SpanExporter::default());
    }

    builder.build()
}

fn build_span_exporter(
    config: &ResolvedConfig,
) -> Result<opentelemetry_otlp::SpanExporter, Error> {
    match config.protocol {
        Protocol::Grpc => {
            #[cfg(feature = "grpc")]
            {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_tonic()
                    .with_endpoint(&config.endpoint)
                    .with_timeout(config.export_timeout)
                    .build()
                    .map_err(Error::exporter)?;
                Ok(exporter)
            }
            #[cfg(not(feature = "grpc"))]
            {
                Err(Error::exporter_msg(
                    "gRPC transport requested but the `grpc` feature is not enabled. \
                     Enable it in Cargo.toml: marmot-otel = { features = [\"grpc\"] }",
                ))
            }
        }
        Protocol::HttpProtobuf | Protocol::HttpJson => {
            #[cfg(feature = "http")]
            {
                let endpoint = format!("{}/v1/traces", config.endpoint.trim_end_matches('/'));
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .with_endpoint(endpoint)
                    .with_timeout(config.export_timeout)
                    .build()
                    .map_err(Error::exporter)?;
                Ok(exporter)
            }
            #[cfg(not(feature = "http"))]
            {
                Err(Error::exporter_msg(
                    "HTTP transport requested but the `http` feature is not enabled. \
                     Enable it in Cargo.toml: marmot-otel = { features = [\"http\"] }",
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use opentelemetry::trace::{Tracer, TracerProvider as _};
    use opentelemetry_sdk::trace::InMemorySpanExporter;

    use super::*;

    fn spans_reaching_primary(debug_console: bool) -> usize {
        let exporter = InMemorySpanExporter::default();
        let provider = provider_with_primary(
            Resource::builder().build(),
            exporter.clone(),
            debug_console,
        );

        let tracer = provider.tracer("tracer-test");
        tracer.in_span("op", |_cx| {});
        provider.force_flush().expect("flush");

        exporter.get_finished_spans().expect("spans").len()
    }

    #[test]
    fn primary_pipeline_receives_spans() {
        assert_eq!(spans_reaching_primary(false), 1);
    }

    #[test]
    fn debug_console_processor_is_additive_not_a_replacement() {
        // The stdout processor rides alongside; the primary exporter still
        // sees every span.
        assert_eq!(spans_reaching_primary(true), 1);
    }

    #[test]
    fn spans_are_sampled_under_the_always_on_policy() {
        let exporter = InMemorySpanExporter::default();
        let provider = provider_with_primary(Resource::builder().build(), exporter.clone(), false);

        let tracer = provider.tracer("tracer-test");
        tracer.in_span("op", |_cx| {});
        provider.force_flush().expect("flush");

        let spans = exporter.get_finished_spans().expect("spans");
        assert!(spans
            .iter()
            .all(|span| span.span_context.is_sampled()));
    }
}
