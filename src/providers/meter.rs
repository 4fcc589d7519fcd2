use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::Resource;

use crate::env::{self, ExporterKind, ResolvedConfig};
use crate::error::Error;
use crate::options::Protocol;

/// Build and globally register a [`SdkMeterProvider`].
///
/// The metric exporter is selected from `OTEL_METRICS_EXPORTER` and wrapped
/// in a periodic reader bound to the supplied resource.
///
/// # Errors
///
/// Returns an error if the exporter selection is unrecognized or the OTLP
/// exporter fails to initialize.
pub(crate) fn build_meter_provider(
    resource: Resource,
    config: &ResolvedConfig,
) -> Result<SdkMeterProvider, Error> {
    let builder = SdkMeterProvider::builder().with_resource(resource);

    let provider = match env::exporter_kind("OTEL_METRICS_EXPORTER")? {
        ExporterKind::Otlp => {
            let reader = PeriodicReader::builder(build_metric_exporter(config)?).build();
            builder.with_reader(reader).build()
        }
        ExporterKind::Console => {
            let reader =
                PeriodicReader::builder(opentelemetry_stdout::MetricExporter::default()).build();
            builder.with_reader(reader).build()
        }
        ExporterKind::None => builder.build(),
    };

    opentelemetry::global::set_meter_provider(provider.clone());

    Ok(provider)
}

fn build_metric_exporter(
    config: &ResolvedConfig,
) -> Result<opentelemetry_otlp::MetricExporter, Error> {
    match config.protocol {
        Protocol::Grpc => {
            #[cfg(feature = "grpc")]
            {
                let exporter = opentelemetry_otlp::MetricExporter::builder()
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
                let endpoint = format!("{}/v1/metrics", config.endpoint.trim_end_matches('/'));
                let exporter = opentelemetry_otlp::MetricExporter::builder()
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
