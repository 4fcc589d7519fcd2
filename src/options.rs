use std::time::Duration;

use opentelemetry_sdk::Resource;

/// OTLP transport protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// gRPC transport (port 4317).
    Grpc,
    /// HTTP with Protobuf encoding (default, port 4318).
    HttpProtobuf,
    /// HTTP with JSON encoding (port 4318).
    HttpJson,
}

/// Configuration options for OpenTelemetry setup.
///
/// Use [`OtelOptions::builder()`] to construct an instance.
///
/// The resource metadata is the single required option — [`setup_otel`]
/// rejects an option set without it. Everything else is optional; unset
/// values fall back to environment variables, then defaults. Setters
/// overwrite, so the last write to a field wins.
///
/// [`setup_otel`]: crate::setup_otel
#[derive(Debug, Clone, Default)]
pub struct OtelOptions {
    pub(crate) endpoint: Option<String>,
    pub(crate) protocol: Option<Protocol>,
    pub(crate) resource: Option<Resource>,
    pub(crate) debug_tracer: bool,
    pub(crate) export_timeout: Option<Duration>,
}

impl OtelOptions {
    /// Create a new builder for `OtelOptions`.
    pub fn builder() -> OtelOptionsBuilder {
        OtelOptionsBuilder::default()
    }
}

/// Builder for [`OtelOptions`].
#[derive(Debug, Default)]
pub struct OtelOptionsBuilder {
    endpoint: Option<String>,
    protocol: Option<Protocol>,
    resource: Option<Resource>,
    debug_tracer: bool,
    export_timeout: Option<Duration>,
}

impl OtelOptionsBuilder {
    /// Set the collector endpoint (e.g. `"http://collector:4318"`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the OTLP transport protocol.
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Set the resource metadata attached to all emitted telemetry.
    ///
    /// Required. See [`service_resource`](crate::service_resource) for a
    /// convenient way to build one.
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Additionally write every finished span to stdout, synchronously.
    ///
    /// The console processor is attached alongside the primary export
    /// pipeline, which keeps running unchanged.
    pub fn debug_tracer(mut self) -> Self {
        self.debug_tracer = true;
        self
    }

    /// Set the export timeout for OTLP requests.
    pub fn export_timeout(mut self, timeout: Duration) -> Self {
        self.export_timeout = Some(timeout);
        self
    }

    /// Build the [`OtelOptions`].
    pub fn build(self) -> OtelOptions {
        OtelOptions {
            endpoint: self.endpoint,
            protocol: self.protocol,
            resource: self.resource,
            debug_tracer: self.debug_tracer,
            export_timeout: self.export_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_have_no_resource() {
        let opts = OtelOptions::default();
        assert!(opts.resource.is_none());
        assert!(opts.endpoint.is_none());
        assert!(!opts.debug_tracer);
    }

    #[test]
    fn last_write_wins_for_scalar_fields() {
        let opts = OtelOptions::builder()
            .endpoint("http://first:4318")
            .endpoint("http://second:4318")
            .export_timeout(Duration::from_secs(5))
            .export_timeout(Duration::from_secs(10))
            .build();

        assert_eq!(opts.endpoint.as_deref(), Some("http://second:4318"));
        assert_eq!(opts.export_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn debug_tracer_flag_is_sticky() {
        let opts = OtelOptions::builder().debug_tracer().build();
        assert!(opts.debug_tracer);
    }
}
