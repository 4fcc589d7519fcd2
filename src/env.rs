use std::time::Duration;

use crate::error::Error;
use crate::options::{OtelOptions, Protocol};

const DEFAULT_GRPC_ENDPOINT: &str = "http://localhost:4317";
const DEFAULT_HTTP_ENDPOINT: &str = "http://localhost:4318";
const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fully resolved configuration after merging programmatic options, env vars,
/// and defaults.
///
/// Priority (highest to lowest):
/// 1. Programmatic — values set in [`OtelOptions`]
/// 2. Environment variables — `OTEL_EXPORTER_OTLP_*`
/// 3. Defaults — localhost endpoints, 30s timeout
#[derive(Debug, Clone)]
pub(crate) struct ResolvedConfig {
    pub endpoint: String,
    pub protocol: Protocol,
    pub export_timeout: Duration,
    pub debug_tracer: bool,
}

/// Resolve configuration by merging programmatic options, env vars, and defaults.
pub(crate) fn resolve_config(opts: &OtelOptions) -> ResolvedConfig {
    let protocol = opts
        .protocol
        .or_else(parse_protocol_env)
        .unwrap_or(Protocol::HttpProtobuf);

    let default_endpoint = match protocol {
        Protocol::Grpc => DEFAULT_GRPC_ENDPOINT,
        Protocol::HttpProtobuf | Protocol::HttpJson => DEFAULT_HTTP_ENDPOINT,
    };

    let endpoint = opts
        .endpoint
        .clone()
        .or_else(|| env_var_non_empty("OTEL_EXPORTER_OTLP_ENDPOINT"))
        .unwrap_or_else(|| default_endpoint.to_owned());

    let export_timeout = opts
        .export_timeout
        .or_else(parse_timeout_env)
        .unwrap_or(DEFAULT_EXPORT_TIMEOUT);

    ResolvedConfig {
        endpoint,
        protocol,
        export_timeout,
        debug_tracer: opts.debug_tracer,
    }
}

/// Concrete exporter implementation selected from environment configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExporterKind {
    /// OTLP export to the resolved collector endpoint (default).
    Otlp,
    /// Human-readable output to stdout.
    Console,
    /// Signal is configured off; the provider is built without a pipeline.
    None,
}

/// Read an exporter-selection variable (`OTEL_TRACES_EXPORTER` or
/// `OTEL_METRICS_EXPORTER`).
///
/// Unset or empty means OTLP. An unrecognized name is an initialization
/// error rather than a silent fallback.
pub(crate) fn exporter_kind(var: &str) -> Result<ExporterKind, Error> {
    match env_var_non_empty(var).as_deref() {
        None | Some("otlp") => Ok(ExporterKind::Otlp),
        Some("console") | Some("stdout") => Ok(ExporterKind::Console),
        Some("none") => Ok(ExporterKind::None),
        Some(other) => Err(Error::exporter_msg(format!(
            "unsupported exporter {other:?} in {var}; expected otlp, console, or none"
        ))),
    }
}

pub(crate) fn env_var_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

fn parse_protocol_env() -> Option<Protocol> {
    env_var_non_empty("OTEL_EXPORTER_OTLP_PROTOCOL").and_then(|v| match v.as_str() {
        "grpc" => Some(Protocol::Grpc),
        "http/protobuf" => Some(Protocol::HttpProtobuf),
        "http/json" => Some(Protocol::HttpJson),
        _ => None,
    })
}

fn parse_timeout_env() -> Option<Duration> {
    env_var_non_empty("OTEL_EXPORTER_OTLP_TIMEOUT")
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_millis)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;

    // Env vars are process-global; serialize tests that mutate them.
    pub(crate) static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn clear_otel_env() {
        std::env::remove_var("OTEL_EXPORTER_OTLP_ENDPOINT");
        std::env::remove_var("OTEL_EXPORTER_OTLP_PROTOCOL");
        std::env::remove_var("OTEL_EXPORTER_OTLP_TIMEOUT");
        std::env::remove_var("OTEL_TRACES_EXPORTER");
        std::env::remove_var("OTEL_METRICS_EXPORTER");
    }

    #[test]
    fn resolve_defaults_with_no_options_or_env() {
        let _lock = ENV_LOCK.lock();
        clear_otel_env();

        let opts = OtelOptions::default();
        let resolved = resolve_config(&opts);

        assert_eq!(resolved.endpoint, "http://localhost:4318");
        assert_eq!(resolved.protocol, Protocol::HttpProtobuf);
        assert_eq!(resolved.export_timeout, Duration::from_secs(30));
        assert!(!resolved.debug_tracer);
    }

    #[test]
    fn programmatic_options_take_precedence() {
        let _lock = ENV_LOCK.lock();
        clear_otel_env();
        std::env::set_var("OTEL_EXPORTER_OTLP_ENDPOINT", "http://env:4317");

        let opts = OtelOptions::builder()
            .endpoint("http://programmatic:4317")
            .protocol(Protocol::HttpProtobuf)
            .export_timeout(Duration::from_secs(60))
            .build();

        let resolved = resolve_config(&opts);

        assert_eq!(resolved.endpoint, "http://programmatic:4317");
        assert_eq!(resolved.protocol, Protocol::HttpProtobuf);
        assert_eq!(resolved.export_timeout, Duration::from_secs(60));

        clear_otel_env();
    }

    #[test]
    fn grpc_protocol_uses_port_4317_default() {
        let _lock = ENV_LOCK.lock();
        clear_otel_env();

        let opts = OtelOptions::builder().protocol(Protocol::Grpc).build();
        let resolved = resolve_config(&opts);

        assert_eq!(resolved.endpoint, "http://localhost:4317");
    }

    #[test]
    fn exporter_kind_defaults_to_otlp() {
        let _lock = ENV_LOCK.lock();
        clear_otel_env();

        assert_eq!(
            exporter_kind("OTEL_TRACES_EXPORTER").unwrap(),
            ExporterKind::Otlp
        );
    }

    #[test]
    fn exporter_kind_reads_console_and_none() {
        let _lock = ENV_LOCK.lock();
        clear_otel_env();

        std::env::set_var("OTEL_TRACES_EXPORTER", "console");
        assert_eq!(
            exporter_kind("OTEL_TRACES_EXPORTER").unwrap(),
            ExporterKind::Console
        );

        std::env::set_var("OTEL_METRICS_EXPORTER", "none");
        assert_eq!(
            exporter_kind("OTEL_METRICS_EXPORTER").unwrap(),
            ExporterKind::None
        );

        clear_otel_env();
    }

    #[test]
    fn unknown_exporter_name_is_an_error() {
        let _lock = ENV_LOCK.lock();
        clear_otel_env();
        std::env::set_var("OTEL_TRACES_EXPORTER", "jaeger");

        let err = exporter_kind("OTEL_TRACES_EXPORTER").unwrap_err();
        assert!(matches!(err, Error::ExporterInit(_)));

        clear_otel_env();
    }
}
