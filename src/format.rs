//! Cloud Logging structured event format.
//!
//! Formats every `tracing` event as one JSON line following the Cloud
//! Logging structured log schema: fixed `severity`, `timestamp`, and
//! `message` keys, event fields as top-level members, and, when a valid
//! span context is active, the `logging.googleapis.com/*` trace
//! correlation attributes described in
//! <https://cloud.google.com/logging/docs/structured-logging#special-payload-fields>.
//!
//! Level filtering, writing, and field capture stay with the surrounding
//! fmt machinery (`EnvFilter`, `MakeWriter`, the field visitor); this type
//! only decides the record's attributes.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use opentelemetry::trace::{SpanContext, TraceContextExt};
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing_core::{Event, Level, Subscriber};
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub(crate) const TRACE_KEY: &str = "logging.googleapis.com/trace";
pub(crate) const SPAN_ID_KEY: &str = "logging.googleapis.com/spanId";
pub(crate) const SAMPLED_KEY: &str = "logging.googleapis.com/trace_sampled";

/// Event format producing Cloud Logging structured JSON.
///
/// The project id is supplied at construction and embedded in the trace
/// path of correlated records.
pub(crate) struct CloudLoggingFormat {
    project_id: String,
}

impl CloudLoggingFormat {
    pub(crate) fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }
}

impl<S, N> FormatEvent<S, N> for CloudLoggingFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();

        let mut record = Map::new();
        record.insert(
            "timestamp".to_owned(),
            Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)),
        );
        record.insert(
            "severity".to_owned(),
            Value::String(cloud_severity(metadata.level()).to_owned()),
        );
        record.insert(
            "target".to_owned(),
            Value::String(metadata.target().to_owned()),
        );

        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);
        record.insert(
            "message".to_owned(),
            Value::String(visitor.message.unwrap_or_default()),
        );
        for (key, value) in visitor.fields {
            record.insert(key, value);
        }

        if let Some(span_context) = active_span_context() {
            inject_trace_context(&mut record, &span_context, &self.project_id);
        }

        writeln!(writer, "{}", Value::Object(record))
    }
}

/// Map a `tracing` level onto a Cloud Logging `LogSeverity` value.
///
/// Only the warning level is rewritten; every other level already matches
/// its Cloud Logging spelling.
pub(crate) fn cloud_severity(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

/// Append the three trace correlation attributes to a record.
pub(crate) fn inject_trace_context(
    record: &mut Map<String, Value>,
    span_context: &SpanContext,
    project_id: &str,
) {
    record.insert(
        TRACE_KEY.to_owned(),
        Value::String(format!(
            "projects/{}/traces/{}",
            project_id,
            span_context.trace_id()
        )),
    );
    record.insert(
        SPAN_ID_KEY.to_owned(),
        Value::String(span_context.span_id().to_string()),
    );
    record.insert(SAMPLED_KEY.to_owned(), Value::Bool(span_context.is_sampled()));
}

/// The span context the event was emitted under, if any is valid.
///
/// Looks at the current `tracing` span first (via the OTel layer), then at
/// a span context attached to the ambient OpenTelemetry context (e.g. a
/// remote parent extracted by a propagator).
fn active_span_context() -> Option<SpanContext> {
    let current = tracing::Span::current().context();
    let span_context = current.span().span_context().clone();
    if span_context.is_valid() {
        return Some(span_context);
    }

    let ambient = opentelemetry::Context::current();
    let span_context = ambient.span().span_context().clone();
    span_context.is_valid().then_some(span_context)
}

#[derive(Default)]
struct JsonVisitor {
    message: Option<String>,
    fields: Vec<(String, Value)>,
}

impl JsonVisitor {
    fn push(&mut self, field: &Field, value: Value) {
        self.fields.push((field.name().to_owned(), value));
    }
}

impl Visit for JsonVisitor {
    fn record_f64(&mut self, field: &Field, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_owned());
        } else {
            self.push(field, Value::from(value));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.push(field, Value::from(value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.push(field, Value::String(rendered));
        }
    }
}
