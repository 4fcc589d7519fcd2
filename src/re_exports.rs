//! Curated re-exports of key OpenTelemetry and tracing types.
//!
//! Lets applications reach commonly needed types (`KeyValue`, `Resource`,
//! span extensions) without adding direct dependencies on `opentelemetry`,
//! `opentelemetry_sdk`, or `tracing-opentelemetry` to their own
//! `Cargo.toml`.

/// Re-export of the `tracing` crate for convenient access.
pub use tracing;

/// Re-export of the `opentelemetry` API crate (`KeyValue`, `global`, trace
/// and metrics APIs).
pub use opentelemetry;

/// Re-export of the `opentelemetry_sdk` crate (`Resource`, providers).
pub use opentelemetry_sdk;

/// Re-export of `tracing_opentelemetry` for span context extensions.
pub use tracing_opentelemetry;
