use std::error::Error as StdError;

/// Errors returned by [`setup_otel`](crate::setup_otel).
///
/// Every failure is reported synchronously from the entry point; nothing in
/// the initialization path panics. Any error must be treated as fatal to
/// startup, since global providers may already be partially installed when
/// the error is returned.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required option was missing or invalid (e.g. no resource metadata,
    /// empty component name).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An exporter, metric reader, or console sink could not be constructed.
    #[error("exporter initialization failed: {0}")]
    ExporterInit(#[source] Box<dyn StdError + Send + Sync>),

    /// `setup_otel` was already called in this process. Global providers are
    /// installed once; a second call is rejected instead of silently
    /// replacing them.
    #[error("telemetry is already initialized for this process")]
    AlreadyInitialized,
}

impl Error {
    pub(crate) fn exporter(source: impl StdError + Send + Sync + 'static) -> Self {
        Error::ExporterInit(Box::new(source))
    }

    pub(crate) fn exporter_msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Error::ExporterInit(message.into())
    }
}
