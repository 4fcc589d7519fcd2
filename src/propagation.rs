//! Text-map propagator selection.
//!
//! `OTEL_PROPAGATORS` holds a comma-separated list of propagator names; the
//! default is `tracecontext,baggage`. Unrecognized names are skipped so a
//! partially valid list still propagates what it can.

use opentelemetry::propagation::TextMapCompositePropagator;
use opentelemetry::propagation::TextMapPropagator;
use opentelemetry_sdk::propagation::{BaggagePropagator, TraceContextPropagator};

use crate::env::env_var_non_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropagatorKind {
    TraceContext,
    Baggage,
}

pub(crate) fn propagator_names() -> Vec<PropagatorKind> {
    let raw = env_var_non_empty("OTEL_PROPAGATORS")
        .unwrap_or_else(|| "tracecontext,baggage".to_owned());

    raw.split(',')
        .filter_map(|name| match name.trim() {
            "tracecontext" => Some(PropagatorKind::TraceContext),
            "baggage" => Some(PropagatorKind::Baggage),
            _ => None,
        })
        .collect()
}

/// Build the composite propagator selected from the environment.
///
/// An empty selection (e.g. `OTEL_PROPAGATORS=none`) yields a composite with
/// no members, which injects and extracts nothing.
pub(crate) fn from_env() -> TextMapCompositePropagator {
    let propagators: Vec<Box<dyn TextMapPropagator + Send + Sync>> = propagator_names()
        .into_iter()
        .map(|kind| -> Box<dyn TextMapPropagator + Send + Sync> {
            match kind {
                PropagatorKind::TraceContext => Box::new(TraceContextPropagator::new()),
                PropagatorKind::Baggage => Box::new(BaggagePropagator::new()),
            }
        })
        .collect();

    TextMapCompositePropagator::new(propagators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::tests::ENV_LOCK;

    #[test]
    fn defaults_to_trace_context_and_baggage() {
        let _lock = ENV_LOCK.lock();
        std::env::remove_var("OTEL_PROPAGATORS");

        assert_eq!(
            propagator_names(),
            vec![PropagatorKind::TraceContext, PropagatorKind::Baggage]
        );
    }

    #[test]
    fn unknown_names_are_skipped() {
        let _lock = ENV_LOCK.lock();
        std::env::set_var("OTEL_PROPAGATORS", "b3, tracecontext ,xray");

        assert_eq!(propagator_names(), vec![PropagatorKind::TraceContext]);

        std::env::remove_var("OTEL_PROPAGATORS");
    }

    #[test]
    fn none_selects_nothing() {
        let _lock = ENV_LOCK.lock();
        std::env::set_var("OTEL_PROPAGATORS", "none");

        assert!(propagator_names().is_empty());

        std::env::remove_var("OTEL_PROPAGATORS");
    }
}
