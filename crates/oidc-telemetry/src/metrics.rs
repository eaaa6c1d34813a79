//! Prometheus metrics for the OIDC facade.
//!
//! All metrics follow the naming convention: `oidc_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{CounterVec, Encoder, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Client events relayed by the facade, by event kind
    pub static ref OIDC_EVENTS_RECEIVED: CounterVec = CounterVec::new(
        Opts::new("oidc_events_received_total", "Client events relayed to the store"),
        &["event"]
    ).expect("metric creation failed");

    /// Actions dispatched by the facade, by action type
    pub static ref OIDC_ACTIONS_DISPATCHED: CounterVec = CounterVec::new(
        Opts::new("oidc_actions_dispatched_total", "Store actions dispatched by the facade"),
        &["action"]
    ).expect("metric creation failed");

    /// Failed client calls, by operation
    pub static ref OIDC_CLIENT_ERRORS: CounterVec = CounterVec::new(
        Opts::new("oidc_client_errors_total", "Failed calls into the OIDC client"),
        &["operation"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry.
///
/// Registering twice returns `TelemetryError::MetricsInit`.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(OIDC_EVENTS_RECEIVED.clone()),
        Box::new(OIDC_ACTIONS_DISPATCHED.clone()),
        Box::new(OIDC_CLIENT_ERRORS.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        // May fail if another test registered first, which is fine
        let _ = register_metrics();
        assert!(register_metrics().is_err());
    }

    #[test]
    fn test_counter_increment() {
        let counter = OIDC_ACTIONS_DISPATCHED.with_label_values(&["[Oidc] signin silent"]);
        let before = counter.get();
        counter.inc();
        assert!(counter.get() >= before + 1.0);
    }

    #[test]
    fn test_encode_contains_registered_families() {
        let _ = register_metrics();
        OIDC_EVENTS_RECEIVED.with_label_values(&["UserLoaded"]).inc();
        let text = encode_metrics().unwrap();
        assert!(text.contains("oidc_events_received_total"));
    }
}
