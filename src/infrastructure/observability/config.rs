//! Telemetry settings (`[observability]` in the config files)
//!
//! Trace export is opt-in; the Prometheus endpoint is on unless disabled.

use serde::Deserialize;

const OTLP_COLLECTOR: &str = "http://localhost:4317";
const METRICS_ROUTE: &str = "/metrics";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OTLP span export
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// Collector gRPC endpoint
    pub otlp_endpoint: String,
    /// Reported as `service.name`; the crate name unless overridden
    pub service_name: String,
    /// Fraction of root spans kept, clamped to [0, 1] by the sampler
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: OTLP_COLLECTOR.to_string(),
            service_name: env!("CARGO_PKG_NAME").to_string(),
            sampling_ratio: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route the Prometheus exposition is merged onto
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: METRICS_ROUTE.to_string(),
        }
    }
}
