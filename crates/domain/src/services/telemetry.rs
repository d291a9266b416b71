use std::{env, net::SocketAddr, sync::Arc};

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::hydrate_env_file;

static TRACING_INSTALLED: OnceCell<()> = OnceCell::new();
static PROMETHEUS_RECORDER: OnceCell<Arc<PrometheusHandle>> = OnceCell::new();

const DEFAULT_LOG_FILTER: &str = "info";

/// Observability knobs for a binary, read from `<PREFIX>_LOG_FILTER` and
/// `<PREFIX>_METRICS_ADDRESS`. Both are optional; a missing filter means
/// `info`, a missing address means no scrape listener.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    log_filter: String,
    metrics_address: Option<String>,
}

impl TelemetryConfig {
    pub fn from_env(prefix: &str) -> Self {
        let _ = hydrate_env_file();
        let prefix = prefix.trim().to_ascii_uppercase();

        let log_filter = env::var(format!("{prefix}_LOG_FILTER"))
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let metrics_address = env::var(format!("{prefix}_METRICS_ADDRESS"))
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            log_filter,
            metrics_address,
        }
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn metrics_address(&self) -> Option<&str> {
        self.metrics_address.as_deref()
    }
}

/// Handle onto the process-wide telemetry installs. Every clone renders the
/// same metrics registry.
#[derive(Clone)]
pub struct TelemetryGuard {
    metrics: Arc<PrometheusHandle>,
}

impl TelemetryGuard {
    pub fn render_metrics(&self) -> String {
        self.metrics.render()
    }
}

/// Installs the tracing subscriber and the Prometheus recorder. Both installs
/// are process-wide and happen at most once; later calls reuse them, so tests
/// can initialize freely.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    install_tracing(config)?;
    let metrics = install_metrics(config)?;

    Ok(TelemetryGuard { metrics })
}

fn install_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|err| TelemetryError::InvalidLogFilter(err.to_string()))?;

    if TRACING_INSTALLED.set(()).is_err() {
        // A subscriber from an earlier call is already live.
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .map_err(|err| TelemetryError::Tracing(err.to_string()))
}

fn install_metrics(config: &TelemetryConfig) -> Result<Arc<PrometheusHandle>, TelemetryError> {
    PROMETHEUS_RECORDER
        .get_or_try_init(|| {
            let mut builder = PrometheusBuilder::new();
            if let Some(raw) = config.metrics_address() {
                let socket = raw.parse::<SocketAddr>().map_err(|err| {
                    TelemetryError::InvalidMetricsAddress(raw.to_string(), err.to_string())
                })?;
                builder = builder.with_http_listener(socket);
            }

            builder
                .install_recorder()
                .map(Arc::new)
                .map_err(|err| TelemetryError::Metrics(err.to_string()))
        })
        .cloned()
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("invalid log filter: {0}")]
    InvalidLogFilter(String),
    #[error("installing the tracing subscriber failed: {0}")]
    Tracing(String),
    #[error("metrics address `{0}` does not parse: {1}")]
    InvalidMetricsAddress(String, String),
    #[error("installing the metrics recorder failed: {0}")]
    Metrics(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn telemetry_config_uses_defaults() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::remove_var("API_LOG_FILTER");
        env::remove_var("API_METRICS_ADDRESS");

        let cfg = TelemetryConfig::from_env("api");
        assert_eq!(cfg.log_filter(), "info");
        assert_eq!(cfg.metrics_address(), None);
    }

    #[test]
    fn telemetry_config_reads_env() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::set_var("API_LOG_FILTER", "debug");
        env::set_var("API_METRICS_ADDRESS", "127.0.0.1:9898");
        let cfg = TelemetryConfig::from_env("API");
        assert_eq!(cfg.log_filter(), "debug");
        assert_eq!(cfg.metrics_address(), Some("127.0.0.1:9898"));
        env::remove_var("API_LOG_FILTER");
        env::remove_var("API_METRICS_ADDRESS");
    }

    #[test]
    fn empty_metrics_address_is_treated_as_none() {
        let _guard = ENV_GUARD.lock().unwrap();
        env::set_var("API_METRICS_ADDRESS", "  ");
        let cfg = TelemetryConfig::from_env("API");
        assert_eq!(cfg.metrics_address(), None);
        env::remove_var("API_METRICS_ADDRESS");
    }
}
