//! Metrics collection and exposition.
//!
//! # Metrics
//! - `login_check_decisions_total` (counter): gatekeeper outcomes by `outcome`
//! - `logins_total` (counter): login attempts by `kind` and `result`
//!
//! Recording is a no-op until a recorder is installed, so tests and
//! metrics-disabled deployments pay nothing.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder with an HTTP scrape listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_decision(outcome: &'static str) {
    ::metrics::counter!("login_check_decisions_total", "outcome" => outcome).increment(1);
}

pub fn record_login(kind: &'static str, result: &'static str) {
    ::metrics::counter!("logins_total", "kind" => kind, "result" => result).increment(1);
}
