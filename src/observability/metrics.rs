//! Metrics collection and exposition.
//!
//! # Metrics
//! - `interceptor_calls_total` (counter): intercepted calls by route
//! - `interceptor_outcomes_total` (counter): passthrough / rewritten / fail_open by route
//! - `interceptor_relay_total` (counter): relay attempts by result
//!
//! Without an installed recorder every update is a no-op.

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::RouteClass;

/// How an intercepted call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passthrough,
    Rewritten,
    FailOpen,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Passthrough => "passthrough",
            Outcome::Rewritten => "rewritten",
            Outcome::FailOpen => "fail_open",
        }
    }
}

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_call(route: RouteClass) {
    metrics::counter!("interceptor_calls_total", "route" => route.as_str()).increment(1);
}

pub fn record_outcome(route: RouteClass, outcome: Outcome) {
    metrics::counter!(
        "interceptor_outcomes_total",
        "route" => route.as_str(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
}

pub fn record_relay(success: bool) {
    let result = if success { "success" } else { "failure" };
    metrics::counter!("interceptor_relay_total", "result" => result).increment(1);
}
