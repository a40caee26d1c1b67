//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define dispatch metrics (requests by outcome, latency)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `dispatch_requests_total` (counter): requests by method and outcome
//! - `dispatch_duration_seconds` (histogram): resolution + handler latency
//!
//! # Design Decisions
//! - Outcome label is one of `invoked`, `no_route`, `not_invokable`, `fatal`
//! - Method label is a standard verb or `OTHER`; clients choose the verb, so
//!   it is never recorded verbatim
//! - Recording without an installed exporter is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::dispatch::{DispatchError, Invocation};

/// Install the Prometheus exporter with an HTTP listener on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

/// Label describing how a dispatch ended.
pub fn outcome(result: &Result<Invocation, DispatchError>) -> &'static str {
    match result {
        Ok(invocation) => invocation
            .degraded_from
            .as_ref()
            .map_or("invoked", DispatchError::kind),
        Err(e) => e.kind(),
    }
}

/// Label value for a request verb: one of the standard methods, else `OTHER`.
pub fn method_label(verb: &str) -> &'static str {
    static STANDARD: [Method; 9] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
        Method::HEAD,
        Method::OPTIONS,
        Method::CONNECT,
        Method::TRACE,
    ];
    STANDARD
        .iter()
        .find(|method| method.as_str() == verb)
        .map_or("OTHER", |method| method.as_str())
}

/// Record one dispatched request.
pub fn record_dispatch(verb: &str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "dispatch_requests_total",
        "method" => method_label(verb),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("dispatch_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Reply;

    #[test]
    fn test_outcome_labels() {
        let invoked = Invocation {
            handler: "H".into(),
            method: "m".into(),
            reply: Reply::text("ok"),
            degraded_from: None,
        };
        assert_eq!(outcome(&Ok(invoked.clone())), "invoked");

        let degraded = Invocation {
            degraded_from: Some(DispatchError::NoRouteMatch {
                verb: "GET".into(),
                path: "/".into(),
            }),
            ..invoked
        };
        assert_eq!(outcome(&Ok(degraded)), "no_route");

        let fatal = DispatchError::NotFoundNotInvokable { handler: None };
        assert_eq!(outcome(&Err(fatal)), "fatal");
    }

    #[test]
    fn test_method_label() {
        assert_eq!(method_label("GET"), "GET");
        assert_eq!(method_label("OPTIONS"), "OPTIONS");
        assert_eq!(method_label("get"), "OTHER");
        assert_eq!(method_label("PURGE"), "OTHER");
    }

    #[test]
    fn test_custom_verbs_share_one_series() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            for i in 0..50 {
                record_dispatch(&format!("X{}", i), "no_route", Instant::now());
            }
            record_dispatch("GET", "invoked", Instant::now());
        });

        let rendered = handle.render();
        let series: Vec<&str> = rendered
            .lines()
            .filter(|line| line.starts_with("dispatch_requests_total{"))
            .collect();
        assert_eq!(series.len(), 2);
        assert!(series
            .iter()
            .any(|line| line.contains(r#"method="OTHER""#) && line.ends_with(" 50")));
        assert!(series.iter().any(|line| line.contains(r#"method="GET""#)));
    }

    #[test]
    fn test_record_without_exporter() {
        record_dispatch("GET", "invoked", Instant::now());
    }
}
