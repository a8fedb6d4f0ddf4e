// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade; without an installed recorder every call is a
//! no-op.

use metrics::{describe_counter, describe_histogram};

/// Register all router metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!("courier_messages_total", "Inbound messages routed, by route");
    describe_counter!(
        "courier_rejected_total",
        "Inbound messages rejected by validation"
    );
    describe_counter!(
        "courier_authorization_denied_total",
        "Messages refused because the sender is not a friend or group member"
    );
    describe_counter!(
        "courier_deliveries_total",
        "Per-recipient enqueue attempts, by outcome"
    );
    describe_counter!(
        "courier_persist_failures_total",
        "Detached persistence calls that failed or timed out"
    );
    describe_histogram!(
        "courier_fanout_latency_seconds",
        "Time from classification to fan-out result"
    );
}

pub fn record_message(route: &'static str) {
    metrics::counter!("courier_messages_total", "route" => route).increment(1);
}

pub fn record_rejected() {
    metrics::counter!("courier_rejected_total").increment(1);
}

pub fn record_denied(route: &'static str) {
    metrics::counter!("courier_authorization_denied_total", "route" => route).increment(1);
}

pub fn record_delivery(ok: bool) {
    let outcome = if ok { "ok" } else { "failed" };
    metrics::counter!("courier_deliveries_total", "outcome" => outcome).increment(1);
}

pub fn record_persist_failure() {
    metrics::counter!("courier_persist_failures_total").increment(1);
}

pub fn record_latency(seconds: f64) {
    metrics::histogram!("courier_fanout_latency_seconds").record(seconds);
}
