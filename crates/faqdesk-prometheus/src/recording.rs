// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics. Without an installed recorder every call is a no-op.

use metrics::{describe_counter, describe_gauge};

/// Register all faqdesk metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "faqdesk_resolutions_total",
        "Questions resolved, labelled by the matching stage (or `none`)"
    );
    describe_counter!(
        "faqdesk_escalations_total",
        "Operator handoff events (requested, already_pending, forwarded, resolved)"
    );
    describe_gauge!(
        "faqdesk_pending_escalations",
        "Users with an open operator handoff"
    );
}

/// Record one resolution attempt. `stage` is the winning stage label or `none`.
pub fn record_resolution(stage: &str) {
    metrics::counter!("faqdesk_resolutions_total", "stage" => stage.to_string()).increment(1);
}

/// Record an escalation lifecycle event.
pub fn record_escalation(event: &'static str) {
    metrics::counter!("faqdesk_escalations_total", "event" => event).increment(1);
}

/// Set the number of open escalations.
pub fn set_pending_escalations(count: usize) {
    metrics::gauge!("faqdesk_pending_escalations").set(count as f64);
}
