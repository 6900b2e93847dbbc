//! Telemetry metric name constants and recording helpers.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `bedrock_gate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation`: step invoked ("classify", "retrieve", "generate")
//! - `status`: outcome: "ok" or "error"
//! - `category`: classification outcome ("a".."e", "unrecognized")
//! - `direction`: token direction: "input" or "output"

use std::time::Instant;

use crate::types::{Category, Usage};

/// Total requests issued by the gate components.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "bedrock_gate_requests_total";

/// Request duration in seconds.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "bedrock_gate_request_duration_seconds";

/// Total retry attempts (not counting the initial request).
///
/// Labels: `client`, `operation`.
pub const RETRIES_TOTAL: &str = "bedrock_gate_retries_total";

/// Total successful classifications.
///
/// Labels: `category`.
pub const CLASSIFICATIONS_TOTAL: &str = "bedrock_gate_classifications_total";

/// Total tokens reported by the model.
///
/// Labels: `operation`, `direction` ("input" | "output").
pub const TOKENS_TOTAL: &str = "bedrock_gate_tokens_total";

pub(crate) fn record_request(operation: &'static str, start: Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(REQUESTS_TOTAL,
        "operation" => operation,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(REQUEST_DURATION_SECONDS,
        "operation" => operation,
    )
    .record(start.elapsed().as_secs_f64());
}

pub(crate) fn record_classification(category: &Category) {
    metrics::counter!(CLASSIFICATIONS_TOTAL,
        "category" => category.metric_label(),
    )
    .increment(1);
}

pub(crate) fn record_token_usage(operation: &'static str, usage: &Usage) {
    metrics::counter!(TOKENS_TOTAL,
        "operation" => operation,
        "direction" => "input",
    )
    .increment(usage.input_tokens);
    metrics::counter!(TOKENS_TOTAL,
        "operation" => operation,
        "direction" => "output",
    )
    .increment(usage.output_tokens);
}
