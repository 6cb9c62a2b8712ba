//! Telemetry metric name constants.
//!
//! Centralised metric names for mimir operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider` — provider name (e.g. "gemini", "openai")
//! - `operation` — request kind: "explain" or "solve"
//! - `status` — outcome: "ok" or "error"

/// Total provider requests dispatched by the orchestrator.
///
/// Labels: `provider`, `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "mimir_requests_total";

/// Provider request duration in seconds.
///
/// Labels: `provider`, `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "mimir_request_duration_seconds";

/// Total cache hits against the result cache.
///
/// Labels: `operation`.
pub const CACHE_HITS_TOTAL: &str = "mimir_cache_hits_total";

/// Total cache misses against the result cache.
///
/// Labels: `operation`.
pub const CACHE_MISSES_TOTAL: &str = "mimir_cache_misses_total";

/// Total backoff activations (a provider throttled and a deadline was set).
///
/// Labels: `provider`.
pub const BACKOFFS_TOTAL: &str = "mimir_backoffs_total";

/// Total degraded responses (heuristic or placeholder text served).
///
/// Labels: `operation`, `reason` ("backoff" | "throttled" | "no_credential").
pub const DEGRADED_TOTAL: &str = "mimir_degraded_total";

/// Total prompts answered by the deterministic local solver.
///
/// Labels: `pattern` ("terminating_decimal" | "rationality").
pub const SOLVER_HITS_TOTAL: &str = "mimir_solver_hits_total";
