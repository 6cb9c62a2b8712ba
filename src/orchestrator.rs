//! Per-request orchestration: backoff gate, result cache, deterministic
//! solver, and the primary/secondary provider chain.
//!
//! One [`Orchestrator`] lives for the process lifetime behind an `Arc` and
//! is handed to the HTTP layer as shared state. It owns the only mutable
//! state in the service (the cache and the backoff map); provider clients
//! stay side-effect free.
//!
//! Explain requests walk `backoff -> cache -> primary -> secondary` and
//! degrade to a locally generated explanation instead of failing when the
//! upstream is throttled. Solve requests try the deterministic solver
//! first and use the primary provider alone, with no caching.

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, instrument, warn};

use crate::backoff::BackoffTracker;
use crate::cache::{CacheConfig, ResultCache};
use crate::providers::TextProvider;
use crate::solver;
use crate::telemetry;
use crate::types::{ExplainResponse, Prompt};
use crate::Result;

/// System instruction sent with explain prompts so both providers answer
/// in the same voice.
const TUTOR_SYSTEM: &str = "You are a helpful Class 10 tutor. Keep it simple and clear.";

/// Shared orchestration state: the provider pair plus the cache and
/// backoff maps.
pub struct Orchestrator {
    primary: Arc<dyn TextProvider>,
    secondary: Option<Arc<dyn TextProvider>>,
    cache: ResultCache,
    backoff: BackoffTracker,
    solver_force_ai: bool,
}

impl Orchestrator {
    /// Create an orchestrator with the default cache configuration.
    ///
    /// `secondary` is optional; without it, throttled explain requests go
    /// straight to the degraded local response.
    pub fn new(primary: Arc<dyn TextProvider>, secondary: Option<Arc<dyn TextProvider>>) -> Self {
        Self {
            primary,
            secondary,
            cache: ResultCache::new(&CacheConfig::new()),
            backoff: BackoffTracker::new(),
            solver_force_ai: false,
        }
    }

    /// Replace the default cache configuration.
    pub fn with_cache_config(mut self, config: &CacheConfig) -> Self {
        self.cache = ResultCache::new(config);
        self
    }

    /// Route every solve request to the AI provider, skipping the
    /// deterministic solver (the `SOLVER_FORCE_GEMINI` override).
    pub fn with_solver_force_ai(mut self, force: bool) -> Self {
        self.solver_force_ai = force;
        self
    }

    /// Whether the primary provider has a credential. Logged at startup.
    pub fn primary_configured(&self) -> bool {
        self.primary.is_configured()
    }

    /// Whether a secondary provider is registered.
    pub fn has_secondary(&self) -> bool {
        self.secondary.is_some()
    }

    /// Produce an explanation of `topic` within `subject`.
    ///
    /// `force` demands the primary provider: the backoff gate is skipped,
    /// and a throttled primary with no secondary surfaces the throttle
    /// error instead of a degraded 200.
    #[instrument(skip(self), fields(operation = "explain"))]
    pub async fn explain(&self, subject: &str, topic: &str, force: bool) -> Result<ExplainResponse> {
        let start = Instant::now();
        let fingerprint = format!("{}-{}", subject, topic);

        // Without a primary credential the service runs in placeholder
        // mode rather than failing requests.
        if !self.primary.is_configured() {
            Self::record_degraded("explain", "no_credential");
            Self::record_request("explain", "none", start, true);
            return Ok(ExplainResponse::answer(
                placeholder_explanation(subject, topic),
                false,
            ));
        }

        if !force && self.backoff.is_blocked(&fingerprint) {
            let seconds = self.backoff.seconds_remaining(&fingerprint).unwrap_or(1);
            warn!(%fingerprint, seconds, "backoff active, serving local explanation");
            Self::record_degraded("explain", "backoff");
            Self::record_request("explain", "none", start, true);
            return Ok(ExplainResponse::degraded(
                heuristic_explanation(subject, topic),
                seconds,
            ));
        }

        if let Some(text) = self.cache.get(&fingerprint) {
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "operation" => "explain").increment(1);
            Self::record_request("explain", "cache", start, true);
            return Ok(ExplainResponse::answer(text, true));
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "operation" => "explain").increment(1);

        let prompt = explain_prompt(subject, topic);
        match self.primary.generate(&prompt).await {
            Ok(text) => {
                self.cache.put(fingerprint, text.clone());
                Self::record_request("explain", self.primary.name(), start, true);
                Ok(ExplainResponse::answer(text, false))
            }
            Err(err) if err.is_throttle() => {
                let seconds = err.retry_after_secs().unwrap_or(60);
                warn!(
                    %fingerprint,
                    provider = self.primary.name(),
                    seconds,
                    "primary throttled, entering backoff"
                );
                self.backoff.block(fingerprint.clone(), seconds);
                metrics::counter!(telemetry::BACKOFFS_TOTAL,
                    "provider" => self.primary.name().to_owned(),
                )
                .increment(1);

                if let Some(secondary) = &self.secondary {
                    match secondary.generate(&prompt).await {
                        Ok(text) => {
                            self.cache.put(fingerprint, text.clone());
                            Self::record_request("explain", secondary.name(), start, true);
                            return Ok(ExplainResponse::answer(text, false));
                        }
                        Err(fallback_err) => {
                            warn!(
                                provider = secondary.name(),
                                error = %fallback_err,
                                "secondary provider failed"
                            );
                        }
                    }
                }

                // A forced primary with nothing to fall back on surfaces
                // the throttle itself.
                if force && self.secondary.is_none() {
                    Self::record_request("explain", self.primary.name(), start, false);
                    return Err(err);
                }

                Self::record_degraded("explain", "throttled");
                Self::record_request("explain", self.primary.name(), start, true);
                Ok(ExplainResponse::degraded(
                    heuristic_explanation(subject, topic),
                    seconds,
                ))
            }
            Err(err) => {
                error!(
                    %fingerprint,
                    provider = self.primary.name(),
                    error = %err,
                    "explanation request failed"
                );
                Self::record_request("explain", self.primary.name(), start, false);
                Err(err)
            }
        }
    }

    /// Solve a free-text math problem.
    ///
    /// The deterministic solver runs first unless `force` or the
    /// process-wide override demands the AI provider. The solve path
    /// never consults the cache or the backoff map, and never falls back
    /// to the secondary provider.
    #[instrument(skip(self, problem), fields(operation = "solve"))]
    pub async fn solve(&self, problem: &str, force: bool) -> Result<String> {
        let start = Instant::now();

        if !force && !self.solver_force_ai {
            if let Some(solution) = solver::try_solve(problem) {
                metrics::counter!(telemetry::SOLVER_HITS_TOTAL,
                    "pattern" => solution.pattern.as_str(),
                )
                .increment(1);
                Self::record_request("solve", "solver", start, true);
                return Ok(solution.text());
            }
        }

        if !self.primary.is_configured() {
            Self::record_degraded("solve", "no_credential");
            Self::record_request("solve", "none", start, true);
            return Ok(placeholder_solution(problem));
        }

        match self.primary.generate(&solve_prompt(problem)).await {
            Ok(text) => {
                Self::record_request("solve", self.primary.name(), start, true);
                Ok(text)
            }
            Err(err) => {
                if err.is_throttle() {
                    warn!(
                        provider = self.primary.name(),
                        seconds = err.retry_after_secs(),
                        "primary throttled"
                    );
                } else {
                    error!(provider = self.primary.name(), error = %err, "solve request failed");
                }
                Self::record_request("solve", self.primary.name(), start, false);
                Err(err)
            }
        }
    }

    fn record_request(operation: &'static str, provider: &str, start: Instant, ok: bool) {
        let status = if ok { "ok" } else { "error" };
        let elapsed = start.elapsed().as_secs_f64();
        metrics::counter!(telemetry::REQUESTS_TOTAL,
            "provider" => provider.to_owned(),
            "operation" => operation,
            "status" => status,
        )
        .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
            "provider" => provider.to_owned(),
            "operation" => operation,
        )
        .record(elapsed);
    }

    fn record_degraded(operation: &'static str, reason: &'static str) {
        metrics::counter!(telemetry::DEGRADED_TOTAL,
            "operation" => operation,
            "reason" => reason,
        )
        .increment(1);
    }
}

fn explain_prompt(subject: &str, topic: &str) -> Prompt {
    Prompt::new(format!(
        "Explain \"{}\" in {} for Class 10 students in 4-5 simple, clear sentences. \
         Use easy-to-understand language and include a practical example if possible.",
        topic, subject
    ))
    .with_system(TUTOR_SYSTEM)
}

fn solve_prompt(problem: &str) -> Prompt {
    Prompt::new(format!(
        "Solve the following math problem step-by-step. Use concise, student-friendly \
         explanations and include formulas in LaTeX when appropriate. Problem: {}",
        problem
    ))
}

/// Explanation served when no primary credential is configured.
fn placeholder_explanation(subject: &str, topic: &str) -> String {
    format!(
        "This is a placeholder explanation for {} in {}. To get AI-generated \
         explanations, configure GEMINI_API_KEY in the server environment. A real \
         explanation would cover the key concepts, definitions, and examples for \
         this topic.",
        topic, subject
    )
}

/// Solution served when no primary credential is configured.
fn placeholder_solution(problem: &str) -> String {
    format!(
        "Placeholder solution. Configure GEMINI_API_KEY in the server environment \
         to get AI-generated, step-by-step solutions.\n\nProblem: {}",
        problem
    )
}

/// Locally generated explanation served while the primary provider is
/// throttled. Branches on math subjects and always discloses that it is
/// a fallback.
fn heuristic_explanation(subject: &str, topic: &str) -> String {
    if subject.to_lowercase().contains("math") {
        format!(
            "Here's a quick overview of {}:\n\n\
             • Understand the core definition and when it applies.\n\
             • Review the standard formula or method step by step.\n\
             • Work through one simple example, then a slightly harder one.\n\
             • Practice a few problems on your own to build confidence.\n\n\
             Note: AI explanations are temporarily rate limited. This is a local \
             fallback summary.",
            topic
        )
    } else {
        format!(
            "Quick overview of {} ({}): this topic covers the essential ideas you \
             need for Class 10. Focus on the definition, one worked example, and \
             the mistakes students commonly make.\n\n\
             Note: AI explanations are temporarily rate limited. This is a local \
             fallback summary.",
            topic, subject
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_prompt_carries_system_instruction() {
        let prompt = explain_prompt("Maths", "Real Numbers");
        assert_eq!(prompt.system.as_deref(), Some(TUTOR_SYSTEM));
        assert!(prompt.user.contains("\"Real Numbers\""));
        assert!(prompt.user.contains("in Maths"));
    }

    #[test]
    fn solve_prompt_embeds_problem_verbatim() {
        let prompt = solve_prompt("Is 7/20 terminating?");
        assert!(prompt.system.is_none());
        assert!(prompt.user.ends_with("Problem: Is 7/20 terminating?"));
    }

    #[test]
    fn placeholders_name_the_required_credential() {
        assert!(placeholder_explanation("Science", "Light").contains("GEMINI_API_KEY"));
        assert!(placeholder_solution("2+2").contains("GEMINI_API_KEY"));
        assert!(placeholder_solution("2+2").ends_with("Problem: 2+2"));
    }

    #[test]
    fn heuristic_branches_on_math_subject() {
        let math = heuristic_explanation("Mathematics", "Quadratic Equations");
        assert!(math.contains("•"));
        let generic = heuristic_explanation("History", "Nationalism");
        assert!(!generic.contains("•"));
        for text in [&math, &generic] {
            assert!(text.contains("rate limited"));
            assert!(text.contains("fallback"));
        }
    }
}
