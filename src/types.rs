//! Request and response types shared between the orchestrator and the
//! HTTP layer.

use serde::{Deserialize, Serialize};

/// A prompt handed to a text provider.
///
/// The user text is always present; the optional system instruction is
/// mapped onto whatever the provider's wire format offers (a system
/// message for chat-completions APIs, a leading part for generateContent).
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: Option<String>,
    pub user: String,
}

impl Prompt {
    /// Create a prompt from user text.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
        }
    }

    /// Attach a system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Body of a successful or degraded explain response.
///
/// `rate_limited`/`retry_after_seconds` are present only when the text is
/// a heuristic substitute served while the primary provider is throttled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainResponse {
    pub explanation: String,
    pub cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

impl ExplainResponse {
    /// A fresh or cached answer with no degradation metadata.
    pub fn answer(explanation: impl Into<String>, cached: bool) -> Self {
        Self {
            explanation: explanation.into(),
            cached,
            rate_limited: None,
            retry_after_seconds: None,
        }
    }

    /// A heuristic answer served while the upstream is throttled.
    pub fn degraded(explanation: impl Into<String>, retry_after_seconds: u64) -> Self {
        Self {
            explanation: explanation.into(),
            cached: false,
            rate_limited: Some(true),
            retry_after_seconds: Some(retry_after_seconds),
        }
    }
}

/// Body of a successful solve response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub solution: String,
}

/// Body of the liveness probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_builder() {
        let p = Prompt::new("solve this").with_system("be brief");
        assert_eq!(p.user, "solve this");
        assert_eq!(p.system.as_deref(), Some("be brief"));
    }

    #[test]
    fn explain_answer_omits_rate_limit_fields() {
        let body = serde_json::to_value(ExplainResponse::answer("text", true)).unwrap();
        assert_eq!(body["explanation"], "text");
        assert_eq!(body["cached"], true);
        assert!(body.get("rateLimited").is_none());
        assert!(body.get("retryAfterSeconds").is_none());
    }

    #[test]
    fn explain_degraded_serializes_camel_case() {
        let body = serde_json::to_value(ExplainResponse::degraded("text", 60)).unwrap();
        assert_eq!(body["rateLimited"], true);
        assert_eq!(body["retryAfterSeconds"], 60);
        assert_eq!(body["cached"], false);
    }
}
