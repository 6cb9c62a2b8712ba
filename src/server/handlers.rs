//! HTTP request handlers for mimird.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::Utc;
use serde::Deserialize;

use crate::orchestrator::Orchestrator;
use crate::types::{ExplainResponse, HealthResponse, SolveResponse};
use crate::{MimirError, Result};

/// Query string accepted by explain and solve.
#[derive(Debug, Default, Deserialize)]
pub struct ForceQuery {
    force: Option<String>,
}

impl ForceQuery {
    /// True when the caller demands the primary provider.
    fn force_primary(&self) -> bool {
        self.force
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("gemini"))
    }
}

/// Body of a solve request.
#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    prompt: Option<String>,
}

/// GET /api/explain/{subject}/{topic}
pub async fn explain(
    State(state): State<Arc<Orchestrator>>,
    Path((subject, topic)): Path<(String, String)>,
    Query(query): Query<ForceQuery>,
) -> Result<Json<ExplainResponse>> {
    let response = state
        .explain(&subject, &topic, query.force_primary())
        .await?;
    Ok(Json(response))
}

/// POST /api/solve
///
/// Rejects an absent or blank prompt with 400 before any processing.
pub async fn solve(
    State(state): State<Arc<Orchestrator>>,
    Query(query): Query<ForceQuery>,
    Json(request): Json<SolveRequest>,
) -> Result<Json<SolveResponse>> {
    let prompt = request
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| MimirError::InvalidInput("Missing prompt".to_string()))?;

    let solution = state.solve(prompt, query.force_primary()).await?;
    Ok(Json(SolveResponse { solution }))
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_query_matches_case_insensitively() {
        for value in ["gemini", "Gemini", "GEMINI"] {
            let query = ForceQuery {
                force: Some(value.to_string()),
            };
            assert!(query.force_primary(), "{value} should force the primary");
        }
    }

    #[test]
    fn force_query_rejects_other_values() {
        assert!(!ForceQuery::default().force_primary());
        let query = ForceQuery {
            force: Some("openai".to_string()),
        };
        assert!(!query.force_primary());
    }

    #[test]
    fn solve_request_deserializes_missing_prompt() {
        let request: SolveRequest = serde_json::from_str("{}").unwrap();
        assert!(request.prompt.is_none());

        let request: SolveRequest = serde_json::from_str(r#"{"prompt":"2 + 2"}"#).unwrap();
        assert_eq!(request.prompt.as_deref(), Some("2 + 2"));
    }
}
