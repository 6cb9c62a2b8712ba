//! Google Gemini text generation client.
//!
//! Calls the v1beta `generateContent` endpoint with the API key passed
//! as a query parameter. See: <https://ai.google.dev/api/generate-content>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::hint::classify_failure;
use super::traits::TextProvider;
use crate::types::Prompt;
use crate::{MimirError, Result};

/// Default endpoint for Gemini text generation.
const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash-latest:generateContent";

/// Client for the Gemini `generateContent` API.
///
/// A `None` or blank key leaves the client unconfigured: `generate`
/// fails with `MissingCredential` before touching the network.
#[derive(Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    http: Client,
    endpoint: String,
}

impl GeminiClient {
    /// Create a client against the production endpoint.
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Create a client with a custom endpoint (for testing with wiremock).
    pub fn with_endpoint(api_key: Option<String>, endpoint: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            http,
            endpoint: endpoint.into(),
        }
    }

    async fn generate_text(&self, prompt: &Prompt) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(MimirError::MissingCredential {
                provider: "gemini".to_string(),
            });
        };

        // This endpoint has no dedicated system role; system text rides
        // as the leading part of the single user turn.
        let mut parts = Vec::new();
        if let Some(system) = &prompt.system {
            parts.push(Part { text: system });
        }
        parts.push(Part { text: &prompt.user });

        let url = format!("{}?key={}", self.endpoint, api_key);
        let response = self
            .http
            .post(&url)
            .json(&GenerateContentRequest {
                contents: vec![Content { parts }],
            })
            .send()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| MimirError::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &headers, body));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(MimirError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl TextProvider for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        self.generate_text(prompt).await
    }
}
