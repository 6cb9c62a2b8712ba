//! OpenAI Chat Completions client, used as the fallback text provider.
//!
//! See: <https://platform.openai.com/docs/api-reference/chat>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::hint::classify_failure;
use super::traits::TextProvider;
use crate::types::Prompt;
use crate::{MimirError, Result};

/// Default endpoint for chat completions.
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default chat model when none is configured.
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Client for the OpenAI chat completions API.
///
/// A `None` or blank key leaves the client unconfigured: `generate`
/// fails with `MissingCredential` before touching the network.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: Option<String>,
    model: String,
    http: Client,
    endpoint: String,
}

impl OpenAiClient {
    /// Create a client against the production endpoint. A `None` model
    /// falls back to `gpt-4o-mini`.
    pub fn new(api_key: Option<String>, model: Option<String>) -> Self {
        Self::with_endpoint(api_key, model, DEFAULT_ENDPOINT)
    }

    /// Create a client with a custom endpoint (for testing with wiremock).
    pub fn with_endpoint(
        api_key: Option<String>,
        model: Option<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: model
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            http,
            endpoint: endpoint.into(),
        }
    }

    async fn generate_text(&self, prompt: &Prompt) -> Result<String> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(MimirError::MissingCredential {
                provider: "openai".to_string(),
            });
        };

        let mut messages = Vec::new();
        if let Some(system) = &prompt.system {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }
        messages.push(Message {
            role: "user",
            content: &prompt.user,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .json(&ChatRequest {
                model: &self.model,
                messages,
                temperature: 0.2,
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

        let parsed: ChatResponse = serde_json::from_str(&body)?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        let text = text.trim();
        if text.is_empty() {
            return Err(MimirError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

// ============================================================================
// Provider Trait Implementation
// ============================================================================

#[async_trait]
impl TextProvider for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        self.generate_text(prompt).await
    }
}
