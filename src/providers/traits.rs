//! Provider trait for text generation.
//!
//! Primary and secondary providers implement one capability trait so the
//! orchestrator can try them in priority order without vendor-specific
//! branches. Mock implementations in the test suite use the same trait.

use async_trait::async_trait;

use crate::Result;
use crate::types::Prompt;

/// A remote text-generation endpoint.
///
/// # Failure contract
///
/// `generate` returns a classified error, never a panic:
/// [`MissingCredential`](crate::MimirError::MissingCredential) before any
/// network call when no key is configured,
/// [`RateLimited`](crate::MimirError::RateLimited) /
/// [`Overloaded`](crate::MimirError::Overloaded) for HTTP 429/503 with a
/// resolved wait hint, [`Api`](crate::MimirError::Api) for other non-2xx
/// statuses, [`EmptyResponse`](crate::MimirError::EmptyResponse) when a
/// 2xx body carries no text, and [`Http`](crate::MimirError::Http) for
/// transport failures.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Provider name for logging/metrics.
    fn name(&self) -> &str;

    /// Whether a credential is configured. The orchestrator uses this to
    /// pick placeholder responses and to decide if a fallback exists.
    fn is_configured(&self) -> bool;

    /// Generate text for the prompt and return it trimmed.
    async fn generate(&self, prompt: &Prompt) -> Result<String>;
}
