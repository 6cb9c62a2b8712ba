//! Upstream text-generation providers.
//!
//! The primary (Gemini) and secondary (OpenAI) clients implement the
//! [`TextProvider`] trait, so the orchestrator dispatches to them without
//! per-vendor call sites. Both classify failures identically: 429 →
//! rate-limited, 503 → overloaded (each with a wait hint from
//! [`hint`]), other non-2xx → API error, empty 2xx → empty response.

pub mod gemini;
pub mod hint;
pub mod openai;
pub mod traits;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
pub use traits::TextProvider;
