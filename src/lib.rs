//! Mimir - tutoring gateway for AI explanation and solution requests
//!
//! This crate turns "explain topic X" / "solve problem P" queries into
//! responses by coordinating a primary AI provider (Gemini), an optional
//! secondary provider (OpenAI), a time-boxed result cache, a
//! per-fingerprint backoff tracker, and a deterministic solver for a
//! narrow class of math problems. When the upstream is rate limited the
//! service degrades to locally generated text instead of failing.
//!
//! # Running the server
//!
//! ```rust,no_run
//! use mimir::{Config, Server};
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let server = Server::new(Config::from_env());
//!     server.run().await
//! }
//! ```
//!
//! # Calling the orchestrator directly
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mimir::{GeminiClient, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> mimir::Result<()> {
//!     let primary = Arc::new(GeminiClient::new(Some("your-key".to_string())));
//!     let orchestrator = Orchestrator::new(primary, None);
//!
//!     let response = orchestrator.explain("Maths", "Real Numbers", false).await?;
//!     println!("{}", response.explanation);
//!     Ok(())
//! }
//! ```

pub mod backoff;
pub mod cache;
pub mod error;
pub mod orchestrator;
pub mod providers;
pub mod server;
pub mod solver;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use error::{MimirError, Result};
pub use orchestrator::Orchestrator;
pub use server::{Config, Server};

// Re-export orchestration state types
pub use backoff::BackoffTracker;
pub use cache::{CacheConfig, ResultCache};

// Re-export provider clients and their capability trait
pub use providers::{GeminiClient, OpenAiClient, TextProvider};

// Re-export request/response types
pub use types::{ExplainResponse, HealthResponse, Prompt, SolveResponse};
