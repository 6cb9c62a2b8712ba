//! Environment-driven configuration for mimird.
//!
//! Everything is read once at process start. Blank variables are treated
//! as unset, so `GEMINI_API_KEY=""` behaves the same as not exporting it.

/// Runtime configuration for the mimird server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind the server to.
    pub host: String,
    /// Port to bind the server to.
    pub port: u16,
    /// Primary provider credential. `None` runs the service in
    /// placeholder mode.
    pub gemini_api_key: Option<String>,
    /// Primary endpoint override (tests, proxies).
    pub gemini_api_url: Option<String>,
    /// Secondary provider credential. `None` disables the fallback.
    pub openai_api_key: Option<String>,
    /// Secondary endpoint override.
    pub openai_api_url: Option<String>,
    /// Secondary chat model.
    pub openai_model: Option<String>,
    /// Route every solve request to the AI provider, skipping the
    /// deterministic solver.
    pub solver_force_gemini: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            gemini_api_key: None,
            gemini_api_url: None,
            openai_api_key: None,
            openai_api_url: None,
            openai_model: None,
            solver_force_gemini: false,
        }
    }
}

impl Config {
    /// Read configuration from environment variables.
    ///
    /// A missing primary credential is not an error; the service starts
    /// in placeholder mode and says so at startup.
    pub fn from_env() -> Self {
        Self {
            host: env_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env_var("PORT").and_then(|p| p.parse().ok()).unwrap_or(3001),
            gemini_api_key: env_var("GEMINI_API_KEY"),
            gemini_api_url: env_var("GEMINI_API_URL"),
            openai_api_key: env_var("OPENAI_API_KEY"),
            openai_api_url: env_var("OPENAI_API_URL"),
            openai_model: env_var("OPENAI_MODEL"),
            solver_force_gemini: env_var("SOLVER_FORCE_GEMINI")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// The address the server binds to, as `host:port`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Read a variable, treating blank values as unset.
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
