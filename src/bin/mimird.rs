//! mimird — Mimir daemon.
//!
//! Serves the explanation/solution orchestrator over HTTP for the
//! tutoring UI.

use clap::Parser;
use tracing::{info, warn};

use mimir::{Config, Server};

/// Mimir daemon — tutoring gateway service.
#[derive(Parser)]
#[command(name = "mimird")]
#[command(version = mimir::version::PKG_VERSION)]
#[command(about = "Mimir tutoring gateway daemon")]
struct Args {
    /// Port to bind (overrides PORT).
    #[arg(short, long)]
    port: Option<u16>,
    /// Host to bind (overrides HOST).
    #[arg(long)]
    host: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: mimir=info; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mimir=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }

    let server = Server::new(config);
    info!(
        version = mimir::version::version_string(),
        primary_configured = server.orchestrator().primary_configured(),
        secondary_configured = server.orchestrator().has_secondary(),
        "mimird starting"
    );
    if !server.orchestrator().primary_configured() {
        warn!("GEMINI_API_KEY not set, serving placeholder responses");
    }

    server.run().await?;
    Ok(())
}
