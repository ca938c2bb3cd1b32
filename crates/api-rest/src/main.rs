//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `triage-run` binary serves the same
//! router with production defaults.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{config_from_env, serve, AppState};

/// Main entry point for the triage REST API server
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PATIENT_DATA_DIR`, `TRIAGE_STORE`, `API_KEY`: see [`config_from_env`]
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration or patient store is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting triage REST API on {}", addr);

    let cfg = Arc::new(config_from_env()?);
    let state = AppState::new(cfg)?;

    serve(&addr, state).await
}
