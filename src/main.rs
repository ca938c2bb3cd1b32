use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, config_from_env, serve};
use triage_core::StoreKind;

/// Main entry point for the triage application
///
/// Serves the REST API (worklist, record management, classification and reports) on port 3000,
/// configurable via `TRIAGE_REST_ADDR`.
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENT_DATA_DIR`: Directory for patient data storage (default: "patient_data")
/// - `TRIAGE_STORE`: `file` or `memory` (default: "file")
/// - `API_KEY`: API key for the `x-api-key` header
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("triage_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let cfg = Arc::new(config_from_env()?);
    if cfg.store_kind() == StoreKind::File {
        tracing::info!(
            "++ Patient records stored under {}",
            cfg.patients_dir().display()
        );
    } else {
        tracing::warn!("++ In-memory patient store; records are lost on exit");
    }

    tracing::info!("++ Starting triage REST on {}", rest_addr);

    let state = AppState::new(cfg)?;
    serve(&rest_addr, state).await
}
