mod autosave;
mod codec;
mod config;
mod draft;
mod errors;
mod form;
mod generation;
mod models;
mod render;
mod routes;
mod state;
mod storage;

use anyhow::Result;
use std::net::SocketAddr;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::draft::{DraftSession, LoadOutcome};
use crate::generation::{HttpGenerator, Submitter};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FileStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Draft storage
    let storage = Arc::new(FileStorage::new(&config.storage_dir));
    info!("Draft storage at {}", config.storage_dir);

    // Restore the last saved draft, if any
    let mut draft = DraftSession::new(
        storage,
        config.storage_key.clone(),
        config.autosave_debounce,
    );
    match draft.load().await {
        Ok(LoadOutcome::Restored { .. }) => info!("Restored saved draft"),
        Ok(LoadOutcome::Empty) => info!("No saved draft, starting fresh"),
        Ok(LoadOutcome::Unusable { reason }) => {
            warn!("Saved draft could not be read, starting fresh: {reason}")
        }
        Err(e) => warn!("Could not load saved draft: {e}"),
    }

    // Document-generation endpoint
    let generator = HttpGenerator::new(config.generator_url.clone(), config.generator_timeout)?;
    info!("Document endpoint: {}", config.generator_url);

    let state = AppState {
        draft: Arc::new(Mutex::new(draft)),
        submitter: Arc::new(Submitter::new(Arc::new(generator))),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
