mod backend;
mod config;
mod errors;
mod models;
mod radar;
mod routes;
mod scoring;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::backend::BackendClient;
use crate::config::Config;
use crate::radar::snapshot::Rasterizer;
use crate::routes::build_router;
use crate::scoring::reconciler::ScoreReconciler;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("radar_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Radar API v{}", env!("CARGO_PKG_VERSION"));

    let backend = BackendClient::new(config.backend_url.clone(), config.backend_token.clone())?;
    info!("Backend client initialized ({})", config.backend_url);

    let reconciler = ScoreReconciler::new(config.legacy_weights);
    info!("Legacy estimate weights: {:?}", reconciler.legacy_weights());

    // Font loading scans the system; keep it off the async workers.
    let rasterizer = tokio::task::spawn_blocking(Rasterizer::with_system_fonts).await?;

    let state = AppState {
        config: config.clone(),
        candidates: Arc::new(backend),
        reconciler,
        rasterizer,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
