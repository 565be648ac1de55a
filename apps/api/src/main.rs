mod agent;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod screening;
mod sources;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::agent::actions::default_registry;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::sources::{load_job_requirements, load_resumes};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Sift API v{}", env!("CARGO_PKG_VERSION"));

    // Load external sources wholesale; both are immutable for the process lifetime
    let candidates = load_resumes(&config.resumes_csv_path)?;
    let job_requirements = load_job_requirements(&config.job_requirements_path)?;

    // Initialize LLM client
    let llm = LlmClient::new(config.openrouter_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Build the action catalog once; it is shared read-only by every session
    let registry = default_registry();
    info!("Action registry initialized ({} actions)", registry.len());

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        registry: Arc::new(registry),
        candidates: Arc::new(candidates),
        job_requirements: Arc::from(job_requirements),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
