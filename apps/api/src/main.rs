mod chat;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod projects;
mod reports;
mod routes;
mod routing;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, IN_MEMORY_DATABASE};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::projects::store::{MemorySnapshotStore, SnapshotStore, SqliteSnapshotStore};
use crate::projects::ProjectManager;
use crate::routes::build_router;
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

    info!("Starting TriGuard API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize project storage
    let store: Arc<dyn SnapshotStore> = if config.database_url == IN_MEMORY_DATABASE {
        warn!("DATABASE_URL=memory, projects will not survive a restart");
        Arc::new(MemorySnapshotStore::default())
    } else {
        Arc::new(SqliteSnapshotStore::new(create_pool(&config.database_url).await?))
    };
    let projects = Arc::new(ProjectManager::new(store));

    // Initialize LLM client
    let llm = LlmClient::new(
        config.gemini_api_key.clone(),
        config.report_model.clone(),
        config.chat_model.clone(),
    )?;
    info!(
        "LLM client initialized (reports: {}, chat: {})",
        llm.report_model(),
        llm.chat_model()
    );

    let state = AppState::new(Arc::new(llm), projects);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
