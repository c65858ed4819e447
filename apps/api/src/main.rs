mod config;
mod engine;
mod errors;
mod llm_client;
mod routes;
mod rubrics;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::engine::llm_recommend::{LlmRecommender, Recommender, RuleBasedRecommender};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::rubrics::RubricSet;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("waypoint_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Waypoint API v{}", env!("CARGO_PKG_VERSION"));

    // Build the static rubrics; a malformed table stops startup here.
    let rubrics = Arc::new(RubricSet::build()?);
    info!("Scoring rubrics validated (offers, contacts)");

    // Select the recommendation backend
    let recommender: Arc<dyn Recommender> = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(
                key.clone(),
                Duration::from_secs(config.llm_timeout_secs),
            );
            info!(
                "AI recommendations enabled (model: {}, timeout: {}s, rule-based fallback)",
                llm_client::MODEL,
                config.llm_timeout_secs
            );
            Arc::new(LlmRecommender::new(llm))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set, using rule-based recommendations");
            Arc::new(RuleBasedRecommender)
        }
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        rubrics,
        recommender,
    };

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
