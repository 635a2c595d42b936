mod candidates;
mod config;
mod errors;
mod llm_client;
mod models;
mod routes;
mod search;
mod state;
mod store;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{Completion, LlmClient};
use crate::routes::build_router;
use crate::search::scoring::{KeywordMatchScorer, LlmMatchScorer, MatchScorer};
use crate::state::AppState;
use crate::store::CandidateStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HireAI API v{}", env!("CARGO_PKG_VERSION"));

    // Open (or create) the candidate store
    let store = CandidateStore::open(&config.candidates_file)
        .await
        .with_context(|| format!("Failed to open candidate store at {}", config.candidates_file))?;

    // Initialize LLM client and pick the match scorer
    let (llm, scorer): (Option<Arc<dyn Completion>>, Arc<dyn MatchScorer>) =
        match &config.gemini_api_key {
            Some(key) => {
                let client = LlmClient::new(
                    key.clone(),
                    config.gemini_model.clone(),
                    config.gemini_api_base.clone(),
                )?;
                info!("LLM client initialized (model: {})", client.model());
                let llm: Arc<dyn Completion> = Arc::new(client);
                (Some(llm.clone()), Arc::new(LlmMatchScorer::new(llm)))
            }
            None => {
                warn!("GEMINI_API_KEY not set; using keyword matching without AI scoring");
                (None, Arc::new(KeywordMatchScorer))
            }
        };
    info!(
        "Match scorer: {} (max {} concurrent calls, {}s timeout)",
        scorer.backend(),
        config.max_concurrent_ai_calls,
        config.ai_call_timeout_secs
    );

    // Build app state
    let state = AppState {
        store: Arc::new(store),
        scorer,
        llm,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the recruiter UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
