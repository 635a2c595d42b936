use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

/// GET /health
/// Reports service version, whether AI scoring is configured, and the store size.
pub async fn health_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let total_candidates = state.store.snapshot().await?.len();

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "hireai-api",
        "ai_enabled": state.config.ai_enabled(),
        "scorer": state.scorer.backend(),
        "total_candidates": total_candidates
    })))
}
