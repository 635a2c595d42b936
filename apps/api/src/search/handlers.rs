//! Axum route handlers for the Search API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppJson};
use crate::search::pipeline::{run_search, validate_query, RankedCandidate, SearchRequest};
use crate::search::query_parser::{parse_query, ParsedQuery};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseQueryRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct ParseQueryResponse {
    pub query: String,
    pub parsed: ParsedQuery,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/search
///
/// Body: `{"job_description": "...", "filters": {...}?}`. Returns the ranked
/// matches as a bare JSON array; no matches is `[]`.
pub async fn handle_search(
    State(state): State<AppState>,
    AppJson(request): AppJson<SearchRequest>,
) -> Result<Json<Vec<RankedCandidate>>, AppError> {
    search(&state, request).await
}

/// GET /api/v1/search?job_description=...
pub async fn handle_search_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<RankedCandidate>>, AppError> {
    let request = SearchRequest {
        job_description: params.job_description,
        filters: None,
    };
    search(&state, request).await
}

async fn search(
    state: &AppState,
    request: SearchRequest,
) -> Result<Json<Vec<RankedCandidate>>, AppError> {
    let matches = run_search(
        &state.store,
        state.scorer.as_ref(),
        state.llm.as_deref(),
        request,
        state.search_settings(),
    )
    .await?;

    Ok(Json(matches))
}

/// POST /api/v1/search/parse
///
/// Previews how a query is interpreted without scoring anyone.
pub async fn handle_parse_query(
    State(state): State<AppState>,
    AppJson(request): AppJson<ParseQueryRequest>,
) -> Result<Json<ParseQueryResponse>, AppError> {
    validate_query(&request.job_description)?;

    let parsed = parse_query(&request.job_description, state.llm.as_deref()).await;

    Ok(Json(ParseQueryResponse {
        query: request.job_description,
        parsed,
    }))
}
