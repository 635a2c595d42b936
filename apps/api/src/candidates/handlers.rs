//! Axum route handlers for the Candidates API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::candidates::analytics::{compute_analytics, Analytics};
use crate::errors::{AppError, AppJson};
use crate::models::candidate::{CandidateProfile, CandidateUpdate, NewCandidate};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CreateCandidateResponse {
    pub candidate_id: String,
    pub candidate: CandidateProfile,
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<CandidateProfile>>, AppError> {
    Ok(Json(state.store.snapshot().await?))
}

/// POST /api/v1/candidates
///
/// Stores a profile produced by the external resume parser.
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    AppJson(new): AppJson<NewCandidate>,
) -> Result<(StatusCode, Json<CreateCandidateResponse>), AppError> {
    if new.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    validate_experience(Some(new.experience_years))?;

    let candidate = state.store.append(new).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateCandidateResponse {
            candidate_id: candidate.id.clone(),
            candidate,
        }),
    ))
}

/// GET /api/v1/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CandidateProfile>, AppError> {
    state
        .store
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}

/// PATCH /api/v1/candidates/:id
///
/// Reviewer corrections. Only the fields present in the body change.
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(update): AppJson<CandidateUpdate>,
) -> Result<Json<CandidateProfile>, AppError> {
    if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    validate_experience(update.experience_years)?;

    state
        .store
        .update(&id, update)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {id} not found")))
}

/// GET /api/v1/analytics
pub async fn handle_analytics(State(state): State<AppState>) -> Result<Json<Analytics>, AppError> {
    let candidates = state.store.snapshot().await?;
    Ok(Json(compute_analytics(&candidates)))
}

fn validate_experience(years: Option<f64>) -> Result<(), AppError> {
    match years {
        Some(y) if !y.is_finite() || y < 0.0 => Err(AppError::Validation(
            "experience_years must be a non-negative number".to_string(),
        )),
        _ => Ok(()),
    }
}
