//! Search Pipeline — orchestrates one natural-language candidate search.
//!
//! Flow: validate → snapshot → parse query → apply explicit filters →
//!       prefilter → bounded-concurrency scoring fan-out → rank → assemble.
//!
//! Nothing is written during a search. The scoring futures are owned by the
//! request future, so a dropped request abandons any in-flight model calls.

use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::llm_client::Completion;
use crate::models::candidate::CandidateProfile;
use crate::search::prefilter::{prefilter, PrefilterPolicy};
use crate::search::query_parser::{apply_overrides, parse_query, ExplicitFilters};
use crate::search::ranker::{rank, RankConfig};
use crate::search::scoring::{MatchResult, MatchScorer, ScoreOutcome, SearchContext};
use crate::store::CandidateStore;

/// Longest accepted query, in characters.
pub const MAX_QUERY_CHARS: usize = 10_000;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct SearchSettings {
    /// Semaphore permits for scoring calls. Zero is treated as one.
    pub max_concurrent_calls: usize,
    pub call_timeout: Duration,
    pub rank: RankConfig,
    pub prefilter: PrefilterPolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_concurrent_calls: 5,
            call_timeout: Duration::from_secs(30),
            rank: RankConfig::default(),
            prefilter: PrefilterPolicy::default(),
        }
    }
}

/// Request body for a search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    pub job_description: String,
    #[serde(default)]
    pub filters: Option<ExplicitFilters>,
}

/// One entry of the ranked response: display fields plus the match verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub experience_years: f64,
    pub skills: Vec<String>,
    pub match_score: u8,
    pub match_reasons: Vec<String>,
    pub strengths: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl RankedCandidate {
    fn assemble(profile: &CandidateProfile, result: MatchResult) -> Self {
        RankedCandidate {
            id: profile.id.clone(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            location: profile.location.clone(),
            experience_years: profile.experience_years,
            skills: profile.skills.clone(),
            match_score: result.match_score,
            match_reasons: result.match_reasons,
            strengths: result.strengths,
            missing_skills: result.missing_skills,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Rejects empty and oversized query text.
pub fn validate_query(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("job_description cannot be empty".to_string()));
    }
    if text.chars().count() > MAX_QUERY_CHARS {
        return Err(AppError::Validation(format!(
            "job_description cannot exceed {MAX_QUERY_CHARS} characters"
        )));
    }
    Ok(())
}

/// Runs one search and returns the ranked matches (possibly empty).
///
/// `extractor` is the model used for query extraction when heuristics find
/// nothing; `None` keeps parsing purely heuristic.
pub async fn run_search(
    store: &CandidateStore,
    scorer: &dyn MatchScorer,
    extractor: Option<&dyn Completion>,
    request: SearchRequest,
    settings: SearchSettings,
) -> Result<Vec<RankedCandidate>, AppError> {
    validate_query(&request.job_description)?;
    let started = Instant::now();

    // Snapshot-at-read: later writes are not visible to this search.
    let candidates = store.snapshot().await?;
    if candidates.is_empty() {
        info!("Search skipped: candidate store is empty");
        return Ok(Vec::new());
    }

    let mut parsed = parse_query(&request.job_description, extractor).await;
    if let Some(overrides) = &request.filters {
        apply_overrides(&mut parsed, overrides);
    }
    debug!("Search filter ({:?}): {:?}", parsed.source, parsed.filter);

    let subset = prefilter(&candidates, &parsed.filter, settings.prefilter);
    if subset.is_empty() {
        info!(
            "Search matched 0 of {} candidates in prefilter; no scoring calls made",
            candidates.len()
        );
        return Ok(Vec::new());
    }

    let context = SearchContext {
        job_description: &request.job_description,
        filter: &parsed.filter,
    };
    let (results, degraded) = score_all(scorer, &subset, context, settings).await;
    if degraded > 0 {
        warn!(
            "{degraded} of {} candidates received a degraded score",
            results.len()
        );
    }

    // `results[i]` belongs to `subset[i]`; join by position since ids may repeat.
    let matches: Vec<RankedCandidate> = rank(&results, settings.rank)
        .into_iter()
        .map(|i| RankedCandidate::assemble(subset[i], results[i].clone()))
        .collect();

    info!(
        "Search complete: {} candidates, {} prefiltered, {} scored by {}, {} returned in {:?}",
        candidates.len(),
        subset.len(),
        results.len(),
        scorer.backend(),
        matches.len(),
        started.elapsed()
    );

    Ok(matches)
}

/// Scores every candidate with at most `max_concurrent_calls` in flight.
/// Results come back in input order; the second value counts degraded scores.
async fn score_all(
    scorer: &dyn MatchScorer,
    subset: &[&CandidateProfile],
    context: SearchContext<'_>,
    settings: SearchSettings,
) -> (Vec<MatchResult>, usize) {
    let semaphore = Semaphore::new(settings.max_concurrent_calls.max(1));

    let calls = subset.iter().map(|candidate| {
        let semaphore = &semaphore;
        async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return (MatchResult::degraded(&candidate.id), true);
            };

            match tokio::time::timeout(settings.call_timeout, scorer.score(candidate, context)).await
            {
                Ok(Ok(outcome @ ScoreOutcome::Parsed { .. })) => {
                    (MatchResult::from_outcome(&candidate.id, outcome), false)
                }
                Ok(Ok(ScoreOutcome::Unparseable)) => {
                    warn!("Unparseable score response for candidate {}", candidate.id);
                    (MatchResult::degraded(&candidate.id), true)
                }
                Ok(Err(e)) => {
                    warn!("Scoring failed for candidate {}: {e}", candidate.id);
                    (MatchResult::degraded(&candidate.id), true)
                }
                Err(_) => {
                    warn!(
                        "Scoring timed out after {:?} for candidate {}",
                        settings.call_timeout, candidate.id
                    );
                    (MatchResult::degraded(&candidate.id), true)
                }
            }
        }
    });

    let outcomes = join_all(calls).await;
    let degraded = outcomes.iter().filter(|(_, failed)| *failed).count();
    (outcomes.into_iter().map(|(result, _)| result).collect(), degraded)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
