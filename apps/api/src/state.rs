use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm_client::Completion;
use crate::search::pipeline::SearchSettings;
use crate::search::prefilter::PrefilterPolicy;
use crate::search::ranker::RankConfig;
use crate::search::scoring::MatchScorer;
use crate::store::CandidateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CandidateStore>,
    /// Pluggable match scorer. LlmMatchScorer with an API key, KeywordMatchScorer without.
    pub scorer: Arc<dyn MatchScorer>,
    /// Model used for query extraction when heuristics find nothing.
    pub llm: Option<Arc<dyn Completion>>,
    pub config: Config,
}

impl AppState {
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            max_concurrent_calls: self.config.max_concurrent_ai_calls,
            call_timeout: Duration::from_secs(self.config.ai_call_timeout_secs),
            rank: RankConfig {
                min_score: self.config.search_min_score,
                max_results: self.config.search_max_results,
            },
            prefilter: PrefilterPolicy {
                hard_location: self.config.hard_filter_location,
                hard_seniority: self.config.hard_filter_seniority,
            },
        }
    }
}
