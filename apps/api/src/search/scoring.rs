//! Match Scoring — pluggable, trait-based scorer for one candidate against one query.
//!
//! Default with an API key: `LlmMatchScorer` (one model call per candidate).
//! Without one: `KeywordMatchScorer` (pure-Rust, deterministic, no network).
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`, chosen at startup from config.

use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::prompts::{EVIDENCE_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{extract_json_object, strip_json_fences, Completion, LlmError};
use crate::models::candidate::CandidateProfile;
use crate::search::prefilter::{has_skill, location_matches};
use crate::search::prompts::{MATCH_SCORE_PROMPT_TEMPLATE, MATCH_SCORE_SYSTEM};
use crate::search::query_parser::StructuredFilter;
use crate::search::vocabulary::contains_term;

/// Reason attached to every degraded (zero) score.
pub const SCORING_UNAVAILABLE: &str = "scoring unavailable";

const MAX_REASONS: usize = 5;

static LABELLED_SCORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:match[_ ]?score|score)["']?\s*[:=]?\s*(?:is\s*)?(\d{1,3})\b"#)
        .expect("score regex is valid")
});

static OUT_OF_100_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,3})\b\s*(?:/\s*100\b|%)").expect("percent regex is valid")
});

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// The AI-derived verdict for one candidate. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: String,
    pub match_score: u8, // 0 – 100
    pub match_reasons: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

impl MatchResult {
    pub fn from_outcome(candidate_id: &str, outcome: ScoreOutcome) -> Self {
        match outcome {
            ScoreOutcome::Parsed {
                score,
                reasons,
                strengths,
                missing_skills,
            } => MatchResult {
                candidate_id: candidate_id.to_string(),
                match_score: score,
                match_reasons: reasons,
                strengths,
                missing_skills,
            },
            ScoreOutcome::Unparseable => Self::degraded(candidate_id),
        }
    }

    /// Score 0 with the generic reason; used for any per-candidate failure.
    pub fn degraded(candidate_id: &str) -> Self {
        MatchResult {
            candidate_id: candidate_id.to_string(),
            match_score: 0,
            match_reasons: vec![SCORING_UNAVAILABLE.to_string()],
            strengths: vec![],
            missing_skills: vec![],
        }
    }
}

/// Tagged result of interpreting a model response.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    Parsed {
        score: u8,
        reasons: Vec<String>,
        strengths: Vec<String>,
        missing_skills: Vec<String>,
    },
    Unparseable,
}

/// What every scorer sees about the search.
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub job_description: &'a str,
    pub filter: &'a StructuredFilter,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The match scorer trait. Implement this to swap backends without touching
/// the pipeline or handlers.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(
        &self,
        candidate: &CandidateProfile,
        context: SearchContext<'_>,
    ) -> Result<ScoreOutcome, LlmError>;

    /// Backend label ("llm" or "keyword") for logs and health output.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmMatchScorer
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmMatchScorer {
    llm: Arc<dyn Completion>,
}

impl LlmMatchScorer {
    pub fn new(llm: Arc<dyn Completion>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl MatchScorer for LlmMatchScorer {
    async fn score(
        &self,
        candidate: &CandidateProfile,
        context: SearchContext<'_>,
    ) -> Result<ScoreOutcome, LlmError> {
        let prompt = build_match_prompt(candidate, context);
        let system = format!("{MATCH_SCORE_SYSTEM} {JSON_ONLY_SYSTEM}");
        let text = self.llm.complete(&prompt, &system).await?;
        Ok(parse_score_response(&text))
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

pub fn build_match_prompt(candidate: &CandidateProfile, context: SearchContext<'_>) -> String {
    MATCH_SCORE_PROMPT_TEMPLATE
        .replace("{evidence_instruction}", EVIDENCE_INSTRUCTION)
        .replace("{job_description}", context.job_description.trim())
        .replace("{filter_context}", &describe_filter(context.filter))
        .replace("{candidate_profile}", &candidate_summary(candidate))
}

fn describe_filter(filter: &StructuredFilter) -> String {
    let mut lines = Vec::new();
    if !filter.required_skills.is_empty() {
        lines.push(format!("Required skills: {}", filter.required_skills.join(", ")));
    }
    if filter.min_experience_years > 0.0 {
        lines.push(format!("Minimum experience: {} years", filter.min_experience_years));
    }
    if let Some(location) = &filter.location {
        lines.push(format!("Preferred location: {location}"));
    }
    if filter.remote_ok {
        lines.push("Remote candidates acceptable".to_string());
    }
    if let Some(level) = filter.seniority_level {
        lines.push(format!("Preferred seniority: {}", level.as_str()));
    }
    if lines.is_empty() {
        "No explicit constraints".to_string()
    } else {
        lines.join("\n")
    }
}

/// Concise profile text for the prompt: top 3 roles, top 2 degrees.
pub fn candidate_summary(candidate: &CandidateProfile) -> String {
    let mut parts = vec![
        format!(
            "Name: {}",
            if candidate.name.is_empty() { "Unknown" } else { &candidate.name }
        ),
        format!("Years of Experience: {}", candidate.experience_years),
    ];

    if let Some(location) = &candidate.location {
        parts.push(format!("Location: {location}"));
    }
    if !candidate.skills.is_empty() {
        parts.push(format!("Skills: {}", candidate.skills.join(", ")));
    }
    if !candidate.experience.is_empty() {
        let mut text = "Work Experience:".to_string();
        for job in candidate.experience.iter().take(3) {
            text.push_str(&format!("\n- {} at {}", or_unknown(&job.title), or_unknown(&job.company)));
        }
        parts.push(text);
    }
    if !candidate.education.is_empty() {
        let mut text = "Education:".to_string();
        for edu in candidate.education.iter().take(2) {
            text.push_str(&format!(
                "\n- {} from {}",
                or_unknown(&edu.degree),
                or_unknown(&edu.institution)
            ));
        }
        parts.push(text);
    }
    if let Some(summary) = candidate.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        parts.push(format!("Summary: {}", summary.trim()));
    }

    parts.join("\n\n")
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "Unknown"
    } else {
        value
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tolerant response parsing
// ────────────────────────────────────────────────────────────────────────────

/// Interprets a model response: JSON first, then the outermost `{...}`, then a
/// regex for a 0–100 score. Anything else is `Unparseable`.
pub fn parse_score_response(text: &str) -> ScoreOutcome {
    let cleaned = strip_json_fences(text);

    if let Some(outcome) = parse_json_outcome(cleaned) {
        return outcome;
    }
    if let Some(outcome) = extract_json_object(cleaned).and_then(parse_json_outcome) {
        return outcome;
    }

    match extract_score_from_text(cleaned) {
        Some(score) => ScoreOutcome::Parsed {
            score,
            reasons: vec!["score extracted from an unstructured AI response".to_string()],
            strengths: vec![],
            missing_skills: vec![],
        },
        None => ScoreOutcome::Unparseable,
    }
}

fn parse_json_outcome(text: &str) -> Option<ScoreOutcome> {
    let value: Value = serde_json::from_str(text).ok()?;
    let object = value.as_object()?;

    let score = object
        .get("match_score")
        .or_else(|| object.get("score"))
        .and_then(score_from_value)?;

    Some(ScoreOutcome::Parsed {
        score,
        reasons: string_list(object.get("match_reasons").or_else(|| object.get("reasons"))),
        strengths: string_list(object.get("strengths")),
        missing_skills: string_list(object.get("missing_skills")),
    })
}

fn score_from_value(value: &Value) -> Option<u8> {
    let raw = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok()?,
        _ => return None,
    };
    clamp_score(raw)
}

fn clamp_score(raw: f64) -> Option<u8> {
    if !raw.is_finite() || raw < 0.0 {
        return None;
    }
    Some(raw.round().min(100.0) as u8)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .take(MAX_REASONS)
            .map(String::from)
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

fn extract_score_from_text(text: &str) -> Option<u8> {
    if let Ok(bare) = text.trim().parse::<f64>() {
        return (0.0..=100.0).contains(&bare).then(|| bare.round() as u8);
    }

    [&*LABELLED_SCORE_RE, &*OUT_OF_100_RE]
        .iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u16>().ok())
        .find(|n| *n <= 100)
        .map(|n| n as u8)
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordMatchScorer: used when no API key is configured
// ────────────────────────────────────────────────────────────────────────────

/// Deterministic scorer: skills carry 60 points, experience 30, location 10.
pub struct KeywordMatchScorer;

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score(
        &self,
        candidate: &CandidateProfile,
        context: SearchContext<'_>,
    ) -> Result<ScoreOutcome, LlmError> {
        Ok(keyword_score(candidate, context))
    }

    fn backend(&self) -> &'static str {
        "keyword"
    }
}

fn keyword_score(candidate: &CandidateProfile, context: SearchContext<'_>) -> ScoreOutcome {
    let filter = context.filter;
    let job_lower = context.job_description.to_lowercase();
    let mut reasons = Vec::new();
    let mut strengths = Vec::new();

    // Skills: required skills when the query named some, otherwise any of the
    // candidate's skills mentioned in the text.
    let (matched, missing, skill_points) = if filter.required_skills.is_empty() {
        let matched: Vec<String> = candidate
            .skills
            .iter()
            .filter(|s| contains_term(&job_lower, &s.to_lowercase()))
            .cloned()
            .collect();
        let points = (matched.len() as f64 * 15.0).min(60.0);
        (matched, Vec::new(), points)
    } else {
        let (matched, missing): (Vec<String>, Vec<String>) = filter
            .required_skills
            .iter()
            .cloned()
            .partition(|skill| has_skill(candidate, skill));
        let related_hit = filter.related_skills.iter().any(|s| has_skill(candidate, s));
        let mut fraction = matched.len() as f64 / filter.required_skills.len() as f64;
        if matched.is_empty() && related_hit {
            fraction = 0.25;
        }
        (matched, missing, fraction * 60.0)
    };

    if !matched.is_empty() {
        let shown: Vec<&str> = matched.iter().take(3).map(String::as_str).collect();
        reasons.push(format!("Has relevant skills: {}", shown.join(", ")));
        strengths.extend(matched.iter().take(3).cloned());
    }

    let experience_points = if filter.min_experience_years > 0.0 {
        let ratio = (candidate.experience_years / filter.min_experience_years).min(1.0);
        ratio * 30.0
    } else {
        (candidate.experience_years * 5.0).min(30.0)
    };
    if candidate.experience_years > 0.0 {
        reasons.push(format!("Has {} years of experience", candidate.experience_years));
    }

    let location_points = match &filter.location {
        Some(wanted) if location_matches(candidate.location.as_deref(), wanted) => {
            reasons.push(format!("Located in {wanted}"));
            10.0
        }
        Some(_) => 0.0,
        None => 10.0,
    };

    if reasons.is_empty() {
        reasons.push("Basic profile match".to_string());
    }

    let total = skill_points + experience_points + location_points;
    ScoreOutcome::Parsed {
        score: clamp_score(total).unwrap_or(0),
        reasons,
        strengths,
        missing_skills: missing,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
