//! Query Parser — turns a recruiter's free-text request into a `StructuredFilter`.
//!
//! Deterministic heuristics run first (skill vocabulary, experience regex,
//! known places). Only when they find nothing is the text handed to the
//! language model; any failure there degrades to the match-all filter.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{complete_json, Completion};
use crate::search::prompts::{QUERY_EXTRACT_PROMPT_TEMPLATE, QUERY_EXTRACT_SYSTEM};
use crate::search::vocabulary::{
    contains_term, is_vocabulary_word, place_entry, skill_entry, SeniorityLevel, PLACES,
    REMOTE_KEYWORDS, ROLE_TYPES, SKILLS,
};

static EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(\d+(?:\.\d+)?)\s*\+?\s*(?:(?:-|–|to)\s*\d+(?:\.\d+)?\s*\+?\s*)?(?:years?|yrs?)\b",
    )
    .expect("experience regex is valid")
});

static IN_PLACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bin\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)").expect("place regex is valid")
});

/// Machine-usable constraints derived from one query. Never persisted.
///
/// `required_skills` uses an OR policy: a candidate qualifies with any one of
/// them, or with any of the `related_skills` expansions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredFilter {
    pub required_skills: Vec<String>,
    pub related_skills: Vec<String>,
    pub min_experience_years: f64,
    pub location: Option<String>,
    pub seniority_level: Option<SeniorityLevel>,
    pub remote_ok: bool,
}

impl StructuredFilter {
    /// True when no skill, experience, location or seniority constraint was found.
    pub fn is_match_all(&self) -> bool {
        self.required_skills.is_empty()
            && self.min_experience_years <= 0.0
            && self.location.is_none()
            && self.seniority_level.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSource {
    Heuristic,
    Ai,
    Empty,
}

/// Parser output: the filter plus informational extras for previews and prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub filter: StructuredFilter,
    pub role_type: Option<String>,
    pub work_arrangement: Option<String>,
    pub locations: Vec<String>,
    pub confidence: f32,
    pub suggestions: Vec<String>,
    pub source: FilterSource,
}

/// Caller-supplied overrides (the search form's explicit filter controls).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplicitFilters {
    #[serde(default, alias = "min_experience_years")]
    pub min_experience: Option<f64>,
    #[serde(default)]
    pub required_skills: Option<Vec<String>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub seniority_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AiExtractedFilter {
    #[serde(default)]
    required_skills: Vec<String>,
    #[serde(default)]
    min_experience_years: Option<f64>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    seniority_level: Option<String>,
}

/// Parses `text`, falling back to `llm` when heuristics detect nothing.
pub async fn parse_query(text: &str, llm: Option<&dyn Completion>) -> ParsedQuery {
    let mut parsed = parse_query_heuristic(text);

    if parsed.source != FilterSource::Empty {
        return parsed;
    }
    let Some(llm) = llm else {
        return parsed;
    };

    let prompt = QUERY_EXTRACT_PROMPT_TEMPLATE.replace("{query}", text);
    let system = format!("{QUERY_EXTRACT_SYSTEM} {JSON_ONLY_SYSTEM}");

    match complete_json::<AiExtractedFilter>(llm, &prompt, &system).await {
        Ok(extracted) => {
            let skills = normalize_skills(extracted.required_skills.iter().map(String::as_str));
            parsed.filter.related_skills = related_for(&skills);
            parsed.filter.required_skills = skills;
            parsed.filter.min_experience_years =
                extracted.min_experience_years.unwrap_or(0.0).max(0.0);
            parsed.filter.location = extracted
                .location
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(canonical_place);
            parsed.filter.seniority_level = extracted
                .seniority_level
                .as_deref()
                .and_then(SeniorityLevel::parse);
            if let Some(location) = &parsed.filter.location {
                parsed.locations = vec![location.clone()];
            }
            if !parsed.filter.is_match_all() {
                parsed.source = FilterSource::Ai;
            }
            debug!("AI query extraction produced {:?}", parsed.filter);
        }
        Err(e) => {
            warn!("AI query extraction failed, searching all candidates: {e}");
        }
    }

    parsed
}

/// Pure heuristic parse. Never fails; sparse input yields the match-all filter.
pub fn parse_query_heuristic(text: &str) -> ParsedQuery {
    let lower = text.to_lowercase();

    let required_skills = extract_skills(&lower);
    let related_skills = related_for(&required_skills);
    let explicit_years = extract_min_years(text);
    let locations = extract_locations(text, &lower);
    let remote_ok = REMOTE_KEYWORDS.iter().any(|k| contains_term(&lower, k));

    let seniority_level = SeniorityLevel::ALL
        .into_iter()
        .find(|level| level.keywords().iter().any(|k| contains_term(&lower, k)))
        .or_else(|| explicit_years.map(SeniorityLevel::from_years));

    let work_arrangement = if remote_ok {
        Some("remote")
    } else if contains_term(&lower, "hybrid") {
        Some("hybrid")
    } else if ["onsite", "on-site", "office"]
        .iter()
        .any(|k| contains_term(&lower, k))
    {
        Some("onsite")
    } else {
        None
    };

    let role_type = ROLE_TYPES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_term(&lower, k)))
        .map(|(role, _)| role.to_string());

    let filter = StructuredFilter {
        required_skills,
        related_skills,
        min_experience_years: explicit_years.unwrap_or(0.0),
        location: locations.first().cloned(),
        seniority_level,
        remote_ok,
    };

    let found_hard_signal = !filter.required_skills.is_empty()
        || explicit_years.is_some()
        || filter.location.is_some();

    let confidence = compute_confidence(
        &filter,
        !locations.is_empty(),
        work_arrangement.is_some(),
        role_type.is_some(),
    );
    let suggestions = build_suggestions(&filter, !locations.is_empty(), confidence);

    ParsedQuery {
        filter,
        role_type,
        work_arrangement: work_arrangement.map(str::to_string),
        locations,
        confidence,
        suggestions,
        source: if found_hard_signal {
            FilterSource::Heuristic
        } else {
            FilterSource::Empty
        },
    }
}

/// Applies the caller's explicit filters on top of the parsed ones, per dimension.
pub fn apply_overrides(parsed: &mut ParsedQuery, overrides: &ExplicitFilters) {
    let filter = &mut parsed.filter;

    if let Some(years) = overrides.min_experience {
        filter.min_experience_years = years.max(0.0);
    }
    if let Some(skills) = &overrides.required_skills {
        filter.required_skills = normalize_skills(skills.iter().map(String::as_str));
        filter.related_skills = related_for(&filter.required_skills);
    }
    if let Some(location) = overrides.location.as_deref().map(str::trim) {
        filter.location = (!location.is_empty()).then(|| canonical_place(location));
    }
    if let Some(level) = overrides.seniority_level.as_deref() {
        filter.seniority_level = SeniorityLevel::parse(level);
    }
}

fn extract_skills(lower: &str) -> Vec<String> {
    let found = SKILLS
        .iter()
        .filter(|entry| entry.aliases.iter().any(|alias| contains_term(lower, alias)))
        .map(|entry| entry.canonical);
    normalize_skills(found)
}

/// Lower-cases, maps known aliases to their canonical name, and de-duplicates
/// while keeping first-seen order.
fn normalize_skills<'a>(skills: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for skill in skills {
        let lower = skill.trim().to_lowercase();
        if lower.is_empty() {
            continue;
        }
        let canonical = SKILLS
            .iter()
            .find(|entry| entry.canonical == lower || entry.aliases.contains(&lower.as_str()))
            .map(|entry| entry.canonical.to_string())
            .unwrap_or(lower);
        if !out.contains(&canonical) {
            out.push(canonical);
        }
    }
    out
}

fn related_for(required: &[String]) -> Vec<String> {
    let mut related: Vec<String> = Vec::new();
    for skill in required {
        if let Some(entry) = skill_entry(skill) {
            for r in entry.related {
                let r = r.to_string();
                if !required.contains(&r) && !related.contains(&r) {
                    related.push(r);
                }
            }
        }
    }
    related
}

/// Prefers a year count followed by "experience" ("5 years of experience"),
/// then the first one that isn't an age or a date ("25 years ago").
fn extract_min_years(text: &str) -> Option<f64> {
    let mut experience_hit = None;
    let mut first_plain = None;

    for caps in EXPERIENCE_RE.captures_iter(text) {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Ok(years) = number.as_str().parse::<f64>() else {
            continue;
        };
        let rest = text[whole.end()..].trim_start().to_lowercase();
        let rest = rest.strip_prefix("of ").unwrap_or(rest.as_str()).trim_start();

        if rest.starts_with("experience") || rest.starts_with("exp") {
            experience_hit = Some(years);
            break;
        }
        if first_plain.is_none() && !rest.starts_with("ago") && !rest.starts_with("old") {
            first_plain = Some(years);
        }
    }

    experience_hit.or(first_plain)
}

fn extract_locations(text: &str, lower: &str) -> Vec<String> {
    let mut hits: Vec<(usize, String)> = Vec::new();

    for place in PLACES {
        let first_hit = place
            .aliases
            .iter()
            .filter(|alias| contains_term(lower, alias))
            .filter_map(|alias| lower.find(alias))
            .min();
        if let Some(position) = first_hit {
            hits.push((position, place.canonical.to_string()));
        }
    }

    for caps in IN_PLACE_RE.captures_iter(text) {
        let Some(m) = caps.get(1) else { continue };
        let candidate = m.as_str();
        if is_vocabulary_word(candidate) || is_role_word(candidate) {
            continue;
        }
        let name = canonical_place(candidate);
        if !hits.iter().any(|(_, existing)| existing == &name) {
            hits.push((m.start(), name));
        }
    }

    hits.sort_by_key(|(position, _)| *position);
    hits.into_iter().map(|(_, name)| name).collect()
}

fn is_role_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    ROLE_TYPES
        .iter()
        .any(|(_, keywords)| keywords.contains(&lower.as_str()))
}

fn canonical_place(name: &str) -> String {
    place_entry(name)
        .map(|p| p.canonical.to_string())
        .unwrap_or_else(|| name.trim().to_string())
}

fn compute_confidence(
    filter: &StructuredFilter,
    has_location: bool,
    has_arrangement: bool,
    has_role: bool,
) -> f32 {
    let mut score = 0.0_f32;
    if filter.seniority_level.is_some() {
        score += 0.2;
    }
    if !filter.required_skills.is_empty() {
        score += 0.3;
    }
    if has_location {
        score += 0.2;
    }
    if has_arrangement {
        score += 0.15;
    }
    if has_role {
        score += 0.15;
    }
    if score > 0.0 {
        score += 0.1;
    }
    score.min(1.0)
}

fn build_suggestions(filter: &StructuredFilter, has_location: bool, confidence: f32) -> Vec<String> {
    let mut suggestions = Vec::new();
    if filter.seniority_level.is_none() {
        suggestions
            .push("Consider specifying experience level (e.g., 'senior', '3+ years')".to_string());
    }
    if filter.required_skills.is_empty() {
        suggestions.push("Add specific skills or technologies (e.g., 'Python', 'React')".to_string());
    }
    if !has_location && !filter.remote_ok {
        suggestions.push("Specify location preference or mention 'remote OK'".to_string());
    }
    if confidence < 0.5 {
        suggestions.push("Try a more specific query for better results".to_string());
    }
    suggestions
}
