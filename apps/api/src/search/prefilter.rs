//! Candidate Prefilter — cheap, deterministic narrowing before any AI call.
//!
//! Hard constraints are skills (OR over required + related) and minimum
//! experience. Location and seniority are passed to the scorer as soft
//! signals unless the policy promotes them to hard filters.

use crate::models::candidate::CandidateProfile;
use crate::search::query_parser::StructuredFilter;
use crate::search::vocabulary::{contains_term, place_entry, REMOTE_KEYWORDS};

#[derive(Debug, Clone, Copy, Default)]
pub struct PrefilterPolicy {
    pub hard_location: bool,
    pub hard_seniority: bool,
}

/// Returns the candidates satisfying every hard constraint, in input order.
pub fn prefilter<'a>(
    candidates: &'a [CandidateProfile],
    filter: &StructuredFilter,
    policy: PrefilterPolicy,
) -> Vec<&'a CandidateProfile> {
    candidates
        .iter()
        .filter(|c| passes(c, filter, policy))
        .collect()
}

fn passes(candidate: &CandidateProfile, filter: &StructuredFilter, policy: PrefilterPolicy) -> bool {
    if candidate.experience_years < filter.min_experience_years {
        return false;
    }

    if !filter.required_skills.is_empty() {
        let wanted = filter
            .required_skills
            .iter()
            .chain(filter.related_skills.iter());
        let mut has_any = false;
        for skill in wanted {
            if has_skill(candidate, skill) {
                has_any = true;
                break;
            }
        }
        if !has_any {
            return false;
        }
    }

    if policy.hard_location {
        if let Some(location) = &filter.location {
            let remote_accepted = filter.remote_ok && is_remote(candidate);
            if !location_matches(candidate.location.as_deref(), location) && !remote_accepted {
                return false;
            }
        }
    }

    if policy.hard_seniority {
        if let Some(level) = filter.seniority_level {
            if candidate.experience_years < level.min_years() {
                return false;
            }
        }
    }

    true
}

/// Case-insensitive skill match: equality, token match inside the candidate's
/// skill (`"Python 3"` has `python`), or containment for multi-word skills.
pub fn has_skill(candidate: &CandidateProfile, wanted: &str) -> bool {
    let wanted = wanted.trim().to_lowercase();
    if wanted.is_empty() {
        return false;
    }
    candidate
        .skills
        .iter()
        .any(|skill| skill_matches(&skill.to_lowercase(), &wanted))
}

fn skill_matches(candidate_skill: &str, wanted: &str) -> bool {
    let candidate_skill = candidate_skill.trim();
    candidate_skill == wanted
        || contains_term(candidate_skill, wanted)
        || (candidate_skill.contains(' ') && contains_term(wanted, candidate_skill))
}

/// Substring match that also accepts known aliases (`Bengaluru` for `Bangalore`).
pub fn location_matches(candidate_location: Option<&str>, wanted: &str) -> bool {
    let Some(candidate_location) = candidate_location else {
        return false;
    };
    let candidate_location = candidate_location.to_lowercase();
    let wanted_lower = wanted.trim().to_lowercase();
    if wanted_lower.is_empty() {
        return false;
    }
    if candidate_location.contains(&wanted_lower) {
        return true;
    }
    place_entry(wanted)
        .map(|place| {
            place
                .aliases
                .iter()
                .any(|alias| contains_term(&candidate_location, alias))
        })
        .unwrap_or(false)
}

fn is_remote(candidate: &CandidateProfile) -> bool {
    candidate
        .location
        .as_deref()
        .map(|l| {
            let l = l.to_lowercase();
            REMOTE_KEYWORDS.iter().any(|k| contains_term(&l, k))
        })
        .unwrap_or(false)
}
