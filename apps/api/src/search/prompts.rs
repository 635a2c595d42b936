// All LLM prompt constants for the search pipeline.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for query extraction.
pub const QUERY_EXTRACT_SYSTEM: &str = "You are an expert technical recruiter. \
    Extract structured search constraints from a recruiter's request.";

/// Query extraction template. Replace `{query}` before sending.
pub const QUERY_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract the hard search constraints from the recruiter request below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "required_skills": ["python", "django"],
  "min_experience_years": 3,
  "location": "Bangalore",
  "seniority_level": "senior"
}

Rules:
- required_skills: technologies, languages, frameworks or domain skills the candidate must have, lower-case. Empty array if none.
- min_experience_years: minimum years of experience as a number. 0 if not stated.
- location: a city or region if one is requested, otherwise null.
- seniority_level: one of "intern", "junior", "mid", "senior", "principal", "executive", or null.
- Do NOT guess. Leave a field empty or null when the request does not say it.

RECRUITER REQUEST:
{query}"#;

/// System prompt for candidate scoring.
pub const MATCH_SCORE_SYSTEM: &str = "You are an expert HR recruiter analyzing candidate-job fit. \
    Be objective and thorough. Focus on technical skills, experience level, and relevant background.";

/// Candidate scoring template.
/// Replace: {evidence_instruction}, {job_description}, {filter_context}, {candidate_profile}
pub const MATCH_SCORE_PROMPT_TEMPLATE: &str = r#"{evidence_instruction}

JOB DESCRIPTION:
{job_description}

PARSED SEARCH CONTEXT (location and seniority are preferences, not hard requirements):
{filter_context}

CANDIDATE PROFILE:
{candidate_profile}

Analyze how well this candidate matches the job. Return a JSON object with this EXACT schema:
{
  "match_score": 0,
  "skill_match": 0,
  "experience_match": 0,
  "match_reasons": ["short reason why this candidate is a good or poor match"],
  "missing_skills": ["skill the candidate lacks"],
  "strengths": ["strength of this candidate"]
}

Rules:
- match_score, skill_match and experience_match are integers from 0 to 100.
- match_reasons: 1 to 4 short phrases, most important first.
- missing_skills and strengths may be empty arrays."#;
