// Cross-cutting prompt fragments.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps assessments tied to the supplied profile.
pub const EVIDENCE_INSTRUCTION: &str = "\
    Base every statement ONLY on the candidate profile provided. \
    Do NOT infer skills, employers, or credentials that are not listed. \
    If the profile does not show a requirement, treat it as missing.";
