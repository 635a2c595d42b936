// Candidate records: ingestion of parsed profiles, reviewer corrections, analytics.

pub mod analytics;
pub mod handlers;
