// Natural-language candidate search.
// Implements: query parsing, prefiltering, match scoring, ranking and the pipeline tying them together.
// All model calls go through llm_client.

pub mod handlers;
pub mod pipeline;
pub mod prefilter;
pub mod prompts;
pub mod query_parser;
pub mod ranker;
pub mod scoring;
pub mod vocabulary;
