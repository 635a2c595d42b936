//! Result Ranker — orders scored candidates for the response.

use crate::search::scoring::MatchResult;

#[derive(Debug, Clone, Copy)]
pub struct RankConfig {
    /// Results scoring below this are dropped.
    pub min_score: u8,
    pub max_results: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            min_score: 0,
            max_results: 20,
        }
    }
}

/// Returns positions into `results`, best first. Callers join by position,
/// never by `candidate_id`, since legacy stores may repeat ids.
///
/// `sort_by` is stable, so equal scores keep the prefilter order and output is
/// deterministic for deterministic scores.
pub fn rank(results: &[MatchResult], config: RankConfig) -> Vec<usize> {
    let mut ranked: Vec<usize> = results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.match_score >= config.min_score)
        .map(|(i, _)| i)
        .collect();

    ranked.sort_by(|a, b| results[*b].match_score.cmp(&results[*a].match_score));
    ranked.truncate(config.max_results);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, score: u8) -> MatchResult {
        MatchResult {
            candidate_id: id.to_string(),
            match_score: score,
            match_reasons: vec![],
            strengths: vec![],
            missing_skills: vec![],
        }
    }

    fn ids<'a>(input: &'a [MatchResult], ranked: &[usize]) -> Vec<&'a str> {
        ranked.iter().map(|&i| input[i].candidate_id.as_str()).collect()
    }

    fn scores(input: &[MatchResult], ranked: &[usize]) -> Vec<u8> {
        ranked.iter().map(|&i| input[i].match_score).collect()
    }

    #[test]
    fn test_rank_is_non_increasing() {
        let input = vec![result("a", 10), result("b", 90), result("c", 55), result("d", 70)];
        let ranked = rank(&input, RankConfig::default());
        assert!(scores(&input, &ranked).windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(ids(&input, &ranked), vec!["b", "d", "c", "a"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let input = vec![result("first", 50), result("top", 80), result("second", 50), result("third", 50)];
        let ranked = rank(&input, RankConfig::default());
        assert_eq!(ids(&input, &ranked), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_min_score_cutoff() {
        let input = vec![result("a", 10), result("b", 40), result("c", 39)];
        let ranked = rank(&input, RankConfig { min_score: 40, max_results: 20 });
        assert_eq!(ids(&input, &ranked), vec!["b"]);
    }

    #[test]
    fn test_max_results_truncates_after_sorting() {
        let input: Vec<MatchResult> = (0..30).map(|i| result(&format!("c{i}"), i as u8)).collect();
        let ranked = rank(&input, RankConfig::default());
        assert_eq!(ranked.len(), 20);
        assert_eq!(input[ranked[0]].match_score, 29);
        assert_eq!(input[ranked[19]].match_score, 10);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = vec![result("a", 1), result("b", 2)];
        let before = input.clone();
        let _ = rank(&input, RankConfig::default());
        assert_eq!(input, before);
    }

    #[test]
    fn test_repeated_ids_keep_distinct_positions() {
        let input = vec![result("dup", 40), result("dup", 90)];
        assert_eq!(rank(&input, RankConfig::default()), vec![1, 0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank(&[], RankConfig::default()).is_empty());
    }

    #[test]
    fn test_zero_scores_are_kept_with_default_cutoff() {
        let ranked = rank(&[result("a", 0)], RankConfig::default());
        assert_eq!(ranked.len(), 1);
    }
}
