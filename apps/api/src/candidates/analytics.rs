//! Store-wide statistics for the analytics dashboard.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::models::candidate::CandidateProfile;

const TOP_SKILLS: usize = 10;
const UNKNOWN_LOCATION: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analytics {
    pub total_candidates: usize,
    /// Most common skills, most frequent first.
    pub skills_distribution: Vec<SkillCount>,
    pub experience_distribution: ExperienceDistribution,
    pub location_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExperienceDistribution {
    #[serde(rename = "0-2")]
    pub up_to_two: usize,
    #[serde(rename = "3-5")]
    pub three_to_five: usize,
    #[serde(rename = "6-10")]
    pub six_to_ten: usize,
    #[serde(rename = "10+")]
    pub over_ten: usize,
}

impl ExperienceDistribution {
    fn record(&mut self, years: f64) {
        if years <= 2.0 {
            self.up_to_two += 1;
        } else if years <= 5.0 {
            self.three_to_five += 1;
        } else if years <= 10.0 {
            self.six_to_ten += 1;
        } else {
            self.over_ten += 1;
        }
    }
}

pub fn compute_analytics(candidates: &[CandidateProfile]) -> Analytics {
    let mut experience = ExperienceDistribution::default();
    let mut locations: BTreeMap<String, usize> = BTreeMap::new();

    // Skills are grouped case-insensitively under their first-seen spelling.
    let mut skill_counts: Vec<SkillCount> = Vec::new();
    let mut skill_index: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        for skill in candidate.skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty()) {
            let key = skill.to_lowercase();
            match skill_index.get(&key) {
                Some(&i) => skill_counts[i].count += 1,
                None => {
                    skill_index.insert(key, skill_counts.len());
                    skill_counts.push(SkillCount {
                        skill: skill.to_string(),
                        count: 1,
                    });
                }
            }
        }

        experience.record(candidate.experience_years);

        let location = candidate
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(UNKNOWN_LOCATION);
        *locations.entry(location.to_string()).or_insert(0) += 1;
    }

    // Stable: equal counts stay in first-seen order.
    skill_counts.sort_by(|a, b| b.count.cmp(&a.count));
    skill_counts.truncate(TOP_SKILLS);

    Analytics {
        total_candidates: candidates.len(),
        skills_distribution: skill_counts,
        experience_distribution: experience,
        location_distribution: locations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(skills: &[&str], years: f64, location: Option<&str>) -> CandidateProfile {
        CandidateProfile {
            id: uuid::Uuid::new_v4().to_string(),
            name: "Test".to_string(),
            email: None,
            phone: None,
            location: location.map(String::from),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience_years: years,
            summary: None,
            education: vec![],
            experience: vec![],
            filename: None,
            uploaded_at: None,
        }
    }

    #[test]
    fn test_empty_store() {
        let analytics = compute_analytics(&[]);
        assert_eq!(analytics.total_candidates, 0);
        assert!(analytics.skills_distribution.is_empty());
        assert_eq!(analytics.experience_distribution, ExperienceDistribution::default());
        assert!(analytics.location_distribution.is_empty());
    }

    #[test]
    fn test_experience_bucket_boundaries() {
        let pool: Vec<CandidateProfile> = [0.0, 2.0, 2.5, 5.0, 6.0, 10.0, 10.5, 25.0]
            .iter()
            .map(|y| candidate(&[], *y, None))
            .collect();
        let dist = compute_analytics(&pool).experience_distribution;
        assert_eq!(dist.up_to_two, 2);
        assert_eq!(dist.three_to_five, 2);
        assert_eq!(dist.six_to_ten, 2);
        assert_eq!(dist.over_ten, 2);
    }

    #[test]
    fn test_skills_grouped_case_insensitively_and_capped() {
        let mut pool = vec![
            candidate(&["Python", "SQL"], 1.0, None),
            candidate(&["python", "Rust"], 1.0, None),
            candidate(&["PYTHON", "sql"], 1.0, None),
        ];
        pool.push(candidate(
            &["a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k"],
            1.0,
            None,
        ));
        let skills = compute_analytics(&pool).skills_distribution;
        assert_eq!(skills.len(), TOP_SKILLS);
        assert_eq!(skills[0], SkillCount { skill: "Python".to_string(), count: 3 });
        assert_eq!(skills[1], SkillCount { skill: "SQL".to_string(), count: 2 });
        assert_eq!(skills[2].skill, "Rust");
    }

    #[test]
    fn test_missing_location_counts_as_unknown() {
        let pool = vec![
            candidate(&[], 1.0, Some("Pune")),
            candidate(&[], 1.0, None),
            candidate(&[], 1.0, Some("  ")),
            candidate(&[], 1.0, Some("Pune")),
        ];
        let locations = compute_analytics(&pool).location_distribution;
        assert_eq!(locations.get("Pune"), Some(&2));
        assert_eq!(locations.get(UNKNOWN_LOCATION), Some(&2));
    }

    #[test]
    fn test_bucket_labels_serialize() {
        let json = serde_json::to_value(ExperienceDistribution::default()).unwrap();
        for label in ["0-2", "3-5", "6-10", "10+"] {
            assert_eq!(json[label], 0);
        }
    }
}
