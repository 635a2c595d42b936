//! Static vocabulary used by the heuristic query parser and the prefilter.

use serde::{Deserialize, Serialize};

/// A recognized skill: canonical (lower-case) name plus the spellings that map to it.
pub struct SkillEntry {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
    /// Skills from the same family, admitted by the prefilter as related evidence.
    pub related: &'static [&'static str],
}

pub const SKILLS: &[SkillEntry] = &[
    SkillEntry { canonical: "python", aliases: &["python"], related: &["django", "flask", "fastapi", "pandas", "numpy"] },
    SkillEntry { canonical: "java", aliases: &["java"], related: &["spring", "spring boot", "hibernate"] },
    SkillEntry { canonical: "javascript", aliases: &["javascript", "js", "ecmascript"], related: &["typescript", "node.js", "react", "vue", "angular"] },
    SkillEntry { canonical: "typescript", aliases: &["typescript", "ts"], related: &["javascript"] },
    SkillEntry { canonical: "node.js", aliases: &["node.js", "nodejs", "node"], related: &["express", "nest.js"] },
    SkillEntry { canonical: "react", aliases: &["react", "react.js", "reactjs"], related: &["next.js", "redux"] },
    SkillEntry { canonical: "vue", aliases: &["vue", "vue.js", "vuejs"], related: &["nuxt"] },
    SkillEntry { canonical: "angular", aliases: &["angular", "angularjs"], related: &[] },
    SkillEntry { canonical: "django", aliases: &["django"], related: &["python"] },
    SkillEntry { canonical: "flask", aliases: &["flask"], related: &["python"] },
    SkillEntry { canonical: "fastapi", aliases: &["fastapi"], related: &["python"] },
    SkillEntry { canonical: "spring", aliases: &["spring", "spring boot"], related: &["java"] },
    SkillEntry { canonical: "go", aliases: &["golang", "go developer", "go engineer", "go programmer"], related: &[] },
    SkillEntry { canonical: "rust", aliases: &["rust"], related: &[] },
    SkillEntry { canonical: "c++", aliases: &["c++", "cpp"], related: &[] },
    SkillEntry { canonical: "c#", aliases: &["c#", "csharp"], related: &[".net", "asp.net"] },
    SkillEntry { canonical: ".net", aliases: &[".net", "dotnet", "asp.net"], related: &["c#"] },
    SkillEntry { canonical: "php", aliases: &["php"], related: &["laravel"] },
    SkillEntry { canonical: "ruby", aliases: &["ruby", "rails", "ruby on rails"], related: &[] },
    SkillEntry { canonical: "swift", aliases: &["swift"], related: &["ios"] },
    SkillEntry { canonical: "kotlin", aliases: &["kotlin"], related: &["android"] },
    SkillEntry { canonical: "sql", aliases: &["sql"], related: &["mysql", "postgresql", "oracle"] },
    SkillEntry { canonical: "mysql", aliases: &["mysql"], related: &["sql"] },
    SkillEntry { canonical: "postgresql", aliases: &["postgresql", "postgres"], related: &["sql"] },
    SkillEntry { canonical: "mongodb", aliases: &["mongodb", "mongo"], related: &["nosql"] },
    SkillEntry { canonical: "redis", aliases: &["redis"], related: &[] },
    SkillEntry { canonical: "elasticsearch", aliases: &["elasticsearch"], related: &[] },
    SkillEntry { canonical: "aws", aliases: &["aws", "amazon web services"], related: &["cloud"] },
    SkillEntry { canonical: "azure", aliases: &["azure"], related: &["cloud"] },
    SkillEntry { canonical: "gcp", aliases: &["gcp", "google cloud"], related: &["cloud"] },
    SkillEntry { canonical: "docker", aliases: &["docker"], related: &["kubernetes"] },
    SkillEntry { canonical: "kubernetes", aliases: &["kubernetes", "k8s"], related: &["docker"] },
    SkillEntry { canonical: "devops", aliases: &["devops"], related: &["docker", "kubernetes", "aws", "jenkins"] },
    SkillEntry { canonical: "jenkins", aliases: &["jenkins"], related: &[] },
    SkillEntry { canonical: "git", aliases: &["git"], related: &[] },
    SkillEntry { canonical: "machine learning", aliases: &["machine learning", "ml"], related: &["tensorflow", "pytorch", "scikit-learn"] },
    SkillEntry { canonical: "deep learning", aliases: &["deep learning"], related: &["tensorflow", "pytorch"] },
    SkillEntry { canonical: "artificial intelligence", aliases: &["artificial intelligence", "ai"], related: &["machine learning", "deep learning"] },
    SkillEntry { canonical: "tensorflow", aliases: &["tensorflow"], related: &["machine learning"] },
    SkillEntry { canonical: "pytorch", aliases: &["pytorch"], related: &["machine learning"] },
    SkillEntry { canonical: "data science", aliases: &["data science"], related: &["python", "pandas", "machine learning"] },
    SkillEntry { canonical: "html", aliases: &["html", "html5"], related: &["css"] },
    SkillEntry { canonical: "css", aliases: &["css", "css3"], related: &["html"] },
];

/// A known place and the spellings that refer to it.
pub struct PlaceEntry {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

pub const PLACES: &[PlaceEntry] = &[
    PlaceEntry { canonical: "Bangalore", aliases: &["bangalore", "bengaluru"] },
    PlaceEntry { canonical: "Mumbai", aliases: &["mumbai", "bombay"] },
    PlaceEntry { canonical: "Delhi", aliases: &["delhi", "new delhi", "ncr", "gurgaon", "gurugram", "noida"] },
    PlaceEntry { canonical: "Hyderabad", aliases: &["hyderabad"] },
    PlaceEntry { canonical: "Pune", aliases: &["pune"] },
    PlaceEntry { canonical: "Chennai", aliases: &["chennai", "madras"] },
    PlaceEntry { canonical: "Kolkata", aliases: &["kolkata", "calcutta"] },
    PlaceEntry { canonical: "San Francisco", aliases: &["san francisco", "sf", "bay area"] },
    PlaceEntry { canonical: "New York", aliases: &["new york", "nyc", "manhattan"] },
    PlaceEntry { canonical: "Los Angeles", aliases: &["los angeles", "la"] },
    PlaceEntry { canonical: "Seattle", aliases: &["seattle"] },
    PlaceEntry { canonical: "Boston", aliases: &["boston"] },
    PlaceEntry { canonical: "Austin", aliases: &["austin"] },
    PlaceEntry { canonical: "Denver", aliases: &["denver"] },
    PlaceEntry { canonical: "Chicago", aliases: &["chicago"] },
    PlaceEntry { canonical: "Atlanta", aliases: &["atlanta"] },
    PlaceEntry { canonical: "London", aliases: &["london"] },
    PlaceEntry { canonical: "Berlin", aliases: &["berlin"] },
    PlaceEntry { canonical: "Singapore", aliases: &["singapore"] },
    PlaceEntry { canonical: "Toronto", aliases: &["toronto"] },
];

pub const REMOTE_KEYWORDS: &[&str] = &["remote", "wfh", "work from home", "distributed", "anywhere"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeniorityLevel {
    Intern,
    Junior,
    Mid,
    Senior,
    Principal,
    Executive,
}

impl SeniorityLevel {
    /// Checked in this order; the first level with a keyword hit wins.
    pub const ALL: [SeniorityLevel; 6] = [
        SeniorityLevel::Intern,
        SeniorityLevel::Junior,
        SeniorityLevel::Mid,
        SeniorityLevel::Senior,
        SeniorityLevel::Principal,
        SeniorityLevel::Executive,
    ];

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            SeniorityLevel::Intern => &["intern", "internship", "graduate"],
            SeniorityLevel::Junior => &["junior", "entry-level", "entry level", "new grad", "fresher"],
            SeniorityLevel::Mid => &["mid-level", "mid level", "intermediate"],
            SeniorityLevel::Senior => &["senior", "sr", "lead"],
            SeniorityLevel::Principal => &["principal", "staff", "architect"],
            SeniorityLevel::Executive => &["vp", "cto", "executive", "c-level", "head of"],
        }
    }

    /// Typical minimum years for the level.
    pub fn min_years(self) -> f64 {
        match self {
            SeniorityLevel::Intern | SeniorityLevel::Junior => 0.0,
            SeniorityLevel::Mid => 2.0,
            SeniorityLevel::Senior => 5.0,
            SeniorityLevel::Principal => 8.0,
            SeniorityLevel::Executive => 10.0,
        }
    }

    pub fn from_years(years: f64) -> Self {
        if years >= 8.0 {
            SeniorityLevel::Principal
        } else if years >= 5.0 {
            SeniorityLevel::Senior
        } else if years >= 2.0 {
            SeniorityLevel::Mid
        } else {
            SeniorityLevel::Junior
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SeniorityLevel::Intern => "intern",
            SeniorityLevel::Junior => "junior",
            SeniorityLevel::Mid => "mid",
            SeniorityLevel::Senior => "senior",
            SeniorityLevel::Principal => "principal",
            SeniorityLevel::Executive => "executive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        match value.as_str() {
            "entry" | "entry-level" => return Some(SeniorityLevel::Junior),
            "mid-level" | "intermediate" => return Some(SeniorityLevel::Mid),
            "staff" | "lead" => return Some(SeniorityLevel::Senior),
            _ => {}
        }
        SeniorityLevel::ALL.into_iter().find(|l| l.as_str() == value)
    }
}

pub const ROLE_TYPES: &[(&str, &[&str])] = &[
    ("engineer", &["engineer", "developer", "programmer", "coder"]),
    ("manager", &["manager", "head", "director"]),
    ("designer", &["designer", "ux", "ui"]),
    ("analyst", &["analyst", "data scientist", "researcher"]),
    ("consultant", &["consultant", "advisor", "specialist"]),
];

pub fn skill_entry(canonical: &str) -> Option<&'static SkillEntry> {
    SKILLS.iter().find(|s| s.canonical == canonical)
}

pub fn place_entry(name: &str) -> Option<&'static PlaceEntry> {
    let lower = name.trim().to_lowercase();
    PLACES
        .iter()
        .find(|p| p.canonical.to_lowercase() == lower || p.aliases.contains(&lower.as_str()))
}

pub fn is_vocabulary_word(word: &str) -> bool {
    let lower = word.trim().to_lowercase();
    SKILLS.iter().any(|s| s.aliases.contains(&lower.as_str()))
        || SeniorityLevel::ALL
            .iter()
            .any(|l| l.keywords().contains(&lower.as_str()))
        || REMOTE_KEYWORDS.contains(&lower.as_str())
}

/// True when `term` occurs in `haystack` (both lower-case) bounded by
/// non-alphanumeric characters. Handles terms like `c++`, `.net`, `node.js`.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, _)| {
        let end = start + term.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_term_respects_word_boundaries() {
        assert!(contains_term("python developer", "python"));
        assert!(!contains_term("django developer", "go"));
        assert!(!contains_term("javascript", "java"));
        assert!(contains_term("java, spring", "java"));
    }

    #[test]
    fn test_contains_term_handles_symbol_terms() {
        assert!(contains_term("modern c++ and rust", "c++"));
        assert!(contains_term("asp.net core", "asp.net"));
        assert!(contains_term("we use node.js daily", "node.js"));
    }

    #[test]
    fn test_place_entry_resolves_aliases() {
        assert_eq!(place_entry("Bengaluru").unwrap().canonical, "Bangalore");
        assert_eq!(place_entry("NYC").unwrap().canonical, "New York");
        assert!(place_entry("Atlantis").is_none());
    }

    #[test]
    fn test_seniority_from_years() {
        assert_eq!(SeniorityLevel::from_years(1.0), SeniorityLevel::Junior);
        assert_eq!(SeniorityLevel::from_years(3.0), SeniorityLevel::Mid);
        assert_eq!(SeniorityLevel::from_years(5.0), SeniorityLevel::Senior);
        assert_eq!(SeniorityLevel::from_years(12.0), SeniorityLevel::Principal);
    }

    #[test]
    fn test_seniority_parse_accepts_synonyms() {
        assert_eq!(SeniorityLevel::parse("Senior"), Some(SeniorityLevel::Senior));
        assert_eq!(SeniorityLevel::parse("entry"), Some(SeniorityLevel::Junior));
        assert_eq!(SeniorityLevel::parse("unknown"), None);
    }

    #[test]
    fn test_vocabulary_words_are_recognized() {
        assert!(is_vocabulary_word("Python"));
        assert!(is_vocabulary_word("senior"));
        assert!(!is_vocabulary_word("Bangalore"));
    }
}
