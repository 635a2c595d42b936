use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A parsed resume as persisted in the candidate store.
///
/// All fields besides `id` default when missing so documents written by
/// older ingestion tooling still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// Display order is preserved; matching ignores it.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<WorkExperience>,
    /// Source resume file reference.
    #[serde(default)]
    pub filename: Option<String>,
    /// Offset-less timestamps (older ingestion wrote local ISO-8601) are read as UTC.
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Ingestion payload: a profile produced by the external resume parser.
/// The store assigns `id` and `uploaded_at`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCandidate {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<WorkExperience>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Reviewer corrections. Absent fields are left untouched; `id` is never editable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub skills: Option<Vec<String>>,
    pub experience_years: Option<f64>,
    pub summary: Option<String>,
    pub education: Option<Vec<Education>>,
    pub experience: Option<Vec<WorkExperience>>,
}

impl CandidateProfile {
    pub fn from_new(id: String, new: NewCandidate, uploaded_at: DateTime<Utc>) -> Self {
        CandidateProfile {
            id,
            name: new.name.trim().to_string(),
            email: new.email,
            phone: new.phone,
            location: new.location,
            skills: new.skills,
            experience_years: new.experience_years.max(0.0),
            summary: new.summary,
            education: new.education,
            experience: new.experience,
            filename: new.filename,
            uploaded_at: Some(uploaded_at),
        }
    }

    pub fn apply_update(&mut self, update: CandidateUpdate) {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(location) = update.location {
            self.location = Some(location);
        }
        if let Some(skills) = update.skills {
            self.skills = skills;
        }
        if let Some(years) = update.experience_years {
            self.experience_years = years.max(0.0);
        }
        if let Some(summary) = update.summary {
            self.summary = Some(summary);
        }
        if let Some(education) = update.education {
            self.education = education;
        }
        if let Some(experience) = update.experience {
            self.experience = experience;
        }
    }
}

/// Accepts RFC 3339, then `YYYY-MM-DDTHH:MM:SS[.ffffff]` without an offset.
/// Anything else loads as `None` rather than failing the whole document.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().map(str::trim).and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
