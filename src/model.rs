use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder used wherever an organizer list is missing or empty.
pub const UNKNOWN_ORGANIZER: &str = "Unknown";
/// Topic shown for a semester whose resource could not be loaded.
pub const UNKNOWN_TOPIC: &str = "Unknown topic";

fn default_organizers() -> Vec<String> {
    vec![UNKNOWN_ORGANIZER.to_string()]
}

fn deserialize_organizers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    if names.is_empty() {
        Ok(default_organizers())
    } else {
        Ok(names)
    }
}

/// One semester resource (`data/<slug>.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterRecord {
    pub semester: String,
    pub topic: String,
    pub meeting: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar_link: Option<String>,
    // Never empty after deserialization.
    #[serde(
        default = "default_organizers",
        deserialize_with = "deserialize_organizers"
    )]
    pub organizers: Vec<String>,
    #[serde(default)]
    pub talks: Vec<TalkRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalkRecord {
    pub date: String,
    pub year: String,
    pub title: String,
    pub speaker: String,
    pub affiliation: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

/// `data/semesters-index.json`: the slugs of every past semester, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterIndex {
    pub semesters: Vec<String>,
}

/// Row data for the past-seminars index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterSummary {
    pub slug: String,
    pub semester: String,
    pub topic: String,
    pub organizers: Vec<String>,
}

impl SemesterSummary {
    pub fn from_record(slug: &str, record: &SemesterRecord) -> Self {
        Self {
            slug: slug.to_string(),
            semester: record.semester.clone(),
            topic: record.topic.clone(),
            organizers: record.organizers.clone(),
        }
    }

    /// Stand-in row for a semester whose resource failed to load.
    pub fn fallback(slug: &str) -> Self {
        Self {
            slug: slug.to_string(),
            semester: slug.to_string(),
            topic: UNKNOWN_TOPIC.to_string(),
            organizers: default_organizers(),
        }
    }

    /// Relative link to the semester's own page.
    pub fn page_href(&self) -> String {
        format!("semesters/{}.html", self.slug)
    }
}
