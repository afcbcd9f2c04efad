use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{clean, loose_bool, loose_string, one_of, require, text_input, NormalizeError, Submission};
use crate::models::labels::{FILE_FORMATS, RESUME_TYPES};
use crate::models::ResumeRow;

const REQUIRED: &str = "Title is required";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewResume {
    pub user_id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resume_type: String,
    pub file_format: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeForm {
    #[serde(deserialize_with = "loose_string")]
    pub title: String,
    #[serde(deserialize_with = "loose_string")]
    pub description: String,
    #[serde(deserialize_with = "loose_string")]
    pub resume_type: String,
    #[serde(deserialize_with = "loose_string")]
    pub file_format: String,
    #[serde(deserialize_with = "loose_string")]
    pub file_url: String,
    /// Free-form, comma separated.
    #[serde(deserialize_with = "loose_string")]
    pub tags: String,
    #[serde(deserialize_with = "loose_bool")]
    pub is_default: bool,
    #[serde(deserialize_with = "loose_string")]
    pub notes: String,
}

impl Default for ResumeForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            resume_type: "General".to_string(),
            file_format: "PDF".to_string(),
            file_url: String::new(),
            tags: String::new(),
            is_default: false,
            notes: String::new(),
        }
    }
}

/// Trims each tag, drops empties, and joins with `", "`.
pub fn normalize_tags(raw: &str) -> Option<String> {
    let tags: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(", "))
    }
}

impl Submission for ResumeForm {
    type Output = NewResume;

    fn normalize(self, user_id: Uuid, _now: DateTime<Utc>) -> Result<NewResume, NormalizeError> {
        let resume_type = clean(&self.resume_type).unwrap_or_else(|| "General".to_string());
        let file_format = clean(&self.file_format).unwrap_or_else(|| "PDF".to_string());

        Ok(NewResume {
            user_id,
            title: require(&self.title, REQUIRED)?,
            description: clean(&self.description),
            resume_type: one_of("resume_type", resume_type, RESUME_TYPES)?,
            file_format: one_of("file_format", file_format, FILE_FORMATS)?,
            file_url: clean(&self.file_url),
            tags: normalize_tags(&self.tags),
            is_default: self.is_default,
            notes: clean(&self.notes),
        })
    }
}

impl From<&ResumeRow> for ResumeForm {
    fn from(row: &ResumeRow) -> Self {
        Self {
            title: row.title.clone(),
            description: text_input(row.description.as_ref()),
            resume_type: row.resume_type.clone(),
            file_format: row.file_format.clone(),
            file_url: text_input(row.file_url.as_ref()),
            tags: text_input(row.tags.as_ref()),
            is_default: row.is_default,
            notes: text_input(row.notes.as_ref()),
        }
    }
}
