use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::views::{Dimension, SortKey, SortOrder, Viewable};

/// A resume artifact, either an uploaded file or an external link.
/// At most one resume per user carries `is_default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub resume_type: String,
    pub file_format: String,
    #[serde(default)]
    pub file_url: Option<String>,
    /// Comma-joined, e.g. `"rust, backend"`.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ResumeRow {
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }
}

impl Viewable for ResumeRow {
    const DEFAULT_SORT: (&'static str, SortOrder) = ("created_at", SortOrder::Desc);

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            self.description.as_deref(),
            self.tags.as_deref(),
        ]
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Status => None,
            Dimension::Secondary => Some(self.resume_type.as_str()),
        }
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "created_at" => SortKey::time(Some(self.created_at)),
            "updated_at" => SortKey::time(Some(self.updated_at)),
            "title" => SortKey::text(&self.title),
            "resume_type" => SortKey::text(&self.resume_type),
            _ => None,
        }
    }
}
