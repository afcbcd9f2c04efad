use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::views::{Dimension, SortKey, SortOrder, Viewable};

/// A calendar entry. When `is_all_day` is set only the date part of
/// `event_date`/`end_date` is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub application_id: Option<Uuid>,
    pub title: String,
    pub event_type: String,
    pub event_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub event_link: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub reminder_hours_before: Option<i32>,
    pub status: String,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub contacts_made: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Viewable for EventRow {
    const DEFAULT_SORT: (&'static str, SortOrder) = ("event_date", SortOrder::Asc);

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.title.as_str()),
            self.company.as_deref(),
            self.location.as_deref(),
            self.description.as_deref(),
        ]
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Status => Some(self.status.as_str()),
            Dimension::Secondary => Some(self.event_type.as_str()),
        }
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "event_date" => SortKey::time(Some(self.event_date)),
            "end_date" => SortKey::time(self.end_date),
            "title" => SortKey::text(&self.title),
            "company" => SortKey::opt_text(self.company.as_ref()),
            "event_type" => SortKey::text(&self.event_type),
            "status" => SortKey::text(&self.status),
            "created_at" => SortKey::time(Some(self.created_at)),
            _ => None,
        }
    }
}
