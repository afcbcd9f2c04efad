use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::views::{Dimension, SortKey, SortOrder, Viewable};

/// A tracked job application as stored in `applications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: String,
    #[serde(default)]
    pub applied_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Viewable for ApplicationRow {
    const DEFAULT_SORT: (&'static str, SortOrder) = ("created_at", SortOrder::Desc);

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.company.as_str()),
            Some(self.position.as_str()),
            self.location.as_deref(),
        ]
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Status => Some(self.status.as_str()),
            Dimension::Secondary => None,
        }
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "company" => SortKey::text(&self.company),
            "position" => SortKey::text(&self.position),
            "status" => SortKey::text(&self.status),
            "location" => SortKey::opt_text(self.location.as_ref()),
            "applied_date" => SortKey::time(
                self.applied_date
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|dt| dt.and_utc()),
            ),
            "created_at" => SortKey::time(Some(self.created_at)),
            "updated_at" => SortKey::time(Some(self.updated_at)),
            _ => None,
        }
    }
}
