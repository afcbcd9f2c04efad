use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::views::{Dimension, SortKey, SortOrder, Viewable};

/// An interview. `company`/`position` are copied from the linked application
/// when it is chosen and are not kept in sync afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub application_id: Option<Uuid>,
    pub company: String,
    pub position: String,
    pub interview_type: String,
    pub interview_date: DateTime<Utc>,
    #[serde(default)]
    pub duration_minutes: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub interviewer_name: Option<String>,
    #[serde(default)]
    pub interviewer_title: Option<String>,
    #[serde(default)]
    pub interviewer_email: Option<String>,
    #[serde(default)]
    pub interviewer_linkedin: Option<String>,
    #[serde(default)]
    pub round_number: Option<i32>,
    pub status: String,
    #[serde(default)]
    pub preparation_notes: Option<String>,
    #[serde(default)]
    pub questions_to_ask: Option<String>,
    #[serde(default)]
    pub post_interview_notes: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    /// 1–5, set once the interview is completed.
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub follow_up_sent: Option<bool>,
    #[serde(default)]
    pub follow_up_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Viewable for InterviewRow {
    const DEFAULT_SORT: (&'static str, SortOrder) = ("interview_date", SortOrder::Asc);

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.company.as_str()),
            Some(self.position.as_str()),
            self.interviewer_name.as_deref(),
        ]
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Status => Some(self.status.as_str()),
            Dimension::Secondary => Some(self.interview_type.as_str()),
        }
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "interview_date" => SortKey::time(Some(self.interview_date)),
            "company" => SortKey::text(&self.company),
            "position" => SortKey::text(&self.position),
            "status" => SortKey::text(&self.status),
            "interview_type" => SortKey::text(&self.interview_type),
            "round_number" => SortKey::number(self.round_number.map(i64::from)),
            "rating" => SortKey::number(self.rating.map(i64::from)),
            "created_at" => SortKey::time(Some(self.created_at)),
            _ => None,
        }
    }
}
