use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::views::{Dimension, SortKey, SortOrder, Viewable};

/// A feedback or survey request tied to a job search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRow {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub application_id: Option<Uuid>,
    pub company: String,
    #[serde(default)]
    pub position: Option<String>,
    pub survey_type: String,
    #[serde(default)]
    pub survey_url: Option<String>,
    pub status: String,
    pub priority: String,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub requested_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub requester_name: Option<String>,
    #[serde(default)]
    pub requester_email: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Viewable for SurveyRow {
    const DEFAULT_SORT: (&'static str, SortOrder) = ("due_date", SortOrder::Asc);

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.company.as_str()),
            self.position.as_deref(),
            Some(self.survey_type.as_str()),
        ]
    }

    fn dimension(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Status => Some(self.status.as_str()),
            Dimension::Secondary => Some(self.priority.as_str()),
        }
    }

    fn sort_key(&self, field: &str) -> Option<SortKey> {
        match field {
            "due_date" => SortKey::time(self.due_date),
            "requested_date" => SortKey::time(self.requested_date),
            "completed_date" => SortKey::time(self.completed_date),
            "priority" => SortKey::text(&self.priority),
            "company" => SortKey::text(&self.company),
            "status" => SortKey::text(&self.status),
            "survey_type" => SortKey::text(&self.survey_type),
            "created_at" => SortKey::time(Some(self.created_at)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::{apply_view, ViewConfig};

    fn survey(priority: &str) -> SurveyRow {
        SurveyRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            application_id: None,
            company: "Acme".to_string(),
            position: None,
            survey_type: "Other".to_string(),
            survey_url: None,
            status: "Pending".to_string(),
            priority: priority.to_string(),
            due_date: None,
            requested_date: None,
            completed_date: None,
            requester_name: None,
            requester_email: None,
            description: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_priority_sorts_as_case_insensitive_text() {
        let rows: Vec<SurveyRow> = ["Urgent", "high", "Low", "Medium", "Custom"]
            .into_iter()
            .map(survey)
            .collect();
        let config = ViewConfig {
            sort_field: "priority".to_string(),
            sort_order: SortOrder::Asc,
            ..ViewConfig::defaults_for::<SurveyRow>()
        };

        let sorted: Vec<String> = apply_view(&rows, &config)
            .into_iter()
            .map(|r| r.priority)
            .collect();

        assert_eq!(sorted, vec!["Custom", "high", "Low", "Medium", "Urgent"]);
    }
}
