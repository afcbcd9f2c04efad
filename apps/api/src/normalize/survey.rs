use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::linking::{LinkFields, ParentLinked};
use super::{
    clean, date_input, loose_string, one_of, parse_form_date, parse_form_uuid, require,
    text_input, NormalizeError, Submission,
};
use crate::models::labels::{Priority, SurveyStatus, SURVEY_TYPES};
use crate::models::SurveyRow;

const REQUIRED: &str = "Company and Survey Type are required";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSurvey {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<Uuid>,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    pub survey_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_url: Option<String>,
    pub status: String,
    pub priority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// All three dates are date-only inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyForm {
    #[serde(deserialize_with = "loose_string")]
    pub application_id: String,
    #[serde(deserialize_with = "loose_string")]
    pub company: String,
    #[serde(deserialize_with = "loose_string")]
    pub position: String,
    #[serde(deserialize_with = "loose_string")]
    pub survey_type: String,
    #[serde(deserialize_with = "loose_string")]
    pub survey_url: String,
    #[serde(deserialize_with = "loose_string")]
    pub status: String,
    #[serde(deserialize_with = "loose_string")]
    pub priority: String,
    #[serde(deserialize_with = "loose_string")]
    pub due_date: String,
    #[serde(deserialize_with = "loose_string")]
    pub requested_date: String,
    #[serde(deserialize_with = "loose_string")]
    pub completed_date: String,
    #[serde(deserialize_with = "loose_string")]
    pub requester_name: String,
    #[serde(deserialize_with = "loose_string")]
    pub requester_email: String,
    #[serde(deserialize_with = "loose_string")]
    pub description: String,
    #[serde(deserialize_with = "loose_string")]
    pub notes: String,
}

impl Default for SurveyForm {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            company: String::new(),
            position: String::new(),
            survey_type: String::new(),
            survey_url: String::new(),
            status: SurveyStatus::Pending.to_string(),
            priority: Priority::Medium.to_string(),
            due_date: String::new(),
            requested_date: String::new(),
            completed_date: String::new(),
            requester_name: String::new(),
            requester_email: String::new(),
            description: String::new(),
            notes: String::new(),
        }
    }
}

impl Submission for SurveyForm {
    type Output = NewSurvey;

    fn normalize(self, user_id: Uuid, _now: DateTime<Utc>) -> Result<NewSurvey, NormalizeError> {
        let company = require(&self.company, REQUIRED)?;
        let survey_type = require(&self.survey_type, REQUIRED)?;
        let status = clean(&self.status).unwrap_or_else(|| SurveyStatus::Pending.to_string());
        let priority = clean(&self.priority).unwrap_or_else(|| Priority::Medium.to_string());

        Ok(NewSurvey {
            user_id,
            application_id: parse_form_uuid("application_id", &self.application_id)?,
            company,
            position: clean(&self.position),
            survey_type: one_of("survey_type", survey_type, SURVEY_TYPES)?,
            survey_url: clean(&self.survey_url),
            status: one_of("status", status, SurveyStatus::LABELS)?,
            priority: one_of("priority", priority, Priority::LABELS)?,
            due_date: parse_form_date("due_date", &self.due_date)?,
            requested_date: parse_form_date("requested_date", &self.requested_date)?,
            completed_date: parse_form_date("completed_date", &self.completed_date)?,
            requester_name: clean(&self.requester_name),
            requester_email: clean(&self.requester_email),
            description: clean(&self.description),
            notes: clean(&self.notes),
        })
    }
}

impl From<&SurveyRow> for SurveyForm {
    fn from(row: &SurveyRow) -> Self {
        Self {
            application_id: row.application_id.map(|id| id.to_string()).unwrap_or_default(),
            company: row.company.clone(),
            position: text_input(row.position.as_ref()),
            survey_type: row.survey_type.clone(),
            survey_url: text_input(row.survey_url.as_ref()),
            status: row.status.clone(),
            priority: row.priority.clone(),
            due_date: date_input(row.due_date),
            requested_date: date_input(row.requested_date),
            completed_date: date_input(row.completed_date),
            requester_name: text_input(row.requester_name.as_ref()),
            requester_email: text_input(row.requester_email.as_ref()),
            description: text_input(row.description.as_ref()),
            notes: text_input(row.notes.as_ref()),
        }
    }
}

impl ParentLinked for SurveyForm {
    fn link_fields(&mut self) -> LinkFields<'_> {
        LinkFields {
            application_id: &mut self.application_id,
            company: &mut self.company,
            position: Some(&mut self.position),
        }
    }

    fn application_id(&self) -> &str {
        &self.application_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::stored_row;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults_and_round_trip() {
        let form = SurveyForm {
            company: "Acme".to_string(),
            survey_type: "Candidate Experience".to_string(),
            due_date: "2024-06-13".to_string(),
            ..SurveyForm::default()
        };
        let record = form.clone().normalize(Uuid::nil(), now()).unwrap();
        assert_eq!(record.status, "Pending");
        assert_eq!(record.priority, "Medium");
        assert_eq!(record.due_date, Some(Utc.with_ymd_and_hms(2024, 6, 13, 0, 0, 0).unwrap()));

        let row: SurveyRow = stored_row(&record, now());
        assert_eq!(SurveyForm::from(&row), form);
    }

    #[test]
    fn test_unknown_priority_is_rejected() {
        let form = SurveyForm {
            company: "Acme".to_string(),
            survey_type: "Other".to_string(),
            priority: "Whenever".to_string(),
            ..SurveyForm::default()
        };
        assert!(matches!(
            form.normalize(Uuid::nil(), now()),
            Err(NormalizeError::Invalid { field: "priority", .. })
        ));
    }
}
