use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::linking::{LinkFields, ParentLinked};
use super::{
    clean, date_input, datetime_input, loose_bool, loose_string, number_input, one_of,
    parse_form_date, parse_form_datetime, parse_form_int, parse_form_uuid, require, text_input,
    NormalizeError, Submission,
};
use crate::models::labels::{InterviewStatus, INTERVIEW_OUTCOMES, INTERVIEW_TYPES};
use crate::models::InterviewRow;

const REQUIRED: &str = "Company, Position, and Interview Date are required";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewInterview {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<Uuid>,
    pub company: String,
    pub position: String,
    pub interview_type: String,
    pub interview_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewer_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviewer_linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_number: Option<i32>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preparation_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questions_to_ask: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_interview_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
    pub follow_up_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewForm {
    #[serde(deserialize_with = "loose_string")]
    pub application_id: String,
    #[serde(deserialize_with = "loose_string")]
    pub company: String,
    #[serde(deserialize_with = "loose_string")]
    pub position: String,
    #[serde(deserialize_with = "loose_string")]
    pub interview_type: String,
    /// `YYYY-MM-DDTHH:mm`
    #[serde(deserialize_with = "loose_string")]
    pub interview_date: String,
    #[serde(deserialize_with = "loose_string")]
    pub duration_minutes: String,
    #[serde(deserialize_with = "loose_string")]
    pub location: String,
    #[serde(deserialize_with = "loose_string")]
    pub meeting_link: String,
    #[serde(deserialize_with = "loose_string")]
    pub interviewer_name: String,
    #[serde(deserialize_with = "loose_string")]
    pub interviewer_title: String,
    #[serde(deserialize_with = "loose_string")]
    pub interviewer_email: String,
    #[serde(deserialize_with = "loose_string")]
    pub interviewer_linkedin: String,
    #[serde(deserialize_with = "loose_string")]
    pub round_number: String,
    #[serde(deserialize_with = "loose_string")]
    pub status: String,
    #[serde(deserialize_with = "loose_string")]
    pub preparation_notes: String,
    #[serde(deserialize_with = "loose_string")]
    pub questions_to_ask: String,
    #[serde(deserialize_with = "loose_string")]
    pub post_interview_notes: String,
    #[serde(deserialize_with = "loose_string")]
    pub outcome: String,
    #[serde(deserialize_with = "loose_string")]
    pub rating: String,
    #[serde(deserialize_with = "loose_bool")]
    pub follow_up_sent: bool,
    /// `YYYY-MM-DD`
    #[serde(deserialize_with = "loose_string")]
    pub follow_up_date: String,
}

impl Default for InterviewForm {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            company: String::new(),
            position: String::new(),
            interview_type: "Phone Screen".to_string(),
            interview_date: String::new(),
            duration_minutes: "60".to_string(),
            location: String::new(),
            meeting_link: String::new(),
            interviewer_name: String::new(),
            interviewer_title: String::new(),
            interviewer_email: String::new(),
            interviewer_linkedin: String::new(),
            round_number: "1".to_string(),
            status: InterviewStatus::Scheduled.to_string(),
            preparation_notes: String::new(),
            questions_to_ask: String::new(),
            post_interview_notes: String::new(),
            outcome: String::new(),
            rating: String::new(),
            follow_up_sent: false,
            follow_up_date: String::new(),
        }
    }
}

impl Submission for InterviewForm {
    type Output = NewInterview;

    fn normalize(self, user_id: Uuid, _now: DateTime<Utc>) -> Result<NewInterview, NormalizeError> {
        let company = require(&self.company, REQUIRED)?;
        let position = require(&self.position, REQUIRED)?;
        let interview_date = parse_form_datetime("interview_date", &self.interview_date)?
            .ok_or(NormalizeError::Required(REQUIRED))?;

        let interview_type = clean(&self.interview_type).unwrap_or_else(|| "Phone Screen".to_string());
        let status = clean(&self.status).unwrap_or_else(|| InterviewStatus::Scheduled.to_string());
        let outcome = clean(&self.outcome)
            .map(|o| one_of("outcome", o, INTERVIEW_OUTCOMES))
            .transpose()?;
        let rating = parse_form_int("rating", &self.rating)?;
        if let Some(r) = rating {
            if !(1..=5).contains(&r) {
                return Err(NormalizeError::Invalid {
                    field: "rating",
                    value: r.to_string(),
                });
            }
        }

        Ok(NewInterview {
            user_id,
            application_id: parse_form_uuid("application_id", &self.application_id)?,
            company,
            position,
            interview_type: one_of("interview_type", interview_type, INTERVIEW_TYPES)?,
            interview_date,
            duration_minutes: parse_form_int("duration_minutes", &self.duration_minutes)?,
            location: clean(&self.location),
            meeting_link: clean(&self.meeting_link),
            interviewer_name: clean(&self.interviewer_name),
            interviewer_title: clean(&self.interviewer_title),
            interviewer_email: clean(&self.interviewer_email),
            interviewer_linkedin: clean(&self.interviewer_linkedin),
            round_number: parse_form_int("round_number", &self.round_number)?,
            status: one_of("status", status, InterviewStatus::LABELS)?,
            preparation_notes: clean(&self.preparation_notes),
            questions_to_ask: clean(&self.questions_to_ask),
            post_interview_notes: clean(&self.post_interview_notes),
            outcome,
            rating,
            follow_up_sent: self.follow_up_sent,
            follow_up_date: parse_form_date("follow_up_date", &self.follow_up_date)?,
        })
    }
}

impl From<&InterviewRow> for InterviewForm {
    fn from(row: &InterviewRow) -> Self {
        Self {
            application_id: row.application_id.map(|id| id.to_string()).unwrap_or_default(),
            company: row.company.clone(),
            position: row.position.clone(),
            interview_type: row.interview_type.clone(),
            interview_date: datetime_input(Some(row.interview_date)),
            duration_minutes: number_input(row.duration_minutes),
            location: text_input(row.location.as_ref()),
            meeting_link: text_input(row.meeting_link.as_ref()),
            interviewer_name: text_input(row.interviewer_name.as_ref()),
            interviewer_title: text_input(row.interviewer_title.as_ref()),
            interviewer_email: text_input(row.interviewer_email.as_ref()),
            interviewer_linkedin: text_input(row.interviewer_linkedin.as_ref()),
            round_number: number_input(row.round_number),
            status: row.status.clone(),
            preparation_notes: text_input(row.preparation_notes.as_ref()),
            questions_to_ask: text_input(row.questions_to_ask.as_ref()),
            post_interview_notes: text_input(row.post_interview_notes.as_ref()),
            outcome: text_input(row.outcome.as_ref()),
            rating: number_input(row.rating),
            follow_up_sent: row.follow_up_sent.unwrap_or(false),
            follow_up_date: date_input(row.follow_up_date),
        }
    }
}

impl ParentLinked for InterviewForm {
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

    fn filled() -> InterviewForm {
        InterviewForm {
            company: "Google".to_string(),
            position: "SRE".to_string(),
            interview_date: "2024-06-12T15:30".to_string(),
            interviewer_name: "Dana".to_string(),
            rating: "4".to_string(),
            status: "Completed".to_string(),
            outcome: "Pending Feedback".to_string(),
            follow_up_date: "2024-06-14".to_string(),
            ..InterviewForm::default()
        }
    }

    #[test]
    fn test_required_fields() {
        let err = InterviewForm::default()
            .normalize(Uuid::nil(), now())
            .unwrap_err();
        assert_eq!(err, NormalizeError::Required(REQUIRED));
    }

    #[test]
    fn test_numeric_strings_become_integers() {
        let record = filled().normalize(Uuid::nil(), now()).unwrap();
        assert_eq!(record.rating, Some(4));
        assert_eq!(record.duration_minutes, Some(60));
        assert_eq!(record.round_number, Some(1));
        assert_eq!(
            record.follow_up_date,
            Some(Utc.with_ymd_and_hms(2024, 6, 14, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_empty_rating_is_omitted() {
        let form = InterviewForm {
            rating: "".to_string(),
            ..filled()
        };
        let record = form.normalize(Uuid::nil(), now()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("rating").is_none());
        assert!(json.get("meeting_link").is_none());
    }

    #[test]
    fn test_rating_out_of_range_is_rejected() {
        let form = InterviewForm {
            rating: "9".to_string(),
            ..filled()
        };
        assert!(form.normalize(Uuid::nil(), now()).is_err());
    }

    #[test]
    fn test_reverse_then_forward_is_fixed_point() {
        let form = filled();
        let row: InterviewRow = stored_row(&form.clone().normalize(Uuid::nil(), now()).unwrap(), now());
        let reversed = InterviewForm::from(&row);
        assert_eq!(reversed, form);

        let again: InterviewRow =
            stored_row(&reversed.normalize(Uuid::nil(), now()).unwrap(), now());
        assert_eq!(InterviewForm::from(&again), form);
    }
}
