use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::linking::{LinkFields, ParentLinked};
use super::{
    clean, date_input, datetime_input, loose_bool, loose_string, number_input, one_of,
    parse_form_date, parse_form_datetime, parse_form_int, parse_form_uuid, require, text_input,
    NormalizeError, Submission,
};
use crate::models::labels::{EventStatus, EVENT_TYPES};
use crate::models::EventRow;

const REQUIRED: &str = "Title and Event Date are required";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvent {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<Uuid>,
    pub title: String,
    pub event_type: String,
    pub event_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub is_all_day: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_hours_before: Option<i32>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contacts_made: Option<String>,
}

/// Date fields hold `YYYY-MM-DD` when `is_all_day` is set and
/// `YYYY-MM-DDTHH:mm` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventForm {
    #[serde(deserialize_with = "loose_string")]
    pub application_id: String,
    #[serde(deserialize_with = "loose_string")]
    pub title: String,
    #[serde(deserialize_with = "loose_string")]
    pub event_type: String,
    #[serde(deserialize_with = "loose_string")]
    pub event_date: String,
    #[serde(deserialize_with = "loose_string")]
    pub end_date: String,
    #[serde(deserialize_with = "loose_string")]
    pub location: String,
    #[serde(deserialize_with = "loose_string")]
    pub event_link: String,
    #[serde(deserialize_with = "loose_string")]
    pub company: String,
    #[serde(deserialize_with = "loose_string")]
    pub description: String,
    #[serde(deserialize_with = "loose_string")]
    pub notes: String,
    #[serde(deserialize_with = "loose_bool")]
    pub is_all_day: bool,
    #[serde(deserialize_with = "loose_string")]
    pub reminder_hours_before: String,
    #[serde(deserialize_with = "loose_string")]
    pub status: String,
    #[serde(deserialize_with = "loose_string")]
    pub outcome: String,
    #[serde(deserialize_with = "loose_string")]
    pub contacts_made: String,
}

impl Default for EventForm {
    fn default() -> Self {
        Self {
            application_id: String::new(),
            title: String::new(),
            event_type: "Career Fair".to_string(),
            event_date: String::new(),
            end_date: String::new(),
            location: String::new(),
            event_link: String::new(),
            company: String::new(),
            description: String::new(),
            notes: String::new(),
            is_all_day: false,
            reminder_hours_before: "24".to_string(),
            status: EventStatus::Upcoming.to_string(),
            outcome: String::new(),
            contacts_made: String::new(),
        }
    }
}

impl EventForm {
    fn parse_when(&self, field: &'static str, value: &str) -> Result<Option<DateTime<Utc>>, NormalizeError> {
        if self.is_all_day {
            parse_form_date(field, value)
        } else {
            parse_form_datetime(field, value)
        }
    }
}

impl Submission for EventForm {
    type Output = NewEvent;

    fn normalize(self, user_id: Uuid, _now: DateTime<Utc>) -> Result<NewEvent, NormalizeError> {
        let title = require(&self.title, REQUIRED)?;
        let event_date = self
            .parse_when("event_date", &self.event_date)?
            .ok_or(NormalizeError::Required(REQUIRED))?;
        let end_date = self.parse_when("end_date", &self.end_date)?;
        let event_type = clean(&self.event_type).unwrap_or_else(|| "Career Fair".to_string());
        let status = clean(&self.status).unwrap_or_else(|| EventStatus::Upcoming.to_string());

        Ok(NewEvent {
            user_id,
            application_id: parse_form_uuid("application_id", &self.application_id)?,
            title,
            event_type: one_of("event_type", event_type, EVENT_TYPES)?,
            event_date,
            end_date,
            location: clean(&self.location),
            event_link: clean(&self.event_link),
            company: clean(&self.company),
            description: clean(&self.description),
            notes: clean(&self.notes),
            is_all_day: self.is_all_day,
            reminder_hours_before: parse_form_int("reminder_hours_before", &self.reminder_hours_before)?,
            status: one_of("status", status, EventStatus::LABELS)?,
            outcome: clean(&self.outcome),
            contacts_made: clean(&self.contacts_made),
        })
    }
}

impl From<&EventRow> for EventForm {
    fn from(row: &EventRow) -> Self {
        let when = |value: Option<DateTime<Utc>>| {
            if row.is_all_day {
                date_input(value)
            } else {
                datetime_input(value)
            }
        };
        Self {
            application_id: row.application_id.map(|id| id.to_string()).unwrap_or_default(),
            title: row.title.clone(),
            event_type: row.event_type.clone(),
            event_date: when(Some(row.event_date)),
            end_date: when(row.end_date),
            location: text_input(row.location.as_ref()),
            event_link: text_input(row.event_link.as_ref()),
            company: text_input(row.company.as_ref()),
            description: text_input(row.description.as_ref()),
            notes: text_input(row.notes.as_ref()),
            is_all_day: row.is_all_day,
            reminder_hours_before: number_input(row.reminder_hours_before),
            status: row.status.clone(),
            outcome: text_input(row.outcome.as_ref()),
            contacts_made: text_input(row.contacts_made.as_ref()),
        }
    }
}

impl ParentLinked for EventForm {
    fn link_fields(&mut self) -> LinkFields<'_> {
        LinkFields {
            application_id: &mut self.application_id,
            company: &mut self.company,
            position: None,
        }
    }

    fn application_id(&self) -> &str {
        &self.application_id
    }
}
