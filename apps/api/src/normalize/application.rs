use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{clean, clean_opt, hostname_of, loose_string, one_of, NormalizeError, Submission};
use crate::models::labels::ApplicationStatus;
use crate::models::ApplicationRow;

pub const UNKNOWN_COMPANY: &str = "Unknown Company";
pub const EXTENSION_NOTE: &str = "Auto-saved from browser extension - please verify details";
pub const MISSING_IDENTITY: &str = "At least company, position, or job URL is required";

/// Canonical application write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewApplication {
    pub user_id: Uuid,
    pub company: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_date: Option<NaiveDate>,
}

/// `"Position from <host>"`, or `"Position from website"` without a usable URL.
pub fn placeholder_position(job_url: Option<&str>) -> String {
    let host = job_url
        .and_then(hostname_of)
        .unwrap_or_else(|| "website".to_string());
    format!("Position from {host}")
}

/// Body of `POST /api/applications/from-extension`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionPayload {
    pub company: Option<String>,
    pub position: Option<String>,
    pub job_url: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub notes: Option<String>,
    pub source_url: Option<String>,
    pub extracted_at: Option<String>,
}

impl ExtensionPayload {
    /// At least one of company, position, or job URL carries text.
    pub fn is_identifiable(&self) -> bool {
        [&self.company, &self.position, &self.job_url]
            .iter()
            .any(|field| clean_opt(field.as_deref()).is_some())
    }
}

impl Submission for ExtensionPayload {
    type Output = NewApplication;

    fn normalize(self, user_id: Uuid, now: DateTime<Utc>) -> Result<NewApplication, NormalizeError> {
        if !self.is_identifiable() {
            return Err(NormalizeError::Required(MISSING_IDENTITY));
        }

        // The placeholder names the posting's own host; the page URL only backs up the stored link.
        let posting_url = clean_opt(self.job_url.as_deref());
        let position = clean_opt(self.position.as_deref())
            .unwrap_or_else(|| placeholder_position(posting_url.as_deref()));
        let job_url = posting_url.or_else(|| clean_opt(self.source_url.as_deref()));

        Ok(NewApplication {
            user_id,
            company: clean_opt(self.company.as_deref()).unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            position,
            location: clean_opt(self.location.as_deref()),
            salary: clean_opt(self.salary.as_deref()),
            job_url,
            notes: Some(clean_opt(self.notes.as_deref()).unwrap_or_else(|| EXTENSION_NOTE.to_string())),
            status: ApplicationStatus::Applied.to_string(),
            applied_date: Some(now.date_naive()),
        })
    }
}

/// Editable application state, as the web client's form holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    #[serde(deserialize_with = "loose_string")]
    pub company: String,
    #[serde(deserialize_with = "loose_string")]
    pub position: String,
    #[serde(deserialize_with = "loose_string")]
    pub location: String,
    #[serde(deserialize_with = "loose_string")]
    pub salary: String,
    #[serde(deserialize_with = "loose_string")]
    pub job_url: String,
    #[serde(deserialize_with = "loose_string")]
    pub notes: String,
    #[serde(deserialize_with = "loose_string")]
    pub status: String,
    #[serde(deserialize_with = "loose_string")]
    pub applied_date: String,
}

impl Default for ApplicationForm {
    fn default() -> Self {
        Self {
            company: String::new(),
            position: String::new(),
            location: String::new(),
            salary: String::new(),
            job_url: String::new(),
            notes: String::new(),
            status: ApplicationStatus::Applied.to_string(),
            applied_date: String::new(),
        }
    }
}

impl Submission for ApplicationForm {
    type Output = NewApplication;

    fn normalize(self, user_id: Uuid, now: DateTime<Utc>) -> Result<NewApplication, NormalizeError> {
        let job_url = clean(&self.job_url);
        if clean(&self.company).is_none() && clean(&self.position).is_none() && job_url.is_none() {
            return Err(NormalizeError::Required(MISSING_IDENTITY));
        }

        let applied_date = match clean(&self.applied_date) {
            None => now.date_naive(),
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                NormalizeError::Invalid {
                    field: "applied_date",
                    value: raw.clone(),
                }
            })?,
        };
        let status = clean(&self.status).unwrap_or_else(|| ApplicationStatus::Applied.to_string());

        Ok(NewApplication {
            user_id,
            company: clean(&self.company).unwrap_or_else(|| UNKNOWN_COMPANY.to_string()),
            position: clean(&self.position)
                .unwrap_or_else(|| placeholder_position(job_url.as_deref())),
            location: clean(&self.location),
            salary: clean(&self.salary),
            job_url,
            notes: clean(&self.notes),
            status: one_of("status", status, ApplicationStatus::LABELS)?,
            applied_date: Some(applied_date),
        })
    }
}

impl From<&ApplicationRow> for ApplicationForm {
    fn from(row: &ApplicationRow) -> Self {
        Self {
            company: row.company.clone(),
            position: row.position.clone(),
            location: row.location.clone().unwrap_or_default(),
            salary: row.salary.clone().unwrap_or_default(),
            job_url: row.job_url.clone().unwrap_or_default(),
            notes: row.notes.clone().unwrap_or_default(),
            status: row.status.clone(),
            applied_date: row
                .applied_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_position_defaults_to_job_url_host() {
        let payload = ExtensionPayload {
            company: Some("Acme".to_string()),
            position: Some("".to_string()),
            job_url: Some("https://jobs.acme.com/123".to_string()),
            ..ExtensionPayload::default()
        };
        let record = payload.normalize(Uuid::nil(), now()).unwrap();

        assert_eq!(record.position, "Position from jobs.acme.com");
        assert_eq!(record.company, "Acme");
        assert_eq!(record.status, "Applied");
        assert_eq!(record.applied_date, NaiveDate::from_ymd_opt(2024, 6, 10));
        assert_eq!(record.notes.as_deref(), Some(EXTENSION_NOTE));
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let err = ExtensionPayload::default()
            .normalize(Uuid::nil(), now())
            .unwrap_err();
        assert_eq!(err.to_string(), MISSING_IDENTITY);

        let whitespace = ExtensionPayload {
            company: Some("   ".to_string()),
            source_url: Some("https://example.com".to_string()),
            ..ExtensionPayload::default()
        };
        assert!(!whitespace.is_identifiable());
    }

    #[test]
    fn test_source_url_backs_up_job_url() {
        let payload = ExtensionPayload {
            position: Some(" Staff Engineer ".to_string()),
            source_url: Some("https://boards.greenhouse.io/acme/jobs/1".to_string()),
            ..ExtensionPayload::default()
        };
        let record = payload.normalize(Uuid::nil(), now()).unwrap();
        assert_eq!(record.company, UNKNOWN_COMPANY);
        assert_eq!(record.position, "Staff Engineer");
        assert_eq!(
            record.job_url.as_deref(),
            Some("https://boards.greenhouse.io/acme/jobs/1")
        );
    }

    #[test]
    fn test_placeholder_ignores_source_url_host() {
        let payload = ExtensionPayload {
            company: Some("Acme".to_string()),
            source_url: Some("https://www.linkedin.com/jobs/view/42".to_string()),
            ..ExtensionPayload::default()
        };
        let record = payload.normalize(Uuid::nil(), now()).unwrap();
        assert_eq!(record.position, "Position from website");
        assert_eq!(
            record.job_url.as_deref(),
            Some("https://www.linkedin.com/jobs/view/42")
        );
    }

    #[test]
    fn test_unparseable_url_falls_back_to_website() {
        assert_eq!(placeholder_position(Some("jobs/123")), "Position from website");
        assert_eq!(placeholder_position(None), "Position from website");
    }

    #[test]
    fn test_empty_optionals_are_omitted_from_write() {
        let payload = ExtensionPayload {
            company: Some("Acme".to_string()),
            location: Some("  ".to_string()),
            ..ExtensionPayload::default()
        };
        let record = payload.normalize(Uuid::nil(), now()).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("location").is_none());
        assert!(json.get("salary").is_none());
        assert!(json.get("job_url").is_none());
    }

    #[test]
    fn test_form_rejects_unknown_status() {
        let form = ApplicationForm {
            company: "Acme".to_string(),
            status: "Ghosted".to_string(),
            ..ApplicationForm::default()
        };
        assert!(matches!(
            form.normalize(Uuid::nil(), now()),
            Err(NormalizeError::Invalid { field: "status", .. })
        ));
    }
}
