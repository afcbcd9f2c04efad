//! Per-entity wiring for the generic CRUD and list handlers.
//!
//! Each marker type ties a table to its row model, its form, its filter
//! vocabularies, and its dashboard stats. Handlers in `handlers` are generic
//! over `Resource` and are mounted once per entity.

pub mod handlers;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::models::labels::{
    ApplicationStatus, BadgeTone, EventStatus, InterviewStatus, Priority, SurveyStatus,
    EVENT_TYPES, INTERVIEW_TYPES, RESUME_TYPES,
};
use crate::models::{ApplicationRow, EventRow, InterviewRow, ResumeRow, SurveyRow};
use crate::normalize::{
    apply_parent_link, ApplicationForm, EventForm, InterviewForm, ParentLinked, ResumeForm,
    Submission, SurveyForm,
};
use crate::store::Table;
use crate::views::stats::{self, ApplicationStats, EventStats, InterviewStats, ResumeStats, SurveyStats};
use crate::views::Viewable;

pub trait Resource: Send + Sync + 'static {
    const TABLE: Table;
    /// Used in not-found messages.
    const NAME: &'static str;

    type Row: Viewable + DeserializeOwned + Serialize + Clone + Send + Sync;
    type Form: Submission + Serialize + for<'a> From<&'a Self::Row>;
    type Stats: Serialize + Send;

    /// Values counted for the status filter; empty when the entity has no status.
    const STATUS_VALUES: &'static [&'static str];
    /// Values counted for the secondary (type or priority) filter.
    const SECONDARY_VALUES: &'static [&'static str];
    const STATUS_TONE: Option<fn(&str) -> BadgeTone>;
    const SECONDARY_TONE: Option<fn(&str) -> BadgeTone> = None;

    fn stats(rows: &[Self::Row], now: DateTime<Utc>) -> Self::Stats;

    /// The application a submitted form links to, if the entity supports links.
    fn parent_of(_form: &Self::Form) -> Option<Uuid> {
        None
    }

    fn link_parent(_form: &mut Self::Form, _parent: &ApplicationRow) {}
}

pub struct Applications;
pub struct Interviews;
pub struct Events;
pub struct Surveys;
pub struct Resumes;

impl Resource for Applications {
    const TABLE: Table = Table::Applications;
    const NAME: &'static str = "Application";
    type Row = ApplicationRow;
    type Form = ApplicationForm;
    type Stats = ApplicationStats;

    const STATUS_VALUES: &'static [&'static str] = ApplicationStatus::LABELS;
    const SECONDARY_VALUES: &'static [&'static str] = &[];
    const STATUS_TONE: Option<fn(&str) -> BadgeTone> = Some(ApplicationStatus::tone_of);

    fn stats(rows: &[ApplicationRow], _now: DateTime<Utc>) -> ApplicationStats {
        stats::application_stats(rows)
    }
}

impl Resource for Interviews {
    const TABLE: Table = Table::Interviews;
    const NAME: &'static str = "Interview";
    type Row = InterviewRow;
    type Form = InterviewForm;
    type Stats = InterviewStats;

    const STATUS_VALUES: &'static [&'static str] = InterviewStatus::LABELS;
    const SECONDARY_VALUES: &'static [&'static str] = INTERVIEW_TYPES;
    const STATUS_TONE: Option<fn(&str) -> BadgeTone> = Some(InterviewStatus::tone_of);

    fn stats(rows: &[InterviewRow], now: DateTime<Utc>) -> InterviewStats {
        stats::interview_stats(rows, now)
    }

    fn parent_of(form: &InterviewForm) -> Option<Uuid> {
        form.parent_id()
    }

    fn link_parent(form: &mut InterviewForm, parent: &ApplicationRow) {
        apply_parent_link(form, parent);
    }
}

impl Resource for Events {
    const TABLE: Table = Table::Events;
    const NAME: &'static str = "Event";
    type Row = EventRow;
    type Form = EventForm;
    type Stats = EventStats;

    const STATUS_VALUES: &'static [&'static str] = EventStatus::LABELS;
    const SECONDARY_VALUES: &'static [&'static str] = EVENT_TYPES;
    const STATUS_TONE: Option<fn(&str) -> BadgeTone> = Some(EventStatus::tone_of);

    fn stats(rows: &[EventRow], now: DateTime<Utc>) -> EventStats {
        stats::event_stats(rows, now)
    }

    fn parent_of(form: &EventForm) -> Option<Uuid> {
        form.parent_id()
    }

    fn link_parent(form: &mut EventForm, parent: &ApplicationRow) {
        apply_parent_link(form, parent);
    }
}

impl Resource for Surveys {
    const TABLE: Table = Table::Surveys;
    const NAME: &'static str = "Survey";
    type Row = SurveyRow;
    type Form = SurveyForm;
    type Stats = SurveyStats;

    const STATUS_VALUES: &'static [&'static str] = SurveyStatus::LABELS;
    const SECONDARY_VALUES: &'static [&'static str] = Priority::LABELS;
    const STATUS_TONE: Option<fn(&str) -> BadgeTone> = Some(SurveyStatus::tone_of);
    const SECONDARY_TONE: Option<fn(&str) -> BadgeTone> = Some(Priority::tone_of);

    fn stats(rows: &[SurveyRow], now: DateTime<Utc>) -> SurveyStats {
        stats::survey_stats(rows, now)
    }

    fn parent_of(form: &SurveyForm) -> Option<Uuid> {
        form.parent_id()
    }

    fn link_parent(form: &mut SurveyForm, parent: &ApplicationRow) {
        apply_parent_link(form, parent);
    }
}

impl Resource for Resumes {
    const TABLE: Table = Table::Resumes;
    const NAME: &'static str = "Resume";
    type Row = ResumeRow;
    type Form = ResumeForm;
    type Stats = ResumeStats;

    const STATUS_VALUES: &'static [&'static str] = &[];
    const SECONDARY_VALUES: &'static [&'static str] = RESUME_TYPES;
    const STATUS_TONE: Option<fn(&str) -> BadgeTone> = None;

    fn stats(rows: &[ResumeRow], now: DateTime<Utc>) -> ResumeStats {
        stats::resume_stats(rows, now)
    }
}
