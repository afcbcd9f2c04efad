//! Dashboard aggregates. Every time-windowed count takes `now` explicitly.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::models::labels::{ApplicationStatus, EventStatus, InterviewStatus, SurveyStatus};
use crate::models::{ApplicationRow, EventRow, InterviewRow, ResumeRow, SurveyRow};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub upcoming: usize,
    pub shortlisted: usize,
    pub offers: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InterviewStats {
    pub upcoming: usize,
    pub completed: usize,
    pub this_week: usize,
    /// Mean of all rated interviews, one decimal. `None` when nothing is rated.
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventStats {
    pub upcoming: usize,
    pub completed: usize,
    pub this_week: usize,
    pub this_month: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SurveyStats {
    pub pending: usize,
    pub completed: usize,
    pub due_soon: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResumeStats {
    pub total: usize,
    pub defaults: usize,
    pub recent: usize,
}

fn is(status: &str, expected: &str) -> bool {
    status == expected
}

/// `true` when `date` lies in `(now, now + window]`.
fn within(date: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    date > now && date <= now + window
}

pub fn application_stats(rows: &[ApplicationRow]) -> ApplicationStats {
    let count = |statuses: &[ApplicationStatus]| {
        rows.iter()
            .filter(|r| statuses.iter().any(|s| is(&r.status, s.as_str())))
            .count()
    };
    ApplicationStats {
        total: rows.len(),
        upcoming: count(&[ApplicationStatus::InterviewScheduled]),
        shortlisted: count(&[
            ApplicationStatus::Shortlisted,
            ApplicationStatus::InterviewCompleted,
        ]),
        offers: count(&[ApplicationStatus::OfferReceived]),
    }
}

pub fn interview_stats(rows: &[InterviewRow], now: DateTime<Utc>) -> InterviewStats {
    let scheduled = InterviewStatus::Scheduled.as_str();
    let ratings: Vec<i32> = rows.iter().filter_map(|r| r.rating).collect();
    let avg_rating = if ratings.is_empty() {
        None
    } else {
        let mean = ratings.iter().map(|r| f64::from(*r)).sum::<f64>() / ratings.len() as f64;
        Some((mean * 10.0).round() / 10.0)
    };

    InterviewStats {
        upcoming: rows
            .iter()
            .filter(|r| is(&r.status, scheduled) && r.interview_date > now)
            .count(),
        completed: rows
            .iter()
            .filter(|r| is(&r.status, InterviewStatus::Completed.as_str()))
            .count(),
        this_week: rows
            .iter()
            .filter(|r| is(&r.status, scheduled) && within(r.interview_date, now, Duration::days(7)))
            .count(),
        avg_rating,
    }
}

pub fn event_stats(rows: &[EventRow], now: DateTime<Utc>) -> EventStats {
    let upcoming = EventStatus::Upcoming.as_str();
    let upcoming_within = |window: Duration| {
        rows.iter()
            .filter(|r| is(&r.status, upcoming) && within(r.event_date, now, window))
            .count()
    };

    EventStats {
        upcoming: rows
            .iter()
            .filter(|r| is(&r.status, upcoming) && r.event_date > now)
            .count(),
        completed: rows
            .iter()
            .filter(|r| is(&r.status, EventStatus::Completed.as_str()))
            .count(),
        this_week: upcoming_within(Duration::days(7)),
        this_month: upcoming_within(Duration::days(30)),
    }
}

pub fn survey_stats(rows: &[SurveyRow], now: DateTime<Utc>) -> SurveyStats {
    let horizon = now + Duration::days(3);
    let due_soon = rows
        .iter()
        .filter(|r| {
            !is(&r.status, SurveyStatus::Completed.as_str())
                && !is(&r.status, SurveyStatus::Declined.as_str())
        })
        .filter_map(|r| r.due_date)
        .filter(|due| *due >= now && *due <= horizon)
        .count();

    SurveyStats {
        pending: rows
            .iter()
            .filter(|r| is(&r.status, SurveyStatus::Pending.as_str()))
            .count(),
        completed: rows
            .iter()
            .filter(|r| is(&r.status, SurveyStatus::Completed.as_str()))
            .count(),
        due_soon,
        total: rows.len(),
    }
}

pub fn resume_stats(rows: &[ResumeRow], now: DateTime<Utc>) -> ResumeStats {
    let cutoff = now - Duration::days(30);
    ResumeStats {
        total: rows.len(),
        defaults: rows.iter().filter(|r| r.is_default).count(),
        recent: rows.iter().filter(|r| r.created_at > cutoff).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn interview(status: &str, in_days: i64, rating: Option<i32>) -> InterviewRow {
        InterviewRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            application_id: None,
            company: "Google".to_string(),
            position: "SRE".to_string(),
            interview_type: "Phone Screen".to_string(),
            interview_date: now() + Duration::days(in_days),
            duration_minutes: Some(60),
            location: None,
            meeting_link: None,
            interviewer_name: None,
            interviewer_title: None,
            interviewer_email: None,
            interviewer_linkedin: None,
            round_number: Some(1),
            status: status.to_string(),
            preparation_notes: None,
            questions_to_ask: None,
            post_interview_notes: None,
            outcome: None,
            rating,
            follow_up_sent: None,
            follow_up_date: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    fn survey(status: &str, due_in_hours: Option<i64>) -> SurveyRow {
        SurveyRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            application_id: None,
            company: "Acme".to_string(),
            position: None,
            survey_type: "Candidate Experience".to_string(),
            survey_url: None,
            status: status.to_string(),
            priority: "Medium".to_string(),
            due_date: due_in_hours.map(|h| now() + Duration::hours(h)),
            requested_date: None,
            completed_date: None,
            requester_name: None,
            requester_email: None,
            description: None,
            notes: None,
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_interview_stats_windows() {
        let rows = vec![
            interview("Scheduled", 2, None),
            interview("Scheduled", 10, None),
            interview("Scheduled", -1, None),
            interview("Completed", -3, Some(4)),
            interview("Completed", -5, Some(5)),
            interview("Cancelled", -5, Some(2)),
        ];
        let stats = interview_stats(&rows, now());
        assert_eq!(stats.upcoming, 2);
        assert_eq!(stats.this_week, 1);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.avg_rating, Some(3.7));
    }

    #[test]
    fn test_avg_rating_absent_without_ratings() {
        let stats = interview_stats(&[interview("Scheduled", 1, None)], now());
        assert_eq!(stats.avg_rating, None);
    }

    #[test]
    fn test_due_soon_excludes_closed_and_past() {
        let rows = vec![
            survey("Pending", Some(24)),
            survey("In Progress", Some(71)),
            survey("Pending", Some(96)),
            survey("Pending", Some(-1)),
            survey("Completed", Some(24)),
            survey("Declined", Some(24)),
            survey("Pending", None),
        ];
        let stats = survey_stats(&rows, now());
        assert_eq!(stats.due_soon, 2);
        assert_eq!(stats.pending, 4);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.total, 7);
    }
}
