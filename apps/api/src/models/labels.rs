//! Fixed label vocabularies: statuses, priorities, and their badge tones.
//!
//! Labels are persisted verbatim (e.g. `"Interview Scheduled"`), so each enum
//! serializes to its display label.

use serde::{Deserialize, Serialize};

/// Display tone for a status badge. Unknown labels render `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Blue,
    Cyan,
    Purple,
    Indigo,
    Green,
    Emerald,
    Red,
    Orange,
    Yellow,
    Gray,
    Neutral,
}

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $label:literal : $tone:ident),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                match label {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn tone(self) -> BadgeTone {
                match self {
                    $($name::$variant => BadgeTone::$tone),+
                }
            }

            /// Tone for a raw stored label; anything outside the vocabulary is neutral.
            pub fn tone_of(label: &str) -> BadgeTone {
                Self::from_label(label).map_or(BadgeTone::Neutral, Self::tone)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum! {
    ApplicationStatus {
        Applied => "Applied": Blue,
        Shortlisted => "Shortlisted": Cyan,
        InterviewScheduled => "Interview Scheduled": Purple,
        InterviewCompleted => "Interview Completed": Indigo,
        OfferReceived => "Offer Received": Green,
        Rejected => "Rejected": Red,
        Accepted => "Accepted": Emerald,
        Withdrawn => "Withdrawn": Gray,
    }
}

label_enum! {
    InterviewStatus {
        Scheduled => "Scheduled": Blue,
        Completed => "Completed": Green,
        Cancelled => "Cancelled": Red,
        Rescheduled => "Rescheduled": Yellow,
        NoShow => "No Show": Gray,
    }
}

label_enum! {
    EventStatus {
        Upcoming => "Upcoming": Blue,
        Completed => "Completed": Green,
        Cancelled => "Cancelled": Gray,
    }
}

label_enum! {
    SurveyStatus {
        Pending => "Pending": Yellow,
        InProgress => "In Progress": Blue,
        Completed => "Completed": Green,
        Declined => "Declined": Red,
        Expired => "Expired": Gray,
    }
}

label_enum! {
    Priority {
        Low => "Low": Gray,
        Medium => "Medium": Blue,
        High => "High": Orange,
        Urgent => "Urgent": Red,
    }
}

impl ApplicationStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ApplicationStatus::Rejected | ApplicationStatus::Accepted | ApplicationStatus::Withdrawn
        )
    }
}

impl InterviewStatus {
    /// Outcome and rating are only shown once an interview has happened.
    pub fn is_terminal(self) -> bool {
        matches!(self, InterviewStatus::Completed)
    }
}

impl EventStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Completed)
    }
}

impl SurveyStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SurveyStatus::Completed | SurveyStatus::Declined | SurveyStatus::Expired
        )
    }
}


pub const INTERVIEW_TYPES: &[&str] = &[
    "Phone Screen",
    "Video Call",
    "On-site",
    "Technical Interview",
    "Behavioral Interview",
    "Panel Interview",
    "Case Study",
    "Take-home Assignment",
    "Final Round",
    "HR Interview",
    "Meet the Team",
    "Other",
];

pub const EVENT_TYPES: &[&str] = &[
    "Career Fair",
    "Networking Event",
    "Application Deadline",
    "Follow-up Reminder",
    "Company Event",
    "Offer Decision Deadline",
    "Info Session",
    "Workshop",
    "Other",
];

pub const SURVEY_TYPES: &[&str] = &[
    "Post-Interview Feedback",
    "Candidate Experience",
    "Compensation Survey",
    "Company Culture",
    "Glassdoor Review",
    "Indeed Review",
    "LinkedIn Review",
    "Referral Program",
    "Exit Survey",
    "Market Research",
    "Other",
];

pub const INTERVIEW_OUTCOMES: &[&str] = &[
    "Passed - Moving Forward",
    "Passed - Waiting for Next Steps",
    "Rejected",
    "Pending Feedback",
    "Offer Extended",
    "Withdrew",
];

pub const RESUME_TYPES: &[&str] = &[
    "General",
    "Technical",
    "Creative",
    "Executive",
    "Academic",
    "Industry-Specific",
    "Other",
];

pub const FILE_FORMATS: &[&str] = &["PDF", "DOCX", "TXT", "Other"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_to_label() {
        let json = serde_json::to_string(&ApplicationStatus::InterviewScheduled).unwrap();
        assert_eq!(json, r#""Interview Scheduled""#);
        let parsed: SurveyStatus = serde_json::from_str(r#""In Progress""#).unwrap();
        assert_eq!(parsed, SurveyStatus::InProgress);
    }

    #[test]
    fn test_unknown_label_is_neutral() {
        assert_eq!(ApplicationStatus::tone_of("Ghosted"), BadgeTone::Neutral);
        assert_eq!(ApplicationStatus::tone_of("Rejected"), BadgeTone::Red);
        assert_eq!(InterviewStatus::tone_of(""), BadgeTone::Neutral);
    }

    #[test]
    fn test_labels_round_trip_through_from_label() {
        for status in EventStatus::ALL {
            assert_eq!(EventStatus::from_label(status.as_str()), Some(*status));
        }
        assert_eq!(ApplicationStatus::LABELS.len(), 8);
    }
}
