//! Parent-application linking for interviews, events, and surveys.
//!
//! Choosing a parent copies its company (and position, where the child has
//! one) into the child form. Clearing the link blanks those fields; whatever
//! was typed before the link is not restored.

use uuid::Uuid;

use crate::models::ApplicationRow;

/// Mutable view of the fields a parent link controls.
pub struct LinkFields<'a> {
    pub application_id: &'a mut String,
    pub company: &'a mut String,
    /// `None` for children that only mirror the company.
    pub position: Option<&'a mut String>,
}

pub trait ParentLinked {
    fn link_fields(&mut self) -> LinkFields<'_>;

    fn application_id(&self) -> &str;

    /// The linked parent, if the id is present and well formed.
    fn parent_id(&self) -> Option<Uuid> {
        Uuid::parse_str(self.application_id().trim()).ok()
    }
}

pub fn apply_parent_link<T: ParentLinked>(form: &mut T, parent: &ApplicationRow) {
    let fields = form.link_fields();
    *fields.application_id = parent.id.to_string();
    *fields.company = parent.company.clone();
    if let Some(position) = fields.position {
        *position = parent.position.clone();
    }
}

pub fn clear_parent_link<T: ParentLinked>(form: &mut T) {
    let fields = form.link_fields();
    fields.application_id.clear();
    fields.company.clear();
    if let Some(position) = fields.position {
        position.clear();
    }
}

/// Linked fields are read-only while a parent is selected.
pub fn is_read_only<T: ParentLinked>(form: &T) -> bool {
    !form.application_id().trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{EventForm, SurveyForm};
    use chrono::Utc;

    fn parent() -> ApplicationRow {
        ApplicationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            company: "Google".to_string(),
            position: "SRE".to_string(),
            location: None,
            salary: None,
            job_url: None,
            notes: None,
            status: "Applied".to_string(),
            applied_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_link_copies_company_and_position() {
        let parent = parent();
        let mut form = SurveyForm {
            company: "typed by hand".to_string(),
            ..SurveyForm::default()
        };
        apply_parent_link(&mut form, &parent);

        assert_eq!(form.company, "Google");
        assert_eq!(form.position, "SRE");
        assert_eq!(form.parent_id(), Some(parent.id));
        assert!(is_read_only(&form));
    }

    #[test]
    fn test_clear_does_not_restore_previous_values() {
        let mut form = SurveyForm {
            company: "typed by hand".to_string(),
            ..SurveyForm::default()
        };
        apply_parent_link(&mut form, &parent());
        clear_parent_link(&mut form);

        assert_eq!(form.company, "");
        assert_eq!(form.position, "");
        assert!(!is_read_only(&form));
    }

    #[test]
    fn test_event_link_copies_company_only() {
        let mut form = EventForm {
            title: "Onsite prep".to_string(),
            ..EventForm::default()
        };
        apply_parent_link(&mut form, &parent());
        assert_eq!(form.company, "Google");
        assert_eq!(form.title, "Onsite prep");
    }
}
