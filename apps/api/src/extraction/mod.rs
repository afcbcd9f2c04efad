//! Field extractor: turns an arbitrary job-posting page into a best-effort
//! `{company, position, location, salary, notes}` record.
//!
//! Layers run in order and later ones only fill what is still empty:
//! site profile (or generic selectors), headings and regexes, the
//! document title, and finally asking the user. Extraction never fails;
//! a page with nothing usable ends up with a placeholder position.

pub mod detect;
pub mod heuristics;
pub mod page;
pub mod sites;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::normalize::hostname_of;
pub use detect::is_job_posting;
pub use page::{HtmlPage, Page};

pub const NOTE_EXTRACTED: &str = "Auto-extracted from page. Please verify details.";
pub const NOTE_EMPTY: &str = "Could not auto-extract. Please add details manually.";

pub const PROMPT: &str = "Could not auto-detect job details.\nPlease enter either:\n- Job Title OR\n- Company Name\n\n(You can edit all details later in the dashboard)";

/// Extracted fields, `""` where nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractedJob {
    pub job_url: String,
    pub company: String,
    pub position: String,
    pub location: String,
    pub salary: String,
    pub notes: String,
    pub source_url: String,
    pub extracted_at: String,
}

impl ExtractedJob {
    fn is_blank(&self) -> bool {
        self.company.is_empty() && self.position.is_empty()
    }
}

/// Last-resort input from the user. `None` means they cancelled.
pub trait Prompter {
    fn ask(&mut self, message: &str) -> Option<String>;
}

/// A prompter that always cancels, for unattended runs.
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn ask(&mut self, _message: &str) -> Option<String> {
        None
    }
}

pub fn extract_job<P: Page + ?Sized>(
    page: &P,
    prompter: &mut dyn Prompter,
    now: DateTime<Utc>,
) -> ExtractedJob {
    let url = page.url().to_string();
    let mut job = ExtractedJob {
        job_url: url.clone(),
        source_url: url.clone(),
        extracted_at: now.to_rfc3339(),
        ..ExtractedJob::default()
    };

    match sites::site_for(&url) {
        Some(site) => {
            debug!(site = site.name, "Using site profile");
            site.extract(page, &mut job);
        }
        None => heuristics::extract_generic(page, &mut job),
    }

    if job.is_blank() {
        debug!("No fields found, trying headings and patterns");
        heuristics::extract_aggressively(page, &mut job);
    }

    if job.is_blank() {
        heuristics::split_title(&page.title(), &mut job);
    }

    if job.is_blank() {
        match prompter.ask(PROMPT).filter(|a| !a.trim().is_empty()) {
            Some(answer) => heuristics::classify_answer(&answer, &mut job),
            None => {
                let host = hostname_of(&url).unwrap_or(url);
                job.position = format!("Job from {host}");
            }
        }
    }

    job.notes = if job.is_blank() { NOTE_EMPTY } else { NOTE_EXTRACTED }.to_string();
    job
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Scripted(Option<&'static str>, usize);

    impl Prompter for Scripted {
        fn ask(&mut self, _message: &str) -> Option<String> {
            self.1 += 1;
            self.0.map(str::to_string)
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_site_profile_wins_without_prompting() {
        let html = r#"
            <div class="posting-headline"><h2>Mobile Developer</h2></div>
            <div class="main-header-text-company-name">Hooli</div>
        "#;
        let page = HtmlPage::parse("https://jobs.lever.co/hooli/abc", html);
        let mut prompter = Scripted(Some("ignored"), 0);
        let job = extract_job(&page, &mut prompter, now());

        assert_eq!(job.position, "Mobile Developer");
        assert_eq!(job.company, "Hooli");
        assert_eq!(job.notes, NOTE_EXTRACTED);
        assert_eq!(job.source_url, "https://jobs.lever.co/hooli/abc");
        assert_eq!(prompter.1, 0);
    }

    #[test]
    fn test_title_split_before_prompt() {
        let html = "<html><head><title>QA Analyst – Vandelay</title></head><body></body></html>";
        let page = HtmlPage::parse("https://vandelay.example/x", html);
        let job = extract_job(&page, &mut NoPrompt, now());
        assert_eq!(job.position, "QA Analyst");
        assert_eq!(job.company, "Vandelay");
    }

    #[test]
    fn test_prompt_answer_is_classified() {
        let page = HtmlPage::parse("https://vandelay.example/x", "<body></body>");
        let mut prompter = Scripted(Some("Import Export Manager"), 0);
        let job = extract_job(&page, &mut prompter, now());
        assert_eq!(job.position, "Import Export Manager");
        assert_eq!(prompter.1, 1);
    }

    #[test]
    fn test_cancelled_prompt_uses_hostname() {
        let page = HtmlPage::parse("https://vandelay.example/x", "<body></body>");
        let job = extract_job(&page, &mut NoPrompt, now());
        assert_eq!(job.position, "Job from vandelay.example");
        assert_eq!(job.notes, NOTE_EXTRACTED);
    }
}
