//! Decides whether a page looks like a job posting worth clipping.

use super::page::Page;

const URL_MARKERS: &[&str] = &[
    "jobs",
    "careers",
    "positions",
    "opportunities",
    "job-posting",
    "apply",
    "application",
    "vacancy",
    "linkedin.com/jobs",
    "indeed.com",
    "glassdoor.com",
    "lever.co",
    "greenhouse.io",
    "workday.com",
];

const PAGE_KEYWORDS: &[&str] = &[
    "apply now",
    "submit application",
    "job description",
    "requirements",
    "qualifications",
    "responsibilities",
    "application submitted",
    "thank you for applying",
];

pub fn looks_like_job_posting(url: &str, title: &str, body_text: &str) -> bool {
    let url = url.to_lowercase();
    if URL_MARKERS.iter().any(|m| url.contains(m)) {
        return true;
    }
    let title = title.to_lowercase();
    let body = body_text.to_lowercase();
    PAGE_KEYWORDS
        .iter()
        .any(|k| body.contains(k) || title.contains(k))
}

pub fn is_job_posting<P: Page + ?Sized>(page: &P) -> bool {
    looks_like_job_posting(page.url(), &page.title(), &page.body_text())
}
