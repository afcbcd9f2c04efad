//! Fallback layers for pages no site profile covers.

use once_cell::sync::Lazy;
use regex::Regex;

use super::page::Page;
use super::sites::first_match;
use super::ExtractedJob;

const COMPANY_SELECTORS: &[&str] = &[
    ".company-name",
    ".company",
    ".employer",
    ".employer-name",
    r#"[class*="company"]"#,
    r#"[class*="employer"]"#,
    r#"[data-test*="company"]"#,
    r#"[data-testid*="company"]"#,
    r#"a[href*="company"]"#,
    r#"a[href*="employer"]"#,
];

const POSITION_SELECTORS: &[&str] = &[
    "h1",
    ".job-title",
    ".position",
    ".title",
    ".job-name",
    r#"[class*="job-title"]"#,
    r#"[class*="position"]"#,
    r#"[class*="job-name"]"#,
    r#"[data-test*="job-title"]"#,
    r#"[data-testid*="job-title"]"#,
];

const LOCATION_SELECTORS: &[&str] = &[
    ".location",
    ".job-location",
    r#"[class*="location"]"#,
    r#"[data-test*="location"]"#,
    r#"[data-testid*="location"]"#,
];

const SALARY_SELECTORS: &[&str] = &[
    ".salary",
    ".compensation",
    ".pay",
    r#"[class*="salary"]"#,
    r#"[class*="compensation"]"#,
];

const COMPANY_META: &[&str] = &[r#"meta[property="og:site_name"]"#, r#"meta[name="company"]"#];

const POSITION_META: &[&str] = &[
    r#"meta[property="og:title"]"#,
    r#"meta[name="title"]"#,
    r#"meta[name="description"]"#,
];

static CURRENCY: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$|€|£|USD|EUR").expect("valid regex"));

/// Ordered job-title patterns over the page text.
static TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?im)^([A-Z][a-z]+(?: [A-Z][a-z]+)*\s+(?:Engineer|Developer|Manager|Designer|Analyst|Specialist|Coordinator)\b)",
        r"(?i)(?:Position|Role|Job):\s*([^\n]{5,100})",
        r"(?i)Title:\s*([^\n]{5,100})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

static COMPANY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(?:Company|Employer|Organization):\s*([^\n]{2,50})",
        r"(?:\bat|@)\s+([A-Z][a-z]+(?: [A-Z][a-z]+)*)[ \t]*(?:\n|$)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Broad selectors and meta tags with length sanity bounds.
pub fn extract_generic<P: Page + ?Sized>(page: &P, job: &mut ExtractedJob) {
    if let Some(company) = first_match(page, COMPANY_SELECTORS, |text| {
        let len = char_len(text);
        (len > 2 && len < 100 && !text.contains('\n')).then(|| text.to_string())
    }) {
        job.company = company;
    }

    let company = job.company.clone();
    if let Some(position) = first_match(page, POSITION_SELECTORS, |text| {
        let len = char_len(text);
        (len > 3 && len < 200 && text != company).then(|| text.to_string())
    }) {
        job.position = position;
    }

    // The first location element wins even if it is empty.
    if let Some(location) = first_match(page, LOCATION_SELECTORS, |text| Some(text.to_string())) {
        job.location = location;
    }

    if let Some(salary) = first_match(page, SALARY_SELECTORS, |text| {
        CURRENCY.is_match(text).then(|| text.to_string())
    }) {
        job.salary = salary;
    }

    if job.company.is_empty() {
        if let Some(meta) = COMPANY_META.iter().find_map(|s| non_blank(page.meta_content(s))) {
            job.company = meta;
        }
    }
    if job.position.is_empty() {
        if let Some(meta) = POSITION_META.iter().find_map(|s| non_blank(page.meta_content(s))) {
            job.position = meta;
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Headings first, then regex families over the body text. Only fills empty fields.
pub fn extract_aggressively<P: Page + ?Sized>(page: &P, job: &mut ExtractedJob) {
    for heading in page.query_all_text("h1, h2, h3") {
        let len = char_len(&heading);
        if len <= 5 || len >= 150 {
            continue;
        }
        if job.position.is_empty() {
            job.position = heading;
        } else if job.company.is_empty() && heading != job.position {
            job.company = heading;
            break;
        }
    }

    let text = page.body_text();
    if job.position.is_empty() {
        if let Some(title) = first_capture(&TITLE_PATTERNS, &text) {
            job.position = title;
        }
    }
    if job.company.is_empty() {
        if let Some(company) = first_capture(&COMPANY_PATTERNS, &text) {
            job.company = company;
        }
    }
}

fn first_capture(patterns: &[Regex], text: &str) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// `"Backend Engineer - Acme"` → position `Backend Engineer`, company `Acme`.
/// A title without separators becomes the position.
pub fn split_title(title: &str, job: &mut ExtractedJob) {
    let title = title.trim();
    if title.is_empty() {
        return;
    }
    let parts: Vec<&str> = title.split(['-', '–', '|', '•']).collect();
    if parts.len() >= 2 {
        job.position = parts[0].trim().to_string();
        job.company = parts[1].trim().to_string();
    } else {
        job.position = title.to_string();
    }
}

const ROLE_KEYWORDS: &[&str] = &["engineer", "developer", "manager", "designer", "analyst"];

/// Free text typed by the user reads as a position when it names a role,
/// otherwise as a company.
pub fn classify_answer(answer: &str, job: &mut ExtractedJob) {
    let answer = answer.trim();
    let lower = answer.to_lowercase();
    if ROLE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        job.position = answer.to_string();
    } else {
        job.company = answer.to_string();
    }
}
