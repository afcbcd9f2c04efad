//! Per-site selector profiles for the job boards we know.

use once_cell::sync::Lazy;
use regex::Regex;

use super::page::Page;
use super::ExtractedJob;

/// Tries `selectors` in order; the first element whose text `accept` takes wins.
/// Selectors that match nothing are skipped.
pub fn first_match<P, F>(page: &P, selectors: &[&str], accept: F) -> Option<String>
where
    P: Page + ?Sized,
    F: Fn(&str) -> Option<String>,
{
    selectors
        .iter()
        .filter_map(|selector| page.query_text(selector))
        .find_map(|text| accept(&text))
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// LinkedIn mixes the location with repost age ("Reposted 3 days ago").
fn linkedin_location(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || ["Reposted", "hour", "day"].iter().any(|w| text.contains(w)) {
        return None;
    }
    non_empty(&text.replace('·', ""))
}

fn linkedin_salary(text: &str) -> Option<String> {
    static MONEY: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)\$|€|£|USD|EUR|salary|compensation").expect("valid regex")
    });
    MONEY.is_match(text).then(|| text.trim().to_string())
}

pub struct SiteProfile {
    pub name: &'static str,
    /// Substring of the page URL that selects this profile.
    pub url_marker: &'static str,
    pub company: &'static [&'static str],
    pub position: &'static [&'static str],
    pub location: &'static [&'static str],
    pub salary: &'static [&'static str],
    pub accept_location: fn(&str) -> Option<String>,
    pub accept_salary: fn(&str) -> Option<String>,
}

impl SiteProfile {
    pub fn extract<P: Page + ?Sized>(&self, page: &P, job: &mut ExtractedJob) {
        job.company = first_match(page, self.company, non_empty).unwrap_or_default();
        job.position = first_match(page, self.position, non_empty).unwrap_or_default();
        job.location = first_match(page, self.location, self.accept_location).unwrap_or_default();
        job.salary = first_match(page, self.salary, self.accept_salary).unwrap_or_default();
    }
}

/// Checked in order; the first profile whose marker appears in the URL is used.
pub static SITES: &[SiteProfile] = &[
    SiteProfile {
        name: "linkedin",
        url_marker: "linkedin.com",
        company: &[
            ".job-details-jobs-unified-top-card__company-name a",
            ".job-details-jobs-unified-top-card__company-name",
            ".topcard__org-name-link",
            ".jobs-unified-top-card__company-name a",
            ".jobs-unified-top-card__company-name",
            ".jobs-company__name",
            ".job-details-jobs-unified-top-card__primary-description a",
            r#"a.app-aware-link[href*="/company/"]"#,
        ],
        position: &[
            ".job-details-jobs-unified-top-card__job-title h1",
            ".job-details-jobs-unified-top-card__job-title",
            ".topcard__title",
            ".jobs-unified-top-card__job-title h1",
            ".jobs-unified-top-card__job-title",
            "h1.t-24",
        ],
        location: &[
            ".job-details-jobs-unified-top-card__bullet",
            ".job-details-jobs-unified-top-card__primary-description-container span.tvm__text",
            ".topcard__flavor--bullet",
            ".jobs-unified-top-card__bullet",
            ".jobs-unified-top-card__workplace-type",
        ],
        salary: &[
            ".job-details-jobs-unified-top-card__job-insight span",
            ".salary",
            ".compensation__salary",
            r#"[class*="salary"]"#,
            r#"[class*="compensation"]"#,
        ],
        accept_location: linkedin_location,
        accept_salary: linkedin_salary,
    },
    SiteProfile {
        name: "indeed",
        url_marker: "indeed.com",
        company: &[
            r#"[data-testid="inlineHeader-companyName"]"#,
            ".jobsearch-CompanyInfoContainer a",
        ],
        position: &[
            r#"[data-testid="jobsearch-JobInfoHeader-title"]"#,
            ".jobsearch-JobInfoHeader-title",
        ],
        location: &[
            r#"[data-testid="inlineHeader-companyLocation"]"#,
            ".jobsearch-JobInfoHeader-subtitle div",
        ],
        salary: &[r#"[data-testid="inlineHeader-salary"]"#, "#salaryInfoAndJobType"],
        accept_location: non_empty,
        accept_salary: non_empty,
    },
    SiteProfile {
        name: "glassdoor",
        url_marker: "glassdoor.com",
        company: &[r#"[data-test="employer-name"]"#, ".employerName"],
        position: &[r#"[data-test="job-title"]"#, ".jobTitle"],
        location: &[r#"[data-test="location"]"#, ".location"],
        salary: &[r#"[data-test="salary"]"#, ".salary"],
        accept_location: non_empty,
        accept_salary: non_empty,
    },
    SiteProfile {
        name: "lever",
        url_marker: "lever.co",
        company: &[".main-header-text-company-name", ".company-name"],
        position: &[".posting-headline h2", ".posting-headline"],
        location: &[".location", ".posting-categories .location"],
        salary: &[".salary", ".compensation"],
        accept_location: non_empty,
        accept_salary: non_empty,
    },
    SiteProfile {
        name: "greenhouse",
        url_marker: "greenhouse.io",
        company: &["#header .company-name", ".company-name"],
        position: &[".app-title", "h1.app-title"],
        location: &[".location", ".app-location"],
        salary: &[".salary", ".compensation"],
        accept_location: non_empty,
        accept_salary: non_empty,
    },
];

pub fn site_for(url: &str) -> Option<&'static SiteProfile> {
    let url = url.to_lowercase();
    SITES.iter().find(|site| url.contains(site.url_marker))
}
