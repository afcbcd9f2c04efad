//! Collection view transform: search, filter, and sort one entity collection.
//!
//! The same pure pipeline serves applications, interviews, events, surveys, and
//! resumes; each entity describes its searchable text, filter dimensions, and
//! sortable fields through `Viewable`.

pub mod stats;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::labels::BadgeTone;

/// Filter value that disables a filter.
pub const ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// `"asc"` sorts ascending; any other value sorts descending.
    pub fn parse(value: &str) -> Self {
        if value == "asc" {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }
}

/// A comparable sort value. Text keys are lowercased on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey {
    Number(i64),
    Time(DateTime<Utc>),
    Text(String),
}

impl SortKey {
    /// Empty text counts as missing, same as an absent value.
    pub fn text(value: &str) -> Option<SortKey> {
        if value.is_empty() {
            None
        } else {
            Some(SortKey::Text(value.to_lowercase()))
        }
    }

    pub fn opt_text(value: Option<&String>) -> Option<SortKey> {
        value.and_then(|v| SortKey::text(v))
    }

    pub fn time(value: Option<DateTime<Utc>>) -> Option<SortKey> {
        value.map(SortKey::Time)
    }

    pub fn number(value: Option<i64>) -> Option<SortKey> {
        value.map(SortKey::Number)
    }
}

/// Which filter dimension a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Status,
    /// Type or priority, depending on the entity.
    Secondary,
}

pub trait Viewable {
    /// Sort applied when the caller does not name one.
    const DEFAULT_SORT: (&'static str, SortOrder);

    /// The 2–4 text fields a search term is matched against.
    fn search_fields(&self) -> Vec<Option<&str>>;

    fn dimension(&self, dimension: Dimension) -> Option<&str>;

    /// `None` for missing values and unknown field names.
    fn sort_key(&self, field: &str) -> Option<SortKey>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewConfig {
    pub search_term: String,
    pub status_filter: String,
    pub secondary_filter: String,
    pub sort_field: String,
    pub sort_order: SortOrder,
}

impl ViewConfig {
    pub fn defaults_for<T: Viewable>() -> Self {
        let (field, order) = T::DEFAULT_SORT;
        Self {
            search_term: String::new(),
            status_filter: ALL.to_string(),
            secondary_filter: ALL.to_string(),
            sort_field: field.to_string(),
            sort_order: order,
        }
    }
}

/// Case-insensitive substring match over the record's search fields, OR-combined.
/// An empty term matches everything.
pub fn matches_search<T: Viewable>(record: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record
        .search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// `"All"` is a no-op; otherwise exact equality with the record's value.
pub fn matches_filter<T: Viewable>(record: &T, dimension: Dimension, filter: &str) -> bool {
    filter == ALL || record.dimension(dimension) == Some(filter)
}

/// Missing values sort after present ones in both directions.
pub fn compare_keys(a: Option<&SortKey>, b: Option<&SortKey>, order: SortOrder) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match order {
            SortOrder::Asc => a.cmp(b),
            SortOrder::Desc => b.cmp(a),
        },
    }
}

/// Filters then stably sorts. Equal keys keep their input order.
pub fn apply_view<T: Viewable + Clone>(records: &[T], config: &ViewConfig) -> Vec<T> {
    let mut visible: Vec<(Option<SortKey>, &T)> = records
        .iter()
        .filter(|r| matches_search(*r, &config.search_term))
        .filter(|r| matches_filter(*r, Dimension::Status, &config.status_filter))
        .filter(|r| matches_filter(*r, Dimension::Secondary, &config.secondary_filter))
        .map(|r| (r.sort_key(&config.sort_field), r))
        .collect();

    visible.sort_by(|(a, _), (b, _)| compare_keys(a.as_ref(), b.as_ref(), config.sort_order));
    visible.into_iter().map(|(_, r)| r.clone()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<BadgeTone>,
}

/// Counts per category value, with the `"All"` total first. Each value re-scans
/// the full collection, which is fine at per-user sizes.
pub fn count_by<T: Viewable>(
    records: &[T],
    dimension: Dimension,
    values: &[&str],
    tone: Option<fn(&str) -> BadgeTone>,
) -> Vec<CategoryCount> {
    let mut counts = vec![CategoryCount {
        value: ALL.to_string(),
        count: records.len(),
        tone: None,
    }];
    for value in values {
        counts.push(CategoryCount {
            value: value.to_string(),
            count: records
                .iter()
                .filter(|r| r.dimension(dimension) == Some(*value))
                .count(),
            tone: tone.map(|f| f(*value)),
        });
    }
    counts
}
