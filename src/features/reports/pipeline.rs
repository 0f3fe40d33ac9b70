//! Filter/sort pipeline for report lists.
//!
//! One pure function replaces the slightly different filter code each client
//! screen used to carry. It never mutates its input and has no hidden state, so
//! the same criteria over the same collection always give the same sequence.

use chrono::{DateTime, NaiveDate, Utc};

use super::models::{FilterCriteria, Report, ReportSeverity, ReportStatus, SortOrder};

/// Field accessors the pipeline needs from a record.
///
/// Missing text must be reported as `""`, never as an error.
pub trait FilterFields {
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn category_name(&self) -> &str;
    fn category_id(&self) -> Option<&str>;
    fn status(&self) -> Option<ReportStatus>;
    fn severity(&self) -> Option<ReportSeverity>;
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl FilterFields for Report {
    fn title(&self) -> &str {
        &self.title
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn category_name(&self) -> &str {
        Report::category_name(self)
    }

    fn category_id(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.id.as_deref())
    }

    fn status(&self) -> Option<ReportStatus> {
        self.status
    }

    fn severity(&self) -> Option<ReportSeverity> {
        self.severity
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Filter `items` by every active criterion and order them by creation time.
///
/// Reports without a creation time sort as if created at the earliest
/// representable instant: last for `Newest`, first for `Oldest`. Ties keep
/// their input order.
pub fn apply<T>(items: &[T], criteria: &FilterCriteria) -> Vec<T>
where
    T: FilterFields + Clone,
{
    let needle = criteria.search_term();
    let mut matched: Vec<T> = items
        .iter()
        .filter(|item| matches(*item, criteria, needle.as_deref()))
        .cloned()
        .collect();
    sort_by_created(&mut matched, criteria.sort_order);
    matched
}

/// Whether a single record passes every active criterion.
///
/// `needle` is the lowercased search term (see [`FilterCriteria::search_term`]).
pub fn matches<T: FilterFields>(item: &T, criteria: &FilterCriteria, needle: Option<&str>) -> bool {
    if let Some(needle) = needle {
        if !matches_text(item, needle) {
            return false;
        }
    }

    if let Some(status) = criteria.status {
        if item.status() != Some(status) {
            return false;
        }
    }

    if let Some(category) = criteria.category_term() {
        let by_name = item.category_name().to_lowercase() == category.to_lowercase();
        let by_id = item.category_id() == Some(category);
        if !(by_name || by_id) {
            return false;
        }
    }

    if let Some(severity) = criteria.severity {
        if item.severity() != Some(severity) {
            return false;
        }
    }

    if criteria.has_date_range() {
        let Some(created) = item.created_at().map(|dt| dt.date_naive()) else {
            return false;
        };
        if !within(created, criteria.created_from, criteria.created_to) {
            return false;
        }
    }

    true
}

fn matches_text<T: FilterFields>(item: &T, needle: &str) -> bool {
    [item.title(), item.category_name(), item.description()]
        .iter()
        .any(|field| !field.is_empty() && field.to_lowercase().contains(needle))
}

fn within(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.map_or(true, |from| date >= from) && to.map_or(true, |to| date <= to)
}

/// Stable sort by creation time
pub fn sort_by_created<T: FilterFields>(items: &mut [T], order: SortOrder) {
    let key = |item: &T| item.created_at().unwrap_or(DateTime::<Utc>::MIN_UTC);
    match order {
        SortOrder::Newest => items.sort_by(|a, b| key(b).cmp(&key(a))),
        SortOrder::Oldest => items.sort_by(|a, b| key(a).cmp(&key(b))),
    }
}
