use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

use super::report::ReportSeverity;
use super::status::ReportStatus;
use crate::shared::constants::FILTER_ALL;

/// Ordering of the derived list by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" | "desc" => Ok(SortOrder::Newest),
            "oldest" | "asc" => Ok(SortOrder::Oldest),
            _ => Err(format!("unknown sort order: {}", s)),
        }
    }
}

/// User-selected criteria for a report list.
///
/// `None` on an axis means "All". Criteria are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FilterCriteria {
    /// Case-insensitive search over title, category name and description
    pub text: String,
    pub status: Option<ReportStatus>,
    /// Category name (case-insensitive) or category id
    pub category: Option<String>,
    pub severity: Option<ReportSeverity>,
    /// Inclusive lower bound on the creation date (UTC)
    pub created_from: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date (UTC)
    pub created_to: Option<NaiveDate>,
    pub sort_order: SortOrder,
}

impl FilterCriteria {
    /// Lowercased search term, or `None` when the text criterion is inactive
    pub fn search_term(&self) -> Option<String> {
        let term = self.text.trim();
        (!term.is_empty()).then(|| term.to_lowercase())
    }

    /// Category criterion, or `None` when it is blank or `All`
    pub fn category_term(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(FILTER_ALL))
    }

    pub fn has_date_range(&self) -> bool {
        self.created_from.is_some() || self.created_to.is_some()
    }

    /// Build criteria from raw query values; anything empty, `All` or
    /// unparseable leaves its axis unfiltered.
    pub fn from_raw(raw: RawCriteria<'_>) -> Self {
        let mut created_from = parse_axis::<NaiveDate>("from", raw.from);
        let mut created_to = parse_axis::<NaiveDate>("to", raw.to);
        if let (Some(from), Some(to)) = (created_from, created_to) {
            if from > to {
                tracing::debug!(%from, %to, "Ignoring inverted date range");
                created_from = None;
                created_to = None;
            }
        }

        Self {
            text: raw.text.map(|t| t.trim().to_string()).unwrap_or_default(),
            status: parse_axis("status", raw.status),
            category: raw
                .category
                .map(str::trim)
                .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(FILTER_ALL))
                .map(str::to_string),
            severity: parse_axis("severity", raw.severity),
            created_from,
            created_to,
            sort_order: parse_axis("sort", raw.sort).unwrap_or_default(),
        }
    }
}

/// Unparsed criteria as they arrive from a query string
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCriteria<'a> {
    pub text: Option<&'a str>,
    pub status: Option<&'a str>,
    pub category: Option<&'a str>,
    pub severity: Option<&'a str>,
    pub sort: Option<&'a str>,
    pub from: Option<&'a str>,
    pub to: Option<&'a str>,
}

fn parse_axis<T: FromStr>(axis: &str, raw: Option<&str>) -> Option<T> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty())?;
    if raw.eq_ignore_ascii_case(FILTER_ALL) {
        return None;
    }
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        tracing::debug!(axis, value = raw, "Ignoring malformed filter value");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_and_empty_mean_unfiltered() {
        let criteria = FilterCriteria::from_raw(RawCriteria {
            text: Some("   "),
            status: Some("All"),
            category: Some("all"),
            severity: Some(""),
            ..Default::default()
        });
        assert_eq!(criteria, FilterCriteria::default());
        assert_eq!(criteria.search_term(), None);
    }

    #[test]
    fn test_malformed_values_are_ignored() {
        let criteria = FilterCriteria::from_raw(RawCriteria {
            status: Some("ARCHIVED"),
            severity: Some("extreme"),
            sort: Some("sideways"),
            from: Some("01/02/2024"),
            ..Default::default()
        });
        assert_eq!(criteria.status, None);
        assert_eq!(criteria.severity, None);
        assert_eq!(criteria.sort_order, SortOrder::Newest);
        assert_eq!(criteria.created_from, None);
    }

    #[test]
    fn test_values_are_parsed() {
        let criteria = FilterCriteria::from_raw(RawCriteria {
            text: Some(" Pothole "),
            status: Some("pending"),
            category: Some(" Road "),
            severity: Some("critical"),
            sort: Some("oldest"),
            from: Some("2024-01-01"),
            to: Some("2024-01-31"),
        });
        assert_eq!(criteria.search_term().as_deref(), Some("pothole"));
        assert_eq!(criteria.status, Some(ReportStatus::Pending));
        assert_eq!(criteria.category.as_deref(), Some("Road"));
        assert_eq!(criteria.severity, Some(ReportSeverity::Critical));
        assert_eq!(criteria.sort_order, SortOrder::Oldest);
        assert!(criteria.has_date_range());
    }

    #[test]
    fn test_inverted_date_range_is_dropped() {
        let criteria = FilterCriteria::from_raw(RawCriteria {
            from: Some("2024-02-01"),
            to: Some("2024-01-01"),
            ..Default::default()
        });
        assert!(!criteria.has_date_range());
    }
}
