use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::reports::models::{
    FilterCriteria, RawCriteria, Report, ReportPatch, ReportSeverity, ReportStatus,
};
use crate::features::reports::services::{BulkDeleteOutcome, FailedDelete};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::{PaginationMeta, PaginationQuery};
use crate::shared::validation::validate_report_id;

// =============================================================================
// VIEW QUERY
// =============================================================================

/// Query params for a report view.
///
/// Every filter is optional; an empty value or `All` leaves that axis unfiltered
/// and malformed values are ignored rather than rejected.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListReportsQuery {
    /// Case-insensitive search in title, category name and description
    pub text: Option<String>,
    /// PENDING, VERIFIED, NEEDS_MORE_INFO, IN_PROGRESS, RESOLVED, REJECTED or All
    pub status: Option<String>,
    /// Category name or id, or All
    pub category: Option<String>,
    /// LOW, MEDIUM, HIGH, CRITICAL or All
    pub severity: Option<String>,
    /// newest (default) or oldest
    pub sort: Option<String>,
    /// Created on or after (YYYY-MM-DD)
    pub from: Option<String>,
    /// Created on or before (YYYY-MM-DD)
    pub to: Option<String>,
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Re-fetch from the platform before filtering
    #[serde(default)]
    pub refresh: bool,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl ListReportsQuery {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::from_raw(RawCriteria {
            text: self.text.as_deref(),
            status: self.status.as_deref(),
            category: self.category.as_deref(),
            severity: self.severity.as_deref(),
            sort: self.sort.as_deref(),
            from: self.from.as_deref(),
            to: self.to.as_deref(),
        })
    }

    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.page_size)
    }
}

/// One page of a derived report view
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportPageDto {
    pub items: Vec<Report>,
    pub pagination: PaginationMeta,
    /// Criteria as understood by the server after normalisation
    pub criteria: FilterCriteria,
    pub selected_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshResultDto {
    pub total_items: usize,
}

// =============================================================================
// SELECTION
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ToggleSelectionDto {
    #[validate(custom(function = "validate_report_id"))]
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToggleSelectionResponseDto {
    pub id: String,
    pub selected: bool,
    pub selected_ids: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SelectionDto {
    pub selected_ids: Vec<String>,
    pub count: usize,
}

impl From<Vec<String>> for SelectionDto {
    fn from(selected_ids: Vec<String>) -> Self {
        Self {
            count: selected_ids.len(),
            selected_ids,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FailedDeleteDto {
    pub id: String,
    pub reason: String,
}

impl From<FailedDelete> for FailedDeleteDto {
    fn from(f: FailedDelete) -> Self {
        Self {
            id: f.id,
            reason: f.reason,
        }
    }
}

/// Result of deleting the current selection
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BulkDeleteResultDto {
    pub deleted: Vec<String>,
    pub failed: Vec<FailedDeleteDto>,
}

impl From<BulkDeleteOutcome> for BulkDeleteResultDto {
    fn from(outcome: BulkDeleteOutcome) -> Self {
        Self {
            deleted: outcome.deleted,
            failed: outcome.failed.into_iter().map(Into::into).collect(),
        }
    }
}

// =============================================================================
// UPDATES
// =============================================================================

/// Partial update of a report (officials only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReportDto {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: Option<String>,
    pub status: Option<ReportStatus>,
    pub severity: Option<ReportSeverity>,
    pub tags: Option<Vec<String>>,
    /// User id of the official responsible for the report
    pub assigned_to: Option<String>,
    /// User id of the field worker handling the report
    pub assigned_to_worker: Option<String>,
}

impl From<UpdateReportDto> for ReportPatch {
    fn from(dto: UpdateReportDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            status: dto.status,
            severity: dto.severity,
            tags: dto.tags,
            assigned_to: dto.assigned_to,
            assigned_to_worker: dto.assigned_to_worker,
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateReportStatusDto {
    pub status: ReportStatus,
    /// Optional note shown to the reporter
    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TransitionsDto {
    pub current: Option<ReportStatus>,
    pub allowed: Vec<ReportStatus>,
}
