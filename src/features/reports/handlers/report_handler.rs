use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::{RequireOfficial, RequireWorker};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::dtos::{
    BulkDeleteResultDto, ListReportsQuery, RefreshResultDto, ReportPageDto, SelectionDto,
    ToggleSelectionDto, ToggleSelectionResponseDto, TransitionsDto, UpdateReportDto,
    UpdateReportStatusDto,
};
use crate::features::reports::models::{Report, ReportScope};
use crate::features::reports::services::{ReportService, ReportViewService};
use crate::shared::types::{ApiResponse, Meta};

/// State for report handlers
#[derive(Clone)]
pub struct ReportState {
    pub view_service: Arc<ReportViewService>,
    pub report_service: Arc<ReportService>,
}

// =============================================================================
// VIEWS
// =============================================================================

/// Filtered, sorted and paginated report list
#[utoipa::path(
    get,
    path = "/api/reports/views/{scope}",
    params(
        ("scope" = ReportScope, Path, description = "mine, assigned, critical or all"),
        ListReportsQuery
    ),
    responses(
        (status = 200, description = "Report page", body = ApiResponse<ReportPageDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Scope not available for this role"),
        (status = 502, description = "Platform API unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn list_view(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(scope): Path<ReportScope>,
    AppQuery(query): AppQuery<ListReportsQuery>,
) -> Result<Json<ApiResponse<ReportPageDto>>> {
    let criteria = query.criteria();
    let pagination = query.pagination();

    let page = state
        .view_service
        .list(&user, scope, criteria.clone(), &pagination, query.refresh)
        .await?;

    let meta = Meta {
        total: page.total_items as i64,
    };
    let dto = ReportPageDto {
        items: page.items,
        pagination: pagination.meta(page.total_items),
        criteria,
        selected_ids: page.selected,
    };

    Ok(Json(ApiResponse::success(Some(dto), None, Some(meta))))
}

/// Re-fetch a view from the platform (clears the selection)
#[utoipa::path(
    post,
    path = "/api/reports/views/{scope}/refresh",
    params(("scope" = ReportScope, Path, description = "mine, assigned, critical or all")),
    responses(
        (status = 200, description = "View refreshed", body = ApiResponse<RefreshResultDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Scope not available for this role")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn refresh_view(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(scope): Path<ReportScope>,
) -> Result<Json<ApiResponse<RefreshResultDto>>> {
    let total_items = state.view_service.refresh(&user, scope).await?;
    Ok(Json(ApiResponse::success(
        Some(RefreshResultDto { total_items }),
        None,
        None,
    )))
}

// =============================================================================
// SELECTION
// =============================================================================

/// Currently selected report ids
#[utoipa::path(
    get,
    path = "/api/reports/views/{scope}/selection",
    params(("scope" = ReportScope, Path, description = "mine, assigned, critical or all")),
    responses(
        (status = 200, description = "Selection", body = ApiResponse<SelectionDto>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_selection(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(scope): Path<ReportScope>,
) -> Result<Json<ApiResponse<SelectionDto>>> {
    let ids = state.view_service.selection(&user, scope).await?;
    Ok(Json(ApiResponse::success(Some(ids.into()), None, None)))
}

/// Select a report, or deselect it when already selected
#[utoipa::path(
    post,
    path = "/api/reports/views/{scope}/selection/toggle",
    params(("scope" = ReportScope, Path, description = "mine, assigned, critical or all")),
    request_body = ToggleSelectionDto,
    responses(
        (status = 200, description = "Selection updated", body = ApiResponse<ToggleSelectionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Report is not in this view")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn toggle_selection(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(scope): Path<ReportScope>,
    AppJson(dto): AppJson<ToggleSelectionDto>,
) -> Result<Json<ApiResponse<ToggleSelectionResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (selected, selected_ids) = state
        .view_service
        .toggle_selection(&user, scope, &dto.id)
        .await?;

    Ok(Json(ApiResponse::success(
        Some(ToggleSelectionResponseDto {
            id: dto.id,
            selected,
            selected_ids,
        }),
        None,
        None,
    )))
}

/// Clear the selection
#[utoipa::path(
    delete,
    path = "/api/reports/views/{scope}/selection",
    params(("scope" = ReportScope, Path, description = "mine, assigned, critical or all")),
    responses(
        (status = 200, description = "Selection cleared"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn clear_selection(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(scope): Path<ReportScope>,
) -> Result<Json<ApiResponse<()>>> {
    state.view_service.clear_selection(&user, scope).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Selection cleared".to_string()),
        None,
    )))
}

/// Delete every selected report
///
/// Reports leave the view only once the platform confirms the delete.
#[utoipa::path(
    post,
    path = "/api/reports/views/{scope}/selection/bulk-delete",
    params(("scope" = ReportScope, Path, description = "mine, assigned, critical or all")),
    responses(
        (status = 200, description = "Deleted and failed ids", body = ApiResponse<BulkDeleteResultDto>),
        (status = 400, description = "Nothing selected"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn bulk_delete(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(scope): Path<ReportScope>,
) -> Result<Json<ApiResponse<BulkDeleteResultDto>>> {
    let outcome = state.view_service.bulk_delete(&user, scope).await?;

    let message = (!outcome.failed.is_empty()).then(|| {
        format!(
            "{} of {} reports could not be deleted",
            outcome.failed.len(),
            outcome.failed.len() + outcome.deleted.len()
        )
    });

    Ok(Json(ApiResponse::success(Some(outcome.into()), message, None)))
}

// =============================================================================
// SINGLE REPORT
// =============================================================================

/// Get a report by id
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(("id" = String, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = ApiResponse<Report>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Report>>> {
    let report = state.report_service.get(&user, &id).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Partially update a report (official only)
#[utoipa::path(
    patch,
    path = "/api/reports/{id}",
    params(("id" = String, Path, description = "Report ID")),
    request_body = UpdateReportDto,
    responses(
        (status = 200, description = "Report updated", body = ApiResponse<Report>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Forbidden - official only"),
        (status = 422, description = "Illegal status transition")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report(
    RequireOfficial(user): RequireOfficial,
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateReportDto>,
) -> Result<Json<ApiResponse<Report>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state.report_service.update(&user, &id, dto.into()).await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Move a report to a new status
#[utoipa::path(
    patch,
    path = "/api/reports/{id}/status",
    params(("id" = String, Path, description = "Report ID")),
    request_body = UpdateReportStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Report>),
        (status = 403, description = "Role may not make this change"),
        (status = 404, description = "Report not found"),
        (status = 422, description = "Illegal status transition")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn update_report_status(
    RequireWorker(user): RequireWorker,
    State(state): State<ReportState>,
    Path(id): Path<String>,
    AppJson(dto): AppJson<UpdateReportStatusDto>,
) -> Result<Json<ApiResponse<Report>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let report = state
        .report_service
        .transition_status(&user, &id, dto.status, dto.note)
        .await?;
    Ok(Json(ApiResponse::success(Some(report), None, None)))
}

/// Statuses the caller may move this report to
#[utoipa::path(
    get,
    path = "/api/reports/{id}/transitions",
    params(("id" = String, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Allowed transitions", body = ApiResponse<TransitionsDto>),
        (status = 404, description = "Report not found")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn get_transitions(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TransitionsDto>>> {
    let (current, allowed) = state.report_service.allowed_transitions(&user, &id).await?;
    Ok(Json(ApiResponse::success(
        Some(TransitionsDto { current, allowed }),
        None,
        None,
    )))
}

/// Delete a report
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(("id" = String, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Report not found"),
        (status = 502, description = "Platform API unavailable")
    ),
    security(("bearer_auth" = [])),
    tag = "reports"
)]
pub async fn delete_report(
    user: AuthenticatedUser,
    State(state): State<ReportState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.view_service.delete_report(&user, &id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Report deleted".to_string()),
        None,
    )))
}
