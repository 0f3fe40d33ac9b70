use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::feedback::handler as feedback_handler;
use crate::features::otp::{dto as otp_dtos, handler as otp_handler};
use crate::features::reports::{
    dtos as reports_dtos, handlers as reports_handlers, models as reports_models,
};
use crate::shared::types::{ApiResponse, Meta, PaginationMeta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handler::get_me,
        // OTP (public)
        otp_handler::send_otp,
        otp_handler::resend_otp,
        otp_handler::verify_otp,
        otp_handler::otp_status,
        // Report views
        reports_handlers::report_handler::list_view,
        reports_handlers::report_handler::refresh_view,
        reports_handlers::report_handler::get_selection,
        reports_handlers::report_handler::toggle_selection,
        reports_handlers::report_handler::clear_selection,
        reports_handlers::report_handler::bulk_delete,
        // Reports
        reports_handlers::report_handler::get_report,
        reports_handlers::report_handler::update_report,
        reports_handlers::report_handler::update_report_status,
        reports_handlers::report_handler::get_transitions,
        reports_handlers::report_handler::delete_report,
        // Feedback (official)
        feedback_handler::delete_feedback,
    ),
    components(
        schemas(
            // Shared
            Meta,
            PaginationMeta,
            // Auth
            auth::dto::MeResponseDto,
            auth::model::UserRole,
            ApiResponse<auth::dto::MeResponseDto>,
            // OTP
            otp_dtos::OtpRequestDto,
            otp_dtos::VerifyOtpDto,
            otp_dtos::OtpStatusDto,
            ApiResponse<otp_dtos::OtpStatusDto>,
            // Reports
            reports_models::Report,
            reports_models::ReportStatus,
            reports_models::ReportSeverity,
            reports_models::ReportScope,
            reports_models::Category,
            reports_models::Location,
            reports_models::UserRef,
            reports_models::FilterCriteria,
            reports_models::SortOrder,
            reports_dtos::ReportPageDto,
            reports_dtos::RefreshResultDto,
            reports_dtos::ToggleSelectionDto,
            reports_dtos::ToggleSelectionResponseDto,
            reports_dtos::SelectionDto,
            reports_dtos::BulkDeleteResultDto,
            reports_dtos::FailedDeleteDto,
            reports_dtos::UpdateReportDto,
            reports_dtos::UpdateReportStatusDto,
            reports_dtos::TransitionsDto,
            ApiResponse<reports_models::Report>,
            ApiResponse<reports_dtos::ReportPageDto>,
            ApiResponse<reports_dtos::RefreshResultDto>,
            ApiResponse<reports_dtos::SelectionDto>,
            ApiResponse<reports_dtos::ToggleSelectionResponseDto>,
            ApiResponse<reports_dtos::BulkDeleteResultDto>,
            ApiResponse<reports_dtos::TransitionsDto>,
        )
    ),
    tags(
        (name = "auth", description = "Session introspection"),
        (name = "otp", description = "One-time-password login with resend cooldown"),
        (name = "reports", description = "Report views, selection, status workflow"),
        (name = "feedback", description = "Feedback moderation"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "ZenaNet Gateway API",
        version = "0.1.0",
        description = "API documentation for the ZenaNet report gateway",
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
