use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers::{self, ReportState};
use crate::features::reports::services::{ReportService, ReportViewService};

/// Create routes for the reports feature
///
/// All routes require the auth middleware to be applied by the caller
pub fn routes(view_service: Arc<ReportViewService>, report_service: Arc<ReportService>) -> Router {
    let state = ReportState {
        view_service,
        report_service,
    };

    Router::new()
        // Derived views
        .route("/api/reports/views/{scope}", get(handlers::list_view))
        .route(
            "/api/reports/views/{scope}/refresh",
            post(handlers::refresh_view),
        )
        .route(
            "/api/reports/views/{scope}/selection",
            get(handlers::get_selection).delete(handlers::clear_selection),
        )
        .route(
            "/api/reports/views/{scope}/selection/toggle",
            post(handlers::toggle_selection),
        )
        .route(
            "/api/reports/views/{scope}/selection/bulk-delete",
            post(handlers::bulk_delete),
        )
        // Single report
        .route(
            "/api/reports/{id}",
            get(handlers::get_report)
                .patch(handlers::update_report)
                .delete(handlers::delete_report),
        )
        .route(
            "/api/reports/{id}/status",
            axum::routing::patch(handlers::update_report_status),
        )
        .route(
            "/api/reports/{id}/transitions",
            get(handlers::get_transitions),
        )
        .with_state(state)
}
