use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use super::service::FeedbackService;
use crate::core::error::Result;
use crate::features::auth::guards::RequireOfficial;
use crate::shared::types::ApiResponse;

/// Delete a feedback entry (official only)
#[utoipa::path(
    delete,
    path = "/api/feedback/{id}",
    params(("id" = String, Path, description = "Feedback ID")),
    responses(
        (status = 200, description = "Feedback deleted"),
        (status = 403, description = "Forbidden - official only"),
        (status = 404, description = "Feedback not found")
    ),
    tag = "feedback",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_feedback(
    RequireOfficial(user): RequireOfficial,
    State(service): State<Arc<FeedbackService>>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, &id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Feedback deleted".to_string()),
        None,
    )))
}
