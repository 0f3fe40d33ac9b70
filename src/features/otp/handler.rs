use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::Value;
use validator::Validate;

use super::dto::{OtpRequestDto, OtpStatusDto, VerifyOtpDto};
use super::service::OtpService;
use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::shared::types::ApiResponse;

/// Send a one-time code and start the resend cooldown
#[utoipa::path(
    post,
    path = "/api/auth/otp/send",
    request_body = OtpRequestDto,
    responses(
        (status = 200, description = "Code sent", body = ApiResponse<OtpStatusDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Cooldown still running"),
        (status = 502, description = "Platform API unavailable")
    ),
    tag = "otp"
)]
pub async fn send_otp(
    State(service): State<Arc<OtpService>>,
    AppJson(dto): AppJson<OtpRequestDto>,
) -> Result<Json<ApiResponse<OtpStatusDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let countdown = service.send(&dto.identifier).await?;
    Ok(Json(ApiResponse::success(
        Some(countdown.into()),
        Some("Code sent".to_string()),
        None,
    )))
}

/// Send a new code once the cooldown has run out
#[utoipa::path(
    post,
    path = "/api/auth/otp/resend",
    request_body = OtpRequestDto,
    responses(
        (status = 200, description = "Code re-sent", body = ApiResponse<OtpStatusDto>),
        (status = 400, description = "Validation error"),
        (status = 429, description = "Cooldown still running")
    ),
    tag = "otp"
)]
pub async fn resend_otp(
    State(service): State<Arc<OtpService>>,
    AppJson(dto): AppJson<OtpRequestDto>,
) -> Result<Json<ApiResponse<OtpStatusDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let countdown = service.resend(&dto.identifier).await?;
    Ok(Json(ApiResponse::success(
        Some(countdown.into()),
        Some("Code re-sent".to_string()),
        None,
    )))
}

/// Remaining cooldown for an identifier
#[utoipa::path(
    get,
    path = "/api/auth/otp/status",
    params(OtpRequestDto),
    responses(
        (status = 200, description = "Cooldown state", body = ApiResponse<OtpStatusDto>),
        (status = 400, description = "Validation error")
    ),
    tag = "otp"
)]
pub async fn otp_status(
    State(service): State<Arc<OtpService>>,
    AppQuery(query): AppQuery<OtpRequestDto>,
) -> Result<Json<ApiResponse<OtpStatusDto>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let countdown = service.status(&query.identifier).await;
    Ok(Json(ApiResponse::success(Some(countdown.into()), None, None)))
}

/// Verify a code; the platform's session payload is returned as-is
#[utoipa::path(
    post,
    path = "/api/auth/otp/verify",
    request_body = VerifyOtpDto,
    responses(
        (status = 200, description = "Code accepted, data holds the platform session"),
        (status = 400, description = "Invalid or expired code")
    ),
    tag = "otp"
)]
pub async fn verify_otp(
    State(service): State<Arc<OtpService>>,
    AppJson(dto): AppJson<VerifyOtpDto>,
) -> Result<Json<ApiResponse<Value>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let session = service.verify(&dto.identifier, &dto.code).await?;
    Ok(Json(ApiResponse::success(Some(session), None, None)))
}
