use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde_json::{json, Value};

use super::backend::ReportBackend;
use super::envelope;
use crate::core::config::UpstreamConfig;
use crate::core::error::{AppError, Result};
use crate::features::reports::models::{Report, ReportPatch, ReportScope};

/// reqwest client for the ZenaNet platform API
pub struct ZenaApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ZenaApiClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn report_url(&self, id: &str) -> String {
        self.url(&format!("/reports/{}", urlencoding::encode(id)))
    }

    fn list_path(scope: ReportScope) -> &'static str {
        match scope {
            ReportScope::Mine => "/reports/user",
            ReportScope::Assigned => "/reports/worker/assigned",
            ReportScope::Critical => "/reports/critical",
            ReportScope::All => "/reports",
        }
    }

    /// Send a request and return the unwrapped `data` of the response envelope.
    ///
    /// An empty 2xx body yields `Value::Null`.
    async fn execute(&self, request: RequestBuilder, action: &str) -> Result<Value> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Failed to {}: {}", action, e);
            AppError::ExternalServiceError(format!("Failed to {}: platform unreachable", action))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read platform response ({}): {}", action, e);
            AppError::ExternalServiceError(format!("Failed to {}: unreadable response", action))
        })?;

        if !status.is_success() {
            tracing::error!("Platform API error ({}): HTTP {} - {}", action, status, body);
            return Err(envelope::status_error(
                status,
                envelope::error_message(&body),
                action,
            ));
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse platform response ({}): {}", action, e);
            AppError::ExternalServiceError(format!("Failed to {}: invalid JSON response", action))
        })?;

        envelope::unwrap(value)
    }
}

#[async_trait]
impl ReportBackend for ZenaApiClient {
    async fn list_reports(&self, token: &str, scope: ReportScope) -> Result<Vec<Report>> {
        let url = self.url(Self::list_path(scope));
        tracing::debug!("Fetching {} reports from platform: {}", scope, url);

        let data = self
            .execute(self.http_client.get(&url).bearer_auth(token), "list reports")
            .await?;
        envelope::reports(data)
    }

    async fn get_report(&self, token: &str, id: &str) -> Result<Report> {
        let data = self
            .execute(
                self.http_client.get(self.report_url(id)).bearer_auth(token),
                "get report",
            )
            .await?;
        envelope::report(data)
    }

    async fn update_report(&self, token: &str, id: &str, patch: &ReportPatch) -> Result<Report> {
        let data = self
            .execute(
                self.http_client
                    .patch(self.report_url(id))
                    .bearer_auth(token)
                    .json(patch),
                "update report",
            )
            .await?;

        tracing::info!("Successfully updated report: {}", id);

        // Some deployments answer an update with an empty body
        if data.is_null() {
            return self.get_report(token, id).await;
        }
        envelope::report(data)
    }

    async fn delete_report(&self, token: &str, id: &str) -> Result<()> {
        self.execute(
            self.http_client.delete(self.report_url(id)).bearer_auth(token),
            "delete report",
        )
        .await?;
        tracing::info!("Successfully deleted report: {}", id);
        Ok(())
    }

    async fn delete_feedback(&self, token: &str, id: &str) -> Result<()> {
        let url = self.url(&format!("/feedback/{}", urlencoding::encode(id)));
        self.execute(
            self.http_client.delete(&url).bearer_auth(token),
            "delete feedback",
        )
        .await?;
        tracing::info!("Successfully deleted feedback: {}", id);
        Ok(())
    }

    async fn send_otp(&self, identifier: &str) -> Result<()> {
        self.execute(
            self.http_client
                .post(self.url("/auth/send-otp"))
                .json(&json!({ "identifier": identifier })),
            "send OTP",
        )
        .await?;
        Ok(())
    }

    async fn resend_otp(&self, identifier: &str) -> Result<()> {
        self.execute(
            self.http_client
                .post(self.url("/auth/resend-otp"))
                .json(&json!({ "identifier": identifier })),
            "resend OTP",
        )
        .await?;
        Ok(())
    }

    async fn verify_otp(&self, identifier: &str, code: &str) -> Result<Value> {
        self.execute(
            self.http_client
                .post(self.url("/auth/verify-otp"))
                .json(&json!({ "identifier": identifier, "otp": code })),
            "verify OTP",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::{delete, get, post},
        Json, Router,
    };
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};

    async fn list_user_reports(headers: HeaderMap) -> (StatusCode, Json<Value>) {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer good-token");
        if !authorized {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "Token expired" })),
            );
        }
        (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "reports": [
                    { "_id": "r1", "title": "Pothole", "status": "PENDING" },
                    { "title": "missing id" }
                ]}
            })),
        )
    }

    async fn get_one(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
        match id.as_str() {
            "r1" => (
                StatusCode::OK,
                Json(json!({ "success": true, "data": { "report": { "_id": "r1" } } })),
            ),
            "locked" => (
                StatusCode::OK,
                Json(json!({ "success": false, "message": "Report locked" })),
            ),
            "boom" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({ "success": false, "message": "Report not found" })),
            ),
        }
    }

    async fn verify(Json(body): Json<Value>) -> Json<Value> {
        Json(json!({ "success": true, "data": { "echo": body } }))
    }

    async fn spawn_fake_platform() -> String {
        let app = Router::new()
            .route("/reports/user", get(list_user_reports))
            .route("/reports/{id}", get(get_one).delete(|| async { StatusCode::NO_CONTENT }))
            .route("/feedback/{id}", delete(|| async { StatusCode::FORBIDDEN }))
            .route("/auth/verify-otp", post(verify));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/", addr)
    }

    async fn client() -> ZenaApiClient {
        let base_url = spawn_fake_platform().await;
        ZenaApiClient::new(&UpstreamConfig {
            base_url,
            request_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_list_reports_forwards_token_and_skips_malformed() {
        let client = client().await;

        let reports = assert_ok!(client.list_reports("good-token", ReportScope::Mine).await);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].id, "r1");

        let err = assert_err!(client.list_reports("stale", ReportScope::Mine).await);
        assert!(matches!(err, AppError::Unauthorized(ref m) if m == "Token expired"));
    }

    #[tokio::test]
    async fn test_get_report_error_mapping() {
        let client = client().await;

        assert_eq!(assert_ok!(client.get_report("t", "r1").await).id, "r1");
        assert!(matches!(
            client.get_report("t", "missing").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            client.get_report("t", "locked").await,
            Err(AppError::BadRequest(ref m)) if m == "Report locked"
        ));
        assert!(matches!(
            client.get_report("t", "boom").await,
            Err(AppError::ExternalServiceError(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_body_delete_and_forbidden_feedback() {
        let client = client().await;

        assert_ok!(client.delete_report("t", "r1").await);
        assert!(matches!(
            client.delete_feedback("t", "f1").await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_otp_returns_payload() {
        let client = client().await;
        let data = assert_ok!(client.verify_otp("+628123456789", "123456").await);
        assert_eq!(data["echo"]["otp"], "123456");
        assert_eq!(data["echo"]["identifier"], "+628123456789");
    }

    #[tokio::test]
    async fn test_unreachable_platform_is_external_error() {
        let client = ZenaApiClient::new(&UpstreamConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout: Duration::from_secs(2),
        })
        .unwrap();
        assert!(matches!(
            client.list_reports("t", ReportScope::All).await,
            Err(AppError::ExternalServiceError(_))
        ));
    }
}
