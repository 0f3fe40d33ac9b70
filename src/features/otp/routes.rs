use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use super::handler;
use super::service::OtpService;

/// Public OTP routes (no JWT required)
pub fn routes(service: Arc<OtpService>) -> Router {
    Router::new()
        .route("/api/auth/otp/send", post(handler::send_otp))
        .route("/api/auth/otp/resend", post(handler::resend_otp))
        .route("/api/auth/otp/verify", post(handler::verify_otp))
        .route("/api/auth/otp/status", get(handler::otp_status))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{FakePlatform, VALID_OTP};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn server() -> TestServer {
        let platform = FakePlatform::with_reports(Vec::new());
        let service = Arc::new(OtpService::new(platform, Duration::from_secs(60)));
        TestServer::new(routes(service)).unwrap()
    }

    #[tokio::test]
    async fn test_send_then_resend_is_throttled() {
        let server = server();

        let body: Value = server
            .post("/api/auth/otp/send")
            .json(&json!({ "identifier": "+628123456789" }))
            .await
            .json();
        assert_eq!(body["data"]["remaining_secs"], 60);
        assert_eq!(body["data"]["resend_enabled"], false);

        let response = server
            .post("/api/auth/otp/resend")
            .json(&json!({ "identifier": "+628123456789" }))
            .await;
        response.assert_status(StatusCode::TOO_MANY_REQUESTS);

        let status: Value = server
            .get("/api/auth/otp/status")
            .add_query_param("identifier", "+628123456789")
            .await
            .json();
        assert_eq!(status["data"]["resend_enabled"], false);
        assert_eq!(status["data"]["cooldown_secs"], 60);

        server
            .post("/api/auth/otp/send")
            .json(&json!({ "identifier": "+628123456789" }))
            .await
            .assert_status(StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_invalid_identifier_is_rejected() {
        server()
            .post("/api/auth/otp/send")
            .json(&json!({ "identifier": "not a phone" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_verify_forwards_to_platform() {
        let server = server();

        server
            .post("/api/auth/otp/verify")
            .json(&json!({ "identifier": "citizen@example.com", "code": "999999" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let body: Value = server
            .post("/api/auth/otp/verify")
            .json(&json!({ "identifier": "citizen@example.com", "code": VALID_OTP }))
            .await
            .json();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["token"], "session-token");
    }
}
