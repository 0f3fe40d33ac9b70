use std::sync::Arc;

use axum::{routing::delete, Router};

use super::handler;
use super::service::FeedbackService;

/// Protected feedback routes (require JWT authentication)
pub fn routes(service: Arc<FeedbackService>) -> Router {
    Router::new()
        .route("/api/feedback/{id}", delete(handler::delete_feedback))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::UserRole;
    use crate::shared::test_helpers::{user, with_user, FakePlatform};
    use axum::http::StatusCode;
    use axum_test::TestServer;

    fn server(role: UserRole) -> TestServer {
        let platform = FakePlatform::with_reports(Vec::new());
        let service = Arc::new(FeedbackService::new(platform));
        TestServer::new(with_user(routes(service), user("u1", role))).unwrap()
    }

    #[tokio::test]
    async fn test_official_deletes_feedback() {
        server(UserRole::Official)
            .delete("/api/feedback/f1")
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn test_missing_feedback_is_not_found() {
        server(UserRole::Admin)
            .delete("/api/feedback/missing")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_worker_cannot_delete_feedback() {
        server(UserRole::Worker)
            .delete("/api/feedback/f1")
            .await
            .assert_status(StatusCode::FORBIDDEN);
    }
}
